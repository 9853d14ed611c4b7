use crate::input::{key_modifiers, key_name, pointer_commands};
use crate::logger::AppLogger;
use crate::pages::PageStore;
use crate::textures::TextureCache;
use crate::views::{paint_overlay, paint_pages, paint_selection, paint_status};
use eframe::egui;
use manga_async_runtime::{LOOKUP_POLL_INTERVAL, LookupController, LookupUpdate};
use manga_reader::{
    Command, Effect, Keymap, LastPageStore, OverlaySegment, ReaderOptions, ScreenRect, Transition,
    ViewState, ViewportSize, overlay,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How long a warning stays in the status strip
const STATUS_TIMEOUT: Duration = Duration::from_secs(8);

/// Everything `main` prepares before the window opens
pub struct Session {
    pub options: ReaderOptions,
    pub keymap: Keymap,
    pub pages: PageStore,
    pub history: LastPageStore,
    pub archive: PathBuf,
    pub start_index: usize,
    pub controller: LookupController,
    pub logger: AppLogger,
}

pub struct ReaderApp {
    state: ViewState,
    keymap: Keymap,
    pages: PageStore,
    textures: TextureCache,

    // Persistence
    history: LastPageStore,
    archive: PathBuf,

    // Lookup
    controller: LookupController,
    overlay: Vec<OverlaySegment>,
    /// Where the overlay was drawn last frame, for click hit-testing
    overlay_bounds: Option<ScreenRect>,

    logger: AppLogger,
}

impl ReaderApp {
    pub fn new(cc: &eframe::CreationContext<'_>, session: Session) -> Self {
        if let Some(path) = &session.options.font_path {
            if let Err(e) = install_font(&cc.egui_ctx, path) {
                log::warn!("Cannot load font {}: {}", path.display(), e);
            }
        }

        let mut app = Self {
            state: ViewState::new(&session.options, session.start_index),
            keymap: session.keymap,
            pages: session.pages,
            textures: TextureCache::new(session.options.scale_method),
            history: session.history,
            archive: session.archive,
            controller: session.controller,
            overlay: Vec::new(),
            overlay_bounds: None,
            logger: session.logger,
        };
        app.dispatch(&cc.egui_ctx, Command::Redraw);
        app
    }

    fn dispatch(&mut self, ctx: &egui::Context, command: Command) {
        let Transition { state, effects } = self.state.apply(command, &mut self.pages);
        self.state = state;
        for effect in effects {
            self.run_effect(ctx, effect);
        }
    }

    fn run_effect(&mut self, ctx: &egui::Context, effect: Effect) {
        match effect {
            Effect::Redraw => ctx.request_repaint(),
            Effect::Persist { index } => self.persist(index),
            Effect::CancelLookup => self.controller.cancel(),
            Effect::ClearOverlay => {
                self.overlay.clear();
                self.overlay_bounds = None;
            }
            Effect::StartLookup { page, crop } => match self.pages.image(page) {
                Some(image) => {
                    self.controller.start_lookup(image, crop);
                    ctx.request_repaint_after(LOOKUP_POLL_INTERVAL);
                }
                None => log::warn!("Page {} is not available for lookup", page + 1),
            },
            Effect::SetFullscreen(fullscreen) => {
                ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(fullscreen))
            }
            Effect::SetTitle(title) => ctx.send_viewport_cmd(egui::ViewportCommand::Title(title)),
        }
    }

    fn persist(&mut self, index: usize) {
        if self.history.get(&self.archive) == index {
            return;
        }
        self.history.set(&self.archive, index);
        if let Err(e) = self.history.save() {
            log::warn!(
                "Failed to save page history {}: {}",
                self.history.path().display(),
                e
            );
        }
    }

    fn handle_lookup_updates(&mut self, ctx: &egui::Context) {
        for update in self.controller.poll() {
            match update {
                LookupUpdate::Progress { message, .. } => {
                    self.overlay = overlay::parse(&message);
                }
                LookupUpdate::Finished { annotation, .. } => {
                    self.overlay = overlay::parse(&annotation);
                }
                LookupUpdate::Failed { message, .. } => {
                    log::warn!("Lookup failed: {}", message);
                    self.overlay.clear();
                }
            }
            ctx.request_repaint();
        }

        if self.controller.is_running() {
            ctx.request_repaint_after(LOOKUP_POLL_INTERVAL);
        }
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        let events = ctx.input(|i| i.events.clone());
        for event in events {
            if let egui::Event::Key {
                key,
                pressed: true,
                modifiers,
                ..
            } = event
            {
                let command = self.keymap.command(
                    &key_name(key),
                    key_modifiers(modifiers),
                    self.state.direction,
                );
                if let Some(command) = command {
                    self.dispatch(ctx, command);
                }
            }
        }
    }

    fn show_canvas(&mut self, ui: &mut egui::Ui) {
        let ctx = ui.ctx().clone();
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let canvas = response.rect;
        let origin = canvas.min;

        let viewport = ViewportSize::new(
            canvas.width().round().max(1.0) as u32,
            canvas.height().round().max(1.0) as u32,
        );
        self.dispatch(&ctx, Command::Resize(viewport));

        let mut clear_areas = Vec::new();
        clear_areas.extend(self.overlay_bounds);
        clear_areas.extend(self.state.selection.map(|selection| selection.rect()));
        for command in pointer_commands(ui, &response, &clear_areas, self.state.drawing) {
            self.dispatch(&ctx, command);
        }

        let plan = self.state.render_plan(&mut self.pages);
        paint_pages(
            &painter,
            origin,
            &plan,
            self.state.rotation,
            &mut self.pages,
            &mut self.textures,
        );
        self.textures.retain_visible(&plan, self.state.rotation);

        if let Some(selection) = &self.state.selection {
            paint_selection(&painter, origin, selection);
        }
        self.overlay_bounds = paint_overlay(&painter, origin, &self.overlay);

        if let Some(entry) = self.logger.latest_warning() {
            let age = chrono::Local::now() - entry.timestamp;
            match age.to_std() {
                Ok(age) if age < STATUS_TIMEOUT => {
                    paint_status(&painter, canvas, &entry.message);
                    ctx.request_repaint_after(STATUS_TIMEOUT - age);
                }
                _ => self.logger.clear(),
            }
        }
    }
}

impl eframe::App for ReaderApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_lookup_updates(ctx);
        self.handle_keys(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(egui::Color32::BLACK))
            .show(ctx, |ui| self.show_canvas(ui));
    }
}

/// Add a font file as fallback for every family, for CJK coverage
fn install_font(ctx: &egui::Context, path: &Path) -> std::io::Result<()> {
    let bytes = std::fs::read(path)?;
    let mut fonts = egui::FontDefinitions::default();
    fonts.font_data.insert(
        "overlay".to_owned(),
        std::sync::Arc::new(egui::FontData::from_owned(bytes)),
    );
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .push("overlay".to_owned());
    }
    ctx.set_fonts(fonts);
    log::info!("Loaded overlay font {}", path.display());
    Ok(())
}
