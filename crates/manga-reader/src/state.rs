//! View state and its transition function
//!
//! The viewer is modelled as an immutable [`ViewState`] plus a [`Command`]
//! enum. [`ViewState::apply`] returns the next state together with the side
//! effects the host must perform (redraw, persist, start a lookup, ...).

use crate::constants::TITLE_PREFIX;
use crate::layout::{LayoutParams, LayoutResult, compute_layout, place};
use crate::navigation::{
    NavContext, advance_amount, jump_to_end_index, move_target, side_tap_direction,
};
use crate::options::ReaderOptions;
use crate::selection::{PageHit, SourceCrop, map_spread_selection};
use crate::types::{
    FitMode, ImageSize, ReadingDirection, Rotation, ScreenPoint, ScreenRect, StepDirection,
    ViewportSize,
};

/// Access to page count and page dimensions.
///
/// Implemented by the host on top of its decoded page cache. Sizes may be
/// unknown (`None`) when a page fails to decode.
pub trait PageCatalog {
    fn page_count(&self) -> usize;
    fn page_size(&mut self, index: usize) -> Option<ImageSize>;
}

/// Everything the user can ask the viewer to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Next/previous view (one or two pages depending on the layout)
    Advance(StepDirection),
    /// Exactly one page
    Step(StepDirection),
    JumpStart,
    JumpEnd,
    Rotate,
    SetFitMode(FitMode),
    ToggleSpread,
    ToggleDirection,
    ToggleFullscreen,
    /// The drawing surface changed size
    Resize(ViewportSize),
    /// Middle/right click at canvas x
    SideTap { x: f32 },
    SelectionStart(ScreenPoint),
    SelectionDrag(ScreenPoint),
    SelectionEnd,
    /// Dismiss the overlay text and the selection box
    ClearOverlay,
    /// Re-run the layout for the current page without moving
    Redraw,
}

/// Side effects requested by a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Redraw,
    Persist { index: usize },
    CancelLookup,
    ClearOverlay,
    StartLookup { page: usize, crop: SourceCrop },
    SetFullscreen(bool),
    SetTitle(String),
}

/// Next state plus the effects to run
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: ViewState,
    pub effects: Vec<Effect>,
}

/// Rubber-band rectangle drawn by the user, in screen space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionBox {
    pub origin: ScreenPoint,
    pub current: ScreenPoint,
}

impl SelectionBox {
    pub fn new(origin: ScreenPoint) -> Self {
        Self {
            origin,
            current: origin,
        }
    }

    pub fn rect(&self) -> ScreenRect {
        ScreenRect::from_corners(self.origin, self.current)
    }
}

/// A page as drawn on screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedPage {
    pub index: usize,
    pub rect: ScreenRect,
    /// Rotated and scaled size the texture must have
    pub scaled: ImageSize,
    /// Un-rotated source size
    pub source: ImageSize,
}

/// What to draw for the current state
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderPlan {
    /// First entry is the primary (hit-tested first) page
    pub pages: Vec<PlacedPage>,
}

/// Complete, immutable description of what the viewer shows
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub index: usize,
    /// Spread mode as configured (may be forced off at the last page)
    pub spread: bool,
    pub rotation: Rotation,
    pub fit_mode: FitMode,
    pub direction: ReadingDirection,
    pub fullscreen: bool,
    pub viewport: ViewportSize,
    /// Validity of the current layout; drives navigation step sizes
    pub width_valid: bool,
    /// The last move went backward; an invalid spread then shows its second page
    pub moved_backward: bool,
    pub selection: Option<SelectionBox>,
    pub drawing: bool,
}

impl ViewState {
    pub fn new(options: &ReaderOptions, index: usize) -> Self {
        Self {
            index,
            spread: options.double_page,
            rotation: Rotation::new(options.rotation),
            fit_mode: options.fit_mode,
            direction: options.reading_direction(),
            fullscreen: options.fullscreen,
            viewport: ViewportSize::new(options.width, options.height),
            width_valid: true,
            moved_backward: false,
            selection: None,
            drawing: false,
        }
    }

    pub fn layout_params(&self) -> LayoutParams {
        LayoutParams {
            viewport: self.viewport,
            rotation: self.rotation,
            fit_mode: self.fit_mode,
            direction: self.direction,
        }
    }

    /// Spread mode after forcing single pages at the end of the archive
    pub fn effective_spread(&self, page_count: usize) -> bool {
        self.spread && self.index + 2 <= page_count
    }

    /// Lay out the current page (and its partner in spread mode)
    pub fn layout<P: PageCatalog + ?Sized>(&self, pages: &mut P) -> Option<LayoutResult> {
        let count = pages.page_count();
        if self.index >= count {
            return None;
        }

        let first = pages.page_size(self.index)?;
        let mut sizes = vec![first];
        if self.effective_spread(count) {
            if let Some(second) = pages.page_size(self.index + 1) {
                sizes.push(second);
            }
        }

        Some(compute_layout(&self.layout_params(), &sizes, sizes.len() == 2))
    }

    /// Pages to draw and where
    pub fn render_plan<P: PageCatalog + ?Sized>(&self, pages: &mut P) -> RenderPlan {
        let Some(layout) = self.layout(pages) else {
            return RenderPlan::default();
        };

        let placed = |offset: usize| {
            let page = layout.pages[offset];
            PlacedPage {
                index: self.index + offset,
                rect: place(self.viewport, page.scaled, page.anchor),
                scaled: page.scaled,
                source: page.source,
            }
        };

        let pages = if layout.shows_spread() {
            vec![placed(0), placed(1)]
        } else if layout.is_pair() && self.moved_backward {
            vec![placed(1)]
        } else {
            vec![placed(0)]
        };

        RenderPlan { pages }
    }

    /// Window title listing the visible page numbers
    pub fn title<P: PageCatalog + ?Sized>(&self, pages: &mut P) -> String {
        let total = pages.page_count();
        let plan = self.render_plan(pages);
        match plan.pages.as_slice() {
            [first, second] => format!(
                "{} ({}-{}/{})",
                TITLE_PREFIX,
                first.index + 1,
                second.index + 1,
                total
            ),
            [only] => format!("{} ({}/{})", TITLE_PREFIX, only.index + 1, total),
            _ => format!("{} ({}/{})", TITLE_PREFIX, self.index + 1, total),
        }
    }

    fn nav_context(&self, page_count: usize) -> NavContext {
        NavContext {
            index: self.index,
            page_count,
            spread: self.spread,
            width_valid: self.width_valid,
        }
    }

    /// Apply one command.
    pub fn apply<P: PageCatalog + ?Sized>(&self, command: Command, pages: &mut P) -> Transition {
        let count = pages.page_count();

        match command {
            Command::Advance(direction) => {
                let amount = advance_amount(self.nav_context(count), direction);
                self.move_by(amount, pages)
            }
            Command::Step(direction) => self.move_by(direction.sign(), pages),
            Command::SideTap { x } => {
                let direction = side_tap_direction(x, self.viewport.width);
                self.move_by(direction.sign(), pages)
            }
            Command::JumpStart => self.clone().show(0, false, pages),
            Command::JumpEnd => {
                let jumped = self
                    .clone()
                    .show(jump_to_end_index(count, self.spread), false, pages);
                if jumped.state.effective_spread(count) && !jumped.state.width_valid {
                    jumped.state.show(count.saturating_sub(1), false, pages)
                } else {
                    jumped
                }
            }
            Command::Rotate => {
                let mut next = self.clone();
                next.rotation = self.rotation.next();
                next.refresh(pages)
            }
            Command::SetFitMode(mode) => {
                let mut next = self.clone();
                next.fit_mode = mode;
                next.refresh(pages)
            }
            Command::ToggleSpread => {
                let mut next = self.clone();
                next.spread = !self.spread;
                next.refresh(pages)
            }
            Command::ToggleDirection => {
                let mut next = self.clone();
                next.direction = self.direction.toggled();
                next.refresh(pages)
            }
            Command::ToggleFullscreen => {
                let mut next = self.clone();
                next.fullscreen = !self.fullscreen;
                let mut transition = next.refresh(pages);
                transition
                    .effects
                    .insert(0, Effect::SetFullscreen(transition.state.fullscreen));
                transition
            }
            Command::Resize(viewport) => {
                if viewport == self.viewport {
                    return self.unchanged();
                }
                let mut next = self.clone();
                next.viewport = viewport;
                next.refresh(pages)
            }
            Command::Redraw => self.clone().refresh(pages),
            Command::SelectionStart(point) => {
                let mut next = self.clone();
                next.selection = Some(SelectionBox::new(point));
                next.drawing = true;
                Transition {
                    state: next,
                    effects: vec![Effect::CancelLookup, Effect::Redraw],
                }
            }
            Command::SelectionDrag(point) => {
                if !self.drawing {
                    return self.unchanged();
                }
                let mut next = self.clone();
                if let Some(selection) = next.selection.as_mut() {
                    selection.current = point;
                }
                Transition {
                    state: next,
                    effects: vec![Effect::Redraw],
                }
            }
            Command::SelectionEnd => self.finish_selection(pages),
            Command::ClearOverlay => {
                let mut next = self.clone();
                next.selection = None;
                next.drawing = false;
                Transition {
                    state: next,
                    effects: vec![Effect::ClearOverlay, Effect::Redraw],
                }
            }
        }
    }

    fn unchanged(&self) -> Transition {
        Transition {
            state: self.clone(),
            effects: Vec::new(),
        }
    }

    fn move_by<P: PageCatalog + ?Sized>(&self, amount: isize, pages: &mut P) -> Transition {
        match move_target(self.index, pages.page_count(), amount) {
            Some(target) => self.clone().show(target, amount < 0, pages),
            None => self.unchanged(),
        }
    }

    /// Re-layout in place, keeping the index and the last move direction
    fn refresh<P: PageCatalog + ?Sized>(self, pages: &mut P) -> Transition {
        let index = self.index;
        let backward = self.moved_backward;
        self.show(index, backward, pages)
    }

    /// Show `index`: recompute validity, drop the selection and any lookup,
    /// and remember the page.
    fn show<P: PageCatalog + ?Sized>(
        mut self,
        index: usize,
        moved_backward: bool,
        pages: &mut P,
    ) -> Transition {
        self.index = index;
        self.moved_backward = moved_backward;
        self.selection = None;
        self.drawing = false;
        self.width_valid = self
            .layout(pages)
            .map_or(true, |layout| !layout.is_pair() || layout.width_valid);

        let title = self.title(pages);
        Transition {
            effects: vec![
                Effect::CancelLookup,
                Effect::ClearOverlay,
                Effect::Persist { index },
                Effect::SetTitle(title),
                Effect::Redraw,
            ],
            state: self,
        }
    }

    fn finish_selection<P: PageCatalog + ?Sized>(&self, pages: &mut P) -> Transition {
        if !self.drawing {
            return self.unchanged();
        }
        let mut next = self.clone();
        next.drawing = false;

        let Some(selection) = self.selection else {
            return Transition {
                state: next,
                effects: Vec::new(),
            };
        };

        let plan = self.render_plan(pages);
        let mut effects = Vec::new();
        if let Some(primary) = plan.pages.first() {
            let secondary = plan.pages.get(1);
            let mapped = map_spread_selection(
                &selection.rect(),
                (&primary.rect, primary.source),
                secondary.map(|page| (&page.rect, page.source)),
                self.rotation,
            );
            if let Some((hit, crop)) = mapped {
                let page = match (hit, secondary) {
                    (PageHit::Secondary, Some(page)) => page.index,
                    _ => primary.index,
                };
                log::debug!("selection on page {} maps to {:?}", page, crop);
                effects.push(Effect::StartLookup { page, crop });
            }
        }
        effects.push(Effect::Redraw);

        Transition {
            state: next,
            effects,
        }
    }
}
