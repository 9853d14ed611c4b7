use crate::pages::PageStore;
use crate::textures::TextureCache;
use eframe::egui;
use manga_reader::constants::{OVERLAY_FONT_SIZE, OVERLAY_MARGIN};
use manga_reader::{OverlaySegment, RenderPlan, Rotation, ScreenRect, SelectionBox, layout_overlay};

const SELECTION_FILL: egui::Color32 = egui::Color32::from_rgba_premultiplied(0, 85, 0, 128);
const SELECTION_STROKE: egui::Color32 = egui::Color32::from_rgb(0, 0xaa, 0);

pub fn to_egui_rect(origin: egui::Pos2, rect: &ScreenRect) -> egui::Rect {
    egui::Rect::from_min_size(
        origin + egui::vec2(rect.x, rect.y),
        egui::vec2(rect.width, rect.height),
    )
}

/// Draw the visible pages
pub fn paint_pages(
    painter: &egui::Painter,
    origin: egui::Pos2,
    plan: &RenderPlan,
    rotation: Rotation,
    pages: &mut PageStore,
    textures: &mut TextureCache,
) {
    let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
    for placed in &plan.pages {
        let Some(texture) = textures.texture(painter.ctx(), pages, placed, rotation) else {
            continue;
        };
        painter.image(
            texture.id(),
            to_egui_rect(origin, &placed.rect),
            uv,
            egui::Color32::WHITE,
        );
    }
}

pub fn paint_selection(painter: &egui::Painter, origin: egui::Pos2, selection: &SelectionBox) {
    let rect = to_egui_rect(origin, &selection.rect());
    painter.rect(
        rect,
        0.0,
        SELECTION_FILL,
        egui::Stroke::new(1.0, SELECTION_STROKE),
        egui::StrokeKind::Inside,
    );
}

/// Draw the lookup text on a black box in the top-left corner.
///
/// Returns the area covered, relative to `origin`.
pub fn paint_overlay(
    painter: &egui::Painter,
    origin: egui::Pos2,
    segments: &[OverlaySegment],
) -> Option<ScreenRect> {
    let font = egui::FontId::proportional(OVERLAY_FONT_SIZE);
    let layout = layout_overlay(segments, OVERLAY_MARGIN, |text| {
        let size = painter
            .layout_no_wrap(text.to_string(), font.clone(), egui::Color32::WHITE)
            .size();
        (size.x, size.y)
    });
    let bounds = layout.bounds?;

    let text_rect = to_egui_rect(origin, &bounds);
    let background =
        egui::Rect::from_min_max(text_rect.min - egui::vec2(1.0, 1.0), text_rect.max);
    painter.rect(
        background,
        0.0,
        egui::Color32::BLACK,
        egui::Stroke::new(1.0, egui::Color32::WHITE),
        egui::StrokeKind::Outside,
    );

    for run in &layout.runs {
        let [r, g, b] = run.color.rgb();
        painter.text(
            origin + egui::vec2(run.rect.x, run.rect.y),
            egui::Align2::LEFT_TOP,
            &run.text,
            font.clone(),
            egui::Color32::from_rgb(r, g, b),
        );
    }

    Some(bounds)
}

/// One line of status text along the bottom edge of the canvas
pub fn paint_status(painter: &egui::Painter, canvas: egui::Rect, message: &str) {
    let font = egui::FontId::proportional(OVERLAY_FONT_SIZE);
    let galley = painter.layout_no_wrap(
        message.to_string(),
        font,
        egui::Color32::from_rgb(0xff, 0xcc, 0x66),
    );
    let pos = egui::pos2(
        canvas.min.x + OVERLAY_MARGIN,
        canvas.max.y - OVERLAY_MARGIN - galley.size().y,
    );
    let background = egui::Rect::from_min_size(pos, galley.size()).expand(2.0);
    painter.rect_filled(background, 0.0, egui::Color32::from_black_alpha(200));
    painter.galley(pos, galley, egui::Color32::WHITE);
}
