use crate::pages::PageStore;
use eframe::egui;
use image::DynamicImage;
use manga_async_runtime::filter_type;
use manga_reader::{ImageSize, PlacedPage, RenderPlan, Rotation, ScaleFilter};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct TextureKey {
    index: usize,
    rotation: Rotation,
    scaled: ImageSize,
}

/// Scaled and rotated pages uploaded to the GPU
pub struct TextureCache {
    filter: ScaleFilter,
    textures: HashMap<TextureKey, egui::TextureHandle>,
}

impl TextureCache {
    pub fn new(filter: ScaleFilter) -> Self {
        Self {
            filter,
            textures: HashMap::new(),
        }
    }

    /// Texture for a placed page, rendering it on first use
    pub fn texture(
        &mut self,
        ctx: &egui::Context,
        pages: &mut PageStore,
        placed: &PlacedPage,
        rotation: Rotation,
    ) -> Option<egui::TextureHandle> {
        let key = TextureKey {
            index: placed.index,
            rotation,
            scaled: placed.scaled,
        };
        if let Some(texture) = self.textures.get(&key) {
            return Some(texture.clone());
        }

        let image = pages.image(placed.index)?;
        // The painter stretches a clamped texture back over the full rect
        let size = texture_size(placed.scaled, ctx.input(|i| i.max_texture_side));
        let color_image = render_page(&image, rotation, size, self.filter);
        let texture = ctx.load_texture(
            format!("page-{}", placed.index),
            color_image,
            egui::TextureOptions::LINEAR,
        );
        log::debug!(
            "Rendered page {} at {}x{}",
            placed.index + 1,
            size.width,
            size.height
        );
        self.textures.insert(key, texture.clone());
        Some(texture)
    }

    /// Drop textures no longer on screen
    pub fn retain_visible(&mut self, plan: &RenderPlan, rotation: Rotation) {
        self.textures.retain(|key, _| {
            key.rotation == rotation
                && plan
                    .pages
                    .iter()
                    .any(|page| page.index == key.index && page.scaled == key.scaled)
        });
    }
}

/// Shrink `scaled` proportionally so neither side exceeds `max_side`
pub fn texture_size(scaled: ImageSize, max_side: usize) -> ImageSize {
    let max_side = max_side.min(u32::MAX as usize) as u32;
    let longest = scaled.width.max(scaled.height);
    if max_side == 0 || longest <= max_side {
        return scaled;
    }
    let factor = max_side as f64 / longest as f64;
    ImageSize::new(
        ((scaled.width as f64 * factor).round() as u32).clamp(1, max_side),
        ((scaled.height as f64 * factor).round() as u32).clamp(1, max_side),
    )
}

/// Rotate clockwise by `rotation`, then resize to `scaled`
pub fn render_page(
    image: &DynamicImage,
    rotation: Rotation,
    scaled: ImageSize,
    filter: ScaleFilter,
) -> egui::ColorImage {
    let rotated = match rotation.quarter_turns() {
        1 => image.rotate90(),
        2 => image.rotate180(),
        3 => image.rotate270(),
        _ => image.clone(),
    };
    let resized = if rotated.width() == scaled.width && rotated.height() == scaled.height {
        rotated
    } else {
        rotated.resize_exact(scaled.width, scaled.height, filter_type(filter))
    };

    let rgba = resized.to_rgba8();
    egui::ColorImage::from_rgba_unmultiplied(
        [rgba.width() as usize, rgba.height() as usize],
        rgba.as_raw(),
    )
}
