//! Screen selection to source pixel mapping
//!
//! The user drags a box over the rendered page. The box is expressed relative
//! to the page rectangle on screen, the rotation is undone, and the result is
//! scaled to the un-rotated source image.

use crate::types::{ImageSize, Rotation, ScreenRect};

/// Rectangle in source image pixels, `x1 > x0` and `y1 > y0`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceCrop {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl SourceCrop {
    pub fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> u32 {
        self.y1 - self.y0
    }
}

/// Which page of a spread a selection landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageHit {
    Primary,
    Secondary,
}

/// Map a screen selection onto one rendered page.
///
/// Returns `None` when the page box is empty, when the selection lies
/// entirely left of the image in source space, or when nothing is left after
/// clamping to the image.
pub fn map_selection(
    selection: &ScreenRect,
    page: &ScreenRect,
    source: ImageSize,
    rotation: Rotation,
) -> Option<SourceCrop> {
    let iw = page.width as f64;
    let ih = page.height as f64;
    if iw <= 0.0 || ih <= 0.0 {
        return None;
    }

    let left = (selection.x - page.x) as f64;
    let right = (selection.right() - page.x) as f64;
    let top = (selection.y - page.y) as f64;
    let bottom = (selection.bottom() - page.y) as f64;

    let sw = source.width as f64;
    let sh = source.height as f64;

    let (x0, x1, y0, y1) = match rotation.quarter_turns() {
        0 => (
            left * sw / iw,
            right * sw / iw,
            top * sh / ih,
            bottom * sh / ih,
        ),
        1 => (
            top * sw / ih,
            bottom * sw / ih,
            (iw - right) * sh / iw,
            (iw - left) * sh / iw,
        ),
        2 => (
            (iw - right) * sw / iw,
            (iw - left) * sw / iw,
            (ih - bottom) * sh / ih,
            (ih - top) * sh / ih,
        ),
        _ => (
            (ih - bottom) * sw / ih,
            (ih - top) * sw / ih,
            left * sh / iw,
            right * sh / iw,
        ),
    };

    if x0 <= 0.0 && x1 <= 0.0 {
        return None;
    }

    let x0 = clamp_to(x0, source.width);
    let x1 = clamp_to(x1, source.width);
    let y0 = clamp_to(y0, source.height);
    let y1 = clamp_to(y1, source.height);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }

    Some(SourceCrop { x0, y0, x1, y1 })
}

/// Map a selection in spread mode.
///
/// The primary page is tried first. When the selection starts outside it
/// along the axis the pair is split on, the secondary page is used instead.
pub fn map_spread_selection(
    selection: &ScreenRect,
    primary: (&ScreenRect, ImageSize),
    secondary: Option<(&ScreenRect, ImageSize)>,
    rotation: Rotation,
) -> Option<(PageHit, SourceCrop)> {
    let (page, source) = primary;
    let start = if rotation.is_odd() {
        normalized(selection.y, page.y, page.height)
    } else {
        normalized(selection.x, page.x, page.width)
    };

    match secondary {
        Some((other, other_source)) if !(0.0..1.0).contains(&start) => {
            map_selection(selection, other, other_source, rotation)
                .map(|crop| (PageHit::Secondary, crop))
        }
        _ => map_selection(selection, page, source, rotation).map(|crop| (PageHit::Primary, crop)),
    }
}

fn normalized(value: f32, origin: f32, extent: f32) -> f64 {
    if extent <= 0.0 {
        return f64::NAN;
    }
    (value - origin) as f64 / extent as f64
}

fn clamp_to(value: f64, max: u32) -> u32 {
    if value.is_nan() || value <= 0.0 {
        0
    } else {
        value.min(max as f64) as u32
    }
}
