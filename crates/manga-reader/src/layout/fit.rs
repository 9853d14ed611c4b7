//! Fit policies and spread validity
//!
//! Pages are rotated first, then scaled into a cell. The cell is the whole
//! viewport for a single page and half of it (width for even rotation,
//! height for odd rotation) for a valid spread.

use crate::types::{FitMode, ImageSize};

use super::{Anchor, LayoutParams, LayoutResult, PageLayout, spread_anchors};

/// Area a page is fit into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// The whole viewport
    Full,
    /// Half of the viewport along the axis the pair is split on
    SpreadHalf,
}

/// Scale one page into a cell of the viewport.
///
/// Best fit keeps the aspect ratio. Height and width fit only constrain
/// their own axis; the other axis keeps the rotated pixel size. Any
/// dimension that would collapse to zero is clamped to one pixel.
pub fn fit_page(source: ImageSize, params: &LayoutParams, cell: Cell) -> ImageSize {
    let rotated = source.rotated(params.rotation);
    let x = rotated.width as f64;
    let y = rotated.height as f64;

    let split = cell == Cell::SpreadHalf;
    let mut cell_w = params.viewport.width as f64;
    let mut cell_h = params.viewport.height as f64;
    if split && params.rotation.is_odd() {
        cell_h /= 2.0;
    } else if split {
        cell_w /= 2.0;
    }

    match params.fit_mode {
        FitMode::Best => {
            // Width-limited unless the width-limited height overflows the cell
            if y * cell_w <= cell_h * x {
                ImageSize::new(clamp_dimension(cell_w), clamp_dimension(y * cell_w / x))
            } else {
                ImageSize::new(clamp_dimension(x * cell_h / y), clamp_dimension(cell_h))
            }
        }
        FitMode::Height => ImageSize::new(rotated.width.max(1), clamp_dimension(cell_h)),
        FitMode::Width => ImageSize::new(clamp_dimension(cell_w), rotated.height.max(1)),
    }
}

/// Decide whether two pages can be shown next to each other.
///
/// - Pages that already fit side by side at their source width are valid.
/// - A landscape page (usually a two-page scan) never pairs.
/// - Otherwise both pages are fit to the full viewport; the pair is valid
///   when the fitted widths still fit, or when the rotation is odd, since an
///   odd rotation stacks the pair vertically and width is no longer shared.
pub fn spread_width_valid(params: &LayoutParams, first: ImageSize, second: ImageSize) -> bool {
    let available = params.viewport.width as u64;
    if available >= first.width as u64 + second.width as u64 {
        return true;
    }

    if first.is_landscape() || second.is_landscape() {
        return false;
    }

    let a = fit_page(first, params, Cell::Full);
    let b = fit_page(second, params, Cell::Full);
    if a.width as u64 + b.width as u64 <= available {
        true
    } else {
        params.rotation.is_odd()
    }
}

/// Lay out the current page, or the current pair when `spread` is set and
/// two page sizes are given.
pub fn compute_layout(params: &LayoutParams, pages: &[ImageSize], spread: bool) -> LayoutResult {
    match pages {
        [first, second, ..] if spread => {
            let (first, second) = (*first, *second);
            if spread_width_valid(params, first, second) {
                let (left, right) = spread_anchors(params.rotation, params.direction);
                LayoutResult {
                    pages: vec![
                        PageLayout {
                            source: first,
                            scaled: fit_page(first, params, Cell::SpreadHalf),
                            anchor: right,
                        },
                        PageLayout {
                            source: second,
                            scaled: fit_page(second, params, Cell::SpreadHalf),
                            anchor: left,
                        },
                    ],
                    width_valid: true,
                }
            } else {
                LayoutResult {
                    pages: [first, second]
                        .into_iter()
                        .map(|source| PageLayout {
                            source,
                            scaled: fit_page(source, params, Cell::Full),
                            anchor: Anchor::Center,
                        })
                        .collect(),
                    width_valid: false,
                }
            }
        }
        [first, ..] => LayoutResult {
            pages: vec![PageLayout {
                source: *first,
                scaled: fit_page(*first, params, Cell::Full),
                anchor: Anchor::Center,
            }],
            width_valid: true,
        },
        [] => LayoutResult {
            pages: Vec::new(),
            width_valid: true,
        },
    }
}

/// Truncate a scaled dimension to whole pixels, never below one
fn clamp_dimension(value: f64) -> u32 {
    if value.is_finite() && value >= 1.0 {
        value.floor().min(u32::MAX as f64) as u32
    } else {
        1
    }
}
