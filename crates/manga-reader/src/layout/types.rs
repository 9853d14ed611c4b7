//! Layout data types
//!
//! These types represent the result of a layout pass, between the raw page
//! dimensions and the rectangles the renderer draws.

use crate::types::{FitMode, ImageSize, ReadingDirection, Rotation, ViewportSize};

/// Which point of an image is pinned to the viewport center
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// Image centered on the point
    Center,
    /// Left edge midpoint on the point (image extends right)
    West,
    /// Top edge midpoint on the point (image extends down)
    North,
    /// Right edge midpoint on the point (image extends left)
    East,
    /// Bottom edge midpoint on the point (image extends up)
    South,
}

/// Everything a layout pass depends on besides the page sizes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    pub viewport: ViewportSize,
    pub rotation: Rotation,
    pub fit_mode: FitMode,
    pub direction: ReadingDirection,
}

/// One scaled page and where it is pinned
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    /// Source dimensions before rotation and scaling
    pub source: ImageSize,
    /// Rotated and scaled dimensions as drawn
    pub scaled: ImageSize,
    pub anchor: Anchor,
}

/// Result of laying out the current page (or pair of pages)
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResult {
    /// One entry in single-page mode, two in spread mode (first page first)
    pub pages: Vec<PageLayout>,
    /// False when the two pages of a spread cannot share the viewport;
    /// only one of them is drawn in that case
    pub width_valid: bool,
}

impl LayoutResult {
    /// Two pages were laid out
    pub fn is_pair(&self) -> bool {
        self.pages.len() == 2
    }

    /// Two pages are drawn side by side (or stacked, under odd rotation)
    pub fn shows_spread(&self) -> bool {
        self.is_pair() && self.width_valid
    }
}
