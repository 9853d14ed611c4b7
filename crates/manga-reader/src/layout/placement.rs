//! Anchor selection and on-screen placement
//!
//! Every page is pinned to the integer center of the viewport. In a spread
//! the two pages sit on opposite sides of that point; which side each page
//! takes depends on the reading direction and the rotation.

use crate::types::{ImageSize, ReadingDirection, Rotation, ScreenRect, ViewportSize};

use super::Anchor;

/// Anchors in clockwise order, indexed by quarter-turns
pub const ANCHOR_TABLE: [Anchor; 4] = [Anchor::West, Anchor::North, Anchor::East, Anchor::South];

/// Anchor `base` quarter-turns into the table, shifted by the rotation
pub fn rotation_adjusted_anchor(rotation: Rotation, base: u8) -> Anchor {
    ANCHOR_TABLE[((rotation.quarter_turns() + base) % 4) as usize]
}

/// Table bases for the (left, right) anchors of each reading direction
fn anchor_bases(direction: ReadingDirection) -> (u8, u8) {
    match direction {
        ReadingDirection::Manga => (2, 0),
        ReadingDirection::Western => (0, 2),
    }
}

/// Anchors for a spread as `(left, right)`.
///
/// The first page of the pair takes `right`, the second takes `left`. With
/// no rotation a manga spread therefore shows the first page on the right.
pub fn spread_anchors(rotation: Rotation, direction: ReadingDirection) -> (Anchor, Anchor) {
    let (left, right) = anchor_bases(direction);
    (
        rotation_adjusted_anchor(rotation, left),
        rotation_adjusted_anchor(rotation, right),
    )
}

/// Screen rectangle of an image of `size` pinned at the viewport center
pub fn place(viewport: ViewportSize, size: ImageSize, anchor: Anchor) -> ScreenRect {
    let (cx, cy) = viewport.center();
    let w = size.width as i32;
    let h = size.height as i32;

    let (x, y) = match anchor {
        Anchor::Center => (cx - w / 2, cy - h / 2),
        Anchor::West => (cx, cy - h / 2),
        Anchor::East => (cx - w, cy - h / 2),
        Anchor::North => (cx - w / 2, cy),
        Anchor::South => (cx - w / 2, cy - h),
    };

    ScreenRect::new(x as f32, y as f32, w as f32, h as f32)
}
