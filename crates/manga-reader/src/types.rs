use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReaderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Invalid key binding: {0}")]
    KeyBinding(String),
}

pub type Result<T> = std::result::Result<T, ReaderError>;

/// Pixel dimensions of a decoded page image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Wider than tall (typically a two-page scan)
    pub fn is_landscape(self) -> bool {
        self.width > self.height
    }

    /// Dimensions after applying `rotation` (odd quarter-turns swap the axes)
    pub fn rotated(self, rotation: Rotation) -> Self {
        if rotation.is_odd() {
            Self::new(self.height, self.width)
        } else {
            self
        }
    }
}

/// Size of the drawing surface in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl ViewportSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Integer center point, the pivot every page is anchored on
    pub fn center(self) -> (i32, i32) {
        ((self.width / 2) as i32, (self.height / 2) as i32)
    }
}

/// Clockwise quarter-turns applied to every page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rotation(u8);

impl Rotation {
    /// Wraps any number of quarter-turns into 0..=3
    pub fn new(quarter_turns: u8) -> Self {
        Self(quarter_turns % 4)
    }

    pub fn quarter_turns(self) -> u8 {
        self.0
    }

    pub fn is_odd(self) -> bool {
        self.0 % 2 == 1
    }

    /// One more quarter-turn clockwise
    pub fn next(self) -> Self {
        Self::new(self.0 + 1)
    }
}

/// Which axis (or both) governs page scaling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FitMode {
    /// Largest scale that keeps the whole page visible
    #[default]
    Best,
    /// Page height fills the cell
    Height,
    /// Page width fills the cell
    Width,
}

/// Reading order of the pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReadingDirection {
    /// Right-to-left
    #[default]
    Manga,
    /// Left-to-right
    Western,
}

impl ReadingDirection {
    pub fn from_manga_mode(manga_mode: bool) -> Self {
        if manga_mode {
            ReadingDirection::Manga
        } else {
            ReadingDirection::Western
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ReadingDirection::Manga => ReadingDirection::Western,
            ReadingDirection::Western => ReadingDirection::Manga,
        }
    }
}

/// Direction of a page move relative to the archive order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepDirection {
    Forward,
    Backward,
}

impl StepDirection {
    pub fn sign(self) -> isize {
        match self {
            StepDirection::Forward => 1,
            StepDirection::Backward => -1,
        }
    }
}

/// Resampling filter used when scaling pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ScaleFilter {
    Nearest,
    Bilinear,
    Bicubic,
    #[default]
    Lanczos,
}

/// A point in screen space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in screen space (y grows downwards)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenRect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ScreenRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle spanned by two arbitrary corners
    pub fn from_corners(a: ScreenPoint, b: ScreenPoint) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self::new(x, y, (a.x - b.x).abs(), (a.y - b.y).abs())
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Strict containment, matching the hit-test used for overlay boxes
    pub fn contains(&self, point: ScreenPoint) -> bool {
        point.x > self.x && point.x < self.right() && point.y > self.y && point.y < self.bottom()
    }

    /// Smallest rectangle covering both
    pub fn union(&self, other: &ScreenRect) -> ScreenRect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        ScreenRect::new(x, y, right - x, bottom - y)
    }
}
