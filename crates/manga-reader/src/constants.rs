//! Shared constants for the reader
//!
//! This module centralizes defaults and fixed tables used throughout
//! layout, overlay rendering and the window chrome.

// =============================================================================
// Viewport
// =============================================================================

/// Default canvas width in pixels before the window is first measured
pub const DEFAULT_VIEWPORT_WIDTH: u32 = 500;

/// Default canvas height in pixels
pub const DEFAULT_VIEWPORT_HEIGHT: u32 = 500;

// =============================================================================
// Overlay
// =============================================================================

/// Escape byte that introduces a color code in annotation text
pub const ESCAPE: char = '\x1b';

/// Distance between the canvas corner and the first overlay run
pub const OVERLAY_MARGIN: f32 = 5.0;

/// Point size of overlay text
pub const OVERLAY_FONT_SIZE: f32 = 14.0;

/// Overlay palette as (code, RGB)
pub const OVERLAY_PALETTE: [(&str, [u8; 3]); 6] = [
    ("0", [0xff, 0xff, 0xff]),
    ("31", [0xcd, 0x00, 0x00]),
    ("32", [0x00, 0xcd, 0x00]),
    ("33", [0xcd, 0xcd, 0x00]),
    ("35", [0xcd, 0x00, 0xcd]),
    ("36", [0x00, 0xcd, 0xcd]),
];

// =============================================================================
// Window
// =============================================================================

/// Prefix of the window title
pub const TITLE_PREFIX: &str = "Yurumon reader";

/// File name of the configuration inside the app data directory
pub const CONFIG_FILE_NAME: &str = "config.json";

/// File name of the last-page store inside the app data directory
pub const LAST_PAGE_FILE_NAME: &str = "last_page.json";

/// Directory name under the user's config home
pub const APP_DIR_NAME: &str = "ocr-manga";
