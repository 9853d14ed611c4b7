pub mod constants;
#[cfg(feature = "serde")]
mod history;
mod keymap;
pub mod layout;
pub mod navigation;
mod options;
pub mod overlay;
mod selection;
mod state;
mod types;

#[cfg(feature = "serde")]
pub use history::LastPageStore;
pub use keymap::{KeyBinding, KeyModifiers, Keymap};
pub use layout::{Anchor, LayoutParams, LayoutResult, PageLayout, compute_layout, place};
pub use navigation::KeyAction;
pub use options::{ReaderOptions, app_data_dir};
pub use overlay::{OverlayColor, OverlayLayout, OverlaySegment, PositionedRun, layout_overlay};
pub use selection::{PageHit, SourceCrop, map_selection, map_spread_selection};
pub use state::*;
pub use types::*;
