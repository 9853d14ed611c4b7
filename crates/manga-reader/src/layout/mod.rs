//! Page layout and fit calculation
//!
//! This module handles all the geometric calculations for showing pages:
//! - Fit policies (best, height, width) under rotation
//! - Spread validity (can two pages share the viewport width)
//! - Anchor selection and on-screen placement

mod fit;
mod placement;
mod types;

pub use fit::*;
pub use placement::*;
pub use types::*;
