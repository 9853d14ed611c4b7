use crate::constants::{APP_DIR_NAME, DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH};
use crate::navigation::KeyAction;
use crate::types::*;
use std::path::{Path, PathBuf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Reader configuration
///
/// Every field has a default so a partial config file is accepted.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReaderOptions {
    // Layout
    pub fit_mode: FitMode,
    pub double_page: bool,
    pub fullscreen: bool,
    pub manga_mode: bool,
    pub rotation: u8,

    // Initial window size
    pub width: u32,
    pub height: u32,

    pub scale_method: ScaleFilter,

    // Key bindings
    pub next_image: String,
    pub prev_image: String,
    pub single_step_forward: String,
    pub single_step_backward: String,
    pub jump_to_beginning: String,
    pub jump_to_end: String,
    pub rotate: String,
    pub set_best_fit: String,
    pub set_height_fit: String,
    pub set_width_fit: String,
    pub toggle_double_page: String,
    pub toggle_manga_mode: String,
    pub toggle_fullscreen: String,

    // Lookup
    pub ocr_command: String,
    pub ocr_language: String,
    /// Command template, `%q` is replaced by the recognized text
    pub dictionary_command: String,
    /// Font with CJK coverage for the overlay
    pub font_path: Option<PathBuf>,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            fit_mode: FitMode::Best,
            double_page: false,
            fullscreen: false,
            manga_mode: true,
            rotation: 0,
            width: DEFAULT_VIEWPORT_WIDTH,
            height: DEFAULT_VIEWPORT_HEIGHT,
            scale_method: ScaleFilter::Lanczos,
            next_image: "<Left>".to_string(),
            prev_image: "<Right>".to_string(),
            single_step_forward: "<Shift-Left>".to_string(),
            single_step_backward: "<Shift-Right>".to_string(),
            jump_to_beginning: "<Home>".to_string(),
            jump_to_end: "<End>".to_string(),
            rotate: "<r>".to_string(),
            set_best_fit: "<b>".to_string(),
            set_height_fit: "<h>".to_string(),
            set_width_fit: "<w>".to_string(),
            toggle_double_page: "<d>".to_string(),
            toggle_manga_mode: "<m>".to_string(),
            toggle_fullscreen: "<F11>".to_string(),
            ocr_command: "tesseract".to_string(),
            ocr_language: "jpn".to_string(),
            dictionary_command: "myougiden -c %q".to_string(),
            font_path: None,
        }
    }
}

impl ReaderOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| ReaderError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Load options, falling back to defaults when the file is missing or
    /// invalid
    #[cfg(feature = "serde")]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::load(path).and_then(|options| options.validate().map(|_| options)) {
            Ok(options) => options,
            Err(e) => {
                log::warn!("Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ReaderError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if self.rotation > 3 {
            return Err(ReaderError::Config(format!(
                "Rotation must be between 0 and 3, got {}",
                self.rotation
            )));
        }

        if self.width == 0 || self.height == 0 {
            return Err(ReaderError::Config(
                "Window size must be positive".to_string(),
            ));
        }

        if self.ocr_command.trim().is_empty() {
            return Err(ReaderError::Config("OCR command is empty".to_string()));
        }

        if self.dictionary_command.split_whitespace().next().is_none() {
            return Err(ReaderError::Config(
                "Dictionary command is empty".to_string(),
            ));
        }

        for (action, binding) in self.key_bindings() {
            if binding.trim().is_empty() {
                return Err(ReaderError::KeyBinding(format!(
                    "{:?} has no key bound",
                    action
                )));
            }
        }

        Ok(())
    }

    /// The configured binding string of every action
    pub fn key_bindings(&self) -> [(KeyAction, &str); 13] {
        [
            (KeyAction::NextImage, self.next_image.as_str()),
            (KeyAction::PrevImage, self.prev_image.as_str()),
            (KeyAction::SingleStepForward, self.single_step_forward.as_str()),
            (KeyAction::SingleStepBackward, self.single_step_backward.as_str()),
            (KeyAction::JumpToBeginning, self.jump_to_beginning.as_str()),
            (KeyAction::JumpToEnd, self.jump_to_end.as_str()),
            (KeyAction::Rotate, self.rotate.as_str()),
            (KeyAction::SetBestFit, self.set_best_fit.as_str()),
            (KeyAction::SetHeightFit, self.set_height_fit.as_str()),
            (KeyAction::SetWidthFit, self.set_width_fit.as_str()),
            (KeyAction::ToggleDoublePage, self.toggle_double_page.as_str()),
            (KeyAction::ToggleMangaMode, self.toggle_manga_mode.as_str()),
            (KeyAction::ToggleFullscreen, self.toggle_fullscreen.as_str()),
        ]
    }

    pub fn reading_direction(&self) -> ReadingDirection {
        ReadingDirection::from_manga_mode(self.manga_mode)
    }
}

/// Per-user directory holding the config and the last-page store.
///
/// `$XDG_CONFIG_HOME/ocr-manga`, or `~/.config/ocr-manga` when unset.
pub fn app_data_dir() -> Option<PathBuf> {
    let base = match std::env::var_os("XDG_CONFIG_HOME") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from(std::env::var_os("HOME")?).join(".config"),
    };
    Some(base.join(APP_DIR_NAME))
}
