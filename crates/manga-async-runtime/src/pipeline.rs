//! Recognition and dictionary pipeline
//!
//! Turns a crop of a page into overlay text: crop, upscale, pick a
//! segmentation mode from the crop's shape, recognize, clean up, look the
//! text up and wrap the result.

use crate::{LookupError, Result};
use image::DynamicImage;
use image::imageops::FilterType;
use manga_reader::{ReaderOptions, ScaleFilter, SourceCrop};
use std::sync::Arc;
use textwrap::WordSeparator;
use textwrap::core::{break_words, display_width};
use textwrap::wrap_algorithms::wrap_first_fit;
use tokio_util::sync::CancellationToken;

/// Upscale factor applied before recognition
pub const UPSCALE_FACTOR: u32 = 3;

/// Crops whose sides are within this ratio are treated as one character
pub const SQUARE_RATIO: f64 = 1.15;

/// Crops wider than this ratio are treated as one horizontal line
pub const LINE_RATIO: f64 = 1.5;

/// Column at which overlay text is wrapped
pub const WRAP_WIDTH: usize = 120;

/// Overlay text when nothing usable came out of recognition
pub const NOTHING_RECOGNIZED: &str = "Nothing recognized";

/// Characters removed from recognized text
const SPECIAL_CHARS: &str = "{}[]!\"§$%&/()\n\\.,-~' ";

/// Page segmentation mode passed to the recognizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segmentation {
    /// One vertical block of text
    VerticalBlock,
    SingleLine,
    SingleChar,
}

impl Segmentation {
    /// Pick the mode from the crop's shape
    pub fn for_size(width: u32, height: u32) -> Self {
        let (w, h) = (width.max(1) as f64, height.max(1) as f64);
        if w > h * LINE_RATIO {
            Segmentation::SingleLine
        } else if w / h < SQUARE_RATIO && h / w < SQUARE_RATIO {
            Segmentation::SingleChar
        } else {
            Segmentation::VerticalBlock
        }
    }

    /// Tesseract `--psm` value
    pub fn psm(self) -> u8 {
        match self {
            Segmentation::VerticalBlock => 5,
            Segmentation::SingleLine => 7,
            Segmentation::SingleChar => 10,
        }
    }
}

/// Text recognition backend. Implementations stop early once `cancel` fires.
pub trait Recognizer: Send + Sync {
    fn recognize(
        &self,
        image: &DynamicImage,
        mode: Segmentation,
        cancel: &CancellationToken,
    ) -> Result<String>;
}

/// Dictionary backend; `Ok(None)` when the word is unknown
pub trait Dictionary: Send + Sync {
    fn lookup(&self, text: &str, cancel: &CancellationToken) -> Result<Option<String>>;
}

pub fn filter_type(filter: ScaleFilter) -> FilterType {
    match filter {
        ScaleFilter::Nearest => FilterType::Nearest,
        ScaleFilter::Bilinear => FilterType::Triangle,
        ScaleFilter::Bicubic => FilterType::CatmullRom,
        ScaleFilter::Lanczos => FilterType::Lanczos3,
    }
}

/// Strip surrounding whitespace and punctuation noise
pub fn clean_recognized(text: &str) -> String {
    text.trim()
        .chars()
        .filter(|c| !SPECIAL_CHARS.contains(*c))
        .collect()
}

/// Wrap long lines, leaving short lines and explicit breaks untouched.
///
/// Whitespace is kept as-is: removing the inserted line breaks gives back
/// the input.
pub fn wrap_annotation(text: &str) -> String {
    text.split('\n').map(wrap_line).collect::<Vec<_>>().join("\n")
}

fn wrap_line(line: &str) -> String {
    if display_width(line) <= WRAP_WIDTH {
        return line.to_string();
    }
    let words = break_words(WordSeparator::AsciiSpace.find_words(line), WRAP_WIDTH);
    wrap_first_fit(&words, &[WRAP_WIDTH as f64])
        .iter()
        .map(|words| {
            words
                .iter()
                .flat_map(|word| [word.word, word.whitespace])
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The complete lookup for one selection
#[derive(Clone)]
pub struct LookupPipeline {
    recognizer: Arc<dyn Recognizer>,
    dictionary: Arc<dyn Dictionary>,
    filter: FilterType,
}

impl LookupPipeline {
    pub fn new(
        recognizer: Arc<dyn Recognizer>,
        dictionary: Arc<dyn Dictionary>,
        filter: ScaleFilter,
    ) -> Self {
        Self {
            recognizer,
            dictionary,
            filter: filter_type(filter),
        }
    }

    /// Tesseract and the configured dictionary command
    pub fn from_options(options: &ReaderOptions) -> Self {
        Self::new(
            Arc::new(crate::TesseractCli::new(
                options.ocr_command.clone(),
                options.ocr_language.clone(),
            )),
            Arc::new(crate::CommandDictionary::new(
                options.dictionary_command.clone(),
            )),
            options.scale_method,
        )
    }

    /// Crop, upscale and recognize. Blocking.
    pub fn recognize(
        &self,
        image: &DynamicImage,
        crop: SourceCrop,
        cancel: &CancellationToken,
    ) -> Result<String> {
        if crop.x1 > image.width() || crop.y1 > image.height() || crop.x1 <= crop.x0 || crop.y1 <= crop.y0
        {
            return Err(LookupError::Recognition(format!(
                "crop {:?} outside {}x{} page",
                crop,
                image.width(),
                image.height()
            )));
        }

        let cropped = image.crop_imm(crop.x0, crop.y0, crop.width(), crop.height());
        let scaled = cropped.resize_exact(
            crop.width() * UPSCALE_FACTOR,
            crop.height() * UPSCALE_FACTOR,
            self.filter,
        );
        let mode = Segmentation::for_size(crop.width(), crop.height());
        log::debug!("Recognizing {}x{} crop as {:?}", crop.width(), crop.height(), mode);

        let text = self.recognizer.recognize(&scaled, mode, cancel)?;
        Ok(clean_recognized(&text))
    }

    /// Look up recognized text and format the overlay string. Blocking.
    ///
    /// Dictionary failures fall back to the recognized text.
    pub fn describe(&self, text: &str, cancel: &CancellationToken) -> String {
        let entry = if text.is_empty() {
            None
        } else {
            match self.dictionary.lookup(text, cancel) {
                Ok(entry) => entry,
                Err(LookupError::Cancelled(program)) => {
                    log::debug!("Dictionary lookup for {} cancelled ({})", text, program);
                    None
                }
                Err(e) => {
                    log::warn!("Dictionary lookup for {} failed: {}", text, e);
                    None
                }
            }
        };

        let result = match entry {
            Some(entry) => entry.trim_matches('\n').to_string(),
            None => text.to_string(),
        };

        if result.is_empty() {
            NOTHING_RECOGNIZED.to_string()
        } else {
            wrap_annotation(&result)
        }
    }
}

/// Progress message posted between recognition and dictionary lookup
pub fn progress_message(text: &str) -> String {
    format!("Looking up {}", text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segmentation_for_size() {
        assert_eq!(Segmentation::for_size(100, 105), Segmentation::SingleChar);
        assert_eq!(Segmentation::for_size(400, 100), Segmentation::SingleLine);
        assert_eq!(Segmentation::for_size(100, 400), Segmentation::VerticalBlock);
        assert_eq!(Segmentation::for_size(130, 100), Segmentation::VerticalBlock);
        assert_eq!(Segmentation::SingleChar.psm(), 10);
    }

    #[test]
    fn test_clean_recognized() {
        assert_eq!(clean_recognized("  読(む).\n"), "読む");
        assert_eq!(clean_recognized("a b-c~d"), "abcd");
        assert_eq!(clean_recognized(" \n "), "");
    }

    #[test]
    fn test_wrap_annotation() {
        let long = "word ".repeat(40);
        let wrapped = wrap_annotation(long.trim_end());
        assert!(wrapped.lines().all(|line| line.trim_end().len() <= WRAP_WIDTH));
        assert!(wrapped.lines().count() > 1);

        assert_eq!(wrap_annotation("  indented\nnext"), "  indented\nnext");
    }

    #[test]
    fn test_wrap_annotation_keeps_whitespace() {
        let long = format!("  {}", "word  two ".repeat(20));
        let wrapped = wrap_annotation(&long);

        assert!(wrapped.lines().count() > 1);
        assert!(wrapped.starts_with("  word  two"));
        assert_eq!(wrapped.replace('\n', ""), long);
        assert!(wrapped.lines().all(|line| line.trim_end().len() <= WRAP_WIDTH));
    }

    #[test]
    fn test_wrap_annotation_breaks_long_words() {
        let long = "x".repeat(WRAP_WIDTH * 2 + 10);
        let wrapped = wrap_annotation(&long);
        assert_eq!(wrapped.lines().count(), 3);
        assert_eq!(wrapped.replace('\n', ""), long);
    }
}
