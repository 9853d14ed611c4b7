//! Color-coded lookup text
//!
//! Lookup results use terminal color escapes (`ESC [ <code> m`). They are
//! parsed into colored runs and explicit line breaks, then laid out left to
//! right starting at the top-left corner of the canvas.

use crate::constants::{ESCAPE, OVERLAY_PALETTE};
use crate::types::ScreenRect;

/// Overlay palette entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OverlayColor {
    #[default]
    Default,
    Red,
    Green,
    Yellow,
    Magenta,
    Cyan,
}

impl OverlayColor {
    /// Color for an escape code; unknown codes fall back to the default
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "31" => OverlayColor::Red,
            "32" => OverlayColor::Green,
            "33" => OverlayColor::Yellow,
            "35" => OverlayColor::Magenta,
            "36" => OverlayColor::Cyan,
            _ => OverlayColor::Default,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            OverlayColor::Default => "0",
            OverlayColor::Red => "31",
            OverlayColor::Green => "32",
            OverlayColor::Yellow => "33",
            OverlayColor::Magenta => "35",
            OverlayColor::Cyan => "36",
        }
    }

    pub fn rgb(self) -> [u8; 3] {
        let code = self.code();
        OVERLAY_PALETTE
            .iter()
            .find(|(c, _)| *c == code)
            .map_or([0xff, 0xff, 0xff], |(_, rgb)| *rgb)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlaySegment {
    Text { color: OverlayColor, text: String },
    LineBreak,
}

/// Parse an escape-coded string into segments
pub fn parse(annotated: &str) -> Vec<OverlaySegment> {
    let mut segments = Vec::new();

    for chunk in annotated.split(ESCAPE) {
        for (i, piece) in chunk.split('\n').enumerate() {
            if i > 0 {
                segments.push(OverlaySegment::LineBreak);
            }
            push_coded(&mut segments, piece);
        }
    }

    segments
}

fn push_coded(segments: &mut Vec<OverlaySegment>, piece: &str) {
    let (color, text) = match piece.strip_prefix('[') {
        Some(coded) => match coded.split_once('m') {
            Some((code, text)) => (OverlayColor::from_code(code), text),
            None => return,
        },
        None => (OverlayColor::Default, piece),
    };

    if !text.is_empty() {
        segments.push(OverlaySegment::Text {
            color,
            text: text.to_string(),
        });
    }
}

/// A text run with its final screen rectangle
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedRun {
    pub color: OverlayColor,
    pub text: String,
    pub rect: ScreenRect,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OverlayLayout {
    pub runs: Vec<PositionedRun>,
    /// Area covered by all runs, `None` when nothing is drawn
    pub bounds: Option<ScreenRect>,
}

/// Position segments starting at `(margin, margin)`.
///
/// `measure` returns the `(width, height)` of a text run. Each run abuts the
/// previous one; a line break returns to the margin below everything laid
/// out so far.
pub fn layout_overlay<F>(segments: &[OverlaySegment], margin: f32, mut measure: F) -> OverlayLayout
where
    F: FnMut(&str) -> (f32, f32),
{
    let mut layout = OverlayLayout::default();
    let mut x = margin;
    let mut y = margin;
    let mut line_height = measure(" ").1;

    for segment in segments {
        match segment {
            OverlaySegment::Text { color, text } => {
                let (width, height) = measure(text);
                let rect = ScreenRect::new(x, y, width, height);
                layout.bounds = Some(match layout.bounds {
                    Some(bounds) => bounds.union(&rect),
                    None => rect,
                });
                layout.runs.push(PositionedRun {
                    color: *color,
                    text: text.clone(),
                    rect,
                });
                x = rect.right();
                line_height = height;
            }
            OverlaySegment::LineBreak => {
                let bottom = layout.bounds.map_or(margin, |b| b.bottom());
                y = if bottom > y { bottom } else { y + line_height };
                x = margin;
            }
        }
    }

    layout
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(color: OverlayColor, text: &str) -> OverlaySegment {
        OverlaySegment::Text {
            color,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_parse_colored_and_break() {
        assert_eq!(
            parse("\x1b[31mhello\x1b[0m\nworld"),
            vec![
                text(OverlayColor::Red, "hello"),
                OverlaySegment::LineBreak,
                text(OverlayColor::Default, "world"),
            ]
        );
    }

    #[test]
    fn test_parse_unknown_code() {
        assert_eq!(parse("\x1b[99mx"), vec![text(OverlayColor::Default, "x")]);
    }

    #[test]
    fn test_parse_text_after_break_uses_default_color() {
        assert_eq!(
            parse("\x1b[32mone\ntwo"),
            vec![
                text(OverlayColor::Green, "one"),
                OverlaySegment::LineBreak,
                text(OverlayColor::Default, "two"),
            ]
        );
    }

    #[test]
    fn test_palette() {
        assert_eq!(OverlayColor::Red.rgb(), [0xcd, 0x00, 0x00]);
        assert_eq!(OverlayColor::Cyan.rgb(), [0x00, 0xcd, 0xcd]);
        assert_eq!(OverlayColor::Default.rgb(), [0xff, 0xff, 0xff]);
    }

    #[test]
    fn test_layout_abuts_runs() {
        let segments = parse("ab\x1b[31mcde\nf");
        let layout = layout_overlay(&segments, 5.0, |s| (s.chars().count() as f32 * 10.0, 14.0));

        let rects: Vec<_> = layout.runs.iter().map(|r| r.rect).collect();
        assert_eq!(rects[0], ScreenRect::new(5.0, 5.0, 20.0, 14.0));
        assert_eq!(rects[1], ScreenRect::new(25.0, 5.0, 30.0, 14.0));
        assert_eq!(rects[2], ScreenRect::new(5.0, 19.0, 10.0, 14.0));
        assert_eq!(layout.bounds, Some(ScreenRect::new(5.0, 5.0, 50.0, 28.0)));
    }

    #[test]
    fn test_layout_empty() {
        let layout = layout_overlay(&[], 5.0, |_| (10.0, 14.0));
        assert!(layout.runs.is_empty());
        assert_eq!(layout.bounds, None);
    }
}
