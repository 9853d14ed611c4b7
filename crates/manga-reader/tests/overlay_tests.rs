use manga_reader::overlay::parse;
use manga_reader::*;

fn text(color: OverlayColor, text: &str) -> OverlaySegment {
    OverlaySegment::Text {
        color,
        text: text.to_string(),
    }
}

#[test]
fn test_dictionary_style_output() {
    let annotated = "\x1b[33m読む\x1b[0m (よむ) \x1b[36mv5m\x1b[0m\n  1. to read";
    assert_eq!(
        parse(annotated),
        vec![
            text(OverlayColor::Yellow, "読む"),
            text(OverlayColor::Default, " (よむ) "),
            text(OverlayColor::Cyan, "v5m"),
            OverlaySegment::LineBreak,
            text(OverlayColor::Default, "  1. to read"),
        ]
    );
}

#[test]
fn test_plain_text_and_empty_input() {
    assert_eq!(
        parse("Nothing recognized"),
        vec![text(OverlayColor::Default, "Nothing recognized")]
    );
    assert!(parse("").is_empty());
}

#[test]
fn test_empty_runs_dropped() {
    assert_eq!(parse("\x1b[31m\x1b[0m"), Vec::<OverlaySegment>::new());
}

#[test]
fn test_text_containing_m_after_code() {
    // Only the first 'm' terminates the code
    assert_eq!(
        parse("\x1b[35mmimi"),
        vec![text(OverlayColor::Magenta, "mimi")]
    );
}

#[test]
fn test_consecutive_line_breaks() {
    assert_eq!(
        parse("a\n\nb"),
        vec![
            text(OverlayColor::Default, "a"),
            OverlaySegment::LineBreak,
            OverlaySegment::LineBreak,
            text(OverlayColor::Default, "b"),
        ]
    );
}

#[test]
fn test_layout_blank_line_advances() {
    let segments = parse("a\n\nb");
    let layout = layout_overlay(&segments, 5.0, |s| (s.len() as f32 * 8.0, 10.0));
    assert_eq!(layout.runs.len(), 2);
    assert_eq!(layout.runs[1].rect.y, 25.0);
    assert_eq!(layout.runs[1].rect.x, 5.0);
}
