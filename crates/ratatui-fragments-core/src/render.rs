use ratatui::layout::Alignment;
use ratatui::style::Style;
use ratatui::text::Span;
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

/// Display width of `spans` in terminal cells.
pub fn spans_width(spans: &[Span<'_>]) -> usize {
    spans
        .iter()
        .map(|s| UnicodeWidthStr::width(s.content.as_ref()))
        .sum()
}

pub fn join_spans_plain(spans: &[Span<'_>]) -> String {
    let mut out = String::new();
    for s in spans {
        out.push_str(s.content.as_ref());
    }
    out
}

/// Pads `spans` with spaces up to `width` cells according to `align`.
///
/// Content wider than `width` is returned unchanged.
pub fn pad_spans(
    mut spans: Vec<Span<'static>>,
    width: u16,
    align: Alignment,
    pad_style: Style,
) -> Vec<Span<'static>> {
    let w = spans_width(&spans) as i32;
    let target = width as i32;
    let pad = (target - w).max(0) as usize;
    let (left, right) = match align {
        Alignment::Left => (0, pad),
        Alignment::Right => (pad, 0),
        Alignment::Center => (pad / 2, pad - pad / 2),
    };
    if left > 0 {
        spans.insert(0, Span::styled(" ".repeat(left), pad_style));
    }
    if right > 0 {
        spans.push(Span::styled(" ".repeat(right), pad_style));
    }
    spans
}

/// Splits `s` so that the head fits in `max_cols` cells.
///
/// Zero-width characters stay attached to the preceding character. When even the first
/// character is wider than `max_cols`, it is placed in the head anyway so callers always make
/// progress.
pub fn split_to_width(s: &str, max_cols: usize) -> (&str, &str) {
    let mut cols = 0usize;
    let mut idx = 0usize;
    for (byte_idx, ch) in s.char_indices() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if cols + w > max_cols {
            if idx == 0 {
                idx = byte_idx + ch.len_utf8();
            }
            break;
        }
        cols += w;
        idx = byte_idx + ch.len_utf8();
    }
    s.split_at(idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_according_to_alignment() {
        let left = pad_spans(vec![Span::raw("ab")], 6, Alignment::Left, Style::default());
        assert_eq!(join_spans_plain(&left), "ab    ");
        let right = pad_spans(vec![Span::raw("ab")], 6, Alignment::Right, Style::default());
        assert_eq!(join_spans_plain(&right), "    ab");
        let center = pad_spans(vec![Span::raw("ab")], 7, Alignment::Center, Style::default());
        assert_eq!(join_spans_plain(&center), "  ab   ");
    }

    #[test]
    fn wide_content_is_not_truncated_by_padding() {
        let spans = pad_spans(vec![Span::raw("abcdef")], 3, Alignment::Left, Style::default());
        assert_eq!(join_spans_plain(&spans), "abcdef");
    }

    #[test]
    fn splits_on_display_columns() {
        assert_eq!(split_to_width("abcdef", 4), ("abcd", "ef"));
        assert_eq!(split_to_width("日本語", 4), ("日本", "語"));
        assert_eq!(split_to_width("日本語", 1), ("日", "本語"));
        assert_eq!(split_to_width("", 3), ("", ""));
    }
}
