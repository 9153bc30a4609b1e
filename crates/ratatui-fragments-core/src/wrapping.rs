//! Word-flow layout.
//!
//! Words are placed left to right and break onto a new line only at word boundaries. A word
//! wider than the whole line is split at display-column boundaries. Words may carry a tag
//! (for example a link id); the layout reports the cells each tagged word occupies so a paint
//! layer can hit-test them.
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use unicode_width::UnicodeWidthStr;

use crate::render::spans_width;
use crate::render::split_to_width;

/// One measurable unit of a flow.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowWord<T> {
    pub text: String,
    pub style: Style,
    /// Whether a single space separates this word from the next one.
    pub space_after: bool,
    pub tag: Option<T>,
}

impl<T> FlowWord<T> {
    pub fn new(text: impl Into<String>, style: Style, space_after: bool) -> Self {
        Self {
            text: text.into(),
            style,
            space_after,
            tag: None,
        }
    }

    pub fn tagged(mut self, tag: T) -> Self {
        self.tag = Some(tag);
        self
    }
}

/// Cells covered by (part of) a tagged word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaggedArea<T> {
    pub tag: T,
    pub line: usize,
    pub x: u16,
    pub width: u16,
}

#[derive(Clone, Debug)]
pub struct Flowed<T> {
    pub lines: Vec<Line<'static>>,
    pub areas: Vec<TaggedArea<T>>,
}

impl<T> Default for Flowed<T> {
    fn default() -> Self {
        Self {
            lines: Vec::new(),
            areas: Vec::new(),
        }
    }
}

/// Lays out `words` inside `width` cells.
///
/// The first line starts with `prefix`; continuation lines start with `indent` spaces. A
/// prefix without any words still produces one line.
pub fn flow_words<T: Copy>(
    prefix: &[Span<'static>],
    indent: u16,
    words: &[FlowWord<T>],
    width: u16,
    gap_style: Style,
) -> Flowed<T> {
    let mut out = Flowed::default();
    if width == 0 {
        return out;
    }
    let width = width as usize;
    let indent = (indent as usize).min(width.saturating_sub(1));

    let mut cur: Vec<Span<'static>> = prefix.to_vec();
    let mut cur_cols = spans_width(prefix);
    let mut has_words = false;
    let mut pending_gap = false;

    let new_line = |out: &mut Flowed<T>, cur: &mut Vec<Span<'static>>, cur_cols: &mut usize| {
        out.lines.push(Line::from(std::mem::take(cur)));
        if indent > 0 {
            cur.push(Span::raw(" ".repeat(indent)));
        }
        *cur_cols = indent;
    };

    for word in words {
        if word.text.is_empty() {
            continue;
        }
        let word_cols = UnicodeWidthStr::width(word.text.as_str());
        let gap = usize::from(has_words && pending_gap);

        if has_words && cur_cols + gap + word_cols > width {
            new_line(&mut out, &mut cur, &mut cur_cols);
        } else if gap > 0 {
            cur.push(Span::styled(" ", gap_style));
            cur_cols += 1;
        }

        let mut rest = word.text.as_str();
        loop {
            let room = width.saturating_sub(cur_cols);
            // Only a prefix can fill the line before any word is placed.
            if room == 0 {
                new_line(&mut out, &mut cur, &mut cur_cols);
                continue;
            }
            let rest_cols = UnicodeWidthStr::width(rest);
            let (head, tail) = if rest_cols <= room {
                (rest, "")
            } else {
                split_to_width(rest, room)
            };
            let head_cols = UnicodeWidthStr::width(head);
            if let Some(tag) = word.tag {
                out.areas.push(TaggedArea {
                    tag,
                    line: out.lines.len(),
                    x: cur_cols as u16,
                    width: head_cols as u16,
                });
            }
            cur.push(Span::styled(head.to_string(), word.style));
            cur_cols += head_cols;
            if tail.is_empty() {
                break;
            }
            new_line(&mut out, &mut cur, &mut cur_cols);
            rest = tail;
        }

        has_words = true;
        pending_gap = word.space_after;
    }

    if has_words || !prefix.is_empty() {
        out.lines.push(Line::from(cur));
    }
    out
}
