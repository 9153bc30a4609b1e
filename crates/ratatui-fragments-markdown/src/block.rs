//! Render blocks: the ordered output of a document walk.
//!
//! Blocks are width-independent. [`RenderBlock::layout`] turns one into styled lines for a
//! given width; callers typically cache the result per width.
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui_fragments_core::theme::Theme;
use ratatui_fragments_core::wrapping::FlowWord;
use ratatui_fragments_core::wrapping::flow_words;
use unicode_width::UnicodeWidthStr;

use crate::links::LinkId;
use crate::table::TableBlock;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStyle {
    Body,
    Heading(u8),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Word {
    pub text: String,
    pub strong: bool,
    /// Style from inline style tags, patched over the run style.
    pub style: Option<Style>,
    pub space_after: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Unit {
    Word(Word),
    Link {
        id: LinkId,
        text: String,
        space_after: bool,
    },
}

impl Unit {
    pub fn text(&self) -> &str {
        match self {
            Unit::Word(w) => &w.text,
            Unit::Link { text, .. } => text,
        }
    }

    pub fn space_after(&self) -> bool {
        match self {
            Unit::Word(w) => w.space_after,
            Unit::Link { space_after, .. } => *space_after,
        }
    }

    pub(crate) fn set_space_after(&mut self, value: bool) {
        match self {
            Unit::Word(w) => w.space_after = value,
            Unit::Link { space_after, .. } => *space_after = value,
        }
    }

    pub fn link(&self) -> Option<LinkId> {
        match self {
            Unit::Link { id, .. } => Some(*id),
            Unit::Word(_) => None,
        }
    }
}

/// A run of inline units sharing one base style, e.g. a paragraph or heading.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextRun {
    pub style: RunStyle,
    /// List marker and nesting indent, shown before the first unit only.
    pub prefix: String,
    pub units: Vec<Unit>,
}

impl TextRun {
    /// Plain text with single spaces where the source had whitespace.
    pub fn plain(&self) -> String {
        let mut out = self.prefix.clone();
        for (i, unit) in self.units.iter().enumerate() {
            out.push_str(unit.text());
            if unit.space_after() && i + 1 < self.units.len() {
                out.push(' ');
            }
        }
        out
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Spacer {
    pub height: u16,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RenderBlock {
    Text(TextRun),
    Spacer(Spacer),
    Table(TableBlock),
}

/// Cells covered by a link after layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinkArea {
    pub id: LinkId,
    pub line: usize,
    pub x: u16,
    pub width: u16,
}

#[derive(Clone, Debug, Default)]
pub struct Measured {
    pub lines: Vec<Line<'static>>,
    pub links: Vec<LinkArea>,
}

impl Measured {
    pub fn height(&self) -> usize {
        self.lines.len()
    }

    /// Appends `other` below `self`, shifting its link areas.
    pub fn append(&mut self, other: Measured) {
        let offset = self.lines.len();
        self.lines.extend(other.lines);
        self.links.extend(other.links.into_iter().map(|mut a| {
            a.line += offset;
            a
        }));
    }
}

impl RenderBlock {
    pub fn layout(&self, width: u16, theme: &Theme) -> Measured {
        match self {
            RenderBlock::Text(run) => layout_run(run, width, theme),
            RenderBlock::Spacer(spacer) => Measured {
                lines: vec![Line::default(); spacer.height as usize],
                links: Vec::new(),
            },
            RenderBlock::Table(table) => Measured {
                lines: table.layout(width, theme),
                links: Vec::new(),
            },
        }
    }

    pub fn as_text_run(&self) -> Option<&TextRun> {
        match self {
            RenderBlock::Text(run) => Some(run),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&TableBlock> {
        match self {
            RenderBlock::Table(table) => Some(table),
            _ => None,
        }
    }
}

fn run_base_style(run: &TextRun, theme: &Theme) -> Style {
    match run.style {
        RunStyle::Body => theme.text_primary,
        RunStyle::Heading(level) => theme.text_primary.patch(theme.heading(level)),
    }
}

fn layout_run(run: &TextRun, width: u16, theme: &Theme) -> Measured {
    let base = run_base_style(run, theme);
    let words: Vec<FlowWord<LinkId>> = run
        .units
        .iter()
        .map(|unit| match unit {
            Unit::Word(w) => {
                let mut style = base;
                if w.strong {
                    style = style.patch(theme.strong);
                }
                if let Some(s) = w.style {
                    style = style.patch(s);
                }
                FlowWord::new(w.text.clone(), style, w.space_after)
            }
            Unit::Link {
                id,
                text,
                space_after,
            } => FlowWord::new(text.clone(), base.patch(theme.link), *space_after).tagged(*id),
        })
        .collect();

    let prefix: Vec<Span<'static>> = if run.prefix.is_empty() {
        Vec::new()
    } else {
        vec![Span::styled(run.prefix.clone(), theme.text_muted)]
    };
    let indent = UnicodeWidthStr::width(run.prefix.as_str()) as u16;

    let flowed = flow_words(&prefix, indent, &words, width, base);
    Measured {
        lines: flowed.lines,
        links: flowed
            .areas
            .into_iter()
            .map(|a| LinkArea {
                id: a.tag,
                line: a.line,
                x: a.x,
                width: a.width,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Modifier;
    use ratatui_fragments_core::render::join_spans_plain;

    fn word(text: &str, strong: bool, space_after: bool) -> Unit {
        Unit::Word(Word {
            text: text.into(),
            strong,
            style: None,
            space_after,
        })
    }

    fn plain_lines(m: &Measured) -> Vec<String> {
        m.lines.iter().map(|l| join_spans_plain(&l.spans)).collect()
    }

    #[test]
    fn text_run_wraps_and_styles_strong_words() {
        let run = TextRun {
            style: RunStyle::Body,
            prefix: String::new(),
            units: vec![
                word("Hello", false, true),
                word("World", true, false),
                word("!", false, false),
            ],
        };
        let theme = Theme::default();
        let m = RenderBlock::Text(run.clone()).layout(40, &theme);
        assert_eq!(plain_lines(&m), vec!["Hello World!"]);
        let bold = m.lines[0]
            .spans
            .iter()
            .find(|s| s.content == "World")
            .map(|s| s.style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(bold, Some(true));
        assert_eq!(run.plain(), "Hello World!");
    }

    #[test]
    fn list_prefix_hangs_continuation_lines() {
        let run = TextRun {
            style: RunStyle::Body,
            prefix: " • ".into(),
            units: vec![
                word("alpha", false, true),
                word("beta", false, true),
                word("gamma", false, false),
            ],
        };
        let m = RenderBlock::Text(run).layout(12, &Theme::default());
        assert_eq!(plain_lines(&m), vec![" • alpha", "   beta", "   gamma"]);
    }

    #[test]
    fn links_report_their_cells() {
        let run = TextRun {
            style: RunStyle::Body,
            prefix: String::new(),
            units: vec![
                word("see", false, true),
                Unit::Link {
                    id: LinkId(0),
                    text: "docs".into(),
                    space_after: false,
                },
            ],
        };
        let m = RenderBlock::Text(run).layout(40, &Theme::default());
        assert_eq!(
            m.links,
            vec![LinkArea {
                id: LinkId(0),
                line: 0,
                x: 4,
                width: 4
            }]
        );
    }

    #[test]
    fn spacer_reports_fixed_height() {
        let theme = Theme::default();
        assert_eq!(
            RenderBlock::Spacer(Spacer { height: 2 })
                .layout(10, &theme)
                .height(),
            2
        );
        assert_eq!(
            RenderBlock::Spacer(Spacer { height: 0 })
                .layout(10, &theme)
                .height(),
            0
        );
    }

    #[test]
    fn append_shifts_link_lines() {
        let mut a = Measured {
            lines: vec![Line::default(); 3],
            links: Vec::new(),
        };
        a.append(Measured {
            lines: vec![Line::default()],
            links: vec![LinkArea {
                id: LinkId(1),
                line: 0,
                x: 0,
                width: 1,
            }],
        });
        assert_eq!(a.height(), 4);
        assert_eq!(a.links[0].line, 3);
    }
}
