//! Markdown front-end: builds a [`Document`] arena from `pulldown-cmark` events.
use pulldown_cmark::Alignment;
use pulldown_cmark::Event;
use pulldown_cmark::HeadingLevel;
use pulldown_cmark::Options;
use pulldown_cmark::Parser;
use pulldown_cmark::Tag;
use pulldown_cmark::TagEnd;

use crate::tree::Document;
use crate::tree::ListFlags;
use crate::tree::NodeId;
use crate::tree::NodeKind;
use crate::tree::RowRole;
use crate::tree::SourceAlignment;

#[derive(Clone, Copy, Debug)]
struct Open {
    id: NodeId,
    /// Paragraph opened by the builder around the inline content of a tight list item.
    implicit: bool,
}

struct TreeBuilder {
    doc: Document,
    stack: Vec<Open>,
    list_flags: Vec<ListFlags>,
    table_aligns: Vec<Alignment>,
    in_table_head: bool,
    cell_index: usize,
    skip_text_depth: usize,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            doc: Document::new(),
            stack: vec![Open {
                id: Document::ROOT,
                implicit: false,
            }],
            list_flags: Vec::new(),
            table_aligns: Vec::new(),
            in_table_head: false,
            cell_index: 0,
            skip_text_depth: 0,
        }
    }

    fn parent(&self) -> NodeId {
        self.stack.last().map(|o| o.id).unwrap_or(Document::ROOT)
    }

    fn close_implicit(&mut self) {
        if self.stack.last().is_some_and(|o| o.implicit) {
            self.stack.pop();
        }
    }

    /// Inline content directly inside a list item gets wrapped in a paragraph, so tight and
    /// loose lists produce the same tree shape.
    fn inline_parent(&mut self) -> NodeId {
        let parent = self.parent();
        if matches!(self.doc.kind(parent), NodeKind::ListItem(_)) {
            let id = self.doc.append(parent, NodeKind::Paragraph);
            self.stack.push(Open { id, implicit: true });
            return id;
        }
        parent
    }

    fn open(&mut self, kind: NodeKind, inline: bool) {
        let parent = if inline {
            self.inline_parent()
        } else {
            self.close_implicit();
            self.parent()
        };
        let id = self.doc.append(parent, kind);
        self.stack.push(Open {
            id,
            implicit: false,
        });
    }

    fn close(&mut self) {
        self.close_implicit();
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    fn leaf(&mut self, kind: NodeKind) {
        let parent = self.inline_parent();
        self.doc.append(parent, kind);
    }

    fn text(&mut self, text: &str) {
        if self.skip_text_depth > 0 {
            return;
        }
        let parent = self.inline_parent();
        if let Some(last) = self.doc.last_child(parent)
            && let NodeKind::Text(existing) = self.doc.kind_mut(last)
        {
            existing.push_str(text);
            return;
        }
        self.doc.append(parent, NodeKind::Text(text.to_string()));
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.open(NodeKind::Paragraph, false),
            Tag::Heading { level, .. } => self.open(NodeKind::Heading(heading_level(level)), false),
            Tag::BlockQuote(_) => self.open(NodeKind::BlockQuote, false),
            Tag::List(start) => {
                let flags = ListFlags {
                    ordered: start.is_some(),
                    definition: false,
                };
                self.list_flags.push(flags);
                self.open(NodeKind::List(flags), false);
            }
            Tag::Item => {
                let flags = self.list_flags.last().copied().unwrap_or_default();
                self.open(NodeKind::ListItem(flags), false);
            }
            Tag::Strong => self.open(NodeKind::Strong, true),
            Tag::Link { dest_url, .. } => self.open(
                NodeKind::Link {
                    destination: dest_url.to_string(),
                },
                true,
            ),
            Tag::Image { dest_url, .. } => self.open(
                NodeKind::Image {
                    destination: dest_url.to_string(),
                },
                true,
            ),
            Tag::Table(aligns) => {
                self.table_aligns = aligns;
                self.open(NodeKind::Table, false);
            }
            Tag::TableHead => {
                self.in_table_head = true;
                self.cell_index = 0;
                self.open(NodeKind::TableRow(RowRole::Header), false);
            }
            Tag::TableRow => {
                self.cell_index = 0;
                self.open(NodeKind::TableRow(RowRole::Body), false);
            }
            Tag::TableCell => {
                let alignment = match self.table_aligns.get(self.cell_index) {
                    Some(Alignment::Left) => Some(SourceAlignment::Left),
                    Some(Alignment::Center) => Some(SourceAlignment::Center),
                    Some(Alignment::Right) => Some(SourceAlignment::Right),
                    Some(Alignment::None) | None => None,
                };
                self.cell_index += 1;
                let is_header = self.in_table_head;
                self.open(
                    NodeKind::TableCell {
                        is_header,
                        alignment,
                    },
                    false,
                );
            }
            Tag::Emphasis => self.open(NodeKind::Other("emphasis"), true),
            Tag::Strikethrough => self.open(NodeKind::Other("strikethrough"), true),
            Tag::CodeBlock(_) => {
                self.skip_text_depth += 1;
                self.open(NodeKind::Other("code_block"), false);
            }
            Tag::HtmlBlock => {
                self.skip_text_depth += 1;
                self.open(NodeKind::Other("html_block"), false);
            }
            other => {
                log::trace!("markdown tag without a tree counterpart: {other:?}");
                self.open(NodeKind::Other("unsupported"), false);
            }
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::List(_) => {
                self.list_flags.pop();
            }
            TagEnd::TableHead => self.in_table_head = false,
            TagEnd::Table => self.table_aligns.clear(),
            TagEnd::CodeBlock | TagEnd::HtmlBlock => {
                self.skip_text_depth = self.skip_text_depth.saturating_sub(1);
            }
            _ => {}
        }
        self.close();
    }

    fn event(&mut self, ev: Event<'_>) {
        match ev {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::SoftBreak | Event::HardBreak => self.text("\n"),
            Event::Code(_) => self.leaf(NodeKind::Other("code")),
            Event::Html(_) | Event::InlineHtml(_) => {
                if self.skip_text_depth == 0 {
                    self.leaf(NodeKind::Other("html"));
                }
            }
            Event::Rule => {
                self.close_implicit();
                let parent = self.parent();
                self.doc.append(parent, NodeKind::Other("rule"));
            }
            other => {
                log::trace!("markdown event ignored: {other:?}");
            }
        }
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

impl Document {
    /// Parses markdown `source` (CommonMark plus tables and strikethrough) into a tree.
    pub fn parse_markdown(source: &str) -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        let mut builder = TreeBuilder::new();
        for ev in Parser::new_ext(source, options) {
            builder.event(ev);
        }
        builder.doc
    }
}
