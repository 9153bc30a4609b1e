//! Document walker: turns enter/exit events into render blocks.
//!
//! Inline text accumulates in a string buffer until a flush point (paragraph, heading or
//! strong boundary). A flush splits the buffer into words (or runs it through the style-tag
//! scanner for HTML fragments) and appends them to the pending run; paragraph and heading
//! exits commit the run as one block.
//!
//! Links are written into the buffer as placeholder tokens so they travel through word
//! splitting and the scanner like any other word; tokens are turned back into link units
//! when the run is built.
use url::Url;

use crate::block::RenderBlock;
use crate::block::RunStyle;
use crate::block::Spacer;
use crate::block::TextRun;
use crate::block::Unit;
use crate::block::Word;
use crate::links::LinkId;
use crate::links::LinkRegistry;
use crate::links::resolve_destination;
use crate::options::RenderOptions;
use crate::style_tags::Fragment;
use crate::style_tags::StyleStack;
use crate::style_tags::scan;
use crate::table::CellAlignment;
use crate::table::TableBuilder;
use crate::tree::Document;
use crate::tree::NodeId;
use crate::tree::NodeKind;
use crate::tree::Phase;
use crate::tree::RowRole;
use crate::tree::SourceAlignment;
use crate::tree::WalkStatus;

/// Delimits a link placeholder token: `\u{FFFC}<index>\u{FFFC}`.
const LINK_TOKEN: char = '\u{FFFC}';

#[derive(Clone, Debug)]
struct PendingLink {
    id: LinkId,
    text: String,
}

enum Piece<'a> {
    Text(&'a str),
    Link(usize),
}

pub(crate) struct Walker<'o> {
    options: &'o RenderOptions,
    base_url: Option<Url>,
    is_html: bool,

    blocks: Vec<RenderBlock>,
    links: LinkRegistry,
    pending_links: Vec<PendingLink>,

    buffer: String,
    pads: Vec<String>,
    line_prefix: String,
    styles: StyleStack,
    run: Vec<Unit>,
    run_prefix: String,
    strong_depth: usize,
    list_spacing: bool,

    table: Option<TableBuilder>,
}

impl<'o> Walker<'o> {
    pub(crate) fn new(options: &'o RenderOptions, is_html: bool) -> Self {
        let base_url = options.base_url.as_deref().and_then(|b| match Url::parse(b) {
            Ok(u) => Some(u),
            Err(err) => {
                log::debug!("ignoring invalid base url {b:?}: {err}");
                None
            }
        });
        Self {
            options,
            base_url,
            is_html,
            blocks: Vec::new(),
            links: LinkRegistry::new(),
            pending_links: Vec::new(),
            buffer: String::new(),
            pads: Vec::new(),
            line_prefix: String::new(),
            styles: StyleStack::new(),
            run: Vec::new(),
            run_prefix: String::new(),
            strong_depth: 0,
            list_spacing: false,
            table: None,
        }
    }

    pub(crate) fn finish(self) -> (Vec<RenderBlock>, LinkRegistry) {
        (self.blocks, self.links)
    }

    pub(crate) fn visit(&mut self, doc: &Document, id: NodeId, phase: Phase) -> WalkStatus {
        let entering = phase == Phase::Enter;
        match doc.kind(id) {
            NodeKind::Document => {
                if !entering {
                    self.flush_leftovers();
                }
            }
            NodeKind::BlockQuote => {}
            NodeKind::List(_) => self.list(doc, id, entering),
            NodeKind::ListItem(flags) => {
                if entering {
                    self.list_item(doc, id, flags.ordered, flags.definition);
                }
            }
            NodeKind::Paragraph => {
                if !entering {
                    self.flush_text();
                    self.commit_run(RunStyle::Body);
                    self.empty_line();
                }
            }
            NodeKind::Heading(level) => {
                if !entering {
                    self.flush_text();
                    self.commit_run(RunStyle::Heading(*level));
                    self.empty_line();
                }
            }
            NodeKind::Strong => self.strong(entering),
            NodeKind::Link { destination } => {
                if entering {
                    self.link(doc, id, destination);
                    return WalkStatus::SkipChildren;
                }
            }
            NodeKind::Text(literal) => {
                if entering {
                    self.text(doc, id, literal);
                }
            }
            NodeKind::Table => self.table(entering),
            NodeKind::TableRow(role) => {
                if entering && matches!(role, RowRole::Body | RowRole::Footer) {
                    match self.table.as_mut() {
                        Some(table) => table.begin_body_row(),
                        None => log::debug!("table row outside of a table"),
                    }
                }
            }
            NodeKind::TableCell {
                is_header,
                alignment,
            } => {
                if !entering {
                    self.table_cell(*is_header, *alignment);
                }
            }
            NodeKind::Image { .. } => {}
            NodeKind::Other(name) => {
                if entering {
                    log::trace!("ignoring {name} node");
                }
            }
        }
        WalkStatus::Continue
    }

    fn pad(&self) -> String {
        self.pads.concat()
    }

    fn list(&mut self, doc: &Document, id: NodeId, entering: bool) {
        let nested = doc
            .parent(id)
            .is_some_and(|p| matches!(doc.kind(p), NodeKind::ListItem(_)));
        if entering {
            let pad = if nested {
                self.options.nested_list_indent.clone()
            } else {
                String::new()
            };
            self.pads.push(pad);
            return;
        }

        self.pads.pop();
        // Extra blank line after a list, unless another list follows or this one is nested.
        if let Some(next) = doc.next_sibling(id)
            && !matches!(doc.kind(next), NodeKind::List(_))
            && !nested
        {
            self.empty_line();
        }
    }

    fn list_item(&mut self, doc: &Document, id: NodeId, ordered: bool, definition: bool) {
        self.list_spacing = true;
        let marker = if ordered {
            format!("{}. ", doc.position_in_parent(id) + 1)
        } else if definition {
            " ".to_string()
        } else {
            format!(" {} ", self.options.bullet)
        };
        self.line_prefix.push_str(&marker);
    }

    fn strong(&mut self, entering: bool) {
        if self.table.is_some() {
            return;
        }
        self.flush_text();
        if entering {
            self.strong_depth += 1;
        } else {
            self.strong_depth = self.strong_depth.saturating_sub(1);
        }
    }

    fn link(&mut self, doc: &Document, id: NodeId, destination: &str) {
        let dest = resolve_destination(self.base_url.as_ref(), destination);
        let link_id = self.links.get_or_insert(&dest);

        let mut text = String::new();
        collect_text(doc, id, &mut text);
        let text = remove_line_break(text.trim());
        let text = if text.is_empty() {
            log::debug!("link to {dest:?} has no text; showing the destination");
            dest
        } else {
            text
        };

        let index = self.pending_links.len();
        self.pending_links.push(PendingLink { id: link_id, text });
        self.buffer.push(LINK_TOKEN);
        self.buffer.push_str(&index.to_string());
        self.buffer.push(LINK_TOKEN);
    }

    fn text(&mut self, doc: &Document, id: NodeId, literal: &str) {
        if literal == "\n" {
            return;
        }
        let stripped;
        let literal = if literal.contains(LINK_TOKEN) {
            log::debug!("dropping reserved link token characters from text");
            stripped = literal.replace(LINK_TOKEN, "");
            stripped.as_str()
        } else {
            literal
        };
        if should_clean_text(doc, id) {
            self.buffer.push_str(&remove_line_break(literal));
        } else {
            self.buffer.push_str(literal);
        }
    }

    fn table(&mut self, entering: bool) {
        if entering {
            self.table = Some(
                TableBuilder::new()
                    .with_column_cap(self.options.column_cap)
                    .with_row_padding(self.options.table_row_padding),
            );
            return;
        }
        if let Some(table) = self.table.take() {
            self.blocks.push(RenderBlock::Table(table.finish()));
        }
    }

    fn table_cell(&mut self, is_header: bool, alignment: Option<SourceAlignment>) {
        let raw = std::mem::take(&mut self.buffer);
        let content = self.resolve_tokens(raw.trim());
        let Some(table) = self.table.as_mut() else {
            log::debug!("table cell outside of a table: {content:?}");
            return;
        };
        if is_header {
            let align = match alignment {
                Some(SourceAlignment::Right) => CellAlignment::Right,
                Some(SourceAlignment::Center) => CellAlignment::Center,
                _ => CellAlignment::Left,
            };
            table.add_header_cell(content, align);
        } else {
            if table.body_rows() == 0 {
                log::debug!("body cell before any body row; starting one");
                table.begin_body_row();
            }
            table.add_body_cell(content, CellAlignment::InheritFromHeader);
        }
    }

    /// Replaces link tokens with their display text.
    fn resolve_tokens(&self, text: &str) -> String {
        let mut out = String::new();
        for piece in split_link_tokens(text) {
            match piece {
                Piece::Text(t) => out.push_str(t),
                Piece::Link(i) => {
                    if let Some(link) = self.pending_links.get(i) {
                        out.push_str(&link.text);
                    }
                }
            }
        }
        out
    }

    /// Moves the buffered text into the pending run.
    ///
    /// The one-shot line prefix is consumed by the first flush after it was set, whether or
    /// not the buffer held any words.
    fn flush_text(&mut self) {
        let content = std::mem::take(&mut self.buffer);
        let prefix = std::mem::take(&mut self.line_prefix);
        if !prefix.is_empty() {
            self.run_prefix.push_str(&prefix);
        }

        if content.starts_with(char::is_whitespace)
            && let Some(last) = self.run.last_mut()
        {
            last.set_space_after(true);
        }

        let fragments = if self.is_html {
            scan(&content, &mut self.styles)
        } else {
            plain_fragments(&content)
        };
        let strong = self.strong_depth > 0;
        for fragment in fragments {
            self.push_fragment(fragment, strong);
        }
    }

    fn push_fragment(&mut self, fragment: Fragment, strong: bool) {
        let pieces: Vec<Piece<'_>> = split_link_tokens(&fragment.text);
        let count = pieces.len();
        let mut units = Vec::with_capacity(count);
        for (i, piece) in pieces.into_iter().enumerate() {
            let space_after = i + 1 == count && fragment.space_after;
            match piece {
                Piece::Text(text) => units.push(Unit::Word(Word {
                    text: text.to_string(),
                    strong,
                    style: fragment.style,
                    space_after,
                })),
                Piece::Link(index) => match self.pending_links.get(index) {
                    Some(link) => units.push(Unit::Link {
                        id: link.id,
                        text: link.text.clone(),
                        space_after,
                    }),
                    None => log::debug!("dangling link token {index}"),
                },
            }
        }
        self.run.extend(units);
    }

    fn commit_run(&mut self, style: RunStyle) {
        let units = std::mem::take(&mut self.run);
        let run_prefix = std::mem::take(&mut self.run_prefix);
        if units.is_empty() && run_prefix.trim().is_empty() {
            log::trace!("skipping empty text run");
            return;
        }
        let mut prefix = self.pad();
        prefix.push_str(&run_prefix);
        self.blocks.push(RenderBlock::Text(TextRun {
            style,
            prefix,
            units,
        }));
    }

    fn empty_line(&mut self) {
        let height = if self.list_spacing {
            self.list_spacing = false;
            self.options.list_blank_line_height
        } else {
            self.options.blank_line_height
        };
        self.blocks.push(RenderBlock::Spacer(Spacer { height }));
    }

    /// Text that never reached a paragraph or heading (e.g. bare text under the root).
    fn flush_leftovers(&mut self) {
        if self.buffer.trim().is_empty() && self.run.is_empty() {
            return;
        }
        log::debug!("flushing text outside of any block");
        self.flush_text();
        self.commit_run(RunStyle::Body);
    }
}

fn plain_fragments(content: &str) -> Vec<Fragment> {
    let mut out: Vec<Fragment> = content
        .split_whitespace()
        .map(|w| Fragment::plain(w, true))
        .collect();
    if let Some(last) = out.last_mut() {
        last.space_after = content.ends_with(char::is_whitespace);
    }
    out
}

fn split_link_tokens(text: &str) -> Vec<Piece<'_>> {
    let mut out = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find(LINK_TOKEN) {
        let after = &rest[start + LINK_TOKEN.len_utf8()..];
        let Some(end) = after.find(LINK_TOKEN) else {
            break;
        };
        let Ok(index) = after[..end].parse::<usize>() else {
            break;
        };
        if start > 0 {
            out.push(Piece::Text(&rest[..start]));
        }
        out.push(Piece::Link(index));
        rest = &after[end + LINK_TOKEN.len_utf8()..];
    }
    if !rest.is_empty() {
        out.push(Piece::Text(rest));
    }
    out
}

fn collect_text(doc: &Document, id: NodeId, out: &mut String) {
    for child in doc.children(id) {
        match doc.kind(*child) {
            NodeKind::Text(literal) if literal != "\n" => out.push_str(literal),
            _ => collect_text(doc, *child, out),
        }
    }
}

/// Whether multi-line text under `id` should be collapsed onto one line.
///
/// The nearest qualifying ancestor decides: a block quote keeps line breaks; headings,
/// images, links, table cells, list items and the document root collapse them.
fn should_clean_text(doc: &Document, id: NodeId) -> bool {
    for node in std::iter::once(id).chain(doc.ancestors(id)) {
        match doc.kind(node) {
            NodeKind::BlockQuote => return false,
            NodeKind::Heading(_)
            | NodeKind::Image { .. }
            | NodeKind::Link { .. }
            | NodeKind::TableCell { .. }
            | NodeKind::Document
            | NodeKind::ListItem(_) => return true,
            _ => {}
        }
    }
    false
}

/// Joins the lines of `text` with single spaces: the first line is right-trimmed, the last
/// left-trimmed, and interior lines trimmed on both sides.
pub fn remove_line_break(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    if lines.len() <= 1 {
        return text.to_string();
    }
    let last = lines.len() - 1;
    lines
        .iter()
        .enumerate()
        .map(|(i, l)| match i {
            0 => l.trim_end(),
            i if i == last => l.trim_start(),
            _ => l.trim(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
