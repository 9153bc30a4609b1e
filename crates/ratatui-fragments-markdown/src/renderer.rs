//! Renderer facade: one walk per document, blocks plus link registry out.
use ratatui::text::Text;
use ratatui_fragments_core::theme::Theme;

use crate::block::Measured;
use crate::block::RenderBlock;
use crate::links::LinkRegistry;
use crate::options::RenderOptions;
use crate::tree::Document;
use crate::walker::Walker;

/// Output of one render: ordered blocks and the links they reference.
#[derive(Clone, Debug, Default)]
pub struct Rendered {
    blocks: Vec<RenderBlock>,
    links: LinkRegistry,
}

impl Rendered {
    pub fn blocks(&self) -> &[RenderBlock] {
        &self.blocks
    }

    pub fn links(&self) -> &LinkRegistry {
        &self.links
    }

    pub fn into_parts(self) -> (Vec<RenderBlock>, LinkRegistry) {
        (self.blocks, self.links)
    }

    /// Lays out every block for `width`, stacking them top to bottom.
    pub fn measure(&self, width: u16, theme: &Theme) -> Measured {
        let mut out = Measured::default();
        for block in &self.blocks {
            out.append(block.layout(width, theme));
        }
        out
    }

    pub fn to_text(&self, width: u16, theme: &Theme) -> Text<'static> {
        Text::from(self.measure(width, theme).lines)
    }
}

/// Walks documents into [`Rendered`] output.
///
/// Every call to [`Renderer::render`] starts from fresh state; nothing carries over between
/// documents. A renderer is not meant to be shared across threads; use one per thread.
#[derive(Clone, Debug, Default)]
pub struct Renderer {
    options: RenderOptions,
    rendered: Rendered,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            rendered: Rendered::default(),
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Renders `doc`, replacing the previous output.
    ///
    /// `is_html` enables the inline style-tag scanner for text produced from HTML fragments;
    /// plain markdown text is split on whitespace only.
    pub fn render(&mut self, doc: &Document, is_html: bool) -> &Rendered {
        if !doc.has_content() {
            log::debug!("rendering an empty document");
        }
        let mut walker = Walker::new(&self.options, is_html);
        doc.walk(|doc, id, phase| walker.visit(doc, id, phase));
        let (blocks, links) = walker.finish();
        log::debug!(
            "rendered {} nodes into {} blocks, {} links",
            doc.node_count(),
            blocks.len(),
            links.len()
        );
        self.rendered = Rendered { blocks, links };
        &self.rendered
    }

    pub fn rendered(&self) -> &Rendered {
        &self.rendered
    }

    pub fn into_rendered(self) -> Rendered {
        self.rendered
    }
}

/// Parses `source` as markdown and renders it in one go.
pub fn render_markdown(source: &str, options: &RenderOptions) -> Rendered {
    let doc = Document::parse_markdown(source);
    let mut renderer = Renderer::new(options.clone());
    renderer.render(&doc, false);
    renderer.into_rendered()
}
