//! Streaming markdown / HTML-fragment rendering into measurable `ratatui` blocks.
//!
//! A parsed [`tree::Document`] is walked once, depth first. The walk produces an ordered list
//! of [`block::RenderBlock`]s (text runs, spacers, tables) and a [`links::LinkRegistry`] of
//! clickable destinations. Blocks do not depend on the terminal width; lay them out with
//! [`block::RenderBlock::layout`] or [`renderer::Rendered::measure`] once the width is known.
//!
//! ```
//! use ratatui_fragments_core::theme::Theme;
//! use ratatui_fragments_markdown::RenderOptions;
//! use ratatui_fragments_markdown::render_markdown;
//!
//! let rendered = render_markdown("Hello **World**!", &RenderOptions::default());
//! let text = rendered.to_text(40, &Theme::default());
//! assert_eq!(text.lines.len(), 2);
//! ```
//!
//! ## Inline style tags
//!
//! Text coming from HTML fragments may carry `{#color: red#}styled{/#}` groups. Pass
//! `is_html = true` to [`renderer::Renderer::render`] to have them parsed by
//! [`style_tags::scan`]; markdown text keeps them verbatim.
pub mod block;
pub mod links;
pub mod options;
pub mod renderer;
pub mod style_tags;
pub mod table;
pub mod tree;

mod parse;
mod walker;

pub use options::RenderOptions;
pub use renderer::Rendered;
pub use renderer::Renderer;
pub use renderer::render_markdown;
pub use walker::remove_line_break;
