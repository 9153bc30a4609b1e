//! `ratatui-fragments-core` provides the small rendering primitives shared by the fragment
//! renderers.
//!
//! Parsing and document walking live in `ratatui-fragments-markdown`. This crate only knows
//! about styled spans and how to lay them out inside a width.
//!
//! ## Contents
//!
//! - [`theme::Theme`]: style descriptors used by the renderers (body text, links, heading
//!   levels, table headers).
//! - [`render`]: span helpers (padding/alignment, width measurement, plain-text joins).
//! - [`wrapping`]: word-flow layout of measurable units, used for paragraph text and table
//!   cells.
pub mod theme;

pub mod render;
pub mod wrapping;
