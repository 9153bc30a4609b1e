use crate::table::DEFAULT_COLUMN_CAP;
use crate::table::DEFAULT_ROW_PADDING;

/// Renderer configuration.
///
/// Options are read while the document is walked; changing them requires rendering the
/// document again.
#[derive(Clone, Debug)]
pub struct RenderOptions {
    /// Glyph used for unordered list items (surrounded by one space on each side).
    pub bullet: String,
    /// Left indent added for every level of list nesting.
    pub nested_list_indent: String,
    /// Height of the blank line emitted after paragraphs, headings and lists.
    pub blank_line_height: u16,
    /// Height of the first blank line after a list item starts (tighter list spacing).
    pub list_blank_line_height: u16,
    /// Blank rows appended under every table row.
    pub table_row_padding: u16,
    /// Maximum share of the available width, in percent, a single table column may take.
    pub column_cap: f64,
    /// Base URL relative link destinations are resolved against.
    pub base_url: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            bullet: "\u{2022}".to_string(),
            nested_list_indent: "   ".to_string(),
            blank_line_height: 1,
            list_blank_line_height: 0,
            table_row_padding: DEFAULT_ROW_PADDING,
            column_cap: DEFAULT_COLUMN_CAP,
            base_url: None,
        }
    }
}
