use ratatui::style::Modifier;
use ratatui::style::Style;

/// Style descriptors consumed by the block layout.
///
/// Headings use a small lookup table: level 1 is the most prominent style, level 2 the
/// medium one, and every other level shares the last entry.
#[derive(Clone, Debug)]
pub struct Theme {
    pub text_primary: Style,
    pub text_muted: Style,
    pub strong: Style,
    pub link: Style,
    pub headings: [Style; 3],
    pub table_header: Style,
}

impl Default for Theme {
    fn default() -> Self {
        use ratatui::style::Stylize;

        Self {
            text_primary: Style::default(),
            text_muted: Style::default().dark_gray(),
            strong: Style::default().add_modifier(Modifier::BOLD),
            link: Style::default().cyan().add_modifier(Modifier::UNDERLINED),
            headings: [
                Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                Style::default().add_modifier(Modifier::BOLD),
                Style::default().add_modifier(Modifier::BOLD | Modifier::ITALIC),
            ],
            table_header: Style::default().add_modifier(Modifier::BOLD),
        }
    }
}

impl Theme {
    /// Returns the style for a heading `level` (1-based).
    ///
    /// Out-of-range levels (0, 4 and up) fall back to the smallest heading style.
    pub fn heading(&self, level: u8) -> Style {
        match level {
            1 => self.headings[0],
            2 => self.headings[1],
            _ => self.headings[2],
        }
    }
}
