//! Table layout engine.
//!
//! A [`TableBuilder`] collects cells while the walker is inside one table, then
//! [`TableBuilder::finish`] normalizes the rows and computes fixed column widths:
//!
//! 1. every row (header included) is padded with empty cells to the header's column count;
//! 2. body cells that inherit alignment take the header cell's alignment;
//! 3. each column's weight is the widest content in that column, widths are proportional to
//!    the weights, any column above the cap (40% by default) is clamped to it and the excess
//!    is shared evenly by the columns that were not clamped.
//!
//! The weight is a maximum, not a typical length: a column with many short cells and one long
//! one can still be clamped.
use ratatui::layout::Alignment;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui_fragments_core::render::pad_spans;
use ratatui_fragments_core::theme::Theme;
use ratatui_fragments_core::wrapping::FlowWord;
use ratatui_fragments_core::wrapping::flow_words;
use unicode_width::UnicodeWidthStr;

pub const DEFAULT_COLUMN_CAP: f64 = 40.0;

/// Blank rows appended under every table row.
pub const DEFAULT_ROW_PADDING: u16 = 5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CellAlignment {
    #[default]
    Left,
    Right,
    Center,
    /// Placeholder for body cells: use the header cell's alignment in the same column.
    InheritFromHeader,
}

impl CellAlignment {
    fn to_layout(self) -> Alignment {
        match self {
            CellAlignment::Right => Alignment::Right,
            CellAlignment::Center => Alignment::Center,
            CellAlignment::Left | CellAlignment::InheritFromHeader => Alignment::Left,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableCell {
    pub content: String,
    pub alignment: CellAlignment,
}

impl TableCell {
    pub fn new(content: impl Into<String>, alignment: CellAlignment) -> Self {
        Self {
            content: content.into(),
            alignment,
        }
    }

    fn weight(&self) -> f64 {
        UnicodeWidthStr::width(self.content.as_str()) as f64
    }
}

#[derive(Clone, Debug)]
pub struct TableBuilder {
    header: Vec<TableCell>,
    body: Vec<Vec<TableCell>>,
    widths: Vec<f64>,
    column_cap: f64,
    row_padding: u16,
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TableBuilder {
    pub fn new() -> Self {
        Self {
            header: Vec::new(),
            body: Vec::new(),
            widths: Vec::new(),
            column_cap: DEFAULT_COLUMN_CAP,
            row_padding: DEFAULT_ROW_PADDING,
        }
    }

    pub fn with_column_cap(mut self, cap: f64) -> Self {
        self.column_cap = cap;
        self
    }

    pub fn with_row_padding(mut self, padding: u16) -> Self {
        self.row_padding = padding;
        self
    }

    pub fn add_header_cell(&mut self, content: impl Into<String>, alignment: CellAlignment) {
        self.header.push(TableCell::new(content, alignment));
        self.widths.push(0.0);
    }

    pub fn begin_body_row(&mut self) {
        self.body.push(Vec::new());
    }

    /// Appends a cell to the row started by the last [`Self::begin_body_row`].
    ///
    /// # Panics
    ///
    /// Panics if no body row was begun. Callers must start a row before adding its cells.
    pub fn add_body_cell(&mut self, content: impl Into<String>, alignment: CellAlignment) {
        let Some(row) = self.body.last_mut() else {
            panic!("TableBuilder::add_body_cell called before begin_body_row");
        };
        row.push(TableCell::new(content, alignment));
    }

    pub fn body_rows(&self) -> usize {
        self.body.len()
    }

    pub fn finish(mut self) -> TableBlock {
        self.normalize();
        self.resolve_inherited_alignment();
        self.compute_widths();
        TableBlock {
            header: self.header,
            body: self.body,
            widths: self.widths,
            row_padding: self.row_padding,
        }
    }

    /// Pads short rows with empty cells. Rows are never truncated.
    fn normalize(&mut self) {
        let width = self.header.len();
        for row in &mut self.body {
            if row.len() > width {
                log::debug!(
                    "table row has {} cells but the header has {width}; extra cells are not laid out",
                    row.len()
                );
            }
            while row.len() < width {
                row.push(TableCell::default());
            }
        }
    }

    fn resolve_inherited_alignment(&mut self) {
        for row in &mut self.body {
            for (j, cell) in row.iter_mut().enumerate() {
                if cell.alignment == CellAlignment::InheritFromHeader {
                    cell.alignment = self.header.get(j).map(|h| h.alignment).unwrap_or_default();
                }
            }
        }
    }

    fn compute_widths(&mut self) {
        let mut weights: Vec<f64> = self.header.iter().map(TableCell::weight).collect();
        for row in &self.body {
            for (w, cell) in weights.iter_mut().zip(row) {
                *w = w.max(cell.weight());
            }
        }
        self.widths = column_widths(&weights, self.column_cap);
    }
}

/// Converts raw column weights into width percentages (summing to 100).
///
/// Columns whose share exceeds `cap` are clamped to exactly `cap`; the clamped excess is split
/// evenly over the remaining columns. When every column exceeds the cap there is nobody to
/// receive the excess and the proportional shares are kept. A zero total splits evenly.
pub fn column_widths(weights: &[f64], cap: f64) -> Vec<f64> {
    let n = weights.len();
    if n == 0 {
        return Vec::new();
    }
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        log::debug!("table has no content; splitting {n} columns evenly");
        return vec![100.0 / n as f64; n];
    }

    let nominal: Vec<f64> = weights.iter().map(|w| 100.0 * w / total).collect();
    let mut widths = nominal.clone();
    let mut capped = vec![false; n];
    let mut recouped = 0.0;
    for (w, is_capped) in widths.iter_mut().zip(capped.iter_mut()) {
        if *w > cap {
            recouped += *w - cap;
            *w = cap;
            *is_capped = true;
        }
    }

    let uncapped = capped.iter().filter(|c| !**c).count();
    if uncapped == 0 {
        log::debug!("every table column exceeds {cap}%; keeping proportional widths");
        return nominal;
    }
    let share = recouped / uncapped as f64;
    for (w, is_capped) in widths.iter_mut().zip(&capped) {
        if !is_capped {
            *w += share;
        }
    }
    widths
}

/// A finished table: normalized rows plus per-column width percentages.
#[derive(Clone, Debug, PartialEq)]
pub struct TableBlock {
    pub header: Vec<TableCell>,
    pub body: Vec<Vec<TableCell>>,
    pub widths: Vec<f64>,
    pub row_padding: u16,
}

impl TableBlock {
    /// Column widths in cells for an available `width`.
    pub fn column_cells(&self, width: u16) -> Vec<u16> {
        self.widths
            .iter()
            .map(|pct| ((pct / 100.0) * width as f64).floor() as u16)
            .collect()
    }

    /// Lays out the header row, then the body rows, each column fixed to its computed width.
    pub fn layout(&self, width: u16, theme: &Theme) -> Vec<Line<'static>> {
        let mut out = Vec::new();
        if self.widths.is_empty() || width == 0 {
            return out;
        }
        let col_w = self.column_cells(width);
        if !self.header.is_empty() {
            out.extend(self.layout_row(&self.header, &col_w, theme.table_header, theme));
        }
        for row in &self.body {
            out.extend(self.layout_row(row, &col_w, theme.text_primary, theme));
        }
        out
    }

    fn layout_row(
        &self,
        row: &[TableCell],
        col_w: &[u16],
        style: Style,
        theme: &Theme,
    ) -> Vec<Line<'static>> {
        let mut cells: Vec<Vec<Line<'static>>> = Vec::with_capacity(col_w.len());
        let mut content_h = 1usize;
        for (ci, w) in col_w.iter().copied().enumerate() {
            let cell = row.get(ci).cloned().unwrap_or_default();
            // One cell of every column is kept free so neighbouring cells never touch.
            let content_w = if w > 1 { w - 1 } else { w };
            let words: Vec<FlowWord<()>> = cell
                .content
                .split_whitespace()
                .map(|word| FlowWord::new(word, style, true))
                .collect();
            let lines = flow_words(&[], 0, &words, content_w, theme.text_primary).lines;
            content_h = content_h.max(lines.len());
            cells.push(lines);
        }

        let mut out = Vec::with_capacity(content_h + self.row_padding as usize);
        for li in 0..content_h {
            let mut spans: Vec<Span<'static>> = Vec::new();
            for (ci, w) in col_w.iter().copied().enumerate() {
                let line_spans = cells[ci]
                    .get(li)
                    .map(|l| l.spans.clone())
                    .unwrap_or_default();
                let align = row
                    .get(ci)
                    .map(|c| c.alignment.to_layout())
                    .unwrap_or(Alignment::Left);
                let content_w = if w > 1 { w - 1 } else { w };
                spans.extend(pad_spans(line_spans, content_w, align, theme.text_primary));
                if w > 1 {
                    spans.push(Span::styled(" ", theme.text_primary));
                }
            }
            out.push(Line::from(spans));
        }
        for _ in 0..self.row_padding {
            out.push(Line::default());
        }
        out
    }
}
