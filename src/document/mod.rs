//! Narrow query interface over a report page.
//!
//! Link discovery and record extraction only need three questions answered
//! about a page: which `<td>` cells carry a class, what the table rows are,
//! and which rows belong to tables of a given class. `HtmlDocument` answers
//! them from real HTML, `InMemoryDocument` from plain data.

pub mod html;
pub mod memory;

pub use html::HtmlDocument;
pub use memory::InMemoryDocument;

/// A single `<td>` as seen by the extractors.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableCell {
    /// Concatenated text of the cell, untrimmed.
    pub text: String,
    pub classes: Vec<String>,
    /// `href` of the first `<a>` inside the cell, if any.
    pub href: Option<String>,
}

impl TableCell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// The `<td>` cells of one `<tr>`, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

impl TableRow {
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self { cells }
    }

    /// Link target of the cell at `index`.
    pub fn hyperlink(&self, index: usize) -> Option<&str> {
        self.cells.get(index).and_then(|c| c.href.as_deref())
    }

    pub fn first_with_class(&self, class: &str) -> Option<&TableCell> {
        self.cells.iter().find(|c| c.has_class(class))
    }

    pub fn cells_with_class<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a TableCell> {
        self.cells.iter().filter(move |c| c.has_class(class))
    }
}

pub trait ReportDocument {
    /// Text of every `<td>` carrying `class`, in document order.
    fn cells_by_class(&self, class: &str) -> Vec<String>;

    /// Every `<tr>` in the document, in document order.
    fn rows(&self) -> Vec<TableRow>;

    /// Rows of every `<table>` carrying `table_class`, table by table.
    fn rows_in_tables(&self, table_class: &str) -> Vec<TableRow>;
}
