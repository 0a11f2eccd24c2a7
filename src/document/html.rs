// src/document/html.rs

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use super::{ReportDocument, TableCell, TableRow};

static TABLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table").expect("CSS selector for tables should be valid"));
static ROW: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr").expect("CSS selector for rows should be valid"));
static CELL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td").expect("CSS selector for cells should be valid"));
static LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a").expect("CSS selector for links should be valid"));

/// A parsed HTML report page.
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    /// Decode `bytes` as UTF-8 whatever the server claimed, then parse.
    pub fn from_utf8_lossy(bytes: &[u8]) -> Self {
        Self::parse(&String::from_utf8_lossy(bytes))
    }
}

fn has_class(el: &ElementRef<'_>, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}

fn to_cell(td: ElementRef<'_>) -> TableCell {
    TableCell {
        text: td.text().collect(),
        classes: td.value().classes().map(str::to_string).collect(),
        href: td
            .select(&LINK)
            .next()
            .map(|a| a.value().attr("href").unwrap_or_default().to_string()),
    }
}

fn to_row(tr: ElementRef<'_>) -> TableRow {
    TableRow::new(tr.select(&CELL).map(to_cell).collect())
}

impl ReportDocument for HtmlDocument {
    fn cells_by_class(&self, class: &str) -> Vec<String> {
        self.html
            .select(&CELL)
            .filter(|td| has_class(td, class))
            .map(|td| td.text().collect())
            .collect()
    }

    fn rows(&self) -> Vec<TableRow> {
        self.html.select(&ROW).map(to_row).collect()
    }

    fn rows_in_tables(&self, table_class: &str) -> Vec<TableRow> {
        self.html
            .select(&TABLE)
            .filter(|table| has_class(table, table_class))
            .flat_map(|table| table.select(&ROW).map(to_row))
            .collect()
    }
}
