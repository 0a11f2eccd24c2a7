//! Link discovery on an index page.

use tracing::{debug, warn};

use crate::document::ReportDocument;
use crate::fetch::urls::detail_url;
use crate::types::EntityReference;

/// Collect one `EntityReference` per qualifying row, in row order.
///
/// A row qualifies when it has at least two cells and the first cell links to
/// a target containing `detail_marker`. Code and name are the trimmed texts of
/// the first two cells. No de-duplication is done.
pub fn discover_entities<D: ReportDocument + ?Sized>(
    doc: &D,
    report_root: &str,
    detail_marker: &str,
) -> Vec<EntityReference> {
    let mut found = Vec::new();
    for row in doc.rows() {
        if row.cells.len() < 2 {
            continue;
        }
        let href = match row.hyperlink(0) {
            Some(href) if href.contains(detail_marker) => href,
            _ => continue,
        };
        let url = match detail_url(report_root, href) {
            Ok(url) => url,
            Err(e) => {
                warn!(href, error = %e, "ignoring unparsable detail link");
                continue;
            }
        };
        let reference = EntityReference {
            code: row.cells[0].text.trim().to_string(),
            name: row.cells[1].text.trim().to_string(),
            detail_url: url,
        };
        debug!(code = %reference.code, name = %reference.name, "found entity");
        found.push(reference);
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_DETAIL_MARKER, DEFAULT_REPORT_ROOT};
    use crate::document::{HtmlDocument, InMemoryDocument, TableCell, TableRow};

    const INDEX: &str = include_str!("../tests/fixtures/index.html");

    #[test]
    fn finds_qualifying_rows_in_order() {
        let doc = HtmlDocument::parse(INDEX);
        let refs = discover_entities(&doc, DEFAULT_REPORT_ROOT, DEFAULT_DETAIL_MARKER);

        let codes: Vec<_> = refs.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, ["529303", "532568", "530743", "532380", "532096"]);
        assert_eq!(refs[0].name, "Benešov");
        assert_eq!(refs[4].name, "Bystřice");
        assert_eq!(
            refs[1].detail_url.as_str(),
            "https://www.volby.cz/pls/ps2017nss/ps311?xjazyk=CZ&xkraj=2&xobec=532568&xvyber=2101"
        );
    }

    #[test]
    fn page_without_links_yields_nothing() {
        let doc = HtmlDocument::parse("<html><body><p>Žádná data</p></body></html>");
        assert!(discover_entities(&doc, DEFAULT_REPORT_ROOT, DEFAULT_DETAIL_MARKER).is_empty());
    }

    #[test]
    fn duplicates_are_kept() {
        let row = TableRow::new(vec![
            TableCell::new("A1").with_href("ps311?xobec=1"),
            TableCell::new(" Obec A "),
        ]);
        let doc = InMemoryDocument::new().with_table(&["table"], vec![row.clone(), row]);
        let refs = discover_entities(&doc, DEFAULT_REPORT_ROOT, DEFAULT_DETAIL_MARKER);
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0], refs[1]);
        assert_eq!(refs[0].name, "Obec A");
    }

    #[test]
    fn link_must_be_in_first_cell() {
        let row = TableRow::new(vec![
            TableCell::new("A1"),
            TableCell::new("Obec A").with_href("ps311?xobec=1"),
        ]);
        let doc = InMemoryDocument::new().with_table(&["table"], vec![row]);
        assert!(discover_entities(&doc, DEFAULT_REPORT_ROOT, DEFAULT_DETAIL_MARKER).is_empty());
    }
}
