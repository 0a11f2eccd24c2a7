//! Record extraction from a municipality's detail page.

use tracing::warn;

use crate::config::{SummaryLayout, NUMERIC_CLASS, PARTY_NAME_CLASS, RESULTS_TABLE_CLASS};
use crate::document::ReportDocument;
use crate::error::ScrapeError;
use crate::types::{EntityRecord, EntityReference, PartyResult, SummaryCounts};

/// Parse a count such as `"13\u{a0}104"`; the page groups thousands with
/// non-breaking spaces.
pub fn parse_count(text: &str) -> Result<u64, ScrapeError> {
    let digits: String = text.chars().filter(|c| *c != '\u{a0}').collect();
    let digits = digits.trim();
    digits
        .parse::<u64>()
        .map_err(|_| ScrapeError::Structure(format!("{:?} is not a count", text)))
}

fn count_at(cells: &[String], index: usize, field: &str) -> Result<u64, ScrapeError> {
    let text = cells.get(index).ok_or_else(|| {
        ScrapeError::Structure(format!(
            "{} expected at numeric cell {}, page has {}",
            field,
            index,
            cells.len()
        ))
    })?;
    parse_count(text)
}

/// Summary counts from fixed positions among the page's numeric cells.
pub fn extract_summary<D: ReportDocument + ?Sized>(
    doc: &D,
    layout: &SummaryLayout,
) -> Result<SummaryCounts, ScrapeError> {
    let cells = doc.cells_by_class(NUMERIC_CLASS);
    Ok(SummaryCounts {
        registered: count_at(&cells, layout.registered, "registered voters")?,
        envelopes_issued: count_at(&cells, layout.envelopes, "issued envelopes")?,
        valid_votes: count_at(&cells, layout.valid, "valid votes")?,
    })
}

/// Party results from every results table, in page order.
///
/// A row counts when it has a party-name cell and at least two numeric cells;
/// the second numeric cell holds the party's vote total.
pub fn extract_parties<D: ReportDocument + ?Sized>(
    doc: &D,
) -> Result<Vec<PartyResult>, ScrapeError> {
    let mut parties = Vec::new();
    for row in doc.rows_in_tables(RESULTS_TABLE_CLASS) {
        let Some(name) = row.first_with_class(PARTY_NAME_CLASS) else {
            continue;
        };
        let numbers: Vec<_> = row.cells_with_class(NUMERIC_CLASS).collect();
        if numbers.len() < 2 {
            continue;
        }
        parties.push(PartyResult {
            party_name: name.text.trim().to_string(),
            vote_count: parse_count(&numbers[1].text)?,
        });
    }
    Ok(parties)
}

pub fn try_extract_record<D: ReportDocument + ?Sized>(
    reference: &EntityReference,
    doc: &D,
    layout: &SummaryLayout,
) -> Result<EntityRecord, ScrapeError> {
    Ok(EntityRecord {
        reference: reference.clone(),
        summary: extract_summary(doc, layout)?,
        parties: extract_parties(doc)?,
    })
}

/// Like `try_extract_record`, but a page with the wrong shape is logged and
/// yields `None` so the run can go on.
pub fn extract_record<D: ReportDocument + ?Sized>(
    reference: &EntityReference,
    doc: &D,
    layout: &SummaryLayout,
) -> Option<EntityRecord> {
    match try_extract_record(reference, doc, layout) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!(
                code = %reference.code,
                url = %reference.detail_url,
                error = %e,
                "skipping entity, unexpected page structure"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{HtmlDocument, InMemoryDocument, TableCell, TableRow};
    use url::Url;

    const DETAIL: &str = include_str!("../tests/fixtures/detail.html");
    const BROKEN: &str = include_str!("../tests/fixtures/detail_broken.html");

    fn benesov() -> EntityReference {
        EntityReference {
            code: "529303".into(),
            name: "Benešov".into(),
            detail_url: Url::parse(
                "https://www.volby.cz/pls/ps2017nss/ps311?xjazyk=CZ&xkraj=2&xobec=529303&xvyber=2101",
            )
            .unwrap(),
        }
    }

    fn num(text: &str) -> TableCell {
        TableCell::new(text).with_class(NUMERIC_CLASS)
    }

    fn party(text: &str) -> TableCell {
        TableCell::new(text).with_class(PARTY_NAME_CLASS)
    }

    #[test]
    fn non_breaking_space_is_a_thousands_separator() {
        assert_eq!(parse_count("1\u{a0}234").unwrap(), 1234);
        assert_eq!(parse_count(" 8\u{a0}485\n").unwrap(), 8485);
        assert!(parse_count("64,75").is_err());
        assert!(parse_count("-").is_err());
    }

    #[test]
    fn extracts_detail_page() {
        let doc = HtmlDocument::parse(DETAIL);
        let record = extract_record(&benesov(), &doc, &SummaryLayout::default()).unwrap();

        assert_eq!(
            record.summary,
            SummaryCounts {
                registered: 13104,
                envelopes_issued: 8485,
                valid_votes: 8437,
            }
        );
        assert_eq!(
            record.party_names(),
            [
                "Občanská demokratická strana",
                "Řád národa - Vlastenecká unie",
                "ANO 2011"
            ]
        );
        assert_eq!(record.vote_fields(), ["1052", "5", "2577"]);
    }

    #[test]
    fn extraction_is_repeatable() {
        let first = extract_record(
            &benesov(),
            &HtmlDocument::parse(DETAIL),
            &SummaryLayout::default(),
        );
        let second = extract_record(
            &benesov(),
            &HtmlDocument::parse(DETAIL),
            &SummaryLayout::default(),
        );
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn missing_numeric_cells_skip_the_entity() {
        let doc = HtmlDocument::parse(BROKEN);
        assert!(extract_record(&benesov(), &doc, &SummaryLayout::default()).is_none());

        let err = try_extract_record(&benesov(), &doc, &SummaryLayout::default()).unwrap_err();
        assert!(matches!(err, ScrapeError::Structure(_)));
    }

    #[test]
    fn layout_override_moves_summary_positions() {
        let doc = InMemoryDocument::new().with_table(
            &["table"],
            vec![TableRow::new(vec![num("10"), num("9"), num("8")])],
        );
        let layout = SummaryLayout {
            registered: 0,
            envelopes: 1,
            valid: 2,
        };
        let summary = extract_summary(&doc, &layout).unwrap();
        assert_eq!(summary.registered, 10);
        assert_eq!(summary.valid_votes, 8);
        assert!(extract_summary(&doc, &SummaryLayout::default()).is_err());
    }

    #[test]
    fn party_rows_need_a_name_and_two_numbers() {
        let doc = InMemoryDocument::new()
            .with_table(
                &["table"],
                vec![
                    TableRow::new(vec![num("1"), party("Strana X"), num("1\u{a0}200"), num("55,1")]),
                    TableRow::new(vec![num("2"), party("Jen jedno číslo")]),
                    TableRow::new(vec![num("3"), TableCell::new("Bez třídy"), num("7"), num("0,3")]),
                ],
            )
            .with_table(
                &["other"],
                vec![TableRow::new(vec![num("4"), party("Mimo"), num("9"), num("1,0")])],
            )
            .with_table(
                &["table", "wide"],
                vec![TableRow::new(vec![num("5"), party(" Strana Y\n"), num("270"), num("44,9")])],
            );

        let parties = extract_parties(&doc).unwrap();
        assert_eq!(
            parties,
            vec![
                PartyResult {
                    party_name: "Strana X".into(),
                    vote_count: 1200
                },
                PartyResult {
                    party_name: "Strana Y".into(),
                    vote_count: 270
                },
            ]
        );
    }

    #[test]
    fn unparsable_vote_count_is_structural() {
        let doc = InMemoryDocument::new().with_table(
            &["table"],
            vec![TableRow::new(vec![num("1"), party("Strana X"), num("n/a"), num("0")])],
        );
        assert!(matches!(
            extract_parties(&doc),
            Err(ScrapeError::Structure(_))
        ));
    }
}
