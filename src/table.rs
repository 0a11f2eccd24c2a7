//! Accumulates extracted records into one table.

use tracing::warn;

use crate::config::ColumnPolicy;
use crate::error::ScrapeError;
use crate::types::{EntityRecord, ResultTable};

/// Leading columns of every output table.
pub const FIXED_COLUMNS: [&str; 5] = ["code", "name", "registered", "envelopes", "valid"];

/// Builds a `ResultTable`. The header's party columns come from the first
/// record accumulated.
#[derive(Debug, Default)]
pub struct TableAccumulator {
    policy: ColumnPolicy,
    table: ResultTable,
}

impl TableAccumulator {
    pub fn new(policy: ColumnPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    pub fn row_count(&self) -> usize {
        self.table.rows.len()
    }

    pub fn accumulate(&mut self, record: &EntityRecord) -> Result<(), ScrapeError> {
        let names = record.party_names();
        let header = self.table.header.get_or_insert_with(|| {
            FIXED_COLUMNS
                .iter()
                .map(|c| c.to_string())
                .chain(names.iter().cloned())
                .collect()
        });
        let expected = &header[FIXED_COLUMNS.len()..];

        let mut votes = record.vote_fields();
        if names != expected {
            match self.policy {
                ColumnPolicy::Strict => {
                    return Err(ScrapeError::SchemaMismatch {
                        code: record.reference.code.clone(),
                        expected: expected.to_vec(),
                        found: names,
                    });
                }
                ColumnPolicy::Positional => {
                    warn!(
                        code = %record.reference.code,
                        expected = expected.len(),
                        found = names.len(),
                        "party columns differ from header, appending by position"
                    );
                    votes.resize(expected.len(), String::new());
                }
            }
        }

        let mut row = record.prefix_fields();
        row.extend(votes);
        self.table.rows.push(row);
        Ok(())
    }

    /// Header stays `None` when nothing was accumulated.
    pub fn finalize(self) -> ResultTable {
        self.table
    }
}
