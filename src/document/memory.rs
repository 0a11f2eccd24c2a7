use super::{ReportDocument, TableRow};

/// A document built from plain data, for driving extractors without HTML.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocument {
    tables: Vec<(Vec<String>, Vec<TableRow>)>,
}

impl InMemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a table carrying `classes` with the given rows.
    pub fn with_table(mut self, classes: &[&str], rows: Vec<TableRow>) -> Self {
        self.tables
            .push((classes.iter().map(|c| c.to_string()).collect(), rows));
        self
    }
}

impl ReportDocument for InMemoryDocument {
    fn cells_by_class(&self, class: &str) -> Vec<String> {
        self.rows()
            .iter()
            .flat_map(|row| row.cells_with_class(class).map(|c| c.text.clone()))
            .collect()
    }

    fn rows(&self) -> Vec<TableRow> {
        self.tables
            .iter()
            .flat_map(|(_, rows)| rows.iter().cloned())
            .collect()
    }

    fn rows_in_tables(&self, table_class: &str) -> Vec<TableRow> {
        self.tables
            .iter()
            .filter(|(classes, _)| classes.iter().any(|c| c == table_class))
            .flat_map(|(_, rows)| rows.iter().cloned())
            .collect()
    }
}
