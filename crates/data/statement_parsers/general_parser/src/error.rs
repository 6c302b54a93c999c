use thiserror::Error;

/// File-level failures of table inference. Either one aborts the parse of
/// that file only.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("No header row found within the first {scan_rows} rows")]
    HeaderNotFound {
        scan_rows: usize,
        /// First rows of the table, for triage.
        preview: Vec<Vec<String>>,
    },

    #[error("Table has {columns} column(s); identifier, name and quantity need at least 3")]
    ColumnsUnclassifiable { columns: usize },
}

impl TableError {
    /// Preview rows rendered one per line, empty for errors without one.
    pub fn diagnostic(&self) -> Vec<String> {
        match self {
            TableError::HeaderNotFound { preview, .. } => preview
                .iter()
                .enumerate()
                .map(|(i, cells)| format!("row {:>2}: {}", i + 1, cells.join(" | ")))
                .collect(),
            TableError::ColumnsUnclassifiable { .. } => Vec::new(),
        }
    }
}
