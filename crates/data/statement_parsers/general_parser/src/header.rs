use tracing::debug;

use crate::error::TableError;
use crate::keywords::{classify_label, vocabularies_matched, Role};
use crate::table::Table;

pub const DEFAULT_SCAN_ROWS: usize = 20;
const PREVIEW_ROWS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderRule {
    /// Keywords from at least two vocabularies.
    TwoVocabularies,
    /// Relaxed: an identifier keyword alone.
    IdentifierOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderMatch {
    pub row: usize,
    pub rule: HeaderRule,
}

/// Finds the header row of a table with no fixed layout.
#[derive(Debug, Clone, Copy)]
pub struct HeaderLocator {
    scan_rows: usize,
}

impl Default for HeaderLocator {
    fn default() -> Self {
        Self::new(DEFAULT_SCAN_ROWS)
    }
}

impl HeaderLocator {
    pub fn new(scan_rows: usize) -> Self {
        Self { scan_rows }
    }

    pub fn scan_rows(&self) -> usize {
        self.scan_rows
    }

    /// Top-down scan of the window; the first qualifying row wins, even when
    /// a later row matches more keywords.
    pub fn locate(&self, table: &Table) -> Result<HeaderMatch, TableError> {
        let window = table.height().min(self.scan_rows);
        let rows: Vec<Vec<String>> = (0..window)
            .map(|i| table.row(i).iter().map(|c| c.as_text()).collect())
            .collect();

        if let Some(row) = rows
            .iter()
            .position(|cells| vocabularies_matched(cells.iter().map(String::as_str)) >= 2)
        {
            debug!("Header at row {} (two vocabularies)", row);
            return Ok(HeaderMatch {
                row,
                rule: HeaderRule::TwoVocabularies,
            });
        }

        if let Some(row) = rows.iter().position(|cells| {
            cells
                .iter()
                .any(|c| classify_label(c) == Some(Role::Identifier))
        }) {
            debug!("Header at row {} (identifier keyword only)", row);
            return Ok(HeaderMatch {
                row,
                rule: HeaderRule::IdentifierOnly,
            });
        }

        Err(TableError::HeaderNotFound {
            scan_rows: self.scan_rows,
            preview: table.preview(PREVIEW_ROWS),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_qualifying_row_wins_over_stronger_later_row() {
        let t = Table::from_strings(vec![
            vec!["Statement of Holdings", "", ""],
            vec!["Scrip", "Balance", ""],
            vec!["ISIN", "Security Name", "Quantity"],
        ]);
        let m = HeaderLocator::default().locate(&t).unwrap();
        assert_eq!(m.row, 1);
        assert_eq!(m.rule, HeaderRule::TwoVocabularies);
    }

    #[test]
    fn test_holder_preamble_is_not_taken_for_header() {
        let t = Table::from_strings(vec![
            vec!["Unit Holder Name : ASHA RAO", "", ""],
            vec!["DP ID : IN300214", "", ""],
            vec!["ISIN", "Security Name", "Quantity"],
            vec!["INE123A01011", "ABC Corp", "150.0"],
        ]);
        let m = HeaderLocator::default().locate(&t).unwrap();
        assert_eq!(m.row, 2);
        assert_eq!(m.rule, HeaderRule::TwoVocabularies);
    }

    #[test]
    fn test_identifier_only_fallback() {
        let t = Table::from_strings(vec![
            vec!["Report", ""],
            vec!["ISIN", "Value"],
            vec!["INE123A01011", "10"],
        ]);
        let m = HeaderLocator::default().locate(&t).unwrap();
        assert_eq!(m.row, 1);
        assert_eq!(m.rule, HeaderRule::IdentifierOnly);
    }

    #[test]
    fn test_header_outside_window_is_not_found() {
        let mut rows = vec![vec!["x".to_string()]; 3];
        rows.push(vec!["ISIN".to_string(), "Name".to_string()]);
        let t = Table::from_strings(rows);

        let err = HeaderLocator::new(3).locate(&t).unwrap_err();
        match err {
            TableError::HeaderNotFound { scan_rows, preview } => {
                assert_eq!(scan_rows, 3);
                assert_eq!(preview.len(), 4);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_not_found_preview_is_bounded_to_five_rows() {
        let t = Table::from_strings(vec![vec!["nothing"]; 12]);
        let err = HeaderLocator::default().locate(&t).unwrap_err();
        assert_eq!(err.diagnostic().len(), 5);
    }
}
