//! Schema inference for loosely structured holdings tables.
//!
//! A table goes through three stages: [`HeaderLocator`] finds the header
//! row, [`ColumnClassifier`] maps columns to identifier/name/quantity, and
//! [`extract_records`] turns the rows below into holdings. Extraction only
//! ever runs against a located header.

pub mod columns;
pub mod error;
pub mod extract;
pub mod header;
pub mod keywords;
pub mod table;

pub use columns::{header_columns, Column, ColumnClassifier, ColumnMapping, Strategy};
pub use error::TableError;
pub use extract::{extract_records, ExtractionStats};
pub use header::{HeaderLocator, HeaderMatch, HeaderRule, DEFAULT_SCAN_ROWS};
pub use keywords::Role;
pub use table::{Cell, Table};

use models::HoldingRecord;
use tracing::info;

pub const PARSER_NAME: &str = "general";

#[derive(Debug, Clone)]
pub struct ParsedTable {
    pub header: HeaderMatch,
    pub mapping: ColumnMapping,
    pub holdings: Vec<HoldingRecord>,
    pub stats: ExtractionStats,
}

pub struct GeneralTableParser {
    locator: HeaderLocator,
}

impl Default for GeneralTableParser {
    fn default() -> Self {
        Self::new(DEFAULT_SCAN_ROWS)
    }
}

impl GeneralTableParser {
    pub fn new(scan_rows: usize) -> Self {
        Self {
            locator: HeaderLocator::new(scan_rows),
        }
    }

    pub fn parse_table(&self, table: &Table) -> Result<ParsedTable, TableError> {
        let header = self.locator.locate(table)?;
        let columns = header_columns(table, header.row);
        let mapping = ColumnClassifier::classify(table, &columns, header.row)?;
        let (holdings, stats) = extract_records(table, header.row, &mapping);

        info!(
            "Header row {} ({:?}), columns {:?}: {} holdings",
            header.row,
            header.rule,
            mapping.strategy,
            holdings.len()
        );

        Ok(ParsedTable {
            header,
            mapping,
            holdings,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preamble_then_header_round_trip() {
        let t = Table::from_strings(vec![
            vec!["Holding statement", "", ""],
            vec!["Generated 21-Oct-2025", "", ""],
            vec!["ISIN", "Security Name", "Quantity"],
            vec!["INE123A01011", "ABC Corp", "150.0"],
        ]);

        let parsed = GeneralTableParser::default().parse_table(&t).unwrap();
        assert_eq!(parsed.header.row, 2);
        assert_eq!(parsed.holdings.len(), 1);

        let h = &parsed.holdings[0];
        assert_eq!(h.identifier, "INE123A01011");
        assert_eq!(h.display_name, "ABC Corp");
        assert_eq!(h.quantity, 150.0);
        assert_eq!(h.value, 0.0);
    }

    #[test]
    fn test_holder_preamble_keeps_keyword_mapping() {
        let t = Table::from_strings(vec![
            vec!["Unit Holder Name : ASHA RAO", "", ""],
            vec!["DP ID : IN300214", "", ""],
            vec!["ISIN", "Security Name", "Quantity"],
            vec!["INE123A01011", "ABC Corp", "150.0"],
        ]);

        let parsed = GeneralTableParser::default().parse_table(&t).unwrap();
        assert_eq!(parsed.header.row, 2);
        assert_eq!(parsed.mapping.strategy, Strategy::Keyword);
        assert_eq!(parsed.stats.coercion_failures, 0);
        assert_eq!(parsed.holdings.len(), 1);
        assert_eq!(parsed.holdings[0].identifier, "INE123A01011");
        assert_eq!(parsed.holdings[0].display_name, "ABC Corp");
        assert_eq!(parsed.holdings[0].quantity, 150.0);
    }

    #[test]
    fn test_missing_header_aborts_before_extraction() {
        let t = Table::from_strings(vec![vec!["a", "b", "c"], vec!["1", "2", "3"]]);
        let err = GeneralTableParser::default().parse_table(&t).unwrap_err();
        assert!(matches!(err, TableError::HeaderNotFound { .. }));
    }

    #[test]
    fn test_number_cells_from_workbooks() {
        let t = Table::new(vec![
            vec![Cell::text("Scrip Code"), Cell::text("Company"), Cell::text("Shares")],
            vec![Cell::Number(500325.0), Cell::text("Reliance"), Cell::Number(12.0)],
        ]);
        let parsed = GeneralTableParser::default().parse_table(&t).unwrap();
        assert_eq!(parsed.holdings[0].identifier, "500325");
        assert_eq!(parsed.holdings[0].quantity, 12.0);
    }
}
