use models::HoldingRecord;
use tracing::debug;
use utils::is_not_available;

use crate::columns::ColumnMapping;
use crate::table::Table;

/// Row-level outcomes. Skipped rows are counted, never itemised.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionStats {
    pub rows_scanned: usize,
    /// Rows without an identifier: blank lines, totals, footers.
    pub filler_rows_skipped: usize,
    /// Rows whose quantity was not a number.
    pub coercion_failures: usize,
}

/// Walks the rows below the header, in order, and keeps those with an
/// identifier and a numeric quantity. Pricing is left at zero.
pub fn extract_records(
    table: &Table,
    header_row: usize,
    mapping: &ColumnMapping,
) -> (Vec<HoldingRecord>, ExtractionStats) {
    let mut holdings = Vec::new();
    let mut stats = ExtractionStats::default();

    for row in header_row + 1..table.height() {
        stats.rows_scanned += 1;

        let identifier = table.cell(row, mapping.identifier).as_text();
        if is_not_available(&identifier) {
            stats.filler_rows_skipped += 1;
            continue;
        }

        let Some(quantity) = table.cell(row, mapping.quantity).as_number() else {
            stats.coercion_failures += 1;
            continue;
        };

        let name = table.cell(row, mapping.name).as_text();
        holdings.push(HoldingRecord::unpriced(identifier, name, quantity));
    }

    debug!(
        "Extracted {} rows ({} filler, {} bad quantity)",
        holdings.len(),
        stats.filler_rows_skipped,
        stats.coercion_failures
    );
    (holdings, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::Strategy;

    fn mapping() -> ColumnMapping {
        ColumnMapping {
            identifier: 0,
            name: 1,
            quantity: 2,
            strategy: Strategy::Keyword,
        }
    }

    #[test]
    fn test_filler_and_bad_rows_are_dropped() {
        let t = Table::from_strings(vec![
            vec!["ISIN", "Name", "Qty"],
            vec!["INE1", "Alpha", "10"],
            vec!["", "", ""],
            vec!["nan", "Total", "10"],
            vec!["INE2", "Beta", "lots"],
            vec!["INE3", "Gamma", "1,250.5"],
        ]);

        let (rows, stats) = extract_records(&t, 0, &mapping());
        let ids: Vec<&str> = rows.iter().map(|h| h.identifier.as_str()).collect();
        assert_eq!(ids, vec!["INE1", "INE3"]);
        assert_eq!(rows[1].quantity, 1250.5);
        assert_eq!(stats.rows_scanned, 5);
        assert_eq!(stats.filler_rows_skipped, 2);
        assert_eq!(stats.coercion_failures, 1);
    }

    #[test]
    fn test_prices_start_at_zero_and_negatives_survive() {
        let t = Table::from_strings(vec![vec!["h", "h", "h"], vec!["INE1", "Alpha", "-3"]]);
        let (rows, _) = extract_records(&t, 0, &mapping());
        assert_eq!(rows[0].quantity, -3.0);
        assert_eq!(rows[0].unit_price, 0.0);
        assert_eq!(rows[0].value, 0.0);
    }

    #[test]
    fn test_header_on_last_row_yields_nothing() {
        let t = Table::from_strings(vec![vec!["ISIN", "Name", "Qty"]]);
        let (rows, stats) = extract_records(&t, 0, &mapping());
        assert!(rows.is_empty());
        assert_eq!(stats, ExtractionStats::default());
    }
}
