//! Holdings exports from the NSDL depository (xlsx/xls/ods/csv).

pub mod decode;
pub mod error;
pub mod metadata;

use std::path::Path;

use general_parser::{ExtractionStats, GeneralTableParser, Table, DEFAULT_SCAN_ROWS};
use models::AccountStatement;
use tracing::info;

pub use decode::{is_supported, read_table};
pub use error::NsdlError;
pub use metadata::{scan_metadata, StatementMetadata};

pub const PARSER_NAME: &str = "nsdl";
pub const SOURCE_LABEL: &str = "NSDL";

pub struct NsdlParser {
    tables: GeneralTableParser,
}

impl Default for NsdlParser {
    fn default() -> Self {
        Self::new(DEFAULT_SCAN_ROWS)
    }
}

impl NsdlParser {
    pub fn new(header_scan_rows: usize) -> Self {
        Self {
            tables: GeneralTableParser::new(header_scan_rows),
        }
    }

    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<AccountStatement, NsdlError> {
        let path = path.as_ref();
        let table = read_table(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let (statement, stats) = self.parse_table(&table, &file_name)?;

        info!(
            "{}: {} holdings for {} ({} rows, {} filler, {} bad quantity)",
            file_name,
            statement.holdings.len(),
            statement.account_identifier,
            stats.rows_scanned,
            stats.filler_rows_skipped,
            stats.coercion_failures
        );
        Ok(statement)
    }

    /// `file_name` is recorded on the statement and, when the table carries
    /// no DP/Client ID, supplies the account identifier.
    pub fn parse_table(
        &self,
        table: &Table,
        file_name: &str,
    ) -> Result<(AccountStatement, ExtractionStats), NsdlError> {
        let meta = scan_metadata(table);
        let parsed = self.tables.parse_table(table)?;

        let (dp_id, client_id) = if meta.dp_id.is_empty() && meta.client_id.is_empty() {
            let stem = Path::new(file_name)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            metadata::ids_from_file_stem(&stem)
        } else {
            (meta.dp_id, meta.client_id)
        };

        let statement = AccountStatement {
            source_label: SOURCE_LABEL.to_string(),
            holder_name: meta.holder_name,
            account_identifier: format!("{}{}", dp_id, client_id),
            dp_id,
            client_id,
            statement_date: meta.statement_date,
            source_file: file_name.to_string(),
            holdings: parsed.holdings,
        };
        Ok((statement, parsed.stats))
    }
}
