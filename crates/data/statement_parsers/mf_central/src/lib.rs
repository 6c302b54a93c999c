//! MF Central consolidated account statements, read from their text
//! rendering (`.md`/`.txt` produced by an external PDF converter).

pub mod metadata;
pub mod patterns;
pub mod scan;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use models::MfStatement;
use tracing::info;

pub use metadata::{investor_details, InvestorDetails};
pub use scan::{scan_holdings, ScanResult, ScanStats, ScanState, Section, TailField};

pub const PARSER_NAME: &str = "mf_central";
pub const SUPPORTED_EXTENSIONS: &[&str] = &["md", "txt"];

pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[derive(Debug, Default)]
pub struct MfCentralParser;

impl MfCentralParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<MfStatement> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Cannot read {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let (statement, stats) = self.parse_text(&text, &file_name);
        info!(
            "{}: {} SOA + {} DEMAT holdings ({} incomplete records dropped)",
            file_name,
            statement.soa_holdings.len(),
            statement.demat_holdings.len(),
            stats.discarded
        );
        Ok(statement)
    }

    pub fn parse_text(&self, text: &str, source_file: &str) -> (MfStatement, ScanStats) {
        let details = investor_details(text);
        let ScanResult { soa, demat, stats } = scan_holdings(text);

        let soa_value: f64 = soa.iter().map(|h| h.market_value).sum();
        let demat_value: f64 = demat.iter().map(|h| h.market_value).sum();

        let statement = MfStatement {
            pan: details.pan,
            holder_name: details.holder_name,
            mobile: details.mobile,
            email: details.email,
            statement_date: details.statement_date,
            total_holdings: soa.len() + demat.len(),
            soa_value,
            demat_value,
            total_value: soa_value + demat_value,
            soa_holdings: soa,
            demat_holdings: demat,
            source_file: source_file.to_string(),
        };
        (statement, stats)
    }
}
