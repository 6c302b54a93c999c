use std::error::Error as _;
use std::path::PathBuf;

use general_parser::TableError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NsdlError {
    #[error("Cannot read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot open workbook {path}: {message}")]
    Workbook { path: PathBuf, message: String },

    #[error("Workbook {0} has no worksheet")]
    NoWorksheet(PathBuf),

    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("Malformed CSV")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Table(#[from] TableError),
}

impl NsdlError {
    /// Bounded raw-row dump for operator triage, when one is available.
    pub fn diagnostic(&self) -> Vec<String> {
        match self {
            NsdlError::Table(e) => e.diagnostic(),
            _ => Vec::new(),
        }
    }

    /// The message followed by every underlying cause, `outer: inner`.
    pub fn detail(&self) -> String {
        let mut out = self.to_string();
        let mut cause = self.source();
        while let Some(e) = cause {
            out.push_str(": ");
            out.push_str(&e.to_string());
            cause = e.source();
        }
        out
    }
}
