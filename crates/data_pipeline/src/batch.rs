//! Per-file fault isolation for batches of independent statements.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;

/// What a failed parse reports about itself.
pub trait FailureReport {
    fn message(&self) -> String;

    /// A few raw rows of the offending file, when the parser has them.
    fn diagnostic(&self) -> Vec<String> {
        Vec::new()
    }
}

impl FailureReport for anyhow::Error {
    fn message(&self) -> String {
        format!("{:#}", self)
    }
}

impl FailureReport for nsdl_parser::NsdlError {
    fn message(&self) -> String {
        self.detail()
    }

    fn diagnostic(&self) -> Vec<String> {
        nsdl_parser::NsdlError::diagnostic(self)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub file: PathBuf,
    pub error: String,
    pub diagnostic: Vec<String>,
}

#[derive(Debug)]
pub struct BatchOutcome<T> {
    pub parsed: Vec<T>,
    pub failures: Vec<FileFailure>,
}

impl<T> Default for BatchOutcome<T> {
    fn default() -> Self {
        Self {
            parsed: Vec::new(),
            failures: Vec::new(),
        }
    }
}

/// Parses every file in parallel. Results keep input order; a failing file
/// never stops its siblings.
pub fn parse_batch<T, E, F>(paths: &[PathBuf], parse: F) -> BatchOutcome<T>
where
    T: Send,
    E: FailureReport + Send,
    F: Fn(&Path) -> Result<T, E> + Sync,
{
    let results: Vec<(&PathBuf, Result<T, E>)> =
        paths.par_iter().map(|p| (p, parse(p))).collect();

    let mut outcome = BatchOutcome::default();
    for (path, result) in results {
        match result {
            Ok(v) => outcome.parsed.push(v),
            Err(e) => outcome.failures.push(FileFailure {
                file: path.clone(),
                error: e.message(),
                diagnostic: e.diagnostic(),
            }),
        }
    }
    outcome
}
