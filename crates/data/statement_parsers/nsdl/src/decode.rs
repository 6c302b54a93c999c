//! Reads workbooks and CSV exports into a [`Table`].

use std::fs;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use encoding_rs::{Encoding, WINDOWS_1252};
use general_parser::{Cell, Table};

use crate::error::NsdlError;

pub const SUPPORTED_EXTENSIONS: &[&str] = &["xlsx", "xls", "ods", "csv"];

pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

pub fn read_table(path: &Path) -> Result<Table, NsdlError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "csv" => {
            let bytes = fs::read(path).map_err(|source| NsdlError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            csv_table(&decode_text(&bytes))
        }
        "xlsx" | "xls" | "ods" => workbook_table(path),
        _ => Err(NsdlError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// First worksheet only.
fn workbook_table(path: &Path) -> Result<Table, NsdlError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| NsdlError::Workbook {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| NsdlError::NoWorksheet(path.to_path_buf()))?
        .map_err(|e| NsdlError::Workbook {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    Ok(Table::new(
        range
            .rows()
            .map(|row| row.iter().map(data_to_cell).collect())
            .collect(),
    ))
}

pub fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::String(s) => Cell::text(s.as_str()),
        other => Cell::text(other.to_string()),
    }
}

/// BOM first, then UTF-8 if the bytes are valid, else Windows-1252.
pub fn decode_text(bytes: &[u8]) -> String {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (decoded, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return decoded.into_owned();
    }
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            let (decoded, _, _) = WINDOWS_1252.decode(bytes);
            decoded.into_owned()
        }
    }
}

fn csv_table(text: &str) -> Result<Table, NsdlError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(Cell::text).collect());
    }
    Ok(Table::new(rows))
}
