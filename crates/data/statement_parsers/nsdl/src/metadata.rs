//! Account details printed above the holdings table.

use general_parser::Table;

const METADATA_ROWS: usize = 10;
const DP_ID_LEN: usize = 8;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct StatementMetadata {
    pub holder_name: String,
    pub dp_id: String,
    pub client_id: String,
    pub statement_date: String,
}

fn after_last_colon(text: &str) -> Option<String> {
    text.rsplit_once(':').map(|(_, v)| v.trim().to_string())
}

/// "SOH as on 21-Oct-2025 at 15:59:24" → "21-Oct-2025".
fn date_after_as_on(text: &str) -> Option<String> {
    let pos = text.to_ascii_lowercase().find("as on")?;
    let rest = text.get(pos + "as on".len()..)?;
    let rest = rest.trim_start_matches(|c: char| c == ':' || c.is_whitespace());
    let date = match rest.to_ascii_lowercase().find(" at ") {
        Some(end) => &rest[..end],
        None => rest,
    };
    let date = date.trim();
    (!date.is_empty()).then(|| date.to_string())
}

pub fn scan_metadata(table: &Table) -> StatementMetadata {
    let mut meta = StatementMetadata::default();
    let mut labelled_holder: Option<String> = None;

    for i in 0..table.height().min(METADATA_ROWS) {
        let row = table.row_text(i);

        if meta.holder_name.is_empty() && (row.contains("First holder") || row.contains("Sole Holder")) {
            meta.holder_name = after_last_colon(&row).unwrap_or_default();
        }
        if labelled_holder.is_none() && row.contains("Holder Name") {
            labelled_holder = after_last_colon(&row);
        }
        if meta.dp_id.is_empty() && row.contains("DP ID") {
            meta.dp_id = after_last_colon(&row).unwrap_or_default();
        }
        if meta.client_id.is_empty() && row.contains("Client ID") {
            meta.client_id = after_last_colon(&row).unwrap_or_default();
        }
        if meta.statement_date.is_empty() {
            if let Some(date) = date_after_as_on(&row) {
                meta.statement_date = date;
            }
        }
    }

    if meta.holder_name.is_empty() {
        meta.holder_name = labelled_holder.unwrap_or_default();
    }
    meta
}

/// Exports are usually named `<DP ID><Client ID>.xlsx`.
pub fn ids_from_file_stem(stem: &str) -> (String, String) {
    match stem.char_indices().nth(DP_ID_LEN) {
        Some((split, _)) => (stem[..split].to_string(), stem[split..].to_string()),
        None => (stem.to_string(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preamble() -> Table {
        Table::from_strings(vec![
            vec!["DP Name : Example Securities Ltd", ""],
            vec!["DP ID : IN300214", ""],
            vec!["Client ID", ": 11722076"],
            vec!["Holder Name : SOMEONE ELSE", ""],
            vec!["First holder : ASHA RAO", ""],
            vec!["SOH as on 21-Oct-2025 at 15:59:24", ""],
        ])
    }

    #[test]
    fn test_scan_metadata() {
        let meta = scan_metadata(&preamble());
        assert_eq!(meta.dp_id, "IN300214");
        assert_eq!(meta.client_id, "11722076");
        assert_eq!(meta.holder_name, "ASHA RAO");
        assert_eq!(meta.statement_date, "21-Oct-2025");
    }

    #[test]
    fn test_holder_name_used_without_first_holder() {
        let t = Table::from_strings(vec![
            vec!["Holder Name : ASHA RAO", ""],
            vec!["DP ID : IN300214", ""],
        ]);
        assert_eq!(scan_metadata(&t).holder_name, "ASHA RAO");
    }

    #[test]
    fn test_date_without_time() {
        assert_eq!(date_after_as_on("Holdings As On: 30-Sep-2025"), Some("30-Sep-2025".to_string()));
        assert_eq!(date_after_as_on("nothing here"), None);
    }

    #[test]
    fn test_ids_from_file_stem() {
        assert_eq!(
            ids_from_file_stem("IN30021411722076"),
            ("IN300214".to_string(), "11722076".to_string())
        );
        assert_eq!(ids_from_file_stem("short"), ("short".to_string(), String::new()));
        assert_eq!(ids_from_file_stem("IN300214"), ("IN300214".to_string(), String::new()));
    }
}
