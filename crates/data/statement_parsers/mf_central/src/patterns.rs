use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

pub static SOA_KEY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{8,}$").unwrap());
pub static DEMAT_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]+-\d+$").unwrap());

/// Currency amount: invested and market value.
pub static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\d,]+\.\d{2}$").unwrap());
/// Any decimal: units and unit price. Also ends a scheme name.
pub static DECIMAL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\d,]+\.\d+$").unwrap());
pub static VALUATION_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}-[A-Za-z]{3}-\d{4}$").unwrap());
pub static ISO_DATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

pub static PAN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"PAN\s*:([A-Z0-9]+)").unwrap());
pub static MOBILE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Mobile:\s*(\d+)").unwrap());
pub static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Email:\s*(\S+@\S+)").unwrap());
pub static AS_ON_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"As on Date:\s*(\d{2}-[A-Za-z]{3}-\d{4})").unwrap());

pub fn amount(line: &str) -> Option<f64> {
    AMOUNT_RE.is_match(line).then(|| to_number(line)).flatten()
}

pub fn decimal(line: &str) -> Option<f64> {
    DECIMAL_RE.is_match(line).then(|| to_number(line)).flatten()
}

/// "01-Jan-2024"; shape-valid but impossible dates do not match.
pub fn valuation_date(line: &str) -> Option<NaiveDate> {
    if !VALUATION_DATE_RE.is_match(line) {
        return None;
    }
    NaiveDate::parse_from_str(line, "%d-%b-%Y").ok()
}

fn to_number(line: &str) -> Option<f64> {
    line.replace(',', "").parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_requires_two_decimals() {
        assert_eq!(amount("1,000.00"), Some(1000.0));
        assert_eq!(amount("50.0000"), None);
        assert_eq!(amount("1000"), None);
    }

    #[test]
    fn test_decimal_accepts_any_precision() {
        assert_eq!(decimal("50.0000"), Some(50.0));
        assert_eq!(decimal("1,234.5"), Some(1234.5));
        assert_eq!(decimal("01-Jan-2024"), None);
    }

    #[test]
    fn test_valuation_date() {
        assert_eq!(valuation_date("01-Jan-2024"), NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(valuation_date("31-Feb-2024"), None);
        assert_eq!(valuation_date("2024-01-01"), None);
    }

    #[test]
    fn test_record_keys() {
        assert!(SOA_KEY_RE.is_match("1234567890"));
        assert!(!SOA_KEY_RE.is_match("1234567"));
        assert!(DEMAT_KEY_RE.is_match("IN300214-11722076"));
        assert!(DEMAT_KEY_RE.is_match("12081800-41948166"));
        assert!(!DEMAT_KEY_RE.is_match("Client Id"));
    }
}
