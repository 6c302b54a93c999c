//! Text and number coercion shared by the statement parsers.

/// Tokens that mean "no value" in exported tables.
const NOT_AVAILABLE: &[&str] = &["nan", "n/a", "na", "none", "null", "not available", "-"];

/// Currency markers stripped before numeric conversion.
const CURRENCY_MARKERS: &[&str] = &["₹", "INR", "Rs.", "Rs"];

/// Parses a number as it appears in statements: thousands separators,
/// currency symbols and surrounding whitespace are tolerated.
///
/// Returns `None` for empty input and for anything that is not a finite
/// number after cleaning.
pub fn parse_number(raw: &str) -> Option<f64> {
    let mut s = raw.trim().to_string();
    for marker in CURRENCY_MARKERS {
        s = s.replace(marker, "");
    }
    let s: String = s.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// True for blank cells and placeholder tokens such as "nan" or "N/A".
pub fn is_not_available(raw: &str) -> bool {
    let s = raw.trim();
    s.is_empty() || NOT_AVAILABLE.iter().any(|t| s.eq_ignore_ascii_case(t))
}

pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercased label with runs of whitespace collapsed to one space.
pub fn normalize_label(s: &str) -> String {
    collapse_whitespace(s).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_plain_and_grouped() {
        assert_eq!(parse_number("150.0"), Some(150.0));
        assert_eq!(parse_number(" 1,23,456.50 "), Some(123456.5));
        assert_eq!(parse_number("-12"), Some(-12.0));
    }

    #[test]
    fn test_parse_number_strips_currency() {
        assert_eq!(parse_number("₹ 1,000.00"), Some(1000.0));
        assert_eq!(parse_number("INR 250"), Some(250.0));
        assert_eq!(parse_number("Rs. 10.5"), Some(10.5));
    }

    #[test]
    fn test_parse_number_rejects_text() {
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn test_is_not_available() {
        assert!(is_not_available(""));
        assert!(is_not_available("   "));
        assert!(is_not_available("nan"));
        assert!(is_not_available("N/A"));
        assert!(is_not_available("Not Available"));
        assert!(!is_not_available("INE123A01011"));
    }

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("  Security\n  Name "), "security name");
        assert_eq!(normalize_label("ISIN"), "isin");
    }
}
