use crate::patterns::{AS_ON_DATE_RE, EMAIL_RE, MOBILE_RE, PAN_RE};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct InvestorDetails {
    pub pan: String,
    pub holder_name: String,
    pub mobile: String,
    pub email: String,
    pub statement_date: String,
}

fn first_capture(re: &regex::Regex, text: &str) -> String {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Investor block at the top of the statement. The holder name is printed
/// two lines below the PAN.
pub fn investor_details(text: &str) -> InvestorDetails {
    let pan = first_capture(&PAN_RE, text);

    let holder_name = if pan.is_empty() {
        String::new()
    } else {
        let lines: Vec<&str> = text.lines().collect();
        lines
            .iter()
            .position(|l| PAN_RE.captures(l).and_then(|c| c.get(1)).map(|m| m.as_str()) == Some(pan.as_str()))
            .and_then(|i| lines.get(i + 2))
            .map(|l| l.trim().to_string())
            .unwrap_or_default()
    };

    InvestorDetails {
        holder_name,
        mobile: first_capture(&MOBILE_RE, text),
        email: first_capture(&EMAIL_RE, text),
        statement_date: first_capture(&AS_ON_DATE_RE, text),
        pan,
    }
}
