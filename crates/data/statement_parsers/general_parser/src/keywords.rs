//! Header vocabularies for the three semantic column roles.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Identifier,
    Name,
    Quantity,
}

/// Classification priority: earlier roles are tested first.
pub const ROLE_PRIORITY: [Role; 3] = [Role::Identifier, Role::Name, Role::Quantity];

pub const IDENTIFIER_KEYWORDS: &[&str] = &[
    "isin",
    "isin no",
    "isin number",
    "code",
    "symbol",
    "scrip code",
    "security code",
    "sec code",
];

pub const NAME_KEYWORDS: &[&str] = &[
    "name",
    "security",
    "scrip",
    "description",
    "instrument",
    "security name",
    "scrip name",
    "name of security",
    "sec name",
    "company",
    "company name",
];

pub const QUANTITY_KEYWORDS: &[&str] = &[
    "quantity",
    "balance",
    "holding",
    "unit",
    "qty",
    "shares",
    "bal qty",
    "bal.qty",
    "bal",
    "free qty",
    "total qty",
    "no. of shares",
    "no.of shares",
    "no of shares",
    "closing balance",
    "closing bal",
];

impl Role {
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Role::Identifier => IDENTIFIER_KEYWORDS,
            Role::Name => NAME_KEYWORDS,
            Role::Quantity => QUANTITY_KEYWORDS,
        }
    }

    /// True if any keyword of this role occurs in `text` (already lowercased).
    pub fn matches(&self, text: &str) -> bool {
        self.keywords().iter().any(|kw| text.contains(kw))
    }
}

/// First role, in priority order, whose vocabulary matches `label`.
pub fn classify_label(label: &str) -> Option<Role> {
    let label = utils::normalize_label(label);
    ROLE_PRIORITY.into_iter().find(|r| r.matches(&label))
}

/// Number of distinct vocabularies present in a row. Each cell counts for
/// at most one role, the one [`classify_label`] gives it, so a label such as
/// "Scrip Code" or "Unit Holder Name" never qualifies a row on its own.
pub fn vocabularies_matched<'a, I>(cells: I) -> usize
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen: Vec<Role> = Vec::with_capacity(ROLE_PRIORITY.len());
    for role in cells.into_iter().filter_map(classify_label) {
        if !seen.contains(&role) {
            seen.push(role);
        }
    }
    seen.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_label_priority() {
        assert_eq!(classify_label("ISIN"), Some(Role::Identifier));
        assert_eq!(classify_label("Security Code"), Some(Role::Identifier));
        assert_eq!(classify_label("Security  Name"), Some(Role::Name));
        assert_eq!(classify_label("Free Qty"), Some(Role::Quantity));
        assert_eq!(classify_label("Closing Balance"), Some(Role::Quantity));
        assert_eq!(classify_label("Market Value"), None);
    }

    #[test]
    fn test_vocabularies_matched_counts_distinct_roles() {
        assert_eq!(vocabularies_matched(["ISIN", "Security Name", "Quantity"]), 3);
        assert_eq!(vocabularies_matched(["Scrip", "Balance", ""]), 2);
        assert_eq!(vocabularies_matched(["Holder Name : ASHA"]), 1);
        assert_eq!(vocabularies_matched(["Statement of Holdings"]), 1);
        assert_eq!(vocabularies_matched(["DP ID : IN300214"]), 0);
    }

    #[test]
    fn test_single_label_counts_for_one_role() {
        assert_eq!(vocabularies_matched(["Scrip Code"]), 1);
        assert_eq!(vocabularies_matched(["Security Code"]), 1);
        assert_eq!(vocabularies_matched(["Unit Holder Name : ASHA RAO"]), 1);
        assert_eq!(vocabularies_matched(["Name", "Security"]), 1);
    }
}
