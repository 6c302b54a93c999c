use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// Extracted records

/// One instrument line of an account statement.
///
/// `unit_price` and `value` stay at zero until a price is known; enrichment
/// overwrites both in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingRecord {
	pub identifier: String,
	pub display_name: String,
	pub quantity: f64,
	#[serde(default)]
	pub unit_price: f64,
	#[serde(default)]
	pub value: f64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub paid_up_value: Option<f64>,
}

impl HoldingRecord {
	/// A freshly extracted holding without pricing.
	pub fn unpriced(identifier: impl Into<String>, display_name: impl Into<String>, quantity: f64) -> Self {
		Self {
			identifier: identifier.into(),
			display_name: display_name.into(),
			quantity,
			unit_price: 0.0,
			value: 0.0,
			paid_up_value: None,
		}
	}

	/// Sets the unit price and recomputes `value`.
	pub fn set_price(&mut self, unit_price: f64) {
		self.unit_price = unit_price;
		self.value = self.quantity * unit_price;
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountStatement {
	pub source_label: String,
	pub holder_name: String,
	pub account_identifier: String,
	#[serde(default)]
	pub dp_id: String,
	#[serde(default)]
	pub client_id: String,
	pub statement_date: String,
	pub source_file: String,
	pub holdings: Vec<HoldingRecord>,
}

impl AccountStatement {
	/// Reference used when this account contributes to a consolidated position.
	pub fn account_ref(&self) -> String {
		format!("{}-{}", self.source_label, self.account_identifier)
	}

	pub fn total_value(&self) -> f64 {
		self.holdings.iter().map(|h| h.value).sum()
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HoldingType {
	#[serde(rename = "SOA")]
	NonDemat,
	#[serde(rename = "DEMAT")]
	Demat,
}

impl HoldingType {
	pub fn as_str(&self) -> &'static str {
		match self {
			HoldingType::NonDemat => "SOA",
			HoldingType::Demat => "DEMAT",
		}
	}
}

/// A mutual fund line reconstructed from converted statement text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeHolding {
	pub account_or_folio_id: String,
	pub scheme_name: String,
	pub invested_value: f64,
	pub units: f64,
	pub valuation_date: Option<NaiveDate>,
	pub unit_price: Option<f64>,
	pub market_value: f64,
	pub holding_type: HoldingType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MfStatement {
	pub pan: String,
	pub holder_name: String,
	pub mobile: String,
	pub email: String,
	pub statement_date: String,
	pub soa_holdings: Vec<SchemeHolding>,
	pub demat_holdings: Vec<SchemeHolding>,
	pub soa_value: f64,
	pub demat_value: f64,
	pub total_value: f64,
	pub total_holdings: usize,
	pub source_file: String,
}

// Consolidated output

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributingAccount {
	pub account_ref: String,
	pub holder_name: String,
	pub quantity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedPosition {
	pub identifier: String,
	pub display_name: String,
	pub total_quantity: f64,
	pub total_value: f64,
	pub contributing_accounts: Vec<ContributingAccount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquitySummary {
	pub total_value: f64,
	pub total_holdings: usize,
	pub total_accounts: usize,
	pub by_source: BTreeMap<String, f64>,
	pub accounts: Vec<AccountStatement>,
	pub consolidated_holdings: Vec<ConsolidatedPosition>,
}

/// A scheme holding tagged with the statement it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedSchemeHolding {
	#[serde(flatten)]
	pub holding: SchemeHolding,
	pub account: String,
	pub pan: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MfSummary {
	pub total_value: f64,
	pub total_holdings: usize,
	pub total_accounts: usize,
	pub soa_value: f64,
	pub demat_value: f64,
	pub accounts: Vec<MfStatement>,
	pub consolidated_holdings: Vec<TaggedSchemeHolding>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetWorthSummary {
	pub generated_at: String,
	pub equity_value: f64,
	pub mutual_fund_value: f64,
	pub total: f64,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_set_price_recomputes_value() {
		let mut h = HoldingRecord::unpriced("INE123A01011", "ABC Corp", 150.0);
		assert_eq!(h.value, 0.0);
		h.set_price(12.5);
		assert_eq!(h.unit_price, 12.5);
		assert!((h.value - 1875.0).abs() < 1e-9);
	}

	#[test]
	fn test_account_ref_joins_label_and_account() {
		let stmt = AccountStatement {
			source_label: "NSDL".to_string(),
			holder_name: "A".to_string(),
			account_identifier: "IN30021411722076".to_string(),
			dp_id: "IN300214".to_string(),
			client_id: "11722076".to_string(),
			statement_date: String::new(),
			source_file: "x.xlsx".to_string(),
			holdings: vec![],
		};
		assert_eq!(stmt.account_ref(), "NSDL-IN30021411722076");
	}

	#[test]
	fn test_holding_type_serializes_as_section_tag() {
		let json = serde_json::to_string(&HoldingType::NonDemat).unwrap();
		assert_eq!(json, "\"SOA\"");
		let json = serde_json::to_string(&HoldingType::Demat).unwrap();
		assert_eq!(json, "\"DEMAT\"");
	}

	#[test]
	fn test_paid_up_value_omitted_when_absent() {
		let h = HoldingRecord::unpriced("X", "Y", 1.0);
		let v = serde_json::to_value(&h).unwrap();
		assert!(v.get("paid_up_value").is_none());
		assert_eq!(v.get("quantity").and_then(|q| q.as_f64()), Some(1.0));
	}
}
