//! Consolidation of extracted holdings across accounts.
//!
//! Every call recomputes from the full input; nothing is updated incrementally.

use std::collections::{BTreeMap, HashMap};

use models::{
    AccountStatement, ConsolidatedPosition, ContributingAccount, EquitySummary, MfStatement,
    MfSummary, TaggedSchemeHolding,
};

/// Groups holdings by identifier across all statements.
///
/// The first display name seen for an identifier wins. Quantities and values
/// are summed, and the result is sorted by total value descending. Equal
/// values keep first-seen order.
pub fn consolidate_holdings(statements: &[AccountStatement]) -> Vec<ConsolidatedPosition> {
    let mut positions: Vec<ConsolidatedPosition> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for stmt in statements {
        let account_ref = stmt.account_ref();
        for h in &stmt.holdings {
            let slot = match index.get(&h.identifier) {
                Some(&i) => i,
                None => {
                    positions.push(ConsolidatedPosition {
                        identifier: h.identifier.clone(),
                        display_name: h.display_name.clone(),
                        total_quantity: 0.0,
                        total_value: 0.0,
                        contributing_accounts: Vec::new(),
                    });
                    index.insert(h.identifier.clone(), positions.len() - 1);
                    positions.len() - 1
                }
            };

            let pos = &mut positions[slot];
            pos.total_quantity += h.quantity;
            pos.total_value += h.value;
            pos.contributing_accounts.push(ContributingAccount {
                account_ref: account_ref.clone(),
                holder_name: stmt.holder_name.clone(),
                quantity: h.quantity,
            });
        }
    }

    positions.sort_by(|a, b| b.total_value.total_cmp(&a.total_value));
    positions
}

pub fn consolidate_equity(accounts: Vec<AccountStatement>) -> EquitySummary {
    let consolidated_holdings = consolidate_holdings(&accounts);

    let mut by_source: BTreeMap<String, f64> = BTreeMap::new();
    for stmt in &accounts {
        *by_source.entry(stmt.source_label.clone()).or_insert(0.0) += stmt.total_value();
    }

    EquitySummary {
        total_value: accounts.iter().map(AccountStatement::total_value).sum(),
        total_holdings: accounts.iter().map(|a| a.holdings.len()).sum(),
        total_accounts: accounts.len(),
        by_source,
        accounts,
        consolidated_holdings,
    }
}

/// Flattens scheme holdings of every statement, tagged with holder and PAN,
/// sorted by market value descending (stable).
pub fn consolidate_mf(accounts: Vec<MfStatement>) -> MfSummary {
    let mut consolidated_holdings: Vec<TaggedSchemeHolding> = accounts
        .iter()
        .flat_map(|stmt| {
            stmt.soa_holdings
                .iter()
                .chain(stmt.demat_holdings.iter())
                .map(|h| TaggedSchemeHolding {
                    holding: h.clone(),
                    account: stmt.holder_name.clone(),
                    pan: stmt.pan.clone(),
                })
        })
        .collect();
    consolidated_holdings.sort_by(|a, b| b.holding.market_value.total_cmp(&a.holding.market_value));

    let soa_value: f64 = accounts.iter().map(|s| s.soa_value).sum();
    let demat_value: f64 = accounts.iter().map(|s| s.demat_value).sum();

    MfSummary {
        total_value: soa_value + demat_value,
        total_holdings: consolidated_holdings.len(),
        total_accounts: accounts.len(),
        soa_value,
        demat_value,
        accounts,
        consolidated_holdings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::{HoldingRecord, HoldingType, SchemeHolding};

    fn priced(id: &str, name: &str, qty: f64, price: f64) -> HoldingRecord {
        let mut h = HoldingRecord::unpriced(id, name, qty);
        h.set_price(price);
        h
    }

    fn statement(client: &str, holder: &str, holdings: Vec<HoldingRecord>) -> AccountStatement {
        AccountStatement {
            source_label: "NSDL".to_string(),
            holder_name: holder.to_string(),
            account_identifier: format!("IN300214{}", client),
            dp_id: "IN300214".to_string(),
            client_id: client.to_string(),
            statement_date: "21-Oct-2025".to_string(),
            source_file: format!("{}.xlsx", client),
            holdings,
        }
    }

    #[test]
    fn test_consolidate_sums_across_accounts() {
        let a = statement(
            "11111111",
            "Asha",
            vec![priced("INE1", "Alpha Ltd", 10.0, 101.1), priced("INE2", "Beta", 3.0, 7.7)],
        );
        let b = statement(
            "22222222",
            "Ravi",
            vec![priced("INE1", "ALPHA LIMITED", 5.5, 101.1)],
        );

        let out = consolidate_holdings(&[a.clone(), b.clone()]);
        assert_eq!(out.len(), 2);

        let alpha = &out[0];
        assert_eq!(alpha.identifier, "INE1");
        assert_eq!(alpha.display_name, "Alpha Ltd");
        assert!((alpha.total_quantity - 15.5).abs() < 1e-9);

        let expected: f64 = [&a, &b]
            .iter()
            .flat_map(|s| s.holdings.iter())
            .filter(|h| h.identifier == "INE1")
            .map(|h| h.value)
            .sum();
        assert!((alpha.total_value - expected).abs() < 1e-6);

        assert_eq!(alpha.contributing_accounts.len(), 2);
        assert_eq!(alpha.contributing_accounts[0].account_ref, "NSDL-IN30021411111111");
        assert_eq!(alpha.contributing_accounts[1].holder_name, "Ravi");
        assert_eq!(alpha.contributing_accounts[1].quantity, 5.5);
    }

    #[test]
    fn test_consolidate_ties_keep_first_seen_order() {
        let a = statement(
            "11111111",
            "Asha",
            vec![
                HoldingRecord::unpriced("Z", "zed", 1.0),
                HoldingRecord::unpriced("A", "ay", 2.0),
                priced("M", "em", 1.0, 3.0),
            ],
        );
        let out = consolidate_holdings(&[a]);
        let ids: Vec<&str> = out.iter().map(|p| p.identifier.as_str()).collect();
        assert_eq!(ids, vec!["M", "Z", "A"]);
    }

    #[test]
    fn test_negative_quantities_are_summed() {
        let a = statement("11111111", "Asha", vec![HoldingRecord::unpriced("X", "x", 10.0)]);
        let b = statement("22222222", "Ravi", vec![HoldingRecord::unpriced("X", "x", -4.0)]);
        let out = consolidate_holdings(&[a, b]);
        assert_eq!(out[0].total_quantity, 6.0);
    }

    #[test]
    fn test_consolidate_equity_totals() {
        let a = statement("11111111", "Asha", vec![priced("INE1", "Alpha", 2.0, 50.0)]);
        let b = statement("22222222", "Ravi", vec![priced("INE2", "Beta", 1.0, 25.0)]);
        let summary = consolidate_equity(vec![a, b]);
        assert_eq!(summary.total_accounts, 2);
        assert_eq!(summary.total_holdings, 2);
        assert!((summary.total_value - 125.0).abs() < 1e-9);
        assert_eq!(summary.by_source.get("NSDL"), Some(&125.0));
    }

    fn scheme(folio: &str, name: &str, mv: f64, kind: HoldingType) -> SchemeHolding {
        SchemeHolding {
            account_or_folio_id: folio.to_string(),
            scheme_name: name.to_string(),
            invested_value: mv,
            units: 1.0,
            valuation_date: None,
            unit_price: None,
            market_value: mv,
            holding_type: kind,
        }
    }

    #[test]
    fn test_consolidate_mf_sorted_and_tagged() {
        let stmt = MfStatement {
            pan: "ABCDE1234F".to_string(),
            holder_name: "Asha".to_string(),
            mobile: String::new(),
            email: String::new(),
            statement_date: String::new(),
            soa_holdings: vec![
                scheme("12345678", "Small", 10.0, HoldingType::NonDemat),
                scheme("87654321", "Large", 500.0, HoldingType::NonDemat),
            ],
            demat_holdings: vec![scheme("IN300-1", "Mid", 100.0, HoldingType::Demat)],
            soa_value: 510.0,
            demat_value: 100.0,
            total_value: 610.0,
            total_holdings: 3,
            source_file: "asha.md".to_string(),
        };

        let summary = consolidate_mf(vec![stmt]);
        assert_eq!(summary.total_holdings, 3);
        assert_eq!(summary.total_value, 610.0);
        let names: Vec<&str> = summary
            .consolidated_holdings
            .iter()
            .map(|h| h.holding.scheme_name.as_str())
            .collect();
        assert_eq!(names, vec!["Large", "Mid", "Small"]);
        assert_eq!(summary.consolidated_holdings[0].pan, "ABCDE1234F");
        assert_eq!(summary.consolidated_holdings[0].account, "Asha");
    }
}
