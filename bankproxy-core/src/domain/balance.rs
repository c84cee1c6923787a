//! Account balance as reported by the banking API

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Balance of the configured account. Built fresh from every response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBalance {
    /// As-of date of the balance
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub balance: Decimal,
    #[serde(default)]
    pub available_balance: Option<Decimal>,
    pub currency: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_payload() {
        let balance: AccountBalance = serde_json::from_str(
            r#"{"date":"2024-03-01","balance":1250.5,"availableBalance":1200,"currency":"EUR"}"#,
        )
        .unwrap();

        assert_eq!(balance.date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(balance.balance, Decimal::new(12505, 1));
        assert_eq!(balance.available_balance, Some(Decimal::new(1200, 0)));
        assert_eq!(balance.currency, "EUR");
    }

    #[test]
    fn test_deserialize_minimal_payload() {
        let balance: AccountBalance =
            serde_json::from_str(r#"{"balance":1000.00,"currency":"EUR"}"#).unwrap();

        assert_eq!(balance.balance, Decimal::new(100000, 2));
        assert!(balance.date.is_none());
        assert!(balance.available_balance.is_none());
    }
}
