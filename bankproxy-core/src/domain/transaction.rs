//! Account transaction (remote view, read-only)

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A booked movement on the configured account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub operation_id: Option<String>,
    #[serde(default)]
    pub accounting_date: Option<NaiveDate>,
    #[serde(default)]
    pub value_date: Option<NaiveDate>,
    #[serde(default, rename = "type")]
    pub transaction_type: Option<TransactionType>,
    pub amount: Decimal,
    pub currency: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Remote classification, e.g. `{ "enumeration": "GBS_TRANSACTION_TYPE", "value": "GBS_ACCOUNT_TRANSACTION_TYPE_0050" }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionType {
    #[serde(default)]
    pub enumeration: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

impl Transaction {
    /// Whether money left the account
    pub fn is_debit(&self) -> bool {
        self.amount.is_sign_negative()
    }
}
