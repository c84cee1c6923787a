//! Audit record of an executed transfer

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::transfer::{TransferRequest, TransferResult};

/// Locally persisted summary of a transfer the banking API accepted.
///
/// Written once, never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub local_id: Uuid,
    pub transfer_id: String,
    pub execution_date: NaiveDate,
    pub amount: Decimal,
    pub currency: String,
    pub description: String,
    pub creditor_name: Option<String>,
    pub creditor_account_code: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl AuditRecord {
    /// Build the record for a completed transfer.
    ///
    /// What was asked (date, amount, currency, description, creditor) comes
    /// from the request; only the transfer id and the status come from the
    /// remote result.
    pub fn from_transfer(request: &TransferRequest, result: &TransferResult) -> Self {
        let creditor = request.creditor.as_ref();

        Self {
            local_id: Uuid::new_v4(),
            transfer_id: result.money_transfer_id.clone(),
            execution_date: request.execution_date,
            amount: request.amount,
            currency: request.currency.clone(),
            description: request.description.clone(),
            creditor_name: creditor.map(|c| c.name.clone()),
            creditor_account_code: creditor
                .and_then(|c| c.account.as_ref())
                .map(|a| a.account_code.clone()),
            status: result.status.clone(),
            created_at: Utc::now(),
        }
    }
}
