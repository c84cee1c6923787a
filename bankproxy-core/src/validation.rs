//! Inbound request validation
//!
//! Checks applied to caller input before anything is sent to the banking
//! API. Field failures are reported as [`Error::Validation`], bad date
//! ranges as [`Error::InvalidArgument`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::result::{Error, Result};
use crate::domain::{Creditor, TransferRequest};

/// Reject reversed ranges and ranges ending after `today`
pub fn validate_date_range(from_date: NaiveDate, to_date: NaiveDate, today: NaiveDate) -> Result<()> {
    if from_date > to_date {
        return Err(Error::invalid_argument("From date cannot be after to date"));
    }
    if to_date > today {
        return Err(Error::invalid_argument("To date cannot be in the future"));
    }
    Ok(())
}

/// Transfer body as received, before required fields are known to be present
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransferDraft {
    #[serde(default)]
    receiver_name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    currency: String,
    #[serde(default, with = "rust_decimal::serde::arbitrary_precision_option")]
    amount: Option<Decimal>,
    #[serde(default)]
    execution_date: Option<NaiveDate>,
    #[serde(default)]
    creditor: Option<Creditor>,
}

/// Decode and validate an inbound transfer body.
///
/// Malformed JSON is an [`Error::Json`]. A missing `amount` or
/// `executionDate` is reported with the other field violations.
pub fn parse_transfer_request(body: &str) -> Result<TransferRequest> {
    let draft: TransferDraft = serde_json::from_str(body)?;

    let violations = transfer_violations(
        &draft.receiver_name,
        &draft.description,
        &draft.currency,
        draft.amount,
        draft.execution_date.is_some(),
        draft.creditor.as_ref(),
    );

    match (draft.amount, draft.execution_date) {
        (Some(amount), Some(execution_date)) if violations.is_empty() => Ok(TransferRequest {
            receiver_name: draft.receiver_name,
            description: draft.description,
            currency: draft.currency,
            amount,
            execution_date,
            creditor: draft.creditor,
        }),
        _ => Err(Error::validation(violations.join(", "))),
    }
}

/// Check required fields of a money transfer.
///
/// Every violation is collected; the message joins them with `", "`.
pub fn validate_transfer_request(request: &TransferRequest) -> Result<()> {
    let violations = transfer_violations(
        &request.receiver_name,
        &request.description,
        &request.currency,
        Some(request.amount),
        true,
        request.creditor.as_ref(),
    );

    if violations.is_empty() {
        Ok(())
    } else {
        Err(Error::validation(violations.join(", ")))
    }
}

fn transfer_violations(
    receiver_name: &str,
    description: &str,
    currency: &str,
    amount: Option<Decimal>,
    has_execution_date: bool,
    creditor: Option<&Creditor>,
) -> Vec<&'static str> {
    let mut violations = Vec::new();

    if is_blank(receiver_name) {
        violations.push("Receiver name is required");
    }
    if is_blank(description) {
        violations.push("Description is required");
    }
    if is_blank(currency) {
        violations.push("Currency is required");
    }
    match amount {
        None => violations.push("Amount is required"),
        Some(amount) if amount <= Decimal::ZERO => violations.push("Amount must be positive"),
        Some(_) => {}
    }
    if !has_execution_date {
        violations.push("Execution date is required");
    }

    match creditor {
        None => violations.push("Creditor details are required"),
        Some(creditor) => {
            if is_blank(&creditor.name) {
                violations.push("Creditor name is required");
            }
            match &creditor.account {
                None => violations.push("Creditor account is required"),
                Some(account) if is_blank(&account.account_code) => {
                    violations.push("Account code (IBAN) is required")
                }
                Some(_) => {}
            }
        }
    }

    violations
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
