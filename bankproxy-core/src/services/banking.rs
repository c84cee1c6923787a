//! Banking service - balance, transactions and money transfers for one account

use std::sync::Arc;

use chrono::NaiveDate;

use super::audit::TransferAuditor;
use super::validator::validate;
use crate::domain::result::{Error, Result};
use crate::domain::{AccountBalance, AuditRecord, TimeZoneId, Transaction, TransferRequest, TransferResult};
use crate::ports::BankingApi;

/// Facade over the banking API for the configured account
pub struct BankingService {
    api: Arc<dyn BankingApi>,
    auditor: TransferAuditor,
    account_id: u64,
}

impl BankingService {
    pub fn new(api: Arc<dyn BankingApi>, auditor: TransferAuditor, account_id: u64) -> Self {
        Self {
            api,
            auditor,
            account_id,
        }
    }

    pub fn account_id(&self) -> u64 {
        self.account_id
    }

    /// Current balance of the account
    pub fn get_balance(&self, time_zone: &TimeZoneId) -> Result<AccountBalance> {
        tracing::info!(account_id = self.account_id, "Fetching balance");

        self.api
            .get_balance(self.account_id, time_zone)
            .and_then(validate)
            .map_err(|e| {
                tracing::error!(account_id = self.account_id, error = %e, "Error retrieving balance");
                Error::banking_service("Failed to retrieve balance", e)
            })
    }

    /// Transactions booked between two accounting dates.
    ///
    /// The range is passed through as-is; callers validate it.
    pub fn get_transactions(
        &self,
        from_date: NaiveDate,
        to_date: NaiveDate,
        time_zone: &TimeZoneId,
    ) -> Result<Vec<Transaction>> {
        tracing::info!(account_id = self.account_id, %from_date, %to_date, "Fetching transactions");

        self.api
            .get_transactions(self.account_id, from_date, to_date, time_zone)
            .and_then(validate)
            .map_err(|e| {
                tracing::error!(
                    account_id = self.account_id,
                    %from_date,
                    %to_date,
                    error = %e,
                    "Error retrieving transactions"
                );
                Error::banking_service("Failed to retrieve transactions", e)
            })
    }

    /// Submit a money transfer and record it locally.
    ///
    /// Errors are not wrapped. If the audit write fails the remote transfer
    /// has still been executed.
    pub fn create_money_transfer(
        &self,
        request: &TransferRequest,
        time_zone: &TimeZoneId,
    ) -> Result<TransferResult> {
        tracing::info!(
            account_id = self.account_id,
            amount = %request.amount,
            currency = %request.currency,
            "Creating money transfer"
        );

        let result = self
            .api
            .submit_transfer(self.account_id, request, time_zone)
            .and_then(validate)
            .map_err(|e| {
                tracing::error!(account_id = self.account_id, error = %e, "Error creating money transfer");
                e
            })?;

        self.auditor.record(request, &result).map_err(|e| {
            tracing::error!(
                account_id = self.account_id,
                transfer_id = %result.money_transfer_id,
                error = %e,
                "Money transfer executed but audit record was not saved"
            );
            e
        })?;

        Ok(result)
    }

    /// Transfers recorded locally with an execution date in `[from_date, to_date]`
    pub fn list_recorded_transfers(
        &self,
        from_date: NaiveDate,
        to_date: NaiveDate,
    ) -> Result<Vec<AuditRecord>> {
        self.auditor.list(from_date, to_date)
    }
}
