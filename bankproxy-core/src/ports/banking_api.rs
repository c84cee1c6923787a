//! Banking API port
//!
//! Defines the interface for talking to the remote banking API. The facade
//! depends only on this trait, so tests can substitute a scripted double.

use chrono::NaiveDate;

use crate::domain::result::Result;
use crate::domain::{AccountBalance, Envelope, TimeZoneId, Transaction, TransferRequest, TransferResult};

/// Remote banking API client
///
/// Every method returns the raw envelope; `Ok(None)` means the remote
/// answered with an empty body. Transport failures, non-2xx statuses and
/// undecodable bodies are reported as [`crate::Error::RemoteCall`].
///
/// The time zone is resolved per request by the caller and is sent as the
/// `X-Time-Zone` header.
pub trait BankingApi: Send + Sync {
    /// `GET .../accounts/{accountId}/balance`
    fn get_balance(
        &self,
        account_id: u64,
        time_zone: &TimeZoneId,
    ) -> Result<Option<Envelope<AccountBalance>>>;

    /// `GET .../accounts/{accountId}/transactions?fromAccountingDate=..&toAccountingDate=..`
    fn get_transactions(
        &self,
        account_id: u64,
        from_date: NaiveDate,
        to_date: NaiveDate,
        time_zone: &TimeZoneId,
    ) -> Result<Option<Envelope<Vec<Transaction>>>>;

    /// `POST .../accounts/{accountId}/payments/money-transfers`
    fn submit_transfer(
        &self,
        account_id: u64,
        request: &TransferRequest,
        time_zone: &TimeZoneId,
    ) -> Result<Option<Envelope<TransferResult>>>;
}
