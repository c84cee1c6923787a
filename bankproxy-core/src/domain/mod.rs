//! Core domain types
//!
//! Wire-level data of the banking API plus the local audit record. Pure
//! data and mapping, no I/O.

mod audit;
mod balance;
pub mod envelope;
pub mod result;
mod time_zone;
mod transaction;
pub mod transfer;

pub use audit::AuditRecord;
pub use balance::AccountBalance;
pub use envelope::{ApiError, Envelope};
pub use time_zone::TimeZoneId;
pub use transaction::{Transaction, TransactionType};
pub use transfer::{
    AccountRef, Creditor, Debtor, Fee, PostalAddress, TransferAmount, TransferRequest,
    TransferResult,
};
