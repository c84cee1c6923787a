//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The services
//! depend only on these traits, not on concrete implementations.

mod audit_store;
mod banking_api;

pub use audit_store::TransferAuditStore;
pub use banking_api::BankingApi;
