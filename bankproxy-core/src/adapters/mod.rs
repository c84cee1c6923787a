//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - DuckDB for the TransferAuditStore port
//! - Fabrick HTTP client for the BankingApi port

pub mod duckdb;
pub mod fabrick;

#[cfg(test)]
pub mod fabrick_mock;
