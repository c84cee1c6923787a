//! BankProxy Core - banking API gateway for a single account
//!
//! This crate implements the core logic following hexagonal architecture:
//!
//! - **domain**: Wire types (envelope, balance, transactions, transfers) and the audit record
//! - **ports**: Trait definitions for external dependencies (BankingApi, TransferAuditStore)
//! - **services**: Response validation, audit recording and the banking facade
//! - **adapters**: Concrete implementations (Fabrick HTTP client, DuckDB)
//! - **validation**: Checks on caller input before it reaches the remote API

pub mod adapters;
pub mod config;
pub mod domain;
pub mod migrations;
pub mod ports;
pub mod services;
pub mod validation;

use std::path::Path;
use std::sync::Arc;

use adapters::duckdb::DuckDbAuditStore;
use adapters::fabrick::FabrickClient;
use config::Config;
use services::{BankingService, TransferAuditor};

// Re-export commonly used types at crate root
pub use domain::result::{Error, Result};
pub use domain::{
    AccountBalance, AuditRecord, Envelope, TimeZoneId, Transaction, TransferRequest,
    TransferResult,
};

/// Main context for BankProxy operations
///
/// Holds the configuration, the audit database and the banking service
/// wired to the remote API.
pub struct BankProxyContext {
    pub config: Config,
    pub audit_store: Arc<DuckDbAuditStore>,
    pub banking_service: BankingService,
}

impl BankProxyContext {
    /// Create a new context from the config directory
    pub fn new(config_dir: &Path) -> Result<Self> {
        let config = Config::load(config_dir)?;
        Self::from_config(config)
    }

    /// Create a context from an already loaded configuration
    pub fn from_config(config: Config) -> Result<Self> {
        let audit_store = Arc::new(DuckDbAuditStore::new(&config.database_path)?);
        audit_store.ensure_schema()?;

        let client = FabrickClient::new(&config.api).map_err(|e| Error::config(format!("{:#}", e)))?;

        let banking_service = BankingService::new(
            Arc::new(client),
            TransferAuditor::new(audit_store.clone()),
            config.api.account_id,
        );

        Ok(Self {
            config,
            audit_store,
            banking_service,
        })
    }

    /// Time zone to send upstream: the override when valid, else the configured default
    pub fn time_zone(&self, override_value: Option<&str>) -> TimeZoneId {
        TimeZoneId::resolve(override_value, &self.config.api.time_zone)
    }
}
