//! CLI command implementations

pub mod balance;
pub mod transactions;
pub mod transfer;
pub mod transfers;

use std::path::PathBuf;

use anyhow::{Context, Result};
use bankproxy_core::{BankProxyContext, TimeZoneId};

use crate::GlobalOpts;

/// Get the config directory from the command line, environment or default
pub fn get_config_dir(global: &GlobalOpts) -> Result<PathBuf> {
    if let Some(dir) = &global.config_dir {
        return Ok(dir.clone());
    }
    let home = dirs::home_dir().context("Could not find home directory")?;
    Ok(home.join(".bankproxy"))
}

/// Load configuration and open the audit database
pub fn get_context(global: &GlobalOpts) -> Result<BankProxyContext> {
    let config_dir = get_config_dir(global)?;

    // Create directory if it doesn't exist
    std::fs::create_dir_all(&config_dir)
        .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;

    tracing::debug!(config_dir = %config_dir.display(), "Loading configuration");
    let ctx = BankProxyContext::new(&config_dir).context("Failed to initialize bankproxy context")?;
    Ok(ctx)
}

/// Time zone for this invocation: `--time-zone` when valid, else the configured one
pub fn time_zone(ctx: &BankProxyContext, global: &GlobalOpts) -> TimeZoneId {
    ctx.time_zone(global.time_zone.as_deref())
}

/// Print a value as pretty JSON wrapped in an OK envelope
pub fn print_json<T: serde::Serialize>(payload: T) -> Result<()> {
    let envelope = bankproxy_core::Envelope::ok(payload);
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}
