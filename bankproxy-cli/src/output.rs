//! Output formatting utilities

use bankproxy_core::domain::result::{CODE_SYSTEM, Error as CoreError};
use bankproxy_core::Envelope;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, CellAlignment, ContentArrangement, Table};
use rust_decimal::Decimal;

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Print an error as a KO envelope on stdout.
///
/// Library errors carry their own code; anything else is reported as a
/// system error without details.
pub fn error_json(err: &anyhow::Error) {
    let envelope: Envelope<()> = match err.downcast_ref::<CoreError>() {
        Some(core) => core.to_envelope(),
        None => Envelope::failure(CODE_SYSTEM, "An unexpected error occurred"),
    };
    match serde_json::to_string_pretty(&envelope) {
        Ok(json) => println!("{}", json),
        Err(_) => error(&format!("Error: {:#}", err)),
    }
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Right-aligned amount cell, debits in red
pub fn amount_cell(amount: Decimal, currency: &str) -> Cell {
    let text = format!("{} {}", amount, currency);
    let text = if amount.is_sign_negative() {
        text.red().to_string()
    } else {
        text
    };
    Cell::new(text).set_alignment(CellAlignment::Right)
}

/// Placeholder for missing optional values
pub fn or_dash(value: Option<&str>) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or("-").to_string()
}
