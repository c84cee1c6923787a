//! Balance command - show the account balance

use anyhow::Result;
use colored::Colorize;

use super::{get_context, print_json, time_zone};
use crate::output;
use crate::GlobalOpts;

pub fn run(global: &GlobalOpts) -> Result<()> {
    let ctx = get_context(global)?;
    let tz = time_zone(&ctx, global);
    let balance = ctx.banking_service.get_balance(&tz)?;

    if global.json {
        return print_json(&balance);
    }

    println!(
        "{} {}",
        "Account".bold(),
        ctx.banking_service.account_id()
    );
    println!();

    let mut table = output::create_table();
    table.add_row(vec![
        "Date".to_string(),
        balance
            .date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string()),
    ]);
    table.add_row(vec![
        "Balance".to_string(),
        format!("{} {}", balance.balance, balance.currency),
    ]);
    if let Some(available) = balance.available_balance {
        table.add_row(vec![
            "Available".to_string(),
            format!("{} {}", available, balance.currency),
        ]);
    }

    println!("{}", table);
    Ok(())
}
