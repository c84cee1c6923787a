//! Transactions command - list booked transactions in a date range

use anyhow::Result;
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;

use bankproxy_core::validation::validate_date_range;

use super::{get_context, print_json, time_zone};
use crate::output;
use crate::GlobalOpts;

pub fn run(global: &GlobalOpts, from: NaiveDate, to: NaiveDate) -> Result<()> {
    validate_date_range(from, to, Local::now().date_naive())?;

    let ctx = get_context(global)?;
    let tz = time_zone(&ctx, global);
    let transactions = ctx.banking_service.get_transactions(from, to, &tz)?;

    if global.json {
        return print_json(&transactions);
    }

    if transactions.is_empty() {
        output::info(&format!("No transactions between {} and {}", from, to));
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Accounting date", "Value date", "Description", "Amount"]);

    for tx in &transactions {
        table.add_row(vec![
            comfy_table::Cell::new(
                tx.accounting_date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
            comfy_table::Cell::new(
                tx.value_date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
            comfy_table::Cell::new(output::or_dash(tx.description.as_deref())),
            output::amount_cell(tx.amount, &tx.currency),
        ]);
    }

    println!("{}", table);

    let debits = transactions.iter().filter(|t| t.is_debit()).count();
    let net: Decimal = transactions.iter().map(|t| t.amount).sum();
    println!(
        "{} transactions ({} debits), net {}",
        transactions.len(),
        debits,
        net
    );
    Ok(())
}
