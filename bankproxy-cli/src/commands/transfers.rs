//! Transfers command - list transfers recorded in the local audit log

use anyhow::Result;
use chrono::{Duration, Local, NaiveDate};

use bankproxy_core::validation::validate_date_range;

use super::{get_context, print_json};
use crate::output;
use crate::GlobalOpts;

/// Default window when `--from` is omitted
const DEFAULT_DAYS: i64 = 30;

pub fn run(global: &GlobalOpts, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<()> {
    let today = Local::now().date_naive();
    let to = to.unwrap_or(today);
    let from = from.unwrap_or(to - Duration::days(DEFAULT_DAYS));
    validate_date_range(from, to, today)?;

    let ctx = get_context(global)?;
    let records = ctx.banking_service.list_recorded_transfers(from, to)?;

    if global.json {
        return print_json(&records);
    }

    if records.is_empty() {
        output::info(&format!("No transfers recorded between {} and {}", from, to));
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec![
        "Execution date",
        "Transfer id",
        "Status",
        "Creditor",
        "Description",
        "Amount",
    ]);

    for record in &records {
        table.add_row(vec![
            comfy_table::Cell::new(record.execution_date.to_string()),
            comfy_table::Cell::new(&record.transfer_id),
            comfy_table::Cell::new(&record.status),
            comfy_table::Cell::new(output::or_dash(record.creditor_name.as_deref())),
            comfy_table::Cell::new(&record.description),
            output::amount_cell(record.amount, &record.currency),
        ]);
    }

    println!("{}", table);
    println!("{} transfers", records.len());
    Ok(())
}
