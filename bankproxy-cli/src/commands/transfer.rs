//! Transfer command - submit a money transfer from a JSON request

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use bankproxy_core::validation::parse_transfer_request;

use super::{get_context, print_json, time_zone};
use crate::output;
use crate::GlobalOpts;

pub fn run(global: &GlobalOpts, file: &Path) -> Result<()> {
    let content = read_input(file)?;
    let request = parse_transfer_request(&content)?;

    let ctx = get_context(global)?;
    let tz = time_zone(&ctx, global);
    let result = ctx.banking_service.create_money_transfer(&request, &tz)?;

    if global.json {
        return print_json(&result);
    }

    output::success(&format!(
        "Transfer {} {}",
        result.money_transfer_id, result.status
    ));

    let mut table = output::create_table();
    table.add_row(vec!["Receiver".to_string(), request.receiver_name.clone()]);
    table.add_row(vec![
        "Amount".to_string(),
        format!("{} {}", request.amount, request.currency),
    ]);
    table.add_row(vec![
        "Execution date".to_string(),
        request.execution_date.to_string(),
    ]);
    table.add_row(vec![
        "Description".to_string(),
        request.description.clone(),
    ]);
    if let Some(cro) = &result.cro {
        table.add_row(vec!["CRO".to_string(), cro.clone()]);
    }
    if !result.fees.is_empty() {
        table.add_row(vec![
            "Fees".to_string(),
            result.total_fees().to_string(),
        ]);
    }

    println!("{}", table);
    Ok(())
}

/// Read the request body from a file, or stdin for `-`
fn read_input(file: &Path) -> Result<String> {
    if file == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read transfer request from stdin")?;
        return Ok(buffer);
    }

    std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read transfer request: {}", file.display()))
}
