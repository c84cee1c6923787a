//! BankProxy CLI - single-account banking from your terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod output;

use commands::{balance, transactions, transfer, transfers};

/// Environment variable holding the log filter
const LOG_ENV: &str = "BANKPROXY_LOG";

/// BankProxy - balance, transactions and money transfers for one account
#[derive(Parser)]
#[command(name = "bp", version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command
#[derive(Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Configuration directory (default: ~/.bankproxy)
    #[arg(long, global = true, env = "BANKPROXY_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Time zone sent to the banking API for this request (e.g. Europe/Rome)
    #[arg(long, global = true)]
    pub time_zone: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the account balance
    Balance,

    /// List transactions between two accounting dates
    Transactions {
        /// First accounting date (YYYY-MM-DD)
        #[arg(long)]
        from: NaiveDate,
        /// Last accounting date (YYYY-MM-DD)
        #[arg(long)]
        to: NaiveDate,
    },

    /// Submit a money transfer
    Transfer {
        /// JSON file with the transfer request, or - for stdin
        #[arg(short, long)]
        file: PathBuf,
    },

    /// List transfers recorded locally
    Transfers {
        /// First execution date (default: 30 days ago)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last execution date (default: today)
        #[arg(long)]
        to: Option<NaiveDate>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let json = cli.global.json;
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if json {
                output::error_json(&e);
            } else {
                output::error(&format!("Error: {:#}", e));
            }
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr so JSON on stdout stays clean
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let global = cli.global;
    match cli.command {
        Commands::Balance => balance::run(&global),
        Commands::Transactions { from, to } => transactions::run(&global, from, to),
        Commands::Transfer { file } => transfer::run(&global, &file),
        Commands::Transfers { from, to } => transfers::run(&global, from, to),
    }
}
