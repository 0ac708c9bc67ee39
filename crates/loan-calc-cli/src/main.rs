mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::loan::{ExportArgs, LoanArgs};
use commands::user::{CredentialArgs, LoginArgs};

/// Loan amortization schedules from the command line
#[derive(Parser)]
#[command(
    name = "loancalc",
    version,
    about = "Loan amortization schedules with decimal precision",
    long_about = "Computes the periodic payment and full amortization schedule of a \
                  fixed-rate loan with monthly, bi-weekly or weekly payments and an \
                  optional extra payment each period. Schedules can be exported as CSV."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Full amortization schedule with summary and warnings
    Schedule(LoanArgs),
    /// Scheduled periodic payment only
    Payment(LoanArgs),
    /// Totals: interest, total cost, payment count, savings from extra payments
    Summary(LoanArgs),
    /// Write the schedule as CSV to stdout or a file
    Export(ExportArgs),
    /// Register a dashboard user
    Register(CredentialArgs),
    /// Check a user's password and open a session
    Login(LoginArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Schedule(args) => commands::loan::run_schedule(args),
        Commands::Payment(args) => commands::loan::run_payment(args),
        Commands::Summary(args) => commands::loan::run_summary(args),
        Commands::Export(args) => commands::loan::run_export(args),
        Commands::Register(args) => commands::user::run_register(args),
        Commands::Login(args) => commands::user::run_login(args),
        Commands::Version => {
            println!("loancalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(serde_json::Value::Null) => process::exit(0),
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
