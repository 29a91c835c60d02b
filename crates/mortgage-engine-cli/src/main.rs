mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::comparison::CompareArgs;
use commands::currency::FormatArgs;
use commands::mortgage::{ScheduleArgs, SimulateArgs};
use commands::scenario::{ClassifyArgs, TrapArgs};
use commands::scenarios::SensitivityArgs;
use commands::solvers::{MaxLoanArgs, SolveTermArgs};

/// Fixed-rate mortgage amortisation calculations
#[derive(Parser)]
#[command(
    name = "mtg",
    version,
    about = "Fixed-rate mortgage amortisation calculations",
    long_about = "A CLI for simulating fixed-rate mortgages month by month with decimal \
                  precision. Supports amortisation schedules, overpayments, term solving \
                  from a payment, affordability, currency formatting, stress tiers, \
                  baseline comparisons and sensitivity grids."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log engine diagnostics to stderr (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a mortgage and summarise the totals
    Simulate(SimulateArgs),
    /// Print the month-by-month (or yearly) amortisation schedule
    Schedule(ScheduleArgs),
    /// Solve how many years a fixed monthly payment takes to repay a loan
    SolveTerm(SolveTermArgs),
    /// Largest loan a monthly budget can repay
    MaxLoan(MaxLoanArgs),
    /// Format an amount for a region or locale
    Format(FormatArgs),
    /// Payment-driven scenario: term, cost and stress tier for a payment
    Trap(TrapArgs),
    /// Compare the standard deal against an overpayment or shorter term
    Compare(CompareArgs),
    /// Stress tier for a term and interest share
    Classify(ClassifyArgs),
    /// Two-way sensitivity grid over simulation inputs
    Sensitivity(SensitivityArgs),
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

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| fallback.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Simulate(args) => commands::mortgage::run_simulate(args),
        Commands::Schedule(args) => commands::mortgage::run_schedule(args),
        Commands::SolveTerm(args) => commands::solvers::run_solve_term(args),
        Commands::MaxLoan(args) => commands::solvers::run_max_loan(args),
        Commands::Format(args) => commands::currency::run_format(args),
        Commands::Trap(args) => commands::scenario::run_trap(args),
        Commands::Compare(args) => commands::comparison::run_compare(args),
        Commands::Classify(args) => commands::scenario::run_classify(args),
        Commands::Sensitivity(args) => commands::scenarios::run_sensitivity(args),
        Commands::Version => {
            println!("mtg {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
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
