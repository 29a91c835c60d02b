use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use mortgage_engine_core::amortisation::{analyze_mortgage, yearly_summary, MortgageInput};

use crate::input;

/// Loan terms shared by `simulate` and `schedule`
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct LoanArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long, alias = "amount")]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (4.5 = 4.5%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in years
    #[arg(long, alias = "years")]
    pub term: Option<Decimal>,

    /// Extra principal paid every month
    #[arg(long, default_value = "0")]
    pub overpayment: Decimal,

    /// Date of the first payment (YYYY-MM-DD); adds a payoff date
    #[arg(long)]
    pub start_date: Option<NaiveDate>,
}

impl LoanArgs {
    fn resolve(&self) -> Result<MortgageInput, Box<dyn std::error::Error>> {
        input::load_or_build(self.input.as_deref(), || {
            Ok(MortgageInput {
                principal: self
                    .principal
                    .ok_or("--principal is required (or provide --input)")?,
                annual_rate_percent: self
                    .rate
                    .ok_or("--rate is required (or provide --input)")?,
                term_years: self.term.ok_or("--term is required (or provide --input)")?,
                monthly_overpayment: self.overpayment,
                start_date: self.start_date,
            })
        })
    }
}

/// Arguments for the summary simulation
#[derive(Args)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub loan: LoanArgs,
}

/// Arguments for printing the schedule
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Roll the schedule up into loan years
    #[arg(long)]
    pub yearly: bool,
}

pub fn run_simulate(args: SimulateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mortgage_input = args.loan.resolve()?;
    let mut result = analyze_mortgage(&mortgage_input)?;

    // The summary view leaves the rows to `schedule`
    result.result.mortgage.schedule.clear();
    result.result.yearly.clear();
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mortgage_input = args.loan.resolve()?;
    let result = analyze_mortgage(&mortgage_input)?;
    for warning in &result.warnings {
        tracing::warn!("{warning}");
    }

    let rows = if args.yearly {
        serde_json::to_value(yearly_summary(&result.result.mortgage.schedule))?
    } else {
        serde_json::to_value(&result.result.mortgage.schedule)?
    };
    Ok(rows)
}
