use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use mortgage_engine_core::solvers::affordability::{analyze_affordability, AffordabilityInput};
use mortgage_engine_core::solvers::term::{analyze_term, TermInput};

use crate::input;

/// Arguments for solving the term from a monthly payment
#[derive(Args)]
pub struct SolveTermArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long, alias = "amount")]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Fixed monthly payment
    #[arg(long)]
    pub payment: Option<Decimal>,
}

/// Arguments for the affordability solver
#[derive(Args)]
pub struct MaxLoanArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Monthly budget available for the mortgage payment
    #[arg(long)]
    pub budget: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Longest acceptable term in years (default 40)
    #[arg(long)]
    pub max_years: Option<Decimal>,
}

pub fn run_solve_term(args: SolveTermArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let term_input: TermInput = input::load_or_build(args.input.as_deref(), || {
        Ok(TermInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_percent: args.rate.ok_or("--rate is required (or provide --input)")?,
            monthly_payment: args
                .payment
                .ok_or("--payment is required (or provide --input)")?,
        })
    })?;

    let result = analyze_term(&term_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_max_loan(args: MaxLoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let affordability_input: AffordabilityInput =
        input::load_or_build(args.input.as_deref(), || {
            Ok(AffordabilityInput {
                monthly_budget: args
                    .budget
                    .ok_or("--budget is required (or provide --input)")?,
                annual_rate_percent: args.rate.ok_or("--rate is required (or provide --input)")?,
                max_years: args.max_years,
            })
        })?;

    let result = analyze_affordability(&affordability_input)?;
    Ok(serde_json::to_value(result)?)
}
