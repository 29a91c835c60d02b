use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use mortgage_engine_core::classification::{analyze_classification, ClassifyInput};
use mortgage_engine_core::scenario::{
    analyze_payment_scenario, PaymentScenarioInput, REFERENCE_PRINCIPAL, REFERENCE_RATE_PERCENT,
};

use crate::input;

/// Arguments for the payment-driven scenario
#[derive(Args)]
pub struct TrapArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed (default 250,000)
    #[arg(long, alias = "amount")]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (default 4.5)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Monthly payment to test
    #[arg(long)]
    pub payment: Option<Decimal>,

    /// Month of the schedule to inspect (1-indexed)
    #[arg(long)]
    pub month: Option<u32>,
}

/// Arguments for stress-tier classification
#[derive(Args)]
pub struct ClassifyArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Term in years
    #[arg(long)]
    pub term: Option<Decimal>,

    /// Interest as a percentage of total cost
    #[arg(long)]
    pub interest_share: Option<Decimal>,
}

pub fn run_trap(args: TrapArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let scenario_input: PaymentScenarioInput = input::load_or_build(args.input.as_deref(), || {
        Ok(PaymentScenarioInput {
            principal: args.principal.unwrap_or(REFERENCE_PRINCIPAL),
            annual_rate_percent: args.rate.unwrap_or(REFERENCE_RATE_PERCENT),
            monthly_payment: args
                .payment
                .ok_or("--payment is required (or provide --input)")?,
            inspect_month: args.month,
        })
    })?;

    let result = analyze_payment_scenario(&scenario_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_classify(args: ClassifyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let classify_input: ClassifyInput = input::load_or_build(args.input.as_deref(), || {
        Ok(ClassifyInput {
            term_years: args.term.ok_or("--term is required (or provide --input)")?,
            interest_share_pct: args
                .interest_share
                .ok_or("--interest-share is required (or provide --input)")?,
        })
    })?;

    let result = analyze_classification(&classify_input)?;
    Ok(serde_json::to_value(result)?)
}
