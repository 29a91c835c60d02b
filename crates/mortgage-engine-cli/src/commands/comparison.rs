use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use mortgage_engine_core::comparison::{analyze_comparison, ComparisonInput};
use mortgage_engine_core::currency::Region;
use mortgage_engine_core::SimulationParams;

use crate::input;

/// Arguments for baseline vs alternative comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long, alias = "amount")]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Baseline term in years
    #[arg(long, alias = "years")]
    pub term: Option<Decimal>,

    /// Monthly overpayment in the alternative
    #[arg(long, default_value = "0")]
    pub overpayment: Decimal,

    /// Alternative term in years (defaults to the baseline term)
    #[arg(long)]
    pub alt_term: Option<Decimal>,

    /// Market the brief is written for: UK, USA or EU
    #[arg(long, default_value = "UK")]
    pub region: Region,
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let comparison_input: ComparisonInput = input::load_or_build(args.input.as_deref(), || {
        let principal = args
            .principal
            .ok_or("--principal is required (or provide --input)")?;
        let rate = args.rate.ok_or("--rate is required (or provide --input)")?;
        let term = args.term.ok_or("--term is required (or provide --input)")?;
        if args.overpayment.is_zero() && args.alt_term.is_none() {
            return Err("give --overpayment and/or --alt-term to describe the alternative".into());
        }
        Ok(ComparisonInput {
            region: args.region,
            baseline: SimulationParams::new(principal, rate, term, Decimal::ZERO),
            alternative: SimulationParams::new(
                principal,
                rate,
                args.alt_term.unwrap_or(term),
                args.overpayment,
            ),
        })
    })?;

    let result = analyze_comparison(&comparison_input)?;
    Ok(serde_json::to_value(result)?)
}
