use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use mortgage_engine_core::scenarios::sensitivity::{
    run_sensitivity as run_grid, OutputMetric, SensitivityInput, SweepVariable,
};
use mortgage_engine_core::SimulationParams;

use crate::input;

/// Arguments for sensitivity analysis
#[derive(Args)]
pub struct SensitivityArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Base case amount borrowed
    #[arg(long, alias = "amount")]
    pub principal: Option<Decimal>,

    /// Base case annual interest rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Base case term in years
    #[arg(long, alias = "years")]
    pub term: Option<Decimal>,

    /// Base case monthly overpayment
    #[arg(long, default_value = "0")]
    pub overpayment: Decimal,

    /// Row variable in format name:min:max:step
    /// (e.g. "rate:3:6:0.5"; names: principal, rate, term, overpayment)
    #[arg(long)]
    pub var1: Option<String>,

    /// Column variable in format name:min:max:step
    #[arg(long)]
    pub var2: Option<String>,

    /// Figure in each cell: total_interest, total_cost, months, years, payment
    #[arg(long, default_value = "total_interest")]
    pub metric: OutputMetric,
}

fn parse_sweep(arg: &str) -> Result<SweepVariable, Box<dyn std::error::Error>> {
    let parts: Vec<&str> = arg.split(':').collect();
    if parts.len() != 4 {
        return Err(format!(
            "Sensitivity variable must be name:min:max:step, got '{}'",
            arg
        )
        .into());
    }
    Ok(SweepVariable {
        field: parts[0].parse()?,
        min: parts[1].parse()?,
        max: parts[2].parse()?,
        step: parts[3].parse()?,
    })
}

pub fn run_sensitivity(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sensitivity_input: SensitivityInput = input::load_or_build(args.input.as_deref(), || {
        let var1 = args.var1.as_deref().ok_or("--var1 is required (or provide --input)")?;
        let var2 = args.var2.as_deref().ok_or("--var2 is required (or provide --input)")?;
        Ok(SensitivityInput {
            base: SimulationParams::new(
                args.principal
                    .ok_or("--principal is required (or provide --input)")?,
                args.rate.ok_or("--rate is required (or provide --input)")?,
                args.term.ok_or("--term is required (or provide --input)")?,
                args.overpayment,
            ),
            variable_1: parse_sweep(var1)?,
            variable_2: parse_sweep(var2)?,
            output_metric: args.metric,
        })
    })?;

    let result = run_grid(&sensitivity_input)?;
    Ok(serde_json::to_value(result)?)
}
