use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::annuity::{annuity_present_value, monthly_rate, standard_payment, MONTHS_PER_YEAR};
use crate::types::*;
use crate::EngineResult;

/// Longest term considered when no maximum is supplied.
pub const DEFAULT_MAX_YEARS: Years = dec!(40);

/// Suggested loans are floored to a multiple of this amount.
const LOAN_ROUNDING_STEP: Money = dec!(1000);

/// Exact principal whose standard payment over `years` equals `monthly_budget`.
pub fn exact_max_principal(
    monthly_budget: Money,
    annual_rate_percent: Percent,
    years: Years,
) -> Money {
    if monthly_budget <= Decimal::ZERO || years <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let months = years.saturating_mul(MONTHS_PER_YEAR);
    annuity_present_value(monthly_budget, monthly_rate(annual_rate_percent), months)
}

/// Largest loan, floored to the nearest 1000 below, that `monthly_budget`
/// repays within `max_years` (40 when `None`).
///
/// Flooring keeps the suggestion affordable: its standard payment never
/// exceeds the budget.
pub fn max_loan_for_budget(
    monthly_budget: Money,
    annual_rate_percent: Percent,
    max_years: Option<Years>,
) -> Money {
    let years = max_years.unwrap_or(DEFAULT_MAX_YEARS);
    let exact = exact_max_principal(monthly_budget, annual_rate_percent, years);
    floor_to_step(exact)
}

fn floor_to_step(amount: Money) -> Money {
    if amount <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (amount / LOAN_ROUNDING_STEP).floor() * LOAN_ROUNDING_STEP
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityInput {
    pub monthly_budget: Money,
    pub annual_rate_percent: Percent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_years: Option<Years>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityOutput {
    pub max_loan: Money,
    pub exact_principal: Money,
    pub max_years: Years,
    /// Standard payment on `max_loan` over `max_years`; never above budget.
    pub standard_payment: Money,
    /// Budget left unused by the rounded-down loan.
    pub monthly_headroom: Money,
}

pub fn analyze_affordability(
    input: &AffordabilityInput,
) -> EngineResult<ComputationOutput<AffordabilityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let max_years = input.max_years.unwrap_or(DEFAULT_MAX_YEARS);
    if input.max_years.is_none() {
        warnings.push(format!("No max_years supplied; assuming {DEFAULT_MAX_YEARS}"));
    }
    if input.monthly_budget <= Decimal::ZERO {
        warnings.push("Monthly budget must be positive; no loan is affordable".into());
    }

    let exact_principal =
        exact_max_principal(input.monthly_budget, input.annual_rate_percent, max_years);
    let max_loan = floor_to_step(exact_principal);
    let payment = standard_payment(
        max_loan,
        input.annual_rate_percent,
        max_years.saturating_mul(MONTHS_PER_YEAR),
    );

    let output = AffordabilityOutput {
        max_loan,
        exact_principal,
        max_years,
        standard_payment: payment,
        monthly_headroom: input.monthly_budget.saturating_sub(payment).max(Decimal::ZERO),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Inverse Annuity Affordability (floored to 1,000)",
        input,
        warnings,
        elapsed,
        output,
    ))
}
