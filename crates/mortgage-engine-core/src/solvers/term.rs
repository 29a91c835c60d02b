use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::annuity::{interest_only_payment, minimum_viable_payment, monthly_rate, MONTHS_PER_YEAR};
use crate::types::*;
use crate::EngineResult;

/// Returned when the payment never retires the loan.
pub const INFINITE_TERM_YEARS: Years = dec!(999);

/// Terms at or above this are treated as never paying off.
pub const UNREALISTIC_TERM_YEARS: Years = dec!(99);

/// Years needed to repay `principal` with a fixed `monthly_payment`.
///
/// Inverts the annuity formula: n = ln(M / (M − P·r)) / ln(1 + r). A payment
/// at or below one month's interest returns [`INFINITE_TERM_YEARS`], as does
/// any step that leaves the Decimal range. A zero rate repays straight-line.
pub fn solve_term_from_payment(
    principal: Money,
    annual_rate_percent: Percent,
    monthly_payment: Money,
) -> Years {
    if principal <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let rate = monthly_rate(annual_rate_percent);
    let Some(interest) = principal.checked_mul(rate) else {
        debug!(principal = %principal, rate = %rate, "monthly interest out of range");
        return INFINITE_TERM_YEARS;
    };
    if monthly_payment <= interest {
        debug!(
            payment = %monthly_payment,
            interest = %interest,
            "payment does not cover interest; term is unbounded"
        );
        return INFINITE_TERM_YEARS;
    }

    let months = if rate.is_zero() {
        principal.checked_div(monthly_payment)
    } else {
        monthly_payment
            .checked_sub(interest)
            .and_then(|net| monthly_payment.checked_div(net))
            .and_then(|ratio| ratio.checked_ln())
            .zip((Decimal::ONE + rate).checked_ln())
            .and_then(|(numerator, denominator)| numerator.checked_div(denominator))
    };

    match months {
        Some(months) if months >= Decimal::ZERO => months / MONTHS_PER_YEAR,
        _ => INFINITE_TERM_YEARS,
    }
}

/// Whether a solved term means "will not pay off in a realistic horizon".
pub fn is_unrealistic_term(years: Years) -> bool {
    years >= UNREALISTIC_TERM_YEARS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermInput {
    pub principal: Money,
    pub annual_rate_percent: Percent,
    pub monthly_payment: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermOutput {
    pub term_years: Years,
    /// Term in months, rounded up to whole payments.
    pub term_months: Decimal,
    pub pays_off: bool,
    pub interest_only_payment: Money,
    /// Lowest payment the interactive layer offers for this loan.
    pub minimum_viable_payment: Money,
}

pub fn analyze_term(input: &TermInput) -> EngineResult<ComputationOutput<TermOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let term_years = solve_term_from_payment(
        input.principal,
        input.annual_rate_percent,
        input.monthly_payment,
    );
    let pays_off = !is_unrealistic_term(term_years);
    let interest_only = interest_only_payment(input.principal, input.annual_rate_percent);

    if !pays_off {
        warnings.push(format!(
            "Payment of {} does not pay the loan off within {} years (interest-only is {})",
            input.monthly_payment,
            UNREALISTIC_TERM_YEARS,
            interest_only.round_dp(2)
        ));
    }

    let output = TermOutput {
        term_years,
        term_months: term_years.saturating_mul(MONTHS_PER_YEAR).ceil(),
        pays_off,
        interest_only_payment: interest_only,
        minimum_viable_payment: minimum_viable_payment(
            input.principal,
            input.annual_rate_percent,
        ),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Inverse Annuity Term Solver",
        input,
        warnings,
        elapsed,
        output,
    ))
}
