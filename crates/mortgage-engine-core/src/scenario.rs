//! Payment-driven view: fix the loan and what the borrower pays each month,
//! then see how long it takes and what it costs.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortisation::{simulate, MonthlyDataPoint, MortgageResult};
use crate::annuity::{minimum_viable_payment, saturating_div, standard_payment, MONTHS_PER_YEAR};
use crate::classification::{classify, interest_share_pct, PaymentTier};
use crate::solvers::term::{is_unrealistic_term, solve_term_from_payment};
use crate::types::*;
use crate::EngineResult;

/// Solved terms are capped here before simulating.
pub const MAX_SCENARIO_TERM_YEARS: Years = dec!(100);

/// Term used to seed a "typical" payment when the loan changes.
pub const REFERENCE_TERM_YEARS: Years = dec!(25);

/// Average UK first-time-buyer loan (£249,943, rounded).
pub const REFERENCE_PRINCIPAL: Money = dec!(250000);

pub const REFERENCE_RATE_PERCENT: Percent = dec!(4.5);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentScenario {
    pub monthly_payment: Money,
    /// Uncapped solver output; 999 when the payment never clears interest.
    pub solved_term_years: Years,
    pub simulated_term_years: Years,
    pub pays_off: bool,
    pub interest_share_pct: Decimal,
    pub tier: PaymentTier,
    pub result: MortgageResult,
}

/// Solve the term for `monthly_payment`, cap it at 100 years and simulate.
///
/// The schedule is driven by the standard payment for the capped term, so
/// when the payment never amortises the schedule shows the 100-year loan.
pub fn simulate_from_payment(
    principal: Money,
    annual_rate_percent: Percent,
    monthly_payment: Money,
) -> PaymentScenario {
    let solved_term_years = solve_term_from_payment(principal, annual_rate_percent, monthly_payment);
    let simulated_term_years = solved_term_years.min(MAX_SCENARIO_TERM_YEARS);
    let result = simulate(
        principal,
        annual_rate_percent,
        simulated_term_years,
        Decimal::ZERO,
    );
    let share = interest_share_pct(&result);

    PaymentScenario {
        monthly_payment,
        solved_term_years,
        simulated_term_years,
        pays_off: !is_unrealistic_term(solved_term_years),
        interest_share_pct: share,
        tier: classify(solved_term_years, share),
        result,
    }
}

/// Standard 25-year payment, used to re-seed the payment when the loan moves.
pub fn reference_payment(principal: Money, annual_rate_percent: Percent) -> Money {
    standard_payment(
        principal,
        annual_rate_percent,
        REFERENCE_TERM_YEARS * MONTHS_PER_YEAR,
    )
}

/// Scrubber lookup: the point for `month` (1-indexed), clamped into the
/// schedule. An empty schedule yields an all-zero point.
pub fn schedule_point(result: &MortgageResult, month: u32) -> MonthlyDataPoint {
    let Some(last) = result.schedule.len().checked_sub(1) else {
        return MonthlyDataPoint::default();
    };
    let index = (month.saturating_sub(1) as usize).min(last);
    result.schedule[index].clone()
}

/// How one month's payment splits between interest and principal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentSplit {
    pub interest_ratio: Decimal,
    pub principal_ratio: Decimal,
}

/// Shares of `monthly_payment` going to interest and principal in `point`.
pub fn payment_split(point: &MonthlyDataPoint, monthly_payment: Money) -> PaymentSplit {
    if monthly_payment <= Decimal::ZERO {
        return PaymentSplit {
            interest_ratio: Decimal::ZERO,
            principal_ratio: Decimal::ZERO,
        };
    }
    PaymentSplit {
        interest_ratio: saturating_div(point.interest_payment, monthly_payment),
        principal_ratio: saturating_div(point.principal_payment, monthly_payment),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentScenarioInput {
    pub principal: Money,
    pub annual_rate_percent: Percent,
    pub monthly_payment: Money,
    /// Month to inspect; defaults to the first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inspect_month: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentScenarioOutput {
    #[serde(flatten)]
    pub scenario: PaymentScenario,
    pub reference_payment: Money,
    pub minimum_viable_payment: Money,
    pub inspected: MonthlyDataPoint,
    pub split: PaymentSplit,
}

pub fn analyze_payment_scenario(
    input: &PaymentScenarioInput,
) -> EngineResult<ComputationOutput<PaymentScenarioOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let scenario =
        simulate_from_payment(input.principal, input.annual_rate_percent, input.monthly_payment);
    let minimum = minimum_viable_payment(input.principal, input.annual_rate_percent);

    if !scenario.pays_off {
        warnings.push(format!(
            "Payment of {} never clears the interest; schedule shows a {}-year loan instead",
            input.monthly_payment, MAX_SCENARIO_TERM_YEARS
        ));
    } else if input.monthly_payment < minimum {
        warnings.push(format!(
            "Payment is below the suggested minimum of {}",
            minimum.round_dp(2)
        ));
    }

    let inspected = schedule_point(&scenario.result, input.inspect_month.unwrap_or(1));
    let split = payment_split(&inspected, input.monthly_payment);

    let output = PaymentScenarioOutput {
        reference_payment: reference_payment(input.principal, input.annual_rate_percent),
        minimum_viable_payment: minimum,
        inspected,
        split,
        scenario,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Payment-Driven Term Scenario",
        input,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reference_payment_runs_25_years() {
        let payment = reference_payment(REFERENCE_PRINCIPAL, REFERENCE_RATE_PERCENT);
        let scenario = simulate_from_payment(REFERENCE_PRINCIPAL, REFERENCE_RATE_PERCENT, payment);

        assert!((scenario.solved_term_years - dec!(25)).abs() < dec!(0.01));
        assert!(scenario.pays_off);
        assert!((299..=301).contains(&scenario.result.months_to_pay_off));
        assert!((scenario.result.monthly_payment - payment).abs() < dec!(0.01));
        assert_eq!(scenario.tier, PaymentTier::Uneasy);
    }

    #[test]
    fn test_payment_below_interest_caps_at_100_years() {
        let scenario = simulate_from_payment(dec!(250000), dec!(4.5), dec!(900));
        assert!(!scenario.pays_off);
        assert_eq!(scenario.solved_term_years, dec!(999));
        assert_eq!(scenario.simulated_term_years, dec!(100));
        assert_eq!(scenario.result.months_to_pay_off, 1200);
        assert!(scenario.tier.is_trap());
    }

    #[test]
    fn test_bigger_payment_is_calmer() {
        let tight = simulate_from_payment(dec!(250000), dec!(4.5), dec!(1000));
        let comfy = simulate_from_payment(dec!(250000), dec!(4.5), dec!(2500));
        assert!(tight.tier > comfy.tier);
        assert!(tight.result.total_interest > comfy.result.total_interest);
    }

    #[test]
    fn test_schedule_point_clamps() {
        let result = simulate(dec!(10000), dec!(5), dec!(1), Decimal::ZERO);
        assert_eq!(schedule_point(&result, 0).month, 1);
        assert_eq!(schedule_point(&result, 5).month, 5);
        assert_eq!(schedule_point(&result, 500).month, 12);
        assert_eq!(
            schedule_point(&MortgageResult::default(), 3),
            MonthlyDataPoint::default()
        );
    }

    #[test]
    fn test_payment_split_sums_to_one_mid_schedule() {
        let result = simulate(dec!(250000), dec!(4.5), dec!(25), Decimal::ZERO);
        let point = schedule_point(&result, 100);
        let split = payment_split(&point, result.monthly_payment);
        assert!((split.interest_ratio + split.principal_ratio - Decimal::ONE).abs() < dec!(0.0000001));
        assert!(split.interest_ratio > split.principal_ratio);
    }

    #[test]
    fn test_analyze_payment_scenario_warns_on_interest_only() {
        let out = analyze_payment_scenario(&PaymentScenarioInput {
            principal: dec!(250000),
            annual_rate_percent: dec!(4.5),
            monthly_payment: dec!(937.5),
            inspect_month: None,
        })
        .unwrap();
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.result.inspected.month, 1);
        assert_eq!(out.result.minimum_viable_payment, dec!(946.875));
    }
}
