use chrono::{Months, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use super::summary::{yearly_summary, YearSummary};
use crate::annuity::{annuity_payment, monthly_rate, MONTHS_PER_YEAR};
use crate::classification::interest_share_pct;
use crate::error::MortgageEngineError;
use crate::types::*;
use crate::EngineResult;

/// Balance at or below which the loan counts as repaid.
pub const BALANCE_EPSILON: Decimal = dec!(0.01);

/// Schedules stop after this multiple of the nominal term.
pub const ITERATION_CAP_FACTOR: Decimal = dec!(1.5);

/// Upper bound on the up-front schedule allocation (100 years of months).
const MAX_PREALLOCATED_MONTHS: usize = 1200;

/// Hard ceiling on schedule length (1,000 years), whatever the nominal term.
pub const MAX_SCHEDULE_MONTHS: u32 = 12_000;

/// Inputs for a single simulation. Doubles as the cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimulationParams {
    pub principal: Money,
    /// Annual rate as quoted, e.g. 4.5 for 4.5%.
    pub annual_rate_percent: Percent,
    pub term_years: Years,
    /// Extra principal paid every month on top of the standard payment.
    #[serde(default)]
    pub monthly_overpayment: Money,
}

impl SimulationParams {
    pub fn new(
        principal: Money,
        annual_rate_percent: Percent,
        term_years: Years,
        monthly_overpayment: Money,
    ) -> Self {
        Self {
            principal,
            annual_rate_percent,
            term_years,
            monthly_overpayment,
        }
    }

    /// Non-positive principal, rate or term produce an empty result.
    pub fn is_degenerate(&self) -> bool {
        self.principal <= Decimal::ZERO
            || self.annual_rate_percent <= Decimal::ZERO
            || self.term_years <= Decimal::ZERO
    }
}

/// One simulated month. `month` is 1-indexed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyDataPoint {
    pub month: u32,
    pub year: u32,
    pub principal_payment: Money,
    pub interest_payment: Money,
    pub cumulative_interest_paid: Money,
    pub remaining_balance: Money,
    pub equity_built: Money,
}

/// Full amortisation result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MortgageResult {
    /// Standard annuity payment for the nominal term, excluding overpayment.
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub total_cost: Money,
    pub total_principal: Money,
    pub years_to_pay_off: Years,
    pub months_to_pay_off: u32,
    pub schedule: Vec<MonthlyDataPoint>,
    /// The iteration cap ended the schedule with a balance still outstanding.
    #[serde(default)]
    pub truncated: bool,
}

impl MortgageResult {
    /// Balance left after the final simulated month.
    pub fn final_balance(&self) -> Money {
        self.schedule
            .last()
            .map(|p| p.remaining_balance)
            .unwrap_or(Decimal::ZERO)
    }
}

/// Simulate a fixed-rate mortgage month by month.
///
/// The standard payment is fixed from the nominal term; any overpayment goes
/// straight to principal, so the schedule may end well before the term. The
/// final month's principal is clamped to the outstanding balance.
pub fn simulate(
    principal: Money,
    annual_rate_percent: Percent,
    term_years: Years,
    monthly_overpayment: Money,
) -> MortgageResult {
    simulate_params(&SimulationParams::new(
        principal,
        annual_rate_percent,
        term_years,
        monthly_overpayment,
    ))
}

pub fn simulate_params(params: &SimulationParams) -> MortgageResult {
    if params.is_degenerate() {
        return MortgageResult::default();
    }

    let rate = monthly_rate(params.annual_rate_percent);
    let total_months = params.term_years.saturating_mul(MONTHS_PER_YEAR);
    let standard_payment = annuity_payment(params.principal, rate, total_months);
    let month_cap = total_months
        .saturating_mul(ITERATION_CAP_FACTOR)
        .min(Decimal::from(MAX_SCHEDULE_MONTHS));

    let capacity = total_months
        .ceil()
        .to_usize()
        .unwrap_or(MAX_PREALLOCATED_MONTHS)
        .min(MAX_PREALLOCATED_MONTHS);
    let mut schedule = Vec::with_capacity(capacity);

    let mut balance = params.principal;
    let mut total_interest = Decimal::ZERO;
    let mut equity = Decimal::ZERO;
    let mut month: u32 = 0;

    while balance > BALANCE_EPSILON && Decimal::from(month) < month_cap {
        let Some(step) = accrue(balance, rate, standard_payment, params.monthly_overpayment)
        else {
            warn!(month, "balance left the representable range; schedule stopped");
            break;
        };
        let (Some(interest_to_date), Some(equity_to_date)) = (
            total_interest.checked_add(step.interest),
            equity.checked_add(step.principal),
        ) else {
            warn!(month, "running totals left the representable range; schedule stopped");
            break;
        };

        month += 1;
        balance = step.closing_balance;
        total_interest = interest_to_date;
        equity = equity_to_date;

        schedule.push(MonthlyDataPoint {
            month,
            year: month.div_ceil(12),
            principal_payment: step.principal,
            interest_payment: step.interest,
            cumulative_interest_paid: total_interest,
            remaining_balance: balance.max(Decimal::ZERO),
            equity_built: equity,
        });
    }

    let truncated = balance > BALANCE_EPSILON;
    if truncated {
        warn!(
            months = month,
            balance = %balance,
            "schedule hit the iteration cap before the loan was repaid"
        );
    }
    debug!(
        principal = %params.principal,
        rate = %params.annual_rate_percent,
        term_years = %params.term_years,
        overpayment = %params.monthly_overpayment,
        months = month,
        total_interest = %total_interest,
        "simulated amortisation schedule"
    );

    MortgageResult {
        monthly_payment: standard_payment,
        total_interest,
        total_cost: total_interest.saturating_add(params.principal),
        total_principal: params.principal,
        years_to_pay_off: Decimal::from(month) / MONTHS_PER_YEAR,
        months_to_pay_off: month,
        schedule,
        truncated,
    }
}

struct Accrual {
    interest: Money,
    principal: Money,
    closing_balance: Money,
}

/// One month of interest and repayment; `None` if the arithmetic overflows.
fn accrue(balance: Money, rate: Rate, payment: Money, overpayment: Money) -> Option<Accrual> {
    let interest = balance.checked_mul(rate)?;
    let mut principal = payment.checked_sub(interest)?.saturating_add(overpayment);
    if principal > balance {
        principal = balance;
    }
    let closing_balance = balance.checked_sub(principal)?;
    Some(Accrual {
        interest,
        principal,
        closing_balance,
    })
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// Simulation request as accepted by the CLI and bindings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageInput {
    pub principal: Money,
    pub annual_rate_percent: Percent,
    pub term_years: Years,
    #[serde(default)]
    pub monthly_overpayment: Money,
    /// Date of the first payment; enables `payoff_date`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

impl MortgageInput {
    pub fn params(&self) -> SimulationParams {
        SimulationParams::new(
            self.principal,
            self.annual_rate_percent,
            self.term_years,
            self.monthly_overpayment,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageAnalysis {
    #[serde(flatten)]
    pub mortgage: MortgageResult,
    /// Interest as a percentage of total cost.
    pub interest_share_pct: Decimal,
    pub yearly: Vec<YearSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payoff_date: Option<NaiveDate>,
}

/// Run a simulation and wrap it with warnings and metadata.
pub fn analyze_mortgage(
    input: &MortgageInput,
) -> EngineResult<ComputationOutput<MortgageAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let params = input.params();

    if params.is_degenerate() {
        warnings.push(
            "Principal, rate and term must all be positive; returning an empty schedule".into(),
        );
    }
    if params.monthly_overpayment < Decimal::ZERO {
        warnings.push(format!(
            "Negative overpayment of {} reduces every payment below the standard amount",
            params.monthly_overpayment
        ));
    }

    let mortgage = simulate_params(&params);
    if mortgage.truncated {
        warnings.push(format!(
            "Schedule stopped at the {}-month iteration cap with {} still outstanding",
            mortgage.months_to_pay_off,
            mortgage.final_balance().round_dp(2)
        ));
    }

    let payoff_date = match input.start_date {
        Some(first) if mortgage.months_to_pay_off > 0 => {
            Some(payoff_date(first, mortgage.months_to_pay_off)?)
        }
        _ => None,
    };

    let output = MortgageAnalysis {
        interest_share_pct: interest_share_pct(&mortgage),
        yearly: yearly_summary(&mortgage.schedule),
        payoff_date,
        mortgage,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-Rate Amortisation Schedule",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Date of the last payment given the first payment date.
fn payoff_date(first_payment: NaiveDate, months: u32) -> EngineResult<NaiveDate> {
    first_payment
        .checked_add_months(Months::new(months.saturating_sub(1)))
        .ok_or_else(|| {
            MortgageEngineError::DateError(format!(
                "{months} months after {first_payment} is outside the supported calendar"
            ))
        })
}
