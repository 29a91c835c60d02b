//! Baseline-versus-alternative comparison and the fact sheet handed to an
//! external commentary generator.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortisation::{simulate_params, MortgageResult, SimulationParams};
use crate::currency::Region;
use crate::error::MortgageEngineError;
use crate::types::*;
use crate::EngineResult;

/// Shown by callers when the commentary generator is unavailable.
pub const FALLBACK_ADVICE: &str =
    "The math speaks for itself: Interest is the silent wealth killer.";

/// What switching from `baseline` to `alternative` saves. Negative values
/// mean the alternative costs more.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub interest_saved: Money,
    pub cost_saved: Money,
    pub months_saved: i64,
    pub years_saved: Years,
}

pub fn compare(baseline: &MortgageResult, alternative: &MortgageResult) -> ScenarioComparison {
    ScenarioComparison {
        interest_saved: baseline.total_interest - alternative.total_interest,
        cost_saved: baseline.total_cost - alternative.total_cost,
        months_saved: i64::from(baseline.months_to_pay_off)
            - i64::from(alternative.months_to_pay_off),
        years_saved: baseline.years_to_pay_off - alternative.years_to_pay_off,
    }
}

/// Read-only facts for commentary text. Amounts are rounded for prose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryBrief {
    pub region: Region,
    pub principal: Money,
    pub annual_rate_percent: Percent,
    pub term_years: Years,
    pub total_interest: Money,
    /// Interest as a whole-number percentage of the principal.
    pub interest_pct_of_principal: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ScenarioComparison>,
    pub fallback: String,
}

pub fn advisory_brief(
    region: Region,
    params: &SimulationParams,
    baseline: &MortgageResult,
    alternative: Option<&MortgageResult>,
) -> EngineResult<AdvisoryBrief> {
    if baseline.total_principal <= Decimal::ZERO {
        return Err(MortgageEngineError::InsufficientData(
            "baseline result has no principal; nothing to summarise".into(),
        ));
    }

    let whole = |v: Decimal| v.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let comparison = alternative.map(|alt| {
        let c = compare(baseline, alt);
        ScenarioComparison {
            interest_saved: whole(c.interest_saved),
            cost_saved: whole(c.cost_saved),
            months_saved: c.months_saved,
            years_saved: c.years_saved.round_dp(1),
        }
    });

    Ok(AdvisoryBrief {
        region,
        principal: params.principal,
        annual_rate_percent: params.annual_rate_percent,
        term_years: params.term_years,
        total_interest: whole(baseline.total_interest),
        interest_pct_of_principal: whole(
            baseline.total_interest / baseline.total_principal * dec!(100),
        ),
        comparison,
        fallback: FALLBACK_ADVICE.to_string(),
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonInput {
    #[serde(default)]
    pub region: Region,
    /// Standard deal; any overpayment here is ignored.
    pub baseline: SimulationParams,
    /// Alternative settings (overpayment and/or shorter term).
    pub alternative: SimulationParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonOutput {
    pub baseline: MortgageResult,
    pub alternative: MortgageResult,
    pub savings: ScenarioComparison,
    pub brief: AdvisoryBrief,
}

pub fn analyze_comparison(
    input: &ComparisonInput,
) -> EngineResult<ComputationOutput<ComparisonOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let baseline_params = SimulationParams {
        monthly_overpayment: Decimal::ZERO,
        ..input.baseline
    };
    if !input.baseline.monthly_overpayment.is_zero() {
        warnings.push("Baseline overpayment ignored; baseline is the standard deal".into());
    }

    let baseline = simulate_params(&baseline_params);
    let alternative = simulate_params(&input.alternative);
    let savings = compare(&baseline, &alternative);
    if savings.interest_saved < Decimal::ZERO {
        warnings.push("Alternative pays more interest than the baseline".into());
    }
    if alternative.truncated {
        warnings.push("Alternative schedule never pays off within its iteration cap".into());
    }

    let brief = advisory_brief(input.region, &baseline_params, &baseline, Some(&alternative))?;

    let output = ComparisonOutput {
        baseline,
        alternative,
        savings,
        brief,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Baseline vs Alternative Amortisation",
        input,
        warnings,
        elapsed,
        output,
    ))
}
