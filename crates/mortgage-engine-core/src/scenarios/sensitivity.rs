use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use crate::amortisation::{simulate_params, MortgageResult, SimulationParams};
use crate::error::MortgageEngineError;
use crate::types::*;
use crate::EngineResult;

/// Guard against sweeps that would simulate thousands of schedules.
const MAX_SWEEP_POINTS: usize = 200;

/// Which simulation input a sweep varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepField {
    Principal,
    Rate,
    TermYears,
    Overpayment,
}

impl SweepField {
    fn read(&self, params: &SimulationParams) -> Decimal {
        match self {
            SweepField::Principal => params.principal,
            SweepField::Rate => params.annual_rate_percent,
            SweepField::TermYears => params.term_years,
            SweepField::Overpayment => params.monthly_overpayment,
        }
    }

    fn apply(&self, params: &mut SimulationParams, value: Decimal) {
        match self {
            SweepField::Principal => params.principal = value,
            SweepField::Rate => params.annual_rate_percent = value,
            SweepField::TermYears => params.term_years = value,
            SweepField::Overpayment => params.monthly_overpayment = value,
        }
    }
}

impl fmt::Display for SweepField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SweepField::Principal => "principal",
            SweepField::Rate => "rate",
            SweepField::TermYears => "term_years",
            SweepField::Overpayment => "overpayment",
        };
        f.write_str(name)
    }
}

impl FromStr for SweepField {
    type Err = MortgageEngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "principal" | "amount" => Ok(SweepField::Principal),
            "rate" | "annual_rate_percent" => Ok(SweepField::Rate),
            "term" | "term_years" => Ok(SweepField::TermYears),
            "overpayment" | "monthly_overpayment" => Ok(SweepField::Overpayment),
            other => Err(MortgageEngineError::InvalidInput {
                field: "variable".into(),
                reason: format!(
                    "unknown sweep field '{other}' (principal, rate, term_years, overpayment)"
                ),
            }),
        }
    }
}

/// The result figure placed in each matrix cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMetric {
    TotalInterest,
    TotalCost,
    MonthsToPayOff,
    YearsToPayOff,
    MonthlyPayment,
}

impl OutputMetric {
    pub fn value(&self, result: &MortgageResult) -> Decimal {
        match self {
            OutputMetric::TotalInterest => result.total_interest,
            OutputMetric::TotalCost => result.total_cost,
            OutputMetric::MonthsToPayOff => Decimal::from(result.months_to_pay_off),
            OutputMetric::YearsToPayOff => result.years_to_pay_off,
            OutputMetric::MonthlyPayment => result.monthly_payment,
        }
    }
}

impl FromStr for OutputMetric {
    type Err = MortgageEngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "total_interest" | "interest" => Ok(OutputMetric::TotalInterest),
            "total_cost" | "cost" => Ok(OutputMetric::TotalCost),
            "months_to_pay_off" | "months" => Ok(OutputMetric::MonthsToPayOff),
            "years_to_pay_off" | "years" => Ok(OutputMetric::YearsToPayOff),
            "monthly_payment" | "payment" => Ok(OutputMetric::MonthlyPayment),
            other => Err(MortgageEngineError::InvalidInput {
                field: "metric".into(),
                reason: format!("unknown output metric '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepVariable {
    pub field: SweepField,
    pub min: Decimal,
    pub max: Decimal,
    pub step: Decimal,
}

/// Input for 2-way sensitivity analysis around a base simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityInput {
    pub base: SimulationParams,
    pub variable_1: SweepVariable,
    pub variable_2: SweepVariable,
    pub output_metric: OutputMetric,
}

/// Output of 2-way sensitivity analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityOutput {
    pub variable_1: SweepField,
    pub variable_2: SweepField,
    pub variable_1_values: Vec<Decimal>,
    pub variable_2_values: Vec<Decimal>,
    pub output_metric: OutputMetric,
    /// Matrix[i][j] = output when variable_1 = variable_1_values[i], variable_2 = variable_2_values[j]
    pub matrix: Vec<Vec<Decimal>>,
    /// Metric for the unmodified base inputs
    pub base_case_value: Decimal,
    /// Cell nearest the base inputs (row, col)
    pub base_case_position: (usize, usize),
}

/// Generate the sweep values for a variable from min to max with step.
fn generate_sweep_values(var: &SweepVariable) -> EngineResult<Vec<Decimal>> {
    if var.step <= Decimal::ZERO {
        return Err(MortgageEngineError::InvalidInput {
            field: format!("variable:{}", var.field),
            reason: "Step must be positive".into(),
        });
    }
    if var.min > var.max {
        return Err(MortgageEngineError::InvalidInput {
            field: format!("variable:{}", var.field),
            reason: "Min must be <= max".into(),
        });
    }
    let too_many = || MortgageEngineError::InvalidInput {
        field: format!("variable:{}", var.field),
        reason: format!("Sweep would exceed {MAX_SWEEP_POINTS} points"),
    };
    let span = var
        .max
        .checked_sub(var.min)
        .and_then(|range| range.checked_div(var.step))
        .ok_or_else(too_many)?;
    // Whole steps from min, plus min itself, plus max when a step overshoots it
    let appended_max = if span.fract().is_zero() {
        Decimal::ZERO
    } else {
        Decimal::ONE
    };
    let points = span.floor().saturating_add(Decimal::ONE + appended_max);
    if points > Decimal::from(MAX_SWEEP_POINTS) {
        return Err(too_many());
    }

    let mut values = Vec::new();
    let mut current = var.min;
    while current <= var.max {
        values.push(current);
        match current.checked_add(var.step) {
            Some(next) => current = next,
            None => break,
        }
    }
    // Ensure max is included if step doesn't land exactly on it
    if let Some(&last) = values.last() {
        if last < var.max {
            values.push(var.max);
        }
    }

    Ok(values)
}

/// Find the closest index to a target value in a sorted list.
fn closest_index(values: &[Decimal], target: Decimal) -> usize {
    values
        .iter()
        .enumerate()
        .min_by_key(|(_, v)| (**v - target).abs())
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Re-simulate the base mortgage across a grid of two inputs.
pub fn run_sensitivity(
    input: &SensitivityInput,
) -> EngineResult<ComputationOutput<SensitivityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.variable_1.field == input.variable_2.field {
        return Err(MortgageEngineError::InvalidInput {
            field: "variable_2".into(),
            reason: format!("Both variables sweep '{}'", input.variable_1.field),
        });
    }

    let v1_values = generate_sweep_values(&input.variable_1)?;
    let v2_values = generate_sweep_values(&input.variable_2)?;

    let mut matrix = Vec::with_capacity(v1_values.len());
    let mut degenerate = 0usize;
    let mut truncated = 0usize;

    for v1 in &v1_values {
        let mut row = Vec::with_capacity(v2_values.len());
        for v2 in &v2_values {
            let mut params = input.base;
            input.variable_1.field.apply(&mut params, *v1);
            input.variable_2.field.apply(&mut params, *v2);

            if params.is_degenerate() {
                degenerate += 1;
            }
            let result = simulate_params(&params);
            if result.truncated {
                truncated += 1;
            }
            row.push(input.output_metric.value(&result));
        }
        matrix.push(row);
    }

    if degenerate > 0 {
        warnings.push(format!(
            "{degenerate} grid points had non-positive principal, rate or term and evaluate to zero"
        ));
    }
    if truncated > 0 {
        warnings.push(format!(
            "{truncated} grid points hit the iteration cap without paying off"
        ));
    }

    let base_row = closest_index(&v1_values, input.variable_1.field.read(&input.base));
    let base_col = closest_index(&v2_values, input.variable_2.field.read(&input.base));
    let base_case_value = input.output_metric.value(&simulate_params(&input.base));

    let output = SensitivityOutput {
        variable_1: input.variable_1.field,
        variable_2: input.variable_2.field,
        variable_1_values: v1_values,
        variable_2_values: v2_values,
        output_metric: input.output_metric,
        matrix,
        base_case_value,
        base_case_position: (base_row, base_col),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "2-Way Mortgage Sensitivity Analysis",
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

    fn sample_input() -> SensitivityInput {
        SensitivityInput {
            base: SimulationParams::new(dec!(250000), dec!(4.5), dec!(25), Decimal::ZERO),
            variable_1: SweepVariable {
                field: SweepField::Rate,
                min: dec!(3.5),
                max: dec!(5.5),
                step: dec!(0.5),
            },
            variable_2: SweepVariable {
                field: SweepField::Overpayment,
                min: dec!(0),
                max: dec!(400),
                step: dec!(100),
            },
            output_metric: OutputMetric::TotalInterest,
        }
    }

    #[test]
    fn test_grid_shape_and_base_case() {
        let result = run_sensitivity(&sample_input()).unwrap();
        let out = &result.result;

        // Rate: 3.5, 4.0, 4.5, 5.0, 5.5 => 5 values
        assert_eq!(out.variable_1_values.len(), 5);
        // Overpayment: 0, 100, 200, 300, 400 => 5 values
        assert_eq!(out.variable_2_values.len(), 5);
        assert_eq!(out.matrix.len(), 5);
        assert_eq!(out.matrix[0].len(), 5);
        assert_eq!(out.base_case_position, (2, 0));
        assert_eq!(out.matrix[2][0], out.base_case_value);
    }

    #[test]
    fn test_interest_rises_with_rate_and_falls_with_overpayment() {
        let result = run_sensitivity(&sample_input()).unwrap();
        let m = &result.result.matrix;

        for i in 0..m.len() - 1 {
            assert!(m[i][0] < m[i + 1][0]);
        }
        for j in 0..m[0].len() - 1 {
            assert!(m[0][j] > m[0][j + 1]);
        }
    }

    #[test]
    fn test_sweep_with_non_exact_step() {
        let var = SweepVariable {
            field: SweepField::TermYears,
            min: dec!(10),
            max: dec!(25),
            step: dec!(4),
        };
        let vals = generate_sweep_values(&var).unwrap();
        // 10, 14, 18, 22, 25 (max appended)
        assert_eq!(vals.len(), 5);
        assert_eq!(*vals.last().unwrap(), dec!(25));
    }

    #[test]
    fn test_invalid_step() {
        let mut input = sample_input();
        input.variable_1.step = Decimal::ZERO;
        assert!(run_sensitivity(&input).is_err());
    }

    #[test]
    fn test_point_limit_is_inclusive() {
        let mut var = SweepVariable {
            field: SweepField::Overpayment,
            min: dec!(0),
            max: dec!(199),
            step: dec!(1),
        };
        assert_eq!(generate_sweep_values(&var).unwrap().len(), MAX_SWEEP_POINTS);

        // 0..=200 by 1 is 201 points
        var.max = dec!(200);
        assert!(generate_sweep_values(&var).is_err());

        // 0, 1.5, ..., 298.5 plus the appended 299 is 201 points
        var.max = dec!(299);
        var.step = dec!(1.5);
        assert!(generate_sweep_values(&var).is_err());
    }

    #[test]
    fn test_step_too_small_to_divide_rejected() {
        let var = SweepVariable {
            field: SweepField::Principal,
            min: dec!(0),
            max: dec!(10000000000000000000000000000),
            step: dec!(0.0000000000000000000000000001),
        };
        assert!(matches!(
            generate_sweep_values(&var),
            Err(MortgageEngineError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_same_field_twice_rejected() {
        let mut input = sample_input();
        input.variable_2.field = SweepField::Rate;
        assert!(run_sensitivity(&input).is_err());
    }

    #[test]
    fn test_degenerate_points_warned() {
        let mut input = sample_input();
        input.variable_1.min = dec!(0);
        let result = run_sensitivity(&input).unwrap();
        assert_eq!(result.result.matrix[0], vec![Decimal::ZERO; 5]);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("term".parse::<SweepField>().unwrap(), SweepField::TermYears);
        assert_eq!(
            "months".parse::<OutputMetric>().unwrap(),
            OutputMetric::MonthsToPayOff
        );
        assert!("colour".parse::<SweepField>().is_err());
    }
}
