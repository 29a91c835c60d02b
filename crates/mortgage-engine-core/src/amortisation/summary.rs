use serde::{Deserialize, Serialize};

use super::schedule::MonthlyDataPoint;
use crate::types::Money;

/// One calendar year of the schedule, rolled up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSummary {
    pub year: u32,
    /// Months of the year actually simulated (12 except possibly the last).
    pub months: u32,
    pub interest_paid: Money,
    pub principal_paid: Money,
    pub closing_balance: Money,
    pub equity_built: Money,
}

/// Roll a monthly schedule up into loan years, preserving order.
pub fn yearly_summary(schedule: &[MonthlyDataPoint]) -> Vec<YearSummary> {
    let mut years: Vec<YearSummary> = Vec::new();

    for point in schedule {
        match years.last_mut() {
            Some(current) if current.year == point.year => {
                current.months += 1;
                current.interest_paid += point.interest_payment;
                current.principal_paid += point.principal_payment;
                current.closing_balance = point.remaining_balance;
                current.equity_built = point.equity_built;
            }
            _ => years.push(YearSummary {
                year: point.year,
                months: 1,
                interest_paid: point.interest_payment,
                principal_paid: point.principal_payment,
                closing_balance: point.remaining_balance,
                equity_built: point.equity_built,
            }),
        }
    }

    years
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortisation::simulate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_yearly_rollup_matches_schedule() {
        let result = simulate(dec!(250000), dec!(4.5), dec!(25), Decimal::ZERO);
        let years = yearly_summary(&result.schedule);

        assert_eq!(years.len(), 25);
        assert!(years.iter().all(|y| y.months == 12));
        assert_eq!(years[0].year, 1);
        assert_eq!(years[24].year, 25);
        let interest: Decimal = years.iter().map(|y| y.interest_paid).sum();
        assert!((interest - result.total_interest).abs() < dec!(0.000001));
        assert_eq!(years[24].equity_built, result.schedule[299].equity_built);
    }

    #[test]
    fn test_partial_final_year() {
        // Overpaying finishes mid-year.
        let result = simulate(dec!(100000), dec!(5), dec!(10), dec!(300));
        let years = yearly_summary(&result.schedule);
        let last = years.last().unwrap();
        let expected = result.months_to_pay_off - 12 * (years.len() as u32 - 1);
        assert_eq!(last.months, expected);
        assert_eq!(last.closing_balance, result.final_balance());
    }

    #[test]
    fn test_empty_schedule() {
        assert!(yearly_summary(&[]).is_empty());
    }
}
