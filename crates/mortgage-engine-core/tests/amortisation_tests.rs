use mortgage_engine_core::amortisation::cache::SimulationCache;
use mortgage_engine_core::amortisation::{
    analyze_mortgage, simulate, yearly_summary, MortgageInput, SimulationParams,
};
use mortgage_engine_core::solvers::solve_term_from_payment;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn assert_close(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}

// ===========================================================================
// Schedule shape
// ===========================================================================

fn valid_cases() -> Vec<SimulationParams> {
    vec![
        SimulationParams::new(dec!(250000), dec!(4.5), dec!(25), Decimal::ZERO),
        SimulationParams::new(dec!(120000), dec!(6.25), dec!(15), dec!(150)),
        SimulationParams::new(dec!(500000), dec!(2.1), dec!(35), dec!(1000)),
        SimulationParams::new(dec!(15000), dec!(9.9), dec!(3), Decimal::ZERO),
        SimulationParams::new(dec!(80000), dec!(3), dec!(10.5), dec!(25)),
    ]
}

#[test]
fn test_schedule_invariants_hold_for_valid_inputs() {
    for params in valid_cases() {
        let result = simulate(
            params.principal,
            params.annual_rate_percent,
            params.term_years,
            params.monthly_overpayment,
        );
        assert!(!result.schedule.is_empty(), "{params:?}");
        assert!(!result.truncated, "{params:?}");

        let mut prev_balance = params.principal;
        let mut prev_equity = Decimal::ZERO;
        for (i, point) in result.schedule.iter().enumerate() {
            assert_eq!(point.month as usize, i + 1);
            assert!(point.remaining_balance <= prev_balance);
            assert!(point.equity_built >= prev_equity);
            assert_close(
                point.remaining_balance + point.equity_built,
                params.principal,
                dec!(0.0001),
            );
            prev_balance = point.remaining_balance;
            prev_equity = point.equity_built;
        }
    }
}

#[test]
fn test_accumulation_identities() {
    for params in valid_cases() {
        let result = simulate(
            params.principal,
            params.annual_rate_percent,
            params.term_years,
            params.monthly_overpayment,
        );
        let summed: Decimal = result.schedule.iter().map(|p| p.interest_payment).sum();
        assert_eq!(result.total_interest, summed);
        assert_eq!(result.total_cost, result.total_interest + result.total_principal);
        assert_eq!(
            result.schedule.last().unwrap().cumulative_interest_paid,
            result.total_interest
        );
    }
}

#[test]
fn test_degenerate_inputs_give_empty_results() {
    for (p, r, t) in [
        (Decimal::ZERO, dec!(4.5), dec!(25)),
        (dec!(250000), Decimal::ZERO, dec!(25)),
        (dec!(250000), dec!(4.5), Decimal::ZERO),
        (dec!(-1), dec!(4.5), dec!(25)),
    ] {
        let result = simulate(p, r, t, Decimal::ZERO);
        assert!(result.schedule.is_empty());
        assert_eq!(result.monthly_payment, Decimal::ZERO);
        assert_eq!(result.total_interest, Decimal::ZERO);
        assert_eq!(result.total_cost, Decimal::ZERO);
        assert_eq!(result.months_to_pay_off, 0);
        assert!(!result.truncated);
    }
}

// ===========================================================================
// Reference mortgage
// ===========================================================================

#[test]
fn test_reference_mortgage() {
    let result = simulate(dec!(250000), dec!(4.5), dec!(25), Decimal::ZERO);

    // P·r / (1 - (1+r)^-300) with r = 0.00375
    assert_close(result.monthly_payment, dec!(1389.58), dec!(0.01));
    assert_eq!(result.months_to_pay_off, 300);
    assert_eq!(result.years_to_pay_off, dec!(25));
    assert_close(result.total_interest, dec!(166874), dec!(1));
    assert_close(result.total_cost, dec!(416874), dec!(1));

    let first = &result.schedule[0];
    assert_eq!(first.interest_payment, dec!(937.5));
    assert_eq!(first.year, 1);
    assert_eq!(result.schedule[12].year, 2);
}

#[test]
fn test_standard_payment_round_trips_through_term_solver() {
    for (p, r, t) in [
        (dec!(250000), dec!(4.5), dec!(25)),
        (dec!(180000), dec!(3.2), dec!(30)),
        (dec!(60000), dec!(7), dec!(8)),
    ] {
        let payment = simulate(p, r, t, Decimal::ZERO).monthly_payment;
        assert_close(solve_term_from_payment(p, r, payment), t, dec!(0.01));
    }
}

#[test]
fn test_overpayment_monotonicity() {
    let mut prev = simulate(dec!(250000), dec!(4.5), dec!(25), Decimal::ZERO);
    for extra in [dec!(100), dec!(250), dec!(500), dec!(1000), dec!(2500)] {
        let next = simulate(dec!(250000), dec!(4.5), dec!(25), extra);
        assert!(next.months_to_pay_off < prev.months_to_pay_off, "overpayment {extra}");
        assert!(next.total_interest < prev.total_interest, "overpayment {extra}");
        // The quoted payment ignores overpayment
        assert_eq!(next.monthly_payment, prev.monthly_payment);
        prev = next;
    }
}

#[test]
fn test_overpayment_beyond_balance_pays_off_in_one_month() {
    let result = simulate(dec!(10000), dec!(5), dec!(10), dec!(20000));
    assert_eq!(result.months_to_pay_off, 1);
    assert_eq!(result.schedule[0].principal_payment, dec!(10000));
    assert_eq!(result.schedule[0].remaining_balance, Decimal::ZERO);
}

#[test]
fn test_negative_overpayment_truncates_at_cap() {
    let standard = simulate(dec!(100000), dec!(5), dec!(20), Decimal::ZERO).monthly_payment;
    let result = simulate(dec!(100000), dec!(5), dec!(20), -standard);

    // 1.5 × 240
    assert_eq!(result.months_to_pay_off, 360);
    assert!(result.truncated);
    assert!(result.final_balance() > dec!(100000));
}

// ===========================================================================
// Yearly roll-up and envelope
// ===========================================================================

#[test]
fn test_yearly_summary_matches_schedule() {
    let result = simulate(dec!(250000), dec!(4.5), dec!(25), dec!(300));
    let years = yearly_summary(&result.schedule);

    let months: u32 = years.iter().map(|y| y.months).sum();
    assert_eq!(months, result.months_to_pay_off);
    let interest: Decimal = years.iter().map(|y| y.interest_paid).sum();
    assert_close(interest, result.total_interest, dec!(0.000001));
    assert_eq!(years.last().unwrap().closing_balance, result.final_balance());
}

#[test]
fn test_analyze_mortgage_envelope() {
    let input = MortgageInput {
        principal: dec!(200000),
        annual_rate_percent: dec!(5),
        term_years: dec!(20),
        monthly_overpayment: Decimal::ZERO,
        start_date: chrono::NaiveDate::from_ymd_opt(2026, 3, 1),
    };
    let out = analyze_mortgage(&input).unwrap();

    assert!(out.warnings.is_empty());
    assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    assert_eq!(out.result.yearly.len(), 20);
    assert_eq!(
        out.result.payoff_date,
        chrono::NaiveDate::from_ymd_opt(2046, 2, 1)
    );
    assert_eq!(out.assumptions["principal"], "200000");
}

#[test]
fn test_cache_returns_identical_results() {
    let mut cache = SimulationCache::with_capacity(2);
    let a = SimulationParams::new(dec!(250000), dec!(4.5), dec!(25), Decimal::ZERO);
    let b = SimulationParams::new(dec!(250000), dec!(4.5), dec!(25), dec!(100));
    let c = SimulationParams::new(dec!(250000), dec!(4.5), dec!(30), Decimal::ZERO);

    let first = cache.get_or_simulate(&a);
    cache.get_or_simulate(&b);
    cache.get_or_simulate(&c);
    let again = cache.get_or_simulate(&a);

    assert_eq!(*first, *again);
    assert!(cache.len() <= 2);
    assert_eq!(cache.misses(), 4);
}
