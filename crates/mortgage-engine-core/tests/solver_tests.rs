use mortgage_engine_core::amortisation::simulate;
use mortgage_engine_core::solvers::affordability::{
    analyze_affordability, exact_max_principal, AffordabilityInput,
};
use mortgage_engine_core::solvers::term::{analyze_term, TermInput};
use mortgage_engine_core::solvers::{
    is_unrealistic_term, max_loan_for_budget, solve_term_from_payment, INFINITE_TERM_YEARS,
};
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
// Term solver
// ===========================================================================

#[test]
fn test_term_for_quoted_payment() {
    let years = solve_term_from_payment(dec!(250000), dec!(4.5), dec!(1389.13));
    assert_close(years, dec!(25), dec!(0.05));
}

#[test]
fn test_payment_at_or_below_interest_is_infinite() {
    // 250,000 × 0.045 / 12 = 937.50
    for payment in [dec!(937.5), dec!(937.49), dec!(500), Decimal::ZERO] {
        let years = solve_term_from_payment(dec!(250000), dec!(4.5), payment);
        assert_eq!(years, INFINITE_TERM_YEARS);
        assert!(is_unrealistic_term(years));
    }
    let just_above = solve_term_from_payment(dec!(250000), dec!(4.5), dec!(937.51));
    assert!(just_above > dec!(99));
}

#[test]
fn test_zero_rate_is_linear() {
    assert_eq!(
        solve_term_from_payment(dec!(120000), Decimal::ZERO, dec!(1000)),
        dec!(10)
    );
}

#[test]
fn test_no_principal_no_term() {
    assert_eq!(
        solve_term_from_payment(Decimal::ZERO, dec!(4.5), dec!(1000)),
        Decimal::ZERO
    );
}

#[test]
fn test_larger_payment_shortens_term() {
    let slow = solve_term_from_payment(dec!(250000), dec!(4.5), dec!(1100));
    let fast = solve_term_from_payment(dec!(250000), dec!(4.5), dec!(2000));
    assert!(fast < slow);
}

#[test]
fn test_analyze_term_envelope() {
    let out = analyze_term(&TermInput {
        principal: dec!(250000),
        annual_rate_percent: dec!(4.5),
        monthly_payment: dec!(900),
    })
    .unwrap();
    assert!(!out.result.pays_off);
    assert_eq!(out.result.interest_only_payment, dec!(937.5));
    assert_eq!(out.warnings.len(), 1);

    let ok = analyze_term(&TermInput {
        principal: dec!(250000),
        annual_rate_percent: dec!(4.5),
        monthly_payment: dec!(1389.13),
    })
    .unwrap();
    assert!(ok.result.pays_off);
    assert_eq!(ok.result.term_months, dec!(301));
    assert!(ok.warnings.is_empty());
}

// ===========================================================================
// Affordability
// ===========================================================================

#[test]
fn test_max_loan_reference_budget() {
    let exact = exact_max_principal(dec!(1400), dec!(4.5), dec!(40));
    let floored = max_loan_for_budget(dec!(1400), dec!(4.5), Some(dec!(40)));

    assert_close(exact, dec!(311413.64), dec!(0.01));
    assert_eq!(floored, dec!(311000));
    assert!(floored <= exact);
    assert_eq!(floored % dec!(1000), Decimal::ZERO);

    // The suggested loan must be affordable over the same horizon
    let check = simulate(floored, dec!(4.5), dec!(40), Decimal::ZERO);
    assert!(check.monthly_payment <= dec!(1400));
}

#[test]
fn test_max_years_defaults_to_forty() {
    assert_eq!(
        max_loan_for_budget(dec!(1400), dec!(4.5), None),
        max_loan_for_budget(dec!(1400), dec!(4.5), Some(dec!(40)))
    );
}

#[test]
fn test_shorter_horizon_borrows_less() {
    let long = max_loan_for_budget(dec!(2000), dec!(5), Some(dec!(35)));
    let short = max_loan_for_budget(dec!(2000), dec!(5), Some(dec!(15)));
    assert!(short < long);
}

#[test]
fn test_affordability_edge_cases() {
    assert_eq!(
        max_loan_for_budget(Decimal::ZERO, dec!(4.5), None),
        Decimal::ZERO
    );
    assert_eq!(
        max_loan_for_budget(dec!(999), Decimal::ZERO, Some(dec!(10))),
        dec!(119000)
    );
    assert_eq!(
        max_loan_for_budget(dec!(500), dec!(4.5), Some(Decimal::ZERO)),
        Decimal::ZERO
    );
}

#[test]
fn test_analyze_affordability_headroom() {
    let out = analyze_affordability(&AffordabilityInput {
        monthly_budget: dec!(1400),
        annual_rate_percent: dec!(4.5),
        max_years: None,
    })
    .unwrap();
    let r = &out.result;
    assert_eq!(r.max_loan, dec!(311000));
    assert_eq!(r.max_years, dec!(40));
    assert!(r.standard_payment <= dec!(1400));
    assert_close(r.monthly_headroom, dec!(1400) - r.standard_payment, dec!(0.000001));
}

// ===========================================================================
// Negative rates and out-of-range inputs
// ===========================================================================

#[test]
fn test_negative_rate_follows_annuity_formula() {
    // ln(M / (M − P·r)) / ln(1 + r) with r = −1/1200
    assert_close(
        solve_term_from_payment(dec!(120000), dec!(-1), dec!(1000)),
        dec!(9.527),
        dec!(0.001),
    );
    assert_eq!(
        max_loan_for_budget(dec!(1000), dec!(-1), Some(dec!(10))),
        dec!(126000)
    );

    let out = analyze_affordability(&AffordabilityInput {
        monthly_budget: dec!(1000),
        annual_rate_percent: dec!(-1),
        max_years: Some(dec!(10)),
    })
    .unwrap();
    assert!(out.result.standard_payment <= dec!(1000));
    assert!(out.result.standard_payment > dec!(990));
}

#[test]
fn test_extreme_inputs_stay_total() {
    let big_loan = simulate(Decimal::MAX, dec!(4.5), dec!(25), Decimal::ZERO);
    assert!(!big_loan.truncated);
    assert_eq!(big_loan.total_cost, Decimal::MAX);

    let endless = simulate(dec!(1000), dec!(4.5), Decimal::MAX, Decimal::ZERO);
    assert!(endless.truncated);

    assert_eq!(
        solve_term_from_payment(Decimal::MAX, dec!(2400), dec!(1)),
        INFINITE_TERM_YEARS
    );

    let loan = max_loan_for_budget(Decimal::MAX, dec!(4.5), None);
    assert!(loan > Decimal::ZERO);
    assert_eq!(loan % dec!(1000), Decimal::ZERO);
}
