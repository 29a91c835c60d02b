//! Closed-form level-payment annuity math shared by the engine and solvers.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::types::{Money, Percent, Rate};

pub const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Slider floor used by the interactive layer: interest-only plus 1%.
const MIN_PAYMENT_BUFFER: Decimal = dec!(1.01);

/// Convert an annual percentage (4.5) into a monthly decimal rate (0.00375).
pub fn monthly_rate(annual_rate_percent: Percent) -> Rate {
    annual_rate_percent / dec!(100) / MONTHS_PER_YEAR
}

/// (1 + r)^n, or `None` when the power leaves the Decimal range.
///
/// Whole month counts use repeated multiplication; fractional counts (a term
/// solved from a payment) go through `powd`.
pub fn growth_factor(monthly_rate: Rate, months: Decimal) -> Option<Decimal> {
    let base = Decimal::ONE + monthly_rate;
    if months.fract().is_zero() {
        return match months.to_u64() {
            Some(n) => base.checked_powu(n),
            // Beyond u64 months the power has reached its limit
            None if base < Decimal::ONE && base >= Decimal::ZERO => Some(Decimal::ZERO),
            None if base == Decimal::ONE => Some(Decimal::ONE),
            None => None,
        };
    }
    if base <= Decimal::ZERO {
        return None;
    }
    base.checked_powd(months)
}

/// `a / b`, pinned to the Decimal bound of the quotient's sign when it
/// cannot be represented.
pub(crate) fn saturating_div(a: Decimal, b: Decimal) -> Decimal {
    a.checked_div(b).unwrap_or(
        if a.is_sign_negative() != b.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        },
    )
}

/// Level payment that fully amortises `principal` over `months` at
/// `monthly_rate`: P·r·(1+r)^n / ((1+r)^n − 1).
///
/// When (1+r)^n overflows, the payment takes its limit P·r. A zero rate
/// falls back to straight-line repayment. Negative rates use the same
/// formula. Products that leave the Decimal range saturate.
pub fn annuity_payment(principal: Money, monthly_rate: Rate, months: Decimal) -> Money {
    if months <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    if monthly_rate.is_zero() {
        return saturating_div(principal, months);
    }

    let interest_only = principal.saturating_mul(monthly_rate);
    match growth_factor(monthly_rate, months) {
        // (1+r)^n rounded to exactly one: the rate is too small to register
        Some(factor) if factor == Decimal::ONE => saturating_div(principal, months),
        Some(factor) => match factor
            .checked_sub(Decimal::ONE)
            .and_then(|denominator| factor.checked_div(denominator))
        {
            Some(ratio) => interest_only.saturating_mul(ratio),
            None => interest_only,
        },
        None => interest_only,
    }
}

/// Standard payment for an annual percentage rate and a month count.
pub fn standard_payment(principal: Money, annual_rate_percent: Percent, months: Decimal) -> Money {
    annuity_payment(principal, monthly_rate(annual_rate_percent), months)
}

/// Principal that a level `payment` retires over `months`:
/// M·((1+r)^n − 1) / (r·(1+r)^n).
pub fn annuity_present_value(payment: Money, monthly_rate: Rate, months: Decimal) -> Money {
    if months <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    if monthly_rate.is_zero() {
        return payment.saturating_mul(months);
    }

    let discounted = match growth_factor(monthly_rate, months) {
        Some(factor) if !factor.is_zero() => Decimal::ONE
            .checked_div(factor)
            .and_then(|discount| Decimal::ONE.checked_sub(discount)),
        Some(_) => None,
        None => Some(Decimal::ONE),
    };
    match discounted {
        Some(fraction) => saturating_div(payment.saturating_mul(fraction), monthly_rate),
        // 1/(1+r)^n is unbounded: so is the principal
        None => saturating_div(payment.saturating_mul(Decimal::MIN), monthly_rate),
    }
}

/// Payment that exactly covers one month of interest.
pub fn interest_only_payment(principal: Money, annual_rate_percent: Percent) -> Money {
    principal.saturating_mul(monthly_rate(annual_rate_percent))
}

/// Smallest payment the interactive layer offers: interest-only × 1.01.
pub fn minimum_viable_payment(principal: Money, annual_rate_percent: Percent) -> Money {
    interest_only_payment(principal, annual_rate_percent).saturating_mul(MIN_PAYMENT_BUFFER)
}
