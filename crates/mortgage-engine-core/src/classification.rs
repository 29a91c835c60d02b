//! Stress tiers used by presentation layers to colour a mortgage outcome.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortisation::MortgageResult;
use crate::types::*;
use crate::EngineResult;

/// (term years, interest share %) thresholds, checked most severe first.
const TRAP_THRESHOLD: (Decimal, Decimal) = (dec!(35), dec!(55));
const STRAINED_THRESHOLD: (Decimal, Decimal) = (dec!(26), dec!(45));
const UNEASY_THRESHOLD: (Decimal, Decimal) = (dec!(22), dec!(30));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PaymentTier {
    Freedom,
    Uneasy,
    Strained,
    Trap,
}

impl PaymentTier {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentTier::Freedom => "The Freedom Zone",
            PaymentTier::Uneasy | PaymentTier::Strained => "The Squeeze",
            PaymentTier::Trap => "The Debt Trap",
        }
    }

    pub fn is_trap(&self) -> bool {
        matches!(self, PaymentTier::Trap)
    }
}

/// Colour band for a term on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TermBand {
    Green,
    Amber,
    Red,
}

pub fn term_band(term_years: Years) -> TermBand {
    if term_years > dec!(35) {
        TermBand::Red
    } else if term_years > dec!(25) {
        TermBand::Amber
    } else {
        TermBand::Green
    }
}

/// Caption shown under a term slider. Uses its own 30/40 year cut-offs.
pub fn term_feedback(term_years: Years) -> &'static str {
    if term_years > dec!(40) {
        "Critical: 40+ Years (The Trap)"
    } else if term_years > dec!(30) {
        "Warning: Very Long Term"
    } else {
        "Standard Term"
    }
}

/// Interest as a percentage of total cost; zero for an empty result.
pub fn interest_share_pct(result: &MortgageResult) -> Decimal {
    if result.total_cost <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    result.total_interest / result.total_cost * dec!(100)
}

pub fn classify(term_years: Years, interest_share_pct: Decimal) -> PaymentTier {
    let exceeds = |(years, share): (Decimal, Decimal)| {
        term_years > years || interest_share_pct > share
    };
    if exceeds(TRAP_THRESHOLD) {
        PaymentTier::Trap
    } else if exceeds(STRAINED_THRESHOLD) {
        PaymentTier::Strained
    } else if exceeds(UNEASY_THRESHOLD) {
        PaymentTier::Uneasy
    } else {
        PaymentTier::Freedom
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyInput {
    pub term_years: Years,
    pub interest_share_pct: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyOutput {
    pub tier: PaymentTier,
    pub label: String,
    pub term_band: TermBand,
    pub term_feedback: String,
}

pub fn analyze_classification(
    input: &ClassifyInput,
) -> EngineResult<ComputationOutput<ClassifyOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.interest_share_pct < Decimal::ZERO || input.interest_share_pct > dec!(100) {
        warnings.push(format!(
            "Interest share {}% is outside 0-100",
            input.interest_share_pct
        ));
    }

    let tier = classify(input.term_years, input.interest_share_pct);
    let output = ClassifyOutput {
        tier,
        label: tier.label().to_string(),
        term_band: term_band(input.term_years),
        term_feedback: term_feedback(input.term_years).to_string(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Term / Interest-Share Stress Tiers",
        input,
        warnings,
        elapsed,
        output,
    ))
}
