//! Display formatting for currency amounts. No conversion, no rounding that
//! feeds back into calculations.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use crate::error::MortgageEngineError;
use crate::types::*;
use crate::EngineResult;

const NO_BREAK_SPACE: char = '\u{a0}';
const NARROW_NO_BREAK_SPACE: char = '\u{202f}';

/// ISO 4217 codes the formatter distinguishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    GBP,
    #[default]
    USD,
    EUR,
}

impl Currency {
    /// `£` → GBP, `€` → EUR, anything else → USD.
    pub fn from_symbol(symbol: &str) -> Self {
        match symbol.trim() {
            "£" => Currency::GBP,
            "€" => Currency::EUR,
            _ => Currency::USD,
        }
    }
}

/// What the presentation layer hands the formatter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyConfig {
    pub symbol: String,
    pub locale: String,
}

impl CurrencyConfig {
    pub fn new(symbol: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            locale: locale.into(),
        }
    }

    pub fn currency(&self) -> Currency {
        Currency::from_symbol(&self.symbol)
    }
}

/// Market presets offered by the interactive layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    #[default]
    Uk,
    Usa,
    Eu,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::Uk, Region::Usa, Region::Eu];

    pub fn currency_config(&self) -> CurrencyConfig {
        match self {
            Region::Uk => CurrencyConfig::new("£", "en-GB"),
            Region::Usa => CurrencyConfig::new("$", "en-US"),
            Region::Eu => CurrencyConfig::new("€", "de-DE"),
        }
    }

    pub fn currency(&self) -> Currency {
        self.currency_config().currency()
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Region::Uk => "UK",
            Region::Usa => "USA",
            Region::Eu => "EU",
        };
        f.write_str(label)
    }
}

impl FromStr for Region {
    type Err = MortgageEngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uk" | "gb" | "gbr" => Ok(Region::Uk),
            "usa" | "us" => Ok(Region::Usa),
            "eu" | "eur" | "eurozone" => Ok(Region::Eu),
            other => Err(MortgageEngineError::InvalidInput {
                field: "region".into(),
                reason: format!("unknown region '{other}' (expected UK, USA or EU)"),
            }),
        }
    }
}

/// Digit grouping and symbol placement for a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LocaleLayout {
    group_separator: char,
    symbol_first: bool,
}

impl LocaleLayout {
    fn for_locale(locale: &str) -> Self {
        let language = locale
            .split(['-', '_'])
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();
        match language.as_str() {
            "de" | "es" | "it" | "pt" | "nl" | "da" => LocaleLayout {
                group_separator: '.',
                symbol_first: false,
            },
            "fr" => LocaleLayout {
                group_separator: NARROW_NO_BREAK_SPACE,
                symbol_first: false,
            },
            _ => LocaleLayout {
                group_separator: ',',
                symbol_first: true,
            },
        }
    }
}

/// Symbol shown for `currency` in `locale`. English locales outside the US
/// disambiguate the dollar as `US$`.
fn display_symbol(currency: Currency, locale: &str) -> &'static str {
    match currency {
        Currency::GBP => "£",
        Currency::EUR => "€",
        Currency::USD => {
            let lower = locale.to_ascii_lowercase();
            if lower.starts_with("en") && lower != "en" && !lower.ends_with("us") {
                "US$"
            } else {
                "$"
            }
        }
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

/// Render `value` as a whole-unit currency string for `config`.
///
/// `£1,389` for en-GB, `$1,389` for en-US, `1.389 €` for de-DE. Halves round
/// away from zero.
pub fn format_currency(value: Decimal, config: &CurrencyConfig) -> String {
    let currency = config.currency();
    let layout = LocaleLayout::for_locale(&config.locale);
    let symbol = display_symbol(currency, &config.locale);

    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = rounded.abs().trunc().to_string();
    let grouped = group_digits(&digits, layout.group_separator);
    let sign = if negative { "-" } else { "" };

    if layout.symbol_first {
        format!("{sign}{symbol}{grouped}")
    } else {
        format!("{sign}{grouped}{NO_BREAK_SPACE}{symbol}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatInput {
    pub value: Money,
    #[serde(flatten)]
    pub config: CurrencyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatOutput {
    pub formatted: String,
    pub currency: Currency,
}

pub fn analyze_format(input: &FormatInput) -> EngineResult<ComputationOutput<FormatOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let currency = input.config.currency();
    if currency == Currency::USD && input.config.symbol.trim() != "$" {
        warnings.push(format!(
            "Unrecognised symbol '{}'; formatting as USD",
            input.config.symbol
        ));
    }

    let output = FormatOutput {
        formatted: format_currency(input.value, &input.config),
        currency,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Locale Currency Formatting (0 dp)",
        input,
        warnings,
        elapsed,
        output,
    ))
}
