use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use mortgage_engine_core::currency::{analyze_format, CurrencyConfig, FormatInput, Region};

use crate::input;

/// Arguments for currency formatting
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct FormatArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount to format
    #[arg(long)]
    pub value: Option<Decimal>,

    /// Market preset: UK, USA or EU
    #[arg(long, default_value = "UK")]
    pub region: Region,

    /// Currency symbol, overriding the region's
    #[arg(long)]
    pub symbol: Option<String>,

    /// BCP 47 locale tag, overriding the region's (e.g. en-GB, de-DE)
    #[arg(long)]
    pub locale: Option<String>,
}

pub fn run_format(args: FormatArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let format_input: FormatInput = input::load_or_build(args.input.as_deref(), || {
        let preset = args.region.currency_config();
        Ok(FormatInput {
            value: args.value.ok_or("--value is required (or provide --input)")?,
            config: CurrencyConfig::new(
                args.symbol.clone().unwrap_or(preset.symbol),
                args.locale.clone().unwrap_or(preset.locale),
            ),
        })
    })?;

    let result = analyze_format(&format_input)?;
    Ok(serde_json::to_value(result)?)
}
