use napi::Result as NapiResult;
use napi_derive::napi;
use serde::de::DeserializeOwned;
use serde::Serialize;

use mortgage_engine_core::EngineResult;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Parse the JSON input, run the envelope function and serialise its output.
fn call<I, O>(input_json: &str, run: impl FnOnce(&I) -> EngineResult<O>) -> NapiResult<String>
where
    I: DeserializeOwned,
    O: Serialize,
{
    let input: I = serde_json::from_str(input_json).map_err(to_napi_error)?;
    let output = run(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Amortisation
// ---------------------------------------------------------------------------

#[napi]
pub fn simulate_mortgage(input_json: String) -> NapiResult<String> {
    call(&input_json, mortgage_engine_core::amortisation::analyze_mortgage)
}

/// Point lookup for the schedule scrubber; `result_json` is a `MortgageResult`.
#[napi]
pub fn schedule_point(result_json: String, month: u32) -> NapiResult<String> {
    let result: mortgage_engine_core::MortgageResult =
        serde_json::from_str(&result_json).map_err(to_napi_error)?;
    let point = mortgage_engine_core::scenario::schedule_point(&result, month);
    serde_json::to_string(&point).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Solvers
// ---------------------------------------------------------------------------

#[napi]
pub fn solve_term(input_json: String) -> NapiResult<String> {
    call(&input_json, mortgage_engine_core::solvers::term::analyze_term)
}

#[napi]
pub fn max_loan(input_json: String) -> NapiResult<String> {
    call(
        &input_json,
        mortgage_engine_core::solvers::affordability::analyze_affordability,
    )
}

// ---------------------------------------------------------------------------
// Presentation helpers
// ---------------------------------------------------------------------------

#[napi]
pub fn format_currency(input_json: String) -> NapiResult<String> {
    call(&input_json, mortgage_engine_core::currency::analyze_format)
}

#[napi]
pub fn payment_scenario(input_json: String) -> NapiResult<String> {
    call(
        &input_json,
        mortgage_engine_core::scenario::analyze_payment_scenario,
    )
}

#[napi]
pub fn classify_payment(input_json: String) -> NapiResult<String> {
    call(
        &input_json,
        mortgage_engine_core::classification::analyze_classification,
    )
}

// ---------------------------------------------------------------------------
// Comparison & scenarios
// ---------------------------------------------------------------------------

#[napi]
pub fn compare_scenarios(input_json: String) -> NapiResult<String> {
    call(&input_json, mortgage_engine_core::comparison::analyze_comparison)
}

#[napi]
pub fn sensitivity_grid(input_json: String) -> NapiResult<String> {
    call(
        &input_json,
        mortgage_engine_core::scenarios::sensitivity::run_sensitivity,
    )
}
