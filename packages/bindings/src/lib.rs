use napi::Result as NapiResult;
use napi_derive::napi;

use loan_calc_core::amortization::{build_schedule, compute_schedule, LoanParameters};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_params(input_json: &str) -> NapiResult<LoanParameters> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

/// Full schedule envelope (payment, records, summary, warnings) as JSON.
#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let params = parse_params(&input_json)?;
    let output = build_schedule(&params).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Summary totals only, as JSON.
#[napi]
pub fn loan_summary(input_json: String) -> NapiResult<String> {
    let params = parse_params(&input_json)?;
    let output = build_schedule(&params).map_err(to_napi_error)?;
    serde_json::to_string(&output.result.summary).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Schedule as CSV text, ready for a download button.
#[napi]
pub fn schedule_csv(input_json: String) -> NapiResult<String> {
    let params = parse_params(&input_json)?;
    let (_, schedule) = compute_schedule(&params).map_err(to_napi_error)?;
    loan_calc_core::export::schedule_to_csv(&schedule).map_err(to_napi_error)
}
