use napi::Result as NapiResult;
use napi_derive::napi;
use serde::{Deserialize, Serialize};

use rmbs_core::amortization::{AmortizationEngine, PeriodRecord};
use rmbs_core::analysis::{self, PoolAnalysisInput};
use rmbs_core::pool::PoolParameters;
use rmbs_core::tranche::{TrancheAllocator, TrancheSplit};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

#[derive(Serialize)]
struct ScheduleOutput {
    level_payment: rust_decimal::Decimal,
    periods: Vec<PeriodRecord>,
    outstanding_balances: Vec<rust_decimal::Decimal>,
    total_cash_flow: rust_decimal::Decimal,
}

#[derive(Deserialize)]
struct SplitInput {
    periods: Vec<PeriodRecord>,
    #[serde(default)]
    senior_share: Option<rust_decimal::Decimal>,
}

// ---------------------------------------------------------------------------
// Pool analysis
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_pool(input_json: String) -> NapiResult<String> {
    let input: PoolAnalysisInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = analysis::analyze_pool(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn generate_schedule(params_json: String) -> NapiResult<String> {
    let params: PoolParameters = serde_json::from_str(&params_json).map_err(to_napi_error)?;
    params.validate().map_err(to_napi_error)?;
    let engine = AmortizationEngine::new(params).map_err(to_napi_error)?;
    let schedule = engine.generate_schedule();

    let output = ScheduleOutput {
        level_payment: engine.level_payment(),
        outstanding_balances: schedule.outstanding_balances(),
        total_cash_flow: schedule.total_cash_flow(),
        periods: schedule.into_periods(),
    };
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn split_tranches(input_json: String) -> NapiResult<String> {
    let input: SplitInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let allocator = match input.senior_share {
        Some(share) => TrancheAllocator::with_senior_share(share).map_err(to_napi_error)?,
        None => TrancheAllocator::default(),
    };
    let splits: Vec<TrancheSplit> = allocator.split(&input.periods);
    serde_json::to_string(&splits).map_err(to_napi_error)
}
