//! End-to-end pool analysis: schedule generation plus tranche allocation,
//! wrapped in the standard output envelope.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use crate::amortization::AmortizationEngine;
use crate::pool::PoolParameters;
use crate::psa::{cpr_to_smm, psa_cpr};
use crate::tranche::{TrancheAllocator, TrancheTotals};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::RmbsResult;

/// Speeds above 500 PSA are flagged as unusual.
const HIGH_PSA_SPEED: Decimal = dec!(5.0);

// ---------------------------------------------------------------------------
// Input / output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolAnalysisInput {
    pub pool: PoolParameters,
    /// Senior share of each period's cash flow. Defaults to 80%.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub senior_share: Option<Rate>,
}

/// One month of the projection with its tranche allocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolPeriodRow {
    pub month: u32,
    pub cpr: Rate,
    pub smm: Rate,
    pub scheduled_principal: Money,
    pub interest: Money,
    pub prepayment: Money,
    pub total_cash_flow: Money,
    pub ending_balance: Money,
    pub senior_cash_flow: Money,
    pub subordinate_cash_flow: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolSummary {
    pub periods: usize,
    pub retired_early: bool,
    pub residual_balance: Money,
    pub pool_factor: Rate,
    pub total_interest: Money,
    pub total_principal: Money,
    pub total_prepayment: Money,
    pub total_cash_flow: Money,
    /// Total cash flow in $ millions.
    pub total_cash_flow_mm: Decimal,
    pub total_senior_cash_flow: Money,
    pub total_subordinate_cash_flow: Money,
    pub weighted_average_life_years: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolAnalysisOutput {
    pub level_payment: Money,
    pub monthly_rate: Rate,
    pub senior_share: Rate,
    pub periods: Vec<PoolPeriodRow>,
    pub summary: PoolSummary,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Project pool cash flows and split them between senior and subordinate
/// tranches.
///
/// Parameters are validated before anything is computed; an invalid set
/// yields an error and no partial output.
pub fn analyze_pool(
    input: &PoolAnalysisInput,
) -> RmbsResult<ComputationOutput<PoolAnalysisOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.pool.validate()?;
    let allocator = match input.senior_share {
        Some(share) => TrancheAllocator::with_senior_share(share)?,
        None => TrancheAllocator::default(),
    };
    let engine = AmortizationEngine::new(input.pool.clone())?;

    if input.pool.psa_speed > HIGH_PSA_SPEED {
        warnings.push(format!(
            "PSA speed {}x 100 PSA is unusually high; results may be unreliable",
            input.pool.psa_speed
        ));
    }

    let schedule = engine.generate_schedule();
    let splits = allocator.split(schedule.periods());
    let balances = schedule.outstanding_balances();

    let mut capped_months = 0u32;
    let periods: Vec<PoolPeriodRow> = schedule
        .iter()
        .zip(&splits)
        .zip(&balances)
        .map(|((p, s), ending_balance)| {
            let cpr = psa_cpr(p.month, input.pool.psa_speed);
            if cpr >= Decimal::ONE {
                capped_months += 1;
            }
            PoolPeriodRow {
                month: p.month,
                cpr,
                smm: cpr_to_smm(cpr),
                scheduled_principal: p.scheduled_principal,
                interest: p.interest,
                prepayment: p.prepayment,
                total_cash_flow: p.total_cash_flow,
                ending_balance: *ending_balance,
                senior_cash_flow: s.senior_cash_flow,
                subordinate_cash_flow: s.subordinate_cash_flow,
            }
        })
        .collect();

    if capped_months > 0 {
        warnings.push(format!(
            "CPR reached 100% in {capped_months} month(s); SMM capped at 1"
        ));
    }

    let residual_balance = schedule.residual_balance();
    if residual_balance > Decimal::ZERO {
        warnings.push(format!(
            "Pool reached its {}-month term with {} outstanding",
            input.pool.term_months, residual_balance
        ));
    }

    let TrancheTotals {
        senior_cash_flow: total_senior_cash_flow,
        subordinate_cash_flow: total_subordinate_cash_flow,
    } = TrancheAllocator::totals(&splits);
    let total_cash_flow = schedule.total_cash_flow();

    let summary = PoolSummary {
        periods: schedule.len(),
        retired_early: schedule.retired_early(),
        residual_balance,
        pool_factor: schedule.pool_factor(),
        total_interest: schedule.total_interest(),
        total_principal: schedule.total_principal(),
        total_prepayment: schedule.total_prepayment(),
        total_cash_flow,
        total_cash_flow_mm: total_cash_flow / dec!(1_000_000),
        total_senior_cash_flow,
        total_subordinate_cash_flow,
        weighted_average_life_years: schedule.weighted_average_life(),
    };

    for w in &warnings {
        warn!("{w}");
    }
    debug!(
        periods = summary.periods,
        total_cash_flow = %summary.total_cash_flow,
        "pool analysis complete"
    );

    let output = PoolAnalysisOutput {
        level_payment: engine.level_payment(),
        monthly_rate: engine.monthly_rate(),
        senior_share: allocator.senior_share(),
        periods,
        summary,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Mortgage pool cash flow: level-pay amortisation with PSA prepayment, proportional senior/subordinate split",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
