//! Level-pay amortization of a mortgage pool under a PSA prepayment speed.
//!
//! Each month the pool pays interest on the outstanding balance, the level
//! payment's principal component, and a prepayment of `balance * SMM`. Total
//! principal is capped at the outstanding balance, so the pool retires
//! exactly, and generation stops as soon as the balance reaches zero.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::math::level_payment;
use crate::pool::PoolParameters;
use crate::psa::{cpr_to_smm, psa_cpr};
use crate::types::{Money, Rate};
use crate::RmbsResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A single month of pool cash flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    /// 1-based month index.
    pub month: u32,
    /// Total principal retired this month: the level payment's principal
    /// component plus prepayment, capped at the outstanding balance.
    pub scheduled_principal: Money,
    pub interest: Money,
    /// Unscheduled principal, `balance * SMM`.
    pub prepayment: Money,
    /// `interest + scheduled_principal`.
    pub total_cash_flow: Money,
}

/// The ordered month-by-month cash flows of one pool projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowSchedule {
    original_principal: Money,
    term_months: u32,
    periods: Vec<PeriodRecord>,
}

impl CashFlowSchedule {
    pub fn periods(&self) -> &[PeriodRecord] {
        &self.periods
    }

    pub fn into_periods(self) -> Vec<PeriodRecord> {
        self.periods
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PeriodRecord> {
        self.periods.iter()
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn original_principal(&self) -> Money {
        self.original_principal
    }

    /// Outstanding balance at the end of each period, index-aligned with
    /// [`periods`](Self::periods).
    pub fn outstanding_balances(&self) -> Vec<Money> {
        self.periods
            .iter()
            .scan(self.original_principal, |balance, p| {
                *balance -= p.scheduled_principal;
                Some(*balance)
            })
            .collect()
    }

    /// Balance left after the last emitted period. Zero when the pool
    /// retired; positive when the term ran out first.
    pub fn residual_balance(&self) -> Money {
        self.periods
            .iter()
            .fold(self.original_principal, |balance, p| {
                balance - p.scheduled_principal
            })
    }

    /// Whether the pool retired strictly before its scheduled term.
    pub fn retired_early(&self) -> bool {
        self.residual_balance() <= Decimal::ZERO && self.len() < self.term_months as usize
    }

    pub fn total_cash_flow(&self) -> Money {
        self.periods.iter().map(|p| p.total_cash_flow).sum()
    }

    pub fn total_interest(&self) -> Money {
        self.periods.iter().map(|p| p.interest).sum()
    }

    pub fn total_principal(&self) -> Money {
        self.periods.iter().map(|p| p.scheduled_principal).sum()
    }

    pub fn total_prepayment(&self) -> Money {
        self.periods.iter().map(|p| p.prepayment).sum()
    }

    /// Weighted average life in years: sum(month/12 * principal) / sum(principal).
    pub fn weighted_average_life(&self) -> Decimal {
        let total_principal = self.total_principal();
        if total_principal <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let numerator: Decimal = self
            .periods
            .iter()
            .map(|p| Decimal::from(p.month) * p.scheduled_principal / dec!(12))
            .sum();
        numerator / total_principal
    }

    /// Residual balance as a fraction of the original principal.
    pub fn pool_factor(&self) -> Rate {
        if self.original_principal <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        self.residual_balance() / self.original_principal
    }
}

impl<'a> IntoIterator for &'a CashFlowSchedule {
    type Item = &'a PeriodRecord;
    type IntoIter = std::slice::Iter<'a, PeriodRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.periods.iter()
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Projects pool cash flows for one parameter set.
///
/// Construction does no positivity checks; validate with
/// [`PoolParameters::validate`] (or build through [`PoolParameters::new`])
/// first. The only construction error is a degenerate rate, for which the
/// level payment does not exist.
#[derive(Debug, Clone)]
pub struct AmortizationEngine {
    params: PoolParameters,
    monthly_rate: Rate,
    level_payment: Money,
}

impl AmortizationEngine {
    pub fn new(params: PoolParameters) -> RmbsResult<Self> {
        let monthly_rate = params.monthly_rate();
        let level_payment = level_payment(params.principal, monthly_rate, params.term_months)?;
        Ok(Self {
            params,
            monthly_rate,
            level_payment,
        })
    }

    pub fn params(&self) -> &PoolParameters {
        &self.params
    }

    pub fn monthly_rate(&self) -> Rate {
        self.monthly_rate
    }

    pub fn level_payment(&self) -> Money {
        self.level_payment
    }

    /// Generate the month-by-month schedule.
    ///
    /// Runs for at most `term_months` periods and stops after the first
    /// period whose balance update leaves nothing outstanding. A pool that
    /// reaches its term with a balance left simply ends there; no balloon
    /// period is added.
    pub fn generate_schedule(&self) -> CashFlowSchedule {
        let term = self.params.term_months;
        let mut periods = Vec::with_capacity(term as usize);
        let mut balance = self.params.principal;

        for month in 1..=term {
            let (record, next_balance) = self.step(month, balance);
            periods.push(record);
            balance = next_balance;
            if balance <= Decimal::ZERO {
                break;
            }
        }

        debug!(
            periods = periods.len(),
            term_months = term,
            residual_balance = %balance,
            "generated pool schedule"
        );

        CashFlowSchedule {
            original_principal: self.params.principal,
            term_months: term,
            periods,
        }
    }

    /// One month of cash flow on `balance`, returning the record and the
    /// balance carried into the next month.
    fn step(&self, month: u32, balance: Money) -> (PeriodRecord, Money) {
        let cpr = psa_cpr(month, self.params.psa_speed);
        let smm = cpr_to_smm(cpr);

        let interest = balance * self.monthly_rate;
        let scheduled_raw = self.level_payment - interest;
        let prepayment = if balance > Decimal::ZERO {
            balance * smm
        } else {
            Decimal::ZERO
        };
        let total_principal = (scheduled_raw + prepayment).min(balance);

        let record = PeriodRecord {
            month,
            scheduled_principal: total_principal,
            interest,
            prepayment,
            total_cash_flow: interest + total_principal,
        };
        (record, balance - total_principal)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
