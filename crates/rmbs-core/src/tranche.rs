//! Senior/subordinate allocation of pool cash flow.
//!
//! Every period's total cash flow is split by a fixed proportion. There is no
//! per-tranche balance, no coverage test and no shortfall reallocation: each
//! period is allocated independently of every other.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::amortization::PeriodRecord;
use crate::error::RmbsError;
use crate::types::{Money, Rate};
use crate::RmbsResult;

/// Share of each period's cash flow paid to the senior tranche.
pub const DEFAULT_SENIOR_SHARE: Rate = dec!(0.80);

/// Decimal places kept on the senior leg when the total has fewer.
pub const MIN_SPLIT_SCALE: u32 = 12;

/// One period's allocation, index-aligned with the source [`PeriodRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrancheSplit {
    pub senior_cash_flow: Money,
    pub subordinate_cash_flow: Money,
}

/// Aggregate allocation across a whole schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrancheTotals {
    pub senior_cash_flow: Money,
    pub subordinate_cash_flow: Money,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrancheAllocator {
    senior_share: Rate,
}

impl Default for TrancheAllocator {
    fn default() -> Self {
        Self {
            senior_share: DEFAULT_SENIOR_SHARE,
        }
    }
}

impl TrancheAllocator {
    /// Two-class split with `senior_share` of each period going to the
    /// senior tranche and the remainder to the subordinate tranche.
    pub fn with_senior_share(senior_share: Rate) -> RmbsResult<Self> {
        if senior_share < Decimal::ZERO || senior_share > Decimal::ONE {
            return Err(RmbsError::InvalidParameter {
                field: "senior_share".into(),
                reason: "Senior share must be between 0 and 1".into(),
            });
        }
        Ok(Self { senior_share })
    }

    pub fn senior_share(&self) -> Rate {
        self.senior_share
    }

    pub fn subordinate_share(&self) -> Rate {
        Decimal::ONE - self.senior_share
    }

    /// Split each period's total cash flow, preserving order and length.
    pub fn split(&self, periods: &[PeriodRecord]) -> Vec<TrancheSplit> {
        periods
            .iter()
            .map(|p| self.split_amount(p.total_cash_flow))
            .collect()
    }

    /// The subordinate share is taken as the remainder so the two legs
    /// always add back to the period total. The senior leg never carries more
    /// decimal places than the total (or [`MIN_SPLIT_SCALE`]), which keeps
    /// both the subtraction and the re-addition free of rounding.
    pub fn split_amount(&self, total_cash_flow: Money) -> TrancheSplit {
        let scale = total_cash_flow.scale().max(MIN_SPLIT_SCALE);
        let senior_cash_flow = (total_cash_flow * self.senior_share).round_dp(scale);
        TrancheSplit {
            senior_cash_flow,
            subordinate_cash_flow: total_cash_flow - senior_cash_flow,
        }
    }

    pub fn totals(splits: &[TrancheSplit]) -> TrancheTotals {
        splits.iter().fold(
            TrancheTotals {
                senior_cash_flow: Decimal::ZERO,
                subordinate_cash_flow: Decimal::ZERO,
            },
            |mut acc, s| {
                acc.senior_cash_flow += s.senior_cash_flow;
                acc.subordinate_cash_flow += s.subordinate_cash_flow;
                acc
            },
        )
    }
}
