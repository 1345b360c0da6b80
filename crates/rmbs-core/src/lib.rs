//! Mortgage pool cash flow projection.
//!
//! A fixed-rate pool is amortised month by month under a PSA prepayment
//! assumption ([`amortization`]), and each period's total cash flow is split
//! proportionally between a senior and a subordinate tranche ([`tranche`]).
//! [`analysis::analyze_pool`] runs both and wraps the result in the standard
//! [`ComputationOutput`] envelope.

pub mod amortization;
pub mod analysis;
pub mod error;
pub mod math;
pub mod pool;
pub mod psa;
pub mod tranche;
pub mod types;

pub use error::RmbsError;
pub use types::*;

/// Standard result type for all rmbs operations
pub type RmbsResult<T> = Result<T, RmbsError>;
