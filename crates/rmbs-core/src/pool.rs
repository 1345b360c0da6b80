//! Pool parameters and boundary validation.
//!
//! The amortization engine trusts its inputs; every check on principal, rate,
//! term and speed happens here, before an engine is built.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::RmbsError;
use crate::types::{Money, Rate};
use crate::RmbsResult;

/// Largest accepted pool balance. Keeps every schedule amount and total
/// inside the decimal range.
pub const MAX_PRINCIPAL: Money = dec!(1_000_000_000_000_000_000);

/// Largest accepted annual rate (10,000%).
pub const MAX_ANNUAL_RATE: Rate = dec!(100);

/// Input parameters of a fixed-rate mortgage pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolParameters {
    /// Original pool balance.
    pub principal: Money,
    /// Nominal annual interest rate (e.g., 0.04 = 4%).
    pub annual_rate: Rate,
    /// Scheduled number of monthly periods.
    pub term_months: u32,
    /// Prepayment speed as a multiple of 100 PSA (1.0 = 100 PSA).
    pub psa_speed: Decimal,
}

impl PoolParameters {
    /// Build and validate a parameter set in engine units.
    pub fn new(
        principal: Money,
        annual_rate: Rate,
        term_months: u32,
        psa_speed: Decimal,
    ) -> RmbsResult<Self> {
        let params = Self {
            principal,
            annual_rate,
            term_months,
            psa_speed,
        };
        params.validate()?;
        Ok(params)
    }

    /// Build from the units a data-entry form collects: pool size in
    /// $ millions, rate in percent, term in months and PSA in percent
    /// (100 = 100 PSA).
    ///
    /// The term arrives as a decimal so that a fractional entry can be
    /// rejected rather than silently truncated.
    pub fn from_display_units(
        pool_size_mm: Decimal,
        rate_pct: Decimal,
        term_months: Decimal,
        psa_pct: Decimal,
    ) -> RmbsResult<Self> {
        if term_months.fract() != Decimal::ZERO {
            return Err(RmbsError::InvalidParameter {
                field: "term_months".into(),
                reason: format!("Term must be a whole number of months, got {term_months}"),
            });
        }
        if term_months <= Decimal::ZERO {
            return Err(RmbsError::InvalidParameter {
                field: "term_months".into(),
                reason: "Term must be positive".into(),
            });
        }
        let term = term_months
            .to_u32()
            .ok_or_else(|| RmbsError::InvalidParameter {
                field: "term_months".into(),
                reason: format!("Term of {term_months} months is out of range"),
            })?;

        let principal = pool_size_mm
            .checked_mul(dec!(1_000_000))
            .ok_or_else(|| RmbsError::InvalidParameter {
                field: "principal".into(),
                reason: format!("Pool size of {pool_size_mm}mm is out of range"),
            })?;

        Self::new(
            principal,
            rate_pct / dec!(100),
            term,
            psa_pct / dec!(100),
        )
    }

    /// Reject any parameter that is not strictly positive.
    ///
    /// A zero rate is reported as [`RmbsError::DegenerateRate`] because it is
    /// the one value that leaves the level payment undefined.
    pub fn validate(&self) -> RmbsResult<()> {
        if self.principal <= Decimal::ZERO {
            return Err(RmbsError::InvalidParameter {
                field: "principal".into(),
                reason: "Pool principal must be positive".into(),
            });
        }
        if self.principal > MAX_PRINCIPAL {
            return Err(RmbsError::InvalidParameter {
                field: "principal".into(),
                reason: format!("Pool principal must not exceed {MAX_PRINCIPAL}"),
            });
        }
        if self.annual_rate.is_zero() {
            return Err(RmbsError::DegenerateRate(
                "annual rate is zero; level payment is undefined".into(),
            ));
        }
        if self.annual_rate < Decimal::ZERO {
            return Err(RmbsError::InvalidParameter {
                field: "annual_rate".into(),
                reason: "Annual rate must be positive".into(),
            });
        }
        if self.annual_rate > MAX_ANNUAL_RATE {
            return Err(RmbsError::InvalidParameter {
                field: "annual_rate".into(),
                reason: format!("Annual rate must not exceed {MAX_ANNUAL_RATE}"),
            });
        }
        if self.term_months == 0 {
            return Err(RmbsError::InvalidParameter {
                field: "term_months".into(),
                reason: "Term must be at least one month".into(),
            });
        }
        if self.psa_speed <= Decimal::ZERO {
            return Err(RmbsError::InvalidParameter {
                field: "psa_speed".into(),
                reason: "PSA speed must be positive".into(),
            });
        }
        Ok(())
    }

    /// Monthly rate under simple monthly compounding.
    pub fn monthly_rate(&self) -> Rate {
        self.annual_rate / dec!(12)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn field_of(err: RmbsError) -> String {
        match err {
            RmbsError::InvalidParameter { field, .. } => field,
            other => panic!("Expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_parameters() {
        let p = PoolParameters::new(dec!(100_000_000), dec!(0.04), 360, dec!(1.0)).unwrap();
        assert_eq!(p.term_months, 360);
        assert_eq!(p.monthly_rate(), dec!(0.04) / dec!(12));
    }

    #[test]
    fn test_rejects_non_positive_principal() {
        let err = PoolParameters::new(dec!(0), dec!(0.04), 360, dec!(1.0)).unwrap_err();
        assert_eq!(field_of(err), "principal");
        let err = PoolParameters::new(dec!(-5), dec!(0.04), 360, dec!(1.0)).unwrap_err();
        assert_eq!(field_of(err), "principal");
    }

    #[test]
    fn test_zero_rate_is_degenerate() {
        let err = PoolParameters::new(dec!(1_000_000), dec!(0), 360, dec!(1.0)).unwrap_err();
        assert!(matches!(err, RmbsError::DegenerateRate(_)));
    }

    #[test]
    fn test_rejects_negative_rate() {
        let err = PoolParameters::new(dec!(1_000_000), dec!(-0.01), 360, dec!(1.0)).unwrap_err();
        assert_eq!(field_of(err), "annual_rate");
    }

    #[test]
    fn test_rejects_zero_term() {
        let err = PoolParameters::new(dec!(1_000_000), dec!(0.04), 0, dec!(1.0)).unwrap_err();
        assert_eq!(field_of(err), "term_months");
    }

    #[test]
    fn test_rejects_non_positive_psa() {
        let err = PoolParameters::new(dec!(1_000_000), dec!(0.04), 360, dec!(0)).unwrap_err();
        assert_eq!(field_of(err), "psa_speed");
    }

    #[test]
    fn test_display_units_conversion() {
        let p = PoolParameters::from_display_units(dec!(100), dec!(4), dec!(360), dec!(100))
            .unwrap();
        assert_eq!(p.principal, dec!(100_000_000));
        assert_eq!(p.annual_rate, dec!(0.04));
        assert_eq!(p.term_months, 360);
        assert_eq!(p.psa_speed, dec!(1));
    }

    #[test]
    fn test_display_units_accepts_integral_decimal_term() {
        let p = PoolParameters::from_display_units(dec!(1), dec!(5), dec!(180.00), dec!(150))
            .unwrap();
        assert_eq!(p.term_months, 180);
    }

    #[test]
    fn test_display_units_rejects_fractional_term() {
        let err = PoolParameters::from_display_units(dec!(100), dec!(4), dec!(360.5), dec!(100))
            .unwrap_err();
        assert_eq!(field_of(err), "term_months");
    }

    #[test]
    fn test_display_units_rejects_negative_term() {
        let err = PoolParameters::from_display_units(dec!(100), dec!(4), dec!(-12), dec!(100))
            .unwrap_err();
        assert_eq!(field_of(err), "term_months");
    }

    #[test]
    fn test_display_units_oversized_pool_rejected() {
        // Converting to dollars would overflow the decimal range.
        let err = PoolParameters::from_display_units(
            dec!(100_000_000_000_000_000_000_000),
            dec!(4),
            dec!(360),
            dec!(100),
        )
        .unwrap_err();
        assert_eq!(field_of(err), "principal");

        // Representable, but above the accepted maximum.
        let err = PoolParameters::from_display_units(
            dec!(10_000_000_000_000),
            dec!(4),
            dec!(360),
            dec!(100),
        )
        .unwrap_err();
        assert_eq!(field_of(err), "principal");
    }

    #[test]
    fn test_rejects_rate_above_maximum() {
        let err = PoolParameters::new(dec!(1_000_000), dec!(101), 360, dec!(1.0)).unwrap_err();
        assert_eq!(field_of(err), "annual_rate");
        assert!(PoolParameters::new(dec!(1_000_000), MAX_ANNUAL_RATE, 360, dec!(1.0)).is_ok());
    }

    #[test]
    fn test_display_units_zero_rate_is_degenerate() {
        let err = PoolParameters::from_display_units(dec!(100), dec!(0), dec!(360), dec!(100))
            .unwrap_err();
        assert!(matches!(err, RmbsError::DegenerateRate(_)));
    }

    #[test]
    fn test_deserialize_from_json() {
        let json = r#"{"principal":"250000","annual_rate":"0.055","term_months":240,"psa_speed":"1.5"}"#;
        let p: PoolParameters = serde_json::from_str(json).unwrap();
        assert_eq!(p.principal, dec!(250000));
        assert!(p.validate().is_ok());
    }
}
