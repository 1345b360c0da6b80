//! PSA prepayment curve and CPR/SMM conversions.
//!
//! 100 PSA ramps the annual CPR linearly from 0 to 6% over the first 30
//! months of pool life and holds it flat thereafter. A speed of `s` scales
//! the whole curve by `s` (1.0 = 100 PSA, 2.0 = 200 PSA).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::math::{checked_pow, nth_root};
use crate::types::Rate;

/// Plateau CPR of the 100 PSA curve (6% annual).
pub const PSA_PLATEAU_CPR: Decimal = dec!(0.06);

/// Month at which the PSA ramp reaches its plateau.
pub const PSA_RAMP_MONTHS: u32 = 30;

/// Annualised CPR for `month` (1-based) at `psa_speed` multiples of 100 PSA.
///
/// During the ramp the value is `min(plateau * month / 30, plateau)`; the min
/// is kept as written even though the first term never exceeds the second
/// for months inside the ramp.
pub fn psa_cpr(month: u32, psa_speed: Decimal) -> Rate {
    let plateau = PSA_PLATEAU_CPR * psa_speed;
    if month <= PSA_RAMP_MONTHS {
        let ramp = plateau * (Decimal::from(month) / Decimal::from(PSA_RAMP_MONTHS));
        ramp.min(plateau)
    } else {
        plateau
    }
}

/// Convert annual CPR to single monthly mortality (SMM).
/// SMM = 1 - (1 - CPR)^(1/12)
///
/// CPR at or above 100% maps to an SMM of 1: the whole balance prepays.
pub fn cpr_to_smm(cpr: Rate) -> Rate {
    if cpr <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    if cpr >= Decimal::ONE {
        return Decimal::ONE;
    }
    Decimal::ONE - nth_root(Decimal::ONE - cpr, 12)
}

/// Convert SMM back to annualised CPR.
/// CPR = 1 - (1 - SMM)^12
pub fn smm_to_cpr(smm: Rate) -> Rate {
    if smm <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    if smm >= Decimal::ONE {
        return Decimal::ONE;
    }
    // (1 - smm) is in (0, 1) so the power cannot overflow.
    Decimal::ONE - checked_pow(Decimal::ONE - smm, 12).unwrap_or(Decimal::ZERO)
}
