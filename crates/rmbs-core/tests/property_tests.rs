//! Property tests for schedule and allocation invariants.
//!
//! Over random valid pools:
//! 1. Schedule length is between 1 and the term, months run 1..=n
//! 2. Each record's cash flow is interest plus principal, all non-negative
//! 3. Outstanding balance never goes negative and falls every month
//! 4. Tranche legs add back to the period total, senior = 4x subordinate

use proptest::prelude::*;
use rmbs_core::amortization::AmortizationEngine;
use rmbs_core::pool::PoolParameters;
use rmbs_core::tranche::TrancheAllocator;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ── Strategies ───────────────────────────────────────────────────────

fn arb_pool() -> impl Strategy<Value = PoolParameters> {
    (
        1_000u64..1_000_000_000,
        1u32..2_000,  // annual rate in bp
        1u32..=480,   // term months
        1u32..1_000,  // PSA in percent
    )
        .prop_map(|(principal, rate_bp, term, psa_pct)| {
            PoolParameters::new(
                Decimal::from(principal),
                Decimal::from(rate_bp) / dec!(10_000),
                term,
                Decimal::from(psa_pct) / dec!(100),
            )
            .expect("strategy yields valid parameters")
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn schedule_length_and_months(pool in arb_pool()) {
        let term = pool.term_months as usize;
        let schedule = AmortizationEngine::new(pool).unwrap().generate_schedule();

        prop_assert!(!schedule.is_empty());
        prop_assert!(schedule.len() <= term);
        for (i, p) in schedule.iter().enumerate() {
            prop_assert_eq!(p.month as usize, i + 1);
        }
    }

    #[test]
    fn record_components(pool in arb_pool()) {
        let schedule = AmortizationEngine::new(pool).unwrap().generate_schedule();
        for p in &schedule {
            prop_assert!(p.scheduled_principal >= Decimal::ZERO);
            prop_assert!(p.interest >= Decimal::ZERO);
            prop_assert!(p.prepayment >= Decimal::ZERO);
            prop_assert_eq!(p.total_cash_flow, p.interest + p.scheduled_principal);
        }
    }

    #[test]
    fn balance_monotone_non_negative(pool in arb_pool()) {
        let principal = pool.principal;
        let schedule = AmortizationEngine::new(pool).unwrap().generate_schedule();

        let mut previous = principal;
        for b in schedule.outstanding_balances() {
            prop_assert!(b >= Decimal::ZERO);
            prop_assert!(b < previous);
            previous = b;
        }
        prop_assert!(schedule.residual_balance() >= Decimal::ZERO);
    }

    #[test]
    fn tranche_split_exact(pool in arb_pool()) {
        let schedule = AmortizationEngine::new(pool).unwrap().generate_schedule();
        let splits = TrancheAllocator::default().split(schedule.periods());

        prop_assert_eq!(splits.len(), schedule.len());
        for (p, s) in schedule.iter().zip(&splits) {
            prop_assert_eq!(s.senior_cash_flow + s.subordinate_cash_flow, p.total_cash_flow);
            if !s.subordinate_cash_flow.is_zero() {
                let ratio = s.senior_cash_flow / s.subordinate_cash_flow;
                prop_assert!((ratio - dec!(4)).abs() < dec!(0.000001));
            }
        }
    }

    #[test]
    fn generation_is_idempotent(pool in arb_pool()) {
        let engine = AmortizationEngine::new(pool).unwrap();
        prop_assert_eq!(engine.generate_schedule(), engine.generate_schedule());
    }
}
