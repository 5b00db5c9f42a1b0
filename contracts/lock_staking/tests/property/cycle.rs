#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Property-based tests for the cycle and penalty math.
//!
//! Invariants tested:
//! - Remaining time is always in `1..=effective_period`
//! - Penalty is always within `[base, base + time]` of the amount
//! - Penalty never increases as a cycle progresses

use lock_staking::cycle::{effective_period, penalty_amount, remaining_cycle_time, WHOLE};
use proptest::prelude::*;

const DAY: u64 = 86_400;

proptest! {
    #[test]
    fn prop_remaining_within_cycle(
        start in 0u64..1_000_000,
        period in 1u64..(720 * DAY),
        default_cycle in 1u64..(90 * DAY),
        elapsed in 0u64..(2_000 * DAY),
    ) {
        let now = start + elapsed;
        let remaining = remaining_cycle_time(start, period, default_cycle, now);
        let effective = effective_period(period, default_cycle, elapsed);
        prop_assert!(remaining >= 1);
        prop_assert!(remaining <= effective);
        prop_assert_eq!((elapsed + remaining) % effective, 0);
    }

    #[test]
    fn prop_penalty_bounded(
        amount in 1i128..1_000_000_000_000,
        period in 1u64..(720 * DAY),
        elapsed in 0u64..(2_000 * DAY),
        base in 0u32..5_000,
        time in 0u32..5_000,
    ) {
        let p = penalty_amount(amount, 0, period, 30 * DAY, elapsed, base, time);
        prop_assert!(p >= amount * base as i128 / WHOLE as i128);
        prop_assert!(p <= amount * (base + time) as i128 / WHOLE as i128);
        prop_assert!(p <= amount);
    }

    #[test]
    fn prop_penalty_decays_within_first_period(
        amount in 1i128..1_000_000_000,
        period in 2u64..(360 * DAY),
        a in 0.0f64..1.0,
        b in 0.0f64..1.0,
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let early = (lo * period as f64) as u64 % period;
        let late = (hi * period as f64) as u64 % period;
        prop_assume!(early <= late);
        let p_early = penalty_amount(amount, 0, period, period, early, 1_500, 3_500);
        let p_late = penalty_amount(amount, 0, period, period, late, 1_500, 3_500);
        prop_assert!(p_late <= p_early);
    }
}
