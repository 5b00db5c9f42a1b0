/// Denominator for penalty fractions (basis points).
pub const WHOLE: u32 = 10_000;

/// Length of the cycle that currently applies to a lock.
///
/// A lock runs its own `period` until that has fully elapsed once. After
/// that, locks longer than `default_cycle` relock in `default_cycle`-sized
/// increments.
pub fn effective_period(period: u64, default_cycle: u64, elapsed: u64) -> u64 {
    if period <= default_cycle || elapsed < period {
        period
    } else {
        default_cycle
    }
}

/// Seconds left in the current cycle.
///
/// Cycles are measured from `start_time`. A lock sitting exactly on a
/// cycle boundary has a full cycle remaining.
pub fn remaining_cycle_time(start_time: u64, period: u64, default_cycle: u64, now: u64) -> u64 {
    let elapsed = now.saturating_sub(start_time);
    let effective = effective_period(period, default_cycle, elapsed);
    if effective == 0 {
        return 0;
    }
    effective - elapsed % effective
}

/// Penalty factor in [`WHOLE`] units for the given `remaining` time.
///
/// ```text
/// factor = remaining × time_penalty / effective + base_penalty
/// ```
#[allow(clippy::arithmetic_side_effects)]
pub fn penalty_factor(remaining: u64, effective: u64, base_penalty: u32, time_penalty: u32) -> u32 {
    if effective == 0 {
        return base_penalty;
    }
    let time_part = (remaining as u128) * (time_penalty as u128) / (effective as u128);
    let factor = time_part.saturating_add(base_penalty as u128);
    factor.min(WHOLE as u128) as u32
}

/// Penalty charged on `amount` for exiting a lock early at `now`.
///
/// Never negative and never more than `amount`.
#[allow(clippy::arithmetic_side_effects)]
pub fn penalty_amount(
    amount: i128,
    start_time: u64,
    period: u64,
    default_cycle: u64,
    now: u64,
    base_penalty: u32,
    time_penalty: u32,
) -> i128 {
    if amount <= 0 {
        return 0;
    }
    let elapsed = now.saturating_sub(start_time);
    let effective = effective_period(period, default_cycle, elapsed);
    let remaining = remaining_cycle_time(start_time, period, default_cycle, now);
    let factor = penalty_factor(remaining, effective, base_penalty, time_penalty);
    let penalty = amount.saturating_mul(factor as i128) / WHOLE as i128;
    penalty.clamp(0, amount)
}
