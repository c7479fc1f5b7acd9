//! Pure reward arithmetic.
//!
//! `reward = base_rate × multiplier × secs`, with the accruing seconds
//! clamped to the session length. All values are deterministic integers:
//! rates are u128 raw units per second, timestamps are u64 whole seconds,
//! and all arithmetic is checked integer multiply/add.

use adit_types::{Timestamp, TokenAmount, SECS_PER_HOUR};

/// Total length of a session in seconds.
pub fn session_secs(hours: u32) -> u64 {
    u64::from(hours) * SECS_PER_HOUR
}

/// Seconds since the session started, saturating at zero under clock skew.
pub fn elapsed_secs(started_at: Timestamp, now: Timestamp) -> u64 {
    started_at.elapsed_since(now)
}

/// Reward accrued over `secs` seconds at the given rate and multiplier.
/// `None` on overflow.
pub fn reward(base_rate: TokenAmount, multiplier: u32, secs: u64) -> Option<TokenAmount> {
    base_rate
        .checked_mul_u64(u64::from(multiplier))?
        .checked_mul_u64(secs)
}

/// Reward with elapsed time clamped to the session length.
///
/// Accrual freezes once the session duration has fully elapsed; polling a
/// finished-but-unclaimed session always yields the same value.
pub fn capped_reward(
    base_rate: TokenAmount,
    multiplier: u32,
    started_at: Timestamp,
    hours: u32,
    now: Timestamp,
) -> Option<TokenAmount> {
    let secs = elapsed_secs(started_at, now).min(session_secs(hours));
    reward(base_rate, multiplier, secs)
}

/// Whether the full session duration has elapsed. Monotone in `now`.
pub fn is_complete(started_at: Timestamp, hours: u32, now: Timestamp) -> bool {
    started_at.has_expired(session_secs(hours), now)
}

/// Seconds until the session completes, zero once it has.
pub fn remaining_secs(started_at: Timestamp, hours: u32, now: Timestamp) -> u64 {
    session_secs(hours).saturating_sub(elapsed_secs(started_at, now))
}
