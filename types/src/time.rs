//! Clock primitives for session accounting.
//!
//! All session math runs on Unix epoch seconds. The HTTP layer stamps each
//! request with [`Timestamp::now`]; everything below it takes timestamps as
//! arguments and never reads the system clock.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds in one hour.
pub const SECS_PER_HOUR: u64 = 3600;

/// Seconds since the Unix epoch (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    /// The system clock, truncated to whole seconds.
    ///
    /// A clock set before the Unix epoch reads as zero.
    pub fn now() -> Self {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self(since_epoch.as_secs())
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// Seconds from this instant to `now`.
    ///
    /// Saturates at zero when `now` is earlier than this instant.
    pub fn elapsed_since(&self, now: Timestamp) -> u64 {
        now.0.saturating_sub(self.0)
    }

    /// Whether `duration_secs` have fully passed by `now`.
    pub fn has_expired(&self, duration_secs: u64, now: Timestamp) -> bool {
        let deadline = self.0.saturating_add(duration_secs);
        now.0 >= deadline
    }
}
