//! Session state enum.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The lifecycle state of a mining session.
///
/// `Mining` is the only live state. `Claimed` and `Cancelled` are terminal:
/// no operation transitions out of them, and a terminal session's earnings
/// snapshot is frozen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Accruing; the wallet's single live session.
    Mining,
    /// Reward credited to the wallet.
    Claimed,
    /// Abandoned; accrued reward forfeited.
    Cancelled,
}

impl SessionStatus {
    /// Whether this state admits no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Claimed | Self::Cancelled)
    }

    /// Whether accrual-affecting operations (progress, upgrade, claim, cancel)
    /// are legal in this state.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Mining)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Mining => "mining",
            Self::Claimed => "claimed",
            Self::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}
