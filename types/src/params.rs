//! Mining parameters: the admin-tunable configuration record.
//!
//! One record holds the base accrual rate plus the menus of session durations
//! and multiplier tiers the client may choose from. The daemon seeds the
//! defaults at startup; the config API replaces the whole record.

use crate::amount::{TokenAmount, TOKEN_UNIT};
use crate::error::TypeError;
use crate::time::SECS_PER_HOUR;
use serde::{Deserialize, Serialize};

/// A selectable session duration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationOption {
    /// Session length in whole hours.
    pub hours: u32,
    /// Client-facing label ("4 Hours").
    pub label: String,
    /// Session length in seconds; always `hours * 3600`.
    pub seconds: u64,
}

impl DurationOption {
    pub fn new(hours: u32, label: impl Into<String>) -> Self {
        Self {
            hours,
            label: label.into(),
            seconds: u64::from(hours) * SECS_PER_HOUR,
        }
    }
}

/// A selectable accrual multiplier tier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiplierTier {
    /// Multiplier applied to the base rate.
    pub value: u32,
    /// Client-facing label ("2x").
    pub label: String,
    /// Whether the client must unlock this tier (ad watch) before selecting it.
    /// Enforcement happens client-side; the backend only describes the gate.
    pub requires_unlock: bool,
}

impl MultiplierTier {
    pub fn new(value: u32, label: impl Into<String>, requires_unlock: bool) -> Self {
        Self {
            value,
            label: label.into(),
            requires_unlock,
        }
    }
}

/// All mining parameters, stored as a single config record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiningParams {
    /// Accrual rate at multiplier 1: raw units per second.
    /// Default: 0.01 token/second = 10_000_000_000 raw/second.
    pub base_rate: TokenAmount,

    /// Durations the client may start a session with.
    pub durations: Vec<DurationOption>,

    /// Multiplier tiers the client may select or upgrade to.
    pub multipliers: Vec<MultiplierTier>,
}

impl MiningParams {
    /// 0.01 token per second expressed as raw units per second.
    pub const BASE_RATE_DEFAULT: u128 = TOKEN_UNIT / 100;

    /// The shipped configuration: 0.01 token/s, sessions from 1 to 24 hours,
    /// tiers from 1x to 6x with every tier above 1x behind the unlock gate.
    pub fn adit_defaults() -> Self {
        Self {
            base_rate: TokenAmount::new(Self::BASE_RATE_DEFAULT),
            durations: vec![
                DurationOption::new(1, "1 Hour"),
                DurationOption::new(2, "2 Hours"),
                DurationOption::new(4, "4 Hours"),
                DurationOption::new(12, "12 Hours"),
                DurationOption::new(24, "24 Hours"),
            ],
            multipliers: vec![
                MultiplierTier::new(1, "1x", false),
                MultiplierTier::new(2, "2x", true),
                MultiplierTier::new(3, "3x", true),
                MultiplierTier::new(4, "4x", true),
                MultiplierTier::new(5, "5x", true),
                MultiplierTier::new(6, "6x", true),
            ],
        }
    }

    /// Look up a duration option by hour count.
    pub fn duration(&self, hours: u32) -> Option<&DurationOption> {
        self.durations.iter().find(|d| d.hours == hours)
    }

    /// Look up a multiplier tier by value.
    pub fn multiplier(&self, value: u32) -> Option<&MultiplierTier> {
        self.multipliers.iter().find(|m| m.value == value)
    }

    /// Structural validation, applied before a replacement record is accepted.
    pub fn validate(&self) -> Result<(), TypeError> {
        if self.base_rate.is_zero() {
            return Err(TypeError::InvalidParams("base_rate must be non-zero".into()));
        }
        if self.durations.is_empty() {
            return Err(TypeError::InvalidParams("durations must not be empty".into()));
        }
        if self.multipliers.is_empty() {
            return Err(TypeError::InvalidParams("multipliers must not be empty".into()));
        }
        for (i, d) in self.durations.iter().enumerate() {
            if d.hours == 0 {
                return Err(TypeError::InvalidParams(format!("durations[{i}]: zero hours")));
            }
            if d.seconds != u64::from(d.hours) * SECS_PER_HOUR {
                return Err(TypeError::InvalidParams(format!(
                    "durations[{i}]: seconds {} does not match {} hours",
                    d.seconds, d.hours
                )));
            }
            if self.durations[..i].iter().any(|prev| prev.hours == d.hours) {
                return Err(TypeError::InvalidParams(format!(
                    "durations[{i}]: duplicate hours {}",
                    d.hours
                )));
            }
        }
        for (i, m) in self.multipliers.iter().enumerate() {
            if m.value == 0 {
                return Err(TypeError::InvalidParams(format!("multipliers[{i}]: zero value")));
            }
            if self.multipliers[..i].iter().any(|prev| prev.value == m.value) {
                return Err(TypeError::InvalidParams(format!(
                    "multipliers[{i}]: duplicate value {}",
                    m.value
                )));
            }
        }
        Ok(())
    }
}

/// Default is the shipped configuration.
impl Default for MiningParams {
    fn default() -> Self {
        Self::adit_defaults()
    }
}
