//! The mining session engine.
//!
//! Earnings are a deterministic function of time, not a background process:
//! `reward = base_rate × multiplier × min(elapsed_secs, session_secs)`
//!
//! This crate handles:
//! - Reward computation from timestamps and parameters (pure, in [`reward`])
//! - The session state machine (start, status, upgrade, claim, cancel)
//! - Claim settlement, the only path that credits a wallet balance
//!
//! Every operation takes an explicit `now`; nothing in here reads the clock.

pub mod engine;
pub mod error;
pub mod reward;

pub use engine::{ClaimOutcome, EngineStats, MiningEngine, MiningStatus, SignupOutcome};
pub use error::EngineError;
