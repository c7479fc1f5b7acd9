//! Fundamental types for the adit mining backend.
//!
//! Everything the other workspace crates agree on lives here: wallet
//! addresses, token amounts, timestamps, session ids and states, and the
//! tunable mining parameters.

pub mod address;
pub mod amount;
pub mod error;
pub mod id;
pub mod params;
pub mod state;
pub mod time;

pub use address::WalletAddress;
pub use amount::{TokenAmount, TOKEN_UNIT};
pub use error::TypeError;
pub use id::SessionId;
pub use params::{DurationOption, MiningParams, MultiplierTier};
pub use state::SessionStatus;
pub use time::{Timestamp, SECS_PER_HOUR};
