//! Engine-specific errors.

use adit_store::StoreError;
use adit_types::{SessionId, SessionStatus, WalletAddress};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("wallet not found: {0}")]
    WalletNotFound(WalletAddress),

    #[error("session {0} not found")]
    SessionNotFound(SessionId),

    #[error("mining parameters are not configured")]
    ConfigNotFound,

    #[error("wallet {0} already has an active session")]
    ActiveSessionExists(WalletAddress),

    #[error("session {id} is {status}, not mining")]
    SessionNotActive {
        id: SessionId,
        status: SessionStatus,
    },

    #[error("invalid wallet address: {0:?}")]
    InvalidAddress(String),

    #[error("unknown session duration: {0} hours")]
    UnknownDuration(u32),

    #[error("unknown multiplier: {0}x")]
    UnknownMultiplier(u32),

    #[error("invalid mining parameters: {0}")]
    InvalidParams(String),

    #[error("arithmetic overflow in reward computation")]
    Overflow,

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}
