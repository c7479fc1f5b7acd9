//! Validation errors for the fundamental types.

use thiserror::Error;

/// Errors produced while parsing or validating core types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid wallet address: {0:?}")]
    InvalidAddress(String),

    #[error("invalid token amount: {0}")]
    InvalidAmount(String),

    #[error("invalid mining parameters: {0}")]
    InvalidParams(String),
}
