//! HTTP API for the adit mining backend.
//!
//! Provides endpoints for:
//! - Wallet signup and balance lookup
//! - The mining session lifecycle (start, status, progress, upgrade, claim, cancel)
//! - Session history with cursor pagination
//! - Mining parameter administration
//! - Service health

pub mod dto;
pub mod error;
pub mod handlers;
pub mod pagination;
pub mod server;

pub use error::RpcError;
pub use server::{build_router, RpcServer};
