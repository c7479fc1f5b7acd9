//! RPC error types and their HTTP status mapping.

use adit_engine::EngineError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("wallet not found: {0}")]
    WalletNotFound(String),

    #[error("session {0} not found")]
    SessionNotFound(u64),

    #[error("wallet {0} already has an active session")]
    ActiveSessionExists(String),

    #[error("session {id} is {status}, not mining")]
    SessionNotActive { id: u64, status: String },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("server error: {0}")]
    Server(String),

    #[error("store error: {0}")]
    Store(String),
}

impl RpcError {
    fn status_code(&self) -> StatusCode {
        match self {
            RpcError::WalletNotFound(_) | RpcError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            RpcError::ActiveSessionExists(_) | RpcError::SessionNotActive { .. } => {
                StatusCode::CONFLICT
            }
            RpcError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RpcError::Server(_) | RpcError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(%status, error = %self, "request failed");
        }
        let body = Json(serde_json::json!({ "message": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<EngineError> for RpcError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::WalletNotFound(address) => RpcError::WalletNotFound(address.to_string()),
            EngineError::SessionNotFound(id) => RpcError::SessionNotFound(id.as_u64()),
            EngineError::ActiveSessionExists(address) => {
                RpcError::ActiveSessionExists(address.to_string())
            }
            EngineError::SessionNotActive { id, status } => RpcError::SessionNotActive {
                id: id.as_u64(),
                status: status.to_string(),
            },
            EngineError::InvalidAddress(_)
            | EngineError::UnknownDuration(_)
            | EngineError::UnknownMultiplier(_)
            | EngineError::InvalidParams(_) => RpcError::InvalidRequest(e.to_string()),
            // Parameters are seeded at startup; their absence is a
            // deployment fault.
            EngineError::ConfigNotFound | EngineError::Overflow => {
                RpcError::Server(e.to_string())
            }
            EngineError::Store(inner) => RpcError::Store(inner.to_string()),
        }
    }
}
