//! Axum-based HTTP server.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tracing::info;

use adit_engine::MiningEngine;

use crate::error::RpcError;
use crate::handlers;

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<MiningEngine>,
}

/// Build the full API router. Exposed separately from [`RpcServer`] so tests
/// can drive it without binding a socket.
pub fn build_router(engine: Arc<MiningEngine>) -> Router {
    let auth = Router::new()
        .route("/signup", post(handlers::signup))
        .route("/balance/:wallet_address", get(handlers::balance));

    let mining = Router::new()
        .route("/start", post(handlers::start_session))
        .route("/active/:wallet_address", get(handlers::active_session))
        .route("/status/:session_id", get(handlers::session_status))
        .route("/progress/:session_id", put(handlers::refresh_progress))
        .route("/upgrade/:session_id", put(handlers::upgrade_multiplier))
        .route("/claim/:session_id", post(handlers::claim_session))
        .route("/cancel/:session_id", post(handlers::cancel_session))
        .route("/history/:wallet_address", get(handlers::history));

    Router::new()
        .route("/api/health", get(handlers::health))
        .nest("/api/auth", auth)
        .nest("/api/mining", mining)
        .route(
            "/api/config",
            get(handlers::get_params).put(handlers::put_params),
        )
        // The API serves a mobile web client from arbitrary origins.
        .layer(CorsLayer::permissive())
        .with_state(AppState { engine })
}

/// The HTTP server, bound to an address and backed by one engine.
pub struct RpcServer {
    addr: SocketAddr,
    engine: Arc<MiningEngine>,
}

impl RpcServer {
    pub fn new(addr: SocketAddr, engine: Arc<MiningEngine>) -> Self {
        Self { addr, engine }
    }

    /// Serve until `shutdown` resolves, then finish in-flight requests.
    pub async fn start(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), RpcError> {
        let app = build_router(self.engine);
        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .map_err(|e| RpcError::Server(format!("bind {}: {e}", self.addr)))?;
        info!("HTTP API listening on {}", self.addr);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| RpcError::Server(e.to_string()))?;
        Ok(())
    }
}
