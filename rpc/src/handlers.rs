//! RPC request handlers.
//!
//! Thin adapters between HTTP and the engine: each handler stamps the
//! request with the current time, delegates, and maps records to DTOs.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use adit_types::{SessionId, Timestamp};

use crate::dto::{
    ActiveSessionResponse, ClaimResponse, HealthResponse, HistoryResponse, ParamsDto,
    SessionDto, SessionStatusResponse, SignupRequest, SignupResponse, StartSessionRequest,
    UpgradeRequest, WalletDto,
};
use crate::error::RpcError;
use crate::pagination::{self, PageQuery};
use crate::server::AppState;

// ── Health ───────────────────────────────────────────────────────────────

pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, RpcError> {
    let stats = state.engine.stats()?;
    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        wallets: stats.wallets,
        sessions: stats.sessions,
    }))
}

// ── Wallets ──────────────────────────────────────────────────────────────

pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<SignupResponse>, RpcError> {
    let outcome = state
        .engine
        .create_wallet(&req.wallet_address, Timestamp::now())?;
    Ok(Json(SignupResponse {
        wallet: WalletDto::from(&outcome.wallet),
        is_new: outcome.is_new,
    }))
}

pub async fn balance(
    State(state): State<AppState>,
    Path(wallet_address): Path<String>,
) -> Result<Json<WalletDto>, RpcError> {
    let wallet = state.engine.balance(&wallet_address)?;
    Ok(Json(WalletDto::from(&wallet)))
}

// ── Sessions ─────────────────────────────────────────────────────────────

pub async fn start_session(
    State(state): State<AppState>,
    Json(req): Json<StartSessionRequest>,
) -> Result<(StatusCode, Json<SessionDto>), RpcError> {
    let session = state.engine.start_session(
        &req.wallet_address,
        req.hours,
        req.multiplier,
        Timestamp::now(),
    )?;
    Ok((StatusCode::CREATED, Json(SessionDto::from(&session))))
}

pub async fn active_session(
    State(state): State<AppState>,
    Path(wallet_address): Path<String>,
) -> Result<Json<ActiveSessionResponse>, RpcError> {
    let session = state.engine.active_session(&wallet_address)?;
    Ok(Json(ActiveSessionResponse {
        session: session.as_ref().map(SessionDto::from),
    }))
}

pub async fn session_status(
    State(state): State<AppState>,
    Path(session_id): Path<u64>,
) -> Result<Json<SessionStatusResponse>, RpcError> {
    let status = state
        .engine
        .session_status(SessionId::new(session_id), Timestamp::now())?;
    Ok(Json(SessionStatusResponse {
        session: SessionDto::from(&status.session),
        elapsed_secs: status.elapsed_secs,
        current_reward: status.current_reward.to_decimal_string(),
        complete: status.complete,
        remaining_secs: status.remaining_secs,
        can_claim: status.can_claim,
    }))
}

/// The body carries no earnings; the server recomputes them from the clock.
pub async fn refresh_progress(
    State(state): State<AppState>,
    Path(session_id): Path<u64>,
) -> Result<Json<SessionDto>, RpcError> {
    let session = state
        .engine
        .refresh_progress(SessionId::new(session_id), Timestamp::now())?;
    Ok(Json(SessionDto::from(&session)))
}

pub async fn upgrade_multiplier(
    State(state): State<AppState>,
    Path(session_id): Path<u64>,
    Json(req): Json<UpgradeRequest>,
) -> Result<Json<SessionDto>, RpcError> {
    let session = state.engine.upgrade_multiplier(
        SessionId::new(session_id),
        req.multiplier,
        Timestamp::now(),
    )?;
    Ok(Json(SessionDto::from(&session)))
}

pub async fn claim_session(
    State(state): State<AppState>,
    Path(session_id): Path<u64>,
) -> Result<Json<ClaimResponse>, RpcError> {
    let outcome = state
        .engine
        .claim_session(SessionId::new(session_id), Timestamp::now())?;
    Ok(Json(ClaimResponse {
        session: SessionDto::from(&outcome.session),
        claimed: outcome.claimed.to_decimal_string(),
        new_balance: outcome.new_balance.to_decimal_string(),
    }))
}

pub async fn cancel_session(
    State(state): State<AppState>,
    Path(session_id): Path<u64>,
) -> Result<Json<SessionDto>, RpcError> {
    let session = state
        .engine
        .cancel_session(SessionId::new(session_id), Timestamp::now())?;
    Ok(Json(SessionDto::from(&session)))
}

pub async fn history(
    State(state): State<AppState>,
    Path(wallet_address): Path<String>,
    Query(page): Query<PageQuery>,
) -> Result<Json<HistoryResponse>, RpcError> {
    let offset = page.offset();
    let limit = page.limit();
    let sessions = state
        .engine
        .history(&wallet_address, offset as usize, limit as usize)?;
    let next_cursor = pagination::next_cursor(offset, sessions.len(), limit);
    Ok(Json(HistoryResponse {
        sessions: sessions.iter().map(SessionDto::from).collect(),
        next_cursor,
    }))
}

// ── Parameters ───────────────────────────────────────────────────────────

pub async fn get_params(State(state): State<AppState>) -> Result<Json<ParamsDto>, RpcError> {
    let params = state.engine.params()?;
    Ok(Json(ParamsDto::from(&params)))
}

pub async fn put_params(
    State(state): State<AppState>,
    Json(dto): Json<ParamsDto>,
) -> Result<Json<ParamsDto>, RpcError> {
    let params = state.engine.update_params(dto.try_into()?)?;
    Ok(Json(ParamsDto::from(&params)))
}
