//! Request and response bodies.
//!
//! Token amounts travel as decimal strings (raw u128 values do not survive
//! JSON numbers); timestamps are epoch seconds.

use adit_store::{SessionRecord, WalletRecord};
use adit_types::{DurationOption, MiningParams, MultiplierTier, TokenAmount};
use serde::{Deserialize, Serialize};

use crate::error::RpcError;

// ── Wallets ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub wallet_address: String,
}

#[derive(Debug, Serialize)]
pub struct WalletDto {
    pub wallet_address: String,
    pub total_tokens: String,
    pub created_at: u64,
}

impl From<&WalletRecord> for WalletDto {
    fn from(record: &WalletRecord) -> Self {
        Self {
            wallet_address: record.address.to_string(),
            total_tokens: record.total_tokens.to_decimal_string(),
            created_at: record.created_at.as_secs(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub wallet: WalletDto,
    pub is_new: bool,
}

// ── Sessions ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    pub wallet_address: String,
    pub hours: u32,
    #[serde(default = "default_multiplier")]
    pub multiplier: u32,
}

fn default_multiplier() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct UpgradeRequest {
    pub multiplier: u32,
}

#[derive(Debug, Serialize)]
pub struct SessionDto {
    pub session_id: u64,
    pub wallet_address: String,
    pub status: String,
    pub started_at: u64,
    pub selected_hours: u32,
    pub multiplier: u32,
    pub multiplier_changed_at: u64,
    pub total_earned: String,
    pub last_updated: u64,
}

impl From<&SessionRecord> for SessionDto {
    fn from(record: &SessionRecord) -> Self {
        Self {
            session_id: record.id.as_u64(),
            wallet_address: record.wallet.to_string(),
            status: record.status.to_string(),
            started_at: record.started_at.as_secs(),
            selected_hours: record.selected_hours,
            multiplier: record.multiplier,
            multiplier_changed_at: record.multiplier_changed_at.as_secs(),
            total_earned: record.total_earned.to_decimal_string(),
            last_updated: record.last_updated.as_secs(),
        }
    }
}

/// `session` is `null` when the wallet is not mining.
#[derive(Debug, Serialize)]
pub struct ActiveSessionResponse {
    pub session: Option<SessionDto>,
}

#[derive(Debug, Serialize)]
pub struct SessionStatusResponse {
    pub session: SessionDto,
    pub elapsed_secs: u64,
    pub current_reward: String,
    pub complete: bool,
    pub remaining_secs: u64,
    pub can_claim: bool,
}

#[derive(Debug, Serialize)]
pub struct ClaimResponse {
    pub session: SessionDto,
    pub claimed: String,
    pub new_balance: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub sessions: Vec<SessionDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

// ── Parameters ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct ParamsDto {
    /// Tokens accrued per second at 1x, as a decimal string.
    pub base_rate: String,
    pub durations: Vec<DurationDto>,
    pub multipliers: Vec<MultiplierDto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DurationDto {
    pub hours: u32,
    pub label: String,
    pub seconds: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MultiplierDto {
    pub value: u32,
    pub label: String,
    pub requires_unlock: bool,
}

impl From<&MiningParams> for ParamsDto {
    fn from(params: &MiningParams) -> Self {
        Self {
            base_rate: params.base_rate.to_decimal_string(),
            durations: params
                .durations
                .iter()
                .map(|d| DurationDto {
                    hours: d.hours,
                    label: d.label.clone(),
                    seconds: d.seconds,
                })
                .collect(),
            multipliers: params
                .multipliers
                .iter()
                .map(|m| MultiplierDto {
                    value: m.value,
                    label: m.label.clone(),
                    requires_unlock: m.requires_unlock,
                })
                .collect(),
        }
    }
}

impl TryFrom<ParamsDto> for MiningParams {
    type Error = RpcError;

    fn try_from(dto: ParamsDto) -> Result<Self, RpcError> {
        let base_rate = TokenAmount::parse_decimal(&dto.base_rate)
            .map_err(|_| RpcError::InvalidRequest(format!("invalid base_rate: {}", dto.base_rate)))?;
        Ok(MiningParams {
            base_rate,
            durations: dto
                .durations
                .into_iter()
                .map(|d| DurationOption {
                    hours: d.hours,
                    label: d.label,
                    seconds: d.seconds,
                })
                .collect(),
            multipliers: dto
                .multipliers
                .into_iter()
                .map(|m| MultiplierTier {
                    value: m.value,
                    label: m.label,
                    requires_unlock: m.requires_unlock,
                })
                .collect(),
        })
    }
}

// ── Health ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub wallets: u64,
    pub sessions: u64,
}
