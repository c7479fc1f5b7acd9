//! The session state machine and balance ledger.

use crate::error::EngineError;
use crate::reward;
use adit_store::{MiningStore, NewSession, SessionRecord, StoreError, WalletRecord};
use adit_types::{
    MiningParams, SessionId, SessionStatus, Timestamp, TokenAmount, TypeError, WalletAddress,
};
use std::sync::Arc;
use tracing::{debug, info};

/// The outcome of a signup call: the wallet and whether this call created it.
#[derive(Clone, Debug)]
pub struct SignupOutcome {
    pub wallet: WalletRecord,
    pub is_new: bool,
}

/// A session's progress at one instant.
///
/// `elapsed_secs` keeps counting past the session length; `current_reward`
/// does not, it is clamped to the full-duration payout.
#[derive(Clone, Debug)]
pub struct MiningStatus {
    pub session: SessionRecord,
    pub elapsed_secs: u64,
    pub current_reward: TokenAmount,
    pub complete: bool,
    pub remaining_secs: u64,
    pub can_claim: bool,
}

/// The outcome of a successful claim.
#[derive(Clone, Debug)]
pub struct ClaimOutcome {
    pub session: SessionRecord,
    pub claimed: TokenAmount,
    pub new_balance: TokenAmount,
}

/// Record counts, for liveness reporting.
#[derive(Clone, Copy, Debug)]
pub struct EngineStats {
    pub wallets: u64,
    pub sessions: u64,
}

/// The mining engine: wallet signup, the session lifecycle, and claim
/// settlement, over an abstract store.
///
/// Every operation that involves time takes an explicit `now`, so behavior is
/// a deterministic function of the arguments and the stored state. Parameters
/// are loaded from the store per operation and passed by value into the pure
/// arithmetic in [`reward`]; the engine keeps no state of its own.
pub struct MiningEngine {
    store: Arc<dyn MiningStore>,
}

impl MiningEngine {
    pub fn new(store: Arc<dyn MiningStore>) -> Self {
        Self { store }
    }

    // ── Wallets ──────────────────────────────────────────────────────────

    /// Register a wallet, idempotently. Signing up an existing address
    /// returns its record with `is_new = false`.
    pub fn create_wallet(
        &self,
        raw_address: &str,
        now: Timestamp,
    ) -> Result<SignupOutcome, EngineError> {
        let address = parse_address(raw_address)?;
        match self.store.get_wallet(&address) {
            Ok(wallet) => Ok(SignupOutcome {
                wallet,
                is_new: false,
            }),
            Err(StoreError::NotFound(_)) => {
                let record = WalletRecord::new(address.clone(), now);
                match self.store.create_wallet(&record) {
                    Ok(()) => {
                        info!(wallet = %address, "wallet created");
                        Ok(SignupOutcome {
                            wallet: record,
                            is_new: true,
                        })
                    }
                    // Lost a signup race; the winner's record is authoritative.
                    Err(StoreError::Duplicate(_)) => {
                        let wallet = self.load_wallet(&address)?;
                        Ok(SignupOutcome {
                            wallet,
                            is_new: false,
                        })
                    }
                    Err(e) => Err(e.into()),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Look up a wallet's claimed balance.
    pub fn balance(&self, raw_address: &str) -> Result<WalletRecord, EngineError> {
        let address = parse_address(raw_address)?;
        self.load_wallet(&address)
    }

    // ── Session lifecycle ────────────────────────────────────────────────

    /// Start a session for a wallet.
    ///
    /// The duration and multiplier must both appear in the configured menus,
    /// and the wallet must not already be mining.
    pub fn start_session(
        &self,
        raw_address: &str,
        hours: u32,
        multiplier: u32,
        now: Timestamp,
    ) -> Result<SessionRecord, EngineError> {
        let address = parse_address(raw_address)?;
        let params = self.params()?;
        if params.duration(hours).is_none() {
            return Err(EngineError::UnknownDuration(hours));
        }
        if params.multiplier(multiplier).is_none() {
            return Err(EngineError::UnknownMultiplier(multiplier));
        }
        if !self.store.wallet_exists(&address)? {
            return Err(EngineError::WalletNotFound(address));
        }
        let new = NewSession {
            wallet: address.clone(),
            started_at: now,
            selected_hours: hours,
            multiplier,
        };
        match self.store.create_session(new) {
            Ok(record) => {
                info!(
                    session = %record.id,
                    wallet = %address,
                    hours,
                    multiplier,
                    "session started"
                );
                Ok(record)
            }
            Err(StoreError::Duplicate(_)) => Err(EngineError::ActiveSessionExists(address)),
            Err(e) => Err(e.into()),
        }
    }

    /// The wallet's mining session, if any. `None` is a normal answer.
    pub fn active_session(
        &self,
        raw_address: &str,
    ) -> Result<Option<SessionRecord>, EngineError> {
        let address = parse_address(raw_address)?;
        Ok(self.store.active_session(&address)?)
    }

    /// Compute a session's progress at `now`.
    ///
    /// For a live session the recomputed earnings snapshot is persisted as a
    /// side effect, so the stored record stays within one poll of the truth.
    /// Terminal sessions are read-only and report their frozen earnings.
    pub fn session_status(
        &self,
        id: SessionId,
        now: Timestamp,
    ) -> Result<MiningStatus, EngineError> {
        let session = self.load_session(id)?;
        let session = if session.status.is_active() {
            let params = self.params()?;
            let earned = reward::capped_reward(
                params.base_rate,
                session.multiplier,
                session.started_at,
                session.selected_hours,
                now,
            )
            .ok_or(EngineError::Overflow)?;
            // If a settlement raced us this returns the terminal record
            // untouched, and we report that instead.
            self.store.update_snapshot(id, earned, now)?
        } else {
            session
        };

        let complete = reward::is_complete(session.started_at, session.selected_hours, now);
        let status = MiningStatus {
            elapsed_secs: reward::elapsed_secs(session.started_at, now),
            current_reward: session.total_earned,
            complete,
            remaining_secs: reward::remaining_secs(session.started_at, session.selected_hours, now),
            can_claim: complete && session.status.is_active(),
            session,
        };
        debug!(
            session = %status.session.id,
            elapsed = status.elapsed_secs,
            reward = %status.current_reward,
            "status computed"
        );
        Ok(status)
    }

    /// Recompute and persist a live session's earnings snapshot.
    ///
    /// The server is authoritative: callers cannot supply earnings, only ask
    /// for them to be brought up to date.
    pub fn refresh_progress(
        &self,
        id: SessionId,
        now: Timestamp,
    ) -> Result<SessionRecord, EngineError> {
        let session = self.load_session(id)?;
        if !session.status.is_active() {
            return Err(EngineError::SessionNotActive {
                id,
                status: session.status,
            });
        }
        let params = self.params()?;
        let earned = reward::capped_reward(
            params.base_rate,
            session.multiplier,
            session.started_at,
            session.selected_hours,
            now,
        )
        .ok_or(EngineError::Overflow)?;
        let updated = self.store.update_snapshot(id, earned, now)?;
        if updated.status.is_active() {
            Ok(updated)
        } else {
            Err(EngineError::SessionNotActive {
                id,
                status: updated.status,
            })
        }
    }

    /// Switch a live session to another configured multiplier.
    ///
    /// The new multiplier applies to the entire elapsed duration: the
    /// snapshot is recomputed from `started_at` at the new rate in the same
    /// store transaction. `started_at` never moves.
    pub fn upgrade_multiplier(
        &self,
        id: SessionId,
        multiplier: u32,
        now: Timestamp,
    ) -> Result<SessionRecord, EngineError> {
        let session = self.load_session(id)?;
        if !session.status.is_active() {
            return Err(EngineError::SessionNotActive {
                id,
                status: session.status,
            });
        }
        let params = self.params()?;
        if params.multiplier(multiplier).is_none() {
            return Err(EngineError::UnknownMultiplier(multiplier));
        }
        let earned = reward::capped_reward(
            params.base_rate,
            multiplier,
            session.started_at,
            session.selected_hours,
            now,
        )
        .ok_or(EngineError::Overflow)?;
        match self.store.update_multiplier(id, multiplier, earned, now) {
            Ok(updated) => {
                info!(session = %id, multiplier, "multiplier upgraded");
                Ok(updated)
            }
            Err(StoreError::Conflict(_)) => Err(self.not_active(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Abandon a live session. The accrued reward is forfeited; the last
    /// persisted snapshot stays on the record as the forfeited amount.
    pub fn cancel_session(
        &self,
        id: SessionId,
        now: Timestamp,
    ) -> Result<SessionRecord, EngineError> {
        let session = self.load_session(id)?;
        if !session.status.is_active() {
            return Err(EngineError::SessionNotActive {
                id,
                status: session.status,
            });
        }
        let mut cancelled = session;
        cancelled.status = SessionStatus::Cancelled;
        cancelled.last_updated = now;
        match self.store.settle_session(&cancelled, None) {
            Ok(_) => {
                info!(session = %id, wallet = %cancelled.wallet, "session cancelled");
                Ok(cancelled)
            }
            Err(StoreError::Conflict(_)) => Err(self.not_active(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Claim a live session: credit its reward and finalize it, atomically.
    ///
    /// Claiming early is allowed; the credited amount is the capped reward
    /// recomputed at `now`, never a stale snapshot. Exactly one of two racing
    /// claim/cancel calls settles the session; the other gets an error.
    pub fn claim_session(
        &self,
        id: SessionId,
        now: Timestamp,
    ) -> Result<ClaimOutcome, EngineError> {
        let session = self.load_session(id)?;
        if !session.status.is_active() {
            return Err(EngineError::SessionNotActive {
                id,
                status: session.status,
            });
        }
        let params = self.params()?;
        let earned = reward::capped_reward(
            params.base_rate,
            session.multiplier,
            session.started_at,
            session.selected_hours,
            now,
        )
        .ok_or(EngineError::Overflow)?;
        let mut claimed = session;
        claimed.status = SessionStatus::Claimed;
        claimed.total_earned = earned;
        claimed.last_updated = now;
        match self.store.settle_session(&claimed, Some(earned)) {
            Ok(wallet) => {
                info!(
                    session = %id,
                    wallet = %claimed.wallet,
                    amount = %earned,
                    "session claimed"
                );
                Ok(ClaimOutcome {
                    session: claimed,
                    claimed: earned,
                    new_balance: wallet.total_tokens,
                })
            }
            Err(StoreError::Conflict(_)) => Err(self.not_active(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// A wallet's sessions, newest first. Unknown wallets yield an empty list.
    pub fn history(
        &self,
        raw_address: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<SessionRecord>, EngineError> {
        let address = parse_address(raw_address)?;
        Ok(self.store.sessions_for_wallet(&address, offset, limit)?)
    }

    // ── Parameters ───────────────────────────────────────────────────────

    /// The configured mining parameters.
    pub fn params(&self) -> Result<MiningParams, EngineError> {
        self.store.get_params()?.ok_or(EngineError::ConfigNotFound)
    }

    /// Replace the mining parameters after structural validation.
    pub fn update_params(&self, params: MiningParams) -> Result<MiningParams, EngineError> {
        params.validate().map_err(|e| match e {
            TypeError::InvalidParams(msg) => EngineError::InvalidParams(msg),
            other => EngineError::InvalidParams(other.to_string()),
        })?;
        self.store.put_params(&params)?;
        info!("mining parameters replaced");
        Ok(params)
    }

    /// Write the default parameters if the record is absent.
    /// Returns whether this call seeded them.
    pub fn seed_default_params(&self) -> Result<bool, EngineError> {
        if self.store.get_params()?.is_some() {
            return Ok(false);
        }
        self.store.put_params(&MiningParams::adit_defaults())?;
        Ok(true)
    }

    /// Record counts, for liveness reporting.
    pub fn stats(&self) -> Result<EngineStats, EngineError> {
        Ok(EngineStats {
            wallets: self.store.wallet_count()?,
            sessions: self.store.session_count()?,
        })
    }

    // ── Helpers ──────────────────────────────────────────────────────────

    fn load_wallet(&self, address: &WalletAddress) -> Result<WalletRecord, EngineError> {
        match self.store.get_wallet(address) {
            Ok(wallet) => Ok(wallet),
            Err(StoreError::NotFound(_)) => Err(EngineError::WalletNotFound(address.clone())),
            Err(e) => Err(e.into()),
        }
    }

    fn load_session(&self, id: SessionId) -> Result<SessionRecord, EngineError> {
        match self.store.get_session(id) {
            Ok(session) => Ok(session),
            Err(StoreError::NotFound(_)) => Err(EngineError::SessionNotFound(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Build the `SessionNotActive` error for a session that lost a
    /// settlement race, re-reading the record for its terminal status.
    fn not_active(&self, id: SessionId) -> EngineError {
        match self.store.get_session(id) {
            Ok(stored) => EngineError::SessionNotActive {
                id,
                status: stored.status,
            },
            Err(StoreError::NotFound(_)) => EngineError::SessionNotFound(id),
            Err(e) => e.into(),
        }
    }
}

fn parse_address(raw: &str) -> Result<WalletAddress, EngineError> {
    WalletAddress::parse(raw).map_err(|_| EngineError::InvalidAddress(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use adit_store::MemoryStore;
    use adit_types::TOKEN_UNIT;

    fn test_timestamp(secs: u64) -> Timestamp {
        Timestamp::new(secs)
    }

    /// An engine over a fresh in-memory store with the default parameters.
    fn make_engine() -> MiningEngine {
        let store = Arc::new(MemoryStore::new());
        let engine = MiningEngine::new(store);
        engine.seed_default_params().unwrap();
        engine
    }

    fn tokens(s: &str) -> TokenAmount {
        TokenAmount::parse_decimal(s).unwrap()
    }

    #[test]
    fn signup_is_idempotent() {
        let engine = make_engine();
        let first = engine.create_wallet("miner_1", test_timestamp(1000)).unwrap();
        assert!(first.is_new);
        assert_eq!(first.wallet.total_tokens, TokenAmount::ZERO);

        let again = engine.create_wallet("miner_1", test_timestamp(2000)).unwrap();
        assert!(!again.is_new);
        assert_eq!(again.wallet.created_at, test_timestamp(1000));
    }

    #[test]
    fn signup_rejects_malformed_addresses() {
        let engine = make_engine();
        let result = engine.create_wallet("has space", test_timestamp(0));
        assert!(matches!(result, Err(EngineError::InvalidAddress(_))));
    }

    #[test]
    fn balance_of_unknown_wallet_is_not_found() {
        let engine = make_engine();
        assert!(matches!(
            engine.balance("ghost"),
            Err(EngineError::WalletNotFound(_))
        ));
    }

    #[test]
    fn start_validates_wallet_duration_and_multiplier() {
        let engine = make_engine();
        engine.create_wallet("miner_1", test_timestamp(0)).unwrap();

        assert!(matches!(
            engine.start_session("ghost", 1, 1, test_timestamp(10)),
            Err(EngineError::WalletNotFound(_))
        ));
        assert!(matches!(
            engine.start_session("miner_1", 3, 1, test_timestamp(10)),
            Err(EngineError::UnknownDuration(3))
        ));
        assert!(matches!(
            engine.start_session("miner_1", 1, 9, test_timestamp(10)),
            Err(EngineError::UnknownMultiplier(9))
        ));

        let session = engine
            .start_session("miner_1", 1, 2, test_timestamp(10))
            .unwrap();
        assert_eq!(session.status, SessionStatus::Mining);
        assert_eq!(session.started_at, test_timestamp(10));
        assert_eq!(session.multiplier_changed_at, test_timestamp(10));
        assert_eq!(session.total_earned, TokenAmount::ZERO);
    }

    #[test]
    fn one_active_session_per_wallet() {
        let engine = make_engine();
        engine.create_wallet("miner_1", test_timestamp(0)).unwrap();
        engine
            .start_session("miner_1", 1, 1, test_timestamp(10))
            .unwrap();
        assert!(matches!(
            engine.start_session("miner_1", 2, 1, test_timestamp(20)),
            Err(EngineError::ActiveSessionExists(_))
        ));
    }

    #[test]
    fn status_reports_capped_reward_and_uncapped_elapsed() {
        let engine = make_engine();
        engine.create_wallet("miner_1", test_timestamp(0)).unwrap();
        let session = engine
            .start_session("miner_1", 1, 2, test_timestamp(1000))
            .unwrap();

        // Mid-session: 1800 s × 0.01 × 2 = 36 tokens.
        let status = engine
            .session_status(session.id, test_timestamp(1000 + 1800))
            .unwrap();
        assert_eq!(status.current_reward, tokens("36"));
        assert!(!status.complete);
        assert!(!status.can_claim);
        assert_eq!(status.remaining_secs, 1800);

        // Exactly at the end: 72 tokens, claimable.
        let status = engine
            .session_status(session.id, test_timestamp(1000 + 3600))
            .unwrap();
        assert_eq!(status.current_reward, tokens("72"));
        assert!(status.complete);
        assert!(status.can_claim);
        assert_eq!(status.remaining_secs, 0);

        // Well past the end: elapsed keeps counting, the reward does not.
        let status = engine
            .session_status(session.id, test_timestamp(1000 + 5000))
            .unwrap();
        assert_eq!(status.elapsed_secs, 5000);
        assert_eq!(status.current_reward, tokens("72"));
    }

    #[test]
    fn status_persists_the_snapshot_for_live_sessions() {
        let store = Arc::new(MemoryStore::new());
        let engine = MiningEngine::new(store.clone());
        engine.seed_default_params().unwrap();

        engine.create_wallet("miner_1", test_timestamp(0)).unwrap();
        let session = engine
            .start_session("miner_1", 1, 1, test_timestamp(0))
            .unwrap();
        engine
            .session_status(session.id, test_timestamp(600))
            .unwrap();

        // Visible through a plain store read, not just the status response.
        use adit_store::SessionStore;
        let stored = store.get_session(session.id).unwrap();
        assert_eq!(stored.total_earned, tokens("6"));
        assert_eq!(stored.last_updated, test_timestamp(600));
    }

    #[test]
    fn upgrade_is_retroactive_from_session_start() {
        let engine = make_engine();
        engine.create_wallet("miner_1", test_timestamp(0)).unwrap();
        let session = engine
            .start_session("miner_1", 4, 1, test_timestamp(1000))
            .unwrap();

        // One minute in, upgrade to 3x: 0.01 × 3 × 60 = 1.8 tokens.
        let upgraded = engine
            .upgrade_multiplier(session.id, 3, test_timestamp(1060))
            .unwrap();
        assert_eq!(upgraded.multiplier, 3);
        assert_eq!(upgraded.total_earned, tokens("1.8"));
        assert_eq!(upgraded.started_at, test_timestamp(1000));
        assert_eq!(upgraded.multiplier_changed_at, test_timestamp(1060));

        let status = engine
            .session_status(session.id, test_timestamp(1060))
            .unwrap();
        assert_eq!(status.current_reward, tokens("1.8"));
    }

    #[test]
    fn upgrade_rejects_unknown_tiers() {
        let engine = make_engine();
        engine.create_wallet("miner_1", test_timestamp(0)).unwrap();
        let session = engine
            .start_session("miner_1", 4, 1, test_timestamp(0))
            .unwrap();
        assert!(matches!(
            engine.upgrade_multiplier(session.id, 7, test_timestamp(60)),
            Err(EngineError::UnknownMultiplier(7))
        ));
    }

    #[test]
    fn claim_credits_the_recomputed_reward() {
        let engine = make_engine();
        engine.create_wallet("miner_1", test_timestamp(0)).unwrap();
        let session = engine
            .start_session("miner_1", 1, 2, test_timestamp(0))
            .unwrap();

        let outcome = engine
            .claim_session(session.id, test_timestamp(4000))
            .unwrap();
        assert_eq!(outcome.claimed, tokens("72"));
        assert_eq!(outcome.new_balance, tokens("72"));
        assert_eq!(outcome.session.status, SessionStatus::Claimed);

        let wallet = engine.balance("miner_1").unwrap();
        assert_eq!(wallet.total_tokens, tokens("72"));
    }

    #[test]
    fn early_claim_pays_the_partial_reward() {
        let engine = make_engine();
        engine.create_wallet("miner_1", test_timestamp(0)).unwrap();
        let session = engine
            .start_session("miner_1", 1, 2, test_timestamp(0))
            .unwrap();

        let outcome = engine
            .claim_session(session.id, test_timestamp(1800))
            .unwrap();
        assert_eq!(outcome.claimed, tokens("36"));
        assert_eq!(outcome.new_balance, tokens("36"));
    }

    #[test]
    fn claim_ignores_stale_snapshots() {
        let engine = make_engine();
        engine.create_wallet("miner_1", test_timestamp(0)).unwrap();
        let session = engine
            .start_session("miner_1", 1, 1, test_timestamp(0))
            .unwrap();

        // Poll early so the stored snapshot lags behind the claim instant.
        engine.session_status(session.id, test_timestamp(60)).unwrap();
        let outcome = engine
            .claim_session(session.id, test_timestamp(600))
            .unwrap();
        assert_eq!(outcome.claimed, tokens("6"));
    }

    #[test]
    fn terminal_sessions_are_sticky() {
        let engine = make_engine();
        engine.create_wallet("miner_1", test_timestamp(0)).unwrap();
        let session = engine
            .start_session("miner_1", 1, 1, test_timestamp(0))
            .unwrap();
        engine.claim_session(session.id, test_timestamp(100)).unwrap();

        assert!(matches!(
            engine.claim_session(session.id, test_timestamp(200)),
            Err(EngineError::SessionNotActive {
                status: SessionStatus::Claimed,
                ..
            })
        ));
        assert!(matches!(
            engine.cancel_session(session.id, test_timestamp(200)),
            Err(EngineError::SessionNotActive { .. })
        ));
        assert!(matches!(
            engine.refresh_progress(session.id, test_timestamp(200)),
            Err(EngineError::SessionNotActive { .. })
        ));
    }

    #[test]
    fn status_of_a_terminal_session_is_frozen() {
        let engine = make_engine();
        engine.create_wallet("miner_1", test_timestamp(0)).unwrap();
        let session = engine
            .start_session("miner_1", 1, 1, test_timestamp(0))
            .unwrap();
        let outcome = engine.claim_session(session.id, test_timestamp(600)).unwrap();

        // Much later, the reported reward is still the claimed amount.
        let status = engine
            .session_status(session.id, test_timestamp(4000))
            .unwrap();
        assert_eq!(status.current_reward, outcome.claimed);
        assert_eq!(status.session.status, SessionStatus::Claimed);
        assert!(!status.can_claim);
        assert_eq!(status.session.last_updated, test_timestamp(600));
    }

    #[test]
    fn cancel_forfeits_without_crediting() {
        let engine = make_engine();
        engine.create_wallet("miner_1", test_timestamp(0)).unwrap();
        let session = engine
            .start_session("miner_1", 1, 1, test_timestamp(0))
            .unwrap();
        engine.session_status(session.id, test_timestamp(600)).unwrap();

        let cancelled = engine
            .cancel_session(session.id, test_timestamp(700))
            .unwrap();
        assert_eq!(cancelled.status, SessionStatus::Cancelled);
        // The forfeited amount stays on the record.
        assert_eq!(cancelled.total_earned, tokens("6"));

        let wallet = engine.balance("miner_1").unwrap();
        assert_eq!(wallet.total_tokens, TokenAmount::ZERO);

        // The wallet is free to start again.
        engine
            .start_session("miner_1", 2, 1, test_timestamp(800))
            .unwrap();
    }

    #[test]
    fn refresh_progress_is_server_authoritative() {
        let engine = make_engine();
        engine.create_wallet("miner_1", test_timestamp(0)).unwrap();
        let session = engine
            .start_session("miner_1", 1, 1, test_timestamp(0))
            .unwrap();

        let updated = engine
            .refresh_progress(session.id, test_timestamp(300))
            .unwrap();
        assert_eq!(updated.total_earned, tokens("3"));
        assert_eq!(updated.last_updated, test_timestamp(300));
    }

    #[test]
    fn history_is_newest_first_and_limited() {
        let engine = make_engine();
        engine.create_wallet("miner_1", test_timestamp(0)).unwrap();
        for i in 0..3u64 {
            let session = engine
                .start_session("miner_1", 1, 1, test_timestamp(i * 100))
                .unwrap();
            engine
                .cancel_session(session.id, test_timestamp(i * 100 + 50))
                .unwrap();
        }

        let history = engine.history("miner_1", 0, 2).unwrap();
        assert_eq!(history.len(), 2);
        assert!(history[0].id > history[1].id);

        let rest = engine.history("miner_1", 2, 2).unwrap();
        assert_eq!(rest.len(), 1);

        // Unknown wallets have empty history, not an error.
        assert!(engine.history("stranger", 0, 10).unwrap().is_empty());
    }

    #[test]
    fn unknown_session_is_not_found() {
        let engine = make_engine();
        assert!(matches!(
            engine.session_status(SessionId::new(42), test_timestamp(0)),
            Err(EngineError::SessionNotFound(_))
        ));
    }

    #[test]
    fn missing_params_surface_as_config_not_found() {
        let store = Arc::new(MemoryStore::new());
        let engine = MiningEngine::new(store);
        engine.create_wallet("miner_1", test_timestamp(0)).unwrap();
        assert!(matches!(
            engine.start_session("miner_1", 1, 1, test_timestamp(0)),
            Err(EngineError::ConfigNotFound)
        ));
        assert!(matches!(engine.params(), Err(EngineError::ConfigNotFound)));
    }

    #[test]
    fn params_seed_and_update() {
        let store = Arc::new(MemoryStore::new());
        let engine = MiningEngine::new(store);
        assert!(engine.seed_default_params().unwrap());
        assert!(!engine.seed_default_params().unwrap());

        let mut params = engine.params().unwrap();
        params.base_rate = TokenAmount::new(TOKEN_UNIT / 50);
        engine.update_params(params.clone()).unwrap();
        assert_eq!(engine.params().unwrap().base_rate, params.base_rate);

        params.durations.clear();
        assert!(matches!(
            engine.update_params(params),
            Err(EngineError::InvalidParams(_))
        ));
    }

    #[test]
    fn stats_counts_records() {
        let engine = make_engine();
        engine.create_wallet("miner_1", test_timestamp(0)).unwrap();
        engine.create_wallet("miner_2", test_timestamp(0)).unwrap();
        engine
            .start_session("miner_1", 1, 1, test_timestamp(0))
            .unwrap();
        let stats = engine.stats().unwrap();
        assert_eq!(stats.wallets, 2);
        assert_eq!(stats.sessions, 1);
    }
}
