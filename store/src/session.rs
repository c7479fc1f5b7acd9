//! Session storage trait.

use crate::{StoreError, WalletRecord};
use adit_types::{SessionId, SessionStatus, Timestamp, TokenAmount, WalletAddress};
use serde::{Deserialize, Serialize};

/// One accrual period for one wallet, as stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: SessionId,
    pub wallet: WalletAddress,
    pub status: SessionStatus,
    /// Fixed at creation; every reward recomputation measures from here.
    pub started_at: Timestamp,
    /// Total session length in whole hours. Immutable.
    pub selected_hours: u32,
    /// Current accrual multiplier. May change while mining.
    pub multiplier: u32,
    pub multiplier_changed_at: Timestamp,
    /// Last computed reward snapshot. Recomputed on reads of a live session;
    /// frozen once the session is terminal.
    pub total_earned: TokenAmount,
    pub last_updated: Timestamp,
}

/// The caller-decided fields of a session about to be created.
/// The store fills in the id and the initial bookkeeping fields.
#[derive(Clone, Debug)]
pub struct NewSession {
    pub wallet: WalletAddress,
    pub started_at: Timestamp,
    pub selected_hours: u32,
    pub multiplier: u32,
}

impl NewSession {
    /// The stored form this request produces, given an allocated id:
    /// status `Mining`, zero earnings, both stamps at `started_at`.
    pub fn into_record(self, id: SessionId) -> SessionRecord {
        SessionRecord {
            id,
            wallet: self.wallet,
            status: SessionStatus::Mining,
            started_at: self.started_at,
            selected_hours: self.selected_hours,
            multiplier: self.multiplier,
            multiplier_changed_at: self.started_at,
            total_earned: TokenAmount::ZERO,
            last_updated: self.started_at,
        }
    }
}

/// Trait for session storage operations.
///
/// The single-active-session rule and the terminal-state rule live here:
/// backends enforce both inside one write transaction, so concurrent callers
/// cannot observe or produce intermediate states.
pub trait SessionStore {
    /// Allocate an id and insert a new `Mining` session.
    ///
    /// Fails with [`StoreError::Duplicate`] if the wallet already has a
    /// mining session; the check and the insert are atomic.
    fn create_session(&self, new: NewSession) -> Result<SessionRecord, StoreError>;

    fn get_session(&self, id: SessionId) -> Result<SessionRecord, StoreError>;

    /// The wallet's mining session, if it has one.
    fn active_session(&self, wallet: &WalletAddress) -> Result<Option<SessionRecord>, StoreError>;

    /// Sessions for a wallet, newest first, skipping `offset` and returning
    /// at most `limit`. Unknown wallets yield an empty list.
    fn sessions_for_wallet(
        &self,
        wallet: &WalletAddress,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<SessionRecord>, StoreError>;

    fn session_count(&self) -> Result<u64, StoreError>;

    /// Persist a recomputed earnings snapshot.
    ///
    /// Applies only while the stored record is still `Mining`; for a terminal
    /// record nothing is written and the stored record is returned unchanged.
    /// A status read must never resurrect a settled session.
    fn update_snapshot(
        &self,
        id: SessionId,
        total_earned: TokenAmount,
        at: Timestamp,
    ) -> Result<SessionRecord, StoreError>;

    /// Change the multiplier and persist the retroactively recomputed
    /// snapshot, atomically. Fails with [`StoreError::Conflict`] if the
    /// stored record is no longer `Mining`.
    fn update_multiplier(
        &self,
        id: SessionId,
        multiplier: u32,
        total_earned: TokenAmount,
        at: Timestamp,
    ) -> Result<SessionRecord, StoreError>;

    /// Finalize a session: verify the stored record is still `Mining`, write
    /// the terminal `session` record, drop the wallet's active-session entry,
    /// and credit `credit` (if any) to the wallet, all in one transaction.
    ///
    /// Returns the wallet record after the credit. Fails with
    /// [`StoreError::Conflict`] if another settlement won the race.
    fn settle_session(
        &self,
        session: &SessionRecord,
        credit: Option<TokenAmount>,
    ) -> Result<WalletRecord, StoreError>;
}
