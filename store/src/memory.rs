//! Thread-safe in-memory backend, for tests and ephemeral runs.

use crate::config::ConfigStore;
use crate::session::{NewSession, SessionRecord, SessionStore};
use crate::wallet::{WalletRecord, WalletStore};
use crate::StoreError;
use adit_types::{MiningParams, SessionId, Timestamp, TokenAmount, WalletAddress};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

/// An in-memory implementation of the storage traits.
///
/// All state sits behind one mutex, so every trait method is a single
/// critical section and the conditional-update contracts hold for free.
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    wallets: HashMap<String, WalletRecord>,
    sessions: BTreeMap<u64, SessionRecord>,
    /// wallet address -> id of its mining session
    active: HashMap<String, u64>,
    params: Option<MiningParams>,
    next_session_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_session_id: 1,
                ..Inner::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl WalletStore for MemoryStore {
    fn create_wallet(&self, record: &WalletRecord) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let key = record.address.as_str().to_string();
        if inner.wallets.contains_key(&key) {
            return Err(StoreError::Duplicate(key));
        }
        inner.wallets.insert(key, record.clone());
        Ok(())
    }

    fn get_wallet(&self, address: &WalletAddress) -> Result<WalletRecord, StoreError> {
        self.lock()
            .wallets
            .get(address.as_str())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(address.to_string()))
    }

    fn wallet_exists(&self, address: &WalletAddress) -> Result<bool, StoreError> {
        Ok(self.lock().wallets.contains_key(address.as_str()))
    }

    fn wallet_count(&self) -> Result<u64, StoreError> {
        Ok(self.lock().wallets.len() as u64)
    }
}

impl SessionStore for MemoryStore {
    fn create_session(&self, new: NewSession) -> Result<SessionRecord, StoreError> {
        let mut inner = self.lock();
        let wallet_key = new.wallet.as_str().to_string();
        if inner.active.contains_key(&wallet_key) {
            return Err(StoreError::Duplicate(wallet_key));
        }
        let id = SessionId::new(inner.next_session_id);
        inner.next_session_id += 1;
        let record = new.into_record(id);
        inner.sessions.insert(id.as_u64(), record.clone());
        inner.active.insert(wallet_key, id.as_u64());
        Ok(record)
    }

    fn get_session(&self, id: SessionId) -> Result<SessionRecord, StoreError> {
        self.lock()
            .sessions
            .get(&id.as_u64())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn active_session(&self, wallet: &WalletAddress) -> Result<Option<SessionRecord>, StoreError> {
        let inner = self.lock();
        Ok(inner
            .active
            .get(wallet.as_str())
            .and_then(|id| inner.sessions.get(id))
            .cloned())
    }

    fn sessions_for_wallet(
        &self,
        wallet: &WalletAddress,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<SessionRecord>, StoreError> {
        // Descending id = newest first.
        Ok(self
            .lock()
            .sessions
            .values()
            .rev()
            .filter(|s| s.wallet == *wallet)
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    fn session_count(&self) -> Result<u64, StoreError> {
        Ok(self.lock().sessions.len() as u64)
    }

    fn update_snapshot(
        &self,
        id: SessionId,
        total_earned: TokenAmount,
        at: Timestamp,
    ) -> Result<SessionRecord, StoreError> {
        let mut inner = self.lock();
        let session = inner
            .sessions
            .get_mut(&id.as_u64())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if session.status.is_active() {
            session.total_earned = total_earned;
            session.last_updated = at;
        }
        Ok(session.clone())
    }

    fn update_multiplier(
        &self,
        id: SessionId,
        multiplier: u32,
        total_earned: TokenAmount,
        at: Timestamp,
    ) -> Result<SessionRecord, StoreError> {
        let mut inner = self.lock();
        let session = inner
            .sessions
            .get_mut(&id.as_u64())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if !session.status.is_active() {
            return Err(StoreError::Conflict(format!(
                "session {id} is {}",
                session.status
            )));
        }
        session.multiplier = multiplier;
        session.multiplier_changed_at = at;
        session.total_earned = total_earned;
        session.last_updated = at;
        Ok(session.clone())
    }

    fn settle_session(
        &self,
        session: &SessionRecord,
        credit: Option<TokenAmount>,
    ) -> Result<WalletRecord, StoreError> {
        let mut inner = self.lock();
        let stored = inner
            .sessions
            .get(&session.id.as_u64())
            .ok_or_else(|| StoreError::NotFound(session.id.to_string()))?;
        if !stored.status.is_active() {
            return Err(StoreError::Conflict(format!(
                "session {} is {}",
                session.id, stored.status
            )));
        }
        let new_balance = {
            let wallet = inner
                .wallets
                .get(session.wallet.as_str())
                .ok_or_else(|| StoreError::NotFound(session.wallet.to_string()))?;
            match credit {
                Some(amount) => wallet
                    .total_tokens
                    .checked_add(amount)
                    .ok_or_else(|| {
                        StoreError::Corruption(format!(
                            "balance overflow for {}",
                            session.wallet
                        ))
                    })?,
                None => wallet.total_tokens,
            }
        };
        inner
            .sessions
            .insert(session.id.as_u64(), session.clone());
        inner.active.remove(session.wallet.as_str());
        let wallet = inner
            .wallets
            .get_mut(session.wallet.as_str())
            .ok_or_else(|| StoreError::NotFound(session.wallet.to_string()))?;
        wallet.total_tokens = new_balance;
        Ok(wallet.clone())
    }
}

impl ConfigStore for MemoryStore {
    fn get_params(&self) -> Result<Option<MiningParams>, StoreError> {
        Ok(self.lock().params.clone())
    }

    fn put_params(&self, params: &MiningParams) -> Result<(), StoreError> {
        self.lock().params = Some(params.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adit_types::SessionStatus;

    fn test_address(n: u32) -> WalletAddress {
        WalletAddress::new(format!("wallet_{n}"))
    }

    fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .create_wallet(&WalletRecord::new(test_address(1), Timestamp::new(1000)))
            .unwrap();
        store
    }

    fn new_session(n: u32) -> NewSession {
        NewSession {
            wallet: test_address(n),
            started_at: Timestamp::new(1000),
            selected_hours: 4,
            multiplier: 1,
        }
    }

    #[test]
    fn wallet_create_and_get() {
        let store = seeded_store();
        let wallet = store.get_wallet(&test_address(1)).unwrap();
        assert_eq!(wallet.total_tokens, TokenAmount::ZERO);
        assert!(store.wallet_exists(&test_address(1)).unwrap());
        assert!(!store.wallet_exists(&test_address(2)).unwrap());
        assert!(matches!(
            store.create_wallet(&WalletRecord::new(test_address(1), Timestamp::new(2000))),
            Err(StoreError::Duplicate(_))
        ));
    }

    #[test]
    fn session_ids_are_sequential() {
        let store = seeded_store();
        store
            .create_wallet(&WalletRecord::new(test_address(2), Timestamp::new(1000)))
            .unwrap();
        let a = store.create_session(new_session(1)).unwrap();
        let b = store.create_session(new_session(2)).unwrap();
        assert_eq!(a.id, SessionId::new(1));
        assert_eq!(b.id, SessionId::new(2));
    }

    #[test]
    fn second_active_session_rejected() {
        let store = seeded_store();
        store.create_session(new_session(1)).unwrap();
        assert!(matches!(
            store.create_session(new_session(1)),
            Err(StoreError::Duplicate(_))
        ));
    }

    #[test]
    fn settle_credits_wallet_and_clears_active() {
        let store = seeded_store();
        let session = store.create_session(new_session(1)).unwrap();

        let mut claimed = session.clone();
        claimed.status = SessionStatus::Claimed;
        claimed.total_earned = TokenAmount::from_tokens(5);
        let wallet = store
            .settle_session(&claimed, Some(TokenAmount::from_tokens(5)))
            .unwrap();

        assert_eq!(wallet.total_tokens, TokenAmount::from_tokens(5));
        assert!(store.active_session(&test_address(1)).unwrap().is_none());
        assert_eq!(
            store.get_session(session.id).unwrap().status,
            SessionStatus::Claimed
        );
    }

    #[test]
    fn settle_conflicts_once_terminal() {
        let store = seeded_store();
        let session = store.create_session(new_session(1)).unwrap();

        let mut cancelled = session.clone();
        cancelled.status = SessionStatus::Cancelled;
        store.settle_session(&cancelled, None).unwrap();

        let mut claimed = session.clone();
        claimed.status = SessionStatus::Claimed;
        assert!(matches!(
            store.settle_session(&claimed, Some(TokenAmount::from_tokens(1))),
            Err(StoreError::Conflict(_))
        ));
        // The losing settlement must not have credited anything.
        let wallet = store.get_wallet(&test_address(1)).unwrap();
        assert_eq!(wallet.total_tokens, TokenAmount::ZERO);
    }

    #[test]
    fn snapshot_update_is_guarded() {
        let store = seeded_store();
        let session = store.create_session(new_session(1)).unwrap();

        let updated = store
            .update_snapshot(session.id, TokenAmount::from_tokens(2), Timestamp::new(1100))
            .unwrap();
        assert_eq!(updated.total_earned, TokenAmount::from_tokens(2));

        let mut cancelled = updated.clone();
        cancelled.status = SessionStatus::Cancelled;
        store.settle_session(&cancelled, None).unwrap();

        // Terminal record: snapshot write is a no-op.
        let after = store
            .update_snapshot(session.id, TokenAmount::from_tokens(9), Timestamp::new(1200))
            .unwrap();
        assert_eq!(after.total_earned, TokenAmount::from_tokens(2));
        assert_eq!(after.status, SessionStatus::Cancelled);
    }

    #[test]
    fn multiplier_update_requires_mining() {
        let store = seeded_store();
        let session = store.create_session(new_session(1)).unwrap();

        let upgraded = store
            .update_multiplier(session.id, 3, TokenAmount::from_tokens(1), Timestamp::new(1060))
            .unwrap();
        assert_eq!(upgraded.multiplier, 3);
        assert_eq!(upgraded.multiplier_changed_at, Timestamp::new(1060));

        let mut claimed = upgraded.clone();
        claimed.status = SessionStatus::Claimed;
        store.settle_session(&claimed, None).unwrap();
        assert!(matches!(
            store.update_multiplier(session.id, 4, TokenAmount::ZERO, Timestamp::new(1070)),
            Err(StoreError::Conflict(_))
        ));
    }

    #[test]
    fn history_is_newest_first() {
        let store = seeded_store();
        for _ in 0..3 {
            let session = store.create_session(new_session(1)).unwrap();
            let mut done = session.clone();
            done.status = SessionStatus::Cancelled;
            store.settle_session(&done, None).unwrap();
        }
        let history = store.sessions_for_wallet(&test_address(1), 0, 10).unwrap();
        let ids: Vec<u64> = history.iter().map(|s| s.id.as_u64()).collect();
        assert_eq!(ids, vec![3, 2, 1]);

        let paged = store.sessions_for_wallet(&test_address(1), 1, 1).unwrap();
        assert_eq!(paged.len(), 1);
        assert_eq!(paged[0].id.as_u64(), 2);
    }

    #[test]
    fn params_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.get_params().unwrap().is_none());
        let params = MiningParams::adit_defaults();
        store.put_params(&params).unwrap();
        assert_eq!(store.get_params().unwrap(), Some(params));
    }
}
