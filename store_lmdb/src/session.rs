//! LMDB implementation of SessionStore.
//!
//! Every conditional operation is one write transaction: the status check and
//! the writes it guards either all land or none do, and the single-writer lock
//! serialises racing callers.

use adit_store::session::{NewSession, SessionRecord, SessionStore};
use adit_store::wallet::WalletRecord;
use adit_store::StoreError;
use adit_types::{SessionId, Timestamp, TokenAmount, WalletAddress};

use crate::store::{
    decode, decode_u64, encode, index_key, index_prefix, LmdbStore, NEXT_SESSION_ID_KEY,
};
use crate::LmdbError;

impl SessionStore for LmdbStore {
    fn create_session(&self, new: NewSession) -> Result<SessionRecord, StoreError> {
        let wallet = new.wallet.clone();
        let wallet_key = wallet.as_str().as_bytes();

        let mut wtxn = self.env.env().write_txn().map_err(LmdbError::from)?;
        if self
            .env
            .active_db
            .get(&wtxn, wallet_key)
            .map_err(LmdbError::from)?
            .is_some()
        {
            return Err(StoreError::Duplicate(wallet.to_string()));
        }

        let next = match self
            .env
            .meta_db
            .get(&wtxn, NEXT_SESSION_ID_KEY)
            .map_err(LmdbError::from)?
        {
            Some(bytes) => decode_u64(bytes)?,
            None => 1,
        };
        self.env
            .meta_db
            .put(&mut wtxn, NEXT_SESSION_ID_KEY, &(next + 1).to_be_bytes())
            .map_err(LmdbError::from)?;

        let record = new.into_record(SessionId::new(next));
        let id_key = record.id.to_be_bytes();
        let bytes = encode(&record)?;
        self.env
            .sessions_db
            .put(&mut wtxn, &id_key, &bytes)
            .map_err(LmdbError::from)?;
        self.env
            .active_db
            .put(&mut wtxn, wallet_key, &id_key)
            .map_err(LmdbError::from)?;
        self.env
            .index_db
            .put(&mut wtxn, &index_key(&wallet, record.id), &[])
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(record)
    }

    fn get_session(&self, id: SessionId) -> Result<SessionRecord, StoreError> {
        let rtxn = self.env.env().read_txn().map_err(LmdbError::from)?;
        let bytes = self
            .env
            .sessions_db
            .get(&rtxn, &id.to_be_bytes())
            .map_err(LmdbError::from)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        Ok(decode(bytes)?)
    }

    fn active_session(&self, wallet: &WalletAddress) -> Result<Option<SessionRecord>, StoreError> {
        let rtxn = self.env.env().read_txn().map_err(LmdbError::from)?;
        let id_bytes = match self
            .env
            .active_db
            .get(&rtxn, wallet.as_str().as_bytes())
            .map_err(LmdbError::from)?
        {
            Some(bytes) => bytes,
            None => return Ok(None),
        };
        let bytes = self
            .env
            .sessions_db
            .get(&rtxn, id_bytes)
            .map_err(LmdbError::from)?
            .ok_or_else(|| {
                StoreError::Corruption(format!("active index of {wallet} points to a missing session"))
            })?;
        Ok(Some(decode(bytes)?))
    }

    fn sessions_for_wallet(
        &self,
        wallet: &WalletAddress,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<SessionRecord>, StoreError> {
        let rtxn = self.env.env().read_txn().map_err(LmdbError::from)?;
        let prefix = index_prefix(wallet);
        let mut sessions = Vec::new();
        let mut skipped = 0usize;
        // Reverse prefix scan: descending id, newest first.
        let iter = self
            .env
            .index_db
            .rev_prefix_iter(&rtxn, &prefix)
            .map_err(LmdbError::from)?;
        for result in iter {
            let (key, _) = result.map_err(LmdbError::from)?;
            if skipped < offset {
                skipped += 1;
                continue;
            }
            if sessions.len() >= limit {
                break;
            }
            let id_key = &key[prefix.len()..];
            let bytes = self
                .env
                .sessions_db
                .get(&rtxn, id_key)
                .map_err(LmdbError::from)?
                .ok_or_else(|| {
                    StoreError::Corruption(format!(
                        "session index of {wallet} points to a missing session"
                    ))
                })?;
            sessions.push(decode(bytes)?);
        }
        Ok(sessions)
    }

    fn session_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.env().read_txn().map_err(LmdbError::from)?;
        let count = self.env.sessions_db.len(&rtxn).map_err(LmdbError::from)?;
        Ok(count)
    }

    fn update_snapshot(
        &self,
        id: SessionId,
        total_earned: TokenAmount,
        at: Timestamp,
    ) -> Result<SessionRecord, StoreError> {
        let key = id.to_be_bytes();
        let mut wtxn = self.env.env().write_txn().map_err(LmdbError::from)?;
        let bytes = self
            .env
            .sessions_db
            .get(&wtxn, &key)
            .map_err(LmdbError::from)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let mut session: SessionRecord = decode(bytes)?;
        if !session.status.is_active() {
            // Terminal records are frozen; dropping the txn aborts it.
            return Ok(session);
        }
        session.total_earned = total_earned;
        session.last_updated = at;
        let bytes = encode(&session)?;
        self.env
            .sessions_db
            .put(&mut wtxn, &key, &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(session)
    }

    fn update_multiplier(
        &self,
        id: SessionId,
        multiplier: u32,
        total_earned: TokenAmount,
        at: Timestamp,
    ) -> Result<SessionRecord, StoreError> {
        let key = id.to_be_bytes();
        let mut wtxn = self.env.env().write_txn().map_err(LmdbError::from)?;
        let bytes = self
            .env
            .sessions_db
            .get(&wtxn, &key)
            .map_err(LmdbError::from)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let mut session: SessionRecord = decode(bytes)?;
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
        let bytes = encode(&session)?;
        self.env
            .sessions_db
            .put(&mut wtxn, &key, &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(session)
    }

    fn settle_session(
        &self,
        session: &SessionRecord,
        credit: Option<TokenAmount>,
    ) -> Result<WalletRecord, StoreError> {
        let id_key = session.id.to_be_bytes();
        let wallet_key = session.wallet.as_str().as_bytes();

        let mut wtxn = self.env.env().write_txn().map_err(LmdbError::from)?;
        let stored_bytes = self
            .env
            .sessions_db
            .get(&wtxn, &id_key)
            .map_err(LmdbError::from)?
            .ok_or_else(|| StoreError::NotFound(session.id.to_string()))?;
        let stored: SessionRecord = decode(stored_bytes)?;
        if !stored.status.is_active() {
            return Err(StoreError::Conflict(format!(
                "session {} is {}",
                session.id, stored.status
            )));
        }

        let wallet_bytes = self
            .env
            .wallets_db
            .get(&wtxn, wallet_key)
            .map_err(LmdbError::from)?
            .ok_or_else(|| StoreError::NotFound(session.wallet.to_string()))?;
        let mut wallet: WalletRecord = decode(wallet_bytes)?;
        if let Some(amount) = credit {
            wallet.total_tokens = wallet.total_tokens.checked_add(amount).ok_or_else(|| {
                StoreError::Corruption(format!("balance overflow for {}", session.wallet))
            })?;
        }

        let session_bytes = encode(session)?;
        self.env
            .sessions_db
            .put(&mut wtxn, &id_key, &session_bytes)
            .map_err(LmdbError::from)?;
        self.env
            .active_db
            .delete(&mut wtxn, wallet_key)
            .map_err(LmdbError::from)?;
        let wallet_bytes = encode(&wallet)?;
        self.env
            .wallets_db
            .put(&mut wtxn, wallet_key, &wallet_bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(wallet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adit_store::wallet::WalletStore;
    use adit_types::SessionStatus;

    /// Helper: open a store in a temporary directory.
    fn temp_store() -> (tempfile::TempDir, LmdbStore) {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let store = LmdbStore::open(dir.path(), 10 * 1024 * 1024).expect("failed to open store");
        (dir, store)
    }

    fn test_address(n: u32) -> WalletAddress {
        WalletAddress::new(format!("wallet_{n}"))
    }

    fn seed_wallet(store: &LmdbStore, n: u32) -> WalletAddress {
        let address = test_address(n);
        store
            .create_wallet(&WalletRecord::new(address.clone(), Timestamp::new(1000)))
            .expect("create_wallet");
        address
    }

    fn new_session(address: &WalletAddress) -> NewSession {
        NewSession {
            wallet: address.clone(),
            started_at: Timestamp::new(1000),
            selected_hours: 4,
            multiplier: 1,
        }
    }

    #[test]
    fn create_allocates_sequential_ids() {
        let (_dir, store) = temp_store();
        let a = seed_wallet(&store, 1);
        let b = seed_wallet(&store, 2);

        let first = store.create_session(new_session(&a)).expect("create");
        let second = store.create_session(new_session(&b)).expect("create");
        assert_eq!(first.id, SessionId::new(1));
        assert_eq!(second.id, SessionId::new(2));
        assert_eq!(first.status, SessionStatus::Mining);
        assert_eq!(first.total_earned, TokenAmount::ZERO);
    }

    #[test]
    fn second_active_session_rejected() {
        let (_dir, store) = temp_store();
        let address = seed_wallet(&store, 1);
        store.create_session(new_session(&address)).expect("create");
        assert!(matches!(
            store.create_session(new_session(&address)),
            Err(StoreError::Duplicate(_))
        ));
    }

    #[test]
    fn settle_claim_credits_and_clears_active() {
        let (_dir, store) = temp_store();
        let address = seed_wallet(&store, 1);
        let session = store.create_session(new_session(&address)).expect("create");

        let mut claimed = session.clone();
        claimed.status = SessionStatus::Claimed;
        claimed.total_earned = TokenAmount::from_tokens(7);
        let wallet = store
            .settle_session(&claimed, Some(TokenAmount::from_tokens(7)))
            .expect("settle");

        assert_eq!(wallet.total_tokens, TokenAmount::from_tokens(7));
        assert!(store.active_session(&address).expect("active").is_none());
        assert_eq!(
            store.get_session(session.id).expect("get").status,
            SessionStatus::Claimed
        );
        // Credit is durable, not just the returned copy.
        assert_eq!(
            store.get_wallet(&address).expect("get_wallet").total_tokens,
            TokenAmount::from_tokens(7)
        );
    }

    #[test]
    fn settle_loses_race_once_terminal() {
        let (_dir, store) = temp_store();
        let address = seed_wallet(&store, 1);
        let session = store.create_session(new_session(&address)).expect("create");

        let mut cancelled = session.clone();
        cancelled.status = SessionStatus::Cancelled;
        store.settle_session(&cancelled, None).expect("cancel");

        let mut claimed = session.clone();
        claimed.status = SessionStatus::Claimed;
        assert!(matches!(
            store.settle_session(&claimed, Some(TokenAmount::from_tokens(7))),
            Err(StoreError::Conflict(_))
        ));
        assert_eq!(
            store.get_wallet(&address).expect("get_wallet").total_tokens,
            TokenAmount::ZERO
        );
    }

    #[test]
    fn snapshot_update_freezes_terminal_records() {
        let (_dir, store) = temp_store();
        let address = seed_wallet(&store, 1);
        let session = store.create_session(new_session(&address)).expect("create");

        let updated = store
            .update_snapshot(session.id, TokenAmount::from_tokens(3), Timestamp::new(1100))
            .expect("update");
        assert_eq!(updated.total_earned, TokenAmount::from_tokens(3));
        assert_eq!(updated.last_updated, Timestamp::new(1100));

        let mut cancelled = updated.clone();
        cancelled.status = SessionStatus::Cancelled;
        store.settle_session(&cancelled, None).expect("cancel");

        let after = store
            .update_snapshot(session.id, TokenAmount::from_tokens(9), Timestamp::new(1200))
            .expect("update");
        assert_eq!(after.status, SessionStatus::Cancelled);
        assert_eq!(after.total_earned, TokenAmount::from_tokens(3));
    }

    #[test]
    fn multiplier_update_is_atomic_and_guarded() {
        let (_dir, store) = temp_store();
        let address = seed_wallet(&store, 1);
        let session = store.create_session(new_session(&address)).expect("create");

        let upgraded = store
            .update_multiplier(session.id, 3, TokenAmount::from_tokens(1), Timestamp::new(1060))
            .expect("upgrade");
        assert_eq!(upgraded.multiplier, 3);
        assert_eq!(upgraded.multiplier_changed_at, Timestamp::new(1060));
        assert_eq!(upgraded.total_earned, TokenAmount::from_tokens(1));

        let mut claimed = upgraded.clone();
        claimed.status = SessionStatus::Claimed;
        store.settle_session(&claimed, None).expect("settle");
        assert!(matches!(
            store.update_multiplier(session.id, 4, TokenAmount::ZERO, Timestamp::new(1070)),
            Err(StoreError::Conflict(_))
        ));
    }

    #[test]
    fn history_scans_newest_first_with_offset() {
        let (_dir, store) = temp_store();
        let address = seed_wallet(&store, 1);
        let other = seed_wallet(&store, 2);

        for _ in 0..3 {
            let session = store.create_session(new_session(&address)).expect("create");
            let mut done = session.clone();
            done.status = SessionStatus::Cancelled;
            store.settle_session(&done, None).expect("settle");
        }
        // A foreign session; must not leak into the first wallet's history.
        store.create_session(new_session(&other)).expect("create");

        let history = store
            .sessions_for_wallet(&address, 0, 10)
            .expect("history");
        let ids: Vec<u64> = history.iter().map(|s| s.id.as_u64()).collect();
        assert_eq!(ids, vec![3, 2, 1]);

        let paged = store.sessions_for_wallet(&address, 1, 1).expect("paged");
        assert_eq!(paged.len(), 1);
        assert_eq!(paged[0].id.as_u64(), 2);

        let empty = store
            .sessions_for_wallet(&test_address(9), 0, 10)
            .expect("unknown wallet");
        assert!(empty.is_empty());
    }

    #[test]
    fn id_counter_survives_reopen() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        {
            let store =
                LmdbStore::open(dir.path(), 10 * 1024 * 1024).expect("failed to open store");
            let address = seed_wallet(&store, 1);
            let session = store.create_session(new_session(&address)).expect("create");
            let mut done = session.clone();
            done.status = SessionStatus::Claimed;
            store.settle_session(&done, None).expect("settle");
        }
        let store = LmdbStore::open(dir.path(), 10 * 1024 * 1024).expect("failed to reopen");
        let address = test_address(1);
        let session = store.create_session(new_session(&address)).expect("create");
        assert_eq!(session.id, SessionId::new(2));
        assert_eq!(store.session_count().expect("count"), 2);
    }
}
