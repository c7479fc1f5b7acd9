//! LMDB implementation of WalletStore.

use adit_store::wallet::{WalletRecord, WalletStore};
use adit_store::StoreError;
use adit_types::WalletAddress;

use crate::store::{decode, encode, LmdbStore};
use crate::LmdbError;

impl WalletStore for LmdbStore {
    fn create_wallet(&self, record: &WalletRecord) -> Result<(), StoreError> {
        let key = record.address.as_str().as_bytes();
        let mut wtxn = self.env.env().write_txn().map_err(LmdbError::from)?;
        if self
            .env
            .wallets_db
            .get(&wtxn, key)
            .map_err(LmdbError::from)?
            .is_some()
        {
            return Err(StoreError::Duplicate(record.address.to_string()));
        }
        let bytes = encode(record)?;
        self.env
            .wallets_db
            .put(&mut wtxn, key, &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get_wallet(&self, address: &WalletAddress) -> Result<WalletRecord, StoreError> {
        let rtxn = self.env.env().read_txn().map_err(LmdbError::from)?;
        let bytes = self
            .env
            .wallets_db
            .get(&rtxn, address.as_str().as_bytes())
            .map_err(LmdbError::from)?
            .ok_or_else(|| StoreError::NotFound(address.to_string()))?;
        Ok(decode(bytes)?)
    }

    fn wallet_exists(&self, address: &WalletAddress) -> Result<bool, StoreError> {
        let rtxn = self.env.env().read_txn().map_err(LmdbError::from)?;
        Ok(self
            .env
            .wallets_db
            .get(&rtxn, address.as_str().as_bytes())
            .map_err(LmdbError::from)?
            .is_some())
    }

    fn wallet_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.env().read_txn().map_err(LmdbError::from)?;
        let count = self.env.wallets_db.len(&rtxn).map_err(LmdbError::from)?;
        Ok(count)
    }
}
