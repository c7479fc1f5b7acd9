//! LMDB implementation of ConfigStore.

use adit_store::config::ConfigStore;
use adit_store::StoreError;
use adit_types::MiningParams;

use crate::store::{decode, encode, LmdbStore, PARAMS_KEY};
use crate::LmdbError;

impl ConfigStore for LmdbStore {
    fn get_params(&self) -> Result<Option<MiningParams>, StoreError> {
        let rtxn = self.env.env().read_txn().map_err(LmdbError::from)?;
        match self
            .env
            .config_db
            .get(&rtxn, PARAMS_KEY)
            .map_err(LmdbError::from)?
        {
            Some(bytes) => Ok(Some(decode(bytes)?)),
            None => Ok(None),
        }
    }

    fn put_params(&self, params: &MiningParams) -> Result<(), StoreError> {
        let bytes = encode(params)?;
        let mut wtxn = self.env.env().write_txn().map_err(LmdbError::from)?;
        self.env
            .config_db
            .put(&mut wtxn, PARAMS_KEY, &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}
