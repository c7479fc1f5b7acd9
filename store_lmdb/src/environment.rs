//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};
use tracing::info;

use crate::LmdbError;

const MAX_DBS: u32 = 8;

const SCHEMA_VERSION_KEY: &[u8] = b"schema_version";

/// Wraps the LMDB environment and all database handles.
///
/// Databases:
/// - `wallets`: address bytes -> bincode [`WalletRecord`](adit_store::WalletRecord)
/// - `sessions`: session id (big-endian u64) -> bincode [`SessionRecord`](adit_store::SessionRecord)
/// - `active_sessions`: address bytes -> session id (big-endian u64)
/// - `session_index`: address bytes, NUL, session id (big-endian u64) -> empty
/// - `config`: fixed key -> bincode [`MiningParams`](adit_types::MiningParams)
/// - `meta`: schema version, session id counter
pub struct LmdbEnvironment {
    env: Arc<Env>,
    pub(crate) wallets_db: Database<Bytes, Bytes>,
    pub(crate) sessions_db: Database<Bytes, Bytes>,
    pub(crate) active_db: Database<Bytes, Bytes>,
    pub(crate) index_db: Database<Bytes, Bytes>,
    pub(crate) config_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// On-disk schema version. Bumped when key layouts or record encodings
    /// change; an environment stamped with a different version refuses to open.
    pub const SCHEMA_VERSION: u32 = 1;

    /// Open or create an LMDB environment at the given path.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)?
        };
        let env = Arc::new(env);

        let mut wtxn = env.write_txn()?;
        let wallets_db = env.create_database(&mut wtxn, Some("wallets"))?;
        let sessions_db = env.create_database(&mut wtxn, Some("sessions"))?;
        let active_db = env.create_database(&mut wtxn, Some("active_sessions"))?;
        let index_db = env.create_database(&mut wtxn, Some("session_index"))?;
        let config_db = env.create_database(&mut wtxn, Some("config"))?;
        let meta_db: Database<Bytes, Bytes> = env.create_database(&mut wtxn, Some("meta"))?;

        // Stamp fresh environments; refuse anything stamped differently.
        match meta_db.get(&wtxn, SCHEMA_VERSION_KEY)? {
            None => {
                meta_db.put(&mut wtxn, SCHEMA_VERSION_KEY, &Self::SCHEMA_VERSION.to_le_bytes())?;
            }
            Some(bytes) => {
                let found = bytes
                    .try_into()
                    .map(u32::from_le_bytes)
                    .map_err(|_| {
                        LmdbError::Serialization("schema_version has unexpected byte length".into())
                    })?;
                if found != Self::SCHEMA_VERSION {
                    return Err(LmdbError::SchemaMismatch {
                        found,
                        expected: Self::SCHEMA_VERSION,
                    });
                }
            }
        }
        wtxn.commit()?;

        info!(path = %path.display(), schema = Self::SCHEMA_VERSION, "opened LMDB environment");

        Ok(Self {
            env,
            wallets_db,
            sessions_db,
            active_db,
            index_db,
            config_db,
            meta_db,
        })
    }

    /// Access the raw heed environment.
    pub fn env(&self) -> &Arc<Env> {
        &self.env
    }
}
