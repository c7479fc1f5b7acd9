//! The LMDB-backed store handle.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use adit_types::{SessionId, WalletAddress};

use crate::environment::LmdbEnvironment;
use crate::LmdbError;

pub(crate) const NEXT_SESSION_ID_KEY: &[u8] = b"next_session_id";
pub(crate) const PARAMS_KEY: &[u8] = b"mining_params";

/// Implements every `adit-store` trait on top of one [`LmdbEnvironment`].
///
/// Cheap to share behind an `Arc`; heed database handles are copies into the
/// same memory map.
pub struct LmdbStore {
    pub(crate) env: LmdbEnvironment,
}

impl LmdbStore {
    /// Open or create the backing environment at `path`.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        Ok(Self {
            env: LmdbEnvironment::open(path, map_size)?,
        })
    }

    pub fn environment(&self) -> &LmdbEnvironment {
        &self.env
    }
}

pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, LmdbError> {
    Ok(bincode::serialize(value)?)
}

pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, LmdbError> {
    Ok(bincode::deserialize(bytes)?)
}

pub(crate) fn decode_u64(bytes: &[u8]) -> Result<u64, LmdbError> {
    bytes
        .try_into()
        .map(u64::from_be_bytes)
        .map_err(|_| LmdbError::Serialization("expected an 8-byte big-endian u64".into()))
}

/// Key into `session_index`: address bytes, one NUL, big-endian session id.
///
/// Valid addresses carry no control bytes, so the NUL keeps one wallet's
/// prefix from shadowing another's, and the big-endian id keeps each wallet's
/// entries in creation order.
pub(crate) fn index_key(wallet: &WalletAddress, id: SessionId) -> Vec<u8> {
    let mut key = wallet.as_str().as_bytes().to_vec();
    key.push(0);
    key.extend_from_slice(&id.to_be_bytes());
    key
}

/// The `session_index` prefix covering every session of one wallet.
pub(crate) fn index_prefix(wallet: &WalletAddress) -> Vec<u8> {
    let mut prefix = wallet.as_str().as_bytes().to_vec();
    prefix.push(0);
    prefix
}
