//! Wallet storage trait.

use crate::StoreError;
use adit_types::{Timestamp, TokenAmount, WalletAddress};
use serde::{Deserialize, Serialize};

/// Per-wallet information.
///
/// `total_tokens` only ever grows, and only through session settlement
/// ([`SessionStore::settle_session`](crate::SessionStore::settle_session)).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletRecord {
    pub address: WalletAddress,
    /// Claimed token balance.
    pub total_tokens: TokenAmount,
    pub created_at: Timestamp,
}

impl WalletRecord {
    /// A fresh zero-balance wallet.
    pub fn new(address: WalletAddress, created_at: Timestamp) -> Self {
        Self {
            address,
            total_tokens: TokenAmount::ZERO,
            created_at,
        }
    }
}

/// Trait for wallet storage operations.
pub trait WalletStore {
    /// Insert a new wallet. Fails with [`StoreError::Duplicate`] if the
    /// address is already registered.
    fn create_wallet(&self, record: &WalletRecord) -> Result<(), StoreError>;

    fn get_wallet(&self, address: &WalletAddress) -> Result<WalletRecord, StoreError>;

    fn wallet_exists(&self, address: &WalletAddress) -> Result<bool, StoreError>;

    fn wallet_count(&self) -> Result<u64, StoreError>;
}
