//! Abstract storage traits for the adit mining backend.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The rest of the codebase depends only on the traits.
//!
//! Conditional mutations (session create, snapshot update, multiplier change,
//! settlement) are trait methods rather than read-modify-write sequences, so
//! each backend can make them atomic in a single transaction.

pub mod config;
pub mod error;
pub mod memory;
pub mod session;
pub mod wallet;

pub use config::ConfigStore;
pub use error::StoreError;
pub use memory::MemoryStore;
pub use session::{NewSession, SessionRecord, SessionStore};
pub use wallet::{WalletRecord, WalletStore};

/// The full storage surface the engine requires from a backend.
pub trait MiningStore: WalletStore + SessionStore + ConfigStore + Send + Sync {}

impl<T: WalletStore + SessionStore + ConfigStore + Send + Sync> MiningStore for T {}
