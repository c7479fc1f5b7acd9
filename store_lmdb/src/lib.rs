//! LMDB storage backend for the adit mining backend.
//!
//! Implements all storage traits from `adit-store` using the `heed` LMDB
//! bindings. Every database lives in a single environment, so each
//! conditional operation (session create, multiplier change, settlement)
//! runs in one write transaction. LMDB's single-writer lock is what makes
//! the check-then-write sequences atomic.

pub mod config;
pub mod environment;
pub mod error;
pub mod session;
pub mod store;
pub mod wallet;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use store::LmdbStore;
