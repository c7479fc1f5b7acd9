use thiserror::Error;

#[derive(Debug, Error)]
pub enum LmdbError {
    #[error("LMDB error: {0}")]
    Heed(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("missing key: {0}")]
    NotFound(String),

    #[error("record encoding failed: {0}")]
    Serialization(String),

    #[error("schema version mismatch: found {found}, expected {expected}")]
    SchemaMismatch { found: u32, expected: u32 },
}

impl From<heed::Error> for LmdbError {
    fn from(e: heed::Error) -> Self {
        LmdbError::Heed(e.to_string())
    }
}

impl From<std::io::Error> for LmdbError {
    fn from(e: std::io::Error) -> Self {
        LmdbError::Io(e.to_string())
    }
}

impl From<bincode::Error> for LmdbError {
    fn from(e: bincode::Error) -> Self {
        LmdbError::Serialization(e.to_string())
    }
}

impl From<LmdbError> for adit_store::StoreError {
    fn from(e: LmdbError) -> Self {
        use adit_store::StoreError;
        match e {
            LmdbError::NotFound(key) => StoreError::NotFound(key),
            LmdbError::Serialization(msg) => StoreError::Serialization(msg),
            mismatch @ LmdbError::SchemaMismatch { .. } => {
                StoreError::Corruption(mismatch.to_string())
            }
            LmdbError::Heed(msg) | LmdbError::Io(msg) => StoreError::Backend(msg),
        }
    }
}
