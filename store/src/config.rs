//! Mining-parameters storage trait.

use crate::StoreError;
use adit_types::MiningParams;

/// Trait for the single mining-parameters record.
///
/// `get_params` returns `None` until the record has been seeded; read paths
/// never create it.
pub trait ConfigStore {
    fn get_params(&self) -> Result<Option<MiningParams>, StoreError>;
    fn put_params(&self, params: &MiningParams) -> Result<(), StoreError>;
}
