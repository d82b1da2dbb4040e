use crate::commands::CmdResult;
use crate::error::Result;
use crate::store::backend::StorageBackend;
use crate::store::mock_store::MockStore;

/// The configuration the store was opened with.
pub fn run<B: StorageBackend>(store: &MockStore<B>) -> Result<CmdResult> {
    Ok(CmdResult::default().with_config(store.config().clone()))
}
