use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::backend::StorageBackend;
use crate::store::mock_store::MockStore;

/// Where a key is stored, or where it would be stored by the next `put`.
pub fn run<B: StorageBackend>(
    store: &MockStore<B>,
    service: &str,
    identity: &str,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let path = match store.locate(service, identity)? {
        Some(path) => path,
        None => {
            result.add_message(CmdMessage::info(format!(
                "{}@{} is not recorded yet",
                service, identity
            )));
            store.path_for(service, identity)?
        }
    };
    Ok(result.with_paths(vec![path]))
}
