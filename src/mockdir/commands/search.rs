use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::backend::StorageBackend;
use crate::store::mock_store::MockStore;

pub fn run<B: StorageBackend>(store: &MockStore<B>, term: &str) -> Result<CmdResult> {
    let paths = store.search(term)?;
    let mut result = CmdResult::default();
    if paths.is_empty() {
        result.add_message(CmdMessage::info(format!("No mock files match '{}'", term)));
    }
    Ok(result.with_paths(paths))
}
