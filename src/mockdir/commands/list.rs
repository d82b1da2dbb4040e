use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::backend::StorageBackend;
use crate::store::mock_store::MockStore;

pub fn run<B: StorageBackend>(store: &MockStore<B>, service: Option<&str>) -> Result<CmdResult> {
    let entries: Vec<_> = store
        .list()?
        .into_iter()
        .filter(|e| service.map_or(true, |s| e.key.service == s))
        .collect();

    let mut result = CmdResult::default();
    if entries.is_empty() {
        result.add_message(CmdMessage::info("No mocks recorded"));
    }
    Ok(result.with_entries(entries))
}
