use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::backend::StorageBackend;
use crate::store::mock_store::MockStore;

pub fn run<B: StorageBackend>(store: &MockStore<B>) -> Result<CmdResult> {
    let status = store.status()?;
    let mut result = CmdResult::default();
    if status.at_capacity {
        result.add_message(CmdMessage::warning(format!(
            "{} has {} of {} directories; new identities go to overflow shards",
            status.root.display(),
            status.sub_dirs,
            status.max_entries
        )));
    }
    Ok(result.with_status(status))
}
