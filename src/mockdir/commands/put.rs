use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::MockKey;
use crate::store::backend::StorageBackend;
use crate::store::mock_store::MockStore;

pub fn run<B: StorageBackend>(
    store: &MockStore<B>,
    service: &str,
    identity: &str,
    payload: &[u8],
) -> Result<CmdResult> {
    let replacing = store.locate(service, identity)?.is_some();
    let path = store.put(service, identity, payload)?;
    let key = MockKey::new(service, identity)?;

    let mut result = CmdResult::default().with_paths(vec![path.clone()]);
    let verb = if replacing { "Replaced" } else { "Recorded" };
    result.add_message(CmdMessage::success(format!(
        "{} {} ({} bytes) at {}",
        verb,
        key,
        payload.len(),
        path.display()
    )));
    Ok(result)
}
