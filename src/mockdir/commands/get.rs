use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::LookupSource;
use crate::store::backend::StorageBackend;
use crate::store::mock_store::MockStore;

pub fn run<B: StorageBackend>(
    store: &MockStore<B>,
    service: &str,
    identity: &str,
) -> Result<CmdResult> {
    let lookup = store.get_with_source(service, identity)?;

    let mut result = CmdResult::default().with_paths(vec![lookup.path.clone()]);
    if lookup.source == LookupSource::Fallback {
        result.add_message(CmdMessage::warning(format!(
            "No mock for {}@{}; served {}",
            service,
            identity,
            lookup.path.display()
        )));
    }
    Ok(result.with_payload(lookup.payload, lookup.source))
}
