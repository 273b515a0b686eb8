use crate::models::{is_truthy, LookupOutcome, Region, PING_KEY};
use crate::services::metrics::{record_lookup, record_store_error};
use crate::services::store::DocumentStore;
use std::sync::Arc;

/// Lookup handler bound to one region's replica.
///
/// Stateless apart from the shared store client, so one instance serves all
/// concurrent requests for its region.
#[derive(Clone)]
pub struct RegionalHandler {
    region: Region,
    store: Arc<dyn DocumentStore>,
}

impl RegionalHandler {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            region: store.region().clone(),
            store,
        }
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Resolve `key`. Never fails: store errors collapse into
    /// [`LookupOutcome::AbsentOrError`].
    pub async fn lookup(&self, key: &str) -> LookupOutcome {
        let outcome = self.resolve(key).await;
        record_lookup(&self.region, &outcome);
        outcome
    }

    async fn resolve(&self, key: &str) -> LookupOutcome {
        if key == PING_KEY {
            return LookupOutcome::PingAck;
        }

        match self.store.read(key).await {
            Ok(Some(document)) if is_truthy(&document) => LookupOutcome::Found(document),
            Ok(_) => {
                tracing::debug!(region = %self.region, key = %key, "Document not found");
                LookupOutcome::AbsentOrError {
                    key: key.to_string(),
                }
            }
            Err(e) => {
                record_store_error(&self.region);
                tracing::warn!(region = %self.region, key = %key, error = %e, "Document read failed");
                LookupOutcome::AbsentOrError {
                    key: key.to_string(),
                }
            }
        }
    }
}
