use crate::models::LookupOutcome;
use crate::services::RegionalHandler;
use axum::extract::{Path, State};
use std::sync::Arc;

/// `GET /:key` on a regional listener.
pub async fn get_document(
    State(handler): State<Arc<RegionalHandler>>,
    Path(key): Path<String>,
) -> LookupOutcome {
    handler.lookup(&key).await
}
