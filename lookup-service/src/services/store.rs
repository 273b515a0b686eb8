use crate::models::Region;
use async_trait::async_trait;
use serde_json::{Map, Value};
use service_core::error::AppError;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Read side of a region-bound document container.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch the document stored under `key`, `None` when absent.
    async fn read(&self, key: &str) -> Result<Option<Value>, AppError>;

    /// Cheap round-trip used by the readiness probe.
    async fn health_check(&self) -> Result<(), AppError>;

    /// Region whose replica this store reads from.
    fn region(&self) -> &Region;
}

/// In-process replica, seeded from a JSON object of `key -> document`.
pub struct MemoryDocumentStore {
    region: Region,
    documents: HashMap<String, Value>,
    failing_keys: HashSet<String>,
    unavailable: AtomicBool,
    reads: AtomicUsize,
}

impl MemoryDocumentStore {
    pub fn new(region: Region) -> Self {
        Self {
            region,
            documents: HashMap::new(),
            failing_keys: HashSet::new(),
            unavailable: AtomicBool::new(false),
            reads: AtomicUsize::new(0),
        }
    }

    pub fn from_documents(region: Region, documents: Map<String, Value>) -> Self {
        let mut store = Self::new(region);
        store.documents = documents.into_iter().collect();
        store
    }

    /// Load a seed file holding a single JSON object.
    pub async fn from_seed_file(region: Region, path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let raw = tokio::fs::read(path).await.map_err(|e| {
            tracing::error!("Failed to read seed file {}: {}", path.display(), e);
            AppError::from(e)
        })?;

        match serde_json::from_slice::<Value>(&raw)? {
            Value::Object(documents) => {
                tracing::info!(
                    region = %region,
                    documents = documents.len(),
                    "Seeded in-memory document store"
                );
                Ok(Self::from_documents(region, documents))
            }
            _ => Err(AppError::ConfigError(anyhow::anyhow!(
                "seed file {} must contain a JSON object",
                path.display()
            ))),
        }
    }

    pub fn with_document(mut self, key: impl Into<String>, document: Value) -> Self {
        self.documents.insert(key.into(), document);
        self
    }

    /// Make reads of `key` fail as a transient store error would.
    pub fn with_failing_key(mut self, key: impl Into<String>) -> Self {
        self.failing_keys.insert(key.into());
        self
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of `read` calls served so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn read(&self, key: &str) -> Result<Option<Value>, AppError> {
        self.reads.fetch_add(1, Ordering::SeqCst);

        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::ServiceUnavailable);
        }
        if self.failing_keys.contains(key) {
            return Err(AppError::DatabaseError(anyhow::anyhow!(
                "transient read failure for '{}' in {}",
                key,
                self.region
            )));
        }

        Ok(self.documents.get(key).cloned())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::ServiceUnavailable);
        }
        Ok(())
    }

    fn region(&self) -> &Region {
        &self.region
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn westus() -> Region {
        "westus".parse().unwrap()
    }

    #[tokio::test]
    async fn reads_present_and_absent_documents() {
        let store = MemoryDocumentStore::new(westus())
            .with_document("42", json!({"id": "42", "name": "Widget"}));

        assert_eq!(
            store.read("42").await.unwrap(),
            Some(json!({"id": "42", "name": "Widget"}))
        );
        assert_eq!(store.read("missing").await.unwrap(), None);
        assert_eq!(store.reads(), 2);
    }

    #[tokio::test]
    async fn failing_key_returns_error() {
        let store = MemoryDocumentStore::new(westus()).with_failing_key("99");
        assert!(store.read("99").await.is_err());
        assert!(store.read("100").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unavailable_store_fails_reads_and_health() {
        let store = MemoryDocumentStore::new(westus());
        assert!(store.health_check().await.is_ok());

        store.set_unavailable(true);
        assert!(store.health_check().await.is_err());
        assert!(store.read("42").await.is_err());

        store.set_unavailable(false);
        assert!(store.health_check().await.is_ok());
    }

    #[tokio::test]
    async fn seed_file_must_be_an_object() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("seed-array-{}.json", std::process::id()));
        tokio::fs::write(&path, b"[1, 2, 3]").await.unwrap();

        let result = MemoryDocumentStore::from_seed_file(westus(), &path).await;
        assert!(matches!(result, Err(AppError::ConfigError(_))));

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn seed_file_loads_documents() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("seed-object-{}.json", std::process::id()));
        tokio::fs::write(&path, br#"{"42": {"id": "42"}}"#).await.unwrap();

        let store = MemoryDocumentStore::from_seed_file(westus(), &path)
            .await
            .unwrap();
        assert_eq!(store.read("42").await.unwrap(), Some(json!({"id": "42"})));
        assert_eq!(store.region().as_str(), "westus");

        let _ = tokio::fs::remove_file(&path).await;
    }
}
