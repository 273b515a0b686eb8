use async_trait::async_trait;
use lookup_service::config::{
    LookupConfig, StoreBackend, StoreConfig, DEFAULT_CONTAINER, DEFAULT_DATABASE,
};
use lookup_service::factory::{GlobalContext, HandlerFactory, StoreConnector};
use lookup_service::models::{Region, RegionList};
use lookup_service::services::{DocumentStore, MemoryDocumentStore};
use lookup_service::startup::{Application, SERVICE_NAME};
use secrecy::Secret;
use service_core::config::Config as CoreConfig;
use service_core::error::AppError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Builds identically seeded in-memory replicas and keeps a handle to each so
/// tests can count reads or take a region offline.
#[derive(Default)]
pub struct SeededConnector {
    documents: serde_json::Map<String, serde_json::Value>,
    failing_keys: Vec<String>,
    stores: Mutex<HashMap<Region, Arc<MemoryDocumentStore>>>,
}

impl SeededConnector {
    pub fn new(documents: serde_json::Value) -> Self {
        Self {
            documents: documents.as_object().cloned().unwrap_or_default(),
            ..Default::default()
        }
    }

    pub fn failing(mut self, key: &str) -> Self {
        self.failing_keys.push(key.to_string());
        self
    }

    pub fn store(&self, region: &str) -> Arc<MemoryDocumentStore> {
        let region: Region = region.parse().unwrap();
        self.stores
            .lock()
            .unwrap()
            .get(&region)
            .cloned()
            .expect("store was never connected")
    }
}

#[async_trait]
impl StoreConnector for SeededConnector {
    async fn connect(
        &self,
        _context: &GlobalContext,
        region: &Region,
    ) -> Result<Arc<dyn DocumentStore>, AppError> {
        let mut store = MemoryDocumentStore::from_documents(region.clone(), self.documents.clone());
        for key in &self.failing_keys {
            store = store.with_failing_key(key.clone());
        }
        let store = Arc::new(store);
        self.stores
            .lock()
            .unwrap()
            .insert(region.clone(), store.clone());
        Ok(store)
    }
}

pub fn test_config(locations: &str) -> LookupConfig {
    LookupConfig {
        common: CoreConfig {
            host: "127.0.0.1".to_string(),
            port: 0, // Random port
        },
        locations: RegionList::parse(locations).expect("invalid test regions"),
        store: StoreConfig {
            backend: StoreBackend::Memory,
            uri: Secret::new(String::new()),
            database: DEFAULT_DATABASE.to_string(),
            container: DEFAULT_CONTAINER.to_string(),
            seed_path: None,
            timeout_secs: 1,
        },
        ops_port: 0,
        otlp_endpoint: None,
    }
}

pub struct TestApp {
    pub addresses: HashMap<String, String>,
    pub ops_address: String,
    pub connector: Arc<SeededConnector>,
}

impl TestApp {
    pub async fn spawn(locations: &str, connector: SeededConnector) -> Self {
        let config = test_config(locations);
        let connector = Arc::new(connector);
        let factory = HandlerFactory::with_connector(
            GlobalContext {
                store: config.store.clone(),
                app_name: SERVICE_NAME.to_string(),
            },
            connector.clone(),
        );

        let app = Application::build_with_factory(config.clone(), factory)
            .await
            .expect("Failed to build test application");

        let addresses = config
            .locations
            .iter()
            .map(|region| {
                let port = app.port_for(region).expect("region has no listener");
                (region.to_string(), format!("http://127.0.0.1:{}", port))
            })
            .collect();
        let ops_address = format!("http://127.0.0.1:{}", app.ops_port());

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the ops server to answer
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", ops_address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            addresses,
            ops_address,
            connector,
        }
    }

    pub fn address(&self, region: &str) -> &str {
        self.addresses
            .get(region)
            .map(String::as_str)
            .expect("unknown region")
    }

    pub async fn get(&self, region: &str, key: &str) -> reqwest::Response {
        reqwest::Client::new()
            .get(format!("{}/{}", self.address(region), key))
            .send()
            .await
            .expect("Failed to execute request")
    }
}
