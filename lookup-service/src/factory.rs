use crate::config::{StoreBackend, StoreConfig};
use crate::deployment::endpoint_id;
use crate::models::{Region, RegionList};
use crate::services::{DocumentStore, MemoryDocumentStore, MongoDocumentStore, RegionalHandler};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use service_core::error::AppError;
use std::sync::Arc;

/// Settings shared by every region: account, database and container.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    pub store: StoreConfig,
    pub app_name: String,
}

/// Opens a store client for one region.
#[async_trait]
pub trait StoreConnector: Send + Sync {
    async fn connect(
        &self,
        context: &GlobalContext,
        region: &Region,
    ) -> Result<Arc<dyn DocumentStore>, AppError>;
}

/// Connects to whatever backend the configuration names.
pub struct BackendConnector;

#[async_trait]
impl StoreConnector for BackendConnector {
    async fn connect(
        &self,
        context: &GlobalContext,
        region: &Region,
    ) -> Result<Arc<dyn DocumentStore>, AppError> {
        let store = &context.store;
        match store.backend {
            StoreBackend::Mongodb => {
                let mongo = MongoDocumentStore::connect(
                    store.uri.expose_secret(),
                    &store.database,
                    &store.container,
                    region,
                    store.timeout(),
                    &context.app_name,
                )
                .await?;
                Ok(Arc::new(mongo))
            }
            StoreBackend::Memory => {
                let memory = match &store.seed_path {
                    Some(path) => MemoryDocumentStore::from_seed_file(region.clone(), path).await?,
                    None => MemoryDocumentStore::new(region.clone()),
                };
                Ok(Arc::new(memory))
            }
        }
    }
}

/// A handler bound to one region plus the id of its provisioned endpoint.
#[derive(Clone)]
pub struct RegionalEndpoint {
    pub id: String,
    pub region: Region,
    pub handler: Arc<RegionalHandler>,
}

pub struct HandlerFactory {
    context: GlobalContext,
    connector: Arc<dyn StoreConnector>,
}

impl HandlerFactory {
    pub fn new(context: GlobalContext) -> Self {
        Self::with_connector(context, Arc::new(BackendConnector))
    }

    pub fn with_connector(context: GlobalContext, connector: Arc<dyn StoreConnector>) -> Self {
        Self { context, connector }
    }

    pub fn context(&self) -> &GlobalContext {
        &self.context
    }

    /// Build the endpoint for `region`; its store prefers that region's replica.
    pub async fn build(&self, region: &Region) -> Result<RegionalEndpoint, AppError> {
        let store = self.connector.connect(&self.context, region).await?;
        if store.region() != region {
            return Err(AppError::InternalError(anyhow::anyhow!(
                "store for {} is bound to {}",
                region,
                store.region()
            )));
        }

        let endpoint = RegionalEndpoint {
            id: endpoint_id(region),
            region: region.clone(),
            handler: Arc::new(RegionalHandler::new(store)),
        };
        tracing::info!(endpoint = %endpoint.id, region = %region, "Regional handler ready");
        Ok(endpoint)
    }

    pub async fn build_all(&self, regions: &RegionList) -> Result<Vec<RegionalEndpoint>, AppError> {
        let mut endpoints = Vec::with_capacity(regions.len());
        for region in regions {
            endpoints.push(self.build(region).await?);
        }
        Ok(endpoints)
    }
}
