use crate::models::Region;
use crate::services::store::DocumentStore;
use async_trait::async_trait;
use mongodb::{
    bson::{doc, Bson, Document},
    options::{ClientOptions, ReadPreference, ReadPreferenceOptions, SelectionCriteria, TagSet},
    Client as MongoClient, Collection,
};
use serde_json::Value;
use service_core::error::AppError;
use std::time::Duration;

/// Replica-set tag that marks which region a member serves.
pub const REGION_TAG: &str = "region";

/// Read preference pinned to `region`'s replica.
///
/// The trailing empty tag set lets reads fall back to the nearest member when
/// no member carries the region tag.
pub fn region_read_preference(region: &Region) -> ReadPreference {
    let mut regional = TagSet::new();
    regional.insert(REGION_TAG.to_string(), region.to_string());

    ReadPreference::Nearest {
        options: ReadPreferenceOptions::builder()
            .tag_sets(vec![regional, TagSet::new()])
            .build(),
    }
}

/// MongoDB-backed document container read through one region's replica.
#[derive(Clone)]
pub struct MongoDocumentStore {
    client: MongoClient,
    collection: Collection<Document>,
    region: Region,
}

impl MongoDocumentStore {
    pub async fn connect(
        uri: &str,
        database: &str,
        container: &str,
        region: &Region,
        timeout: Duration,
        app_name: &str,
    ) -> Result<Self, AppError> {
        tracing::info!(region = %region, database = %database, container = %container, "Connecting to MongoDB");

        let mut client_options = ClientOptions::parse(uri).await.map_err(|e| {
            tracing::error!("Failed to parse MongoDB connection string: {}", e);
            AppError::from(e)
        })?;
        client_options.app_name = Some(format!("{}-{}", app_name, region));
        client_options.selection_criteria = Some(SelectionCriteria::ReadPreference(
            region_read_preference(region),
        ));
        client_options.connect_timeout = Some(timeout);
        client_options.server_selection_timeout = Some(timeout);

        let client = MongoClient::with_options(client_options).map_err(|e| {
            tracing::error!("Failed to create MongoDB client for {}: {}", region, e);
            AppError::from(e)
        })?;
        let collection = client.database(database).collection(container);

        Ok(Self {
            client,
            collection,
            region: region.clone(),
        })
    }
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    async fn read(&self, key: &str) -> Result<Option<Value>, AppError> {
        let found = self
            .collection
            .find_one(doc! { "_id": key }, None)
            .await
            .map_err(AppError::from)?;

        Ok(found.map(|document| Bson::Document(document).into_relaxed_extjson()))
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!(region = %self.region, "MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    fn region(&self) -> &Region {
        &self.region
    }
}
