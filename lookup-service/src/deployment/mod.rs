//! Deployment plan: the cloud resources a multi-region rollout declares.
//!
//! The plan is descriptive only. Provisioning is done by external tooling,
//! which reads the serialized plan; this crate uses it to decide which
//! regional endpoints to bring up and logs it at startup.
//!
//! ```text
//! DeploymentPlan
//!   ├── ResourceGroup (primary region)
//!   ├── DocumentDatabase (one replica per region, failover by order)
//!   └── RegionalEndpoint × N (route `{key}`, app settings)
//! ```

use crate::models::{Region, RegionList, PING_KEY};
use serde::Serialize;
use std::collections::BTreeMap;

pub const RESOURCE_GROUP_NAME: &str = "cosmosfunc-rg";
pub const DATABASE_ACCOUNT_NAME: &str = "cosmosfunc-db";
pub const ENDPOINT_ROUTE: &str = "{key}";

/// Identifier of the endpoint provisioned for `region`.
pub fn endpoint_id(region: &Region) -> String {
    format!("GetUrl-{}", region)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceGroup {
    pub name: String,
    pub location: Region,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplicaLocation {
    pub location: Region,
    pub failover_priority: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentDatabase {
    pub account_name: String,
    pub database_name: String,
    pub container_name: String,
    pub replicas: Vec<ReplicaLocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointSpec {
    pub name: String,
    pub location: Region,
    pub route: String,
    /// Environment a regional instance of the lookup binary runs with.
    pub app_settings: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeploymentPlan {
    pub resource_group: ResourceGroup,
    pub database: DocumentDatabase,
    pub endpoints: Vec<EndpointSpec>,
    /// Path an external traffic manager probes on every endpoint.
    pub probe_path: String,
}

impl DeploymentPlan {
    pub fn new(locations: &RegionList, database_name: &str, container_name: &str) -> Self {
        let primary = locations.primary().clone();

        let replicas = locations
            .iter()
            .enumerate()
            .map(|(priority, location)| ReplicaLocation {
                location: location.clone(),
                failover_priority: priority,
            })
            .collect();

        let endpoints = locations
            .iter()
            .map(|location| EndpointSpec {
                name: endpoint_id(location),
                location: location.clone(),
                route: ENDPOINT_ROUTE.to_string(),
                app_settings: BTreeMap::from([
                    ("LOOKUP_LOCATIONS".to_string(), location.to_string()),
                    ("STORE_BACKEND".to_string(), "mongodb".to_string()),
                    ("STORE_DATABASE".to_string(), database_name.to_string()),
                    ("STORE_CONTAINER".to_string(), container_name.to_string()),
                ]),
            })
            .collect();

        Self {
            resource_group: ResourceGroup {
                name: RESOURCE_GROUP_NAME.to_string(),
                location: primary,
            },
            database: DocumentDatabase {
                account_name: DATABASE_ACCOUNT_NAME.to_string(),
                database_name: database_name.to_string(),
                container_name: container_name.to_string(),
                replicas,
            },
            endpoints,
            probe_path: format!("/{}", PING_KEY),
        }
    }

    pub fn endpoint(&self, region: &Region) -> Option<&EndpointSpec> {
        self.endpoints.iter().find(|e| &e.location == region)
    }
}
