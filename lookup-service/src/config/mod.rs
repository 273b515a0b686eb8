use crate::models::RegionList;
use secrecy::Secret;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

pub const DEFAULT_DATABASE: &str = "productsdb";
pub const DEFAULT_CONTAINER: &str = "products";

#[derive(Debug, Clone)]
pub struct LookupConfig {
    pub common: core_config::Config,
    pub locations: RegionList,
    pub store: StoreConfig,
    /// Port of the health/ready/metrics listener.
    pub ops_port: u16,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub uri: Secret<String>,
    pub database: String,
    pub container: String,
    pub seed_path: Option<String>,
    pub timeout_secs: u64,
}

impl StoreConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Mongodb,
    Memory,
}

impl LookupConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let locations = RegionList::parse(&get_env("LOOKUP_LOCATIONS", Some("westus"), is_prod)?)
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!("LOOKUP_LOCATIONS: {}", e)))?;

        let backend: StoreBackend = get_env("STORE_BACKEND", Some("memory"), is_prod)?
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        let uri = match backend {
            StoreBackend::Mongodb => get_env("STORE_URI", None, is_prod)?,
            StoreBackend::Memory => env::var("STORE_URI").unwrap_or_default(),
        };

        let timeout_secs = get_env("STORE_TIMEOUT_SECS", Some("5"), is_prod)?
            .parse()
            .map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!("STORE_TIMEOUT_SECS: {}", e))
            })?;

        let ops_port = match env::var("OPS_PORT") {
            Ok(port) => port
                .parse()
                .map_err(|e| AppError::ConfigError(anyhow::anyhow!("OPS_PORT: {}", e)))?,
            Err(_) => default_ops_port(common.port),
        };

        Ok(LookupConfig {
            common,
            locations,
            store: StoreConfig {
                backend,
                uri: Secret::new(uri),
                database: get_env("STORE_DATABASE", Some(DEFAULT_DATABASE), is_prod)?,
                container: get_env("STORE_CONTAINER", Some(DEFAULT_CONTAINER), is_prod)?,
                seed_path: env::var("STORE_SEED_PATH").ok(),
                timeout_secs,
            },
            ops_port,
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok(),
        })
    }
}

/// Ops listener sits just below the regional ports; ephemeral when they are.
fn default_ops_port(base: u16) -> u16 {
    base.saturating_sub(1)
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(StoreBackend::Mongodb),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(format!("Invalid store backend: {}", s)),
        }
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required in production but not set",
                    key
                ))))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required but not set",
                    key
                ))))
            }
        }
    }
}
