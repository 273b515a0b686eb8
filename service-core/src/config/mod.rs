use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;

/// Settings shared by every service: where the HTTP listeners bind.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Parse `host:port` for a listener offset from the base port.
    ///
    /// An offset on port 0 stays 0 so every listener gets an ephemeral port.
    pub fn socket_addr(&self, offset: u16) -> Result<std::net::SocketAddr, AppError> {
        let port = if self.port == 0 {
            0
        } else {
            self.port.checked_add(offset).ok_or_else(|| {
                AppError::ConfigError(anyhow::anyhow!(
                    "port {} + {} overflows",
                    self.port,
                    offset
                ))
            })?
        };

        format!("{}:{}", self.host, port).parse().map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!(
                "invalid listen address {}:{}: {}",
                self.host,
                port,
                e
            ))
        })
    }
}
