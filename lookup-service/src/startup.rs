//! Application startup and lifecycle management.
//!
//! One HTTP listener per declared region serves `GET /:key` through that
//! region's handler; a separate operations listener serves health, readiness
//! and metrics so no lookup key is shadowed by an ops route.

use crate::config::LookupConfig;
use crate::deployment::DeploymentPlan;
use crate::factory::{GlobalContext, HandlerFactory, RegionalEndpoint};
use crate::handlers::{self, OpsState};
use crate::models::Region;
use crate::services::RegionalHandler;
use axum::{routing::get, Router};
use futures::future::{try_join_all, BoxFuture, FutureExt};
use service_core::config as core_config;
use service_core::error::AppError;
use service_core::middleware::with_http_layers;
use std::future::{Future, IntoFuture};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;

pub const SERVICE_NAME: &str = "lookup-service";

/// Router for one region's endpoint.
pub fn regional_router(handler: Arc<RegionalHandler>) -> Router {
    with_http_layers(Router::new().route("/:key", get(handlers::get_document))).with_state(handler)
}

pub fn ops_router(state: OpsState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .with_state(state)
}

struct RegionalListener {
    endpoint: RegionalEndpoint,
    listener: TcpListener,
    port: u16,
}

/// Application container for managing server lifecycle.
pub struct Application {
    plan: DeploymentPlan,
    regional: Vec<RegionalListener>,
    ops_listener: TcpListener,
    ops_port: u16,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: LookupConfig) -> Result<Self, AppError> {
        let factory = HandlerFactory::new(GlobalContext {
            store: config.store.clone(),
            app_name: SERVICE_NAME.to_string(),
        });
        Self::build_with_factory(config, factory).await
    }

    pub async fn build_with_factory(
        config: LookupConfig,
        factory: HandlerFactory,
    ) -> Result<Self, AppError> {
        let plan = DeploymentPlan::new(
            &config.locations,
            &config.store.database,
            &config.store.container,
        );
        tracing::info!(plan = %serde_json::to_string(&plan)?, "Deployment plan");

        let endpoints = factory.build_all(&config.locations).await.map_err(|e| {
            tracing::error!("Failed to build regional handlers: {}", e);
            e
        })?;

        let mut regional = Vec::with_capacity(endpoints.len());
        for (index, endpoint) in endpoints.into_iter().enumerate() {
            let offset = u16::try_from(index).map_err(|_| {
                AppError::ConfigError(anyhow::anyhow!("too many regions: {}", index + 1))
            })?;
            let addr = config.common.socket_addr(offset)?;
            let listener = TcpListener::bind(addr).await.map_err(|e| {
                tracing::error!("Failed to bind {} listener to {}: {}", endpoint.id, addr, e);
                AppError::from(e)
            })?;
            let port = listener.local_addr()?.port();
            tracing::info!(endpoint = %endpoint.id, region = %endpoint.region, "Listening on port {}", port);

            regional.push(RegionalListener {
                endpoint,
                listener,
                port,
            });
        }

        let ops_config = core_config::Config {
            host: config.common.host.clone(),
            port: config.ops_port,
        };
        let ops_addr = ops_config.socket_addr(0)?;
        let ops_listener = TcpListener::bind(ops_addr).await.map_err(|e| {
            tracing::error!("Failed to bind ops listener to {}: {}", ops_addr, e);
            AppError::from(e)
        })?;
        let ops_port = ops_listener.local_addr()?.port();
        tracing::info!("Ops endpoint listening on port {}", ops_port);

        Ok(Self {
            plan,
            regional,
            ops_listener,
            ops_port,
        })
    }

    pub fn plan(&self) -> &DeploymentPlan {
        &self.plan
    }

    /// Port serving `region`, if it was declared.
    pub fn port_for(&self, region: &Region) -> Option<u16> {
        self.regional
            .iter()
            .find(|r| &r.endpoint.region == region)
            .map(|r| r.port)
    }

    /// `(endpoint id, port)` for every region, in declaration order.
    pub fn regional_ports(&self) -> Vec<(String, u16)> {
        self.regional
            .iter()
            .map(|r| (r.endpoint.id.clone(), r.port))
            .collect()
    }

    pub fn ops_port(&self) -> u16 {
        self.ops_port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.run_with_shutdown(std::future::pending::<()>()).await
    }

    /// Serve every listener until `signal` resolves, then drain gracefully.
    pub async fn run_with_shutdown<F>(self, signal: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handlers: Vec<Arc<RegionalHandler>> = self
            .regional
            .iter()
            .map(|r| r.endpoint.handler.clone())
            .collect();

        let mut servers: Vec<BoxFuture<'static, std::io::Result<()>>> = Vec::new();
        for regional in self.regional {
            let router = regional_router(regional.endpoint.handler);
            let mut rx = shutdown_rx.clone();
            servers.push(
                axum::serve(regional.listener, router)
                    .with_graceful_shutdown(async move {
                        let _ = rx.changed().await;
                    })
                    .into_future()
                    .boxed(),
            );
        }

        let mut rx = shutdown_rx;
        servers.push(
            axum::serve(self.ops_listener, ops_router(OpsState { handlers }))
                .with_graceful_shutdown(async move {
                    let _ = rx.changed().await;
                })
                .into_future()
                .boxed(),
        );

        tokio::spawn(async move {
            signal.await;
            tracing::info!("Draining regional listeners");
            let _ = shutdown_tx.send(true);
        });

        try_join_all(servers).await.map_err(|e| {
            tracing::error!("HTTP server error: {}", e);
            e
        })?;

        Ok(())
    }
}
