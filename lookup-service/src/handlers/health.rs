use crate::services::{get_metrics, RegionalHandler};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use futures::future::join_all;
use serde_json::json;
use std::sync::Arc;

#[derive(Clone)]
pub struct OpsState {
    pub handlers: Vec<Arc<RegionalHandler>>,
}

/// Liveness: the process is up. Does not touch any store.
pub async fn health_check(State(state): State<OpsState>) -> impl IntoResponse {
    let regions: Vec<String> = state.handlers.iter().map(|h| h.region().to_string()).collect();

    Json(json!({
        "status": "ok",
        "service": "lookup-service",
        "version": env!("CARGO_PKG_VERSION"),
        "regions": regions
    }))
}

/// Readiness: every regional store answers its health check.
pub async fn readiness_check(State(state): State<OpsState>) -> impl IntoResponse {
    let checks = join_all(state.handlers.iter().map(|handler| async move {
        let result = handler.store().health_check().await;
        (handler.region().to_string(), result)
    }))
    .await;

    let mut ready = true;
    let mut regions = serde_json::Map::new();
    for (region, result) in checks {
        match result {
            Ok(()) => {
                regions.insert(region, json!("ok"));
            }
            Err(e) => {
                tracing::warn!(region = %region, error = %e, "Regional store not ready");
                ready = false;
                regions.insert(region, json!(e.to_string()));
            }
        }
    }

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if ready { "ready" } else { "unavailable" },
            "regions": regions
        })),
    )
}

/// Prometheus metrics endpoint.
pub async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}
