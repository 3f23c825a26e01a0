use axum::Json;

use crate::dto::HealthResponse;

const SERVICE_NAME: &str = "csrd-api";

/// Liveness check reporting the service name and build version.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
    })
}
