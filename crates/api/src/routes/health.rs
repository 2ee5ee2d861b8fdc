//! Liveness endpoint.

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// GET /health — reports which service is answering and that it is up.
pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "ticket-booking-api",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reports_service_identity() {
        let response = check().await;
        assert_eq!(response.status, "ok");
        assert_eq!(response.service, "ticket-booking-api");
        assert!(!response.version.is_empty());
    }
}
