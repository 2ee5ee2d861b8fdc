//! Prometheus scrape endpoint.
//!
//! Renders whatever the booking, inventory, and notifier crates have
//! recorded through the `metrics` facade (`bookings_created_total`,
//! `inventory_tickets_committed_total`, `notifications_sent_total`, ...).

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use metrics_exporter_prometheus::PrometheusHandle;

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// GET /metrics — renders the process-wide recorder in exposition format.
pub async fn render(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        handle.render(),
    )
}
