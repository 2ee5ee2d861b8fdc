//! HTTP API server with observability for the ticket booking platform.
//!
//! Provides REST endpoints for bookings, the event catalogue, and the
//! notification query surface, with bearer-token auth, structured
//! logging (tracing) and Prometheus metrics.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use booking::{BookingConfig, BookingService, BookingStore};
use inventory::InMemoryInventoryLedger;
use messaging::InMemoryChannel;
use metrics_exporter_prometheus::PrometheusHandle;
use notifier::{DeadLetterStore, DeliveryPipeline, MockEmailSender, NotificationStore};
use payment::{GatewayConfig, MockPaymentGateway};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use auth::StaticTokenAuthenticator;
use routes::bookings::AppState;

/// Everything `create_default_state` wires up.
///
/// The pipeline is returned unstarted so the caller decides when (and
/// whether) its consumers run; tests often drain queues synchronously
/// instead.
pub struct Platform {
    pub state: Arc<AppState>,
    pub pipeline: DeliveryPipeline<InMemoryChannel, MockEmailSender>,
    pub authenticator: StaticTokenAuthenticator,
    pub email: MockEmailSender,
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/bookings",
            post(routes::bookings::create).get(routes::bookings::list),
        )
        .route("/bookings/{id}", get(routes::bookings::get))
        .route("/bookings/{id}/cancel", post(routes::bookings::cancel))
        .route(
            "/events",
            get(routes::events::list).post(routes::events::create),
        )
        .route("/events/{id}", get(routes::events::get))
        .route("/events/{id}/availability", get(routes::events::availability))
        .route("/events/{id}/book", post(routes::events::book))
        .route("/notifications", get(routes::notifications::list))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Wires up the in-process platform: ledger, gateway, channel,
/// orchestrator, delivery pipeline, and a static-token authenticator.
pub fn create_default_state(gateway_config: GatewayConfig) -> Platform {
    let ledger = InMemoryInventoryLedger::new();
    let gateway = MockPaymentGateway::new(gateway_config);
    let channel = InMemoryChannel::new();
    let authenticator = StaticTokenAuthenticator::new();
    let email = MockEmailSender::new();

    let bookings = BookingService::new(
        ledger.clone(),
        gateway,
        channel.clone(),
        BookingStore::new(),
        BookingConfig::default(),
    );

    let notifications = NotificationStore::new();
    let pipeline = DeliveryPipeline::new(
        channel,
        email.clone(),
        notifications.clone(),
        DeadLetterStore::new(),
    );

    let state = Arc::new(AppState {
        bookings,
        ledger,
        notifications,
        authenticator: Arc::new(authenticator.clone()),
    });

    Platform {
        state,
        pipeline,
        authenticator,
        email,
    }
}
