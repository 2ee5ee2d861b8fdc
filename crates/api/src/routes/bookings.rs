//! Booking endpoints and shared application state.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use booking::{Booking, BookingService};
use common::{BookingId, EventId, Principal};
use inventory::InMemoryInventoryLedger;
use messaging::InMemoryChannel;
use notifier::NotificationStore;
use payment::{MockPaymentGateway, Payment};
use serde::{Deserialize, Serialize};

use crate::auth::{Authenticator, bearer_token};
use crate::error::ApiError;

/// The orchestrator over the platform's in-process service implementations.
pub type Orchestrator =
    BookingService<InMemoryInventoryLedger, MockPaymentGateway, InMemoryChannel>;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub bookings: Orchestrator,
    pub ledger: InMemoryInventoryLedger,
    pub notifications: NotificationStore,
    pub authenticator: Arc<dyn Authenticator>,
}

impl AppState {
    /// Resolves the request's bearer token to a principal.
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<Principal, ApiError> {
        let token = bearer_token(headers).ok_or(ApiError::Unauthorized)?;
        self.authenticator
            .verify(token)
            .await
            .ok_or(ApiError::Unauthorized)
    }
}

// -- Request types --

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub event_id: String,
    pub tickets: u32,
    pub notes: Option<String>,
}

// -- Response types --

#[derive(Serialize)]
pub struct BookingResponse {
    pub id: String,
    pub event_id: String,
    pub tickets: u32,
    pub total_price_cents: i64,
    pub status: String,
    pub payment_id: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
}

impl From<&Booking> for BookingResponse {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.id.to_string(),
            event_id: booking.event_id.to_string(),
            tickets: booking.tickets,
            total_price_cents: booking.total_price.cents(),
            status: booking.status.to_string(),
            payment_id: booking.payment_id.map(|id| id.to_string()),
            notes: booking.notes.clone(),
            created_at: booking.created_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct PaymentResponse {
    pub id: String,
    pub status: String,
    pub transaction_id: Option<String>,
}

impl From<&Payment> for PaymentResponse {
    fn from(payment: &Payment) -> Self {
        Self {
            id: payment.id.to_string(),
            status: payment.status.to_string(),
            transaction_id: payment.transaction_id.clone(),
        }
    }
}

#[derive(Serialize)]
pub struct BookingConfirmedResponse {
    pub booking: BookingResponse,
    pub payment: PaymentResponse,
}

// -- Handlers --

/// POST /bookings — run the booking saga for the caller.
#[tracing::instrument(skip(state, headers, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(axum::http::StatusCode, Json<BookingConfirmedResponse>), ApiError> {
    let principal = state.authenticate(&headers).await?;
    let event_id = parse_event_id(&req.event_id)?;

    let confirmation = state
        .bookings
        .create_booking(&principal, event_id, req.tickets, req.notes)
        .await?;

    Ok((
        axum::http::StatusCode::CREATED,
        Json(BookingConfirmedResponse {
            booking: BookingResponse::from(&confirmation.booking),
            payment: PaymentResponse::from(&confirmation.payment),
        }),
    ))
}

/// GET /bookings — list the caller's bookings, newest first.
#[tracing::instrument(skip(state, headers))]
pub async fn list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    let principal = state.authenticate(&headers).await?;
    let bookings = state.bookings.list_bookings(&principal).await;
    Ok(Json(bookings.iter().map(BookingResponse::from).collect()))
}

/// GET /bookings/:id — load one of the caller's bookings.
#[tracing::instrument(skip(state, headers))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<BookingResponse>, ApiError> {
    let principal = state.authenticate(&headers).await?;
    let booking_id = parse_booking_id(&id)?;
    let booking = state.bookings.get_booking(&principal, booking_id).await?;
    Ok(Json(BookingResponse::from(&booking)))
}

/// POST /bookings/:id/cancel — cancel one of the caller's bookings.
#[tracing::instrument(skip(state, headers))]
pub async fn cancel(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<BookingResponse>, ApiError> {
    let principal = state.authenticate(&headers).await?;
    let booking_id = parse_booking_id(&id)?;
    let cancelled = state.bookings.cancel_booking(&principal, booking_id).await?;
    Ok(Json(BookingResponse::from(&cancelled)))
}

fn parse_booking_id(id: &str) -> Result<BookingId, ApiError> {
    BookingId::parse(id).map_err(|e| ApiError::BadRequest(format!("Invalid booking ID: {e}")))
}

pub(crate) fn parse_event_id(id: &str) -> Result<EventId, ApiError> {
    EventId::parse(id).map_err(|e| ApiError::BadRequest(format!("Invalid event ID: {e}")))
}
