//! Event catalogue and inventory endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use common::Money;
use inventory::{EventCategory, EventRecord, InventoryLedger, NewEvent};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::routes::bookings::{AppState, parse_event_id};

// -- Request types --

#[derive(Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub location: String,
    #[serde(default)]
    pub category: EventCategory,
    pub price_cents: i64,
    pub total_tickets: u32,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    /// Ticket count to check for; defaults to one.
    pub tickets: Option<u32>,
}

#[derive(Deserialize)]
pub struct BookTicketsRequest {
    pub tickets: u32,
}

// -- Response types --

#[derive(Serialize)]
pub struct EventResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub category: String,
    pub price_cents: i64,
    pub total_tickets: u32,
    pub available_tickets: u32,
    pub created_at: String,
}

impl From<&EventRecord> for EventResponse {
    fn from(event: &EventRecord) -> Self {
        Self {
            id: event.id.to_string(),
            title: event.title.clone(),
            description: event.description.clone(),
            location: event.location.clone(),
            category: event.category.to_string(),
            price_cents: event.price.cents(),
            total_tickets: event.total_tickets,
            available_tickets: event.available_tickets,
            created_at: event.created_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct AvailabilityResponse {
    pub available: bool,
    pub available_tickets: u32,
    pub requested: u32,
}

// -- Handlers --

/// GET /events — list the event catalogue.
#[tracing::instrument(skip(state))]
pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<EventResponse>>, ApiError> {
    let events = state.ledger.list_events().await?;
    Ok(Json(events.iter().map(EventResponse::from).collect()))
}

/// GET /events/:id — load one event.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<EventResponse>, ApiError> {
    let event_id = parse_event_id(&id)?;
    let event = state
        .ledger
        .get_event(event_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Event {id} not found")))?;
    Ok(Json(EventResponse::from(&event)))
}

/// POST /events — register a new event with a full complement of tickets.
#[tracing::instrument(skip(state, headers, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateEventRequest>,
) -> Result<(axum::http::StatusCode, Json<EventResponse>), ApiError> {
    state.authenticate(&headers).await?;

    let event = state
        .ledger
        .create_event(NewEvent {
            title: req.title,
            description: req.description,
            location: req.location,
            category: req.category,
            price: Money::from_cents(req.price_cents),
            total_tickets: req.total_tickets,
        })
        .await?;

    Ok((
        axum::http::StatusCode::CREATED,
        Json(EventResponse::from(&event)),
    ))
}

/// GET /events/:id/availability?tickets=N — advisory availability check.
#[tracing::instrument(skip(state))]
pub async fn availability(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, ApiError> {
    let event_id = parse_event_id(&id)?;
    let requested = query.tickets.unwrap_or(1);
    let check = state.ledger.check_availability(event_id, requested).await?;
    Ok(Json(AvailabilityResponse {
        available: check.available,
        available_tickets: check.available_tickets,
        requested,
    }))
}

/// POST /events/:id/book — directly commit a ticket decrement.
///
/// Service-to-service surface: re-validates sufficiency atomically
/// rather than trusting a prior availability check.
#[tracing::instrument(skip(state, headers, req))]
pub async fn book(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<BookTicketsRequest>,
) -> Result<Json<EventResponse>, ApiError> {
    state.authenticate(&headers).await?;
    let event_id = parse_event_id(&id)?;
    let event = state.ledger.commit_decrement(event_id, req.tickets).await?;
    Ok(Json(EventResponse::from(&event)))
}
