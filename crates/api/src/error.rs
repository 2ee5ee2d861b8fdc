//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use booking::BookingError;
use inventory::InventoryError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Missing or invalid bearer token.
    Unauthorized,
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Booking saga error.
    Booking(BookingError),
    /// Inventory ledger error.
    Inventory(InventoryError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Missing or invalid bearer token".to_string(),
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Booking(err) => booking_error_to_response(err),
            ApiError::Inventory(err) => inventory_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({ "success": false, "message": message });
        (status, axum::Json(body)).into_response()
    }
}

fn booking_error_to_response(err: BookingError) -> (StatusCode, String) {
    match &err {
        BookingError::InvalidTicketCount
        | BookingError::InsufficientInventory { .. }
        | BookingError::PaymentFailed { .. }
        | BookingError::AlreadyCancelled(_)
        | BookingError::InvalidStatusTransition { .. } => {
            (StatusCode::BAD_REQUEST, err.to_string())
        }
        BookingError::EventNotFound(_) | BookingError::BookingNotFound(_) => {
            (StatusCode::NOT_FOUND, err.to_string())
        }
        BookingError::NotOwner(_) => (StatusCode::FORBIDDEN, err.to_string()),
        BookingError::Inventory(_)
        | BookingError::Payment(_)
        | BookingError::Channel(_)
        | BookingError::Serialization(_) => {
            tracing::error!(error = %err, "booking service failure");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

fn inventory_error_to_response(err: InventoryError) -> (StatusCode, String) {
    match &err {
        InventoryError::EventNotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
        InventoryError::InsufficientTickets { .. }
        | InventoryError::InvalidTicketCount
        | InventoryError::InvalidEvent(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        InventoryError::Unavailable(_) => {
            tracing::error!(error = %err, "inventory ledger failure");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        ApiError::Booking(err)
    }
}

impl From<InventoryError> for ApiError {
    fn from(err: InventoryError) -> Self {
        ApiError::Inventory(err)
    }
}
