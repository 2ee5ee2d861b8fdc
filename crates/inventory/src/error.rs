//! Inventory error types.

use common::EventId;
use thiserror::Error;

/// Errors that can occur during inventory operations.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// The event does not exist in the ledger.
    #[error("Event not found: {0}")]
    EventNotFound(EventId),

    /// Not enough tickets remain to satisfy the request.
    #[error("Not enough tickets available: requested {requested}, available {available}")]
    InsufficientTickets {
        event_id: EventId,
        requested: u32,
        available: u32,
    },

    /// The requested ticket count is not a positive number.
    #[error("Ticket count must be greater than zero")]
    InvalidTicketCount,

    /// The event definition is invalid (e.g. zero total tickets).
    #[error("Invalid event definition: {0}")]
    InvalidEvent(String),

    /// The ledger is unreachable.
    #[error("Inventory service unavailable: {0}")]
    Unavailable(String),
}

/// Convenience type alias for inventory results.
pub type Result<T> = std::result::Result<T, InventoryError>;
