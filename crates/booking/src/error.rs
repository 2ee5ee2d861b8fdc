//! Booking error types.
//!
//! The taxonomy mirrors how failures surface to callers: validation and
//! business rejections carry enough detail for a structured response,
//! infrastructure failures propagate as generic service errors, and
//! none of them leak internals beyond a message.

use common::{BookingId, EventId};
use inventory::InventoryError;
use messaging::ChannelError;
use payment::PaymentError;
use thiserror::Error;

use crate::status::BookingStatus;

/// Errors that can occur during booking operations.
#[derive(Debug, Error)]
pub enum BookingError {
    /// Ticket count must be positive (validation, no side effects).
    #[error("Number of tickets must be greater than zero")]
    InvalidTicketCount,

    /// Not enough tickets at the availability check (business
    /// rejection, no records written).
    #[error("Not enough tickets available: requested {requested}, available {available}")]
    InsufficientInventory { requested: u32, available: u32 },

    /// The event does not exist.
    #[error("Event not found: {0}")]
    EventNotFound(EventId),

    /// The booking does not exist.
    #[error("Booking not found: {0}")]
    BookingNotFound(BookingId),

    /// The caller does not own the booking.
    #[error("Not authorized to access booking {0}")]
    NotOwner(BookingId),

    /// The booking is already cancelled; cancelling again is a no-op.
    #[error("Booking {0} is already cancelled")]
    AlreadyCancelled(BookingId),

    /// Payment was declined. The booking has been compensated to
    /// CANCELLED; inventory was never decremented.
    #[error("Payment failed for booking {booking_id}; booking cancelled")]
    PaymentFailed { booking_id: BookingId },

    /// A status transition that the state machine forbids.
    #[error("Invalid booking status transition from {from} to {to}")]
    InvalidStatusTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    /// Inventory ledger failure.
    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),

    /// Payment gateway failure other than a decline.
    #[error("Payment error: {0}")]
    Payment(#[from] PaymentError),

    /// Notification channel failure.
    #[error("Notification channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Wire payload serialization failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for booking results.
pub type Result<T> = std::result::Result<T, BookingError>;
