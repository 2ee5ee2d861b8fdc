//! Shared types for the ticket booking platform.
//!
//! Provides the UUID-backed identifier newtypes used across service
//! boundaries and the `Money` value type (integer cents).

pub mod types;

pub use types::{BookingId, EventId, Money, NotificationId, PaymentId, Principal, UserId};
