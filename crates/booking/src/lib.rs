//! Booking saga orchestrator for the ticket booking platform.
//!
//! Drives a single booking through availability-check → payment →
//! commit-or-compensate → notify-enqueue, across independently deployed
//! services with no shared transaction.
//!
//! The core ordering decision is pay-then-commit: inventory is
//! decremented only after payment has succeeded, so a payment failure
//! compensates by a direct CANCELLED transition with no inventory
//! rollback. The cost is a small availability-accuracy window while the
//! payment is in flight.

pub mod booking;
pub mod error;
pub mod service;
pub mod status;
pub mod store;

pub use booking::Booking;
pub use error::BookingError;
pub use service::{BookingConfig, BookingConfirmation, BookingService};
pub use status::BookingStatus;
pub use store::BookingStore;
