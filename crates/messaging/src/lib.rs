//! Notification channel for the ticket booking platform.
//!
//! A durable, at-least-once message transport with named queues.
//! Producers publish immutable JSON payloads; consumers receive
//! [`Delivery`] handles and settle each message with an explicit `ack`
//! (remove) or `reject` (drop, no requeue). A delivery dropped without
//! being settled is requeued, which is what makes the transport
//! at-least-once rather than at-most-once.

pub mod channel;
pub mod error;
pub mod event;

pub use channel::{Delivery, InMemoryChannel, NotificationChannel, Subscription};
pub use error::ChannelError;
pub use event::{
    BOOKING_QUEUE, BookingNotification, BookingOutcomeStatus, EVENT_QUEUE, EventNotification,
    USER_QUEUE, UserNotification,
};
