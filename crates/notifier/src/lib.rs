//! Notification delivery pipeline for the ticket booking platform.
//!
//! Consumes the three durable notification queues with one independent
//! consumer each. Per message: parse by queue type, persist a Pending
//! record, render a type-specific email, attempt delivery, then
//! finalize the record to Sent or Failed exactly once. Any failure
//! (parse, render, delivery) rejects the message with redelivery
//! disabled and copies the raw payload to a dead-letter store, so a
//! poison message is processed at most once per delivery.

pub mod email;
pub mod error;
pub mod pipeline;
pub mod record;
pub mod render;
pub mod store;

pub use email::{EmailReceipt, EmailSender, MockEmailSender};
pub use error::NotifierError;
pub use pipeline::DeliveryPipeline;
pub use record::{NotificationKind, NotificationRecord, NotificationStatus};
pub use store::{DeadLetter, DeadLetterStore, NotificationFilter, NotificationStore, Page};
