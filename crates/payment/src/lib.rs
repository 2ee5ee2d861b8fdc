//! Payment gateway boundary for the ticket booking platform.
//!
//! Payment is modeled as a boundary with a success/failure outcome, not
//! a real gateway integration. Every attempt persists exactly one
//! terminal `Payment` record; a retried attempt creates a new record.

pub mod error;
pub mod gateway;
pub mod record;

pub use error::PaymentError;
pub use gateway::{GatewayConfig, MockPaymentGateway, PaymentGateway};
pub use record::{Payment, PaymentStatus};
