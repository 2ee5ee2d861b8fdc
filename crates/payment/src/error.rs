//! Payment error types.

use common::BookingId;
use thiserror::Error;

/// Errors that can occur during payment operations.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// The processor declined the charge. A FAILED payment record has
    /// already been persisted for the attempt.
    #[error("Payment declined for booking {booking_id}")]
    Declined { booking_id: BookingId },

    /// The charge amount is not payable.
    #[error("Invalid payment amount: {0}")]
    InvalidAmount(String),

    /// The gateway is unreachable.
    #[error("Payment service unavailable: {0}")]
    Unavailable(String),
}

/// Convenience type alias for payment results.
pub type Result<T> = std::result::Result<T, PaymentError>;
