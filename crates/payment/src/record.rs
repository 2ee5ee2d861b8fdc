//! Payment record types.

use chrono::{DateTime, Utc};
use common::{BookingId, Money, PaymentId};
use serde::{Deserialize, Serialize};

/// The status of a payment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Attempt created but not yet resolved.
    #[default]
    Pending,

    /// Charge succeeded (terminal state).
    Completed,

    /// Charge was declined or errored (terminal state).
    Failed,
}

impl PaymentStatus {
    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PaymentStatus::Completed | PaymentStatus::Failed)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Completed => "COMPLETED",
            PaymentStatus::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single payment attempt.
///
/// `transaction_id` is present iff the attempt completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub booking_id: BookingId,
    pub amount: Money,
    pub method: String,
    pub status: PaymentStatus,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// Creates a completed payment record with its transaction identifier.
    pub fn completed(
        booking_id: BookingId,
        amount: Money,
        method: impl Into<String>,
        transaction_id: impl Into<String>,
    ) -> Self {
        Self {
            id: PaymentId::new(),
            booking_id,
            amount,
            method: method.into(),
            status: PaymentStatus::Completed,
            transaction_id: Some(transaction_id.into()),
            created_at: Utc::now(),
        }
    }

    /// Creates a failed payment record. No transaction identifier exists.
    pub fn failed(booking_id: BookingId, amount: Money, method: impl Into<String>) -> Self {
        Self {
            id: PaymentId::new(),
            booking_id,
            amount,
            method: method.into(),
            status: PaymentStatus::Failed,
            transaction_id: None,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_uppercase_wire_names() {
        assert_eq!(PaymentStatus::Pending.to_string(), "PENDING");
        assert_eq!(PaymentStatus::Completed.to_string(), "COMPLETED");
        assert_eq!(PaymentStatus::Failed.to_string(), "FAILED");
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Completed).unwrap(),
            "\"COMPLETED\""
        );
        assert_eq!(
            serde_json::from_str::<PaymentStatus>("\"FAILED\"").unwrap(),
            PaymentStatus::Failed
        );
    }

    #[test]
    fn terminal_states() {
        assert!(!PaymentStatus::Pending.is_terminal());
        assert!(PaymentStatus::Completed.is_terminal());
        assert!(PaymentStatus::Failed.is_terminal());
    }

    #[test]
    fn completed_carries_transaction_id() {
        let payment = Payment::completed(
            BookingId::new(),
            Money::from_cents(5000),
            "credit_card",
            "tx_123",
        );
        assert_eq!(payment.status, PaymentStatus::Completed);
        assert_eq!(payment.transaction_id.as_deref(), Some("tx_123"));
    }

    #[test]
    fn failed_has_no_transaction_id() {
        let payment = Payment::failed(BookingId::new(), Money::from_cents(5000), "credit_card");
        assert_eq!(payment.status, PaymentStatus::Failed);
        assert!(payment.transaction_id.is_none());
    }

    #[test]
    fn serialization_roundtrip() {
        let payment = Payment::completed(
            BookingId::new(),
            Money::from_cents(100),
            "credit_card",
            "tx_1",
        );
        let json = serde_json::to_string(&payment).unwrap();
        let deserialized: Payment = serde_json::from_str(&json).unwrap();
        assert_eq!(payment.id, deserialized.id);
        assert_eq!(payment.status, deserialized.status);
    }
}
