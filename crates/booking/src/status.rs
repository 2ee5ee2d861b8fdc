//! Booking status state machine.

use serde::{Deserialize, Serialize};

/// The status of a booking in its lifecycle.
///
/// State transitions:
/// ```text
/// Pending ──┬──► Confirmed ──► Cancelled
///           └──► Cancelled
/// ```
/// Confirmed and Cancelled are terminal for the saga: once a booking is
/// Cancelled no further transitions happen, and Confirmed only moves to
/// Cancelled through an explicit user cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    /// Booking row exists, payment not yet resolved.
    #[default]
    Pending,

    /// Payment completed and inventory committed.
    Confirmed,

    /// Payment failed, user cancelled, or stale sweep (terminal).
    Cancelled,
}

impl BookingStatus {
    /// Returns true if the booking can be confirmed from this status.
    pub fn can_confirm(&self) -> bool {
        matches!(self, BookingStatus::Pending)
    }

    /// Returns true if the booking can be cancelled from this status.
    pub fn can_cancel(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }

    /// Returns true if the saga considers this status resolved.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Confirmed | BookingStatus::Cancelled)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_status_is_pending() {
        assert_eq!(BookingStatus::default(), BookingStatus::Pending);
    }

    #[test]
    fn only_pending_can_confirm() {
        assert!(BookingStatus::Pending.can_confirm());
        assert!(!BookingStatus::Confirmed.can_confirm());
        assert!(!BookingStatus::Cancelled.can_confirm());
    }

    #[test]
    fn cancelled_cannot_cancel_again() {
        assert!(BookingStatus::Pending.can_cancel());
        assert!(BookingStatus::Confirmed.can_cancel());
        assert!(!BookingStatus::Cancelled.can_cancel());
    }

    #[test]
    fn terminal_states() {
        assert!(!BookingStatus::Pending.is_terminal());
        assert!(BookingStatus::Confirmed.is_terminal());
        assert!(BookingStatus::Cancelled.is_terminal());
    }

    #[test]
    fn display_uses_wire_casing() {
        assert_eq!(BookingStatus::Pending.to_string(), "PENDING");
        assert_eq!(BookingStatus::Confirmed.to_string(), "CONFIRMED");
        assert_eq!(BookingStatus::Cancelled.to_string(), "CANCELLED");
    }

    #[test]
    fn serialization() {
        let json = serde_json::to_string(&BookingStatus::Confirmed).unwrap();
        assert_eq!(json, "\"CONFIRMED\"");
        let status: BookingStatus = serde_json::from_str("\"CANCELLED\"").unwrap();
        assert_eq!(status, BookingStatus::Cancelled);
    }
}
