//! Wire messages carried on the notification queues.
//!
//! Messages are immutable once enqueued; ownership transfers from
//! producer to channel to consumer. Each message type rides its own
//! durable queue, so the queue name declares the payload type.

use chrono::{DateTime, Utc};
use common::{BookingId, EventId, UserId};
use serde::{Deserialize, Serialize};

/// Queue carrying booking confirmations and cancellations.
pub const BOOKING_QUEUE: &str = "booking_notifications";

/// Queue carrying user account events.
pub const USER_QUEUE: &str = "user_notifications";

/// Queue carrying event update announcements.
pub const EVENT_QUEUE: &str = "event_notifications";

/// Terminal booking status announced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingOutcomeStatus {
    Confirmed,
    Cancelled,
}

impl std::fmt::Display for BookingOutcomeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingOutcomeStatus::Confirmed => write!(f, "CONFIRMED"),
            BookingOutcomeStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// Payload for the booking notifications queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingNotification {
    pub booking_id: BookingId,
    pub user_id: UserId,
    pub user_email: String,
    pub event_id: EventId,
    pub event_title: String,
    pub tickets: u32,
    pub status: BookingOutcomeStatus,
    pub timestamp: DateTime<Utc>,
}

/// Payload for the user notifications queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserNotification {
    pub user_id: UserId,
    pub email: String,
    pub name: String,
    pub action: String,
    pub timestamp: DateTime<Utc>,
}

/// Payload for the event notifications queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventNotification {
    pub event_id: EventId,
    pub event_title: String,
    pub user_id: UserId,
    pub user_email: String,
    pub action: String,
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

macro_rules! wire_codec {
    ($name:ident) => {
        impl $name {
            /// Serializes the message to its JSON wire form.
            pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
                serde_json::to_vec(self)
            }

            /// Parses the message from its JSON wire form.
            pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
                serde_json::from_slice(bytes)
            }
        }
    };
}

wire_codec!(BookingNotification);
wire_codec!(UserNotification);
wire_codec!(EventNotification);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_status_uses_wire_casing() {
        let json = serde_json::to_string(&BookingOutcomeStatus::Confirmed).unwrap();
        assert_eq!(json, "\"CONFIRMED\"");
        let json = serde_json::to_string(&BookingOutcomeStatus::Cancelled).unwrap();
        assert_eq!(json, "\"CANCELLED\"");
    }

    #[test]
    fn booking_notification_roundtrip() {
        let message = BookingNotification {
            booking_id: BookingId::new(),
            user_id: UserId::new(),
            user_email: "rider@example.com".to_string(),
            event_id: EventId::new(),
            event_title: "Rust Conf".to_string(),
            tickets: 3,
            status: BookingOutcomeStatus::Confirmed,
            timestamp: Utc::now(),
        };

        let bytes = message.to_bytes().unwrap();
        let parsed = BookingNotification::from_bytes(&bytes).unwrap();
        assert_eq!(parsed.booking_id, message.booking_id);
        assert_eq!(parsed.tickets, 3);
        assert_eq!(parsed.status, BookingOutcomeStatus::Confirmed);
    }

    #[test]
    fn malformed_payload_fails_to_parse() {
        assert!(BookingNotification::from_bytes(b"not json").is_err());
        assert!(UserNotification::from_bytes(b"{\"user_id\": 42}").is_err());
    }
}
