//! Notification record types.

use chrono::{DateTime, Utc};
use common::NotificationId;
use serde::{Deserialize, Serialize};

/// The queue family a notification came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    Booking,
    User,
    Event,
}

impl NotificationKind {
    /// Returns the kind name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Booking => "BOOKING",
            NotificationKind::User => "USER",
            NotificationKind::Event => "EVENT",
        }
    }

    /// Parses a kind from its wire string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "BOOKING" => Some(NotificationKind::Booking),
            "USER" => Some(NotificationKind::User),
            "EVENT" => Some(NotificationKind::Event),
            _ => None,
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Delivery status of a notification record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationStatus {
    /// Record created on message receipt; send not yet attempted.
    #[default]
    Pending,

    /// Email handed to the outbound collaborator (terminal).
    Sent,

    /// Parse, render, or delivery failed (terminal). Never retried
    /// from the record.
    Failed,
}

impl NotificationStatus {
    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, NotificationStatus::Sent | NotificationStatus::Failed)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationStatus::Pending => "PENDING",
            NotificationStatus::Sent => "SENT",
            NotificationStatus::Failed => "FAILED",
        }
    }

    /// Parses a status from its wire string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(NotificationStatus::Pending),
            "SENT" => Some(NotificationStatus::Sent),
            "FAILED" => Some(NotificationStatus::Failed),
            _ => None,
        }
    }
}

impl std::fmt::Display for NotificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One processed (or processing) notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id: NotificationId,
    pub kind: NotificationKind,
    /// Recipient identifier; `"unknown"` when the payload never parsed.
    pub recipient_id: String,
    pub recipient_email: String,
    pub subject: String,
    pub content: String,
    pub related_id: Option<String>,
    pub status: NotificationStatus,
    /// Failure description, set iff status is Failed.
    pub error: Option<String>,
    /// Raw payload captured on failure for diagnosis.
    pub raw_payload: Option<String>,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl NotificationRecord {
    /// Creates a Pending record for a freshly received message.
    pub fn pending(
        kind: NotificationKind,
        recipient_id: impl Into<String>,
        recipient_email: impl Into<String>,
        subject: impl Into<String>,
        content: impl Into<String>,
        related_id: Option<String>,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            kind,
            recipient_id: recipient_id.into(),
            recipient_email: recipient_email.into(),
            subject: subject.into(),
            content: content.into(),
            related_id,
            status: NotificationStatus::Pending,
            error: None,
            raw_payload: None,
            sent_at: None,
            created_at: Utc::now(),
        }
    }

    /// Creates a Failed record for a payload that never parsed, so no
    /// recipient is known.
    pub fn failed_parse(
        kind: NotificationKind,
        raw_payload: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            kind,
            recipient_id: "unknown".to_string(),
            recipient_email: "unknown".to_string(),
            subject: format!("{kind} notification"),
            content: format!("Failed to process {kind} notification"),
            related_id: None,
            status: NotificationStatus::Failed,
            error: Some(error.into()),
            raw_payload: Some(raw_payload.into()),
            sent_at: None,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_roundtrip() {
        for kind in [
            NotificationKind::Booking,
            NotificationKind::User,
            NotificationKind::Event,
        ] {
            assert_eq!(NotificationKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(NotificationKind::parse("SMOKE_SIGNAL"), None);
    }

    #[test]
    fn status_terminality() {
        assert!(!NotificationStatus::Pending.is_terminal());
        assert!(NotificationStatus::Sent.is_terminal());
        assert!(NotificationStatus::Failed.is_terminal());
    }

    #[test]
    fn pending_record_defaults() {
        let record = NotificationRecord::pending(
            NotificationKind::Booking,
            "user-1",
            "rider@example.com",
            "Your Booking is Confirmed!",
            "Your booking for Rust Conf has been confirmed.",
            Some("booking-1".to_string()),
        );
        assert_eq!(record.status, NotificationStatus::Pending);
        assert!(record.sent_at.is_none());
        assert!(record.error.is_none());
    }

    #[test]
    fn failed_parse_record_marks_unknown_recipient() {
        let record =
            NotificationRecord::failed_parse(NotificationKind::User, "not json", "parse error");
        assert_eq!(record.status, NotificationStatus::Failed);
        assert_eq!(record.recipient_id, "unknown");
        assert_eq!(record.raw_payload.as_deref(), Some("not json"));
    }
}
