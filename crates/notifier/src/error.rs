//! Notifier error types.

use messaging::ChannelError;
use thiserror::Error;

/// Errors that can occur while processing a queued notification.
#[derive(Debug, Error)]
pub enum NotifierError {
    /// The payload could not be parsed as its declared message type.
    #[error("Malformed notification payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    /// The outbound email collaborator reported a failure.
    #[error("Email delivery failed: {0}")]
    Delivery(String),

    /// The notification channel failed.
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// The consumer received a message on a queue it does not handle.
    #[error("No consumer registered for queue: {0}")]
    UnknownQueue(String),
}

/// Convenience type alias for notifier results.
pub type Result<T> = std::result::Result<T, NotifierError>;
