//! Channel error types.

use thiserror::Error;

/// Errors that can occur on the notification channel.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The named queue does not exist and could not be declared.
    #[error("Unknown queue: {0}")]
    UnknownQueue(String),

    /// Payload could not be serialized or deserialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The broker is unreachable.
    #[error("Channel unavailable: {0}")]
    Unavailable(String),
}

/// Convenience type alias for channel results.
pub type Result<T> = std::result::Result<T, ChannelError>;
