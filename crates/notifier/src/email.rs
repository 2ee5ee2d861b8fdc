//! Outbound email collaborator.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{NotifierError, Result};

/// Receipt returned by a successful delivery.
#[derive(Debug, Clone)]
pub struct EmailReceipt {
    pub message_id: String,
}

/// Trait for the outbound email service.
///
/// Rendering happens upstream; this boundary only moves a finished
/// message to an address and reports the outcome.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Delivers a message, returning a receipt on success.
    async fn deliver(&self, to: &str, subject: &str, body: &str) -> Result<EmailReceipt>;
}

/// An email captured by the mock sender.
#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Default)]
struct MockEmailState {
    sent: Vec<SentEmail>,
    fail_on_deliver: bool,
}

/// In-memory email sender for testing and the single-process deployment.
#[derive(Clone, Default)]
pub struct MockEmailSender {
    state: Arc<RwLock<MockEmailState>>,
}

impl MockEmailSender {
    /// Creates a new mock sender.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the sender to fail every delivery.
    pub async fn set_fail_on_deliver(&self, fail: bool) {
        self.state.write().await.fail_on_deliver = fail;
    }

    /// Returns the number of delivered emails.
    pub async fn sent_count(&self) -> usize {
        self.state.read().await.sent.len()
    }

    /// Returns all delivered emails.
    pub async fn sent(&self) -> Vec<SentEmail> {
        self.state.read().await.sent.clone()
    }
}

#[async_trait]
impl EmailSender for MockEmailSender {
    async fn deliver(&self, to: &str, subject: &str, body: &str) -> Result<EmailReceipt> {
        let mut state = self.state.write().await;

        if state.fail_on_deliver {
            return Err(NotifierError::Delivery("SMTP connection refused".to_string()));
        }

        state.sent.push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });

        Ok(EmailReceipt {
            message_id: format!("msg_{}", uuid::Uuid::new_v4().simple()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivery_is_recorded() {
        let sender = MockEmailSender::new();
        let receipt = sender
            .deliver("rider@example.com", "Hello", "body")
            .await
            .unwrap();
        assert!(receipt.message_id.starts_with("msg_"));

        let sent = sender.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "rider@example.com");
        assert_eq!(sent[0].subject, "Hello");
    }

    #[tokio::test]
    async fn failure_mode_delivers_nothing() {
        let sender = MockEmailSender::new();
        sender.set_fail_on_deliver(true).await;

        let result = sender.deliver("rider@example.com", "Hello", "body").await;
        assert!(matches!(result, Err(NotifierError::Delivery(_))));
        assert_eq!(sender.sent_count().await, 0);
    }
}
