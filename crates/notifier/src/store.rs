//! Notification record store and dead-letter store.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::NotificationId;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::record::{NotificationKind, NotificationRecord, NotificationStatus};

/// Filter for the notification query surface.
#[derive(Debug, Clone, Default)]
pub struct NotificationFilter {
    pub recipient_id: Option<String>,
    pub kind: Option<NotificationKind>,
    pub status: Option<NotificationStatus>,
}

impl NotificationFilter {
    fn matches(&self, record: &NotificationRecord) -> bool {
        self.recipient_id
            .as_ref()
            .is_none_or(|r| &record.recipient_id == r)
            && self.kind.is_none_or(|k| record.kind == k)
            && self.status.is_none_or(|s| record.status == s)
    }
}

/// One page of query results.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
}

/// In-memory store of notification records.
///
/// Records are finalized to Sent or Failed exactly once and never
/// revisited afterward.
#[derive(Clone, Default)]
pub struct NotificationStore {
    records: Arc<RwLock<Vec<NotificationRecord>>>,
}

impl NotificationStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Persists a record.
    pub async fn insert(&self, record: NotificationRecord) {
        self.records.write().await.push(record);
    }

    /// Finalizes a record to Sent, stamping `sent_at`.
    pub async fn finalize_sent(&self, id: NotificationId) {
        let mut records = self.records.write().await;
        if let Some(record) = records.iter_mut().find(|r| r.id == id) {
            record.status = NotificationStatus::Sent;
            record.sent_at = Some(Utc::now());
        }
    }

    /// Finalizes a record to Failed, capturing the error and payload.
    pub async fn finalize_failed(
        &self,
        id: NotificationId,
        error: impl Into<String>,
        raw_payload: impl Into<String>,
    ) {
        let mut records = self.records.write().await;
        if let Some(record) = records.iter_mut().find(|r| r.id == id) {
            record.status = NotificationStatus::Failed;
            record.error = Some(error.into());
            record.raw_payload = Some(raw_payload.into());
        }
    }

    /// Looks up a record by ID.
    pub async fn get(&self, id: NotificationId) -> Option<NotificationRecord> {
        self.records.read().await.iter().find(|r| r.id == id).cloned()
    }

    /// Queries records with filtering and pagination, newest first.
    /// Pages are 1-based; page 0 is treated as page 1.
    pub async fn query(
        &self,
        filter: &NotificationFilter,
        page: usize,
        per_page: usize,
    ) -> Page<NotificationRecord> {
        let records = self.records.read().await;
        let mut matched: Vec<_> = records.iter().filter(|r| filter.matches(r)).collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matched.len();
        let page = page.max(1);
        let per_page = per_page.max(1);
        let items = matched
            .into_iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .cloned()
            .collect();

        Page {
            items,
            total,
            page,
            per_page,
        }
    }

    /// Returns all records (test helper).
    pub async fn all(&self) -> Vec<NotificationRecord> {
        self.records.read().await.clone()
    }

    /// Returns the number of stored records.
    pub async fn count(&self) -> usize {
        self.records.read().await.len()
    }
}

/// A rejected message preserved for manual or automated replay.
#[derive(Debug, Clone)]
pub struct DeadLetter {
    pub queue: String,
    pub payload: Vec<u8>,
    pub error: String,
    pub received_at: DateTime<Utc>,
}

/// Store of rejected messages.
///
/// The channel drops a rejected message after one attempt; a copy lands
/// here instead of being silently lost.
#[derive(Clone, Default)]
pub struct DeadLetterStore {
    letters: Arc<RwLock<Vec<DeadLetter>>>,
}

impl DeadLetterStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a rejected message.
    pub async fn push(&self, queue: impl Into<String>, payload: Vec<u8>, error: impl Into<String>) {
        self.letters.write().await.push(DeadLetter {
            queue: queue.into(),
            payload,
            error: error.into(),
            received_at: Utc::now(),
        });
        metrics::counter!("notifications_dead_lettered_total").increment(1);
    }

    /// Returns all dead letters.
    pub async fn all(&self) -> Vec<DeadLetter> {
        self.letters.read().await.clone()
    }

    /// Returns the number of dead letters.
    pub async fn count(&self) -> usize {
        self.letters.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: NotificationKind, recipient: &str) -> NotificationRecord {
        NotificationRecord::pending(
            kind,
            recipient,
            format!("{recipient}@example.com"),
            "subject",
            "content",
            None,
        )
    }

    #[tokio::test]
    async fn finalize_sent_stamps_timestamp() {
        let store = NotificationStore::new();
        let r = record(NotificationKind::Booking, "u1");
        let id = r.id;
        store.insert(r).await;

        store.finalize_sent(id).await;

        let stored = store.get(id).await.unwrap();
        assert_eq!(stored.status, NotificationStatus::Sent);
        assert!(stored.sent_at.is_some());
    }

    #[tokio::test]
    async fn finalize_failed_captures_error_and_payload() {
        let store = NotificationStore::new();
        let r = record(NotificationKind::User, "u1");
        let id = r.id;
        store.insert(r).await;

        store.finalize_failed(id, "smtp down", "{\"raw\":1}").await;

        let stored = store.get(id).await.unwrap();
        assert_eq!(stored.status, NotificationStatus::Failed);
        assert_eq!(stored.error.as_deref(), Some("smtp down"));
        assert_eq!(stored.raw_payload.as_deref(), Some("{\"raw\":1}"));
        assert!(stored.sent_at.is_none());
    }

    #[tokio::test]
    async fn query_filters_by_recipient_kind_and_status() {
        let store = NotificationStore::new();
        store.insert(record(NotificationKind::Booking, "alice")).await;
        store.insert(record(NotificationKind::User, "alice")).await;
        store.insert(record(NotificationKind::Booking, "bob")).await;

        let filter = NotificationFilter {
            recipient_id: Some("alice".to_string()),
            ..Default::default()
        };
        assert_eq!(store.query(&filter, 1, 10).await.total, 2);

        let filter = NotificationFilter {
            recipient_id: Some("alice".to_string()),
            kind: Some(NotificationKind::Booking),
            ..Default::default()
        };
        assert_eq!(store.query(&filter, 1, 10).await.total, 1);

        let filter = NotificationFilter {
            status: Some(NotificationStatus::Sent),
            ..Default::default()
        };
        assert_eq!(store.query(&filter, 1, 10).await.total, 0);
    }

    #[tokio::test]
    async fn query_paginates() {
        let store = NotificationStore::new();
        for i in 0..5 {
            store
                .insert(record(NotificationKind::Event, &format!("u{i}")))
                .await;
        }

        let filter = NotificationFilter::default();
        let first = store.query(&filter, 1, 2).await;
        assert_eq!(first.items.len(), 2);
        assert_eq!(first.total, 5);

        let last = store.query(&filter, 3, 2).await;
        assert_eq!(last.items.len(), 1);

        let beyond = store.query(&filter, 4, 2).await;
        assert!(beyond.items.is_empty());
    }

    #[tokio::test]
    async fn dead_letters_accumulate() {
        let store = DeadLetterStore::new();
        store.push("booking_notifications", b"junk".to_vec(), "parse error").await;

        assert_eq!(store.count().await, 1);
        let letters = store.all().await;
        assert_eq!(letters[0].queue, "booking_notifications");
        assert_eq!(letters[0].payload, b"junk");
    }
}
