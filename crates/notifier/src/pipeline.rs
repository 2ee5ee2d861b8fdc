//! The notification delivery pipeline.

use common::NotificationId;
use messaging::{
    BOOKING_QUEUE, BookingNotification, Delivery, EVENT_QUEUE, EventNotification,
    NotificationChannel, USER_QUEUE, UserNotification,
};

use crate::email::EmailSender;
use crate::error::{NotifierError, Result};
use crate::record::{NotificationKind, NotificationRecord};
use crate::render;
use crate::store::{DeadLetterStore, NotificationStore};

/// Consumes the three notification queues and delivers emails.
///
/// One consumer per queue; each is an independent task, so a failure in
/// one never stalls the others. Per message the state machine is
/// received → rendered → sent → ack, or error at any stage → Failed
/// record → reject with redelivery disabled (plus a dead-letter copy).
#[derive(Clone)]
pub struct DeliveryPipeline<C, E>
where
    C: NotificationChannel + Clone,
    E: EmailSender + Clone,
{
    channel: C,
    sender: E,
    store: NotificationStore,
    dead_letters: DeadLetterStore,
}

impl<C, E> DeliveryPipeline<C, E>
where
    C: NotificationChannel + Clone + 'static,
    E: EmailSender + Clone + 'static,
{
    /// Creates a pipeline over its collaborators.
    pub fn new(
        channel: C,
        sender: E,
        store: NotificationStore,
        dead_letters: DeadLetterStore,
    ) -> Self {
        Self {
            channel,
            sender,
            store,
            dead_letters,
        }
    }

    /// The notification record store backing the query surface.
    pub fn store(&self) -> &NotificationStore {
        &self.store
    }

    /// The dead-letter store holding rejected payloads.
    pub fn dead_letters(&self) -> &DeadLetterStore {
        &self.dead_letters
    }

    /// Spawns the three queue consumers as independent tasks.
    pub fn spawn(&self) -> Vec<tokio::task::JoinHandle<()>> {
        [BOOKING_QUEUE, USER_QUEUE, EVENT_QUEUE]
            .into_iter()
            .map(|queue| {
                let pipeline = self.clone();
                tokio::spawn(async move { pipeline.consume(queue).await })
            })
            .collect()
    }

    /// Runs one consumer loop forever.
    async fn consume(&self, queue: &'static str) {
        let mut subscription = match self.channel.subscribe(queue).await {
            Ok(subscription) => subscription,
            Err(e) => {
                tracing::error!(queue, error = %e, "failed to subscribe, consumer exiting");
                return;
            }
        };
        tracing::info!(queue, "notification consumer started");

        loop {
            let delivery = subscription.recv().await;
            self.settle(queue, delivery).await;
        }
    }

    /// Processes whatever is currently queued, without blocking for
    /// more. Returns the number of messages settled.
    pub async fn drain_queue(&self, queue: &str) -> Result<usize> {
        let mut subscription = self.channel.subscribe(queue).await?;
        let mut settled = 0;
        while let Some(delivery) = subscription.try_recv() {
            self.settle(queue, delivery).await;
            settled += 1;
        }
        Ok(settled)
    }

    /// Processes one delivery and settles it: ack on success, reject
    /// (no requeue) with a dead-letter copy on any failure.
    async fn settle(&self, queue: &str, delivery: Delivery) {
        let payload = delivery.payload().to_vec();
        match self.process(queue, &payload).await {
            Ok(notification_id) => {
                tracing::debug!(queue, %notification_id, "notification processed");
                delivery.ack();
            }
            Err(e) => {
                tracing::warn!(queue, error = %e, "notification processing failed, dropping");
                self.dead_letters.push(queue, payload, e.to_string()).await;
                delivery.reject();
            }
        }
    }

    /// Parses and delivers one payload according to its queue type.
    async fn process(&self, queue: &str, payload: &[u8]) -> Result<NotificationId> {
        match queue {
            BOOKING_QUEUE => self.process_booking(payload).await,
            USER_QUEUE => self.process_user(payload).await,
            EVENT_QUEUE => self.process_event(payload).await,
            other => Err(NotifierError::UnknownQueue(other.to_string())),
        }
    }

    async fn process_booking(&self, payload: &[u8]) -> Result<NotificationId> {
        let raw = String::from_utf8_lossy(payload).into_owned();
        let message = match BookingNotification::from_bytes(payload) {
            Ok(message) => message,
            Err(e) => return self.record_parse_failure(NotificationKind::Booking, raw, e).await,
        };

        let rendered = render::booking(&message);
        let record = NotificationRecord::pending(
            NotificationKind::Booking,
            message.user_id.to_string(),
            message.user_email.clone(),
            rendered.subject.clone(),
            rendered.content.clone(),
            Some(message.booking_id.to_string()),
        );
        self.record_and_send(record, &message.user_email, &rendered, raw)
            .await
    }

    async fn process_user(&self, payload: &[u8]) -> Result<NotificationId> {
        let raw = String::from_utf8_lossy(payload).into_owned();
        let message = match UserNotification::from_bytes(payload) {
            Ok(message) => message,
            Err(e) => return self.record_parse_failure(NotificationKind::User, raw, e).await,
        };

        let rendered = render::user(&message);
        let record = NotificationRecord::pending(
            NotificationKind::User,
            message.user_id.to_string(),
            message.email.clone(),
            rendered.subject.clone(),
            rendered.content.clone(),
            Some(message.user_id.to_string()),
        );
        self.record_and_send(record, &message.email, &rendered, raw)
            .await
    }

    async fn process_event(&self, payload: &[u8]) -> Result<NotificationId> {
        let raw = String::from_utf8_lossy(payload).into_owned();
        let message = match EventNotification::from_bytes(payload) {
            Ok(message) => message,
            Err(e) => return self.record_parse_failure(NotificationKind::Event, raw, e).await,
        };

        let rendered = render::event(&message);
        let record = NotificationRecord::pending(
            NotificationKind::Event,
            message.user_id.to_string(),
            message.user_email.clone(),
            rendered.subject.clone(),
            rendered.content.clone(),
            Some(message.event_id.to_string()),
        );
        self.record_and_send(record, &message.user_email, &rendered, raw)
            .await
    }

    /// Persists the Pending record, attempts delivery, and finalizes
    /// the record exactly once.
    async fn record_and_send(
        &self,
        record: NotificationRecord,
        to: &str,
        rendered: &render::Rendered,
        raw: String,
    ) -> Result<NotificationId> {
        let id = record.id;
        let kind = record.kind;
        self.store.insert(record).await;

        match self
            .sender
            .deliver(to, &rendered.subject, &rendered.body)
            .await
        {
            Ok(receipt) => {
                self.store.finalize_sent(id).await;
                metrics::counter!("notifications_sent_total", "kind" => kind.as_str()).increment(1);
                tracing::info!(%id, message_id = receipt.message_id, "notification sent");
                Ok(id)
            }
            Err(e) => {
                self.store.finalize_failed(id, e.to_string(), raw).await;
                metrics::counter!("notifications_failed_total", "kind" => kind.as_str())
                    .increment(1);
                Err(e)
            }
        }
    }

    /// Best-effort Failed record for a payload that never parsed.
    async fn record_parse_failure(
        &self,
        kind: NotificationKind,
        raw: String,
        error: serde_json::Error,
    ) -> Result<NotificationId> {
        let record = NotificationRecord::failed_parse(kind, raw, error.to_string());
        self.store.insert(record).await;
        metrics::counter!("notifications_failed_total", "kind" => kind.as_str()).increment(1);
        Err(NotifierError::MalformedPayload(error))
    }
}
