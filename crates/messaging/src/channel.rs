//! Notification channel trait and in-memory implementation.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::error::Result;

/// Core trait for the notification transport.
///
/// Queues are declared on first use. Publishing is fire-and-forget from
/// the producer's perspective: once `publish` returns, the message is
/// owned by the channel until a consumer settles it.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Enqueues a payload on the named queue.
    async fn publish(&self, queue: &str, payload: Vec<u8>) -> Result<()>;

    /// Opens a consumer subscription on the named queue.
    async fn subscribe(&self, queue: &str) -> Result<Subscription>;
}

#[derive(Debug)]
struct QueuedMessage {
    payload: Vec<u8>,
    attempt: u32,
}

#[derive(Default)]
struct Queue {
    // std Mutex so the redelivery path in Drop can lock it.
    messages: Mutex<VecDeque<QueuedMessage>>,
    notify: Notify,
}

impl Queue {
    fn push_back(&self, message: QueuedMessage) {
        self.messages.lock().unwrap().push_back(message);
        self.notify.notify_one();
    }

    fn push_front(&self, message: QueuedMessage) {
        self.messages.lock().unwrap().push_front(message);
        self.notify.notify_one();
    }

    fn pop(&self) -> Option<QueuedMessage> {
        self.messages.lock().unwrap().pop_front()
    }

    fn len(&self) -> usize {
        self.messages.lock().unwrap().len()
    }
}

/// A consumer subscription on a single queue.
pub struct Subscription {
    queue_name: String,
    queue: Arc<Queue>,
}

impl Subscription {
    /// Waits for the next message.
    ///
    /// The returned [`Delivery`] must be settled with `ack` or `reject`;
    /// dropping it unsettled requeues the message.
    pub async fn recv(&mut self) -> Delivery {
        loop {
            if let Some(message) = self.queue.pop() {
                return Delivery::new(self.queue_name.clone(), self.queue.clone(), message);
            }
            let notified = self.queue.notify.notified();
            // Re-check after registering: a publish may have landed in between.
            if let Some(message) = self.queue.pop() {
                return Delivery::new(self.queue_name.clone(), self.queue.clone(), message);
            }
            notified.await;
        }
    }

    /// Returns the next message if one is immediately available.
    pub fn try_recv(&mut self) -> Option<Delivery> {
        self.queue
            .pop()
            .map(|message| Delivery::new(self.queue_name.clone(), self.queue.clone(), message))
    }
}

/// A single in-flight message handed to a consumer.
pub struct Delivery {
    queue_name: String,
    queue: Arc<Queue>,
    message: Option<QueuedMessage>,
}

impl Delivery {
    fn new(queue_name: String, queue: Arc<Queue>, message: QueuedMessage) -> Self {
        Self {
            queue_name,
            queue,
            message: Some(message),
        }
    }

    /// The message payload.
    pub fn payload(&self) -> &[u8] {
        self.message
            .as_ref()
            .map(|m| m.payload.as_slice())
            .unwrap_or(&[])
    }

    /// How many times this message has been delivered (1 = first time).
    pub fn attempt(&self) -> u32 {
        self.message.as_ref().map(|m| m.attempt).unwrap_or(0)
    }

    /// Acknowledges the message, removing it from the channel.
    pub fn ack(mut self) {
        self.message.take();
        metrics::counter!("channel_messages_acked_total").increment(1);
    }

    /// Rejects the message with redelivery disabled. The message is
    /// dropped from the channel after this single attempt.
    pub fn reject(mut self) {
        if let Some(message) = self.message.take() {
            metrics::counter!("channel_messages_rejected_total").increment(1);
            tracing::warn!(
                queue = %self.queue_name,
                attempt = message.attempt,
                "message rejected without requeue"
            );
        }
    }
}

impl Drop for Delivery {
    fn drop(&mut self) {
        // An unsettled delivery (consumer crashed or dropped the handle)
        // goes back to the head of the queue for redelivery.
        if let Some(mut message) = self.message.take() {
            message.attempt += 1;
            self.queue.push_front(message);
            metrics::counter!("channel_messages_redelivered_total").increment(1);
        }
    }
}

/// In-memory notification channel.
///
/// Queues are shared across clones, so a producer and its consumers see
/// the same backlog. Stands in for a durable broker in tests and the
/// single-process deployment.
#[derive(Clone, Default)]
pub struct InMemoryChannel {
    queues: Arc<Mutex<HashMap<String, Arc<Queue>>>>,
}

impl InMemoryChannel {
    /// Creates a new channel with no queues declared.
    pub fn new() -> Self {
        Self::default()
    }

    fn queue(&self, name: &str) -> Arc<Queue> {
        let mut queues = self.queues.lock().unwrap();
        queues
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Queue::default()))
            .clone()
    }

    /// Returns the number of messages waiting on a queue.
    pub fn queue_depth(&self, name: &str) -> usize {
        self.queue(name).len()
    }
}

#[async_trait]
impl NotificationChannel for InMemoryChannel {
    async fn publish(&self, queue: &str, payload: Vec<u8>) -> Result<()> {
        self.queue(queue).push_back(QueuedMessage {
            payload,
            attempt: 1,
        });
        metrics::counter!("channel_messages_published_total").increment(1);
        tracing::debug!(queue, "message published");
        Ok(())
    }

    async fn subscribe(&self, queue: &str) -> Result<Subscription> {
        Ok(Subscription {
            queue_name: queue.to_string(),
            queue: self.queue(queue),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn publish_then_receive() {
        let channel = InMemoryChannel::new();
        channel.publish("q", b"hello".to_vec()).await.unwrap();

        let mut sub = channel.subscribe("q").await.unwrap();
        let delivery = sub.recv().await;
        assert_eq!(delivery.payload(), b"hello");
        assert_eq!(delivery.attempt(), 1);
        delivery.ack();

        assert_eq!(channel.queue_depth("q"), 0);
    }

    #[tokio::test]
    async fn ack_removes_message() {
        let channel = InMemoryChannel::new();
        channel.publish("q", b"one".to_vec()).await.unwrap();

        let mut sub = channel.subscribe("q").await.unwrap();
        sub.recv().await.ack();

        assert!(sub.try_recv().is_none());
    }

    #[tokio::test]
    async fn reject_drops_without_requeue() {
        let channel = InMemoryChannel::new();
        channel.publish("q", b"poison".to_vec()).await.unwrap();

        let mut sub = channel.subscribe("q").await.unwrap();
        sub.recv().await.reject();

        assert!(sub.try_recv().is_none());
        assert_eq!(channel.queue_depth("q"), 0);
    }

    #[tokio::test]
    async fn unsettled_delivery_is_redelivered() {
        let channel = InMemoryChannel::new();
        channel.publish("q", b"retry me".to_vec()).await.unwrap();

        let mut sub = channel.subscribe("q").await.unwrap();
        {
            let delivery = sub.recv().await;
            assert_eq!(delivery.attempt(), 1);
            // Dropped without ack or reject.
        }

        let delivery = sub.recv().await;
        assert_eq!(delivery.payload(), b"retry me");
        assert_eq!(delivery.attempt(), 2);
        delivery.ack();
    }

    #[tokio::test]
    async fn queues_are_independent() {
        let channel = InMemoryChannel::new();
        channel.publish("a", b"for a".to_vec()).await.unwrap();
        channel.publish("b", b"for b".to_vec()).await.unwrap();

        let mut sub_b = channel.subscribe("b").await.unwrap();
        let delivery = sub_b.recv().await;
        assert_eq!(delivery.payload(), b"for b");
        delivery.ack();

        assert_eq!(channel.queue_depth("a"), 1);
    }

    #[tokio::test]
    async fn clones_share_queues() {
        let channel = InMemoryChannel::new();
        let producer = channel.clone();

        let mut sub = channel.subscribe("q").await.unwrap();
        let receiver = tokio::spawn(async move {
            let delivery = sub.recv().await;
            let payload = delivery.payload().to_vec();
            delivery.ack();
            payload
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        producer.publish("q", b"cross-clone".to_vec()).await.unwrap();

        assert_eq!(receiver.await.unwrap(), b"cross-clone");
    }

    #[tokio::test]
    async fn messages_preserve_order() {
        let channel = InMemoryChannel::new();
        for i in 0..5u8 {
            channel.publish("q", vec![i]).await.unwrap();
        }

        let mut sub = channel.subscribe("q").await.unwrap();
        for i in 0..5u8 {
            let delivery = sub.recv().await;
            assert_eq!(delivery.payload(), &[i]);
            delivery.ack();
        }
    }
}
