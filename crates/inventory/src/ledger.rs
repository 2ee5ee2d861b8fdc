//! Inventory ledger trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::EventId;
use tokio::sync::RwLock;

use crate::error::{InventoryError, Result};
use crate::record::{EventRecord, NewEvent};

/// Result of an availability check.
#[derive(Debug, Clone)]
pub struct AvailabilityCheck {
    /// True iff the requested count can currently be satisfied.
    pub available: bool,
    /// Tickets remaining at the time of the check.
    pub available_tickets: u32,
}

/// Trait for the inventory ledger consumed by the booking saga.
///
/// `check_availability` is advisory only: time elapses between check and
/// commit, so `commit_decrement` must re-validate sufficiency itself.
#[async_trait]
pub trait InventoryLedger: Send + Sync {
    /// Looks up an event by ID.
    async fn get_event(&self, event_id: EventId) -> Result<Option<EventRecord>>;

    /// Lists all events in the ledger.
    async fn list_events(&self) -> Result<Vec<EventRecord>>;

    /// Registers a new event with a full complement of tickets.
    async fn create_event(&self, new_event: NewEvent) -> Result<EventRecord>;

    /// Checks whether `requested` tickets are currently available.
    async fn check_availability(
        &self,
        event_id: EventId,
        requested: u32,
    ) -> Result<AvailabilityCheck>;

    /// Atomically re-validates sufficiency and decrements the count.
    ///
    /// Never trusts a prior `check_availability`; fails with
    /// `InsufficientTickets` if the count has since dropped below
    /// `requested`. Returns the updated record on success.
    async fn commit_decrement(&self, event_id: EventId, requested: u32) -> Result<EventRecord>;
}

/// In-memory inventory ledger.
///
/// Check-and-decrement happens under a single write-lock acquisition,
/// so two concurrent bookings cannot both pass the sufficiency check
/// against the same pre-decrement count.
#[derive(Clone, Default)]
pub struct InMemoryInventoryLedger {
    events: Arc<RwLock<HashMap<EventId, EventRecord>>>,
}

impl InMemoryInventoryLedger {
    /// Creates a new empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of registered events.
    pub async fn event_count(&self) -> usize {
        self.events.read().await.len()
    }
}

#[async_trait]
impl InventoryLedger for InMemoryInventoryLedger {
    async fn get_event(&self, event_id: EventId) -> Result<Option<EventRecord>> {
        Ok(self.events.read().await.get(&event_id).cloned())
    }

    async fn list_events(&self) -> Result<Vec<EventRecord>> {
        let mut events: Vec<_> = self.events.read().await.values().cloned().collect();
        events.sort_by_key(|e| e.created_at);
        Ok(events)
    }

    async fn create_event(&self, new_event: NewEvent) -> Result<EventRecord> {
        if new_event.total_tickets == 0 {
            return Err(InventoryError::InvalidEvent(
                "at least one ticket must be available".to_string(),
            ));
        }
        if new_event.price.is_negative() {
            return Err(InventoryError::InvalidEvent(
                "ticket price cannot be negative".to_string(),
            ));
        }

        let record = EventRecord {
            id: EventId::new(),
            title: new_event.title,
            description: new_event.description,
            location: new_event.location,
            category: new_event.category,
            price: new_event.price,
            total_tickets: new_event.total_tickets,
            available_tickets: new_event.total_tickets,
            created_at: Utc::now(),
        };

        self.events.write().await.insert(record.id, record.clone());
        metrics::counter!("inventory_events_created_total").increment(1);
        Ok(record)
    }

    #[tracing::instrument(skip(self))]
    async fn check_availability(
        &self,
        event_id: EventId,
        requested: u32,
    ) -> Result<AvailabilityCheck> {
        if requested == 0 {
            return Err(InventoryError::InvalidTicketCount);
        }

        let events = self.events.read().await;
        let event = events
            .get(&event_id)
            .ok_or(InventoryError::EventNotFound(event_id))?;

        Ok(AvailabilityCheck {
            available: event.has_capacity(requested),
            available_tickets: event.available_tickets,
        })
    }

    #[tracing::instrument(skip(self))]
    async fn commit_decrement(&self, event_id: EventId, requested: u32) -> Result<EventRecord> {
        if requested == 0 {
            return Err(InventoryError::InvalidTicketCount);
        }

        let mut events = self.events.write().await;
        let event = events
            .get_mut(&event_id)
            .ok_or(InventoryError::EventNotFound(event_id))?;

        if !event.has_capacity(requested) {
            metrics::counter!("inventory_decrements_rejected_total").increment(1);
            return Err(InventoryError::InsufficientTickets {
                event_id,
                requested,
                available: event.available_tickets,
            });
        }

        event.available_tickets -= requested;
        event.clamp_available();

        metrics::counter!("inventory_tickets_committed_total").increment(requested as u64);
        tracing::info!(
            %event_id,
            requested,
            remaining = event.available_tickets,
            "tickets committed"
        );

        Ok(event.clone())
    }
}
