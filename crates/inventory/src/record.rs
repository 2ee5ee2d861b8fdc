//! Event record held by the inventory ledger.

use chrono::{DateTime, Utc};
use common::{EventId, Money};
use serde::{Deserialize, Serialize};

/// Category of a bookable event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EventCategory {
    Conference,
    Seminar,
    Workshop,
    Concert,
    Exhibition,
    #[default]
    Other,
}

impl EventCategory {
    /// Returns the category name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Conference => "Conference",
            EventCategory::Seminar => "Seminar",
            EventCategory::Workshop => "Workshop",
            EventCategory::Concert => "Concert",
            EventCategory::Exhibition => "Exhibition",
            EventCategory::Other => "Other",
        }
    }
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A bookable event and its ticket inventory.
///
/// Invariant: `0 <= available_tickets <= total_tickets`. The ledger is
/// the only mutator; callers go through `commit_decrement`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub category: EventCategory,
    /// Ticket price per seat.
    pub price: Money,
    pub total_tickets: u32,
    pub available_tickets: u32,
    pub created_at: DateTime<Utc>,
}

impl EventRecord {
    /// Returns true if at least `requested` tickets remain.
    pub fn has_capacity(&self, requested: u32) -> bool {
        self.available_tickets >= requested
    }

    /// Returns true if no tickets remain.
    pub fn is_sold_out(&self) -> bool {
        self.available_tickets == 0
    }

    /// Clamps `available_tickets` to `total_tickets`.
    ///
    /// Not expected in normal operation; guards the upper bound of the
    /// inventory invariant before the record is persisted.
    pub(crate) fn clamp_available(&mut self) {
        if self.available_tickets > self.total_tickets {
            self.available_tickets = self.total_tickets;
        }
    }
}

/// Parameters for registering a new event in the ledger.
#[derive(Debug, Clone, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub location: String,
    #[serde(default)]
    pub category: EventCategory,
    pub price: Money,
    pub total_tickets: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(total: u32, available: u32) -> EventRecord {
        EventRecord {
            id: EventId::new(),
            title: "Rust Conf".to_string(),
            description: "A conference about Rust".to_string(),
            location: "Berlin".to_string(),
            category: EventCategory::Conference,
            price: Money::from_cents(5000),
            total_tickets: total,
            available_tickets: available,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn capacity_check() {
        let event = record(100, 5);
        assert!(event.has_capacity(5));
        assert!(!event.has_capacity(6));
    }

    #[test]
    fn sold_out() {
        assert!(record(10, 0).is_sold_out());
        assert!(!record(10, 1).is_sold_out());
    }

    #[test]
    fn clamp_restores_invariant() {
        let mut event = record(10, 15);
        event.clamp_available();
        assert_eq!(event.available_tickets, 10);
    }

    #[test]
    fn category_display() {
        assert_eq!(EventCategory::Concert.to_string(), "Concert");
        assert_eq!(EventCategory::default(), EventCategory::Other);
    }
}
