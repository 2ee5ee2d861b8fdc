//! In-memory booking store.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::{BookingId, UserId};
use tokio::sync::RwLock;

use crate::booking::Booking;
use crate::error::{BookingError, Result};
use crate::status::BookingStatus;

/// Record store for bookings.
///
/// Persistence is an opaque key-value concern here; the orchestrator is
/// the only writer. `update` applies a mutation under the write lock so
/// a read-modify-write cannot interleave with another update.
#[derive(Clone, Default)]
pub struct BookingStore {
    bookings: Arc<RwLock<HashMap<BookingId, Booking>>>,
}

impl BookingStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Persists a new booking.
    pub async fn insert(&self, booking: Booking) {
        self.bookings.write().await.insert(booking.id, booking);
    }

    /// Looks up a booking by ID.
    pub async fn get(&self, id: BookingId) -> Option<Booking> {
        self.bookings.read().await.get(&id).cloned()
    }

    /// Applies a mutation to a stored booking and returns the result.
    pub async fn update<F>(&self, id: BookingId, mutate: F) -> Result<Booking>
    where
        F: FnOnce(&mut Booking) -> Result<()>,
    {
        let mut bookings = self.bookings.write().await;
        let booking = bookings
            .get_mut(&id)
            .ok_or(BookingError::BookingNotFound(id))?;
        mutate(booking)?;
        Ok(booking.clone())
    }

    /// Returns a user's bookings, newest first.
    pub async fn list_for_user(&self, user_id: UserId) -> Vec<Booking> {
        let mut bookings: Vec<_> = self
            .bookings
            .read()
            .await
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        bookings
    }

    /// Returns Pending bookings created at or before `cutoff`.
    pub async fn stale_pending(&self, cutoff: DateTime<Utc>) -> Vec<Booking> {
        self.bookings
            .read()
            .await
            .values()
            .filter(|b| b.status == BookingStatus::Pending && b.created_at <= cutoff)
            .cloned()
            .collect()
    }

    /// Returns the number of stored bookings.
    pub async fn count(&self) -> usize {
        self.bookings.read().await.len()
    }
}
