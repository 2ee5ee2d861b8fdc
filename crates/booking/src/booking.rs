//! The booking record.

use chrono::{DateTime, Utc};
use common::{BookingId, EventId, Money, PaymentId, UserId};
use serde::{Deserialize, Serialize};

use crate::error::BookingError;
use crate::status::BookingStatus;

/// A single booking request and its lifecycle state.
///
/// Owned exclusively by the saga orchestrator: created Pending at the
/// start of a request and mutated only through [`confirm`](Self::confirm)
/// and [`cancel`](Self::cancel), which enforce the status machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub user_id: UserId,
    /// Denormalized from the principal so the cancellation and sweep
    /// paths can address notifications without an identity lookup.
    pub user_email: String,
    pub event_id: EventId,
    pub tickets: u32,
    pub total_price: Money,
    pub status: BookingStatus,
    pub payment_id: Option<PaymentId>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Creates a new Pending booking.
    pub fn pending(
        user_id: UserId,
        user_email: impl Into<String>,
        event_id: EventId,
        tickets: u32,
        total_price: Money,
        notes: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: BookingId::new(),
            user_id,
            user_email: user_email.into(),
            event_id,
            tickets,
            total_price,
            status: BookingStatus::Pending,
            payment_id: None,
            notes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Attaches the completed payment and confirms the booking.
    pub fn confirm(&mut self, payment_id: PaymentId) -> Result<(), BookingError> {
        if !self.status.can_confirm() {
            return Err(BookingError::InvalidStatusTransition {
                from: self.status,
                to: BookingStatus::Confirmed,
            });
        }
        self.payment_id = Some(payment_id);
        self.status = BookingStatus::Confirmed;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Cancels the booking.
    pub fn cancel(&mut self) -> Result<(), BookingError> {
        if !self.status.can_cancel() {
            return Err(BookingError::InvalidStatusTransition {
                from: self.status,
                to: BookingStatus::Cancelled,
            });
        }
        self.status = BookingStatus::Cancelled;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending() -> Booking {
        Booking::pending(
            UserId::new(),
            "rider@example.com",
            EventId::new(),
            2,
            Money::from_cents(5000),
            None,
        )
    }

    #[test]
    fn new_booking_is_pending() {
        let booking = pending();
        assert_eq!(booking.status, BookingStatus::Pending);
        assert!(booking.payment_id.is_none());
    }

    #[test]
    fn confirm_attaches_payment() {
        let mut booking = pending();
        let payment_id = PaymentId::new();
        booking.confirm(payment_id).unwrap();
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.payment_id, Some(payment_id));
    }

    #[test]
    fn cancel_from_pending_and_confirmed() {
        let mut booking = pending();
        booking.cancel().unwrap();
        assert_eq!(booking.status, BookingStatus::Cancelled);

        let mut booking = pending();
        booking.confirm(PaymentId::new()).unwrap();
        booking.cancel().unwrap();
        assert_eq!(booking.status, BookingStatus::Cancelled);
    }

    #[test]
    fn cancelled_is_final() {
        let mut booking = pending();
        booking.cancel().unwrap();

        assert!(matches!(
            booking.cancel(),
            Err(BookingError::InvalidStatusTransition { .. })
        ));
        assert!(matches!(
            booking.confirm(PaymentId::new()),
            Err(BookingError::InvalidStatusTransition { .. })
        ));
        assert_eq!(booking.status, BookingStatus::Cancelled);
    }

    #[test]
    fn confirmed_cannot_confirm_again() {
        let mut booking = pending();
        booking.confirm(PaymentId::new()).unwrap();
        assert!(booking.confirm(PaymentId::new()).is_err());
    }
}
