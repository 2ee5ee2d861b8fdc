//! Booking saga orchestrator.

use std::time::Duration;

use chrono::Utc;
use common::{BookingId, EventId, Principal};
use inventory::{InventoryError, InventoryLedger};
use messaging::{BOOKING_QUEUE, BookingNotification, BookingOutcomeStatus, NotificationChannel};
use payment::{Payment, PaymentError, PaymentGateway};

use crate::booking::Booking;
use crate::error::{BookingError, Result};
use crate::status::BookingStatus;
use crate::store::BookingStore;

/// Configuration for the booking orchestrator.
#[derive(Debug, Clone)]
pub struct BookingConfig {
    /// Payment method recorded on every charge.
    pub payment_method: String,
    /// Age after which a Pending booking is considered stranded and
    /// eligible for the reconciliation sweep.
    pub stale_after: Duration,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            payment_method: "credit_card".to_string(),
            stale_after: Duration::from_secs(15 * 60),
        }
    }
}

/// A confirmed booking together with its completed payment.
#[derive(Debug, Clone)]
pub struct BookingConfirmation {
    pub booking: Booking,
    pub payment: Payment,
}

/// Orchestrates the booking saga.
///
/// Steps, in order: availability check (advisory, no side effects on
/// failure) → event fetch for pricing → Pending booking record →
/// payment → on success Confirmed + inventory commit + notify-enqueue,
/// on decline Cancelled. Inventory is decremented only after payment
/// succeeds, so the decline path needs no inventory rollback.
#[derive(Clone)]
pub struct BookingService<L, P, C>
where
    L: InventoryLedger,
    P: PaymentGateway,
    C: NotificationChannel,
{
    ledger: L,
    gateway: P,
    channel: C,
    store: BookingStore,
    config: BookingConfig,
}

impl<L, P, C> BookingService<L, P, C>
where
    L: InventoryLedger,
    P: PaymentGateway,
    C: NotificationChannel,
{
    /// Creates a new orchestrator over its collaborators.
    pub fn new(ledger: L, gateway: P, channel: C, store: BookingStore, config: BookingConfig) -> Self {
        Self {
            ledger,
            gateway,
            channel,
            store,
            config,
        }
    }

    /// Runs the booking saga for one request.
    #[tracing::instrument(skip(self, principal), fields(user_id = %principal.user_id))]
    pub async fn create_booking(
        &self,
        principal: &Principal,
        event_id: EventId,
        tickets: u32,
        notes: Option<String>,
    ) -> Result<BookingConfirmation> {
        metrics::counter!("bookings_requested_total").increment(1);
        let saga_start = std::time::Instant::now();

        if tickets == 0 {
            return Err(BookingError::InvalidTicketCount);
        }

        // Step 1: advisory availability check. The only step with no
        // side effect on failure; commit re-validates later regardless.
        let check = match self.ledger.check_availability(event_id, tickets).await {
            Ok(check) => check,
            Err(InventoryError::EventNotFound(id)) => return Err(BookingError::EventNotFound(id)),
            Err(InventoryError::InvalidTicketCount) => return Err(BookingError::InvalidTicketCount),
            Err(e) => return Err(e.into()),
        };
        if !check.available {
            metrics::counter!("bookings_rejected_total", "reason" => "insufficient_inventory")
                .increment(1);
            return Err(BookingError::InsufficientInventory {
                requested: tickets,
                available: check.available_tickets,
            });
        }

        // Step 2: event metadata for pricing.
        let event = self
            .ledger
            .get_event(event_id)
            .await?
            .ok_or(BookingError::EventNotFound(event_id))?;
        let total_price = event.price.multiply(tickets);

        // Step 3: the Pending record. From here every failure must
        // leave the booking in a terminal status, or Pending at worst
        // (picked up by the stale sweep).
        let booking = Booking::pending(
            principal.user_id,
            &principal.email,
            event_id,
            tickets,
            total_price,
            notes,
        );
        let booking_id = booking.id;
        self.store.insert(booking).await;
        tracing::info!(%booking_id, %event_id, tickets, %total_price, "booking created");

        // Step 4: payment, then commit.
        match self
            .gateway
            .pay(booking_id, total_price, &self.config.payment_method)
            .await
        {
            Ok(payment) => {
                let payment_id = payment.id;
                let confirmed = self
                    .store
                    .update(booking_id, |b| b.confirm(payment_id))
                    .await?;

                // Payment is in hand, so a commit failure here leaves the
                // booking Confirmed and surfaces as a service error.
                self.ledger.commit_decrement(event_id, tickets).await?;

                self.enqueue_booking_notification(
                    &confirmed,
                    &event.title,
                    BookingOutcomeStatus::Confirmed,
                )
                .await;

                metrics::counter!("bookings_confirmed_total").increment(1);
                metrics::histogram!("booking_duration_seconds")
                    .record(saga_start.elapsed().as_secs_f64());
                tracing::info!(%booking_id, payment_id = %payment.id, "booking confirmed");

                Ok(BookingConfirmation {
                    booking: confirmed,
                    payment,
                })
            }
            Err(PaymentError::Declined { .. }) => {
                // Compensation path: inventory was never decremented, so
                // cancelling the booking fully undoes the saga.
                self.store.update(booking_id, |b| b.cancel()).await?;

                metrics::counter!("bookings_cancelled_total", "reason" => "payment_failed")
                    .increment(1);
                metrics::histogram!("booking_duration_seconds")
                    .record(saga_start.elapsed().as_secs_f64());
                tracing::warn!(%booking_id, "payment declined, booking cancelled");

                Err(BookingError::PaymentFailed { booking_id })
            }
            // Infrastructure failure: the booking stays Pending for the
            // reconciliation sweep rather than guessing an outcome.
            Err(e) => Err(e.into()),
        }
    }

    /// Cancels a booking on behalf of its owner.
    ///
    /// Cancelling an already-cancelled booking is rejected as a no-op.
    /// Inventory is never restored: ticket counts only move down.
    #[tracing::instrument(skip(self, principal), fields(user_id = %principal.user_id))]
    pub async fn cancel_booking(
        &self,
        principal: &Principal,
        booking_id: BookingId,
    ) -> Result<Booking> {
        let user_id = principal.user_id;
        let cancelled = self
            .store
            .update(booking_id, |b| {
                if b.user_id != user_id {
                    return Err(BookingError::NotOwner(booking_id));
                }
                if b.status == BookingStatus::Cancelled {
                    return Err(BookingError::AlreadyCancelled(booking_id));
                }
                b.cancel()
            })
            .await?;

        let event_title = self
            .ledger
            .get_event(cancelled.event_id)
            .await
            .ok()
            .flatten()
            .map(|e| e.title)
            .unwrap_or_default();
        self.enqueue_booking_notification(&cancelled, &event_title, BookingOutcomeStatus::Cancelled)
            .await;

        metrics::counter!("bookings_cancelled_total", "reason" => "user_requested").increment(1);
        tracing::info!(%booking_id, "booking cancelled");

        Ok(cancelled)
    }

    /// Looks up a booking, enforcing ownership.
    pub async fn get_booking(&self, principal: &Principal, booking_id: BookingId) -> Result<Booking> {
        let booking = self
            .store
            .get(booking_id)
            .await
            .ok_or(BookingError::BookingNotFound(booking_id))?;
        if booking.user_id != principal.user_id {
            return Err(BookingError::NotOwner(booking_id));
        }
        Ok(booking)
    }

    /// Lists the caller's bookings, newest first.
    pub async fn list_bookings(&self, principal: &Principal) -> Vec<Booking> {
        self.store.list_for_user(principal.user_id).await
    }

    /// Cancels Pending bookings older than the configured stale age.
    ///
    /// A crash between creating the Pending record and resolving payment
    /// strands the booking; an external reconciliation job calls this to
    /// resolve such rows. Returns the IDs that were swept.
    #[tracing::instrument(skip(self))]
    pub async fn sweep_stale(&self) -> Result<Vec<BookingId>> {
        let cutoff = Utc::now()
            - chrono::Duration::from_std(self.config.stale_after)
                .unwrap_or_else(|_| chrono::Duration::minutes(15));

        let mut swept = Vec::new();
        for stale in self.store.stale_pending(cutoff).await {
            let cancelled = self.store.update(stale.id, |b| b.cancel()).await?;

            let event_title = self
                .ledger
                .get_event(cancelled.event_id)
                .await
                .ok()
                .flatten()
                .map(|e| e.title)
                .unwrap_or_default();
            self.enqueue_booking_notification(
                &cancelled,
                &event_title,
                BookingOutcomeStatus::Cancelled,
            )
            .await;

            metrics::counter!("bookings_cancelled_total", "reason" => "stale_sweep").increment(1);
            tracing::warn!(booking_id = %stale.id, "stale pending booking swept");
            swept.push(stale.id);
        }
        Ok(swept)
    }

    /// Enqueues a booking notification, fire-and-forget.
    ///
    /// The booking and payment writes are already terminal by the time
    /// we get here, so an enqueue failure is logged and absorbed rather
    /// than unwinding the saga.
    async fn enqueue_booking_notification(
        &self,
        booking: &Booking,
        event_title: &str,
        status: BookingOutcomeStatus,
    ) {
        let message = BookingNotification {
            booking_id: booking.id,
            user_id: booking.user_id,
            user_email: booking.user_email.clone(),
            event_id: booking.event_id,
            event_title: event_title.to_string(),
            tickets: booking.tickets,
            status,
            timestamp: Utc::now(),
        };

        let publish = async {
            let payload = message.to_bytes()?;
            self.channel
                .publish(BOOKING_QUEUE, payload)
                .await
                .map_err(BookingError::from)
        };

        if let Err(e) = publish.await {
            metrics::counter!("booking_notifications_dropped_total").increment(1);
            tracing::warn!(booking_id = %booking.id, error = %e, "failed to enqueue notification");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{Money, UserId};
    use inventory::{InMemoryInventoryLedger, NewEvent};
    use messaging::InMemoryChannel;
    use payment::MockPaymentGateway;

    type TestService = BookingService<InMemoryInventoryLedger, MockPaymentGateway, InMemoryChannel>;

    fn principal() -> Principal {
        Principal {
            user_id: UserId::new(),
            email: "rider@example.com".to_string(),
            name: "Rider".to_string(),
        }
    }

    async fn setup(gateway: MockPaymentGateway) -> (TestService, InMemoryInventoryLedger, InMemoryChannel, EventId) {
        let ledger = InMemoryInventoryLedger::new();
        let channel = InMemoryChannel::new();
        let event = ledger
            .create_event(NewEvent {
                title: "Rust Conf".to_string(),
                description: "A conference about Rust".to_string(),
                location: "Berlin".to_string(),
                category: Default::default(),
                price: Money::from_cents(2500),
                total_tickets: 5,
            })
            .await
            .unwrap();

        let service = BookingService::new(
            ledger.clone(),
            gateway,
            channel.clone(),
            BookingStore::new(),
            BookingConfig::default(),
        );
        (service, ledger, channel, event.id)
    }

    #[tokio::test]
    async fn happy_path_confirms_and_decrements() {
        let (service, ledger, channel, event_id) = setup(MockPaymentGateway::always_succeed()).await;
        let user = principal();

        let confirmation = service
            .create_booking(&user, event_id, 3, None)
            .await
            .unwrap();

        assert_eq!(confirmation.booking.status, BookingStatus::Confirmed);
        assert_eq!(confirmation.booking.total_price, Money::from_cents(7500));
        assert_eq!(confirmation.payment.amount, Money::from_cents(7500));
        assert_eq!(
            confirmation.booking.payment_id,
            Some(confirmation.payment.id)
        );

        let event = ledger.get_event(event_id).await.unwrap().unwrap();
        assert_eq!(event.available_tickets, 2);
        assert_eq!(channel.queue_depth(BOOKING_QUEUE), 1);
    }

    #[tokio::test]
    async fn insufficient_inventory_writes_nothing() {
        let (service, ledger, channel, event_id) = setup(MockPaymentGateway::always_succeed()).await;
        let user = principal();

        let result = service.create_booking(&user, event_id, 6, None).await;
        assert!(matches!(
            result,
            Err(BookingError::InsufficientInventory {
                requested: 6,
                available: 5
            })
        ));

        // Rejected before any record was written.
        assert!(service.list_bookings(&user).await.is_empty());
        let event = ledger.get_event(event_id).await.unwrap().unwrap();
        assert_eq!(event.available_tickets, 5);
        assert_eq!(channel.queue_depth(BOOKING_QUEUE), 0);
    }

    #[tokio::test]
    async fn payment_failure_cancels_without_touching_inventory() {
        let (service, ledger, channel, event_id) = setup(MockPaymentGateway::always_fail()).await;
        let user = principal();

        let result = service.create_booking(&user, event_id, 2, None).await;
        let booking_id = match result {
            Err(BookingError::PaymentFailed { booking_id }) => booking_id,
            other => panic!("expected PaymentFailed, got {other:?}"),
        };

        let booking = service.get_booking(&user, booking_id).await.unwrap();
        assert_eq!(booking.status, BookingStatus::Cancelled);
        assert!(booking.payment_id.is_none());

        // Compensation never touches inventory: it was never decremented.
        let event = ledger.get_event(event_id).await.unwrap().unwrap();
        assert_eq!(event.available_tickets, 5);
        // No confirmation notification either.
        assert_eq!(channel.queue_depth(BOOKING_QUEUE), 0);
    }

    #[tokio::test]
    async fn zero_tickets_rejected_before_any_call() {
        let (service, _, _, event_id) = setup(MockPaymentGateway::always_succeed()).await;
        let result = service.create_booking(&principal(), event_id, 0, None).await;
        assert!(matches!(result, Err(BookingError::InvalidTicketCount)));
    }

    #[tokio::test]
    async fn unknown_event_rejected() {
        let (service, _, _, _) = setup(MockPaymentGateway::always_succeed()).await;
        let result = service
            .create_booking(&principal(), EventId::new(), 1, None)
            .await;
        assert!(matches!(result, Err(BookingError::EventNotFound(_))));
    }

    #[tokio::test]
    async fn cancel_requires_ownership() {
        let (service, _, _, event_id) = setup(MockPaymentGateway::always_succeed()).await;
        let owner = principal();
        let confirmation = service
            .create_booking(&owner, event_id, 1, None)
            .await
            .unwrap();

        let stranger = principal();
        let result = service
            .cancel_booking(&stranger, confirmation.booking.id)
            .await;
        assert!(matches!(result, Err(BookingError::NotOwner(_))));
    }

    #[tokio::test]
    async fn cancel_twice_reports_already_cancelled() {
        let (service, ledger, channel, event_id) = setup(MockPaymentGateway::always_succeed()).await;
        let user = principal();
        let confirmation = service
            .create_booking(&user, event_id, 2, None)
            .await
            .unwrap();
        let booking_id = confirmation.booking.id;

        let cancelled = service.cancel_booking(&user, booking_id).await.unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
        // One confirmation message, one cancellation message.
        assert_eq!(channel.queue_depth(BOOKING_QUEUE), 2);

        let result = service.cancel_booking(&user, booking_id).await;
        assert!(matches!(result, Err(BookingError::AlreadyCancelled(_))));

        // Terminal state unchanged, no extra notification, and
        // cancellation never restores inventory.
        let booking = service.get_booking(&user, booking_id).await.unwrap();
        assert_eq!(booking.status, BookingStatus::Cancelled);
        assert_eq!(channel.queue_depth(BOOKING_QUEUE), 2);
        let event = ledger.get_event(event_id).await.unwrap().unwrap();
        assert_eq!(event.available_tickets, 3);
    }

    #[tokio::test]
    async fn cancel_missing_booking() {
        let (service, _, _, _) = setup(MockPaymentGateway::always_succeed()).await;
        let result = service.cancel_booking(&principal(), BookingId::new()).await;
        assert!(matches!(result, Err(BookingError::BookingNotFound(_))));
    }

    #[tokio::test]
    async fn list_bookings_is_owner_scoped() {
        let (service, _, _, event_id) = setup(MockPaymentGateway::always_succeed()).await;
        let user = principal();
        service.create_booking(&user, event_id, 1, None).await.unwrap();
        service.create_booking(&user, event_id, 1, None).await.unwrap();

        assert_eq!(service.list_bookings(&user).await.len(), 2);
        assert_eq!(service.list_bookings(&principal()).await.len(), 0);
    }

    #[tokio::test]
    async fn sweep_cancels_stale_pending_bookings() {
        let ledger = InMemoryInventoryLedger::new();
        let channel = InMemoryChannel::new();
        let store = BookingStore::new();
        let service = BookingService::new(
            ledger,
            MockPaymentGateway::always_succeed(),
            channel.clone(),
            store.clone(),
            BookingConfig {
                stale_after: Duration::ZERO,
                ..Default::default()
            },
        );

        // A stranded Pending row, as if the process died mid-payment.
        let stranded = Booking::pending(
            UserId::new(),
            "rider@example.com",
            EventId::new(),
            2,
            Money::from_cents(1000),
            None,
        );
        let stranded_id = stranded.id;
        store.insert(stranded).await;

        let swept = service.sweep_stale().await.unwrap();
        assert_eq!(swept, vec![stranded_id]);
        assert_eq!(
            store.get(stranded_id).await.unwrap().status,
            BookingStatus::Cancelled
        );
        assert_eq!(channel.queue_depth(BOOKING_QUEUE), 1);

        // Second sweep finds nothing.
        assert!(service.sweep_stale().await.unwrap().is_empty());
    }
}
