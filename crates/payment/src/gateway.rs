//! Payment gateway trait and mock implementation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::{BookingId, Money};
use rand::Rng;
use tokio::sync::RwLock;

use crate::error::{PaymentError, Result};
use crate::record::Payment;

/// Trait for the payment processor consumed by the booking saga.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Charges `amount` for a booking.
    ///
    /// Success and failure both persist exactly one terminal payment
    /// record; failure is signalled to the caller, never swallowed.
    async fn pay(
        &self,
        booking_id: BookingId,
        amount: Money,
        method: &str,
    ) -> Result<Payment>;

    /// Returns all payment attempts recorded for a booking.
    async fn payments_for_booking(&self, booking_id: BookingId) -> Result<Vec<Payment>>;
}

/// Configuration for the mock gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Probability in `[0.0, 1.0]` that a charge succeeds.
    pub success_rate: f64,
    /// Simulated processing latency per charge.
    pub latency: Duration,
}

impl GatewayConfig {
    /// Loads configuration from environment variables, falling back to
    /// defaults (90% success, one second of simulated latency).
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            success_rate: std::env::var("PAYMENT_SUCCESS_RATE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.success_rate),
            latency: std::env::var("PAYMENT_LATENCY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.latency),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            success_rate: 0.9,
            latency: Duration::from_secs(1),
        }
    }
}

/// Mock payment gateway with a probabilistic outcome.
///
/// Simulates processing latency, then succeeds with the configured
/// probability. Records live in an in-memory store.
#[derive(Clone)]
pub struct MockPaymentGateway {
    config: GatewayConfig,
    payments: Arc<RwLock<Vec<Payment>>>,
}

impl MockPaymentGateway {
    /// Creates a gateway with the given configuration.
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            payments: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Creates a gateway whose charges always succeed, with no latency.
    pub fn always_succeed() -> Self {
        Self::new(GatewayConfig {
            success_rate: 1.0,
            latency: Duration::ZERO,
        })
    }

    /// Creates a gateway whose charges always fail, with no latency.
    pub fn always_fail() -> Self {
        Self::new(GatewayConfig {
            success_rate: 0.0,
            latency: Duration::ZERO,
        })
    }

    /// Returns the number of recorded payment attempts.
    pub async fn payment_count(&self) -> usize {
        self.payments.read().await.len()
    }

    fn mint_transaction_id() -> String {
        let millis = chrono::Utc::now().timestamp_millis();
        let nonce: u32 = rand::thread_rng().gen_range(0..10_000);
        format!("tx_{millis}_{nonce}")
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    #[tracing::instrument(skip(self))]
    async fn pay(
        &self,
        booking_id: BookingId,
        amount: Money,
        method: &str,
    ) -> Result<Payment> {
        if amount.is_negative() {
            return Err(PaymentError::InvalidAmount(amount.to_string()));
        }

        tokio::time::sleep(self.config.latency).await;
        metrics::counter!("payments_processed_total").increment(1);

        let successful = rand::thread_rng().gen_bool(self.config.success_rate.clamp(0.0, 1.0));
        if !successful {
            let record = Payment::failed(booking_id, amount, method);
            self.payments.write().await.push(record);

            metrics::counter!("payments_failed_total").increment(1);
            tracing::warn!(%booking_id, %amount, "payment declined");
            return Err(PaymentError::Declined { booking_id });
        }

        let record = Payment::completed(booking_id, amount, method, Self::mint_transaction_id());
        self.payments.write().await.push(record.clone());

        tracing::info!(%booking_id, %amount, payment_id = %record.id, "payment completed");
        Ok(record)
    }

    async fn payments_for_booking(&self, booking_id: BookingId) -> Result<Vec<Payment>> {
        Ok(self
            .payments
            .read()
            .await
            .iter()
            .filter(|p| p.booking_id == booking_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::PaymentStatus;

    #[tokio::test]
    async fn successful_charge_records_completed_payment() {
        let gateway = MockPaymentGateway::always_succeed();
        let booking_id = BookingId::new();

        let payment = gateway
            .pay(booking_id, Money::from_cents(5000), "credit_card")
            .await
            .unwrap();

        assert_eq!(payment.status, PaymentStatus::Completed);
        assert!(payment.transaction_id.as_deref().unwrap().starts_with("tx_"));
        assert_eq!(gateway.payment_count().await, 1);
    }

    #[tokio::test]
    async fn declined_charge_still_records_failed_payment() {
        let gateway = MockPaymentGateway::always_fail();
        let booking_id = BookingId::new();

        let result = gateway
            .pay(booking_id, Money::from_cents(5000), "credit_card")
            .await;
        assert!(matches!(result, Err(PaymentError::Declined { .. })));

        // The failed attempt is persisted, not swallowed.
        let records = gateway.payments_for_booking(booking_id).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, PaymentStatus::Failed);
        assert!(records[0].transaction_id.is_none());
    }

    #[tokio::test]
    async fn retry_creates_a_new_record() {
        let gateway = MockPaymentGateway::always_succeed();
        let booking_id = BookingId::new();
        let amount = Money::from_cents(1000);

        let first = gateway.pay(booking_id, amount, "credit_card").await.unwrap();
        let second = gateway.pay(booking_id, amount, "credit_card").await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(
            gateway.payments_for_booking(booking_id).await.unwrap().len(),
            2
        );
    }

    #[tokio::test]
    async fn negative_amount_is_rejected_without_a_record() {
        let gateway = MockPaymentGateway::always_succeed();
        let result = gateway
            .pay(BookingId::new(), Money::from_cents(-1), "credit_card")
            .await;
        assert!(matches!(result, Err(PaymentError::InvalidAmount(_))));
        assert_eq!(gateway.payment_count().await, 0);
    }
}
