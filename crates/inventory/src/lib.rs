//! Inventory ledger for the ticket booking platform.
//!
//! Holds per-event ticket counts and exposes two operations to the
//! booking saga: an advisory availability check and a commit-decrement
//! that re-validates sufficiency at commit time. The in-memory ledger
//! performs check-and-decrement under a single write lock, so concurrent
//! bookings cannot drive the count below zero.

pub mod error;
pub mod ledger;
pub mod record;

pub use error::InventoryError;
pub use ledger::{AvailabilityCheck, InMemoryInventoryLedger, InventoryLedger};
pub use record::{EventCategory, EventRecord, NewEvent};
