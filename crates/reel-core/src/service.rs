//! # Rental Service
//!
//! Runs the [`rental`](crate::rental) rules against an injected store.
//!
//! ## Check-Out Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  check_out(customer_id, video_id)                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  store.begin() ──────────────────────────────── one unit of work       │
//! │       │                                                                 │
//! │       ├── find_customer ── None? → NotFound (tx dropped, no writes)    │
//! │       ├── find_video    ── None? → NotFound                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  rental::check_out ── available would go < 0? → Validation             │
//! │       │                                                                 │
//! │       ├── update_video_inventory   (available - 1)                     │
//! │       ├── update_customer_count    (count + 1)                         │
//! │       ├── insert_rental            (due = today + 7)                   │
//! │       ▼                                                                 │
//! │  commit() ── all three effects land together                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Check-in follows the same shape, closing the oldest open ledger entry
//! for the pair instead of inserting one.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::error::{RentalError, RentalResult};
use crate::rental;
use crate::store::RentalStore;
use crate::types::{CustomerId, Rental, VideoId};

/// Result of a successful check-out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutReceipt {
    /// The new, open ledger entry.
    pub rental: Rental,
    pub videos_checked_out_count: i64,
    pub available_inventory: i64,
}

impl CheckOutReceipt {
    #[inline]
    pub fn due_date(&self) -> NaiveDate {
        self.rental.due_date
    }
}

/// Result of a successful check-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckInReceipt {
    pub customer_id: CustomerId,
    pub video_id: VideoId,
    /// The ledger entry, now closed.
    pub rental: Rental,
    pub videos_checked_out_count: i64,
    pub available_inventory: i64,
}

/// Creates and closes ledger entries, keeping both counters in step.
#[derive(Clone)]
pub struct RentalService {
    store: Arc<dyn RentalStore>,
    clock: Arc<dyn Clock>,
}

impl RentalService {
    pub fn new(store: Arc<dyn RentalStore>, clock: Arc<dyn Clock>) -> Self {
        RentalService { store, clock }
    }

    /// A service dated by the system clock (UTC).
    pub fn with_system_clock(store: Arc<dyn RentalStore>) -> Self {
        Self::new(store, Arc::new(SystemClock))
    }

    /// Lends one copy of `video_id` to `customer_id`.
    ///
    /// ## Errors
    /// - `NotFound` if either id does not resolve
    /// - `Validation` if no copy is available
    /// - `Store` if the store fails; nothing is persisted
    pub async fn check_out(&self, customer_id: CustomerId, video_id: VideoId) -> RentalResult<CheckOutReceipt> {
        debug!(customer_id = %customer_id, video_id = %video_id, "check_out");

        let today = self.clock.today();
        let mut tx = self.store.begin().await?;

        let customer = tx
            .find_customer(customer_id)
            .await?
            .ok_or_else(|| RentalError::not_found("Customer", customer_id))?;
        let video = tx
            .find_video(video_id)
            .await?
            .ok_or_else(|| RentalError::not_found("Video", video_id))?;

        let outcome = rental::check_out(&customer, &video, today)?;

        tx.update_video_inventory(video.id, video.available_inventory, outcome.available_inventory)
            .await?;
        tx.update_customer_count(
            customer.id,
            customer.videos_checked_out_count,
            outcome.videos_checked_out_count,
        )
        .await?;
        let rental = tx.insert_rental(&outcome.rental).await?;
        tx.commit().await?;

        info!(
            rental_id = %rental.id,
            customer_id = %customer_id,
            video_id = %video_id,
            due_date = %rental.due_date,
            available_inventory = outcome.available_inventory,
            "Video checked out"
        );

        Ok(CheckOutReceipt {
            rental,
            videos_checked_out_count: outcome.videos_checked_out_count,
            available_inventory: outcome.available_inventory,
        })
    }

    /// Takes back a copy of `video_id` from `customer_id`.
    ///
    /// ## Errors
    /// - `NotFound` if either id does not resolve, or the customer has no
    ///   open rental of this video
    /// - `Validation` if the customer's count would go negative
    /// - `Store` if the store fails; nothing is persisted
    pub async fn check_in(&self, customer_id: CustomerId, video_id: VideoId) -> RentalResult<CheckInReceipt> {
        debug!(customer_id = %customer_id, video_id = %video_id, "check_in");

        let today = self.clock.today();
        let mut tx = self.store.begin().await?;

        let customer = tx
            .find_customer(customer_id)
            .await?
            .ok_or_else(|| RentalError::not_found("Customer", customer_id))?;
        let video = tx
            .find_video(video_id)
            .await?
            .ok_or_else(|| RentalError::not_found("Video", video_id))?;
        let open = tx
            .find_open_rental(customer_id, video_id)
            .await?
            .ok_or_else(|| {
                RentalError::not_found("Rental", format!("customer {customer_id}, video {video_id}"))
            })?;

        let outcome = rental::check_in(&customer, &video, &open, today)?;

        tx.update_video_inventory(video.id, video.available_inventory, outcome.available_inventory)
            .await?;
        tx.update_customer_count(
            customer.id,
            customer.videos_checked_out_count,
            outcome.videos_checked_out_count,
        )
        .await?;
        tx.close_rental(open.id, outcome.checkin_date).await?;
        tx.commit().await?;

        info!(
            rental_id = %open.id,
            customer_id = %customer_id,
            video_id = %video_id,
            available_inventory = outcome.available_inventory,
            "Video checked in"
        );

        let mut rental = open;
        rental.checkin_date = Some(outcome.checkin_date);

        Ok(CheckInReceipt {
            customer_id,
            video_id,
            rental,
            videos_checked_out_count: outcome.videos_checked_out_count,
            available_inventory: outcome.available_inventory,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
