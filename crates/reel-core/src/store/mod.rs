//! # Store Port
//!
//! The persistence seam [`RentalService`](crate::service::RentalService)
//! is built on. The service never looks records up through a global
//! registry: it is handed a [`RentalStore`] and does all of its reads and
//! writes through one [`RentalTransaction`] per operation.
//!
//! ## Unit of Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  store.begin() ──► RentalTransaction                                   │
//! │                      ├── find_customer / find_video / find_open_rental │
//! │                      ├── insert_rental / close_rental                  │
//! │                      ├── update_video_inventory                        │
//! │                      ├── update_customer_count                         │
//! │                      └── commit()  ── all writes become visible        │
//! │                                                                         │
//! │  Dropped without commit() ── every write is discarded                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Optimistic Counter Writes
//! Counter updates carry the value the transaction read. If the stored
//! value has moved since, the write fails with [`StoreError::Conflict`](crate::error::StoreError::Conflict)
//! instead of overwriting someone else's update.
//!
//! ## Implementations
//! - [`MemoryRentalStore`] - mutex-guarded maps, for tests and demos
//! - `SqliteRentalStore` in reel-db - one sqlx transaction per unit of work

pub mod memory;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::StoreResult;
use crate::types::{Customer, CustomerId, NewRental, Rental, RentalId, Video, VideoId};

pub use memory::MemoryRentalStore;

/// Opens units of work against a rental store.
#[async_trait]
pub trait RentalStore: Send + Sync {
    /// Starts a transaction. Nothing it writes is visible until `commit`.
    async fn begin(&self) -> StoreResult<Box<dyn RentalTransaction>>;
}

/// One unit of work. Dropping it without calling [`commit`](Self::commit)
/// rolls every write back.
#[async_trait]
pub trait RentalTransaction: Send {
    async fn find_customer(&mut self, id: CustomerId) -> StoreResult<Option<Customer>>;

    async fn find_video(&mut self, id: VideoId) -> StoreResult<Option<Video>>;

    /// The oldest open ledger entry for this customer and video.
    async fn find_open_rental(
        &mut self,
        customer_id: CustomerId,
        video_id: VideoId,
    ) -> StoreResult<Option<Rental>>;

    /// Inserts a ledger entry and returns it with its assigned id.
    async fn insert_rental(&mut self, rental: &NewRental) -> StoreResult<Rental>;

    /// Sets `checkin_date` on an open ledger entry.
    async fn close_rental(&mut self, id: RentalId, checkin_date: NaiveDate) -> StoreResult<()>;

    /// Sets `available_inventory` to `new` if it still equals `expected`.
    async fn update_video_inventory(&mut self, id: VideoId, expected: i64, new: i64) -> StoreResult<()>;

    /// Sets `videos_checked_out_count` to `new` if it still equals `expected`.
    async fn update_customer_count(&mut self, id: CustomerId, expected: i64, new: i64) -> StoreResult<()>;

    /// Makes every write of this transaction visible.
    async fn commit(self: Box<Self>) -> StoreResult<()>;
}
