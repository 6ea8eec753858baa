//! In-memory [`RentalStore`].
//!
//! Intended for tests and demos. A transaction holds the store's mutex for
//! its whole lifetime and works on a private copy of the maps; `commit`
//! swaps the copy in, dropping the transaction throws it away.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{RentalStore, RentalTransaction};
use crate::error::{StoreError, StoreResult, ValidationErrors};
use crate::types::{
    Customer, CustomerId, NewCustomer, NewRental, NewVideo, Rental, RentalId, Video, VideoId,
};
use crate::validation::{validate_new_customer, validate_new_video};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    videos: BTreeMap<VideoId, Video>,
    customers: BTreeMap<CustomerId, Customer>,
    rentals: BTreeMap<RentalId, Rental>,
    last_video_id: i64,
    last_customer_id: i64,
    last_rental_id: i64,
}

/// Mutex-guarded maps implementing the store port.
#[derive(Debug, Clone, Default)]
pub struct MemoryRentalStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryRentalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and stores a video, assigning the next id.
    pub async fn add_video(&self, video: NewVideo) -> Result<Video, ValidationErrors> {
        validate_new_video(&video)?;

        let mut state = self.state.lock().await;
        state.last_video_id += 1;
        let now = Utc::now();
        let stored = Video {
            id: VideoId(state.last_video_id),
            title: video.title,
            overview: video.overview,
            release_date: video.release_date,
            image_url: video.image_url,
            total_inventory: video.total_inventory,
            available_inventory: video.available_inventory,
            created_at: now,
            updated_at: now,
        };
        state.videos.insert(stored.id, stored.clone());
        Ok(stored)
    }

    /// Validates and stores a customer, assigning the next id.
    pub async fn add_customer(&self, customer: NewCustomer) -> Result<Customer, ValidationErrors> {
        validate_new_customer(&customer)?;

        let mut state = self.state.lock().await;
        state.last_customer_id += 1;
        let now = Utc::now();
        let stored = Customer {
            id: CustomerId(state.last_customer_id),
            name: customer.name,
            phone: customer.phone,
            postal_code: customer.postal_code,
            registered_at: now,
            videos_checked_out_count: customer.videos_checked_out_count,
            updated_at: now,
        };
        state.customers.insert(stored.id, stored.clone());
        Ok(stored)
    }

    pub async fn video(&self, id: VideoId) -> Option<Video> {
        self.state.lock().await.videos.get(&id).cloned()
    }

    pub async fn customer(&self, id: CustomerId) -> Option<Customer> {
        self.state.lock().await.customers.get(&id).cloned()
    }

    /// Every ledger entry, oldest first.
    pub async fn rentals(&self) -> Vec<Rental> {
        self.state.lock().await.rentals.values().cloned().collect()
    }

    /// Overwrites a video's shelf count outside any rental.
    pub async fn set_available_inventory(&self, id: VideoId, available: i64) -> bool {
        match self.state.lock().await.videos.get_mut(&id) {
            Some(video) => {
                video.available_inventory = available;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl RentalStore for MemoryRentalStore {
    async fn begin(&self) -> StoreResult<Box<dyn RentalTransaction>> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryTransaction { guard, working }))
    }
}

struct MemoryTransaction {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
}

#[async_trait]
impl RentalTransaction for MemoryTransaction {
    async fn find_customer(&mut self, id: CustomerId) -> StoreResult<Option<Customer>> {
        Ok(self.working.customers.get(&id).cloned())
    }

    async fn find_video(&mut self, id: VideoId) -> StoreResult<Option<Video>> {
        Ok(self.working.videos.get(&id).cloned())
    }

    async fn find_open_rental(
        &mut self,
        customer_id: CustomerId,
        video_id: VideoId,
    ) -> StoreResult<Option<Rental>> {
        Ok(self
            .working
            .rentals
            .values()
            .find(|r| r.customer_id == customer_id && r.video_id == video_id && r.is_open())
            .cloned())
    }

    async fn insert_rental(&mut self, rental: &NewRental) -> StoreResult<Rental> {
        self.working.last_rental_id += 1;
        let stored = Rental {
            id: RentalId(self.working.last_rental_id),
            customer_id: rental.customer_id,
            video_id: rental.video_id,
            checkout_date: rental.checkout_date,
            due_date: rental.due_date,
            checkin_date: None,
            created_at: Utc::now(),
        };
        self.working.rentals.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn close_rental(&mut self, id: RentalId, checkin_date: NaiveDate) -> StoreResult<()> {
        let rental = self
            .working
            .rentals
            .get_mut(&id)
            .filter(|r| r.is_open())
            .ok_or(StoreError::Missing {
                entity: "Rental",
                id: id.get(),
            })?;
        rental.checkin_date = Some(checkin_date);
        Ok(())
    }

    async fn update_video_inventory(&mut self, id: VideoId, expected: i64, new: i64) -> StoreResult<()> {
        let video = self.working.videos.get_mut(&id).ok_or(StoreError::Missing {
            entity: "Video",
            id: id.get(),
        })?;
        if video.available_inventory != expected {
            return Err(StoreError::Conflict {
                entity: "Video",
                id: id.get(),
            });
        }
        video.available_inventory = new;
        video.updated_at = Utc::now();
        Ok(())
    }

    async fn update_customer_count(&mut self, id: CustomerId, expected: i64, new: i64) -> StoreResult<()> {
        let customer = self.working.customers.get_mut(&id).ok_or(StoreError::Missing {
            entity: "Customer",
            id: id.get(),
        })?;
        if customer.videos_checked_out_count != expected {
            return Err(StoreError::Conflict {
                entity: "Customer",
                id: id.get(),
            });
        }
        customer.videos_checked_out_count = new;
        customer.updated_at = Utc::now();
        Ok(())
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let MemoryTransaction { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release() -> NaiveDate {
        NaiveDate::from_ymd_opt(2017, 6, 2).unwrap()
    }

    #[tokio::test]
    async fn test_add_assigns_sequential_ids() {
        let store = MemoryRentalStore::new();
        let a = store.add_video(NewVideo::new("Wonder Woman", release(), 5)).await.unwrap();
        let b = store.add_video(NewVideo::new("Black Widow", release(), 1)).await.unwrap();
        assert_eq!(a.id, VideoId(1));
        assert_eq!(b.id, VideoId(2));

        let c = store.add_customer(NewCustomer::named("Shelley Rocha")).await.unwrap();
        assert_eq!(c.id, CustomerId(1));
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_records() {
        let store = MemoryRentalStore::new();
        assert!(store.add_video(NewVideo::new("", release(), 5)).await.is_err());
        assert!(store.add_customer(NewCustomer::named("  ")).await.is_err());
    }

    #[tokio::test]
    async fn test_commit_publishes_writes() {
        let store = MemoryRentalStore::new();
        let video = store.add_video(NewVideo::new("Wonder Woman", release(), 5)).await.unwrap();

        let mut tx = store.begin().await.unwrap();
        tx.update_video_inventory(video.id, 5, 4).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(store.video(video.id).await.unwrap().available_inventory, 4);
    }

    #[tokio::test]
    async fn test_drop_discards_writes() {
        let store = MemoryRentalStore::new();
        let video = store.add_video(NewVideo::new("Wonder Woman", release(), 5)).await.unwrap();
        let customer = store.add_customer(NewCustomer::named("Shelley Rocha")).await.unwrap();

        {
            let mut tx = store.begin().await.unwrap();
            tx.update_video_inventory(video.id, 5, 4).await.unwrap();
            tx.insert_rental(&NewRental {
                customer_id: customer.id,
                video_id: video.id,
                checkout_date: release(),
                due_date: release(),
            })
            .await
            .unwrap();
        }

        assert_eq!(store.video(video.id).await.unwrap().available_inventory, 5);
        assert!(store.rentals().await.is_empty());
    }

    #[tokio::test]
    async fn test_stale_counter_write_conflicts() {
        let store = MemoryRentalStore::new();
        let video = store.add_video(NewVideo::new("Wonder Woman", release(), 5)).await.unwrap();

        let mut tx = store.begin().await.unwrap();
        let err = tx.update_video_inventory(video.id, 3, 2).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict { entity: "Video", .. }));
    }

    #[tokio::test]
    async fn test_close_rental_only_once() {
        let store = MemoryRentalStore::new();
        let video = store.add_video(NewVideo::new("Wonder Woman", release(), 5)).await.unwrap();
        let customer = store.add_customer(NewCustomer::named("Shelley Rocha")).await.unwrap();

        let mut tx = store.begin().await.unwrap();
        let rental = tx
            .insert_rental(&NewRental {
                customer_id: customer.id,
                video_id: video.id,
                checkout_date: release(),
                due_date: release(),
            })
            .await
            .unwrap();
        assert!(tx.find_open_rental(customer.id, video.id).await.unwrap().is_some());

        tx.close_rental(rental.id, release()).await.unwrap();
        assert!(tx.find_open_rental(customer.id, video.id).await.unwrap().is_none());
        assert!(tx.close_rental(rental.id, release()).await.is_err());
    }
}
