//! # SQLite Rental Store
//!
//! [`RentalStore`] over the SQLite pool. Each unit of work is one sqlx
//! transaction; dropping it uncommitted rolls every write back.
//!
//! ## Locking
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  begin()                                                               │
//! │    BEGIN                                                               │
//! │    claim write lock ── waits up to busy_timeout for other writers      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  reads see a snapshot no other writer can move underneath              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  UPDATE ... WHERE id = ? AND counter = <value read>                    │
//! │    0 rows and the row exists   → StoreError::Conflict                  │
//! │    0 rows and the row is gone  → StoreError::Missing                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  COMMIT                                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Without the early write lock, two deferred transactions that both read
//! before writing fail with `SQLITE_BUSY` instead of queueing.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, warn};

use reel_core::error::StoreResult;
use reel_core::{
    Customer, CustomerId, NewRental, Rental, RentalId, RentalStore, RentalTransaction, StoreError,
    Video, VideoId,
};

use crate::error::DbError;
use crate::repository::customer::CUSTOMER_COLUMNS;
use crate::repository::rental::RENTAL_COLUMNS;
use crate::repository::video::VIDEO_COLUMNS;

fn store_err(err: sqlx::Error) -> StoreError {
    DbError::from(err).into()
}

/// SQLite-backed [`RentalStore`].
#[derive(Debug, Clone)]
pub struct SqliteRentalStore {
    pool: SqlitePool,
}

impl SqliteRentalStore {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteRentalStore { pool }
    }
}

#[async_trait]
impl RentalStore for SqliteRentalStore {
    async fn begin(&self) -> StoreResult<Box<dyn RentalTransaction>> {
        let mut tx = self.pool.begin().await.map_err(store_err)?;

        // A write as the first statement upgrades the deferred transaction
        // to a write transaction before any snapshot is taken.
        sqlx::query("UPDATE videos SET id = id WHERE 0")
            .execute(&mut *tx)
            .await
            .map_err(store_err)?;

        Ok(Box::new(SqliteTransaction { tx }))
    }
}

/// One sqlx transaction.
struct SqliteTransaction {
    tx: Transaction<'static, Sqlite>,
}

impl SqliteTransaction {
    /// Tells a lost optimistic write (`Conflict`) apart from a vanished row.
    async fn stale_or_missing(&mut self, table: &str, entity: &'static str, id: i64) -> StoreError {
        let sql = format!("SELECT COUNT(*) FROM {table} WHERE id = ?1");
        let exists: Result<i64, sqlx::Error> = sqlx::query_scalar(&sql)
            .bind(id)
            .fetch_one(&mut *self.tx)
            .await;

        match exists {
            Ok(0) => StoreError::Missing { entity, id },
            Ok(_) => {
                warn!(entity, id, "Optimistic counter write lost");
                StoreError::Conflict { entity, id }
            }
            Err(e) => store_err(e),
        }
    }
}

#[async_trait]
impl RentalTransaction for SqliteTransaction {
    async fn find_customer(&mut self, id: CustomerId) -> StoreResult<Option<Customer>> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ?1");

        sqlx::query_as::<_, Customer>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(store_err)
    }

    async fn find_video(&mut self, id: VideoId) -> StoreResult<Option<Video>> {
        let sql = format!("SELECT {VIDEO_COLUMNS} FROM videos WHERE id = ?1");

        sqlx::query_as::<_, Video>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(store_err)
    }

    async fn find_open_rental(
        &mut self,
        customer_id: CustomerId,
        video_id: VideoId,
    ) -> StoreResult<Option<Rental>> {
        let sql = format!(
            "SELECT {RENTAL_COLUMNS} FROM rentals
            WHERE customer_id = ?1 AND video_id = ?2 AND checkin_date IS NULL
            ORDER BY id
            LIMIT 1"
        );

        sqlx::query_as::<_, Rental>(&sql)
            .bind(customer_id)
            .bind(video_id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(store_err)
    }

    async fn insert_rental(&mut self, rental: &NewRental) -> StoreResult<Rental> {
        debug!(
            customer_id = %rental.customer_id,
            video_id = %rental.video_id,
            due_date = %rental.due_date,
            "Inserting rental"
        );

        let sql = format!(
            "INSERT INTO rentals (customer_id, video_id, checkout_date, due_date, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING {RENTAL_COLUMNS}"
        );

        sqlx::query_as::<_, Rental>(&sql)
            .bind(rental.customer_id)
            .bind(rental.video_id)
            .bind(rental.checkout_date)
            .bind(rental.due_date)
            .bind(Utc::now())
            .fetch_one(&mut *self.tx)
            .await
            .map_err(store_err)
    }

    async fn close_rental(&mut self, id: RentalId, checkin_date: NaiveDate) -> StoreResult<()> {
        debug!(rental_id = %id, checkin_date = %checkin_date, "Closing rental");

        let result = sqlx::query(
            "UPDATE rentals SET checkin_date = ?2 WHERE id = ?1 AND checkin_date IS NULL",
        )
        .bind(id)
        .bind(checkin_date)
        .execute(&mut *self.tx)
        .await
        .map_err(store_err)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Missing {
                entity: "Rental",
                id: id.get(),
            });
        }

        Ok(())
    }

    async fn update_video_inventory(&mut self, id: VideoId, expected: i64, new: i64) -> StoreResult<()> {
        debug!(video_id = %id, expected, new, "Updating available inventory");

        let result = sqlx::query(
            "UPDATE videos SET available_inventory = ?3, updated_at = ?4
            WHERE id = ?1 AND available_inventory = ?2",
        )
        .bind(id)
        .bind(expected)
        .bind(new)
        .bind(Utc::now())
        .execute(&mut *self.tx)
        .await
        .map_err(store_err)?;

        if result.rows_affected() == 0 {
            return Err(self.stale_or_missing("videos", "Video", id.get()).await);
        }

        Ok(())
    }

    async fn update_customer_count(&mut self, id: CustomerId, expected: i64, new: i64) -> StoreResult<()> {
        debug!(customer_id = %id, expected, new, "Updating checked-out count");

        let result = sqlx::query(
            "UPDATE customers SET videos_checked_out_count = ?3, updated_at = ?4
            WHERE id = ?1 AND videos_checked_out_count = ?2",
        )
        .bind(id)
        .bind(expected)
        .bind(new)
        .bind(Utc::now())
        .execute(&mut *self.tx)
        .await
        .map_err(store_err)?;

        if result.rows_affected() == 0 {
            return Err(self.stale_or_missing("customers", "Customer", id.get()).await);
        }

        Ok(())
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.tx.commit().await.map_err(store_err)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use reel_core::clock::FixedClock;
    use reel_core::{NewCustomer, NewVideo, RentalError, RentalService};
    use std::sync::Arc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn seeded(copies: i64) -> (Database, Customer, Video) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customer = db.customers().insert(&NewCustomer::named("Shelley Rocha")).await.unwrap();
        let video = db
            .videos()
            .insert(&NewVideo::new("Wonder Woman", date(2017, 6, 2), copies))
            .await
            .unwrap();
        (db, customer, video)
    }

    fn service(db: &Database) -> RentalService {
        RentalService::new(db.rental_store(), Arc::new(FixedClock(date(2024, 5, 1))))
    }

    #[tokio::test]
    async fn test_commit_persists_writes() {
        let (db, customer, video) = seeded(3).await;
        let store = SqliteRentalStore::new(db.pool().clone());

        let mut tx = store.begin().await.unwrap();
        tx.update_video_inventory(video.id, 3, 2).await.unwrap();
        tx.update_customer_count(customer.id, 0, 1).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(db.videos().get_by_id(video.id).await.unwrap().unwrap().available_inventory, 2);
        let stored = db.customers().get_by_id(customer.id).await.unwrap().unwrap();
        assert_eq!(stored.videos_checked_out_count, 1);
    }

    #[tokio::test]
    async fn test_drop_rolls_back() {
        let (db, customer, video) = seeded(3).await;
        let store = SqliteRentalStore::new(db.pool().clone());

        {
            let mut tx = store.begin().await.unwrap();
            tx.update_video_inventory(video.id, 3, 2).await.unwrap();
            tx.insert_rental(&NewRental {
                customer_id: customer.id,
                video_id: video.id,
                checkout_date: date(2024, 5, 1),
                due_date: date(2024, 5, 8),
            })
            .await
            .unwrap();
        }

        assert_eq!(db.videos().get_by_id(video.id).await.unwrap().unwrap().available_inventory, 3);
        assert_eq!(db.rentals().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_stale_expected_value_conflicts() {
        let (db, customer, video) = seeded(3).await;
        let store = SqliteRentalStore::new(db.pool().clone());

        let mut tx = store.begin().await.unwrap();
        let err = tx.update_video_inventory(video.id, 2, 1).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict { entity: "Video", .. }));

        let err = tx.update_customer_count(customer.id, 4, 5).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict { entity: "Customer", .. }));

        let err = tx.update_video_inventory(VideoId(404), 0, 1).await.unwrap_err();
        assert!(matches!(err, StoreError::Missing { entity: "Video", id: 404 }));
    }

    #[tokio::test]
    async fn test_oldest_open_rental_is_found() {
        let (db, customer, video) = seeded(3).await;
        let store = SqliteRentalStore::new(db.pool().clone());
        let new_rental = NewRental {
            customer_id: customer.id,
            video_id: video.id,
            checkout_date: date(2024, 5, 1),
            due_date: date(2024, 5, 8),
        };

        let mut tx = store.begin().await.unwrap();
        let first = tx.insert_rental(&new_rental).await.unwrap();
        let second = tx.insert_rental(&new_rental).await.unwrap();
        assert!(first.is_open());

        let found = tx.find_open_rental(customer.id, video.id).await.unwrap().unwrap();
        assert_eq!(found.id, first.id);

        tx.close_rental(first.id, date(2024, 5, 2)).await.unwrap();
        let found = tx.find_open_rental(customer.id, video.id).await.unwrap().unwrap();
        assert_eq!(found.id, second.id);

        let err = tx.close_rental(first.id, date(2024, 5, 2)).await.unwrap_err();
        assert!(matches!(err, StoreError::Missing { entity: "Rental", .. }));
    }

    #[tokio::test]
    async fn test_service_check_out_and_in() {
        let (db, customer, video) = seeded(3).await;
        let service = service(&db);

        let out = service.check_out(customer.id, video.id).await.unwrap();
        assert_eq!(out.available_inventory, 2);
        assert_eq!(out.videos_checked_out_count, 1);
        assert_eq!(out.due_date(), date(2024, 5, 8));

        let stored = db.rentals().get_by_id(out.rental.id).await.unwrap().unwrap();
        assert_eq!(stored, out.rental);

        let back = service.check_in(customer.id, video.id).await.unwrap();
        assert_eq!(back.available_inventory, 3);
        assert_eq!(back.videos_checked_out_count, 0);

        let closed = db.rentals().get_by_id(out.rental.id).await.unwrap().unwrap();
        assert_eq!(closed.checkin_date, Some(date(2024, 5, 1)));
    }

    #[tokio::test]
    async fn test_service_failure_leaves_no_trace() {
        let (db, customer, video) = seeded(0).await;
        let service = service(&db);

        let err = service.check_out(customer.id, video.id).await.unwrap_err();
        assert!(matches!(err, RentalError::Validation(_)));

        let err = service.check_out(CustomerId(77), video.id).await.unwrap_err();
        assert!(matches!(err, RentalError::NotFound { .. }));

        assert_eq!(db.rentals().count().await.unwrap(), 0);
        let stored = db.customers().get_by_id(customer.id).await.unwrap().unwrap();
        assert_eq!(stored.videos_checked_out_count, 0);
    }

    #[tokio::test]
    async fn test_concurrent_check_outs_never_oversell() {
        let (db, customer, video) = seeded(3).await;
        let service = service(&db);

        let mut handles = Vec::new();
        for _ in 0..5 {
            let service = service.clone();
            let (customer_id, video_id) = (customer.id, video.id);
            handles.push(tokio::spawn(async move { service.check_out(customer_id, video_id).await }));
        }

        let mut succeeded = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => succeeded += 1,
                Err(RentalError::Validation(_)) => {}
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }

        assert_eq!(succeeded, 3);
        assert_eq!(db.videos().get_by_id(video.id).await.unwrap().unwrap().available_inventory, 0);
        assert_eq!(db.rentals().count_open().await.unwrap(), 3);
        let stored = db.customers().get_by_id(customer.id).await.unwrap().unwrap();
        assert_eq!(stored.videos_checked_out_count, 3);
    }
}
