//! # Rental Repository
//!
//! Read-side queries over the rental ledger.
//!
//! Ledger entries are only written by [`SqliteRentalStore`](crate::store::SqliteRentalStore),
//! inside the same transaction that moves the counters.

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use reel_core::{CustomerId, Rental, RentalId};

/// Columns selected for every `Rental` row.
pub(crate) const RENTAL_COLUMNS: &str =
    "id, customer_id, video_id, checkout_date, due_date, checkin_date, created_at";

/// Repository for ledger queries.
#[derive(Debug, Clone)]
pub struct RentalRepository {
    pool: SqlitePool,
}

impl RentalRepository {
    /// Creates a new RentalRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RentalRepository { pool }
    }

    /// Gets a ledger entry by id.
    pub async fn get_by_id(&self, id: RentalId) -> DbResult<Option<Rental>> {
        let sql = format!("SELECT {RENTAL_COLUMNS} FROM rentals WHERE id = ?1");

        let rental = sqlx::query_as::<_, Rental>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(rental)
    }

    /// Every ledger entry of a customer, oldest first.
    pub async fn list_for_customer(&self, customer_id: CustomerId) -> DbResult<Vec<Rental>> {
        let sql = format!("SELECT {RENTAL_COLUMNS} FROM rentals WHERE customer_id = ?1 ORDER BY id");

        let rentals = sqlx::query_as::<_, Rental>(&sql)
            .bind(customer_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rentals)
    }

    /// Entries a customer has not checked in yet, oldest first.
    pub async fn open_for_customer(&self, customer_id: CustomerId) -> DbResult<Vec<Rental>> {
        let sql = format!(
            "SELECT {RENTAL_COLUMNS} FROM rentals
            WHERE customer_id = ?1 AND checkin_date IS NULL
            ORDER BY id"
        );

        let rentals = sqlx::query_as::<_, Rental>(&sql)
            .bind(customer_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rentals)
    }

    /// Open entries whose due date is before `today`, most overdue first.
    pub async fn overdue(&self, today: NaiveDate) -> DbResult<Vec<Rental>> {
        let sql = format!(
            "SELECT {RENTAL_COLUMNS} FROM rentals
            WHERE checkin_date IS NULL AND due_date < ?1
            ORDER BY due_date, id"
        );

        let rentals = sqlx::query_as::<_, Rental>(&sql)
            .bind(today)
            .fetch_all(&self.pool)
            .await?;

        debug!(today = %today, count = rentals.len(), "Overdue rentals");
        Ok(rentals)
    }

    /// Counts open entries (copies currently out).
    pub async fn count_open(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rentals WHERE checkin_date IS NULL")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Counts every ledger entry.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rentals")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use reel_core::{NewCustomer, NewRental, NewVideo};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn seeded() -> (Database, CustomerId, Vec<Rental>) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customer = db.customers().insert(&NewCustomer::named("Shelley Rocha")).await.unwrap();
        let video = db
            .videos()
            .insert(&NewVideo::new("Wonder Woman", date(2017, 6, 2), 5))
            .await
            .unwrap();

        let store = db.rental_store();
        let mut tx = store.begin().await.unwrap();
        let mut rentals = Vec::new();
        for (checkout, due) in [(date(2024, 4, 1), date(2024, 4, 8)), (date(2024, 5, 1), date(2024, 5, 8))] {
            let rental = tx
                .insert_rental(&NewRental {
                    customer_id: customer.id,
                    video_id: video.id,
                    checkout_date: checkout,
                    due_date: due,
                })
                .await
                .unwrap();
            rentals.push(rental);
        }
        tx.close_rental(rentals[1].id, date(2024, 5, 3)).await.unwrap();
        tx.commit().await.unwrap();

        (db, customer.id, rentals)
    }

    #[tokio::test]
    async fn test_open_and_all_for_customer() {
        let (db, customer_id, rentals) = seeded().await;
        let repo = db.rentals();

        let all = repo.list_for_customer(customer_id).await.unwrap();
        assert_eq!(all.len(), 2);

        let open = repo.open_for_customer(customer_id).await.unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id, rentals[0].id);

        let closed = repo.get_by_id(rentals[1].id).await.unwrap().unwrap();
        assert_eq!(closed.checkin_date, Some(date(2024, 5, 3)));

        assert_eq!(repo.count().await.unwrap(), 2);
        assert_eq!(repo.count_open().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_overdue_only_lists_open_past_due() {
        let (db, _, rentals) = seeded().await;
        let repo = db.rentals();

        assert!(repo.overdue(date(2024, 4, 8)).await.unwrap().is_empty());

        let overdue = repo.overdue(date(2024, 6, 1)).await.unwrap();
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].id, rentals[0].id);
        assert!(overdue[0].is_overdue(date(2024, 6, 1)));
    }
}
