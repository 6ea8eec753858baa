//! # Customer Repository
//!
//! Database operations for customers.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use reel_core::validation::validate_new_customer;
use reel_core::{Customer, CustomerId, NewCustomer};

/// Columns selected for every `Customer` row.
pub(crate) const CUSTOMER_COLUMNS: &str =
    "id, name, phone, postal_code, registered_at, videos_checked_out_count, updated_at";

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Inserts a new customer and returns it with its assigned id.
    ///
    /// `registered_at` is set to now.
    pub async fn insert(&self, customer: &NewCustomer) -> DbResult<Customer> {
        validate_new_customer(customer)?;

        debug!(name = %customer.name, "Inserting customer");

        let now = Utc::now();
        let sql = format!(
            "INSERT INTO customers (
                name, phone, postal_code, registered_at,
                videos_checked_out_count, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?4)
            RETURNING {CUSTOMER_COLUMNS}"
        );

        let stored = sqlx::query_as::<_, Customer>(&sql)
            .bind(&customer.name)
            .bind(&customer.phone)
            .bind(&customer.postal_code)
            .bind(now)
            .bind(customer.videos_checked_out_count)
            .fetch_one(&self.pool)
            .await?;

        Ok(stored)
    }

    /// Gets a customer by id.
    pub async fn get_by_id(&self, id: CustomerId) -> DbResult<Option<Customer>> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ?1");

        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(customer)
    }

    /// Lists customers in registration order.
    pub async fn list(&self, limit: u32) -> DbResult<Vec<Customer>> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY id LIMIT ?1");

        let customers = sqlx::query_as::<_, Customer>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(customers)
    }

    /// Counts total customers (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();

        let mut new_customer = NewCustomer::named("Shelley Rocha");
        new_customer.phone = Some("(322) 510-8695".to_string());
        new_customer.postal_code = Some("24309".to_string());

        let stored = repo.insert(&new_customer).await.unwrap();
        assert_eq!(stored.videos_checked_out_count, 0);

        let fetched = repo.get_by_id(stored.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Shelley Rocha");
        assert_eq!(fetched.phone.as_deref(), Some("(322) 510-8695"));
        assert_eq!(fetched.postal_code.as_deref(), Some("24309"));

        assert!(repo.get_by_id(CustomerId(-3)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_rejects_blank_name() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err = db.customers().insert(&NewCustomer::named(" ")).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
        assert_eq!(db.customers().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_in_registration_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();
        repo.insert(&NewCustomer::named("Shelley Rocha")).await.unwrap();
        repo.insert(&NewCustomer::named("Curran Stout")).await.unwrap();

        let names: Vec<String> = repo.list(10).await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Shelley Rocha", "Curran Stout"]);
    }
}
