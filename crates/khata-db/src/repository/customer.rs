//! # Customer Repository
//!
//! Database operations for customers.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::new_id;
use khata_core::input::{CustomerPatch, NewCustomer};
use khata_core::Customer;

const COLUMNS: &str = "id, name, email, phone, address, gstin";

/// Repository for customer database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.customers();
/// let customer = repo.create(&new_customer).await?;
/// let same = repo.get(&customer.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Lists all customers ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {COLUMNS} FROM customers ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = customers.len(), "Listed customers");
        Ok(customers)
    }

    /// Gets a customer by id.
    pub async fn get(&self, id: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {COLUMNS} FROM customers WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Inserts a customer and returns the stored row.
    pub async fn create(&self, new: &NewCustomer) -> DbResult<Customer> {
        let id = new_id();
        debug!(id = %id, name = %new.name, "Creating customer");

        let customer = sqlx::query_as::<_, Customer>(&format!(
            "INSERT INTO customers (id, name, email, phone, address, gstin)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING {COLUMNS}"
        ))
        .bind(&id)
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.address)
        .bind(&new.gstin)
        .fetch_one(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Applies a partial update. `None` when the id is unknown.
    pub async fn update(&self, id: &str, patch: &CustomerPatch) -> DbResult<Option<Customer>> {
        debug!(id = %id, "Updating customer");

        let customer = sqlx::query_as::<_, Customer>(&format!(
            "UPDATE customers SET
                name = COALESCE(?2, name),
                email = COALESCE(?3, email),
                phone = COALESCE(?4, phone),
                address = COALESCE(?5, address),
                gstin = COALESCE(?6, gstin)
             WHERE id = ?1
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.email)
        .bind(&patch.phone)
        .bind(&patch.address)
        .bind(&patch.gstin)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Deletes a customer. `false` when the id is unknown.
    pub async fn delete(&self, id: &str) -> DbResult<bool> {
        debug!(id = %id, "Deleting customer");

        let result = sqlx::query("DELETE FROM customers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
