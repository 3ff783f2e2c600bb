//! # Payment Repository
//!
//! Money received. A payment may reference an invoice; recording one does
//! not change the invoice's status.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;
use crate::repository::new_id;
use khata_core::input::{NewPayment, PaymentPatch};
use khata_core::Payment;

const COLUMNS: &str = "id, invoice_id, amount, payment_mode, date, reference";

#[derive(Debug, Clone)]
pub struct PaymentRepository {
    pool: SqlitePool,
}

impl PaymentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        PaymentRepository { pool }
    }

    /// Lists payments, newest first, optionally for a single invoice.
    pub async fn list(&self, invoice_id: Option<&str>) -> DbResult<Vec<Payment>> {
        let payments = sqlx::query_as::<_, Payment>(&format!(
            "SELECT {COLUMNS} FROM payments
             WHERE ?1 IS NULL OR invoice_id = ?1
             ORDER BY date DESC"
        ))
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(invoice_id = ?invoice_id, count = payments.len(), "Listed payments");
        Ok(payments)
    }

    pub async fn get(&self, id: &str) -> DbResult<Option<Payment>> {
        let payment = sqlx::query_as::<_, Payment>(&format!(
            "SELECT {COLUMNS} FROM payments WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payment)
    }

    pub async fn create(&self, new: &NewPayment) -> DbResult<Payment> {
        let id = new_id();

        let payment = sqlx::query_as::<_, Payment>(&format!(
            "INSERT INTO payments (id, invoice_id, amount, payment_mode, date, reference)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING {COLUMNS}"
        ))
        .bind(&id)
        .bind(&new.invoice_id)
        .bind(new.amount)
        .bind(&new.payment_mode)
        .bind(new.date.unwrap_or_else(Utc::now))
        .bind(&new.reference)
        .fetch_one(&self.pool)
        .await?;

        info!(
            id = %payment.id,
            invoice_id = ?payment.invoice_id,
            amount = %payment.amount,
            "Payment recorded"
        );
        Ok(payment)
    }

    pub async fn update(&self, id: &str, patch: &PaymentPatch) -> DbResult<Option<Payment>> {
        debug!(id = %id, "Updating payment");

        let payment = sqlx::query_as::<_, Payment>(&format!(
            "UPDATE payments SET
                invoice_id = COALESCE(?2, invoice_id),
                amount = COALESCE(?3, amount),
                payment_mode = COALESCE(?4, payment_mode),
                date = COALESCE(?5, date),
                reference = COALESCE(?6, reference)
             WHERE id = ?1
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&patch.invoice_id)
        .bind(patch.amount)
        .bind(&patch.payment_mode)
        .bind(patch.date)
        .bind(&patch.reference)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payment)
    }

    pub async fn delete(&self, id: &str) -> DbResult<bool> {
        debug!(id = %id, "Deleting payment");

        let result = sqlx::query("DELETE FROM payments WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
