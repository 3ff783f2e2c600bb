//! # Dashboard Repository
//!
//! Read-only aggregates for the dashboard. All figures are read on one
//! connection.

use chrono::Local;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use khata_core::stats::{sales_window, SalesWindow};
use khata_core::{DashboardStats, InvoiceStatus, InvoiceStatusCounts, Money};

#[derive(Debug, Clone)]
pub struct DashboardRepository {
    pool: SqlitePool,
}

impl DashboardRepository {
    pub fn new(pool: SqlitePool) -> Self {
        DashboardRepository { pool }
    }

    /// Stats for the current local day and month.
    pub async fn stats(&self) -> DbResult<DashboardStats> {
        self.stats_for(sales_window(&Local::now())).await
    }

    /// Stats for an explicit sales window.
    pub async fn stats_for(&self, window: SalesWindow) -> DbResult<DashboardStats> {
        let mut conn = self.pool.acquire().await?;

        let today_sales = paid_total(&mut conn, &window, true).await?;
        let monthly_sales = paid_total(&mut conn, &window, false).await?;

        let total_customers: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&mut *conn)
            .await?;
        let total_items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&mut *conn)
            .await?;
        let low_stock_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM items WHERE stock <= reorder_level")
                .fetch_one(&mut *conn)
                .await?;

        let invoice_status_counts = status_counts(&mut conn).await?;

        debug!(
            today_sales = %today_sales,
            monthly_sales = %monthly_sales,
            "Dashboard stats computed"
        );

        Ok(DashboardStats {
            today_sales,
            monthly_sales,
            total_customers,
            total_items,
            low_stock_count,
            invoice_status_counts,
        })
    }
}

/// Sum of paid invoice totals in the day window, or since the start of the
/// month when `today_only` is false.
async fn paid_total(
    conn: &mut SqliteConnection,
    window: &SalesWindow,
    today_only: bool,
) -> DbResult<Money> {
    let (from, until) = if today_only {
        (window.day_start, Some(window.day_end))
    } else {
        (window.month_start, None)
    };

    let paise: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(total), 0) FROM invoices
         WHERE status = ?1 AND date >= ?2 AND (?3 IS NULL OR date < ?3)",
    )
    .bind(InvoiceStatus::Paid)
    .bind(from)
    .bind(until)
    .fetch_one(&mut *conn)
    .await?;

    Ok(Money::from_paise(paise))
}

async fn status_counts(conn: &mut SqliteConnection) -> DbResult<InvoiceStatusCounts> {
    let rows: Vec<(InvoiceStatus, i64)> =
        sqlx::query_as("SELECT status, COUNT(*) FROM invoices GROUP BY status")
            .fetch_all(&mut *conn)
            .await?;

    let mut counts = InvoiceStatusCounts::default();
    for (status, count) in rows {
        match status {
            InvoiceStatus::Paid => counts.paid = count,
            InvoiceStatus::Pending => counts.pending = count,
            InvoiceStatus::Overdue => counts.overdue = count,
            InvoiceStatus::Draft => counts.draft = count,
        }
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{customer, invoice, item, test_db};
    use crate::Database;
    use chrono::{DateTime, Utc};

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    async fn invoice_on(db: &Database, customer_id: &str, status: InvoiceStatus, date: &str) {
        let mut new = invoice(customer_id, status);
        new.date = Some(at(date));
        db.invoices().create(&new).await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_database() {
        let db = test_db().await;
        let stats = db.dashboard().stats().await.unwrap();

        assert_eq!(stats, DashboardStats::default());
    }

    #[tokio::test]
    async fn test_sales_only_count_paid_invoices_in_window() {
        let db = test_db().await;
        let c = customer(&db, "Acme").await;

        invoice_on(&db, &c.id, InvoiceStatus::Paid, "2024-03-15T09:00:00Z").await;
        invoice_on(&db, &c.id, InvoiceStatus::Pending, "2024-03-15T09:30:00Z").await;
        invoice_on(&db, &c.id, InvoiceStatus::Paid, "2024-03-02T12:00:00Z").await;
        invoice_on(&db, &c.id, InvoiceStatus::Paid, "2024-02-28T12:00:00Z").await;
        invoice_on(&db, &c.id, InvoiceStatus::Draft, "2024-03-15T11:00:00Z").await;

        let window = sales_window(&at("2024-03-15T10:00:00Z"));
        let stats = db.dashboard().stats_for(window).await.unwrap();

        assert_eq!(stats.today_sales.to_string(), "354.00");
        assert_eq!(stats.monthly_sales.to_string(), "708.00");
        assert_eq!(
            stats.invoice_status_counts,
            InvoiceStatusCounts {
                paid: 3,
                pending: 1,
                overdue: 0,
                draft: 1,
            }
        );
        assert_eq!(stats.total_customers, 1);
    }

    #[tokio::test]
    async fn test_counts_items_and_low_stock() {
        let db = test_db().await;
        item(&db, "Plenty", 50).await;
        item(&db, "At reorder level", 10).await;
        item(&db, "Empty", 0).await;

        let stats = db.dashboard().stats().await.unwrap();

        assert_eq!(stats.total_items, 3);
        assert_eq!(stats.low_stock_count, 2);
    }
}
