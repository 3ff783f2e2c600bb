//! # Invoice Repository
//!
//! Invoice headers, their line items, numbering, and the one composite
//! write in the system: invoice creation with stock adjustment.
//!
//! ## Invoice Creation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    create_with_items(invoice, lines)                    │
//! │                                                                         │
//! │  BEGIN IMMEDIATE                                                        │
//! │    │                                                                    │
//! │    ├── invoice_number missing? ──► next number (read inside the tx)     │
//! │    ├── INSERT invoices                                                  │
//! │    ├── INSERT invoice_items × N      (stamped with the new invoice id)  │
//! │    └── status != draft?                                                 │
//! │          └── adjust_stock(out, qty, "INV-NNN") × N                      │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any error drops the transaction: no invoice, no lines, no stock row.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Status changes through [`InvoiceRepository::update`] never move stock.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::DbResult;
use crate::repository::new_id;
use crate::repository::stock::adjust_stock;
use khata_core::input::{InvoicePatch, NewInvoice, NewInvoiceLineItem, NewStockTransaction};
use khata_core::numbering::next_invoice_number;
use khata_core::{CoreError, Invoice, InvoiceLineItem, StockMovement};

const COLUMNS: &str = "id, invoice_number, customer_id, date, due_date, subtotal, discount, \
                       tax, total, status, payment_mode, notes";

const LINE_COLUMNS: &str = "id, invoice_id, item_id, description, quantity, rate, tax_rate, amount";

/// Repository for invoices and their line items.
///
/// ## Usage
/// ```rust,ignore
/// let number = db.invoices().next_invoice_number().await?;
/// let invoice = db.invoices().create_with_items(&header, &lines).await?;
/// let lines = db.invoices().items_for(&invoice.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
}

impl InvoiceRepository {
    /// Creates a new InvoiceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceRepository { pool }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Lists invoices, newest first.
    pub async fn list(&self) -> DbResult<Vec<Invoice>> {
        let invoices = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {COLUMNS} FROM invoices ORDER BY date DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = invoices.len(), "Listed invoices");
        Ok(invoices)
    }

    /// Gets an invoice by id.
    pub async fn get(&self, id: &str) -> DbResult<Option<Invoice>> {
        let mut conn = self.pool.acquire().await?;
        fetch_invoice(&mut conn, id).await
    }

    /// Line items of an invoice, in insertion order.
    ///
    /// An unknown invoice id yields an empty list.
    pub async fn items_for(&self, invoice_id: &str) -> DbResult<Vec<InvoiceLineItem>> {
        let items = sqlx::query_as::<_, InvoiceLineItem>(&format!(
            "SELECT {LINE_COLUMNS} FROM invoice_items WHERE invoice_id = ?1 ORDER BY rowid"
        ))
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// The number the next invoice should carry.
    ///
    /// ## Ordering
    /// The greatest stored number is taken by length first, then text, so
    /// `INV-1000` follows `INV-999` instead of sorting before it.
    pub async fn next_invoice_number(&self) -> DbResult<String> {
        let mut conn = self.pool.acquire().await?;
        next_number(&mut conn).await
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Creates an invoice without line items.
    pub async fn create(&self, invoice: &NewInvoice) -> DbResult<Invoice> {
        self.create_with_items(invoice, &[]).await
    }

    /// Creates an invoice and its line items atomically.
    ///
    /// ## Steps
    /// 1. Assign the next invoice number if none was given
    /// 2. Insert the invoice row
    /// 3. Insert every line item against the new invoice id
    /// 4. Unless the invoice is a draft, record one stock-out per line and
    ///    decrement the item's stock
    /// 5. Commit
    ///
    /// ## Errors
    /// Any failure rolls back every write above.
    pub async fn create_with_items(
        &self,
        invoice: &NewInvoice,
        lines: &[NewInvoiceLineItem],
    ) -> DbResult<Invoice> {
        let total = invoice.resolved_total().map_err(CoreError::from)?;

        // The number is read before the insert, so take the write lock first.
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        let invoice_number = match &invoice.invoice_number {
            Some(number) => number.clone(),
            None => next_number(&mut *tx).await?,
        };
        let id = new_id();
        debug!(id = %id, invoice_number = %invoice_number, lines = lines.len(), "Creating invoice");

        let created = sqlx::query_as::<_, Invoice>(&format!(
            "INSERT INTO invoices (id, invoice_number, customer_id, date, due_date, subtotal,
                                   discount, tax, total, status, payment_mode, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
             RETURNING {COLUMNS}"
        ))
        .bind(&id)
        .bind(&invoice_number)
        .bind(&invoice.customer_id)
        .bind(invoice.date.unwrap_or_else(Utc::now))
        .bind(invoice.due_date)
        .bind(invoice.subtotal)
        .bind(invoice.discount)
        .bind(invoice.tax)
        .bind(total)
        .bind(invoice.status)
        .bind(&invoice.payment_mode)
        .bind(&invoice.notes)
        .fetch_one(&mut *tx)
        .await?;

        for line in lines {
            insert_line(&mut *tx, &created.id, line).await?;
        }

        if created.status.affects_stock() {
            for line in lines {
                adjust_stock(&mut *tx, &stock_out(&created, line)).await?;
            }
        }

        tx.commit().await?;

        info!(
            id = %created.id,
            invoice_number = %created.invoice_number,
            status = %created.status,
            total = %created.total,
            lines = lines.len(),
            "Invoice created"
        );
        Ok(created)
    }

    /// Adds a line to an existing invoice.
    ///
    /// If the invoice has already left draft, the line's stock-out is
    /// recorded in the same transaction. `None` when the invoice is unknown.
    pub async fn insert_item(
        &self,
        invoice_id: &str,
        line: &NewInvoiceLineItem,
    ) -> DbResult<Option<InvoiceLineItem>> {
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        let Some(invoice) = fetch_invoice(&mut *tx, invoice_id).await? else {
            return Ok(None);
        };

        let inserted = insert_line(&mut *tx, &invoice.id, line).await?;
        if invoice.status.affects_stock() {
            adjust_stock(&mut *tx, &stock_out(&invoice, line)).await?;
        }

        tx.commit().await?;

        info!(
            invoice_id = %invoice.id,
            item_id = %inserted.item_id,
            quantity = inserted.quantity,
            "Invoice line added"
        );
        Ok(Some(inserted))
    }

    /// Removes every line of an invoice. Returns how many were removed.
    ///
    /// Stock is not restored.
    pub async fn delete_items(&self, invoice_id: &str) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM invoice_items WHERE invoice_id = ?1")
            .bind(invoice_id)
            .execute(&self.pool)
            .await?;

        debug!(invoice_id = %invoice_id, removed = result.rows_affected(), "Deleted invoice lines");
        Ok(result.rows_affected())
    }

    /// Applies a partial update.
    ///
    /// The stored row is read, merged and checked (status transition,
    /// recomputed total) and written back inside one transaction.
    pub async fn update(&self, id: &str, patch: &InvoicePatch) -> DbResult<Option<Invoice>> {
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        let Some(current) = fetch_invoice(&mut *tx, id).await? else {
            return Ok(None);
        };
        let merged = patch.apply_to(&current)?;

        let updated = sqlx::query_as::<_, Invoice>(&format!(
            "UPDATE invoices SET
                invoice_number = ?2, customer_id = ?3, date = ?4, due_date = ?5,
                subtotal = ?6, discount = ?7, tax = ?8, total = ?9,
                status = ?10, payment_mode = ?11, notes = ?12
             WHERE id = ?1
             RETURNING {COLUMNS}"
        ))
        .bind(&merged.id)
        .bind(&merged.invoice_number)
        .bind(&merged.customer_id)
        .bind(merged.date)
        .bind(merged.due_date)
        .bind(merged.subtotal)
        .bind(merged.discount)
        .bind(merged.tax)
        .bind(merged.total)
        .bind(merged.status)
        .bind(&merged.payment_mode)
        .bind(&merged.notes)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        if current.status != updated.status {
            info!(
                id = %updated.id,
                from = %current.status,
                to = %updated.status,
                "Invoice status changed"
            );
        }
        Ok(Some(updated))
    }

    /// Deletes an invoice and its line items in one transaction.
    ///
    /// Stock recorded for the invoice stays as it is.
    pub async fn delete(&self, id: &str) -> DbResult<bool> {
        let mut tx = self.pool.begin().await?;

        let lines = sqlx::query("DELETE FROM invoice_items WHERE invoice_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM invoices WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let deleted = result.rows_affected() > 0;
        debug!(id = %id, deleted, lines = lines.rows_affected(), "Deleted invoice");
        Ok(deleted)
    }
}

// =============================================================================
// Connection-level helpers (shared by pool reads and transactions)
// =============================================================================

async fn fetch_invoice(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Invoice>> {
    let invoice = sqlx::query_as::<_, Invoice>(&format!(
        "SELECT {COLUMNS} FROM invoices WHERE id = ?1"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(invoice)
}

async fn next_number(conn: &mut SqliteConnection) -> DbResult<String> {
    let last: Option<String> = sqlx::query_scalar(
        "SELECT invoice_number FROM invoices
         ORDER BY length(invoice_number) DESC, invoice_number DESC
         LIMIT 1",
    )
    .fetch_optional(&mut *conn)
    .await?;

    Ok(next_invoice_number(last.as_deref()))
}

async fn insert_line(
    conn: &mut SqliteConnection,
    invoice_id: &str,
    line: &NewInvoiceLineItem,
) -> DbResult<InvoiceLineItem> {
    let amount = line.resolved_amount().map_err(CoreError::from)?;

    let inserted = sqlx::query_as::<_, InvoiceLineItem>(&format!(
        "INSERT INTO invoice_items (id, invoice_id, item_id, description, quantity, rate,
                                    tax_rate, amount)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         RETURNING {LINE_COLUMNS}"
    ))
    .bind(new_id())
    .bind(invoice_id)
    .bind(&line.item_id)
    .bind(&line.description)
    .bind(line.quantity)
    .bind(line.rate)
    .bind(line.tax_rate)
    .bind(amount)
    .fetch_one(&mut *conn)
    .await?;

    Ok(inserted)
}

fn stock_out(invoice: &Invoice, line: &NewInvoiceLineItem) -> NewStockTransaction {
    NewStockTransaction {
        item_id: line.item_id.clone(),
        kind: StockMovement::Out,
        quantity: line.quantity,
        date: None,
        reference: Some(invoice.invoice_number.clone()),
        notes: Some(format!("Stock out for invoice {}", invoice.invoice_number)),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::repository::test_support::{customer, invoice, item, line, test_db};
    use crate::{Database, DbConfig};
    use chrono::{Duration, TimeZone};
    use khata_core::{InvoiceStatus, Money, TaxRate, ValidationError};

    #[tokio::test]
    async fn test_numbering_starts_at_001_and_increments() {
        let db = test_db().await;
        let c = customer(&db, "Acme").await;

        assert_eq!(db.invoices().next_invoice_number().await.unwrap(), "INV-001");

        let mut header = invoice(&c.id, InvoiceStatus::Draft);
        header.invoice_number = Some("INV-004".into());
        db.invoices().create(&header).await.unwrap();

        assert_eq!(db.invoices().next_invoice_number().await.unwrap(), "INV-005");
    }

    #[tokio::test]
    async fn test_numbering_past_999_is_numeric() {
        let db = test_db().await;
        let c = customer(&db, "Acme").await;
        for number in ["INV-999", "INV-1000"] {
            let mut header = invoice(&c.id, InvoiceStatus::Draft);
            header.invoice_number = Some(number.into());
            db.invoices().create(&header).await.unwrap();
        }

        assert_eq!(db.invoices().next_invoice_number().await.unwrap(), "INV-1001");
    }

    #[tokio::test]
    async fn test_number_assigned_when_omitted() {
        let db = test_db().await;
        let c = customer(&db, "Acme").await;

        let first = db.invoices().create(&invoice(&c.id, InvoiceStatus::Draft)).await.unwrap();
        let second = db.invoices().create(&invoice(&c.id, InvoiceStatus::Draft)).await.unwrap();

        assert_eq!(first.invoice_number, "INV-001");
        assert_eq!(second.invoice_number, "INV-002");
        assert_eq!(first.total.paise(), 35400);
    }

    #[tokio::test]
    async fn test_duplicate_number_rejected() {
        let db = test_db().await;
        let c = customer(&db, "Acme").await;
        let mut header = invoice(&c.id, InvoiceStatus::Draft);
        header.invoice_number = Some("INV-010".into());

        db.invoices().create(&header).await.unwrap();
        let err = db.invoices().create(&header).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::UniqueViolation { ref field } if field == "invoices.invoice_number"
        ));
    }

    #[tokio::test]
    async fn test_non_draft_invoice_moves_stock() {
        let db = test_db().await;
        let c = customer(&db, "Acme").await;
        let widget = item(&db, "Widget", 10).await;

        let created = db
            .invoices()
            .create_with_items(&invoice(&c.id, InvoiceStatus::Pending), &[line(&widget.id, 3)])
            .await
            .unwrap();

        assert_eq!(db.items().get(&widget.id).await.unwrap().unwrap().stock, 7);

        let movements = db.stock().list(Some(&widget.id)).await.unwrap();
        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0].kind, StockMovement::Out);
        assert_eq!(movements[0].quantity, 3);
        assert_eq!(movements[0].reference.as_deref(), Some(created.invoice_number.as_str()));
        assert_eq!(
            movements[0].notes.as_deref(),
            Some(format!("Stock out for invoice {}", created.invoice_number).as_str())
        );

        let lines = db.invoices().items_for(&created.id).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].amount.paise(), 35400);
    }

    #[tokio::test]
    async fn test_draft_invoice_leaves_stock_alone() {
        let db = test_db().await;
        let c = customer(&db, "Acme").await;
        let widget = item(&db, "Widget", 10).await;

        db.invoices()
            .create_with_items(&invoice(&c.id, InvoiceStatus::Draft), &[line(&widget.id, 3)])
            .await
            .unwrap();

        assert_eq!(db.items().get(&widget.id).await.unwrap().unwrap().stock, 10);
        assert!(db.stock().list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_line_rolls_back_everything() {
        let db = test_db().await;
        let c = customer(&db, "Acme").await;
        let widget = item(&db, "Widget", 10).await;
        let lines = [
            line(&widget.id, 2),
            line("550e8400-e29b-41d4-a716-446655440000", 1),
        ];

        let err = db
            .invoices()
            .create_with_items(&invoice(&c.id, InvoiceStatus::Paid), &lines)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

        assert!(db.invoices().list().await.unwrap().is_empty());
        assert!(db.stock().list(None).await.unwrap().is_empty());
        assert_eq!(db.items().get(&widget.id).await.unwrap().unwrap().stock, 10);

        let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoice_items")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[tokio::test]
    async fn test_mismatched_total_is_domain_error() {
        let db = test_db().await;
        let c = customer(&db, "Acme").await;
        let mut header = invoice(&c.id, InvoiceStatus::Draft);
        header.total = Some(Money::from_paise(1));

        let err = db.invoices().create(&header).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::Validation(ValidationError::Mismatch { .. }))
        ));
        assert!(db.invoices().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_status_patch_does_not_move_stock() {
        let db = test_db().await;
        let c = customer(&db, "Acme").await;
        let widget = item(&db, "Widget", 10).await;
        let created = db
            .invoices()
            .create_with_items(&invoice(&c.id, InvoiceStatus::Draft), &[line(&widget.id, 4)])
            .await
            .unwrap();

        let patch = InvoicePatch {
            status: Some(InvoiceStatus::Paid),
            ..Default::default()
        };
        let paid = db.invoices().update(&created.id, &patch).await.unwrap().unwrap();

        assert_eq!(paid.status, InvoiceStatus::Paid);
        assert_eq!(db.items().get(&widget.id).await.unwrap().unwrap().stock, 10);
    }

    #[tokio::test]
    async fn test_paid_invoice_cannot_reopen() {
        let db = test_db().await;
        let c = customer(&db, "Acme").await;
        let created = db.invoices().create(&invoice(&c.id, InvoiceStatus::Paid)).await.unwrap();

        let patch = InvoicePatch {
            status: Some(InvoiceStatus::Draft),
            ..Default::default()
        };
        let err = db.invoices().update(&created.id, &patch).await.unwrap_err();

        assert!(matches!(err, DbError::Domain(CoreError::InvalidStatusTransition { .. })));
        let stored = db.invoices().get(&created.id).await.unwrap().unwrap();
        assert_eq!(stored.status, InvoiceStatus::Paid);
    }

    #[tokio::test]
    async fn test_update_recomputes_total() {
        let db = test_db().await;
        let c = customer(&db, "Acme").await;
        let created = db.invoices().create(&invoice(&c.id, InvoiceStatus::Pending)).await.unwrap();

        let patch = InvoicePatch {
            discount: Some(Money::from_paise(5400)),
            notes: Some("Loyalty discount".into()),
            ..Default::default()
        };
        let updated = db.invoices().update(&created.id, &patch).await.unwrap().unwrap();

        assert_eq!(updated.total.paise(), 30000);
        assert_eq!(updated.notes.as_deref(), Some("Loyalty discount"));
        assert!(db.invoices().update("missing", &patch).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_item_on_issued_invoice_moves_stock() {
        let db = test_db().await;
        let c = customer(&db, "Acme").await;
        let widget = item(&db, "Widget", 10).await;
        let created = db.invoices().create(&invoice(&c.id, InvoiceStatus::Pending)).await.unwrap();

        let added = db
            .invoices()
            .insert_item(&created.id, &line(&widget.id, 2))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(added.invoice_id, created.id);
        assert_eq!(db.items().get(&widget.id).await.unwrap().unwrap().stock, 8);
        assert!(db
            .invoices()
            .insert_item("missing", &line(&widget.id, 1))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_removes_lines_and_keeps_stock() {
        let db = test_db().await;
        let c = customer(&db, "Acme").await;
        let widget = item(&db, "Widget", 10).await;
        let created = db
            .invoices()
            .create_with_items(
                &invoice(&c.id, InvoiceStatus::Paid),
                &[line(&widget.id, 1), line(&widget.id, 2)],
            )
            .await
            .unwrap();

        assert!(db.invoices().delete(&created.id).await.unwrap());
        assert!(db.invoices().get(&created.id).await.unwrap().is_none());
        assert!(db.invoices().items_for(&created.id).await.unwrap().is_empty());
        assert_eq!(db.items().get(&widget.id).await.unwrap().unwrap().stock, 7);
        assert!(!db.invoices().delete(&created.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_items() {
        let db = test_db().await;
        let c = customer(&db, "Acme").await;
        let widget = item(&db, "Widget", 10).await;
        let created = db
            .invoices()
            .create_with_items(
                &invoice(&c.id, InvoiceStatus::Draft),
                &[line(&widget.id, 1), line(&widget.id, 1)],
            )
            .await
            .unwrap();

        assert_eq!(db.invoices().delete_items(&created.id).await.unwrap(), 2);
        assert!(db.invoices().items_for(&created.id).await.unwrap().is_empty());
        assert!(db.invoices().get(&created.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips() {
        let db = test_db().await;
        let c = customer(&db, "Acme").await;
        let widget = item(&db, "Widget", 10).await;
        let gadget = item(&db, "Gadget", 10).await;

        let header = NewInvoice {
            invoice_number: Some("INV-077".into()),
            customer_id: c.id.clone(),
            date: Some(Utc.with_ymd_and_hms(2026, 3, 1, 9, 15, 0).unwrap()),
            due_date: Some(Utc.with_ymd_and_hms(2026, 3, 31, 0, 0, 0).unwrap()),
            subtotal: Money::from_paise(25000),
            discount: Money::from_paise(1000),
            tax: Money::from_paise(3850),
            total: Some(Money::from_paise(27850)),
            status: InvoiceStatus::Pending,
            payment_mode: Some("credit".into()),
            notes: Some("Net 30".into()),
        };
        let lines = [
            NewInvoiceLineItem {
                description: Some("Blue, large".into()),
                amount: Some(Money::from_paise(23600)),
                ..NewInvoiceLineItem::new(&widget.id, 2, Money::from_paise(10000), TaxRate::from_percent(18))
            },
            NewInvoiceLineItem::new(&gadget.id, 1, Money::from_paise(5000), TaxRate::from_percent(5)),
        ];

        let created = db.invoices().create_with_items(&header, &lines).await.unwrap();
        let fetched = db.invoices().get(&created.id).await.unwrap().unwrap();

        assert_eq!(created, fetched);
        assert_eq!(fetched.invoice_number, "INV-077");
        assert_eq!(fetched.customer_id, header.customer_id);
        assert_eq!(Some(fetched.date), header.date);
        assert_eq!(fetched.due_date, header.due_date);
        assert_eq!(fetched.subtotal, header.subtotal);
        assert_eq!(fetched.discount, header.discount);
        assert_eq!(fetched.tax, header.tax);
        assert_eq!(Some(fetched.total), header.total);
        assert_eq!(fetched.status, header.status);
        assert_eq!(fetched.payment_mode, header.payment_mode);
        assert_eq!(fetched.notes, header.notes);

        let stored = db.invoices().items_for(&created.id).await.unwrap();
        assert_eq!(stored.len(), lines.len());
        for (stored, new) in stored.iter().zip(&lines) {
            assert_eq!(stored.invoice_id, created.id);
            assert_eq!(stored.item_id, new.item_id);
            assert_eq!(stored.description, new.description);
            assert_eq!(stored.quantity, new.quantity);
            assert_eq!(stored.rate, new.rate);
            assert_eq!(stored.tax_rate, new.tax_rate);
        }
        assert_eq!(stored[0].amount.paise(), 23600);
        assert_eq!(stored[1].amount.paise(), 5250);
    }

    #[tokio::test]
    async fn test_stock_out_dated_when_recorded() {
        let db = test_db().await;
        let c = customer(&db, "Acme").await;
        let widget = item(&db, "Widget", 10).await;
        let mut header = invoice(&c.id, InvoiceStatus::Pending);
        header.date = Some(Utc::now() - Duration::days(30));

        let before = Utc::now();
        db.invoices()
            .create_with_items(&header, &[line(&widget.id, 1)])
            .await
            .unwrap();

        let movements = db.stock().list(Some(&widget.id)).await.unwrap();
        assert_eq!(movements.len(), 1);
        assert!(movements[0].date >= before);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_get_distinct_numbers() {
        let path = std::env::temp_dir().join(format!("khata-numbering-{}.db", new_id()));
        let db = Database::new(DbConfig::new(&path).max_connections(4)).await.unwrap();
        let c = customer(&db, "Acme").await;

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let db = db.clone();
                let header = invoice(&c.id, InvoiceStatus::Draft);
                tokio::spawn(async move { db.invoices().create(&header).await })
            })
            .collect();

        let mut numbers = Vec::new();
        for handle in handles {
            numbers.push(handle.await.unwrap().unwrap().invoice_number);
        }
        numbers.sort();
        assert_eq!(numbers, ["INV-001", "INV-002", "INV-003", "INV-004"]);

        db.close().await;
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
        }
    }
}
