//! # Stock Transaction Repository
//!
//! Append-only stock movements and the one routine allowed to move
//! `items.stock` with an audit row.
//!
//! ## Adjustment
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  adjust_stock(&mut conn, movement)     (caller owns the transaction)    │
//! │                                                                         │
//! │  1. INSERT INTO stock_transactions ... RETURNING *                      │
//! │  2. UPDATE items SET stock = stock + delta WHERE id = ?                 │
//! │                                                                         │
//! │  The relative UPDATE is evaluated by SQLite under the write lock, so    │
//! │  two concurrent adjustments can never overwrite each other.             │
//! │  Stock may go negative.                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::new_id;
use khata_core::input::NewStockTransaction;
use khata_core::StockTransaction;

const COLUMNS: &str = "id, item_id, kind, quantity, date, reference, notes";

/// Records a movement and applies it to the item's stock.
///
/// Runs on whatever connection it is given; callers pass a transaction so
/// the audit row and the stock change commit together.
pub(crate) async fn adjust_stock(
    conn: &mut SqliteConnection,
    movement: &NewStockTransaction,
) -> DbResult<StockTransaction> {
    let id = new_id();
    let date = movement.date.unwrap_or_else(Utc::now);
    let delta = movement.kind.delta(movement.quantity);

    let recorded = sqlx::query_as::<_, StockTransaction>(&format!(
        "INSERT INTO stock_transactions (id, item_id, kind, quantity, date, reference, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         RETURNING {COLUMNS}"
    ))
    .bind(&id)
    .bind(&movement.item_id)
    .bind(movement.kind)
    .bind(movement.quantity)
    .bind(date)
    .bind(&movement.reference)
    .bind(&movement.notes)
    .fetch_one(&mut *conn)
    .await?;

    let result = sqlx::query("UPDATE items SET stock = stock + ?1 WHERE id = ?2")
        .bind(delta)
        .bind(&movement.item_id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() != 1 {
        return Err(DbError::ForeignKeyViolation {
            message: format!("item {} does not exist", movement.item_id),
        });
    }

    debug!(
        item_id = %movement.item_id,
        kind = ?movement.kind,
        delta,
        "Stock adjusted"
    );
    Ok(recorded)
}

/// Repository for stock transactions.
#[derive(Debug, Clone)]
pub struct StockRepository {
    pool: SqlitePool,
}

impl StockRepository {
    pub fn new(pool: SqlitePool) -> Self {
        StockRepository { pool }
    }

    /// Lists movements, newest first, optionally for a single item.
    pub async fn list(&self, item_id: Option<&str>) -> DbResult<Vec<StockTransaction>> {
        let transactions = sqlx::query_as::<_, StockTransaction>(&format!(
            "SELECT {COLUMNS} FROM stock_transactions
             WHERE ?1 IS NULL OR item_id = ?1
             ORDER BY date DESC"
        ))
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(item_id = ?item_id, count = transactions.len(), "Listed stock transactions");
        Ok(transactions)
    }

    pub async fn get(&self, id: &str) -> DbResult<Option<StockTransaction>> {
        let transaction = sqlx::query_as::<_, StockTransaction>(&format!(
            "SELECT {COLUMNS} FROM stock_transactions WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(transaction)
    }

    /// Records a movement and adjusts stock in one transaction.
    pub async fn create(&self, movement: &NewStockTransaction) -> DbResult<StockTransaction> {
        let mut tx = self.pool.begin().await?;
        let recorded = adjust_stock(&mut *tx, movement).await?;
        tx.commit().await?;

        info!(
            id = %recorded.id,
            item_id = %recorded.item_id,
            kind = ?recorded.kind,
            quantity = recorded.quantity,
            "Stock transaction recorded"
        );
        Ok(recorded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{item, test_db};
    use khata_core::StockMovement;

    #[tokio::test]
    async fn test_in_and_out_move_stock() {
        let db = test_db().await;
        let stapler = item(&db, "Stapler", 10).await;

        db.stock()
            .create(&NewStockTransaction::new(&stapler.id, StockMovement::In, 5))
            .await
            .unwrap();
        let out = db
            .stock()
            .create(&NewStockTransaction::new(&stapler.id, StockMovement::Out, 3))
            .await
            .unwrap();

        assert_eq!(out.kind, StockMovement::Out);
        assert_eq!(out.quantity, 3);
        assert_eq!(db.items().get(&stapler.id).await.unwrap().unwrap().stock, 12);
        assert_eq!(db.stock().get(&out.id).await.unwrap(), Some(out));
    }

    #[tokio::test]
    async fn test_stock_may_go_negative() {
        let db = test_db().await;
        let pen = item(&db, "Pen", 1).await;

        db.stock()
            .create(&NewStockTransaction::new(&pen.id, StockMovement::Out, 4))
            .await
            .unwrap();

        assert_eq!(db.items().get(&pen.id).await.unwrap().unwrap().stock, -3);
    }

    #[tokio::test]
    async fn test_unknown_item_leaves_no_row() {
        let db = test_db().await;
        let movement = NewStockTransaction::new(
            "550e8400-e29b-41d4-a716-446655440000",
            StockMovement::In,
            1,
        );

        assert!(db.stock().create(&movement).await.is_err());
        assert!(db.stock().list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_filters_by_item() {
        let db = test_db().await;
        let a = item(&db, "A", 0).await;
        let b = item(&db, "B", 0).await;
        for id in [&a.id, &a.id, &b.id] {
            db.stock()
                .create(&NewStockTransaction::new(id, StockMovement::In, 1))
                .await
                .unwrap();
        }

        assert_eq!(db.stock().list(None).await.unwrap().len(), 3);
        assert_eq!(db.stock().list(Some(&a.id)).await.unwrap().len(), 2);
        assert_eq!(db.stock().list(Some(&b.id)).await.unwrap().len(), 1);
    }
}
