//! # Item Repository
//!
//! Database operations for stocked items.
//!
//! ## Stock Level
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  items.stock is moved by:                                               │
//! │                                                                         │
//! │  stock::adjust_stock ◄── POST /api/stock-transactions   (audited)       │
//! │                      ◄── non-draft invoice creation     (audited)       │
//! │  ItemRepository::update with `stock` set               (NOT audited)    │
//! │                                                                         │
//! │  low_stock(): stock <= reorder_level                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::new_id;
use khata_core::input::{ItemPatch, NewItem};
use khata_core::Item;

const COLUMNS: &str = "id, name, sku, hsn, barcode, category_id, unit, purchase_price, \
                       selling_price, gst_rate, stock, reorder_level";

/// Repository for item database operations.
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    /// Creates a new ItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Lists all items ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(&format!("SELECT {COLUMNS} FROM items ORDER BY name"))
            .fetch_all(&self.pool)
            .await?;

        debug!(count = items.len(), "Listed items");
        Ok(items)
    }

    /// Gets an item by id.
    pub async fn get(&self, id: &str) -> DbResult<Option<Item>> {
        let item = sqlx::query_as::<_, Item>(&format!("SELECT {COLUMNS} FROM items WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    /// Inserts an item with its opening stock.
    ///
    /// The opening stock is not recorded as a stock transaction.
    pub async fn create(&self, new: &NewItem) -> DbResult<Item> {
        let id = new_id();
        debug!(id = %id, name = %new.name, stock = new.stock, "Creating item");

        let item = sqlx::query_as::<_, Item>(&format!(
            "INSERT INTO items (id, name, sku, hsn, barcode, category_id, unit,
                                purchase_price, selling_price, gst_rate, stock, reorder_level)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
             RETURNING {COLUMNS}"
        ))
        .bind(&id)
        .bind(&new.name)
        .bind(&new.sku)
        .bind(&new.hsn)
        .bind(&new.barcode)
        .bind(&new.category_id)
        .bind(&new.unit)
        .bind(new.purchase_price)
        .bind(new.selling_price)
        .bind(new.gst_rate)
        .bind(new.stock)
        .bind(new.reorder_level)
        .fetch_one(&self.pool)
        .await?;

        Ok(item)
    }

    /// Applies a partial update, including a direct `stock` overwrite.
    pub async fn update(&self, id: &str, patch: &ItemPatch) -> DbResult<Option<Item>> {
        debug!(id = %id, stock = ?patch.stock, "Updating item");

        let item = sqlx::query_as::<_, Item>(&format!(
            "UPDATE items SET
                name = COALESCE(?2, name),
                sku = COALESCE(?3, sku),
                hsn = COALESCE(?4, hsn),
                barcode = COALESCE(?5, barcode),
                category_id = COALESCE(?6, category_id),
                unit = COALESCE(?7, unit),
                purchase_price = COALESCE(?8, purchase_price),
                selling_price = COALESCE(?9, selling_price),
                gst_rate = COALESCE(?10, gst_rate),
                stock = COALESCE(?11, stock),
                reorder_level = COALESCE(?12, reorder_level)
             WHERE id = ?1
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.sku)
        .bind(&patch.hsn)
        .bind(&patch.barcode)
        .bind(&patch.category_id)
        .bind(&patch.unit)
        .bind(patch.purchase_price)
        .bind(patch.selling_price)
        .bind(patch.gst_rate)
        .bind(patch.stock)
        .bind(patch.reorder_level)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Deletes an item. Fails while invoices or stock history reference it.
    pub async fn delete(&self, id: &str) -> DbResult<bool> {
        debug!(id = %id, "Deleting item");

        let result = sqlx::query("DELETE FROM items WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Items at or below their reorder level, lowest stock first.
    pub async fn low_stock(&self) -> DbResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(&format!(
            "SELECT {COLUMNS} FROM items WHERE stock <= reorder_level ORDER BY stock, name"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = items.len(), "Low stock items");
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::repository::test_support::{item, test_db};
    use khata_core::input::NewCategory;
    use khata_core::{Money, TaxRate};

    #[tokio::test]
    async fn test_create_applies_defaults() {
        let db = test_db().await;
        let new = NewItem::new("A4 Paper Ream", Money::from_paise(22000), Money::from_paise(27500));

        let created = db.items().create(&new).await.unwrap();

        assert_eq!(created.unit, "pcs");
        assert_eq!(created.gst_rate, TaxRate::from_percent(18));
        assert_eq!(created.stock, 0);
        assert_eq!(created.reorder_level, 10);
        assert_eq!(created.selling_price.to_string(), "275.00");
        assert_eq!(db.items().get(&created.id).await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn test_category_reference_enforced() {
        let db = test_db().await;
        let mut new = NewItem::new("Pen", Money::from_paise(500), Money::from_paise(1000));
        new.category_id = Some("550e8400-e29b-41d4-a716-446655440000".into());

        let err = db.items().create(&new).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

        let category = db
            .categories()
            .create(&NewCategory { name: "Pens".into() })
            .await
            .unwrap();
        new.category_id = Some(category.id.clone());
        let created = db.items().create(&new).await.unwrap();
        assert_eq!(created.category_id, Some(category.id));
    }

    #[tokio::test]
    async fn test_update_can_set_stock_directly() {
        let db = test_db().await;
        let created = item(&db, "Stapler", 4).await;

        let patch = ItemPatch {
            stock: Some(40),
            selling_price: Some(Money::from_paise(15000)),
            ..Default::default()
        };
        let updated = db.items().update(&created.id, &patch).await.unwrap().unwrap();

        assert_eq!(updated.stock, 40);
        assert_eq!(updated.selling_price.paise(), 15000);
        assert_eq!(updated.name, "Stapler");
        assert!(db.stock().list(Some(&created.id)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_low_stock_boundary() {
        let db = test_db().await;
        let below = item(&db, "Below", 5).await;
        let equal = item(&db, "Equal", 10).await;
        item(&db, "Above", 12).await;

        let ids: Vec<_> = db
            .items()
            .low_stock()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.id)
            .collect();

        assert_eq!(ids, [below.id, equal.id]);
    }

    #[tokio::test]
    async fn test_delete_item() {
        let db = test_db().await;
        let created = item(&db, "Eraser", 1).await;

        assert!(db.items().delete(&created.id).await.unwrap());
        assert!(!db.items().delete(&created.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips() {
        let db = test_db().await;
        let category = db
            .categories()
            .create(&NewCategory {
                name: "Paper".into(),
            })
            .await
            .unwrap();
        let new = NewItem {
            name: "A4 Paper Ream".into(),
            sku: Some("PPR-A4-500".into()),
            hsn: Some("4802".into()),
            barcode: Some("8901234567890".into()),
            category_id: Some(category.id.clone()),
            unit: "ream".into(),
            purchase_price: Money::from_paise(24000),
            selling_price: Money::from_paise(29950),
            gst_rate: TaxRate::from_bps(1200),
            stock: 40,
            reorder_level: 8,
        };

        let created = db.items().create(&new).await.unwrap();
        let fetched = db.items().get(&created.id).await.unwrap().unwrap();

        assert_eq!(created, fetched);
        assert_eq!(fetched.name, new.name);
        assert_eq!(fetched.sku, new.sku);
        assert_eq!(fetched.hsn, new.hsn);
        assert_eq!(fetched.barcode, new.barcode);
        assert_eq!(fetched.category_id, new.category_id);
        assert_eq!(fetched.unit, "ream");
        assert_eq!(fetched.purchase_price, new.purchase_price);
        assert_eq!(fetched.selling_price, new.selling_price);
        assert_eq!(fetched.gst_rate, new.gst_rate);
        assert_eq!(fetched.stock, 40);
        assert_eq!(fetched.reorder_level, 8);
    }
}
