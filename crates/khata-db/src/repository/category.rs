//! # Category Repository

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::new_id;
use khata_core::input::{CategoryPatch, NewCategory};
use khata_core::Category;

#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        Ok(categories)
    }

    pub async fn get(&self, id: &str) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(category)
    }

    pub async fn create(&self, new: &NewCategory) -> DbResult<Category> {
        let id = new_id();
        debug!(id = %id, name = %new.name, "Creating category");

        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (id, name) VALUES (?1, ?2) RETURNING id, name",
        )
        .bind(&id)
        .bind(&new.name)
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    pub async fn update(&self, id: &str, patch: &CategoryPatch) -> DbResult<Option<Category>> {
        debug!(id = %id, "Updating category");

        let category = sqlx::query_as::<_, Category>(
            "UPDATE categories SET name = COALESCE(?2, name) WHERE id = ?1 RETURNING id, name",
        )
        .bind(id)
        .bind(&patch.name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// Deletes a category. Fails while items still reference it.
    pub async fn delete(&self, id: &str) -> DbResult<bool> {
        debug!(id = %id, "Deleting category");

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::test_db;

    #[tokio::test]
    async fn test_category_lifecycle() {
        let db = test_db().await;
        let created = db
            .categories()
            .create(&NewCategory {
                name: "Stationery".into(),
            })
            .await
            .unwrap();

        assert_eq!(db.categories().get(&created.id).await.unwrap(), Some(created.clone()));

        let patch = CategoryPatch {
            name: Some("Office Supplies".into()),
        };
        let renamed = db.categories().update(&created.id, &patch).await.unwrap().unwrap();
        assert_eq!(renamed.name, "Office Supplies");

        assert!(db.categories().delete(&created.id).await.unwrap());
        assert!(db.categories().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips() {
        let db = test_db().await;
        let new = NewCategory {
            name: "Office Supplies ".into(),
        };

        let created = db.categories().create(&new).await.unwrap();
        let fetched = db.categories().get(&created.id).await.unwrap().unwrap();

        assert_eq!(created, fetched);
        assert_eq!(fetched.name, "Office Supplies ");
    }
}
