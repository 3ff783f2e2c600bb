//! Categories and items.

use axum::extract::State;
use axum::Json;
use khata_core::input::{CategoryPatch, ItemPatch, NewCategory, NewItem};
use khata_core::{Category, Item};
use khata_db::{Database, DbResult};

use super::resource::{NoFilter, Resource};
use crate::error::{ApiError, ApiResult};
use crate::SharedState;

pub struct Categories;

impl Resource for Categories {
    const NAME: &'static str = "category";
    const PLURAL: &'static str = "categories";

    type Record = Category;
    type New = NewCategory;
    type Patch = CategoryPatch;
    type Filter = NoFilter;

    async fn list(db: &Database, _: NoFilter) -> DbResult<Vec<Category>> {
        db.categories().list().await
    }

    async fn get(db: &Database, id: &str) -> DbResult<Option<Category>> {
        db.categories().get(id).await
    }

    async fn create(db: &Database, new: NewCategory) -> DbResult<Category> {
        db.categories().create(&new).await
    }

    async fn update(db: &Database, id: &str, patch: CategoryPatch) -> DbResult<Option<Category>> {
        db.categories().update(id, &patch).await
    }

    async fn delete(db: &Database, id: &str) -> DbResult<bool> {
        db.categories().delete(id).await
    }
}

pub struct Items;

impl Resource for Items {
    const NAME: &'static str = "item";
    const PLURAL: &'static str = "items";

    type Record = Item;
    type New = NewItem;
    type Patch = ItemPatch;
    type Filter = NoFilter;

    async fn list(db: &Database, _: NoFilter) -> DbResult<Vec<Item>> {
        db.items().list().await
    }

    async fn get(db: &Database, id: &str) -> DbResult<Option<Item>> {
        db.items().get(id).await
    }

    async fn create(db: &Database, new: NewItem) -> DbResult<Item> {
        db.items().create(&new).await
    }

    async fn update(db: &Database, id: &str, patch: ItemPatch) -> DbResult<Option<Item>> {
        db.items().update(id, &patch).await
    }

    async fn delete(db: &Database, id: &str) -> DbResult<bool> {
        db.items().delete(id).await
    }
}

/// `GET /api/items/low-stock`: items at or below their reorder level.
pub async fn low_stock(State(state): State<SharedState>) -> ApiResult<Json<Vec<Item>>> {
    let items = state
        .db
        .items()
        .low_stock()
        .await
        .map_err(ApiError::store(Items::NAME, "fetch low stock items"))?;
    Ok(Json(items))
}
