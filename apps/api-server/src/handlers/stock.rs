//! Stock transactions. Append-only: no update or delete routes.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use khata_core::input::NewStockTransaction;
use khata_core::StockTransaction;
use serde::Deserialize;

use super::resource::{empty_as_none, validated};
use crate::error::{ApiError, ApiResult};
use crate::SharedState;

const NAME: &str = "stock transaction";

/// `GET /api/stock-transactions?itemId=...`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockFilter {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub item_id: Option<String>,
}

pub async fn list(
    State(state): State<SharedState>,
    Query(filter): Query<StockFilter>,
) -> ApiResult<Json<Vec<StockTransaction>>> {
    let transactions = state
        .db
        .stock()
        .list(filter.item_id.as_deref())
        .await
        .map_err(ApiError::store(NAME, "fetch stock transactions"))?;
    Ok(Json(transactions))
}

pub async fn fetch(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<StockTransaction>> {
    state
        .db
        .stock()
        .get(&id)
        .await
        .map_err(ApiError::store(NAME, "fetch stock transaction"))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NAME))
}

/// Records the movement and applies it to the item's stock.
pub async fn create(
    State(state): State<SharedState>,
    body: Result<Json<NewStockTransaction>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<StockTransaction>)> {
    let movement = validated(NAME, body)?;
    let recorded = state
        .db
        .stock()
        .create(&movement)
        .await
        .map_err(ApiError::store(NAME, "create stock transaction"))?;
    Ok((StatusCode::CREATED, Json(recorded)))
}
