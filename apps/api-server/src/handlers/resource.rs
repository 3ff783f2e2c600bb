//! # Uniform Resource Routes
//!
//! Most resources expose the same five endpoints. A [`Resource`] describes
//! how to reach one resource's repository; the generic handlers below turn
//! that into HTTP.
//!
//! ```text
//!   GET    /              list      200 [..]
//!   POST   /              create    201 {..}     400 / 500
//!   GET    /{id}          get       200 {..}     404
//!   PATCH  /{id}          update    200 {..}     400 / 404
//!   DELETE /{id}          delete    204          404
//! ```

use std::future::Future;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use khata_core::Validate;
use khata_db::{Database, DbResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::SharedState;

/// A resource served by the uniform routes.
pub trait Resource: Send + Sync + 'static {
    /// Singular name used in error messages, e.g. `"journal entry"`.
    const NAME: &'static str;
    /// Plural name used in error messages, e.g. `"journal entries"`.
    const PLURAL: &'static str;

    type Record: Serialize + Send;
    type New: DeserializeOwned + Validate + Send;
    type Patch: DeserializeOwned + Validate + Send;
    /// Query-string filter accepted by `list`.
    type Filter: DeserializeOwned + Send;

    fn list(
        db: &Database,
        filter: Self::Filter,
    ) -> impl Future<Output = DbResult<Vec<Self::Record>>> + Send;

    fn get(db: &Database, id: &str) -> impl Future<Output = DbResult<Option<Self::Record>>> + Send;

    fn create(db: &Database, new: Self::New) -> impl Future<Output = DbResult<Self::Record>> + Send;

    fn update(
        db: &Database,
        id: &str,
        patch: Self::Patch,
    ) -> impl Future<Output = DbResult<Option<Self::Record>>> + Send;

    fn delete(db: &Database, id: &str) -> impl Future<Output = DbResult<bool>> + Send;
}

/// `list` filter for resources that take none.
#[derive(Debug, Default, Deserialize)]
pub struct NoFilter {}

/// Reads an optional query parameter, treating `?key=` as absent.
pub fn empty_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.is_empty()))
}

/// The five uniform routes for `R`, to be nested under its path.
pub fn routes<R: Resource>() -> Router<SharedState> {
    Router::new()
        .route("/", get(list::<R>).post(create::<R>))
        .route("/{id}", get(fetch::<R>).patch(update::<R>).delete(remove::<R>))
}

/// Unwraps a JSON body and runs its business rules.
///
/// Malformed JSON, wrong field types and failed rules all become the same
/// `Invalid <resource> data` response.
pub fn validated<T: Validate>(
    resource: &'static str,
    body: Result<Json<T>, JsonRejection>,
) -> ApiResult<T> {
    let Json(value) = body.map_err(|rejection| ApiError::invalid(resource, rejection.body_text()))?;
    value.validate().map_err(|e| ApiError::invalid(resource, e))?;
    Ok(value)
}

async fn list<R: Resource>(
    State(state): State<SharedState>,
    Query(filter): Query<R::Filter>,
) -> ApiResult<Json<Vec<R::Record>>> {
    let records = R::list(&state.db, filter)
        .await
        .map_err(ApiError::store(R::NAME, format!("fetch {}", R::PLURAL)))?;
    Ok(Json(records))
}

async fn fetch<R: Resource>(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<R::Record>> {
    R::get(&state.db, &id)
        .await
        .map_err(ApiError::store(R::NAME, format!("fetch {}", R::NAME)))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(R::NAME))
}

async fn create<R: Resource>(
    State(state): State<SharedState>,
    body: Result<Json<R::New>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<R::Record>)> {
    let new = validated(R::NAME, body)?;
    let record = R::create(&state.db, new)
        .await
        .map_err(ApiError::store(R::NAME, format!("create {}", R::NAME)))?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn update<R: Resource>(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    body: Result<Json<R::Patch>, JsonRejection>,
) -> ApiResult<Json<R::Record>> {
    let patch = validated(R::NAME, body)?;
    R::update(&state.db, &id, patch)
        .await
        .map_err(ApiError::store(R::NAME, format!("update {}", R::NAME)))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(R::NAME))
}

async fn remove<R: Resource>(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let deleted = R::delete(&state.db, &id)
        .await
        .map_err(ApiError::store(R::NAME, format!("delete {}", R::NAME)))?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(R::NAME))
    }
}
