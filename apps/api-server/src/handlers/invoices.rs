//! Invoices and their line items.
//!
//! `POST /api/invoices` takes the header fields plus an `items` array and
//! creates everything, stock-outs included, in one transaction.

use axum::extract::{Path, State};
use axum::Json;
use khata_core::input::{CreateInvoice, InvoicePatch};
use khata_core::{Invoice, InvoiceLineItem};
use khata_db::{Database, DbResult};
use serde::Serialize;

use super::resource::{NoFilter, Resource};
use crate::error::{ApiError, ApiResult};
use crate::SharedState;

pub struct Invoices;

impl Resource for Invoices {
    const NAME: &'static str = "invoice";
    const PLURAL: &'static str = "invoices";

    type Record = Invoice;
    type New = CreateInvoice;
    type Patch = InvoicePatch;
    type Filter = NoFilter;

    async fn list(db: &Database, _: NoFilter) -> DbResult<Vec<Invoice>> {
        db.invoices().list().await
    }

    async fn get(db: &Database, id: &str) -> DbResult<Option<Invoice>> {
        db.invoices().get(id).await
    }

    async fn create(db: &Database, new: CreateInvoice) -> DbResult<Invoice> {
        db.invoices()
            .create_with_items(&new.invoice, &new.items)
            .await
    }

    async fn update(db: &Database, id: &str, patch: InvoicePatch) -> DbResult<Option<Invoice>> {
        db.invoices().update(id, &patch).await
    }

    async fn delete(db: &Database, id: &str) -> DbResult<bool> {
        db.invoices().delete(id).await
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextNumber {
    pub invoice_number: String,
}

/// `GET /api/invoices/next-number`
pub async fn next_number(State(state): State<SharedState>) -> ApiResult<Json<NextNumber>> {
    let invoice_number = state
        .db
        .invoices()
        .next_invoice_number()
        .await
        .map_err(ApiError::store(Invoices::NAME, "get next invoice number"))?;
    Ok(Json(NextNumber { invoice_number }))
}

/// `GET /api/invoices/{id}/items`, in entry order. Empty for an unknown id.
pub async fn line_items(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<InvoiceLineItem>>> {
    let items = state
        .db
        .invoices()
        .items_for(&id)
        .await
        .map_err(ApiError::store(Invoices::NAME, "fetch invoice items"))?;
    Ok(Json(items))
}
