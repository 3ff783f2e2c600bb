//! # HTTP Handlers
//!
//! Route table for `/api`.
//!
//! ```text
//! /customers  /vendors  /categories          uniform CRUD
//! /items                                     uniform CRUD + /low-stock
//! /invoices                                  uniform CRUD + /next-number, /{id}/items
//! /payments (?invoiceId=)  /expenses  /journal-entries
//! /stock-transactions (?itemId=)             list, create, get
//! /dashboard/stats
//! /health
//! ```

pub mod accounts;
pub mod catalogue;
pub mod dashboard;
pub mod invoices;
pub mod parties;
pub mod resource;
pub mod stock;

use axum::routing::get;
use axum::Router;

use crate::SharedState;
use resource::routes;

pub fn router() -> Router<SharedState> {
    Router::new()
        .nest("/customers", routes::<parties::Customers>())
        .nest("/vendors", routes::<parties::Vendors>())
        .nest("/categories", routes::<catalogue::Categories>())
        .nest(
            "/items",
            routes::<catalogue::Items>().route("/low-stock", get(catalogue::low_stock)),
        )
        .nest(
            "/invoices",
            routes::<invoices::Invoices>()
                .route("/next-number", get(invoices::next_number))
                .route("/{id}/items", get(invoices::line_items)),
        )
        .nest(
            "/stock-transactions",
            Router::new()
                .route("/", get(stock::list).post(stock::create))
                .route("/{id}", get(stock::fetch)),
        )
        .nest("/payments", routes::<accounts::Payments>())
        .nest("/expenses", routes::<accounts::Expenses>())
        .nest("/journal-entries", routes::<accounts::JournalEntries>())
        .route("/dashboard/stats", get(dashboard::stats))
        .route("/health", get(dashboard::health))
}
