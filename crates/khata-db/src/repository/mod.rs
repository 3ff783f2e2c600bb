//! # Repository Module
//!
//! Database repository implementations for Khata.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler                                                           │
//! │       │                                                                 │
//! │       │  db.invoices().create_with_items(invoice, lines)                │
//! │       ▼                                                                 │
//! │  InvoiceRepository                                                      │
//! │  ├── list / get / create / update / delete                              │
//! │  ├── items_for / insert_item / delete_items                             │
//! │  ├── next_invoice_number                                                │
//! │  └── create_with_items ──► stock::adjust_stock (same transaction)       │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Conventions
//! - `get` and `update` return `Ok(None)` for an unknown id
//! - `delete` returns `Ok(false)` for an unknown id
//! - Partial updates use `COALESCE(?, column)`: a `None` keeps the stored value
//! - Ids are UUID v4, generated here on insert

pub mod category;
pub mod customer;
pub mod dashboard;
pub mod expense;
pub mod invoice;
pub mod item;
pub mod journal;
pub mod payment;
pub mod stock;
pub mod vendor;

pub use category::CategoryRepository;
pub use customer::CustomerRepository;
pub use dashboard::DashboardRepository;
pub use expense::ExpenseRepository;
pub use invoice::InvoiceRepository;
pub use item::ItemRepository;
pub use journal::JournalRepository;
pub use payment::PaymentRepository;
pub use stock::StockRepository;
pub use vendor::VendorRepository;

/// Generates a new record id.
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
pub(crate) mod test_support {
    use khata_core::input::{NewInvoice, NewInvoiceLineItem, NewItem, NewParty};
    use khata_core::{Customer, InvoiceStatus, Item, Money, TaxRate};

    use crate::{Database, DbConfig};

    pub async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    pub async fn customer(db: &Database, name: &str) -> Customer {
        let new = NewParty {
            name: name.to_string(),
            ..Default::default()
        };
        db.customers().create(&new).await.unwrap()
    }

    pub async fn item(db: &Database, name: &str, stock: i64) -> Item {
        let mut new = NewItem::new(name, Money::from_paise(8000), Money::from_paise(10000));
        new.stock = stock;
        db.items().create(&new).await.unwrap()
    }

    pub fn invoice(customer_id: &str, status: InvoiceStatus) -> NewInvoice {
        let mut new = NewInvoice::new(customer_id, Money::from_paise(30000), Money::from_paise(5400));
        new.status = status;
        new
    }

    pub fn line(item_id: &str, quantity: i64) -> NewInvoiceLineItem {
        NewInvoiceLineItem::new(item_id, quantity, Money::from_paise(10000), TaxRate::from_percent(18))
    }
}
