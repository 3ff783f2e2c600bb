//! # khata-core: Pure Business Logic for Khata
//!
//! Entity types, money, validation and the small pieces of arithmetic the
//! rest of the system relies on. No I/O lives here.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Khata Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                SPA client (separate repository)                 │    │
//! │  └─────────────────────────────┬───────────────────────────────────┘    │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │                 apps/api-server (axum routes)                   │    │
//! │  └─────────────────────────────┬───────────────────────────────────┘    │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │               ★ khata-core (THIS CRATE) ★                       │    │
//! │  │                                                                 │    │
//! │  │   ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌───────────┐ ┌───────┐  │    │
//! │  │   │  types  │ │  money  │ │  input   │ │ numbering │ │ stats │  │    │
//! │  │   │ Invoice │ │  Money  │ │ New*/    │ │  INV-NNN  │ │ sales │  │    │
//! │  │   │  Item   │ │ TaxRate │ │ *Patch   │ │           │ │window │  │    │
//! │  │   └─────────┘ └─────────┘ └──────────┘ └───────────┘ └───────┘  │    │
//! │  │                                                                 │    │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │    │
//! │  └─────────────────────────────┬───────────────────────────────────┘    │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │                    khata-db (Database Layer)                    │    │
//! │  │              SQLite queries, migrations, repositories           │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Stored records (Customer, Item, Invoice, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point)
//! - [`input`] - Create and patch payloads with their validation
//! - [`validation`] - Field-level rules
//! - [`numbering`] - Invoice number sequence
//! - [`stats`] - Dashboard summary and its time windows
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use khata_core::{line_amount, Money, TaxRate};
//!
//! // 3 units at ₹100.00 with 18% GST
//! let amount = line_amount(3, Money::from_paise(10000), TaxRate::from_percent(18));
//! assert_eq!(amount.map(|a| a.to_string()).as_deref(), Some("354.00"));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod input;
pub mod money;
pub mod numbering;
pub mod stats;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use input::Validate;
pub use money::Money;
pub use stats::{DashboardStats, InvoiceStatusCounts};
pub use types::*;
