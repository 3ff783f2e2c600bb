//! # Domain Types
//!
//! Records as they are stored and returned by the API.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Parties            Inventory               Billing                     │
//! │  ───────            ─────────               ───────                     │
//! │  Customer ◄──────┐  Category ◄── Item ◄──┐  Invoice ◄── InvoiceLineItem │
//! │  Vendor          └──────────────────────── customer_id     item_id ─┘   │
//! │                      StockTransaction ──► item_id                       │
//! │                                                                         │
//! │  Accounting: Payment (─► invoice_id?), Expense, JournalEntry            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every record is identified by a UUID v4 string generated by the
//! repository on insert. Amounts are [`Money`], tax rates are [`TaxRate`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ts_rs::TS;

use crate::money::{format_hundredths, HundredthsVisitor, Money};

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 1800 bps = 18% (the common GST slab).
/// On the wire the rate is a percentage string: `"18.00"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a whole percentage.
    #[inline]
    pub const fn from_percent(pct: u32) -> Self {
        TaxRate(pct * 100)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

/// Default GST slab applied to new items.
impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::from_percent(18)
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_hundredths(i64::from(self.0), f)
    }
}

impl Serialize for TaxRate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TaxRate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bps = deserializer.deserialize_str(HundredthsVisitor("a percentage string"))?;
        u32::try_from(bps)
            .map(TaxRate)
            .map_err(|_| serde::de::Error::custom("tax rate cannot be negative"))
    }
}

// =============================================================================
// Parties
// =============================================================================

/// A customer that invoices are raised against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// GST identification number, stored opaque.
    pub gstin: Option<String>,
}

/// A supplier. Same shape as a customer, never referenced by invoices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Vendor {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub gstin: Option<String>,
}

// =============================================================================
// Inventory
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// A stocked item (product or material).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub sku: Option<String>,
    /// Harmonized System of Nomenclature code.
    pub hsn: Option<String>,
    pub barcode: Option<String>,
    pub category_id: Option<String>,
    /// Unit of measure, `"pcs"` unless stated.
    pub unit: String,
    #[ts(type = "string")]
    pub purchase_price: Money,
    #[ts(type = "string")]
    pub selling_price: Money,
    #[ts(type = "string")]
    pub gst_rate: TaxRate,
    /// On-hand quantity. Only stock transactions should move it.
    pub stock: i64,
    pub reorder_level: i64,
}

impl Item {
    /// True when stock has fallen to or below the reorder level.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.reorder_level
    }
}

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum StockMovement {
    /// Goods received; stock goes up.
    In,
    /// Goods issued or sold; stock goes down.
    Out,
}

impl StockMovement {
    /// Signed change in stock for `quantity` units moving this way.
    #[inline]
    pub const fn delta(&self, quantity: i64) -> i64 {
        match self {
            StockMovement::In => quantity,
            StockMovement::Out => -quantity,
        }
    }
}

/// Append-only audit row for a single stock movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StockTransaction {
    pub id: String,
    pub item_id: String,
    #[serde(rename = "type")]
    pub kind: StockMovement,
    pub quantity: i64,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    /// Free-form reference, e.g. the invoice number for sales.
    pub reference: Option<String>,
    pub notes: Option<String>,
}

// =============================================================================
// Billing
// =============================================================================

/// Invoice lifecycle status.
///
/// ## Transitions
/// ```text
///   draft ──► pending ──► paid
///     │   ◄──    │          ▲
///     │          ▼          │
///     │       overdue ──────┤
///     └─────────────────────┘
/// ```
/// `paid` is terminal. Staying in the same status is always allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum InvoiceStatus {
    /// Not finalised; does not move stock or count as a sale.
    Draft,
    Pending,
    Paid,
    Overdue,
}

impl InvoiceStatus {
    pub const ALL: [InvoiceStatus; 4] = [
        InvoiceStatus::Draft,
        InvoiceStatus::Pending,
        InvoiceStatus::Paid,
        InvoiceStatus::Overdue,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
        }
    }

    /// Whether an invoice in this status has committed its stock.
    #[inline]
    pub const fn affects_stock(&self) -> bool {
        !matches!(self, InvoiceStatus::Draft)
    }

    /// Checks the transition table.
    pub const fn can_transition_to(&self, next: InvoiceStatus) -> bool {
        use InvoiceStatus::*;
        match (*self, next) {
            (Draft, Draft) | (Pending, Pending) | (Paid, Paid) | (Overdue, Overdue) => true,
            (Draft, Pending) | (Draft, Paid) => true,
            (Pending, Paid) | (Pending, Overdue) | (Pending, Draft) => true,
            (Overdue, Paid) | (Overdue, Pending) => true,
            _ => false,
        }
    }
}

impl Default for InvoiceStatus {
    fn default() -> Self {
        InvoiceStatus::Draft
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sales invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Invoice {
    pub id: String,
    /// Business identifier, `INV-NNN`. Unique.
    pub invoice_number: String,
    pub customer_id: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub due_date: Option<DateTime<Utc>>,
    #[ts(type = "string")]
    pub subtotal: Money,
    #[ts(type = "string")]
    pub discount: Money,
    #[ts(type = "string")]
    pub tax: Money,
    /// Always `subtotal - discount + tax`.
    #[ts(type = "string")]
    pub total: Money,
    pub status: InvoiceStatus,
    pub payment_mode: Option<String>,
    pub notes: Option<String>,
}

/// One billed line on an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceLineItem {
    pub id: String,
    pub invoice_id: String,
    pub item_id: String,
    pub description: Option<String>,
    pub quantity: i64,
    #[ts(type = "string")]
    pub rate: Money,
    #[ts(type = "string")]
    pub tax_rate: TaxRate,
    /// Always `quantity * rate` plus tax at `tax_rate`.
    #[ts(type = "string")]
    pub amount: Money,
}

/// Line amount including tax: `quantity * rate * (1 + tax_rate / 100)`.
///
/// The tax part is rounded half up to the paisa, once per line.
/// `None` when the amount does not fit in paise.
pub fn line_amount(quantity: i64, rate: Money, tax_rate: TaxRate) -> Option<Money> {
    let base = rate.checked_mul_quantity(quantity)?;
    base.checked_add(base.calculate_tax(tax_rate)?)
}

/// Invoice total: `subtotal - discount + tax`. `None` on overflow.
#[inline]
pub fn invoice_total(subtotal: Money, discount: Money, tax: Money) -> Option<Money> {
    subtotal.checked_sub(discount)?.checked_add(tax)
}

// =============================================================================
// Accounting
// =============================================================================

/// Money received, optionally against an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Payment {
    pub id: String,
    pub invoice_id: Option<String>,
    #[ts(type = "string")]
    pub amount: Money,
    pub payment_mode: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Expense {
    pub id: String,
    /// Free-text expense head ("Rent", "Travel", ...).
    pub category: String,
    #[ts(type = "string")]
    pub amount: Money,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub description: Option<String>,
    pub payment_mode: Option<String>,
}

/// A general-ledger voucher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct JournalEntry {
    pub id: String,
    pub voucher_number: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub description: String,
    #[ts(type = "string")]
    pub amount: Money,
    #[serde(rename = "type")]
    pub entry_type: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_wire_format() {
        let rate = TaxRate::from_percent(18);
        assert_eq!(rate.bps(), 1800);
        assert_eq!(serde_json::to_string(&rate).unwrap(), "\"18.00\"");

        let back: TaxRate = serde_json::from_str("\"12.5\"").unwrap();
        assert_eq!(back.bps(), 1250);
        assert!(serde_json::from_str::<TaxRate>("\"-5\"").is_err());
    }

    #[test]
    fn test_tax_rate_default_is_eighteen_percent() {
        assert_eq!(TaxRate::default(), TaxRate::from_bps(1800));
    }

    #[test]
    fn test_stock_movement_delta() {
        assert_eq!(StockMovement::In.delta(5), 5);
        assert_eq!(StockMovement::Out.delta(5), -5);
        assert_eq!(serde_json::to_string(&StockMovement::Out).unwrap(), "\"out\"");
    }

    #[test]
    fn test_invoice_status_default_and_names() {
        assert_eq!(InvoiceStatus::default(), InvoiceStatus::Draft);
        for status in InvoiceStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
        assert!(serde_json::from_str::<InvoiceStatus>("\"cancelled\"").is_err());
    }

    #[test]
    fn test_invoice_status_transitions() {
        use InvoiceStatus::*;

        assert!(Draft.can_transition_to(Pending));
        assert!(Draft.can_transition_to(Paid));
        assert!(!Draft.can_transition_to(Overdue));
        assert!(Pending.can_transition_to(Overdue));
        assert!(Overdue.can_transition_to(Paid));
        assert!(!Paid.can_transition_to(Pending));
        assert!(!Paid.can_transition_to(Draft));
        for status in InvoiceStatus::ALL {
            assert!(status.can_transition_to(status));
        }
    }

    #[test]
    fn test_only_drafts_leave_stock_alone() {
        assert!(!InvoiceStatus::Draft.affects_stock());
        assert!(InvoiceStatus::Pending.affects_stock());
        assert!(InvoiceStatus::Paid.affects_stock());
        assert!(InvoiceStatus::Overdue.affects_stock());
    }

    #[test]
    fn test_line_amount_includes_tax() {
        // 3 × ₹100.00 at 18% = ₹354.00
        let amount = line_amount(3, Money::from_paise(10000), TaxRate::from_percent(18));
        assert_eq!(amount, Some(Money::from_paise(35400)));

        // 1 × ₹0.99 at 5% = 0.99 + 0.0495 → 1.04
        let amount = line_amount(1, Money::from_paise(99), TaxRate::from_percent(5));
        assert_eq!(amount, Some(Money::from_paise(104)));

        assert_eq!(line_amount(i64::MAX, Money::from_paise(10000), TaxRate::zero()), None);
    }

    #[test]
    fn test_invoice_total() {
        let total = invoice_total(
            Money::from_paise(100000),
            Money::from_paise(5000),
            Money::from_paise(17100),
        );
        assert_eq!(total, Some(Money::from_paise(112100)));

        let overflowing = invoice_total(Money::from_paise(i64::MAX), Money::zero(), Money::from_paise(100));
        assert_eq!(overflowing, None);
    }

    #[test]
    fn test_item_low_stock_boundary() {
        let mut item = Item {
            id: "i".into(),
            name: "Stapler".into(),
            sku: None,
            hsn: None,
            barcode: None,
            category_id: None,
            unit: "pcs".into(),
            purchase_price: Money::from_paise(100),
            selling_price: Money::from_paise(150),
            gst_rate: TaxRate::default(),
            stock: 5,
            reorder_level: 8,
        };
        assert!(item.is_low_stock());
        item.stock = 8;
        assert!(item.is_low_stock());
        item.stock = 12;
        assert!(!item.is_low_stock());
    }
}
