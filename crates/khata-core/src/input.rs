//! # Input Types
//!
//! Request payloads for creating (`New*`) and partially updating (`*Patch`)
//! records, plus the rules each must satisfy before reaching the store.
//!
//! ## Create vs Patch
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST  body ──► New*    ──► validate() ──► repository.create()          │
//! │                 required fields enforced by serde, defaults applied     │
//! │                                                                         │
//! │  PATCH body ──► *Patch  ──► validate() ──► repository.update()          │
//! │                 every field optional; at least one must be present      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A patch field that is absent (or `null`) leaves the stored value alone.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{
    invoice_total, line_amount, Invoice, InvoiceStatus, StockMovement, TaxRate,
};
use crate::validation::{
    validate_amount, validate_derived, validate_name, validate_non_negative_count,
    validate_optional_text, validate_positive_amount, validate_quantity, validate_reference,
    validate_tax_rate, ValidationResult,
};

/// Unit of measure applied when none is given.
pub const DEFAULT_UNIT: &str = "pcs";

/// Reorder level applied when none is given.
pub const DEFAULT_REORDER_LEVEL: i64 = 10;

/// Business rules for an input payload.
pub trait Validate {
    fn validate(&self) -> ValidationResult<()>;
}

fn require_fields(is_empty: bool) -> ValidationResult<()> {
    if is_empty {
        Err(ValidationError::EmptyUpdate)
    } else {
        Ok(())
    }
}

// =============================================================================
// Parties
// =============================================================================

/// Create payload shared by customers and vendors.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewParty {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub gstin: Option<String>,
}

pub type NewCustomer = NewParty;
pub type NewVendor = NewParty;

impl Validate for NewParty {
    fn validate(&self) -> ValidationResult<()> {
        validate_name("name", &self.name)?;
        validate_optional_text("email", self.email.as_deref())?;
        validate_optional_text("phone", self.phone.as_deref())?;
        validate_optional_text("address", self.address.as_deref())?;
        validate_optional_text("gstin", self.gstin.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub gstin: Option<String>,
}

pub type CustomerPatch = PartyPatch;
pub type VendorPatch = PartyPatch;

impl PartyPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.gstin.is_none()
    }
}

impl Validate for PartyPatch {
    fn validate(&self) -> ValidationResult<()> {
        require_fields(self.is_empty())?;
        if let Some(name) = &self.name {
            validate_name("name", name)?;
        }
        validate_optional_text("email", self.email.as_deref())?;
        validate_optional_text("phone", self.phone.as_deref())?;
        validate_optional_text("address", self.address.as_deref())?;
        validate_optional_text("gstin", self.gstin.as_deref())
    }
}

// =============================================================================
// Categories
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCategory {
    pub name: String,
}

impl Validate for NewCategory {
    fn validate(&self) -> ValidationResult<()> {
        validate_name("name", &self.name)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryPatch {
    #[serde(default)]
    pub name: Option<String>,
}

impl CategoryPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
    }
}

impl Validate for CategoryPatch {
    fn validate(&self) -> ValidationResult<()> {
        match &self.name {
            Some(name) => validate_name("name", name),
            None => Err(ValidationError::EmptyUpdate),
        }
    }
}

// =============================================================================
// Items
// =============================================================================

fn default_unit() -> String {
    DEFAULT_UNIT.to_string()
}

fn default_reorder_level() -> i64 {
    DEFAULT_REORDER_LEVEL
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub hsn: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default = "default_unit")]
    pub unit: String,
    pub purchase_price: Money,
    pub selling_price: Money,
    #[serde(default)]
    pub gst_rate: TaxRate,
    #[serde(default)]
    pub stock: i64,
    #[serde(default = "default_reorder_level")]
    pub reorder_level: i64,
}

impl NewItem {
    /// A new item with the stated prices and every default applied.
    pub fn new(name: impl Into<String>, purchase_price: Money, selling_price: Money) -> Self {
        NewItem {
            name: name.into(),
            sku: None,
            hsn: None,
            barcode: None,
            category_id: None,
            unit: default_unit(),
            purchase_price,
            selling_price,
            gst_rate: TaxRate::default(),
            stock: 0,
            reorder_level: DEFAULT_REORDER_LEVEL,
        }
    }
}

impl Validate for NewItem {
    fn validate(&self) -> ValidationResult<()> {
        validate_name("name", &self.name)?;
        validate_name("unit", &self.unit)?;
        validate_optional_text("sku", self.sku.as_deref())?;
        validate_optional_text("hsn", self.hsn.as_deref())?;
        validate_optional_text("barcode", self.barcode.as_deref())?;
        if let Some(category_id) = &self.category_id {
            validate_reference("categoryId", category_id)?;
        }
        validate_amount("purchasePrice", self.purchase_price)?;
        validate_amount("sellingPrice", self.selling_price)?;
        validate_tax_rate("gstRate", self.gst_rate)?;
        validate_non_negative_count("stock", self.stock)?;
        validate_non_negative_count("reorderLevel", self.reorder_level)
    }
}

/// Partial item update.
///
/// `stock` is accepted here and written directly, without a stock
/// transaction row. Use a stock transaction to keep the audit trail.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub hsn: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub purchase_price: Option<Money>,
    #[serde(default)]
    pub selling_price: Option<Money>,
    #[serde(default)]
    pub gst_rate: Option<TaxRate>,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub reorder_level: Option<i64>,
}

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.sku.is_none()
            && self.hsn.is_none()
            && self.barcode.is_none()
            && self.category_id.is_none()
            && self.unit.is_none()
            && self.purchase_price.is_none()
            && self.selling_price.is_none()
            && self.gst_rate.is_none()
            && self.stock.is_none()
            && self.reorder_level.is_none()
    }
}

impl Validate for ItemPatch {
    fn validate(&self) -> ValidationResult<()> {
        require_fields(self.is_empty())?;
        if let Some(name) = &self.name {
            validate_name("name", name)?;
        }
        if let Some(unit) = &self.unit {
            validate_name("unit", unit)?;
        }
        validate_optional_text("sku", self.sku.as_deref())?;
        validate_optional_text("hsn", self.hsn.as_deref())?;
        validate_optional_text("barcode", self.barcode.as_deref())?;
        if let Some(category_id) = &self.category_id {
            validate_reference("categoryId", category_id)?;
        }
        if let Some(price) = self.purchase_price {
            validate_amount("purchasePrice", price)?;
        }
        if let Some(price) = self.selling_price {
            validate_amount("sellingPrice", price)?;
        }
        if let Some(rate) = self.gst_rate {
            validate_tax_rate("gstRate", rate)?;
        }
        if let Some(level) = self.reorder_level {
            validate_non_negative_count("reorderLevel", level)?;
        }
        Ok(())
    }
}

// =============================================================================
// Invoices
// =============================================================================

/// Invoice header fields.
///
/// `invoice_number` is assigned from the numbering sequence when omitted.
/// `total` is derived when omitted and must match when supplied.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInvoice {
    #[serde(default)]
    pub invoice_number: Option<String>,
    pub customer_id: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    pub subtotal: Money,
    #[serde(default)]
    pub discount: Money,
    pub tax: Money,
    #[serde(default)]
    pub total: Option<Money>,
    #[serde(default)]
    pub status: InvoiceStatus,
    #[serde(default)]
    pub payment_mode: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewInvoice {
    pub fn new(customer_id: impl Into<String>, subtotal: Money, tax: Money) -> Self {
        NewInvoice {
            invoice_number: None,
            customer_id: customer_id.into(),
            date: None,
            due_date: None,
            subtotal,
            discount: Money::zero(),
            tax,
            total: None,
            status: InvoiceStatus::Draft,
            payment_mode: None,
            notes: None,
        }
    }

    /// The stored total: `subtotal - discount + tax`.
    pub fn resolved_total(&self) -> ValidationResult<Money> {
        let expected = invoice_total(self.subtotal, self.discount, self.tax);
        validate_derived("total", expected, self.total)
    }
}

impl Validate for NewInvoice {
    fn validate(&self) -> ValidationResult<()> {
        if let Some(number) = &self.invoice_number {
            validate_name("invoiceNumber", number)?;
        }
        validate_reference("customerId", &self.customer_id)?;
        validate_amount("subtotal", self.subtotal)?;
        validate_amount("discount", self.discount)?;
        validate_amount("tax", self.tax)?;
        validate_optional_text("paymentMode", self.payment_mode.as_deref())?;
        validate_optional_text("notes", self.notes.as_deref())?;
        self.resolved_total().map(|_| ())
    }
}

/// One line of a new invoice. `amount` is derived when omitted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInvoiceLineItem {
    pub item_id: String,
    #[serde(default)]
    pub description: Option<String>,
    pub quantity: i64,
    pub rate: Money,
    pub tax_rate: TaxRate,
    #[serde(default)]
    pub amount: Option<Money>,
}

impl NewInvoiceLineItem {
    pub fn new(item_id: impl Into<String>, quantity: i64, rate: Money, tax_rate: TaxRate) -> Self {
        NewInvoiceLineItem {
            item_id: item_id.into(),
            description: None,
            quantity,
            rate,
            tax_rate,
            amount: None,
        }
    }

    /// The stored amount: `quantity * rate` plus tax at `tax_rate`.
    pub fn resolved_amount(&self) -> ValidationResult<Money> {
        let expected = line_amount(self.quantity, self.rate, self.tax_rate);
        validate_derived("amount", expected, self.amount)
    }
}

impl Validate for NewInvoiceLineItem {
    fn validate(&self) -> ValidationResult<()> {
        validate_reference("itemId", &self.item_id)?;
        validate_optional_text("description", self.description.as_deref())?;
        validate_quantity(self.quantity)?;
        validate_amount("rate", self.rate)?;
        validate_tax_rate("taxRate", self.tax_rate)?;
        self.resolved_amount().map(|_| ())
    }
}

/// `POST /api/invoices` body: the header fields plus an `items` array.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvoice {
    #[serde(flatten)]
    pub invoice: NewInvoice,
    #[serde(default)]
    pub items: Vec<NewInvoiceLineItem>,
}

impl Validate for CreateInvoice {
    fn validate(&self) -> ValidationResult<()> {
        self.invoice.validate()?;
        self.items.iter().try_for_each(Validate::validate)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePatch {
    #[serde(default)]
    pub invoice_number: Option<String>,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub subtotal: Option<Money>,
    #[serde(default)]
    pub discount: Option<Money>,
    #[serde(default)]
    pub tax: Option<Money>,
    #[serde(default)]
    pub total: Option<Money>,
    #[serde(default)]
    pub status: Option<InvoiceStatus>,
    #[serde(default)]
    pub payment_mode: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl InvoicePatch {
    pub fn is_empty(&self) -> bool {
        self.invoice_number.is_none()
            && self.customer_id.is_none()
            && self.date.is_none()
            && self.due_date.is_none()
            && self.subtotal.is_none()
            && self.discount.is_none()
            && self.tax.is_none()
            && self.total.is_none()
            && self.status.is_none()
            && self.payment_mode.is_none()
            && self.notes.is_none()
    }

    /// Merges the patch over `current`.
    ///
    /// Checks the status transition and recomputes `total` from the merged
    /// amounts. A supplied `total` must match the recomputed one.
    pub fn apply_to(&self, current: &Invoice) -> CoreResult<Invoice> {
        let status = self.status.unwrap_or(current.status);
        if !current.status.can_transition_to(status) {
            return Err(CoreError::InvalidStatusTransition {
                from: current.status,
                to: status,
            });
        }

        let subtotal = self.subtotal.unwrap_or(current.subtotal);
        let discount = self.discount.unwrap_or(current.discount);
        let tax = self.tax.unwrap_or(current.tax);
        let total = validate_derived("total", invoice_total(subtotal, discount, tax), self.total)?;

        Ok(Invoice {
            id: current.id.clone(),
            invoice_number: self
                .invoice_number
                .clone()
                .unwrap_or_else(|| current.invoice_number.clone()),
            customer_id: self
                .customer_id
                .clone()
                .unwrap_or_else(|| current.customer_id.clone()),
            date: self.date.unwrap_or(current.date),
            due_date: self.due_date.or(current.due_date),
            subtotal,
            discount,
            tax,
            total,
            status,
            payment_mode: self.payment_mode.clone().or_else(|| current.payment_mode.clone()),
            notes: self.notes.clone().or_else(|| current.notes.clone()),
        })
    }
}

impl Validate for InvoicePatch {
    fn validate(&self) -> ValidationResult<()> {
        require_fields(self.is_empty())?;
        if let Some(number) = &self.invoice_number {
            validate_name("invoiceNumber", number)?;
        }
        if let Some(customer_id) = &self.customer_id {
            validate_reference("customerId", customer_id)?;
        }
        for (field, amount) in [
            ("subtotal", self.subtotal),
            ("discount", self.discount),
            ("tax", self.tax),
        ] {
            if let Some(amount) = amount {
                validate_amount(field, amount)?;
            }
        }
        validate_optional_text("paymentMode", self.payment_mode.as_deref())?;
        validate_optional_text("notes", self.notes.as_deref())
    }
}

// =============================================================================
// Stock Transactions
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStockTransaction {
    pub item_id: String,
    #[serde(rename = "type")]
    pub kind: StockMovement,
    pub quantity: i64,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewStockTransaction {
    pub fn new(item_id: impl Into<String>, kind: StockMovement, quantity: i64) -> Self {
        NewStockTransaction {
            item_id: item_id.into(),
            kind,
            quantity,
            date: None,
            reference: None,
            notes: None,
        }
    }
}

impl Validate for NewStockTransaction {
    fn validate(&self) -> ValidationResult<()> {
        validate_reference("itemId", &self.item_id)?;
        validate_quantity(self.quantity)?;
        validate_optional_text("reference", self.reference.as_deref())?;
        validate_optional_text("notes", self.notes.as_deref())
    }
}

// =============================================================================
// Payments
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    #[serde(default)]
    pub invoice_id: Option<String>,
    pub amount: Money,
    pub payment_mode: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reference: Option<String>,
}

impl Validate for NewPayment {
    fn validate(&self) -> ValidationResult<()> {
        if let Some(invoice_id) = &self.invoice_id {
            validate_reference("invoiceId", invoice_id)?;
        }
        validate_positive_amount("amount", self.amount)?;
        validate_name("paymentMode", &self.payment_mode)?;
        validate_optional_text("reference", self.reference.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPatch {
    #[serde(default)]
    pub invoice_id: Option<String>,
    #[serde(default)]
    pub amount: Option<Money>,
    #[serde(default)]
    pub payment_mode: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reference: Option<String>,
}

impl PaymentPatch {
    pub fn is_empty(&self) -> bool {
        self.invoice_id.is_none()
            && self.amount.is_none()
            && self.payment_mode.is_none()
            && self.date.is_none()
            && self.reference.is_none()
    }
}

impl Validate for PaymentPatch {
    fn validate(&self) -> ValidationResult<()> {
        require_fields(self.is_empty())?;
        if let Some(invoice_id) = &self.invoice_id {
            validate_reference("invoiceId", invoice_id)?;
        }
        if let Some(amount) = self.amount {
            validate_positive_amount("amount", amount)?;
        }
        if let Some(mode) = &self.payment_mode {
            validate_name("paymentMode", mode)?;
        }
        validate_optional_text("reference", self.reference.as_deref())
    }
}

// =============================================================================
// Expenses
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub category: String,
    pub amount: Money,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub payment_mode: Option<String>,
}

impl Validate for NewExpense {
    fn validate(&self) -> ValidationResult<()> {
        validate_name("category", &self.category)?;
        validate_positive_amount("amount", self.amount)?;
        validate_optional_text("description", self.description.as_deref())?;
        validate_optional_text("paymentMode", self.payment_mode.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpensePatch {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub amount: Option<Money>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub payment_mode: Option<String>,
}

impl ExpensePatch {
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.amount.is_none()
            && self.date.is_none()
            && self.description.is_none()
            && self.payment_mode.is_none()
    }
}

impl Validate for ExpensePatch {
    fn validate(&self) -> ValidationResult<()> {
        require_fields(self.is_empty())?;
        if let Some(category) = &self.category {
            validate_name("category", category)?;
        }
        if let Some(amount) = self.amount {
            validate_positive_amount("amount", amount)?;
        }
        validate_optional_text("description", self.description.as_deref())?;
        validate_optional_text("paymentMode", self.payment_mode.as_deref())
    }
}

// =============================================================================
// Journal Entries
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJournalEntry {
    pub voucher_number: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    pub description: String,
    pub amount: Money,
    #[serde(rename = "type")]
    pub entry_type: String,
}

impl Validate for NewJournalEntry {
    fn validate(&self) -> ValidationResult<()> {
        validate_name("voucherNumber", &self.voucher_number)?;
        validate_name("description", &self.description)?;
        validate_amount("amount", self.amount)?;
        validate_name("type", &self.entry_type)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntryPatch {
    #[serde(default)]
    pub voucher_number: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub amount: Option<Money>,
    #[serde(default, rename = "type")]
    pub entry_type: Option<String>,
}

impl JournalEntryPatch {
    pub fn is_empty(&self) -> bool {
        self.voucher_number.is_none()
            && self.date.is_none()
            && self.description.is_none()
            && self.amount.is_none()
            && self.entry_type.is_none()
    }
}

impl Validate for JournalEntryPatch {
    fn validate(&self) -> ValidationResult<()> {
        require_fields(self.is_empty())?;
        if let Some(number) = &self.voucher_number {
            validate_name("voucherNumber", number)?;
        }
        if let Some(description) = &self.description {
            validate_name("description", description)?;
        }
        if let Some(amount) = self.amount {
            validate_amount("amount", amount)?;
        }
        if let Some(entry_type) = &self.entry_type {
            validate_name("type", entry_type)?;
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
