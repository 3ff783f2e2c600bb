//! Payments, expenses and journal entries.

use khata_core::input::{
    ExpensePatch, JournalEntryPatch, NewExpense, NewJournalEntry, NewPayment, PaymentPatch,
};
use khata_core::{Expense, JournalEntry, Payment};
use khata_db::{Database, DbResult};
use serde::Deserialize;

use super::resource::{empty_as_none, NoFilter, Resource};

pub struct Payments;

/// `GET /api/payments?invoiceId=...`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentFilter {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub invoice_id: Option<String>,
}

impl Resource for Payments {
    const NAME: &'static str = "payment";
    const PLURAL: &'static str = "payments";

    type Record = Payment;
    type New = NewPayment;
    type Patch = PaymentPatch;
    type Filter = PaymentFilter;

    async fn list(db: &Database, filter: PaymentFilter) -> DbResult<Vec<Payment>> {
        db.payments().list(filter.invoice_id.as_deref()).await
    }

    async fn get(db: &Database, id: &str) -> DbResult<Option<Payment>> {
        db.payments().get(id).await
    }

    async fn create(db: &Database, new: NewPayment) -> DbResult<Payment> {
        db.payments().create(&new).await
    }

    async fn update(db: &Database, id: &str, patch: PaymentPatch) -> DbResult<Option<Payment>> {
        db.payments().update(id, &patch).await
    }

    async fn delete(db: &Database, id: &str) -> DbResult<bool> {
        db.payments().delete(id).await
    }
}

pub struct Expenses;

impl Resource for Expenses {
    const NAME: &'static str = "expense";
    const PLURAL: &'static str = "expenses";

    type Record = Expense;
    type New = NewExpense;
    type Patch = ExpensePatch;
    type Filter = NoFilter;

    async fn list(db: &Database, _: NoFilter) -> DbResult<Vec<Expense>> {
        db.expenses().list().await
    }

    async fn get(db: &Database, id: &str) -> DbResult<Option<Expense>> {
        db.expenses().get(id).await
    }

    async fn create(db: &Database, new: NewExpense) -> DbResult<Expense> {
        db.expenses().create(&new).await
    }

    async fn update(db: &Database, id: &str, patch: ExpensePatch) -> DbResult<Option<Expense>> {
        db.expenses().update(id, &patch).await
    }

    async fn delete(db: &Database, id: &str) -> DbResult<bool> {
        db.expenses().delete(id).await
    }
}

pub struct JournalEntries;

impl Resource for JournalEntries {
    const NAME: &'static str = "journal entry";
    const PLURAL: &'static str = "journal entries";

    type Record = JournalEntry;
    type New = NewJournalEntry;
    type Patch = JournalEntryPatch;
    type Filter = NoFilter;

    async fn list(db: &Database, _: NoFilter) -> DbResult<Vec<JournalEntry>> {
        db.journal().list().await
    }

    async fn get(db: &Database, id: &str) -> DbResult<Option<JournalEntry>> {
        db.journal().get(id).await
    }

    async fn create(db: &Database, new: NewJournalEntry) -> DbResult<JournalEntry> {
        db.journal().create(&new).await
    }

    async fn update(
        db: &Database,
        id: &str,
        patch: JournalEntryPatch,
    ) -> DbResult<Option<JournalEntry>> {
        db.journal().update(id, &patch).await
    }

    async fn delete(db: &Database, id: &str) -> DbResult<bool> {
        db.journal().delete(id).await
    }
}
