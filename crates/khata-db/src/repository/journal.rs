//! # Journal Entry Repository
//!
//! General-ledger vouchers. `voucher_number` is unique.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::new_id;
use khata_core::input::{JournalEntryPatch, NewJournalEntry};
use khata_core::JournalEntry;

const COLUMNS: &str = "id, voucher_number, date, description, amount, entry_type";

#[derive(Debug, Clone)]
pub struct JournalRepository {
    pool: SqlitePool,
}

impl JournalRepository {
    pub fn new(pool: SqlitePool) -> Self {
        JournalRepository { pool }
    }

    /// Lists entries, newest first.
    pub async fn list(&self) -> DbResult<Vec<JournalEntry>> {
        let entries = sqlx::query_as::<_, JournalEntry>(&format!(
            "SELECT {COLUMNS} FROM journal_entries ORDER BY date DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    pub async fn get(&self, id: &str) -> DbResult<Option<JournalEntry>> {
        let entry = sqlx::query_as::<_, JournalEntry>(&format!(
            "SELECT {COLUMNS} FROM journal_entries WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    pub async fn create(&self, new: &NewJournalEntry) -> DbResult<JournalEntry> {
        let id = new_id();
        debug!(id = %id, voucher_number = %new.voucher_number, "Creating journal entry");

        let entry = sqlx::query_as::<_, JournalEntry>(&format!(
            "INSERT INTO journal_entries (id, voucher_number, date, description, amount, entry_type)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING {COLUMNS}"
        ))
        .bind(&id)
        .bind(&new.voucher_number)
        .bind(new.date.unwrap_or_else(Utc::now))
        .bind(&new.description)
        .bind(new.amount)
        .bind(&new.entry_type)
        .fetch_one(&self.pool)
        .await?;

        Ok(entry)
    }

    pub async fn update(
        &self,
        id: &str,
        patch: &JournalEntryPatch,
    ) -> DbResult<Option<JournalEntry>> {
        debug!(id = %id, "Updating journal entry");

        let entry = sqlx::query_as::<_, JournalEntry>(&format!(
            "UPDATE journal_entries SET
                voucher_number = COALESCE(?2, voucher_number),
                date = COALESCE(?3, date),
                description = COALESCE(?4, description),
                amount = COALESCE(?5, amount),
                entry_type = COALESCE(?6, entry_type)
             WHERE id = ?1
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&patch.voucher_number)
        .bind(patch.date)
        .bind(&patch.description)
        .bind(patch.amount)
        .bind(&patch.entry_type)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    pub async fn delete(&self, id: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM journal_entries WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
