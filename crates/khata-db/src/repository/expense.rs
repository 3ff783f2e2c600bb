//! # Expense Repository

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::new_id;
use khata_core::input::{ExpensePatch, NewExpense};
use khata_core::Expense;

const COLUMNS: &str = "id, category, amount, date, description, payment_mode";

#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    pool: SqlitePool,
}

impl ExpenseRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ExpenseRepository { pool }
    }

    /// Lists expenses, newest first.
    pub async fn list(&self) -> DbResult<Vec<Expense>> {
        let expenses = sqlx::query_as::<_, Expense>(&format!(
            "SELECT {COLUMNS} FROM expenses ORDER BY date DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(expenses)
    }

    pub async fn get(&self, id: &str) -> DbResult<Option<Expense>> {
        let expense = sqlx::query_as::<_, Expense>(&format!(
            "SELECT {COLUMNS} FROM expenses WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(expense)
    }

    pub async fn create(&self, new: &NewExpense) -> DbResult<Expense> {
        let id = new_id();
        debug!(id = %id, category = %new.category, amount = %new.amount, "Creating expense");

        let expense = sqlx::query_as::<_, Expense>(&format!(
            "INSERT INTO expenses (id, category, amount, date, description, payment_mode)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING {COLUMNS}"
        ))
        .bind(&id)
        .bind(&new.category)
        .bind(new.amount)
        .bind(new.date.unwrap_or_else(Utc::now))
        .bind(&new.description)
        .bind(&new.payment_mode)
        .fetch_one(&self.pool)
        .await?;

        Ok(expense)
    }

    pub async fn update(&self, id: &str, patch: &ExpensePatch) -> DbResult<Option<Expense>> {
        debug!(id = %id, "Updating expense");

        let expense = sqlx::query_as::<_, Expense>(&format!(
            "UPDATE expenses SET
                category = COALESCE(?2, category),
                amount = COALESCE(?3, amount),
                date = COALESCE(?4, date),
                description = COALESCE(?5, description),
                payment_mode = COALESCE(?6, payment_mode)
             WHERE id = ?1
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&patch.category)
        .bind(patch.amount)
        .bind(patch.date)
        .bind(&patch.description)
        .bind(&patch.payment_mode)
        .fetch_optional(&self.pool)
        .await?;

        Ok(expense)
    }

    pub async fn delete(&self, id: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::test_db;
    use chrono::{Duration, TimeZone, Utc};
    use khata_core::Money;

    fn expense(category: &str, days_ago: i64) -> NewExpense {
        NewExpense {
            category: category.into(),
            amount: Money::from_paise(150000),
            date: Some(Utc::now() - Duration::days(days_ago)),
            description: None,
            payment_mode: Some("bank".into()),
        }
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let db = test_db().await;
        db.expenses().create(&expense("Rent", 30)).await.unwrap();
        db.expenses().create(&expense("Electricity", 1)).await.unwrap();

        let categories: Vec<_> = db
            .expenses()
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.category)
            .collect();
        assert_eq!(categories, ["Electricity", "Rent"]);
    }

    #[tokio::test]
    async fn test_expense_update() {
        let db = test_db().await;
        let created = db.expenses().create(&expense("Travel", 0)).await.unwrap();

        let patch = ExpensePatch {
            amount: Some(Money::from_paise(99900)),
            ..Default::default()
        };
        let updated = db.expenses().update(&created.id, &patch).await.unwrap().unwrap();

        assert_eq!(updated.amount.to_string(), "999.00");
        assert_eq!(updated.category, "Travel");
        assert!(db.expenses().delete(&created.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips() {
        let db = test_db().await;
        let new = NewExpense {
            category: "Electricity".into(),
            amount: Money::from_paise(380050),
            date: Some(Utc.with_ymd_and_hms(2026, 2, 28, 18, 0, 0).unwrap()),
            description: Some("February bill".into()),
            payment_mode: Some("bank".into()),
        };

        let created = db.expenses().create(&new).await.unwrap();
        let fetched = db.expenses().get(&created.id).await.unwrap().unwrap();

        assert_eq!(created, fetched);
        assert_eq!(fetched.category, new.category);
        assert_eq!(fetched.amount, new.amount);
        assert_eq!(Some(fetched.date), new.date);
        assert_eq!(fetched.description, new.description);
        assert_eq!(fetched.payment_mode, new.payment_mode);
    }
}
