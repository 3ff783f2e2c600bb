//! # Vendor Repository
//!
//! Suppliers. Same shape as customers, never referenced by invoices.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::new_id;
use khata_core::input::{NewVendor, VendorPatch};
use khata_core::Vendor;

const COLUMNS: &str = "id, name, email, phone, address, gstin";

#[derive(Debug, Clone)]
pub struct VendorRepository {
    pool: SqlitePool,
}

impl VendorRepository {
    pub fn new(pool: SqlitePool) -> Self {
        VendorRepository { pool }
    }

    /// Lists all vendors ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Vendor>> {
        let vendors = sqlx::query_as::<_, Vendor>(&format!(
            "SELECT {COLUMNS} FROM vendors ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = vendors.len(), "Listed vendors");
        Ok(vendors)
    }

    pub async fn get(&self, id: &str) -> DbResult<Option<Vendor>> {
        let vendor = sqlx::query_as::<_, Vendor>(&format!(
            "SELECT {COLUMNS} FROM vendors WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vendor)
    }

    pub async fn create(&self, new: &NewVendor) -> DbResult<Vendor> {
        let id = new_id();
        debug!(id = %id, name = %new.name, "Creating vendor");

        let vendor = sqlx::query_as::<_, Vendor>(&format!(
            "INSERT INTO vendors (id, name, email, phone, address, gstin)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING {COLUMNS}"
        ))
        .bind(&id)
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.address)
        .bind(&new.gstin)
        .fetch_one(&self.pool)
        .await?;

        Ok(vendor)
    }

    pub async fn update(&self, id: &str, patch: &VendorPatch) -> DbResult<Option<Vendor>> {
        debug!(id = %id, "Updating vendor");

        let vendor = sqlx::query_as::<_, Vendor>(&format!(
            "UPDATE vendors SET
                name = COALESCE(?2, name),
                email = COALESCE(?3, email),
                phone = COALESCE(?4, phone),
                address = COALESCE(?5, address),
                gstin = COALESCE(?6, gstin)
             WHERE id = ?1
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.email)
        .bind(&patch.phone)
        .bind(&patch.address)
        .bind(&patch.gstin)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vendor)
    }

    pub async fn delete(&self, id: &str) -> DbResult<bool> {
        debug!(id = %id, "Deleting vendor");

        let result = sqlx::query("DELETE FROM vendors WHERE id = ?1")
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

    #[tokio::test]
    async fn test_vendor_lifecycle() {
        let db = test_db().await;
        let new = NewVendor {
            name: "Paper Mills Ltd".into(),
            phone: Some("011-2345678".into()),
            ..Default::default()
        };

        let created = db.vendors().create(&new).await.unwrap();
        assert_eq!(created.name, "Paper Mills Ltd");
        assert_eq!(db.vendors().list().await.unwrap().len(), 1);

        let patch = VendorPatch {
            gstin: Some("27AAACP0000A1Z1".into()),
            ..Default::default()
        };
        let updated = db.vendors().update(&created.id, &patch).await.unwrap().unwrap();
        assert_eq!(updated.gstin.as_deref(), Some("27AAACP0000A1Z1"));
        assert_eq!(updated.phone.as_deref(), Some("011-2345678"));

        assert!(db.vendors().delete(&created.id).await.unwrap());
        assert!(db.vendors().get(&created.id).await.unwrap().is_none());
        assert!(!db.vendors().delete(&created.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips() {
        let db = test_db().await;
        let new = NewVendor {
            name: "  Paper Mills Ltd  ".into(),
            email: Some("orders@papermills.example".into()),
            phone: Some("011-2345678".into()),
            address: Some("Plot 7, Okhla Phase II".into()),
            gstin: Some("07AAACP0000A1Z1".into()),
        };

        let created = db.vendors().create(&new).await.unwrap();
        let fetched = db.vendors().get(&created.id).await.unwrap().unwrap();

        assert_eq!(created, fetched);
        assert_eq!(fetched.name, new.name);
        assert_eq!(fetched.email, new.email);
        assert_eq!(fetched.phone, new.phone);
        assert_eq!(fetched.address, new.address);
        assert_eq!(fetched.gstin, new.gstin);
    }
}
