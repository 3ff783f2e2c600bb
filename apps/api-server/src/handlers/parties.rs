//! Customers and vendors.

use khata_core::input::{CustomerPatch, NewCustomer, NewVendor, VendorPatch};
use khata_core::{Customer, Vendor};
use khata_db::{Database, DbResult};

use super::resource::{NoFilter, Resource};

pub struct Customers;

impl Resource for Customers {
    const NAME: &'static str = "customer";
    const PLURAL: &'static str = "customers";

    type Record = Customer;
    type New = NewCustomer;
    type Patch = CustomerPatch;
    type Filter = NoFilter;

    async fn list(db: &Database, _: NoFilter) -> DbResult<Vec<Customer>> {
        db.customers().list().await
    }

    async fn get(db: &Database, id: &str) -> DbResult<Option<Customer>> {
        db.customers().get(id).await
    }

    async fn create(db: &Database, new: NewCustomer) -> DbResult<Customer> {
        db.customers().create(&new).await
    }

    async fn update(db: &Database, id: &str, patch: CustomerPatch) -> DbResult<Option<Customer>> {
        db.customers().update(id, &patch).await
    }

    async fn delete(db: &Database, id: &str) -> DbResult<bool> {
        db.customers().delete(id).await
    }
}

pub struct Vendors;

impl Resource for Vendors {
    const NAME: &'static str = "vendor";
    const PLURAL: &'static str = "vendors";

    type Record = Vendor;
    type New = NewVendor;
    type Patch = VendorPatch;
    type Filter = NoFilter;

    async fn list(db: &Database, _: NoFilter) -> DbResult<Vec<Vendor>> {
        db.vendors().list().await
    }

    async fn get(db: &Database, id: &str) -> DbResult<Option<Vendor>> {
        db.vendors().get(id).await
    }

    async fn create(db: &Database, new: NewVendor) -> DbResult<Vendor> {
        db.vendors().create(&new).await
    }

    async fn update(db: &Database, id: &str, patch: VendorPatch) -> DbResult<Option<Vendor>> {
        db.vendors().update(id, &patch).await
    }

    async fn delete(db: &Database, id: &str) -> DbResult<bool> {
        db.vendors().delete(id).await
    }
}
