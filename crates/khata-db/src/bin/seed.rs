//! # Seed Data Generator
//!
//! Populates an empty database with a small shop's worth of data for
//! development.
//!
//! ## Usage
//! ```bash
//! cargo run -p khata-db --bin seed
//!
//! # Specify database path
//! cargo run -p khata-db --bin seed -- --db ./data/khata.db
//! ```
//!
//! ## Generated Data
//! - Categories with a handful of stocked items each
//! - Customers and vendors
//! - Invoices in every status, with line items and their stock-outs
//! - A payment against each paid invoice, a few expenses and journal entries

use chrono::{Duration, Utc};
use khata_core::input::{
    NewCategory, NewExpense, NewInvoice, NewInvoiceLineItem, NewItem, NewJournalEntry, NewParty,
    NewPayment,
};
use khata_core::{line_amount, InvoiceStatus, Item, Money, TaxRate};
use khata_db::{Database, DbConfig};
use std::env;

/// (category, [(item name, purchase paise, selling paise, GST %)])
const CATALOGUE: &[(&str, &[(&str, i64, i64, u32)])] = &[
    (
        "Stationery",
        &[
            ("A4 Paper Ream", 24000, 29900, 12),
            ("Ball Pen (Blue)", 700, 1000, 18),
            ("Stapler", 9500, 14000, 18),
            ("Notebook 200pg", 4500, 6000, 12),
        ],
    ),
    (
        "Grocery",
        &[
            ("Basmati Rice 5kg", 42000, 52500, 5),
            ("Toor Dal 1kg", 11000, 14500, 5),
            ("Sunflower Oil 1L", 13500, 16500, 5),
        ],
    ),
    (
        "Electronics",
        &[
            ("USB-C Cable", 9000, 19900, 18),
            ("LED Bulb 9W", 5500, 9900, 18),
            ("Extension Board", 32000, 44900, 18),
        ],
    ),
];

const CUSTOMERS: &[(&str, &str)] = &[
    ("Sharma Traders", "27AAPFS1234C1Z5"),
    ("Mehta & Sons", "24AABCM5678D1Z2"),
    ("Rao Enterprises", "29AAGCR9012E1Z8"),
    ("Walk-in Customer", ""),
];

const VENDORS: &[&str] = &["Kaveri Distributors", "Bharat Wholesale"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./khata_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Khata Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./khata_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Khata Seed Data Generator");
    println!("=========================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    if !db.customers().list().await?.is_empty() {
        println!("⚠ Database already has customers, skipping seed.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Catalogue
    let mut items: Vec<Item> = Vec::new();
    for (category_name, entries) in CATALOGUE {
        let category = db
            .categories()
            .create(&NewCategory {
                name: category_name.to_string(),
            })
            .await?;

        for (n, (name, purchase, selling, gst)) in entries.iter().enumerate() {
            let mut new = NewItem::new(*name, Money::from_paise(*purchase), Money::from_paise(*selling));
            new.category_id = Some(category.id.clone());
            new.gst_rate = TaxRate::from_percent(*gst);
            new.sku = Some(format!("{}-{:03}", &category_name[..3].to_uppercase(), n + 1));
            // Every third item starts at its reorder level
            new.stock = if n % 3 == 2 { new.reorder_level } else { 40 + 10 * n as i64 };
            items.push(db.items().create(&new).await?);
        }
    }
    println!("✓ {} items in {} categories", items.len(), CATALOGUE.len());

    // Parties
    let mut customer_ids = Vec::new();
    for (name, gstin) in CUSTOMERS {
        let new = NewParty {
            name: name.to_string(),
            gstin: (!gstin.is_empty()).then(|| gstin.to_string()),
            ..Default::default()
        };
        customer_ids.push(db.customers().create(&new).await?.id);
    }
    for name in VENDORS {
        let new = NewParty {
            name: name.to_string(),
            ..Default::default()
        };
        db.vendors().create(&new).await?;
    }
    println!("✓ {} customers, {} vendors", CUSTOMERS.len(), VENDORS.len());

    // Invoices
    let statuses = [
        InvoiceStatus::Paid,
        InvoiceStatus::Paid,
        InvoiceStatus::Pending,
        InvoiceStatus::Overdue,
        InvoiceStatus::Draft,
    ];
    let now = Utc::now();
    for (n, status) in statuses.iter().enumerate() {
        let lines: Vec<NewInvoiceLineItem> = items
            .iter()
            .skip(n)
            .step_by(3)
            .take(2)
            .map(|item| NewInvoiceLineItem::new(&item.id, 1 + n as i64, item.selling_price, item.gst_rate))
            .collect();

        let mut subtotal = Money::zero();
        let mut gross = Money::zero();
        for line in &lines {
            let base = line.rate.checked_mul_quantity(line.quantity);
            let amount = line_amount(line.quantity, line.rate, line.tax_rate);
            subtotal = base.and_then(|b| subtotal.checked_add(b)).ok_or("subtotal overflows")?;
            gross = amount.and_then(|a| gross.checked_add(a)).ok_or("total overflows")?;
        }
        let tax = gross.checked_sub(subtotal).ok_or("tax overflows")?;

        let mut invoice = NewInvoice::new(&customer_ids[n % customer_ids.len()], subtotal, tax);
        invoice.status = *status;
        invoice.date = Some(now - Duration::days(n as i64 * 4));
        invoice.due_date = Some(now + Duration::days(15));
        invoice.payment_mode = Some("cash".into());

        let created = db.invoices().create_with_items(&invoice, &lines).await?;

        if created.status == InvoiceStatus::Paid {
            db.payments()
                .create(&NewPayment {
                    invoice_id: Some(created.id.clone()),
                    amount: created.total,
                    payment_mode: "cash".into(),
                    date: Some(created.date),
                    reference: None,
                })
                .await?;
        }
    }
    println!("✓ {} invoices", statuses.len());

    // Books
    for (category, paise) in [("Rent", 2_500_000), ("Electricity", 380_000), ("Tea & Snacks", 45_000)] {
        db.expenses()
            .create(&NewExpense {
                category: category.into(),
                amount: Money::from_paise(paise),
                date: None,
                description: None,
                payment_mode: Some("bank".into()),
            })
            .await?;
    }
    db.journal()
        .create(&NewJournalEntry {
            voucher_number: "JV-001".into(),
            date: None,
            description: "Opening capital".into(),
            amount: Money::from_paise(10_000_000),
            entry_type: "credit".into(),
        })
        .await?;
    println!("✓ Expenses and journal entries");

    let stats = db.dashboard().stats().await?;
    println!();
    println!("Today's sales:   ₹{}", stats.today_sales);
    println!("Monthly sales:   ₹{}", stats.monthly_sales);
    println!("Low stock items: {}", stats.low_stock_count);
    println!();
    println!("✓ Seed complete!");

    Ok(())
}
