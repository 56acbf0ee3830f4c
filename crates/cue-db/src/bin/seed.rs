//! # Seed Data
//!
//! Prepares a fresh club database: schema, a first superuser and a starter
//! price list.
//!
//! ## Usage
//! ```bash
//! cargo run -p cue-db --bin seed
//!
//! # Specify database path and admin password
//! cargo run -p cue-db --bin seed -- --db ./data/club.db --password 'long-secret'
//! ```
//!
//! Safe to re-run: an existing admin or item name is left alone.

use std::env;

use anyhow::Context;
use cue_core::{NewAdmin, NewInventoryItem};
use cue_db::{Database, DbConfig, DbError};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Starter price list: (name, selling price cents, margin cents).
const STARTER_ITEMS: &[(&str, i64, i64)] = &[
    ("Mineral Water", 2_000, 800),
    ("Lime Soda", 2_500, 1_000),
    ("Cola", 4_000, 1_500),
    ("Iced Tea", 6_000, 2_500),
    ("Coffee", 5_000, 2_500),
    ("Potato Chips", 3_000, 1_000),
    ("Chocolate Bar", 5_000, 1_500),
    ("Cue Chalk", 1_500, 700),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./cue_club.db");
    let mut password = String::from("admin12345");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if let Some(value) = args.get(i + 1) {
                    db_path = value.clone();
                    i += 1;
                }
            }
            "--password" | "-p" => {
                if let Some(value) = args.get(i + 1) {
                    password = value.clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Cue Club seed");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>          Database file path (default: ./cue_club.db)");
                println!("  -p, --password <PASS>    Password for the 'admin' account");
                println!("  -h, --help               Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let db = Database::new(DbConfig::new(&db_path))
        .await
        .with_context(|| format!("opening database at {db_path}"))?;
    info!(path = %db_path, "Schema ready");

    let admin = NewAdmin {
        username: "admin".to_string(),
        email: "admin@cueclub.local".to_string(),
        full_name: Some("System Administrator".to_string()),
        password,
    };
    match db.admins().create(&admin, true).await {
        Ok(created) => info!(username = %created.username, "Superuser created, change its password after first login"),
        Err(DbError::UniqueViolation { .. }) => info!("Admin account already exists"),
        Err(err) => return Err(err).context("creating admin"),
    }

    let mut added = 0;
    for (name, price, margin) in STARTER_ITEMS {
        let item = NewInventoryItem {
            item_name: (*name).to_string(),
            selling_price_cents: *price,
            margin_cents: *margin,
        };
        match db.inventory().create(&item).await {
            Ok(_) => added += 1,
            Err(DbError::UniqueViolation { .. }) => {}
            Err(err) => warn!(item = %name, error = %err, "Skipping inventory item"),
        }
    }
    info!(added, total = db.inventory().count_active().await?, "Inventory seeded");

    db.close().await;
    Ok(())
}
