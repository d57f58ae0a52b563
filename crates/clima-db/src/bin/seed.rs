//! # Default Catalog Seeder
//!
//! Loads the starter materials and services into a database.
//!
//! ## Usage
//! ```bash
//! # Seed ./climaquote_dev.db (default)
//! cargo run -p clima-db --bin seed
//!
//! # Specify database path
//! cargo run -p clima-db --bin seed -- --db ./data/climaquote.db
//! ```
//!
//! Kinds that already have items are left alone, so running it twice is safe.

use std::env;

use clima_db::{seed_defaults, Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./climaquote_dev.db");

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
                println!("ClimaQuote Catalog Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./climaquote_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 ClimaQuote Catalog Seeder");
    println!("============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let report = seed_defaults(&db.catalog()).await?;

    println!();
    if report.is_empty() {
        println!("⚠ Catalog already has materials and services");
        println!("  Nothing to seed.");
    } else {
        println!("✓ Materials added: {}", report.materials);
        println!("✓ Services added:  {}", report.services);
    }

    db.close().await;
    println!();
    println!("✓ Seed complete!");

    Ok(())
}
