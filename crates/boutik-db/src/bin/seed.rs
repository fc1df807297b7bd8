//! # Seed Data Generator
//!
//! Populates a database with a demo catalog for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default database
//! cargo run -p boutik-db --bin seed
//!
//! # Specify database path and tenant
//! cargo run -p boutik-db --bin seed -- --db ./data/boutik.db --tenant shop1
//! ```

use std::env;

use tracing::info;
use tracing_subscriber::EnvFilter;

use boutik_core::{Category, Money, ProductInput, SaleLine, Unit, DEFAULT_TENANT_ID};
use boutik_db::{Database, DbConfig, DbResult};

/// Typical corner-shop catalog: (name, category, unit, price, quantity).
const DEMO_PRODUCTS: &[(&str, Category, Unit, i64, i64)] = &[
    ("Riz", Category::Alimentation, Unit::Sac, 17_500, 20),
    ("Huile", Category::Alimentation, Unit::Litre, 1_500, 40),
    ("Sucre", Category::Alimentation, Unit::Kg, 700, 100),
    ("Lait en poudre", Category::Alimentation, Unit::Paquet, 2_400, 30),
    ("Tomates", Category::Alimentation, Unit::Carton, 6_000, 8),
    ("Savon", Category::Cosmetiques, Unit::Unite, 350, 120),
    ("Pommade", Category::Cosmetiques, Unit::Unite, 1_200, 25),
    ("Pagne", Category::Vetements, Unit::Unite, 5_500, 15),
    ("Allumettes", Category::Autres, Unit::Paquet, 100, 200),
    ("Bougies", Category::Autres, Unit::Paquet, 500, 60),
];

#[tokio::main]
async fn main() -> DbResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let (db_path, tenant) = parse_args();
    info!(db = %db_path, tenant = %tenant, "Seeding demo catalog");

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let catalog = db.catalog();

    for &(name, category, unit, price, quantity) in DEMO_PRODUCTS {
        let product = catalog
            .upsert(
                &tenant,
                &ProductInput {
                    name: name.to_string(),
                    category,
                    unit,
                    price: Money::from_francs(price),
                    quantity,
                    ..ProductInput::default()
                },
            )
            .await?;
        info!(name = %product.name, quantity = product.quantity, value = %product.total_value, "Seeded");
    }

    // One demo sale so the history view has something to show
    let outcome = db
        .sales()
        .record_sale(
            &tenant,
            &[
                SaleLine {
                    name: "Sucre".to_string(),
                    quantity: 2,
                },
                SaleLine {
                    name: "Savon".to_string(),
                    quantity: 3,
                },
            ],
        )
        .await?;
    info!(message = %outcome.message(), total = %outcome.total(), "Demo sale");

    let value = catalog.stock_value(&tenant).await?;
    info!(products = DEMO_PRODUCTS.len(), stock_value = %value, "Seeding complete");

    db.close().await;
    Ok(())
}

fn parse_args() -> (String, String) {
    let mut db_path = "boutik.db".to_string();
    let mut tenant = DEFAULT_TENANT_ID.to_string();

    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" if i + 1 < args.len() => {
                db_path = args[i + 1].clone();
                i += 2;
            }
            "--tenant" if i + 1 < args.len() => {
                tenant = args[i + 1].clone();
                i += 2;
            }
            other => {
                eprintln!("Unknown argument: {other}");
                eprintln!("Usage: seed [--db PATH] [--tenant TENANT]");
                std::process::exit(2);
            }
        }
    }

    (db_path, tenant)
}
