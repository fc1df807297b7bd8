//! # Schema Manager
//!
//! Guarantees the persisted tables match the current shape without
//! destroying existing data.
//!
//! ## How Schema Versioning Works
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Startup Sequence                          │
//! │                                                              │
//! │  Database::new()                                             │
//! │       │                                                      │
//! │       ▼                                                      │
//! │  Read schema_version marker (absent → version 0)             │
//! │       │                                                      │
//! │       ├── version == CURRENT? nothing to do                  │
//! │       │                                                      │
//! │       ▼                                                      │
//! │  Apply migration steps (version+1 ..= CURRENT) in order,     │
//! │  all inside ONE transaction, then write the marker           │
//! │       │                                                      │
//! │       ├── success → commit, serve requests                   │
//! │       └── failure → rollback, Database::new fails (FATAL)    │
//! │                                                              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The marker is an explicit integer in a `schema_version` table. We do
//! NOT inspect stored DDL text to guess the layout; the only structural
//! probe is for the pre-versioning legacy table, which by definition has
//! no marker to read.
//!
//! ## Legacy Rescue (version 0 → 1)
//! Installations that predate tenant scoping carry `products`, `sales`
//! and `sale_items` tables keyed on integer ids and the old `user_id`
//! column (REAL money columns, nullable category/unit). Step 1 rescues
//! each one that exists: rename to `<table>_old`, create the target
//! shape, copy every column the two shapes share (`user_id` maps to
//! `tenant_id`, missing tenants default to [`DEFAULT_TENANT_ID`], ids
//! and money coerce to their target types), drop the renamed table. The
//! rename+create+copy+drop runs in the same transaction as the version
//! bump, so a failure leaves the old tables untouched.
//!
//! ## Adding New Migrations
//! 1. Bump [`SCHEMA_VERSION`]
//! 2. Add a `match` arm in [`apply_step`] for the new version
//! 3. **NEVER** edit an existing step - databases in the field already ran it

use std::collections::HashSet;

use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use tracing::info;

use crate::error::{DbError, DbResult};
use boutik_core::DEFAULT_TENANT_ID;

/// Schema version this build understands.
pub const SCHEMA_VERSION: i64 = 1;

/// Columns of the target `products` table, in copy order.
const PRODUCT_COLUMNS: &[&str] = &[
    "id",
    "tenant_id",
    "name",
    "category",
    "unit",
    "price",
    "quantity",
    "barcode",
    "description",
    "total_value",
];

/// Columns of the target `sales` table, in copy order.
const SALE_COLUMNS: &[&str] = &["id", "tenant_id", "date", "total_amount"];

/// Columns of the target `sale_items` table, in copy order.
const SALE_ITEM_COLUMNS: &[&str] = &[
    "id",
    "sale_id",
    "product_name",
    "quantity",
    "unit_price",
    "total_price",
];

/// Tables a pre-versioning installation may carry, in foreign-key order
/// (parents before children, so copied rows always have their targets).
const LEGACY_TABLES: &[(&str, &[&str])] = &[
    ("products", PRODUCT_COLUMNS),
    ("sales", SALE_COLUMNS),
    ("sale_items", SALE_ITEM_COLUMNS),
];

/// Ensures the on-disk schema matches [`SCHEMA_VERSION`].
///
/// Idempotent; called on every [`crate::Database::new`]. A failure here
/// is fatal: the caller must not serve requests against a half-migrated
/// schema, and the transaction guarantees none is left behind.
pub async fn ensure_schema(pool: &SqlitePool) -> DbResult<()> {
    let mut tx = pool.begin().await.map_err(migration_err)?;

    sqlx::query("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)")
        .execute(&mut *tx)
        .await
        .map_err(migration_err)?;

    let marker: Option<i64> = sqlx::query_scalar("SELECT version FROM schema_version LIMIT 1")
        .fetch_optional(&mut *tx)
        .await
        .map_err(migration_err)?;
    let mut version = marker.unwrap_or(0);

    if version > SCHEMA_VERSION {
        return Err(DbError::MigrationFailed(format!(
            "database is at schema version {version}, this build understands {SCHEMA_VERSION}"
        )));
    }

    if version == SCHEMA_VERSION {
        tx.commit().await.map_err(migration_err)?;
        return Ok(());
    }

    while version < SCHEMA_VERSION {
        let next = version + 1;
        info!(version = next, "Applying schema migration");
        apply_step(&mut tx, next).await?;
        version = next;
    }

    sqlx::query("DELETE FROM schema_version")
        .execute(&mut *tx)
        .await
        .map_err(migration_err)?;
    sqlx::query("INSERT INTO schema_version (version) VALUES (?1)")
        .bind(version)
        .execute(&mut *tx)
        .await
        .map_err(migration_err)?;

    tx.commit().await.map_err(migration_err)?;
    info!(version, "Schema up to date");
    Ok(())
}

/// Migration step table, indexed by target version.
async fn apply_step(tx: &mut Transaction<'_, Sqlite>, version: i64) -> DbResult<()> {
    match version {
        1 => migrate_v1(tx).await,
        _ => Err(DbError::MigrationFailed(format!(
            "no migration step registered for version {version}"
        ))),
    }
}

/// Version 1: tenant-scoped product catalog plus the sale ledger.
///
/// Rescues every pre-versioning table that exists: any install that
/// recorded a sale carries legacy `sales` and `sale_items` next to
/// `products`, all keyed on integer ids and `user_id`.
async fn migrate_v1(tx: &mut Transaction<'_, Sqlite>) -> DbResult<()> {
    // Rename legacy tables out of the way so the target shapes can be
    // created under the canonical names
    let mut rescued = Vec::new();
    for &(table, columns) in LEGACY_TABLES {
        if table_exists(tx, table).await? {
            info!(table, "Legacy table detected, rescuing rows");
            sqlx::query(&format!("ALTER TABLE {table} RENAME TO {table}_old"))
                .execute(&mut **tx)
                .await
                .map_err(migration_err)?;
            rescued.push((table, columns));
        }
    }

    sqlx::query(
        r#"
        CREATE TABLE products (
            id          TEXT PRIMARY KEY,
            tenant_id   TEXT NOT NULL DEFAULT 'default',
            name        TEXT NOT NULL COLLATE NOCASE,
            category    TEXT NOT NULL DEFAULT 'autres',
            unit        TEXT NOT NULL DEFAULT 'Unité',
            price       INTEGER NOT NULL DEFAULT 0,
            quantity    INTEGER NOT NULL DEFAULT 0,
            barcode     TEXT,
            description TEXT,
            total_value INTEGER NOT NULL DEFAULT 0,
            UNIQUE (tenant_id, name)
        )
        "#,
    )
    .execute(&mut **tx)
    .await
    .map_err(migration_err)?;

    sqlx::query(
        r#"
        CREATE TABLE sales (
            id           TEXT PRIMARY KEY,
            tenant_id    TEXT NOT NULL,
            date         TEXT NOT NULL,
            total_amount INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(&mut **tx)
    .await
    .map_err(migration_err)?;

    sqlx::query(
        r#"
        CREATE TABLE sale_items (
            id           TEXT PRIMARY KEY,
            sale_id      TEXT NOT NULL REFERENCES sales(id),
            product_name TEXT NOT NULL,
            quantity     INTEGER NOT NULL,
            unit_price   INTEGER NOT NULL,
            total_price  INTEGER NOT NULL
        )
        "#,
    )
    .execute(&mut **tx)
    .await
    .map_err(migration_err)?;

    // Copy parents before children so foreign keys resolve
    for &(table, columns) in &rescued {
        copy_legacy_rows(tx, table, columns).await?;
    }

    // Drop children before parents for the same reason
    for &(table, _) in rescued.iter().rev() {
        sqlx::query(&format!("DROP TABLE {table}_old"))
            .execute(&mut **tx)
            .await
            .map_err(migration_err)?;
    }

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_sales_tenant_date ON sales (tenant_id, date DESC)")
        .execute(&mut **tx)
        .await
        .map_err(migration_err)?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_sale_items_sale ON sale_items (sale_id)")
        .execute(&mut **tx)
        .await
        .map_err(migration_err)?;

    Ok(())
}

/// Copies the intersecting columns of `{table}_old` into the freshly
/// created target `table`, coercing legacy representations on the way.
async fn copy_legacy_rows(
    tx: &mut Transaction<'_, Sqlite>,
    table: &str,
    columns: &[&str],
) -> DbResult<()> {
    let old_columns = table_columns(tx, &format!("{table}_old")).await?;

    let mut destinations = Vec::new();
    let mut sources = Vec::new();
    for &column in columns {
        if let Some(expr) = copy_expr(column, &old_columns) {
            destinations.push(column);
            sources.push(expr);
        }
    }

    let copy = format!(
        "INSERT INTO {table} ({}) SELECT {} FROM {table}_old",
        destinations.join(", "),
        sources.join(", ")
    );
    let copied = sqlx::query(&copy)
        .execute(&mut **tx)
        .await
        .map_err(migration_err)?
        .rows_affected();

    info!(table, rows = copied, "Legacy rows migrated");
    Ok(())
}

/// Source expression for copying `column` out of the legacy table, or
/// `None` when the legacy table has nothing to offer (the column default
/// then applies, which is how rows without a tenant end up under
/// [`DEFAULT_TENANT_ID`]).
fn copy_expr(column: &str, old_columns: &HashSet<String>) -> Option<String> {
    let source = if old_columns.contains(column) {
        column
    } else if column == "tenant_id" && old_columns.contains("user_id") {
        // The legacy layout called the tenant a user
        "user_id"
    } else {
        return None;
    };

    // Legacy columns were nullable, ids were INTEGER and money columns
    // were REAL; franc amounts are whole, so the integer cast is lossless.
    let expr = match column {
        "id" | "sale_id" => format!("CAST({source} AS TEXT)"),
        "category" => format!("COALESCE({source}, 'autres')"),
        "unit" => format!("COALESCE({source}, 'Unité')"),
        "tenant_id" => format!("COALESCE({source}, '{DEFAULT_TENANT_ID}')"),
        "price" | "quantity" | "total_value" | "total_amount" | "unit_price" | "total_price" => {
            format!("CAST(COALESCE({source}, 0) AS INTEGER)")
        }
        _ => source.to_string(),
    };
    Some(expr)
}

async fn table_exists(tx: &mut Transaction<'_, Sqlite>, name: &str) -> DbResult<bool> {
    let found: Option<String> =
        sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1")
            .bind(name)
            .fetch_optional(&mut **tx)
            .await
            .map_err(migration_err)?;
    Ok(found.is_some())
}

async fn table_columns(tx: &mut Transaction<'_, Sqlite>, name: &str) -> DbResult<HashSet<String>> {
    let rows = sqlx::query(&format!("PRAGMA table_info({name})"))
        .fetch_all(&mut **tx)
        .await
        .map_err(migration_err)?;

    rows.iter()
        .map(|row| row.try_get::<String, _>("name").map_err(migration_err))
        .collect()
}

fn migration_err(err: sqlx::Error) -> DbError {
    DbError::MigrationFailed(err.to_string())
}
