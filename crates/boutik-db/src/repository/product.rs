//! # Catalog Store
//!
//! Single source of truth for product state within a tenant.
//!
//! ## Upsert-Merge
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │            How an "ajoute 5 sacs de riz" lands               │
//! │                                                              │
//! │  upsert("shop1", { name: "riz", quantity: 5, unit: Sac })    │
//! │       │                                                      │
//! │       ▼                                                      │
//! │  Lookup (tenant, trimmed name) ── case-insensitive           │
//! │       │                                                      │
//! │       ├── absent → INSERT, total_value = price × quantity    │
//! │       │                                                      │
//! │       └── present → MERGE (boutik-core rules), UPDATE        │
//! │            quantity adds up, defaults never downgrade        │
//! │                                                              │
//! │  Read-merge-write runs inside one transaction so two         │
//! │  concurrent adds cannot lose an increment.                   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Name Matching Policy
//! Names are stored as given but matched case-insensitively (the column
//! carries `COLLATE NOCASE`): the merchant says "riz", the catalog holds
//! "Riz", and both mean the same row. Uniqueness per tenant follows the
//! same collation.

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use boutik_core::{Category, Money, Product, ProductInput, StockAdjustment, Unit};

/// Raw `products` row as stored. Category and unit come back as text
/// (legacy rows may hold anything) and normalize on the way out.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProductRow {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub price: i64,
    pub quantity: i64,
    pub barcode: Option<String>,
    pub description: Option<String>,
    pub total_value: i64,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Product {
        Product {
            id: row.id,
            tenant_id: row.tenant_id,
            name: row.name,
            category: row.category.as_deref().map(Category::parse).unwrap_or_default(),
            unit: row.unit.as_deref().map(Unit::parse).unwrap_or_default(),
            price: Money::from_francs(row.price),
            quantity: row.quantity,
            barcode: row.barcode,
            description: row.description,
            total_value: Money::from_francs(row.total_value),
        }
    }
}

pub(crate) const SELECT_PRODUCT: &str = "SELECT id, tenant_id, name, category, unit, price, \
     quantity, barcode, description, total_value FROM products";

/// Catalog store over the shared pool.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    pool: SqlitePool,
}

impl CatalogStore {
    /// Creates a new CatalogStore.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogStore { pool }
    }

    /// Looks up one product by name. Absent is `None`, never an error.
    pub async fn get(&self, tenant: &str, name: &str) -> DbResult<Option<Product>> {
        let row: Option<ProductRow> =
            sqlx::query_as(&format!("{SELECT_PRODUCT} WHERE tenant_id = ?1 AND name = ?2"))
                .bind(tenant)
                .bind(name.trim())
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(Product::from))
    }

    /// Lists all products for the tenant, sorted by name.
    pub async fn list(&self, tenant: &str) -> DbResult<Vec<Product>> {
        let rows: Vec<ProductRow> =
            sqlx::query_as(&format!("{SELECT_PRODUCT} WHERE tenant_id = ?1 ORDER BY name"))
                .bind(tenant)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Inserts a new product or merges into the existing row.
    ///
    /// The merge rules live in [`Product::merge`]; this method only
    /// provides the transactional read-merge-write around them. Returns
    /// the product as persisted, post-merge.
    pub async fn upsert(&self, tenant: &str, input: &ProductInput) -> DbResult<Product> {
        input.validate()?;
        let name = input.name.trim();

        debug!(tenant = %tenant, name = %name, quantity = input.quantity, "Upserting product");

        let mut tx = self.pool.begin().await?;

        let existing: Option<ProductRow> =
            sqlx::query_as(&format!("{SELECT_PRODUCT} WHERE tenant_id = ?1 AND name = ?2"))
                .bind(tenant)
                .bind(name)
                .fetch_optional(&mut *tx)
                .await?;

        let product = match existing {
            Some(row) => {
                let merged = Product::from(row).merge(input);
                sqlx::query(
                    "UPDATE products SET category = ?1, unit = ?2, price = ?3, quantity = ?4, \
                     barcode = ?5, description = ?6, total_value = ?7 WHERE id = ?8",
                )
                .bind(merged.category.as_str())
                .bind(merged.unit.as_str())
                .bind(merged.price.francs())
                .bind(merged.quantity)
                .bind(&merged.barcode)
                .bind(&merged.description)
                .bind(merged.total_value.francs())
                .bind(&merged.id)
                .execute(&mut *tx)
                .await?;
                merged
            }
            None => {
                let product = Product::from_input(Uuid::new_v4().to_string(), tenant, input);
                sqlx::query(
                    "INSERT INTO products (id, tenant_id, name, category, unit, price, quantity, \
                     barcode, description, total_value) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                )
                .bind(&product.id)
                .bind(&product.tenant_id)
                .bind(&product.name)
                .bind(product.category.as_str())
                .bind(product.unit.as_str())
                .bind(product.price.francs())
                .bind(product.quantity)
                .bind(&product.barcode)
                .bind(&product.description)
                .bind(product.total_value.francs())
                .execute(&mut *tx)
                .await?;
                product
            }
        };

        tx.commit().await?;
        Ok(product)
    }

    /// Upserts a batch of products (the "add many" surface). Each input
    /// goes through the same merge path as a single upsert.
    pub async fn upsert_many(
        &self,
        tenant: &str,
        inputs: &[ProductInput],
    ) -> DbResult<Vec<Product>> {
        let mut products = Vec::with_capacity(inputs.len());
        for input in inputs {
            products.push(self.upsert(tenant, input).await?);
        }
        Ok(products)
    }

    /// Removes stock from one product outside a full sale.
    ///
    /// The outcome is a value, not an error: callers match on
    /// [`StockAdjustment`] instead of null-checking a product next to a
    /// free-text message.
    pub async fn remove_stock(
        &self,
        tenant: &str,
        name: &str,
        quantity: i64,
    ) -> DbResult<StockAdjustment> {
        let name = name.trim();
        debug!(tenant = %tenant, name = %name, quantity, "Removing stock");

        let mut tx = self.pool.begin().await?;

        let existing: Option<ProductRow> =
            sqlx::query_as(&format!("{SELECT_PRODUCT} WHERE tenant_id = ?1 AND name = ?2"))
                .bind(tenant)
                .bind(name)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(row) = existing else {
            return Ok(StockAdjustment::NotFound);
        };
        let product = Product::from(row);

        if product.quantity < quantity {
            // Unmodified product comes back so the caller can display
            // what is actually on hand
            return Ok(StockAdjustment::InsufficientStock {
                available: product.quantity,
                product,
            });
        }

        let updated = product.with_stock_removed(quantity);
        sqlx::query("UPDATE products SET quantity = ?1, total_value = ?2 WHERE id = ?3")
            .bind(updated.quantity)
            .bind(updated.total_value.francs())
            .bind(&updated.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(StockAdjustment::Updated(updated))
    }

    /// Total `total_value` across the tenant's catalog.
    pub async fn stock_value(&self, tenant: &str) -> DbResult<Money> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total_value), 0) FROM products WHERE tenant_id = ?1",
        )
        .bind(tenant)
        .fetch_one(&self.pool)
        .await?;

        Ok(Money::from_francs(total))
    }

    /// Counts the tenant's products (for diagnostics).
    pub async fn count(&self, tenant: &str) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE tenant_id = ?1")
                .bind(tenant)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}
