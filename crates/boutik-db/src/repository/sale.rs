//! # Sale Ledger
//!
//! Executes multi-item sales as single atomic units and serves the sale
//! history read path.
//!
//! ## Why Validate-Then-Commit
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │              record_sale("shop1", [riz×5, lait×2])           │
//! │                                                              │
//! │  BEGIN TRANSACTION                                           │
//! │                                                              │
//! │  1. VALIDATION (no mutation)                                 │
//! │     ├── riz  → found, stock ok, snapshot price 1000          │
//! │     └── lait → found, stock ok, snapshot price 500           │
//! │         │                                                    │
//! │         ├── any miss → ROLLBACK, Rejected, nothing written   │
//! │         ▼                                                    │
//! │  2. COMMIT PHASE (only if every line validated)              │
//! │     ├── INSERT sales (tenant, now, total 6000)               │
//! │     ├── INSERT sale_items ×2 (price snapshots)               │
//! │     └── UPDATE products stock −5 / −2, total_value derived   │
//! │                                                              │
//! │  COMMIT ── storage fault anywhere → ROLLBACK + Err(DbError)  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock decrements have no compensation logic, so a partially applied
//! sale would be unrecoverable; both phases run on one transaction
//! connection, which also keeps a concurrent sale from reading a stale
//! quantity between our validation and commit.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::DbResult;
use crate::repository::product::{ProductRow, SELECT_PRODUCT};
use boutik_core::{Money, Product, Sale, SaleItem, SaleLine, SaleOutcome, SaleRejection};

/// Raw `sales` row as stored.
#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: String,
    tenant_id: String,
    date: DateTime<Utc>,
    total_amount: i64,
}

impl From<SaleRow> for Sale {
    fn from(row: SaleRow) -> Sale {
        Sale {
            id: row.id,
            tenant_id: row.tenant_id,
            date: row.date,
            total_amount: Money::from_francs(row.total_amount),
        }
    }
}

/// Raw `sale_items` row as stored.
#[derive(Debug, sqlx::FromRow)]
struct SaleItemRow {
    id: String,
    sale_id: String,
    product_name: String,
    quantity: i64,
    unit_price: i64,
    total_price: i64,
}

impl From<SaleItemRow> for SaleItem {
    fn from(row: SaleItemRow) -> SaleItem {
        SaleItem {
            id: row.id,
            sale_id: row.sale_id,
            product_name: row.product_name,
            quantity: row.quantity,
            unit_price: Money::from_francs(row.unit_price),
            total_price: Money::from_francs(row.total_price),
        }
    }
}

/// History responses are capped so a chatty shop cannot blow up the
/// response size; this is a bound, not a pagination cursor.
const HISTORY_LIMIT: i64 = 50;

/// Sale transaction engine and history reads over the shared pool.
#[derive(Debug, Clone)]
pub struct SaleLedger {
    pool: SqlitePool,
}

impl SaleLedger {
    /// Creates a new SaleLedger.
    pub fn new(pool: SqlitePool) -> Self {
        SaleLedger { pool }
    }

    /// Records a multi-item sale as one atomic unit.
    ///
    /// Every line is validated before anything is written; the first
    /// unknown or under-stocked product rejects the whole sale. A
    /// rejection is `Ok(SaleOutcome::Rejected(..))` - the error channel
    /// is reserved for storage faults, which roll the transaction back
    /// in full.
    pub async fn record_sale(&self, tenant: &str, lines: &[SaleLine]) -> DbResult<SaleOutcome> {
        if lines.is_empty() {
            return Ok(SaleOutcome::Rejected(SaleRejection::EmptySale));
        }

        debug!(tenant = %tenant, lines = lines.len(), "Recording sale");

        let mut tx = self.pool.begin().await?;

        // Validation phase. Dropping the transaction on early return
        // rolls back, though nothing has been written yet.
        let mut validated: Vec<(Product, i64, Money)> = Vec::with_capacity(lines.len());
        for line in lines {
            let name = line.name.trim();

            if line.quantity < 1 {
                return Ok(SaleOutcome::Rejected(SaleRejection::InvalidQuantity {
                    name: name.to_string(),
                }));
            }

            let row: Option<ProductRow> =
                sqlx::query_as(&format!("{SELECT_PRODUCT} WHERE tenant_id = ?1 AND name = ?2"))
                    .bind(tenant)
                    .bind(name)
                    .fetch_optional(&mut *tx)
                    .await?;

            let Some(row) = row else {
                return Ok(SaleOutcome::Rejected(SaleRejection::UnknownProduct {
                    name: name.to_string(),
                }));
            };
            let product = Product::from(row);

            // The same product may appear on several lines; stock
            // already claimed by earlier lines is not available again
            let reserved: i64 = validated
                .iter()
                .filter(|(p, _, _)| p.id == product.id)
                .map(|(_, quantity, _)| quantity)
                .sum();
            if product.quantity - reserved < line.quantity {
                return Ok(SaleOutcome::Rejected(SaleRejection::InsufficientStock {
                    name: product.name.clone(),
                    available: product.quantity - reserved,
                    requested: line.quantity,
                }));
            }

            // Price snapshot taken here, at validation time
            let line_total = product.price * line.quantity;
            validated.push((product, line.quantity, line_total));
        }

        // Commit phase
        let total_amount: Money = validated.iter().map(|(_, _, total)| *total).sum();
        let sale = Sale {
            id: Uuid::new_v4().to_string(),
            tenant_id: tenant.to_string(),
            date: Utc::now(),
            total_amount,
        };

        sqlx::query("INSERT INTO sales (id, tenant_id, date, total_amount) VALUES (?1, ?2, ?3, ?4)")
            .bind(&sale.id)
            .bind(&sale.tenant_id)
            .bind(sale.date)
            .bind(sale.total_amount.francs())
            .execute(&mut *tx)
            .await?;

        let mut items = Vec::with_capacity(validated.len());
        for (product, quantity, line_total) in &validated {
            let item = SaleItem {
                id: Uuid::new_v4().to_string(),
                sale_id: sale.id.clone(),
                product_name: product.name.clone(),
                quantity: *quantity,
                unit_price: product.price,
                total_price: *line_total,
            };

            sqlx::query(
                "INSERT INTO sale_items (id, sale_id, product_name, quantity, unit_price, \
                 total_price) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .bind(&item.id)
            .bind(&item.sale_id)
            .bind(&item.product_name)
            .bind(item.quantity)
            .bind(item.unit_price.francs())
            .bind(item.total_price.francs())
            .execute(&mut *tx)
            .await?;

            // quantity on the right-hand side is the pre-update value,
            // so repeated lines for one product decrement cumulatively
            sqlx::query(
                "UPDATE products SET quantity = quantity - ?1, \
                 total_value = price * (quantity - ?1) WHERE id = ?2",
            )
            .bind(quantity)
            .bind(&product.id)
            .execute(&mut *tx)
            .await?;

            items.push(item);
        }

        tx.commit().await?;

        info!(
            tenant = %tenant,
            sale_id = %sale.id,
            total = %sale.total_amount,
            items = items.len(),
            "Sale recorded"
        );

        Ok(SaleOutcome::Completed { sale, items })
    }

    /// Recent sales for the tenant, newest first, capped at 50.
    pub async fn history(&self, tenant: &str) -> DbResult<Vec<Sale>> {
        let rows: Vec<SaleRow> = sqlx::query_as(
            "SELECT id, tenant_id, date, total_amount FROM sales \
             WHERE tenant_id = ?1 ORDER BY date DESC LIMIT ?2",
        )
        .bind(tenant)
        .bind(HISTORY_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Sale::from).collect())
    }

    /// Line items of one sale (receipt detail).
    pub async fn items(&self, sale_id: &str) -> DbResult<Vec<SaleItem>> {
        let rows: Vec<SaleItemRow> = sqlx::query_as(
            "SELECT id, sale_id, product_name, quantity, unit_price, total_price \
             FROM sale_items WHERE sale_id = ?1",
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SaleItem::from).collect())
    }
}
