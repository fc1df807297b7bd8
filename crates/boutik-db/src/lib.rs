//! # boutik-db: The SQLite Inventory Ledger
//!
//! This crate owns everything persistent in Boutik: the per-tenant
//! product catalog, the immutable sale ledger, and the schema lifecycle.
//!
//! ## Architecture Position
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                        Boutik Data Flow                          │
//! │                                                                  │
//! │  Request layer (HTTP handler / parsed voice intent)              │
//! │       │                                                          │
//! │       ▼                                                          │
//! │  ┌────────────────────────────────────────────────────────────┐  │
//! │  │                  boutik-db (THIS CRATE)                    │  │
//! │  │                                                            │  │
//! │  │  ┌──────────┐  ┌───────────────┐  ┌────────────────────┐   │  │
//! │  │  │ Database │  │    Stores     │  │   Schema Manager   │   │  │
//! │  │  │ (pool.rs)│  │ CatalogStore  │  │ version marker +   │   │  │
//! │  │  │          │◄─│ SaleLedger    │  │ legacy rescue      │   │  │
//! │  │  └──────────┘  └───────────────┘  └────────────────────┘   │  │
//! │  │        ▲                                                   │  │
//! │  │        └── dispatch: StockCommand → store calls            │  │
//! │  └────────────────────────────────────────────────────────────┘  │
//! │       │                                                          │
//! │       ▼                                                          │
//! │  SQLite file (WAL), one per deployment, tenants share tables     │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - connection pool creation and the `Database` handle
//! - [`schema`] - schema versioning and the legacy-table rescue
//! - [`repository`] - catalog store and sale ledger
//! - [`dispatch`] - applies structured voice commands to the stores
//! - [`error`] - database error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use boutik_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("boutik.db")).await?;
//!
//! let riz = db.catalog().get("shop1", "riz").await?;
//! let outcome = db.sales().record_sale("shop1", &lines).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod dispatch;
pub mod error;
pub mod pool;
pub mod repository;
pub mod schema;

// =============================================================================
// Re-exports
// =============================================================================

pub use dispatch::{apply_command, CommandReply};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::product::CatalogStore;
pub use repository::sale::SaleLedger;
