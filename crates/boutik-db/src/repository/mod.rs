//! Store implementations over the SQLite pool.
//!
//! - [`product`] - the catalog store (product state, upsert-merge)
//! - [`sale`] - the sale ledger (atomic sale transactions, history)

pub mod product;
pub mod sale;
