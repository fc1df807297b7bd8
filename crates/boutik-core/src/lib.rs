//! # boutik-core: Pure Domain Logic for Boutik
//!
//! This crate is the **heart** of the Boutik inventory ledger. It contains
//! the domain types and the rules that make the system trustworthy, with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Boutik Data Flow                            │
//! │                                                                 │
//! │  Voice note ──► Speech-to-text ──► LLM intent parser            │
//! │                                          │                      │
//! │                                          ▼ StockCommand (JSON)  │
//! │  ┌──────────────────────────────────────────────────────────┐   │
//! │  │              ★ boutik-core (THIS CRATE) ★                │   │
//! │  │                                                          │   │
//! │  │  ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌─────────────┐    │   │
//! │  │  │  types  │ │  money  │ │ command  │ │    error    │    │   │
//! │  │  │ Product │ │  Money  │ │ actions  │ │ rejections  │    │   │
//! │  │  │  Sale   │ │  (i64)  │ │ lenient  │ │ validation  │    │   │
//! │  │  └─────────┘ └─────────┘ └──────────┘ └─────────────┘    │   │
//! │  │                                                          │   │
//! │  │  NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS      │   │
//! │  └──────────────────────────────────────────────────────────┘   │
//! │                                          │                      │
//! │                                          ▼                      │
//! │              boutik-db (SQLite catalog + sale ledger)           │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, SaleItem, outcomes)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`command`] - Structured commands from the intent parser
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure functions**: merge and normalization rules are deterministic
//! 2. **Integer money**: amounts are whole francs (i64), never floats
//! 3. **Lenient boundaries**: voice-derived input is imprecise, so unknown
//!    categories, units and actions normalize to defaults instead of
//!    being rejected
//! 4. **Explicit outcomes**: failures are typed variants, never bare
//!    booleans paired with free-text messages

// =============================================================================
// Module Declarations
// =============================================================================

pub mod command;
pub mod error;
pub mod money;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use command::{CommandAction, StockCommand};
pub use error::{SaleRejection, ValidationError};
pub use money::Money;
pub use types::*;
