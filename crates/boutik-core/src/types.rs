//! # Domain Types
//!
//! Core domain types for the Boutik inventory ledger.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Domain Types                             │
//! │                                                                 │
//! │  ┌────────────────┐   ┌────────────────┐   ┌────────────────┐   │
//! │  │    Product     │   │      Sale      │   │    SaleItem    │   │
//! │  │  ────────────  │   │  ────────────  │   │  ────────────  │   │
//! │  │  id (UUID)     │   │  id (UUID)     │   │  sale_id (FK)  │   │
//! │  │  tenant + name │   │  tenant_id     │   │  product_name  │   │
//! │  │  price, stock  │   │  date          │   │  price snapshot│   │
//! │  │  total_value   │   │  total_amount  │   │  line total    │   │
//! │  └────────────────┘   └────────────────┘   └────────────────┘   │
//! │                                                                 │
//! │  ┌────────────────┐   ┌────────────────┐                        │
//! │  │    Category    │   │      Unit      │                        │
//! │  │  alimentation  │   │  Unité (dflt)  │                        │
//! │  │  vêtements     │   │  Kg, Litre     │                        │
//! │  │  cosmétiques   │   │  Carton, Sac   │                        │
//! │  │  autres (dflt) │   │  Paquet        │                        │
//! │  └────────────────┘   └────────────────┘                        │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every product has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business key: `(tenant_id, name)` - unique per tenant, what voice
//!   commands and the UI refer to

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::{SaleRejection, ValidationError};
use crate::money::Money;

/// Tenant assigned to rows that predate tenant scoping.
///
/// The legacy schema had no tenant column; migrated rows land here so
/// single-shop installations keep working unchanged.
pub const DEFAULT_TENANT_ID: &str = "default";

// =============================================================================
// Category
// =============================================================================

/// Product category.
///
/// The set is closed on purpose: the LLM intent parser is told to pick
/// one of these, and anything it invents anyway normalizes to [`Category::Autres`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Category {
    Alimentation,
    Vetements,
    Cosmetiques,
    #[default]
    Autres,
}

impl Category {
    /// All valid categories, in display order (reference list for the UI).
    pub const ALL: [Category; 4] = [
        Category::Alimentation,
        Category::Vetements,
        Category::Cosmetiques,
        Category::Autres,
    ];

    /// The stored / displayed French label.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::Alimentation => "alimentation",
            Category::Vetements => "vêtements",
            Category::Cosmetiques => "cosmétiques",
            Category::Autres => "autres",
        }
    }

    /// Lenient parse: case-insensitive, accent-tolerant, unknown → `Autres`.
    ///
    /// ## Example
    /// ```rust
    /// use boutik_core::types::Category;
    ///
    /// assert_eq!(Category::parse("Alimentation"), Category::Alimentation);
    /// assert_eq!(Category::parse("vetements"), Category::Vetements);
    /// assert_eq!(Category::parse("n'importe quoi"), Category::Autres);
    /// ```
    pub fn parse(s: &str) -> Category {
        match s.trim().to_lowercase().as_str() {
            "alimentation" => Category::Alimentation,
            "vêtements" | "vetements" => Category::Vetements,
            "cosmétiques" | "cosmetiques" => Category::Cosmetiques,
            _ => Category::Autres,
        }
    }

    /// Whether this is the default category (used by the merge rule:
    /// a default input never downgrades a known category).
    pub const fn is_default(&self) -> bool {
        matches!(self, Category::Autres)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Category::parse(&s))
    }
}

// =============================================================================
// Unit
// =============================================================================

/// Unit of measure for stock quantities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Unit {
    #[default]
    Unite,
    Kg,
    Litre,
    Carton,
    Sac,
    Paquet,
}

impl Unit {
    /// All valid units, in display order (reference list for the UI).
    pub const ALL: [Unit; 6] = [
        Unit::Unite,
        Unit::Kg,
        Unit::Litre,
        Unit::Carton,
        Unit::Sac,
        Unit::Paquet,
    ];

    /// The stored / displayed French label.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Unit::Unite => "Unité",
            Unit::Kg => "Kg",
            Unit::Litre => "Litre",
            Unit::Carton => "Carton",
            Unit::Sac => "Sac",
            Unit::Paquet => "Paquet",
        }
    }

    /// Lenient parse: case-insensitive, accent-tolerant, unknown → `Unité`.
    pub fn parse(s: &str) -> Unit {
        match s.trim().to_lowercase().as_str() {
            "unité" | "unite" => Unit::Unite,
            "kg" | "kilo" | "kilogramme" => Unit::Kg,
            "litre" | "l" => Unit::Litre,
            "carton" => Unit::Carton,
            "sac" => Unit::Sac,
            "paquet" => Unit::Paquet,
            _ => Unit::Unite,
        }
    }

    /// Whether this is the default unit.
    pub const fn is_default(&self) -> bool {
        matches!(self, Unit::Unite)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Unit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Unit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Unit::parse(&s))
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product row in the per-tenant catalog.
///
/// `total_value` is derived: it is always `price × quantity`, recomputed
/// on every mutation and never settable on its own. The catalog store is
/// the only writer of this struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier (UUID v4), assigned on creation, immutable.
    pub id: String,

    /// Tenant this product belongs to. Every operation is scoped by it.
    pub tenant_id: String,

    /// Display name; unique per tenant on the trimmed string
    /// (case-insensitively, see the catalog store).
    pub name: String,

    pub category: Category,

    pub unit: Unit,

    /// Unit price in francs. Never negative.
    pub price: Money,

    /// Current stock. Never negative.
    pub quantity: i64,

    pub barcode: Option<String>,

    pub description: Option<String>,

    /// Derived: always `price × quantity`.
    pub total_value: Money,
}

impl Product {
    /// Builds a fresh product from an input (first add for this name).
    pub fn from_input(id: String, tenant_id: &str, input: &ProductInput) -> Product {
        Product {
            id,
            tenant_id: tenant_id.to_string(),
            name: input.name.trim().to_string(),
            category: input.category,
            unit: input.unit,
            price: input.price,
            quantity: input.quantity,
            barcode: input.barcode.clone(),
            description: input.description.clone(),
            total_value: input.price * input.quantity,
        }
    }

    /// Applies the upsert-merge rules to an existing product.
    ///
    /// ## Merge Semantics (merge-by-presence, not overwrite)
    /// ```text
    /// quantity     new = existing + input          (adds accumulate)
    /// price        input wins only if > 0          ("ajoute 5 riz" has no price)
    /// category     input wins only if non-default
    /// unit         input wins only if non-default
    /// barcode      input wins only if present
    /// description  input wins only if present
    /// total_value  recomputed from the result
    /// ```
    ///
    /// Voice-derived input is often partial; these rules keep a later
    /// imprecise command from clobbering previously recorded attributes.
    #[must_use]
    pub fn merge(&self, input: &ProductInput) -> Product {
        let quantity = self.quantity + input.quantity;
        let price = if input.price.is_positive() {
            input.price
        } else {
            self.price
        };
        let category = if input.category.is_default() {
            self.category
        } else {
            input.category
        };
        let unit = if input.unit.is_default() {
            self.unit
        } else {
            input.unit
        };
        let barcode = match &input.barcode {
            Some(b) if !b.trim().is_empty() => Some(b.clone()),
            _ => self.barcode.clone(),
        };
        let description = match &input.description {
            Some(d) if !d.trim().is_empty() => Some(d.clone()),
            _ => self.description.clone(),
        };

        Product {
            id: self.id.clone(),
            tenant_id: self.tenant_id.clone(),
            name: self.name.clone(),
            category,
            unit,
            price,
            quantity,
            barcode,
            description,
            total_value: price * quantity,
        }
    }

    /// Returns a copy with `quantity` decremented and `total_value`
    /// recomputed. Callers must have checked stock beforehand.
    #[must_use]
    pub fn with_stock_removed(&self, quantity: i64) -> Product {
        let remaining = self.quantity - quantity;
        Product {
            quantity: remaining,
            total_value: self.price * remaining,
            ..self.clone()
        }
    }
}

// =============================================================================
// Product Input
// =============================================================================

/// Input for adding or updating a product (from voice or a form).
///
/// Every field except `name` is optional on the wire; absent fields take
/// the defaults the merge rules treat as "not supplied".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub unit: Unit,
    #[serde(default)]
    pub price: Money,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ProductInput {
    /// Rejects input that normalization cannot repair.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Required { field: "name" });
        }
        if self.price.francs() < 0 {
            return Err(ValidationError::Negative { field: "price" });
        }
        if self.quantity < 0 {
            return Err(ValidationError::Negative { field: "quantity" });
        }
        Ok(())
    }
}

// =============================================================================
// Sale
// =============================================================================

/// One line of a sale request: sell `quantity` of the product called `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLine {
    pub name: String,
    pub quantity: i64,
}

/// An immutable record of one completed sale transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: String,
    pub tenant_id: String,
    /// When the sale was committed.
    pub date: DateTime<Utc>,
    /// Sum of the items' line totals.
    pub total_amount: Money,
}

/// One product sold within a sale. Immutable audit trail.
///
/// Uses the snapshot pattern: `unit_price` is the product's price at
/// sale time, so later price changes never rewrite history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleItem {
    pub id: String,
    pub sale_id: String,
    pub product_name: String,
    pub quantity: i64,
    /// Price snapshot at sale time (frozen).
    pub unit_price: Money,
    /// `unit_price × quantity` (frozen).
    pub total_price: Money,
}

// =============================================================================
// Operation Outcomes
// =============================================================================

/// Result of a sale transaction.
///
/// A rejected sale is a normal, fully-handled outcome: nothing was
/// written. Storage faults are a separate channel (`Err(DbError)`).
#[derive(Debug, Clone, PartialEq)]
pub enum SaleOutcome {
    /// Every line validated; the sale and its items were committed.
    Completed { sale: Sale, items: Vec<SaleItem> },
    /// Validation refused the sale; no mutation happened.
    Rejected(SaleRejection),
}

impl SaleOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, SaleOutcome::Completed { .. })
    }

    /// Total amount of the sale, zero when rejected.
    pub fn total(&self) -> Money {
        match self {
            SaleOutcome::Completed { sale, .. } => sale.total_amount,
            SaleOutcome::Rejected(_) => Money::zero(),
        }
    }

    /// User-facing confirmation or rejection message.
    pub fn message(&self) -> String {
        match self {
            SaleOutcome::Completed { .. } => "Vente enregistrée".to_string(),
            SaleOutcome::Rejected(rejection) => rejection.to_string(),
        }
    }
}

/// Result of a single-product stock removal outside a full sale.
#[derive(Debug, Clone, PartialEq)]
pub enum StockAdjustment {
    /// Quantity decremented, `total_value` recomputed.
    Updated(Product),
    /// No such product for this tenant; nothing created or altered.
    NotFound,
    /// More requested than on hand; the product is returned unmodified.
    InsufficientStock { product: Product, available: i64 },
}

impl StockAdjustment {
    /// User-facing message, mirroring the sale rejection wording.
    pub fn message(&self) -> String {
        match self {
            StockAdjustment::Updated(_) => "Stock mis à jour.".to_string(),
            StockAdjustment::NotFound => "Produit non trouvé.".to_string(),
            StockAdjustment::InsufficientStock { available, .. } => {
                format!("Stock insuffisant. Seulement {available} en stock.")
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, price: i64, quantity: i64) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            price: Money::from_francs(price),
            quantity,
            ..ProductInput::default()
        }
    }

    #[test]
    fn test_category_normalization() {
        assert_eq!(Category::parse("ALIMENTATION"), Category::Alimentation);
        assert_eq!(Category::parse(" cosmetiques "), Category::Cosmetiques);
        assert_eq!(Category::parse("électronique"), Category::Autres);
        assert_eq!(Category::parse(""), Category::Autres);
    }

    #[test]
    fn test_unit_normalization() {
        assert_eq!(Unit::parse("unité"), Unit::Unite);
        assert_eq!(Unit::parse("KILO"), Unit::Kg);
        assert_eq!(Unit::parse("bidon"), Unit::Unite);
    }

    #[test]
    fn test_from_input_derives_total_value() {
        let p = Product::from_input("id-1".into(), "shop1", &input("Riz", 1000, 10));
        assert_eq!(p.total_value, Money::from_francs(10_000));
        assert_eq!(p.name, "Riz");
    }

    #[test]
    fn test_merge_accumulates_quantity() {
        let p = Product::from_input("id-1".into(), "shop1", &input("Riz", 1000, 10));
        let merged = p.merge(&input("Riz", 0, 5));
        assert_eq!(merged.quantity, 15);
        // zero price must not erase the known price
        assert_eq!(merged.price, Money::from_francs(1000));
        assert_eq!(merged.total_value, Money::from_francs(15_000));
    }

    #[test]
    fn test_merge_default_never_downgrades() {
        let mut first = input("Riz", 1000, 10);
        first.category = Category::Alimentation;
        first.unit = Unit::Sac;
        let p = Product::from_input("id-1".into(), "shop1", &first);

        // Second add is fully default (imprecise voice command)
        let merged = p.merge(&input("Riz", 0, 5));
        assert_eq!(merged.category, Category::Alimentation);
        assert_eq!(merged.unit, Unit::Sac);
    }

    #[test]
    fn test_merge_non_default_wins() {
        let p = Product::from_input("id-1".into(), "shop1", &input("Savon", 500, 3));
        let mut second = input("Savon", 600, 2);
        second.category = Category::Cosmetiques;
        second.unit = Unit::Carton;
        second.description = Some("savon de Marseille".to_string());

        let merged = p.merge(&second);
        assert_eq!(merged.category, Category::Cosmetiques);
        assert_eq!(merged.unit, Unit::Carton);
        assert_eq!(merged.price, Money::from_francs(600));
        assert_eq!(merged.quantity, 5);
        assert_eq!(merged.total_value, Money::from_francs(3000));
        assert_eq!(merged.description.as_deref(), Some("savon de Marseille"));
    }

    #[test]
    fn test_merge_blank_text_does_not_erase() {
        let mut first = input("Savon", 500, 3);
        first.barcode = Some("123456".to_string());
        let p = Product::from_input("id-1".into(), "shop1", &first);

        let mut second = input("Savon", 0, 1);
        second.barcode = Some("   ".to_string());
        let merged = p.merge(&second);
        assert_eq!(merged.barcode.as_deref(), Some("123456"));
    }

    #[test]
    fn test_with_stock_removed_recomputes_total() {
        let p = Product::from_input("id-1".into(), "shop1", &input("Lait", 500, 20));
        let after = p.with_stock_removed(5);
        assert_eq!(after.quantity, 15);
        assert_eq!(after.total_value, Money::from_francs(7500));
    }

    #[test]
    fn test_input_validation() {
        assert!(input("Riz", 1000, 10).validate().is_ok());
        assert_eq!(
            input("   ", 0, 0).validate(),
            Err(ValidationError::Required { field: "name" })
        );
        assert_eq!(
            input("Riz", -5, 0).validate(),
            Err(ValidationError::Negative { field: "price" })
        );
        assert_eq!(
            input("Riz", 5, -1).validate(),
            Err(ValidationError::Negative { field: "quantity" })
        );
    }

    #[test]
    fn test_sale_outcome_messages() {
        let rejected = SaleOutcome::Rejected(SaleRejection::EmptySale);
        assert!(!rejected.is_completed());
        assert_eq!(rejected.total(), Money::zero());
        assert_eq!(rejected.message(), "Aucun article à vendre.");
    }
}
