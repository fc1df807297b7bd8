//! # Structured Commands
//!
//! The shape of what the natural-language collaborator hands us.
//!
//! A voice note goes through speech-to-text and an LLM intent parser
//! before it reaches this crate; what arrives is JSON like:
//!
//! ```json
//! {
//!   "action": "add",
//!   "products": [
//!     { "name": "riz", "quantity": 5, "unit": "Sac" },
//!     { "name": "huile", "quantity": 2, "price": 1500 }
//!   ]
//! }
//! ```
//!
//! The parser is told to stay inside our enums but routinely does not,
//! so deserialization here is lenient end to end: unknown actions map to
//! `Unknown`, unknown categories/units normalize to their defaults, and
//! absent numeric fields default to zero.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::ProductInput;

// =============================================================================
// Command Action
// =============================================================================

/// What the merchant asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommandAction {
    /// Add stock (upsert-merge into the catalog).
    Add,
    /// Sell products (atomic multi-item sale).
    Sell,
    /// Report quantities on hand.
    CheckStock,
    /// Report stock valuation.
    CheckValue,
    /// The parser could not classify the utterance.
    #[default]
    Unknown,
}

impl CommandAction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            CommandAction::Add => "add",
            CommandAction::Sell => "sell",
            CommandAction::CheckStock => "check_stock",
            CommandAction::CheckValue => "check_value",
            CommandAction::Unknown => "unknown",
        }
    }

    /// Lenient parse. "remove" is accepted as an alias for `Sell`:
    /// earlier versions of the intent prompt used that verb.
    pub fn parse(s: &str) -> CommandAction {
        match s.trim().to_lowercase().as_str() {
            "add" => CommandAction::Add,
            "sell" | "remove" => CommandAction::Sell,
            "check_stock" => CommandAction::CheckStock,
            "check_value" => CommandAction::CheckValue,
            _ => CommandAction::Unknown,
        }
    }
}

impl Serialize for CommandAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CommandAction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(CommandAction::parse(&s))
    }
}

// =============================================================================
// Stock Command
// =============================================================================

/// A parsed, structured command ready for dispatch against the ledger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockCommand {
    #[serde(default)]
    pub action: CommandAction,
    #[serde(default)]
    pub products: Vec<ProductInput>,
}

impl StockCommand {
    /// Short French summary of the product list, e.g. "5 riz, 2 huile".
    pub fn product_summary(&self) -> String {
        self.products
            .iter()
            .map(|p| format!("{} {}", p.quantity, p.name.trim()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::{Category, Unit};

    #[test]
    fn test_action_aliases() {
        assert_eq!(CommandAction::parse("ADD"), CommandAction::Add);
        assert_eq!(CommandAction::parse("remove"), CommandAction::Sell);
        assert_eq!(CommandAction::parse("vendre"), CommandAction::Unknown);
    }

    #[test]
    fn test_deserialize_typical_parser_output() {
        let json = r#"{
            "action": "add",
            "products": [
                { "name": "riz", "quantity": 5, "unit": "Sac", "category": "alimentation" },
                { "name": "huile", "quantity": 2, "price": 1500 }
            ]
        }"#;

        let cmd: StockCommand = serde_json::from_str(json).unwrap();
        assert_eq!(cmd.action, CommandAction::Add);
        assert_eq!(cmd.products.len(), 2);
        assert_eq!(cmd.products[0].unit, Unit::Sac);
        assert_eq!(cmd.products[0].category, Category::Alimentation);
        // absent price defaults to zero, which the merge rule treats as "not supplied"
        assert_eq!(cmd.products[0].price, Money::zero());
        assert_eq!(cmd.products[1].price, Money::from_francs(1500));
    }

    #[test]
    fn test_deserialize_sloppy_parser_output() {
        // Hallucinated action and category must not fail deserialization
        let json = r#"{
            "action": "restock",
            "products": [ { "name": "riz", "quantity": 3, "category": "céréales", "unit": "sachet" } ]
        }"#;

        let cmd: StockCommand = serde_json::from_str(json).unwrap();
        assert_eq!(cmd.action, CommandAction::Unknown);
        assert_eq!(cmd.products[0].category, Category::Autres);
        assert_eq!(cmd.products[0].unit, Unit::Unite);
    }

    #[test]
    fn test_deserialize_missing_fields() {
        let cmd: StockCommand = serde_json::from_str("{}").unwrap();
        assert_eq!(cmd.action, CommandAction::Unknown);
        assert!(cmd.products.is_empty());
    }

    #[test]
    fn test_product_summary() {
        let cmd: StockCommand = serde_json::from_str(
            r#"{ "action": "sell", "products": [
                { "name": " riz ", "quantity": 5 },
                { "name": "lait", "quantity": 2 }
            ]}"#,
        )
        .unwrap();
        assert_eq!(cmd.product_summary(), "5 riz, 2 lait");
    }
}
