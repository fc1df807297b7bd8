//! # Command Dispatch
//!
//! Applies a parsed [`StockCommand`] against the ledger and builds the
//! French reply the merchant sees (or hears).
//!
//! The command arrives from the LLM intent parser already structured but
//! not necessarily sensible: unusable product entries (empty name,
//! negative amounts) are skipped rather than failing the whole command,
//! because rejecting a voice note over one garbled item helps nobody.

use serde::Serialize;
use tracing::debug;

use crate::error::DbResult;
use crate::pool::Database;
use boutik_core::{CommandAction, Money, Product, SaleLine, StockCommand};

/// What came out of applying a command.
#[derive(Debug, Clone, Serialize)]
pub struct CommandReply {
    /// User-facing message (French).
    pub message: String,
    /// Products touched or reported by the command.
    pub products: Vec<Product>,
    /// Sale total, present only for a completed sale.
    pub total: Option<Money>,
}

impl CommandReply {
    fn message_only(message: impl Into<String>) -> CommandReply {
        CommandReply {
            message: message.into(),
            products: Vec::new(),
            total: None,
        }
    }
}

/// Applies one structured command under the given tenant.
pub async fn apply_command(
    db: &Database,
    tenant: &str,
    command: &StockCommand,
) -> DbResult<CommandReply> {
    debug!(tenant = %tenant, action = command.action.as_str(), products = command.products.len(), "Dispatching command");

    // Drop entries normalization could not save (no name, negative amounts)
    let usable: Vec<_> = command
        .products
        .iter()
        .filter(|p| p.validate().is_ok())
        .cloned()
        .collect();

    match command.action {
        CommandAction::Add => {
            if usable.is_empty() {
                return Ok(CommandReply::message_only(
                    "Aucun produit reconnu dans la commande.",
                ));
            }

            let added = db.catalog().upsert_many(tenant, &usable).await?;
            let summary = usable
                .iter()
                .map(|p| format!("{} {}", p.quantity, p.name.trim()))
                .collect::<Vec<_>>()
                .join(", ");

            Ok(CommandReply {
                message: format!("Stock mis à jour : {summary}"),
                products: added,
                total: None,
            })
        }

        CommandAction::Sell => {
            let lines: Vec<SaleLine> = usable
                .iter()
                .map(|p| SaleLine {
                    name: p.name.clone(),
                    quantity: p.quantity,
                })
                .collect();

            let outcome = db.sales().record_sale(tenant, &lines).await?;
            let total = outcome.is_completed().then(|| outcome.total());
            let message = match total {
                Some(total) => format!("{} — total {}", outcome.message(), total),
                None => outcome.message(),
            };

            Ok(CommandReply {
                message,
                products: Vec::new(),
                total,
            })
        }

        CommandAction::CheckStock => {
            let catalog = db.catalog();

            let products = if usable.is_empty() {
                catalog.list(tenant).await?
            } else {
                let mut found = Vec::new();
                for input in &usable {
                    if let Some(product) = catalog.get(tenant, &input.name).await? {
                        found.push(product);
                    }
                }
                found
            };

            if products.is_empty() {
                return Ok(CommandReply::message_only("Produit non trouvé."));
            }

            let message = products
                .iter()
                .map(|p| format!("{} : {} {}", p.name, p.quantity, p.unit))
                .collect::<Vec<_>>()
                .join(" ; ");

            Ok(CommandReply {
                message,
                products,
                total: None,
            })
        }

        CommandAction::CheckValue => {
            let catalog = db.catalog();

            if usable.is_empty() {
                let value = catalog.stock_value(tenant).await?;
                return Ok(CommandReply::message_only(format!(
                    "Valeur totale du stock : {value}"
                )));
            }

            let mut found = Vec::new();
            for input in &usable {
                if let Some(product) = catalog.get(tenant, &input.name).await? {
                    found.push(product);
                }
            }

            if found.is_empty() {
                return Ok(CommandReply::message_only("Produit non trouvé."));
            }

            let value: Money = found.iter().map(|p| p.total_value).sum();
            let message = format!("Valeur : {value}");
            Ok(CommandReply {
                message,
                products: found,
                total: None,
            })
        }

        CommandAction::Unknown => Ok(CommandReply::message_only(
            "Commande non comprise. Veuillez réessayer.",
        )),
    }
}
