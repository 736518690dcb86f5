use serde::{Deserialize, Serialize};

/// Catalog record as returned by the product-validation collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price_cents: i64,
}
