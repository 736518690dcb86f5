use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::product::Product;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// The status set shared by DTO validation and error messages.
    pub const ALL: [OrderStatus; 3] = [
        OrderStatus::Pending,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn allowed_values() -> String {
        Self::ALL
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|v| v.as_str() == s).ok_or_else(|| {
            anyhow::anyhow!(
                "invalid status '{}', allowed values are: {}",
                s,
                Self::allowed_values()
            )
        })
    }
}

/// Item selection as submitted by the caller, before pricing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrderItem {
    pub product_id: i64,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderItem {
    pub product_id: i64,
    pub quantity: u32,
    pub price_cents: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub total_items: u32,
    pub total_amount_cents: i64,
    pub status: OrderStatus,
    pub paid: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    // Empty when a listing did not load them; omitted from JSON in that case.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Prices the requested items against a validated catalog reply.
    /// Prices are snapshotted here; later catalog changes never touch
    /// persisted orders.
    pub fn new(requested: &[NewOrderItem], products: &[Product]) -> anyhow::Result<Self> {
        if requested.is_empty() {
            anyhow::bail!("items empty");
        }
        let by_id: HashMap<i64, &Product> = products.iter().map(|p| (p.id, p)).collect();
        let mut items = Vec::with_capacity(requested.len());
        let mut total_amount_cents: i64 = 0;
        for req in requested {
            if req.quantity == 0 {
                anyhow::bail!("item quantity must be > 0");
            }
            let product = by_id.get(&req.product_id).ok_or_else(|| {
                anyhow::anyhow!("product {} missing from catalog reply", req.product_id)
            })?;
            total_amount_cents += product.price_cents * i64::from(req.quantity);
            items.push(OrderItem {
                product_id: req.product_id,
                quantity: req.quantity,
                price_cents: product.price_cents,
            });
        }
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            // Counts distinct validated products, not item rows.
            total_items: products.len() as u32,
            total_amount_cents,
            status: OrderStatus::Pending,
            paid: false,
            created_at: now,
            updated_at: now,
            items,
        })
    }

    pub fn update_status(&mut self, status: OrderStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedOrderItem {
    pub product_id: i64,
    pub quantity: u32,
    pub price_cents: i64,
    pub name: String,
}

/// An order with item display names resolved from a catalog reply. Names are
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedOrder {
    pub id: Uuid,
    pub total_items: u32,
    pub total_amount_cents: i64,
    pub status: OrderStatus,
    pub paid: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub items: Vec<EnrichedOrderItem>,
}

impl EnrichedOrder {
    pub fn assemble(order: Order, products: &[Product]) -> anyhow::Result<Self> {
        let by_id: HashMap<i64, &Product> = products.iter().map(|p| (p.id, p)).collect();
        let Order {
            id,
            total_items,
            total_amount_cents,
            status,
            paid,
            created_at,
            updated_at,
            items,
        } = order;
        let mut enriched = Vec::with_capacity(items.len());
        for item in items {
            let product = by_id.get(&item.product_id).ok_or_else(|| {
                anyhow::anyhow!("product {} missing from catalog reply", item.product_id)
            })?;
            enriched.push(EnrichedOrderItem {
                product_id: item.product_id,
                quantity: item.quantity,
                price_cents: item.price_cents,
                name: product.name.clone(),
            });
        }
        Ok(Self {
            id,
            total_items,
            total_amount_cents,
            status,
            paid,
            created_at,
            updated_at,
            items: enriched,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    pub page: u32,
    pub total_count: i64,
    pub last_page: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPage {
    pub data: Vec<Order>,
    pub meta: PageMeta,
}
