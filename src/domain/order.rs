//! Order domain entities.
//! Framework-agnostic representation of a cookie order and its line items.

use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// Payment lifecycle of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Paid,
    Failed,
    Cancelled,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown order status: {0}")]
pub struct UnknownStatus(pub String);

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Failed => "failed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Paid orders are frozen: no new items, no new checkout, no cancellation.
    pub fn accepts_changes(&self) -> bool {
        !matches!(self, OrderStatus::Paid)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "paid" => Ok(OrderStatus::Paid),
            "failed" => Ok(OrderStatus::Failed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A line item as submitted by the client, before it is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewOrderItem {
    pub cookie_type: String,
    pub quantity: i32,
    #[schema(value_type = String, example = "5.00")]
    pub price: BigDecimal,
}

impl NewOrderItem {
    pub fn line_total(&self) -> BigDecimal {
        &self.price * BigDecimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub cookie_type: String,
    pub quantity: i32,
    #[schema(value_type = String, example = "5.00")]
    pub price: BigDecimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub scout_id: Uuid,
    #[schema(value_type = String, example = "10.00")]
    pub total: BigDecimal,
    pub status: OrderStatus,
    pub payment_intent_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Short human-facing reference used in payment descriptions.
    pub fn short_ref(&self) -> String {
        self.id.simple().to_string().chars().take(8).collect()
    }
}

pub fn compute_total(items: &[NewOrderItem]) -> BigDecimal {
    items
        .iter()
        .map(NewOrderItem::line_total)
        .fold(BigDecimal::from(0), |acc, x| acc + x)
}

/// Converts a decimal amount into integer minor currency units (cents),
/// rounding to the nearest unit. Returns `None` when it does not fit in `i64`.
pub fn to_minor_units(total: &BigDecimal) -> Option<i64> {
    (total * BigDecimal::from(100)).round(0).to_i64()
}
