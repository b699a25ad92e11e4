use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::order::{Order, OrderItem, OrderStatus, UnknownStatus};

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Scout {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Scout {
    pub fn new(email: String, password_hash: String, name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            name,
            created_at: Utc::now(),
        }
    }
}

/// Row type for `orders`. Items are loaded separately.
#[derive(Debug, FromRow)]
pub struct OrderRow {
    pub id: Uuid,
    pub scout_id: Uuid,
    pub total: BigDecimal,
    pub status: String,
    pub payment_intent_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl OrderRow {
    pub fn into_domain(self, items: Vec<OrderItem>) -> Result<Order, UnknownStatus> {
        Ok(Order {
            id: self.id,
            scout_id: self.scout_id,
            total: self.total,
            status: self.status.parse::<OrderStatus>()?,
            payment_intent_id: self.payment_intent_id,
            created_at: self.created_at,
            items,
        })
    }
}

#[derive(Debug, FromRow)]
pub struct OrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub cookie_type: String,
    pub quantity: i32,
    pub price: BigDecimal,
    pub created_at: DateTime<Utc>,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        OrderItem {
            id: row.id,
            order_id: row.order_id,
            cookie_type: row.cookie_type,
            quantity: row.quantity,
            price: row.price,
            created_at: row.created_at,
        }
    }
}
