//! QR payload codec for cookie boxes: `COOKIE:<type>:<quantity>:<price>`.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

use crate::domain::order::NewOrderItem;

pub const QR_PREFIX: &str = "COOKIE";
const FIELD_SEPARATOR: char = ':';

#[derive(Error, Debug, PartialEq, Eq)]
pub enum QrError {
    #[error("expected 4 ':'-separated fields, found {0}")]
    FieldCount(usize),
    #[error("payload must start with 'COOKIE'")]
    BadPrefix,
    #[error("cookie type must not be empty")]
    EmptyCookieType,
    #[error("cookie type must not contain ':'")]
    SeparatorInCookieType,
    #[error("quantity must be a positive integer")]
    InvalidQuantity,
    #[error("price must be a positive decimal")]
    InvalidPrice,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QrPayload {
    pub cookie_type: String,
    pub quantity: i32,
    #[schema(value_type = String, example = "5.00")]
    pub price: BigDecimal,
}

impl QrPayload {
    /// Builds a payload, applying the same constraints `decode` enforces so
    /// that every encoded payload can be read back.
    pub fn new(cookie_type: impl Into<String>, quantity: i32, price: BigDecimal) -> Result<Self, QrError> {
        let cookie_type = cookie_type.into();
        if cookie_type.trim().is_empty() {
            return Err(QrError::EmptyCookieType);
        }
        if cookie_type.contains(FIELD_SEPARATOR) {
            return Err(QrError::SeparatorInCookieType);
        }
        if quantity <= 0 {
            return Err(QrError::InvalidQuantity);
        }
        if price <= BigDecimal::from(0) {
            return Err(QrError::InvalidPrice);
        }
        Ok(Self {
            cookie_type,
            quantity,
            price,
        })
    }

    pub fn encode(&self) -> String {
        self.to_string()
    }

    pub fn into_order_item(self) -> NewOrderItem {
        NewOrderItem {
            cookie_type: self.cookie_type,
            quantity: self.quantity,
            price: self.price,
        }
    }
}

impl fmt::Display for QrPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            QR_PREFIX,
            self.cookie_type,
            self.quantity,
            self.price.round(2).with_scale(2)
        )
    }
}

impl FromStr for QrPayload {
    type Err = QrError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = data.split(FIELD_SEPARATOR).collect();
        if fields.len() != 4 {
            return Err(QrError::FieldCount(fields.len()));
        }
        if fields[0] != QR_PREFIX {
            return Err(QrError::BadPrefix);
        }

        let quantity = fields[2]
            .trim()
            .parse::<i32>()
            .map_err(|_| QrError::InvalidQuantity)?;
        let price = BigDecimal::from_str(fields[3].trim()).map_err(|_| QrError::InvalidPrice)?;

        QrPayload::new(fields[1], quantity, price)
    }
}

pub fn encode(cookie_type: &str, quantity: i32, price: BigDecimal) -> Result<String, QrError> {
    QrPayload::new(cookie_type, quantity, price).map(|p| p.encode())
}

pub fn decode(data: &str) -> Result<QrPayload, QrError> {
    data.parse()
}
