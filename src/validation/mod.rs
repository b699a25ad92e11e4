use sqlx::types::BigDecimal;
use std::fmt;
use std::str::FromStr;

use crate::domain::order::{compute_total, NewOrderItem};

pub const EMAIL_MAX_LEN: usize = 255;
pub const NAME_MAX_LEN: usize = 255;
pub const COOKIE_TYPE_MAX_LEN: usize = 255;
pub const PASSWORD_MIN_LEN: usize = 8;
pub const MAX_ITEMS_PER_REQUEST: usize = 100;
pub const MAX_ITEM_QUANTITY: i32 = 10_000;
/// Largest unit price; `MAX_ITEM_QUANTITY` of it still fits `NUMERIC(10,2)`.
pub const MAX_ITEM_PRICE: &str = "9999.99";
/// Largest value an order total column can hold.
pub const MAX_ORDER_TOTAL: &str = "99999999.99";
pub const PRICE_SCALE: i64 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), ValidationError>;

pub fn sanitize_string(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !ch.is_control())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Canonical form of an email address used for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_required(field: &'static str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }

    Ok(())
}

pub fn validate_max_len(field: &'static str, value: &str, max_len: usize) -> ValidationResult {
    if value.len() > max_len {
        return Err(ValidationError::new(
            field,
            format!("must be at most {} characters", max_len),
        ));
    }

    Ok(())
}

pub fn validate_email(email: &str) -> ValidationResult {
    let email = normalize_email(email);
    validate_required("email", &email)?;
    validate_max_len("email", &email, EMAIL_MAX_LEN)?;

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(ValidationError::new("email", "must be a valid email address")),
    }
}

pub fn validate_password(password: &str) -> ValidationResult {
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(ValidationError::new(
            "password",
            format!("must be at least {} characters", PASSWORD_MIN_LEN),
        ));
    }

    Ok(())
}

fn limit(value: &str) -> BigDecimal {
    BigDecimal::from_str(value).unwrap_or_default()
}

pub fn validate_quantity(quantity: i32) -> ValidationResult {
    if quantity <= 0 {
        return Err(ValidationError::new("quantity", "must be greater than zero"));
    }
    if quantity > MAX_ITEM_QUANTITY {
        return Err(ValidationError::new(
            "quantity",
            format!("must be at most {}", MAX_ITEM_QUANTITY),
        ));
    }

    Ok(())
}

/// Prices are whole cents: positive, at most two decimal places, and small
/// enough that a full line still fits the total column.
pub fn validate_price(price: &BigDecimal) -> ValidationResult {
    if price <= &BigDecimal::from(0) {
        return Err(ValidationError::new("price", "must be greater than zero"));
    }
    if price.with_scale(PRICE_SCALE) != *price {
        return Err(ValidationError::new(
            "price",
            format!("must have at most {} decimal places", PRICE_SCALE),
        ));
    }
    if price > &limit(MAX_ITEM_PRICE) {
        return Err(ValidationError::new(
            "price",
            format!("must be at most {}", MAX_ITEM_PRICE),
        ));
    }

    Ok(())
}

pub fn validate_order_total(total: &BigDecimal) -> ValidationResult {
    if total > &limit(MAX_ORDER_TOTAL) {
        return Err(ValidationError::new(
            "items",
            format!("order total must be at most {}", MAX_ORDER_TOTAL),
        ));
    }

    Ok(())
}

pub fn validate_order_item(item: &NewOrderItem) -> ValidationResult {
    validate_required("cookie_type", &item.cookie_type)?;
    validate_max_len("cookie_type", &item.cookie_type, COOKIE_TYPE_MAX_LEN)?;
    validate_quantity(item.quantity)?;
    validate_price(&item.price)
}

pub fn validate_order_items(items: &[NewOrderItem]) -> ValidationResult {
    if items.is_empty() {
        return Err(ValidationError::new("items", "must not be empty"));
    }
    if items.len() > MAX_ITEMS_PER_REQUEST {
        return Err(ValidationError::new(
            "items",
            format!("must contain at most {} entries", MAX_ITEMS_PER_REQUEST),
        ));
    }

    items.iter().try_for_each(validate_order_item)?;
    validate_order_total(&compute_total(items))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(cookie_type: &str, quantity: i32, price: &str) -> NewOrderItem {
        NewOrderItem {
            cookie_type: cookie_type.to_string(),
            quantity,
            price: BigDecimal::from_str(price).expect("valid decimal"),
        }
    }

    #[test]
    fn validates_required_field() {
        assert!(validate_required("field", "value").is_ok());
        assert!(validate_required("field", "   ").is_err());
    }

    #[test]
    fn validates_max_len() {
        assert!(validate_max_len("field", "abc", 3).is_ok());
        assert!(validate_max_len("field", "abcd", 3).is_err());
    }

    #[test]
    fn sanitizes_string() {
        assert_eq!(sanitize_string("  Thin\tMints  "), "Thin Mints");
        assert_eq!(sanitize_string(" \n "), "");
        assert_eq!(sanitize_string("ab\u{0000}cd\u{0007}"), "abcd");
    }

    #[test]
    fn normalizes_email() {
        assert_eq!(normalize_email("  Scout@Demo.COM "), "scout@demo.com");
    }

    #[test]
    fn validates_email() {
        assert!(validate_email("scout@demo.com").is_ok());
        assert!(validate_email("scout").is_err());
        assert!(validate_email("@demo.com").is_err());
        assert!(validate_email("scout@localhost").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn validates_password_length() {
        assert!(validate_password("password123").is_ok());
        assert!(validate_password("short").is_err());
    }

    #[test]
    fn validates_order_items() {
        assert!(validate_order_items(&[item("Thin Mints", 2, "5.00")]).is_ok());
        assert!(validate_order_items(&[]).is_err());
        assert!(validate_order_items(&[item("  ", 1, "5.00")]).is_err());
        assert!(validate_order_items(&[item("Thin Mints", 0, "5.00")]).is_err());
        assert!(validate_order_items(&[item("Thin Mints", -3, "5.00")]).is_err());
        assert!(validate_order_items(&[item("Thin Mints", 1, "0")]).is_err());
        assert!(validate_order_items(&[item("Thin Mints", 1, "-5.00")]).is_err());
    }

    #[test]
    fn rejects_fractional_cents() {
        assert!(validate_order_item(&item("Thin Mints", 3, "0.335")).is_err());
        assert!(validate_order_item(&item("Thin Mints", 3, "0.3")).is_ok());
        assert!(validate_order_item(&item("Thin Mints", 3, "0.330")).is_ok());
        let err = validate_order_item(&item("Thin Mints", 1, "5.001")).unwrap_err();
        assert_eq!(err.field, "price");
    }

    #[test]
    fn rejects_amounts_the_total_column_cannot_hold() {
        assert!(validate_order_item(&item("Thin Mints", MAX_ITEM_QUANTITY, MAX_ITEM_PRICE)).is_ok());
        assert!(validate_order_item(&item("Thin Mints", MAX_ITEM_QUANTITY + 1, "5.00")).is_err());
        assert!(validate_order_item(&item("Thin Mints", 2_000_000_000, "5.00")).is_err());
        assert!(validate_order_item(&item("Thin Mints", 1, "10000.00")).is_err());

        let big_line = item("Thin Mints", MAX_ITEM_QUANTITY, MAX_ITEM_PRICE);
        assert!(validate_order_items(&[big_line.clone()]).is_ok());
        let err = validate_order_items(&[big_line.clone(), big_line]).unwrap_err();
        assert_eq!(err.field, "items");
    }

    #[test]
    fn reports_offending_field() {
        let err = validate_order_items(&[item("Trefoils", 1, "5.00"), item("Trefoils", 0, "5.00")])
            .unwrap_err();
        assert_eq!(err.field, "quantity");
    }
}
