//! Static cookie product catalog. Not persisted; order line items keep
//! their own copy of the product name.

use bigdecimal::BigDecimal;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy)]
pub struct CookieType {
    pub name: &'static str,
    pub description: &'static str,
    pub price_cents: i64,
}

impl CookieType {
    pub fn price(&self) -> BigDecimal {
        BigDecimal::new(self.price_cents.into(), 2)
    }
}

pub const COOKIE_TYPES: &[CookieType] = &[
    CookieType {
        name: "Thin Mints",
        description: "Crispy cookies layered with chocolate and infused with a refreshing mint flavor",
        price_cents: 500,
    },
    CookieType {
        name: "Caramel deLites/Samoas",
        description: "Crispy cookies layered with caramel, sprinkled with toasted coconut and striped with chocolate",
        price_cents: 500,
    },
    CookieType {
        name: "Peanut Butter Patties/Tagalongs",
        description: "Crispy cookies layered with peanut butter and covered with chocolate",
        price_cents: 500,
    },
    CookieType {
        name: "Do-si-dos/Peanut Butter Sandwich",
        description: "Crispy oatmeal sandwich cookies with peanut butter filling",
        price_cents: 500,
    },
    CookieType {
        name: "Trefoils/Shortbread",
        description: "Traditional shortbread cookies inspired by the original Girl Scout recipe",
        price_cents: 500,
    },
    CookieType {
        name: "Lemon-Ups",
        description: "Crispy lemon cookies with inspiring messages to lift your spirits",
        price_cents: 500,
    },
    CookieType {
        name: "Toast-Yay!",
        description: "French toast-inspired cookies with cinnamon and sweet icing",
        price_cents: 500,
    },
    CookieType {
        name: "Adventurefuls",
        description: "Brownie-inspired cookies with caramel-flavored crème and sea salt",
        price_cents: 500,
    },
];

pub fn all() -> &'static [CookieType] {
    COOKIE_TYPES
}

/// Case-insensitive lookup by exact product name.
pub fn find_by_name(name: &str) -> Option<&'static CookieType> {
    let needle = name.trim().to_lowercase();
    COOKIE_TYPES
        .iter()
        .find(|cookie| cookie.name.to_lowercase() == needle)
}

/// Name to show for a cookie type taken from a QR payload: the catalog name
/// when one matches, otherwise the raw value title-cased.
pub fn display_name(cookie_type: &str) -> String {
    find_by_name(&cookie_type.replace('_', " "))
        .map(|cookie| cookie.name.to_string())
        .unwrap_or_else(|| format_cookie_name(cookie_type))
}

/// Upper-cases the first letter of every word, leaving the rest untouched.
pub fn format_cookie_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut at_word_start = true;
    for ch in name.chars() {
        if ch.is_alphanumeric() || ch == '_' {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.push(ch);
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

/// Wire form of a catalog entry.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CookieTypeView {
    pub name: String,
    pub description: String,
    #[schema(value_type = String, example = "5.00")]
    pub price: BigDecimal,
}

impl From<&CookieType> for CookieTypeView {
    fn from(cookie: &CookieType) -> Self {
        Self {
            name: cookie.name.to_string(),
            description: cookie.description.to_string(),
            price: cookie.price(),
        }
    }
}
