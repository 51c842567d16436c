//! Static product catalog and promo-code table.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A purchasable plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: u32,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub description: String,
}

struct CatalogEntry {
    id: u32,
    name: &'static str,
    /// Price in cents.
    cents: i64,
    description: &'static str,
}

const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        id: 1,
        name: "Premium Plan",
        cents: 9999,
        description: "Full access to all features",
    },
    CatalogEntry {
        id: 2,
        name: "Basic Plan",
        cents: 2999,
        description: "Limited features",
    },
    CatalogEntry {
        id: 3,
        name: "Enterprise Plan",
        cents: 29999,
        description: "Custom solutions",
    },
];

// Intentionally generous: two codes zero out the order.
const PROMO_CODES: &[(&str, u32)] = &[
    ("DISCOUNT10", 10),
    ("DISCOUNT50", 50),
    ("FREE100", 100),
    ("ADMIN", 100),
];

impl From<&CatalogEntry> for Product {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            id: entry.id,
            name: entry.name.to_string(),
            price: Decimal::new(entry.cents, 2),
            description: entry.description.to_string(),
        }
    }
}

/// All catalog products in display order.
pub fn products() -> Vec<Product> {
    CATALOG.iter().map(Product::from).collect()
}

pub fn find_product(id: u32) -> Option<Product> {
    CATALOG.iter().find(|entry| entry.id == id).map(Product::from)
}

/// Discount percentage for `code`, matched case-insensitively.
pub fn promo_discount(code: &str) -> Option<u32> {
    let code = code.to_uppercase();
    PROMO_CODES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, percent)| *percent)
}

/// `$12.34` style display used by every price label.
pub fn format_usd(amount: Decimal) -> String {
    if amount.is_sign_negative() && !amount.is_zero() {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${:.2}", amount)
    }
}
