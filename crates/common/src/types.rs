//! Core types for the Vitrine catalog

use serde::{Deserialize, Serialize};

/// A product in the fixed catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub price: f64,
    pub category: String,
    pub in_stock: bool,
}

/// A registered user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub role: String,
}

/// Query filter for product listings. Absent fields impose no constraint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    pub category: Option<String>,
    pub in_stock: Option<bool>,
}

impl ProductFilter {
    /// True when the product satisfies every supplied filter
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category {
            if &product.category != category {
                return false;
            }
        }
        if let Some(in_stock) = self.in_stock {
            if product.in_stock != in_stock {
                return false;
            }
        }
        true
    }
}

/// Payload for user creation. Bodies are trusted as-is: no uniqueness
/// or format validation is applied to the email.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Role assigned when a creation request omits one
pub const DEFAULT_ROLE: &str = "user";
