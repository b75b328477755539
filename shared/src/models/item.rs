//! Menu item and variant models

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed set of menu categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Beverages,
    Food,
    Misc,
}

impl Category {
    /// All known categories, in display order
    pub const ALL: &'static [Category] = &[Category::Beverages, Category::Food, Category::Misc];

    /// Parse a category from its wire representation (case-sensitive)
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Beverages" => Some(Self::Beverages),
            "Food" => Some(Self::Food),
            "Misc" => Some(Self::Misc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beverages => "Beverages",
            Self::Food => "Food",
            Self::Misc => "Misc",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A size variant of an item with its own price and stock count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Variant {
    /// Size label, uppercased (S/M/L by convention)
    pub size: String,
    /// Price in currency units
    pub price: f64,
    /// Remaining stock count
    pub stock: i64,
}

/// Menu item owning an ordered sequence of size variants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: i64,
    /// Display name (capitalized); matching is case-insensitive
    pub name: String,
    pub category: Category,
    pub variants: Vec<Variant>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// One submitted variant in an add/update item request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantInput {
    pub size: String,
    pub price: f64,
    pub stock: i64,
}

/// Add/update item request
///
/// `category` stays a plain string so an unknown value surfaces as a
/// structured validation error instead of a serde rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemUpsert {
    pub name: String,
    pub category: String,
    pub variants: Vec<VariantInput>,
}

/// Case-insensitive lookup key for an item name
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Display form of an item name: first letter uppercased, rest lowercased
pub fn display_name(name: &str) -> String {
    let trimmed = name.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
        None => String::new(),
    }
}

/// Normalized size label (trimmed, uppercased)
pub fn normalize_size(size: &str) -> String {
    size.trim().to_uppercase()
}
