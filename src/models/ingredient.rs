use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Classification shared by ingredients and measuring units.
///
/// The category determines which conversions are valid: weight and volume
/// units convert within their category through a canonical base unit, while
/// `count` and `unknown` quantities pass through unchanged.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Weight,
    Volume,
    Count,
    /// Uncurated ingredients land here and are exempt from conversion.
    Unknown,
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Weight => write!(f, "weight"),
            Category::Volume => write!(f, "volume"),
            Category::Count => write!(f, "count"),
            Category::Unknown => write!(f, "unknown"),
        }
    }
}

/// A known ingredient with its canonical (lowercase) name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ingredient {
    pub name: String,
    pub category: Category,
}

impl Ingredient {
    /// Creates an ingredient, normalizing the name to its canonical form
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        Self {
            name: name.into().trim().to_lowercase(),
            category,
        }
    }
}
