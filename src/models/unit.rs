use serde::{Deserialize, Serialize};
use std::fmt::Display;

use super::Category;

/// Measurement system a unit belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementSystem {
    Metric,
    Imperial,
}

impl Display for MeasurementSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeasurementSystem::Metric => write!(f, "metric"),
            MeasurementSystem::Imperial => write!(f, "imperial"),
        }
    }
}

/// A measuring unit with its conversion factor to the category's canonical
/// base unit (grams for weight, milliliters for volume, pieces for count)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnitDefinition {
    pub abbreviation: String,
    pub name: String,
    pub system: MeasurementSystem,
    pub category: Category,
    pub base_factor: f64,
}

impl UnitDefinition {
    pub fn new(
        abbreviation: &str,
        name: &str,
        system: MeasurementSystem,
        category: Category,
        base_factor: f64,
    ) -> Self {
        Self {
            abbreviation: abbreviation.to_string(),
            name: name.to_string(),
            system,
            category,
            base_factor,
        }
    }
}
