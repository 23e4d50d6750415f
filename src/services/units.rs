use std::collections::HashMap;

use crate::error::{AppError, AppResult};
use crate::models::{Category, IngredientLine, MeasurementSystem, UnitDefinition};

/// Number of significant digits kept for display quantities
const DISPLAY_SIG_DIGITS: i32 = 2;

/// Result of a single quantity conversion
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub quantity: f64,
    pub unit: String,
}

/// An ingredient line prepared for display. When a line cannot be
/// converted (unknown unit, exempt category, no target unit) it keeps
/// its source quantity and unit and `converted` stays false.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ConvertedLine {
    pub ingredient: String,
    pub quantity: f64,
    pub unit: String,
    pub converted: bool,
}

/// Static registry of measuring units with synonym-aware lookup.
///
/// Conversion goes through the category's canonical base unit (grams for
/// weight, milliliters for volume) and is applied to a copy only; stored
/// quantities are never mutated.
#[derive(Debug, Clone)]
pub struct UnitTable {
    units: Vec<UnitDefinition>,
    /// lowercase synonym -> canonical abbreviation
    synonyms: HashMap<String, String>,
}

/// Spoken and written variants accepted for each canonical abbreviation
const SYNONYMS: &[(&str, &[&str])] = &[
    ("g", &["g", "gram", "grams", "gr"]),
    ("kg", &["kg", "kgs", "kilogram", "kilograms"]),
    ("ml", &["ml", "mililiter", "mililiters", "milliliter", "milliliters"]),
    ("l", &["l", "liter", "liters"]),
    ("oz", &["oz", "ounce", "ounces"]),
    ("lb", &["lb", "pound", "pounds"]),
    ("pcs", &["pcs", "piece", "pieces"]),
    ("tsp", &["tsp", "teaspoon", "teaspoons"]),
    ("tbsp", &["tbsp", "tablespoon", "tablespoons"]),
    ("cup", &["cup", "cups"]),
];

impl UnitTable {
    pub fn new(units: Vec<UnitDefinition>) -> Self {
        let mut synonyms = HashMap::new();
        for (canonical, variants) in SYNONYMS {
            for variant in *variants {
                synonyms.insert((*variant).to_string(), (*canonical).to_string());
            }
        }
        Self { units, synonyms }
    }

    /// The default cooking measurement table
    pub fn builtin() -> Self {
        use Category::{Count, Volume, Weight};
        use MeasurementSystem::{Imperial, Metric};

        Self::new(vec![
            UnitDefinition::new("g", "gram", Metric, Weight, 1.0),
            UnitDefinition::new("kg", "kilogram", Metric, Weight, 1000.0),
            UnitDefinition::new("oz", "ounce", Imperial, Weight, 28.3495),
            UnitDefinition::new("lb", "pound", Imperial, Weight, 453.592),
            UnitDefinition::new("ml", "milliliter", Metric, Volume, 1.0),
            UnitDefinition::new("l", "liter", Metric, Volume, 1000.0),
            UnitDefinition::new("tsp", "teaspoon", Imperial, Volume, 4.92892),
            UnitDefinition::new("tbsp", "tablespoon", Imperial, Volume, 14.7868),
            UnitDefinition::new("cup", "cup", Imperial, Volume, 240.0),
            UnitDefinition::new("pcs", "piece", Metric, Count, 1.0),
            UnitDefinition::new("pcs", "piece", Imperial, Count, 1.0),
        ])
    }

    /// Resolves a unit string (abbreviation, full name, or synonym,
    /// case-insensitive) to its definition
    pub fn resolve(&self, unit: &str) -> Option<&UnitDefinition> {
        let lowered = unit.trim().to_lowercase();
        if lowered.is_empty() {
            return None;
        }
        let canonical = self.synonyms.get(&lowered).map(String::as_str).unwrap_or(&lowered);
        self.units
            .iter()
            .find(|u| u.abbreviation == canonical || u.name == canonical)
    }

    /// Units available in a system, ordered by category then ascending
    /// canonical factor. Used to populate selection controls.
    pub fn units_for_system(&self, system: MeasurementSystem) -> Vec<UnitDefinition> {
        let mut units: Vec<UnitDefinition> = self
            .units
            .iter()
            .filter(|u| u.system == system)
            .cloned()
            .collect();
        units.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then(a.base_factor.total_cmp(&b.base_factor))
        });
        units
    }

    /// Converts a quantity into the target system's best display unit.
    ///
    /// Count quantities and unknown-category ingredients pass through
    /// unchanged. The target unit is the smallest unit of the source
    /// category whose converted quantity stays at or above one; when even
    /// that dips below one the smallest unit still gives the value nearest
    /// a whole amount, so it is kept.
    pub fn convert(
        &self,
        quantity: f64,
        from_unit: &str,
        to_system: MeasurementSystem,
        ingredient_category: Category,
    ) -> AppResult<Conversion> {
        if matches!(ingredient_category, Category::Count | Category::Unknown) {
            return Ok(Conversion {
                quantity,
                unit: from_unit.to_string(),
            });
        }

        let from = self
            .resolve(from_unit)
            .ok_or_else(|| AppError::UnknownUnit(from_unit.to_string()))?;

        if from.category == Category::Count {
            return Ok(Conversion {
                quantity,
                unit: from.abbreviation.clone(),
            });
        }

        let mut candidates: Vec<&UnitDefinition> = self
            .units
            .iter()
            .filter(|u| u.system == to_system && u.category == from.category)
            .collect();
        if candidates.is_empty() {
            return Err(AppError::NoTargetUnit {
                system: to_system,
                category: from.category,
            });
        }
        candidates.sort_by(|a, b| a.base_factor.total_cmp(&b.base_factor));

        let base_quantity = quantity * from.base_factor;
        let target = candidates
            .iter()
            .find(|u| base_quantity / u.base_factor >= 1.0)
            .unwrap_or(&candidates[0]);

        Ok(Conversion {
            quantity: round_significant(base_quantity / target.base_factor, DISPLAY_SIG_DIGITS),
            unit: target.abbreviation.clone(),
        })
    }

    /// Applies `convert` to a copy of an ingredient line, falling back to
    /// the source quantity and unit when conversion is not possible.
    /// A failed line never aborts the surrounding recipe response.
    pub fn convert_line(
        &self,
        line: &IngredientLine,
        to_system: MeasurementSystem,
        ingredient_category: Category,
    ) -> ConvertedLine {
        if matches!(ingredient_category, Category::Count | Category::Unknown) {
            return ConvertedLine {
                ingredient: line.ingredient.clone(),
                quantity: line.quantity,
                unit: line.unit.clone(),
                converted: false,
            };
        }

        match self.convert(line.quantity, &line.unit, to_system, ingredient_category) {
            Ok(conversion) => ConvertedLine {
                ingredient: line.ingredient.clone(),
                quantity: conversion.quantity,
                unit: conversion.unit,
                converted: true,
            },
            Err(err) => {
                tracing::debug!(
                    ingredient = %line.ingredient,
                    unit = %line.unit,
                    error = %err,
                    "ingredient line left unconverted"
                );
                ConvertedLine {
                    ingredient: line.ingredient.clone(),
                    quantity: line.quantity,
                    unit: line.unit.clone(),
                    converted: false,
                }
            }
        }
    }
}

impl Default for UnitTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Rounds to the given number of significant digits
fn round_significant(value: f64, digits: i32) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    let magnitude = value.abs().log10().floor() as i32;
    let factor = 10f64.powi(digits - 1 - magnitude);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_significant() {
        assert_eq!(round_significant(35.273, 2), 35.0);
        assert_eq!(round_significant(2.2046, 2), 2.2);
        assert_eq!(round_significant(0.017637, 2), 0.018);
        assert_eq!(round_significant(0.0, 2), 0.0);
    }

    #[test]
    fn test_grams_to_imperial_prefers_smallest_qualifying_unit() {
        let table = UnitTable::builtin();
        let result = table
            .convert(1000.0, "g", MeasurementSystem::Imperial, Category::Weight)
            .unwrap();
        // 1000 g is 35.27 oz; oz is the smallest imperial weight unit and
        // its quantity stays above one, so it wins over 2.2 lb.
        assert_eq!(result.unit, "oz");
        assert_eq!(result.quantity, 35.0);
    }

    #[test]
    fn test_teaspoon_to_metric() {
        let table = UnitTable::builtin();
        let result = table
            .convert(1.0, "tsp", MeasurementSystem::Metric, Category::Volume)
            .unwrap();
        assert_eq!(result.unit, "ml");
        assert_eq!(result.quantity, 4.9);
    }

    #[test]
    fn test_sub_unit_quantities_fall_back_to_smallest_unit() {
        let table = UnitTable::builtin();
        // 0.5 ml is below one in every imperial volume unit; the smallest
        // unit keeps the displayed value nearest a whole amount
        let result = table
            .convert(0.5, "ml", MeasurementSystem::Imperial, Category::Volume)
            .unwrap();
        assert_eq!(result.unit, "tsp");
        assert_eq!(result.quantity, 0.1);
    }

    #[test]
    fn test_round_trip_within_tolerance() {
        let table = UnitTable::builtin();
        let out = table
            .convert(500.0, "g", MeasurementSystem::Imperial, Category::Weight)
            .unwrap();
        let back = table
            .convert(out.quantity, &out.unit, MeasurementSystem::Metric, Category::Weight)
            .unwrap();
        assert_eq!(back.unit, "g");
        // Display rounding to 2 significant digits bounds the error
        assert!((back.quantity - 500.0).abs() / 500.0 < 0.05);
    }

    #[test]
    fn test_synonym_and_case_insensitive_lookup() {
        let table = UnitTable::builtin();
        let result = table
            .convert(2.0, "Tablespoons", MeasurementSystem::Metric, Category::Volume)
            .unwrap();
        assert_eq!(result.unit, "ml");
        assert_eq!(result.quantity, 30.0);
    }

    #[test]
    fn test_unknown_unit() {
        let table = UnitTable::builtin();
        let err = table
            .convert(1.0, "smidgen", MeasurementSystem::Metric, Category::Weight)
            .unwrap_err();
        assert!(matches!(err, AppError::UnknownUnit(_)));
    }

    #[test]
    fn test_no_target_unit() {
        // A table whose weight units exist only in metric
        let table = UnitTable::new(vec![UnitDefinition::new(
            "g",
            "gram",
            MeasurementSystem::Metric,
            Category::Weight,
            1.0,
        )]);
        let err = table
            .convert(10.0, "g", MeasurementSystem::Imperial, Category::Weight)
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::NoTargetUnit {
                system: MeasurementSystem::Imperial,
                category: Category::Weight,
            }
        ));
    }

    #[test]
    fn test_count_and_unknown_categories_pass_through() {
        let table = UnitTable::builtin();
        let eggs = table
            .convert(2.0, "pcs", MeasurementSystem::Imperial, Category::Count)
            .unwrap();
        assert_eq!(eggs, Conversion { quantity: 2.0, unit: "pcs".to_string() });

        let mystery = table
            .convert(3.0, "handful", MeasurementSystem::Metric, Category::Unknown)
            .unwrap();
        assert_eq!(mystery.quantity, 3.0);
        assert_eq!(mystery.unit, "handful");
    }

    #[test]
    fn test_units_for_system_ordering() {
        let table = UnitTable::builtin();
        let imperial: Vec<String> = table
            .units_for_system(MeasurementSystem::Imperial)
            .into_iter()
            .map(|u| u.abbreviation)
            .collect();
        assert_eq!(imperial, vec!["oz", "lb", "tsp", "tbsp", "cup", "pcs"]);
    }

    #[test]
    fn test_convert_line_partial_success() {
        let table = UnitTable::builtin();
        let line = IngredientLine {
            ingredient: "saffron".to_string(),
            quantity: 1.0,
            unit: "pinch".to_string(),
        };
        let converted =
            table.convert_line(&line, MeasurementSystem::Imperial, Category::Weight);
        assert!(!converted.converted);
        assert_eq!(converted.quantity, 1.0);
        assert_eq!(converted.unit, "pinch");
    }

    #[test]
    fn test_convert_line_success_sets_flag() {
        let table = UnitTable::builtin();
        let line = IngredientLine {
            ingredient: "flour".to_string(),
            quantity: 1000.0,
            unit: "g".to_string(),
        };
        let converted =
            table.convert_line(&line, MeasurementSystem::Imperial, Category::Weight);
        assert!(converted.converted);
        assert_eq!(converted.unit, "oz");
        assert_eq!(converted.quantity, 35.0);
    }
}
