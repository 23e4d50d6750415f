use std::collections::HashMap;

use crate::models::{Category, Ingredient};

/// Maximum number of autocomplete suggestions returned
pub const MAX_SUGGESTIONS: usize = 5;

/// Lookup structure over known ingredient names.
///
/// Names are stored canonically in lowercase; unknown names can be
/// created on the fly with category `unknown`, which exempts them from
/// unit conversion until curated.
#[derive(Debug, Clone, Default)]
pub struct IngredientIndex {
    by_name: HashMap<String, Ingredient>,
}

impl IngredientIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// An index seeded with common curated ingredients so conversion
    /// works out of the box
    pub fn with_defaults() -> Self {
        let mut index = Self::new();
        let seed = [
            ("flour", Category::Weight),
            ("sugar", Category::Weight),
            ("salt", Category::Weight),
            ("butter", Category::Weight),
            ("cheese", Category::Weight),
            ("chicken", Category::Weight),
            ("beef", Category::Weight),
            ("pasta", Category::Weight),
            ("milk", Category::Volume),
            ("water", Category::Volume),
            ("olive oil", Category::Volume),
            ("egg", Category::Count),
            ("onion", Category::Count),
            ("garlic", Category::Count),
            ("tomato", Category::Count),
        ];
        for (name, category) in seed {
            index.insert(Ingredient::new(name, category));
        }
        index
    }

    pub fn insert(&mut self, ingredient: Ingredient) {
        self.by_name.insert(ingredient.name.clone(), ingredient);
    }

    pub fn get(&self, name: &str) -> Option<&Ingredient> {
        self.by_name.get(&name.trim().to_lowercase())
    }

    /// Category of a known ingredient; unknown names report `unknown`
    pub fn category_of(&self, name: &str) -> Category {
        self.get(name).map(|i| i.category).unwrap_or(Category::Unknown)
    }

    /// Case-insensitive match against existing names, creating a new
    /// `unknown`-category ingredient when none exists
    pub fn resolve_or_create(&mut self, name: &str) -> Ingredient {
        let key = name.trim().to_lowercase();
        if let Some(existing) = self.by_name.get(&key) {
            return existing.clone();
        }
        let ingredient = Ingredient::new(name, Category::Unknown);
        tracing::debug!(name = %ingredient.name, "new ingredient added to index");
        self.by_name.insert(key, ingredient.clone());
        ingredient
    }

    /// Suggestions ordered: exact match first, then prefix matches, then
    /// substring matches, alphabetical within each band
    pub fn autocomplete(&self, query: &str) -> Vec<Ingredient> {
        let needle = query.trim().to_lowercase();

        let mut exact = Vec::new();
        let mut prefix = Vec::new();
        let mut substring = Vec::new();
        for ingredient in self.by_name.values() {
            if ingredient.name == needle {
                exact.push(ingredient.clone());
            } else if ingredient.name.starts_with(&needle) {
                prefix.push(ingredient.clone());
            } else if ingredient.name.contains(&needle) {
                substring.push(ingredient.clone());
            }
        }
        prefix.sort_by(|a, b| a.name.cmp(&b.name));
        substring.sort_by(|a, b| a.name.cmp(&b.name));

        exact
            .into_iter()
            .chain(prefix)
            .chain(substring)
            .take(MAX_SUGGESTIONS)
            .collect()
    }
}
