use std::cmp::Reverse;

use serde::Deserialize;
use uuid::Uuid;

use crate::models::Recipe;

/// Filter criteria as supplied by the client. Blank strings and empty
/// lists count as absent fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterCriteria {
    /// Case-insensitive title substring
    pub title: Option<String>,
    /// Hard filter on the recipe author's display name
    pub creator: Option<String>,
    /// Ingredient names scored by exact (case-insensitive) match
    pub ingredients: Option<Vec<String>>,
    /// When present, the caller wants a "surprise me" sample of this size
    pub num_choices: Option<i64>,
}

impl FilterCriteria {
    fn title_term(&self) -> Option<String> {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
    }

    fn creator_term(&self) -> Option<String> {
        self.creator
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_lowercase)
    }

    fn ingredient_terms(&self) -> Vec<String> {
        self.ingredients
            .iter()
            .flatten()
            .map(|name| name.trim().to_lowercase())
            .filter(|name| !name.is_empty())
            .collect()
    }

    /// True when no scoring criteria are present. The creator field is a
    /// hard filter and does not count: filtering by creator alone still
    /// returns that creator's whole visible pool.
    fn is_pass_through(&self) -> bool {
        self.title_term().is_none() && self.ingredient_terms().is_empty()
    }
}

/// Scores and ranks a recipe pool against the criteria.
///
/// Visibility is applied first and unconditionally: a caller sees a
/// recipe iff it is public or their own. With no scoring criteria the
/// visibility-filtered pool is returned whole, ordered by identifier.
/// Otherwise recipes are ranked by descending score, zero scores
/// dropped, ties broken by identifier ascending.
pub fn filter(pool: &[Recipe], caller: Option<Uuid>, criteria: &FilterCriteria) -> Vec<Recipe> {
    let creator = criteria.creator_term();

    let visible = pool.iter().filter(|recipe| recipe.visible_to(caller)).filter(|recipe| {
        creator
            .as_deref()
            .map_or(true, |c| recipe.author.to_lowercase() == c)
    });

    if criteria.is_pass_through() {
        let mut result: Vec<Recipe> = visible.cloned().collect();
        result.sort_by_key(|r| r.id);
        return result;
    }

    let title = criteria.title_term();
    let ingredients = criteria.ingredient_terms();

    let mut scored: Vec<(u32, Recipe)> = visible
        .filter_map(|recipe| {
            let mut score = 0;
            if let Some(term) = &title {
                if recipe.title.to_lowercase().contains(term) {
                    score += 1;
                }
            }
            for name in &ingredients {
                if recipe.contains_ingredient(name) {
                    score += 1;
                }
            }
            (score > 0).then(|| (score, recipe.clone()))
        })
        .collect();

    scored.sort_by_key(|(score, recipe)| (Reverse(*score), recipe.id));
    tracing::debug!(candidates = scored.len(), "recipes ranked");
    scored.into_iter().map(|(_, recipe)| recipe).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IngredientLine, Privacy, Recipe};

    fn recipe(id: u128, title: &str, privacy: Privacy, owner: Uuid, ingredients: &[&str]) -> Recipe {
        let mut r = Recipe::new(
            title.to_string(),
            String::new(),
            privacy,
            2,
            owner,
            "alice".to_string(),
        );
        r.id = Uuid::from_u128(id);
        for name in ingredients {
            r.add_ingredient(IngredientLine {
                ingredient: name.to_string(),
                quantity: 1.0,
                unit: "pcs".to_string(),
            });
        }
        r
    }

    #[test]
    fn test_empty_criteria_is_pass_through() {
        let owner = Uuid::new_v4();
        let pool = vec![
            recipe(2, "Tomato Pasta", Privacy::Public, owner, &[]),
            recipe(1, "Tomato Soup", Privacy::Public, owner, &[]),
        ];
        let result = filter(&pool, None, &FilterCriteria::default());
        let ids: Vec<Uuid> = result.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![Uuid::from_u128(1), Uuid::from_u128(2)]);
    }

    #[test]
    fn test_blank_fields_count_as_absent() {
        let owner = Uuid::new_v4();
        let pool = vec![recipe(1, "Omelette", Privacy::Public, owner, &[])];
        let criteria = FilterCriteria {
            title: Some("   ".to_string()),
            creator: Some(String::new()),
            ingredients: Some(vec![]),
            num_choices: None,
        };
        assert_eq!(filter(&pool, None, &criteria).len(), 1);
    }

    #[test]
    fn test_private_recipes_hidden_from_strangers() {
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let pool = vec![
            recipe(1, "Secret Sauce", Privacy::Private, owner, &[]),
            recipe(2, "Open Soup", Privacy::Public, owner, &[]),
        ];

        let anonymous = filter(&pool, None, &FilterCriteria::default());
        assert_eq!(anonymous.len(), 1);
        assert_eq!(anonymous[0].id, Uuid::from_u128(2));

        let other = filter(&pool, Some(stranger), &FilterCriteria::default());
        assert_eq!(other.len(), 1);

        let own = filter(&pool, Some(owner), &FilterCriteria::default());
        assert_eq!(own.len(), 2);
    }

    #[test]
    fn test_visibility_applies_even_with_matching_criteria() {
        let owner = Uuid::new_v4();
        let pool = vec![recipe(1, "Secret Tomato Soup", Privacy::Private, owner, &["tomato"])];
        let criteria = FilterCriteria {
            title: Some("tomato".to_string()),
            ingredients: Some(vec!["tomato".to_string()]),
            ..Default::default()
        };
        assert!(filter(&pool, None, &criteria).is_empty());
    }

    #[test]
    fn test_ingredient_scoring_ties_break_by_id() {
        let owner = Uuid::new_v4();
        let pool = vec![
            recipe(2, "Tomato Pasta", Privacy::Public, owner, &["tomato", "pasta"]),
            recipe(1, "Tomato Soup", Privacy::Public, owner, &["tomato", "salt"]),
        ];
        let criteria = FilterCriteria {
            ingredients: Some(vec!["tomato".to_string()]),
            ..Default::default()
        };
        let ids: Vec<Uuid> = filter(&pool, None, &criteria).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![Uuid::from_u128(1), Uuid::from_u128(2)]);
    }

    #[test]
    fn test_higher_scores_rank_first_and_zero_scores_drop() {
        let owner = Uuid::new_v4();
        let pool = vec![
            recipe(1, "Plain Rice", Privacy::Public, owner, &["rice"]),
            recipe(2, "Tomato Soup", Privacy::Public, owner, &["tomato", "salt"]),
            recipe(3, "Tomato Salt Bake", Privacy::Public, owner, &["tomato", "salt", "flour"]),
        ];
        let criteria = FilterCriteria {
            ingredients: Some(vec!["tomato".to_string(), "salt".to_string()]),
            ..Default::default()
        };
        let result = filter(&pool, None, &criteria);
        let ids: Vec<Uuid> = result.iter().map(|r| r.id).collect();
        // Both match twice, tie broken by id; plain rice drops out
        assert_eq!(ids, vec![Uuid::from_u128(2), Uuid::from_u128(3)]);
    }

    #[test]
    fn test_title_substring_adds_one_point() {
        let owner = Uuid::new_v4();
        let pool = vec![
            recipe(1, "Tomato Soup", Privacy::Public, owner, &["salt"]),
            recipe(2, "Minestrone", Privacy::Public, owner, &["tomato"]),
        ];
        let criteria = FilterCriteria {
            title: Some("toma".to_string()),
            ingredients: Some(vec!["tomato".to_string()]),
            ..Default::default()
        };
        let result = filter(&pool, None, &criteria);
        // Both score 1 (title for #1, ingredient for #2), tie by id
        let ids: Vec<Uuid> = result.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![Uuid::from_u128(1), Uuid::from_u128(2)]);
    }

    #[test]
    fn test_creator_is_a_hard_filter() {
        let owner = Uuid::new_v4();
        let mut by_bob = recipe(1, "Tomato Soup", Privacy::Public, owner, &["tomato"]);
        by_bob.author = "bob".to_string();
        let by_alice = recipe(2, "Tomato Pasta", Privacy::Public, owner, &["tomato"]);
        let pool = vec![by_bob, by_alice];

        let criteria = FilterCriteria {
            creator: Some("Alice".to_string()),
            ingredients: Some(vec!["tomato".to_string()]),
            ..Default::default()
        };
        let result = filter(&pool, None, &criteria);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].author, "alice");

        // Creator alone returns that creator's whole visible pool
        let creator_only = FilterCriteria {
            creator: Some("bob".to_string()),
            ..Default::default()
        };
        let result = filter(&pool, None, &creator_only);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].author, "bob");
    }

    #[test]
    fn test_no_partial_credit_for_multiword_ingredients() {
        let owner = Uuid::new_v4();
        let pool = vec![recipe(1, "Dressing", Privacy::Public, owner, &["olive oil"])];
        let criteria = FilterCriteria {
            ingredients: Some(vec!["olive".to_string()]),
            ..Default::default()
        };
        assert!(filter(&pool, None, &criteria).is_empty());
    }
}
