use std::collections::HashMap;

use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::Rating;

/// Running aggregate alongside the individual ratings. The sum and count
/// are adjusted in the same mutation as the per-user entry, so a reader
/// holding the lock never observes a half-applied upsert.
#[derive(Debug, Clone, Default)]
struct RecipeRatings {
    by_user: HashMap<Uuid, Rating>,
    sum: u64,
    count: u64,
}

/// Per-recipe rating store with incrementally maintained averages
#[derive(Debug, Clone, Default)]
pub struct RatingBook {
    by_recipe: HashMap<Uuid, RecipeRatings>,
}

impl RatingBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upserts a user's rating of a recipe. A second submission by the
    /// same user replaces the prior value; the old value is removed from
    /// the running sum before the new one is added.
    pub fn submit(&mut self, recipe_id: Uuid, user_id: Uuid, value: u8) -> AppResult<Rating> {
        if !(1..=5).contains(&value) {
            return Err(AppError::InvalidRating(value));
        }

        let entry = self.by_recipe.entry(recipe_id).or_default();
        let rating = Rating::new(recipe_id, user_id, value);
        match entry.by_user.insert(user_id, rating.clone()) {
            Some(previous) => {
                entry.sum = entry.sum - u64::from(previous.value) + u64::from(value);
            }
            None => {
                entry.sum += u64::from(value);
                entry.count += 1;
            }
        }
        tracing::debug!(%recipe_id, %user_id, value, "rating stored");
        Ok(rating)
    }

    /// A user's current rating of a recipe, if any
    pub fn get(&self, recipe_id: Uuid, user_id: Uuid) -> Option<u8> {
        self.by_recipe
            .get(&recipe_id)?
            .by_user
            .get(&user_id)
            .map(|r| r.value)
    }

    /// Running average, or None when the recipe has no ratings
    pub fn average(&self, recipe_id: Uuid) -> Option<f64> {
        let entry = self.by_recipe.get(&recipe_id)?;
        (entry.count > 0).then(|| entry.sum as f64 / entry.count as f64)
    }

    /// Cascade for recipe deletion
    pub fn remove_recipe(&mut self, recipe_id: Uuid) {
        self.by_recipe.remove(&recipe_id);
    }

    /// Cascade for user deletion: drops the user's ratings everywhere,
    /// keeping each recipe's aggregate in step
    pub fn remove_user(&mut self, user_id: Uuid) {
        for entry in self.by_recipe.values_mut() {
            if let Some(removed) = entry.by_user.remove(&user_id) {
                entry.sum -= u64::from(removed.value);
                entry.count -= 1;
            }
        }
    }
}
