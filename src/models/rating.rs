use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single user's rating of a recipe, unique per (recipe, user) pair.
/// Re-submission by the same user replaces the prior value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rating {
    pub recipe_id: Uuid,
    pub user_id: Uuid,
    /// Integer rating in 1..=5
    pub value: u8,
    pub updated_at: DateTime<Utc>,
}

impl Rating {
    pub fn new(recipe_id: Uuid, user_id: Uuid, value: u8) -> Self {
        Self {
            recipe_id,
            user_id,
            value,
            updated_at: Utc::now(),
        }
    }
}
