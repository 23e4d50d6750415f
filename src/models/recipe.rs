use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Visibility of a recipe
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Privacy {
    Private,
    Public,
}

/// A single preparation step, 1-based and contiguous within its recipe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Step {
    pub order: u32,
    pub text: String,
}

/// An ingredient line as entered by the recipe's creator.
///
/// The quantity and unit are stored verbatim; conversion to another
/// measurement system happens at presentation time on a copy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngredientLine {
    /// Canonical (lowercase) ingredient name
    pub ingredient: String,
    pub quantity: f64,
    pub unit: String,
}

/// A recipe owned by a single user, with its steps and ingredient lines
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub privacy: Privacy,
    pub servings: u32,
    pub owner: Uuid,
    /// Display name of the owner, matched by the creator filter
    pub author: String,
    pub ingredients: Vec<IngredientLine>,
    pub steps: Vec<Step>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    pub fn new(
        title: String,
        description: String,
        privacy: Privacy,
        servings: u32,
        owner: Uuid,
        author: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            privacy,
            servings,
            owner,
            author,
            ingredients: Vec::new(),
            steps: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// A caller sees a recipe iff it is public or the caller owns it
    pub fn visible_to(&self, caller: Option<Uuid>) -> bool {
        self.privacy == Privacy::Public || caller == Some(self.owner)
    }

    pub fn add_ingredient(&mut self, line: IngredientLine) {
        self.ingredients.push(line);
    }

    /// Replaces all steps, assigning contiguous 1-based orders
    pub fn set_steps(&mut self, texts: Vec<String>) {
        self.steps = texts
            .into_iter()
            .enumerate()
            .map(|(idx, text)| Step {
                order: idx as u32 + 1,
                text,
            })
            .collect();
    }

    /// Removes the step with the given order and closes the gap.
    /// Returns false when no such step exists.
    pub fn remove_step(&mut self, order: u32) -> bool {
        let before = self.steps.len();
        self.steps.retain(|s| s.order != order);
        if self.steps.len() == before {
            return false;
        }
        self.renumber_steps();
        true
    }

    /// Re-sequences step orders to a contiguous 1-based run,
    /// preserving relative order
    pub fn renumber_steps(&mut self) {
        self.steps.sort_by_key(|s| s.order);
        for (idx, step) in self.steps.iter_mut().enumerate() {
            step.order = idx as u32 + 1;
        }
    }

    /// Case-insensitive exact match against this recipe's ingredient names
    pub fn contains_ingredient(&self, name: &str) -> bool {
        let needle = name.trim().to_lowercase();
        self.ingredients
            .iter()
            .any(|line| line.ingredient.to_lowercase() == needle)
    }
}
