use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Recipe, UserProfile};
use crate::services::{IngredientIndex, RatingBook, UnitTable};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<RwLock<AppStateInner>>,
}

/// Inner state that can be modified. Filtering, sampling, and conversion
/// read an immutable snapshot under the read lock; rating upserts take
/// the write lock, so aggregate updates serialize against readers.
pub struct AppStateInner {
    pub recipes: HashMap<Uuid, Recipe>,
    pub ingredients: IngredientIndex,
    pub units: UnitTable,
    pub ratings: RatingBook,
    pub profiles: HashMap<Uuid, UserProfile>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Creates application state with the built-in unit table and the
    /// curated starter ingredients
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(AppStateInner {
                recipes: HashMap::new(),
                ingredients: IngredientIndex::with_defaults(),
                units: UnitTable::builtin(),
                ratings: RatingBook::new(),
                profiles: HashMap::new(),
            })),
        }
    }
}
