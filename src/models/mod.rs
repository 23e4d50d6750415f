pub mod ingredient;
pub mod profile;
pub mod rating;
pub mod recipe;
pub mod unit;

pub use ingredient::{Category, Ingredient};
pub use profile::UserProfile;
pub use rating::Rating;
pub use recipe::{IngredientLine, Privacy, Recipe, Step};
pub use unit::{MeasurementSystem, UnitDefinition};
