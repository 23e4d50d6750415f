pub mod filter;
pub mod ingredient_index;
pub mod ratings;
pub mod sampler;
pub mod units;

pub use filter::{filter, FilterCriteria};
pub use ingredient_index::IngredientIndex;
pub use ratings::RatingBook;
pub use sampler::sample;
pub use units::{Conversion, ConvertedLine, UnitTable};
