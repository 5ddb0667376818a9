uniffi::setup_scaffolding!();

pub mod assets;
pub mod catalog;
pub mod config;
pub mod craving;
pub mod ffi;
pub mod filter;
pub mod index;
pub mod model;
pub mod search;
pub mod validate;

#[cfg(test)]
mod testing;

pub use catalog::{Catalog, CatalogHandle, DataLoadError};
pub use config::SiteConfig;
pub use craving::{CravingMatcher, CravingSearch, MoodThesaurus};
pub use filter::{IngredientQuery, RecipeQuery};
pub use index::best_variant;
pub use model::*;
pub use search::search;
