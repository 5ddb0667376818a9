//! Catalog entity types and their JSON mapping.

mod ingredient;
mod rarity;
mod recipe;
mod version;

pub use ingredient::{Ingredient, IngredientType};
pub use rarity::{PotColor, Rarity, UnknownRarity, UNRANKED};
pub use recipe::{Category, Recipe, RecipeVariant, VariantIngredient};
pub use version::DataVersion;
