use crate::model::{Category, Ingredient, Recipe};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Headline numbers for a catalog or a filtered listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub recipe_count: usize,
    pub ingredient_count: usize,
    pub variant_count: usize,
    pub category_count: usize,
    pub reharvestable_count: usize,
    pub verified_recipe_count: usize,
    /// Mean of each recipe's average ingredient count per variant, rounded
    pub avg_ingredients: u32,
}

impl CatalogStats {
    pub(crate) fn collect(ingredients: &[Ingredient], recipes: &[Recipe]) -> Self {
        let mut stats = Self::for_recipes(recipes.iter());
        stats.ingredient_count = ingredients.len();
        stats.reharvestable_count = ingredients.iter().filter(|i| i.is_reharvestable()).count();
        stats
    }

    /// Stats over a recipe listing (ingredient figures left at zero).
    pub fn for_recipes<'a>(recipes: impl IntoIterator<Item = &'a Recipe>) -> Self {
        let mut stats = CatalogStats::default();
        let mut categories: HashSet<Category> = HashSet::new();
        let mut per_recipe_avg = 0.0;

        for recipe in recipes {
            stats.recipe_count += 1;
            stats.variant_count += recipe.variants.len();
            categories.insert(recipe.category);
            if recipe.variants.iter().any(|v| v.is_verified()) {
                stats.verified_recipe_count += 1;
            }
            if !recipe.variants.is_empty() {
                let slots: usize = recipe.variants.iter().map(|v| v.ingredients.len()).sum();
                per_recipe_avg += slots as f64 / recipe.variants.len() as f64;
            }
        }

        stats.category_count = categories.len();
        if stats.recipe_count > 0 {
            stats.avg_ingredients = (per_recipe_avg / stats.recipe_count as f64).round() as u32;
        }
        stats
    }
}
