//! Id lookups and the ingredient uses-index.

use crate::catalog::Catalog;
use crate::model::{Ingredient, Rarity, Recipe, RecipeVariant};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LookupError {
    #[error("Ingredient not found: {id}")]
    ReferenceNotFound { id: String },
}

/// Positions of catalog entities keyed by id.
///
/// Holds indices into the owning [`Catalog`]'s collections, never copies of
/// the entities themselves. When an id appears twice the first occurrence
/// wins.
#[derive(Debug, Clone, Default)]
pub struct LookupIndex {
    ingredients_by_id: HashMap<String, usize>,
    recipes_by_id: HashMap<String, usize>,
    /// ingredient id -> positions of recipes using it, ascending
    uses: HashMap<String, Vec<usize>>,
}

impl LookupIndex {
    pub fn build(ingredients: &[Ingredient], recipes: &[Recipe]) -> Self {
        let mut index = LookupIndex::default();

        for (pos, ingredient) in ingredients.iter().enumerate() {
            index
                .ingredients_by_id
                .entry(ingredient.id.clone())
                .or_insert(pos);
        }

        for (pos, recipe) in recipes.iter().enumerate() {
            index.recipes_by_id.entry(recipe.id.clone()).or_insert(pos);
            for id in recipe.ingredient_ids() {
                index.uses.entry(id.to_string()).or_default().push(pos);
            }
        }

        index
    }

    fn recipe_positions(&self, ingredient_id: &str) -> &[usize] {
        self.uses
            .get(ingredient_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// An ingredient slot joined with its catalog entry, if one exists.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedIngredient<'a> {
    pub id: &'a str,
    pub qty: i64,
    pub order_sensitive: bool,
    pub ingredient: Option<&'a Ingredient>,
}

impl ResolvedIngredient<'_> {
    /// Display name, or the raw id as a placeholder when the reference is broken.
    pub fn display_name(&self) -> &str {
        self.ingredient.map(|i| i.name.as_str()).unwrap_or(self.id)
    }

    pub fn is_missing(&self) -> bool {
        self.ingredient.is_none()
    }
}

impl Catalog {
    pub fn ingredient(&self, id: &str) -> Option<&Ingredient> {
        self.index()
            .ingredients_by_id
            .get(id)
            .map(|&pos| &self.ingredients()[pos])
    }

    pub fn recipe(&self, id: &str) -> Option<&Recipe> {
        self.index()
            .recipes_by_id
            .get(id)
            .map(|&pos| &self.recipes()[pos])
    }

    /// Like [`Catalog::ingredient`], but as a typed error for callers that
    /// want to propagate a broken reference.
    pub fn require_ingredient(&self, id: &str) -> Result<&Ingredient, LookupError> {
        self.ingredient(id).ok_or_else(|| LookupError::ReferenceNotFound {
            id: id.to_string(),
        })
    }

    /// Every recipe with at least one variant using `ingredient_id`, in
    /// catalog order.
    pub fn recipes_using_ingredient(&self, ingredient_id: &str) -> Vec<&Recipe> {
        self.index()
            .recipe_positions(ingredient_id)
            .iter()
            .map(|&pos| &self.recipes()[pos])
            .collect()
    }

    /// Number of recipes using `ingredient_id`.
    pub fn recipe_usage_count(&self, ingredient_id: &str) -> usize {
        self.index().recipe_positions(ingredient_id).len()
    }

    /// Joins a variant's ingredient slots with the catalog.
    ///
    /// Unknown ids stay in the list with `ingredient: None` so the caller can
    /// render a placeholder.
    pub fn resolve_ingredients<'a>(&'a self, variant: &'a RecipeVariant) -> Vec<ResolvedIngredient<'a>> {
        variant
            .ingredients
            .iter()
            .map(|slot| {
                let ingredient = self.ingredient(&slot.id);
                if ingredient.is_none() {
                    debug!("{}", LookupError::ReferenceNotFound { id: slot.id.clone() });
                }
                ResolvedIngredient {
                    id: &slot.id,
                    qty: slot.qty,
                    order_sensitive: slot.order_sensitive.unwrap_or(false),
                    ingredient,
                }
            })
            .collect()
    }

    /// Plain-text ingredient list for copying, one `"{qty}× {name}"` per line.
    pub fn ingredient_list_text(&self, variant: &RecipeVariant) -> String {
        self.resolve_ingredients(variant)
            .iter()
            .map(|r| format!("{}× {}", r.qty, r.display_name()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Other recipes sharing at least one known ingredient with `recipe`, in
    /// catalog order, at most `limit` of them. Ids missing from the
    /// ingredient list never link two recipes.
    pub fn related_recipes(&self, recipe: &Recipe, limit: usize) -> Vec<&Recipe> {
        let mut positions: Vec<usize> = recipe
            .ingredient_ids()
            .into_iter()
            .filter(|id| self.ingredient(id).is_some())
            .flat_map(|id| self.index().recipe_positions(id).iter().copied())
            .collect();
        positions.sort_unstable();
        positions.dedup();

        positions
            .into_iter()
            .map(|pos| &self.recipes()[pos])
            .filter(|r| r.id != recipe.id)
            .take(limit)
            .collect()
    }
}

/// Picks the variant to show for a recipe.
///
/// With `target` set, returns the first variant of exactly that rarity.
/// Otherwise returns the highest-rarity variant, the earliest one on ties.
pub fn best_variant(recipe: &Recipe, target: Option<Rarity>) -> Option<&RecipeVariant> {
    match target {
        Some(rarity) => recipe.variants.iter().find(|v| v.rarity == rarity),
        None => recipe.variants.iter().reduce(|best, v| {
            if v.rarity.rank() > best.rarity.rank() {
                v
            } else {
                best
            }
        }),
    }
}
