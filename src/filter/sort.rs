use crate::catalog::Catalog;
use crate::model::{Ingredient, Rarity, Recipe};
use std::cmp::Ordering;
use std::str::FromStr;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// The active sort column of a listing and its direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortState<K> {
    pub key: K,
    pub direction: SortDirection,
}

impl<K: Copy + PartialEq> SortState<K> {
    pub fn new(key: K) -> Self {
        SortState {
            key,
            direction: SortDirection::Ascending,
        }
    }

    pub fn with_direction(key: K, direction: SortDirection) -> Self {
        SortState { key, direction }
    }

    /// Handles a click on a sort column.
    ///
    /// Selecting the active key flips the direction; selecting another key
    /// switches to it in ascending order.
    pub fn select(&mut self, key: K) {
        if self.key == key {
            self.direction = self.direction.flipped();
        } else {
            self.key = key;
            self.direction = SortDirection::Ascending;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RecipeSortKey {
    #[default]
    Name,
    Category,
    /// Highest variant rarity
    Rarity,
    /// Number of variants
    Variants,
    /// Fewest ingredients needed by any variant
    Ingredients,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum IngredientSortKey {
    #[default]
    Name,
    Type,
    Rarity,
    /// Number of recipes using the ingredient
    Recipes,
}

impl FromStr for RecipeSortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(RecipeSortKey::Name),
            "category" => Ok(RecipeSortKey::Category),
            "rarity" => Ok(RecipeSortKey::Rarity),
            "variants" => Ok(RecipeSortKey::Variants),
            "ingredients" => Ok(RecipeSortKey::Ingredients),
            other => Err(format!("Unknown recipe sort key: {other}")),
        }
    }
}

impl FromStr for IngredientSortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(IngredientSortKey::Name),
            "type" => Ok(IngredientSortKey::Type),
            "rarity" => Ok(IngredientSortKey::Rarity),
            "recipes" => Ok(IngredientSortKey::Recipes),
            other => Err(format!("Unknown ingredient sort key: {other}")),
        }
    }
}

/// Collation-style name order.
///
/// Compares base letters first, ignoring accents and case ("Éclair" sorts
/// with the e's). Ties are broken by accents (unaccented first), then case
/// (lower-case first), then the exact text.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    primary_key(a)
        .cmp(&primary_key(b))
        .then_with(|| secondary_key(a).cmp(&secondary_key(b)))
        .then_with(|| case_key(a).cmp(&case_key(b)))
        .then_with(|| a.cmp(b))
}

fn primary_key(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

fn secondary_key(s: &str) -> String {
    s.nfd().collect::<String>().to_lowercase()
}

fn case_key(s: &str) -> Vec<bool> {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(char::is_uppercase)
        .collect()
}

fn compare_recipes(a: &Recipe, b: &Recipe, key: RecipeSortKey) -> Ordering {
    match key {
        RecipeSortKey::Name => compare_names(&a.name, &b.name),
        RecipeSortKey::Category => a.category.as_str().cmp(b.category.as_str()),
        RecipeSortKey::Rarity => a.max_rarity_rank().cmp(&b.max_rarity_rank()),
        RecipeSortKey::Variants => a.variants.len().cmp(&b.variants.len()),
        RecipeSortKey::Ingredients => a.min_ingredient_count().cmp(&b.min_ingredient_count()),
    }
}

/// Stable sort of a recipe listing; ties keep their current order.
pub fn sort_recipes(recipes: &mut [&Recipe], sort: SortState<RecipeSortKey>) {
    recipes.sort_by(|a, b| sort.direction.apply(compare_recipes(a, b, sort.key)));
}

/// Stable sort of an ingredient listing; ties keep their current order.
///
/// `catalog` supplies recipe usage counts for [`IngredientSortKey::Recipes`].
pub fn sort_ingredients(
    ingredients: &mut [&Ingredient],
    sort: SortState<IngredientSortKey>,
    catalog: &Catalog,
) {
    ingredients.sort_by(|a, b| {
        let ordering = match sort.key {
            IngredientSortKey::Name => compare_names(&a.name, &b.name),
            IngredientSortKey::Type => a.kind.as_str().cmp(b.kind.as_str()),
            IngredientSortKey::Rarity => {
                Rarity::rank_or_unranked(a.rarity).cmp(&Rarity::rank_or_unranked(b.rarity))
            }
            IngredientSortKey::Recipes => catalog
                .recipe_usage_count(&a.id)
                .cmp(&catalog.recipe_usage_count(&b.id)),
        };
        sort.direction.apply(ordering)
    });
}
