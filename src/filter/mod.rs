//! Listing filters, sorting and the full listing pipeline.
//!
//! Both listing views (recipes and ingredients) run the same steps: text
//! search, then the AND of every active filter, then a stable sort. A filter
//! left at its default value does nothing.

use crate::catalog::Catalog;
use crate::model::{Category, Ingredient, IngredientType, Rarity, Recipe};
use crate::search::search;
use std::collections::BTreeSet;

mod sort;

pub use sort::{
    compare_names, sort_ingredients, sort_recipes, IngredientSortKey, RecipeSortKey,
    SortDirection, SortState,
};

/// Top of the cook-time slider; a ceiling at or above it means "any".
pub const MAX_COOK_TIME_SLIDER: f64 = 120.0;

/// Turns a cook-time slider value into a filter ceiling. The slider maximum
/// (or anything above it) means no ceiling.
pub fn cook_time_ceiling(minutes: f64, slider_max: f64) -> Option<f64> {
    (minutes < slider_max).then_some(minutes)
}

/// Recipe listing filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeFilter {
    /// Keep recipes in one of these categories (empty: any)
    pub categories: BTreeSet<Category>,
    /// Keep recipes with a variant of one of these rarities (empty: any)
    pub rarities: BTreeSet<Rarity>,
    /// Keep recipes with a variant cooking within this many minutes
    pub max_cook_time: Option<f64>,
    /// Keep only recipes makeable from `owned_ingredients`
    pub only_makeable: bool,
    /// Ingredient ids the player has; `None` when the caller has no such data
    pub owned_ingredients: Option<BTreeSet<String>>,
}

impl RecipeFilter {
    pub fn with_owned<S: Into<String>>(mut self, owned: impl IntoIterator<Item = S>) -> Self {
        self.owned_ingredients = Some(owned.into_iter().map(Into::into).collect());
        self
    }

    pub fn keeps(&self, recipe: &Recipe) -> bool {
        if !self.categories.is_empty() && !self.categories.contains(&recipe.category) {
            return false;
        }

        if !self.rarities.is_empty()
            && !recipe
                .variants
                .iter()
                .any(|v| self.rarities.contains(&v.rarity))
        {
            return false;
        }

        if let Some(ceiling) = self.max_cook_time {
            // An unknown cook time is acceptable, not a maximum
            let fits = recipe
                .variants
                .iter()
                .any(|v| v.cook_time_minutes.map_or(true, |t| t <= ceiling));
            if !fits {
                return false;
            }
        }

        if self.only_makeable {
            match &self.owned_ingredients {
                Some(owned) => {
                    if !is_makeable(recipe, owned) {
                        return false;
                    }
                }
                None => return false,
            }
        }

        true
    }

    /// Keeps the recipes passing every active filter, in input order.
    pub fn apply<'a>(&self, recipes: impl IntoIterator<Item = &'a Recipe>) -> Vec<&'a Recipe> {
        recipes.into_iter().filter(|r| self.keeps(r)).collect()
    }

    /// Number of active filter chips: one per selected category and rarity,
    /// plus one each for the cook-time ceiling and makeable toggle.
    pub fn active_count(&self) -> usize {
        self.categories.len()
            + self.rarities.len()
            + usize::from(self.max_cook_time.is_some())
            + usize::from(self.only_makeable)
    }

    pub fn is_active(&self) -> bool {
        self.active_count() > 0
    }
}

/// Whether some variant needs only ingredients from `owned`.
pub fn is_makeable(recipe: &Recipe, owned: &BTreeSet<String>) -> bool {
    recipe
        .variants
        .iter()
        .any(|v| v.ingredients.iter().all(|i| owned.contains(&i.id)))
}

/// Ingredient listing filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientFilter {
    pub types: BTreeSet<IngredientType>,
    /// Ingredients without a rarity never pass a non-empty rarity filter
    pub rarities: BTreeSet<Rarity>,
}

impl IngredientFilter {
    pub fn keeps(&self, ingredient: &Ingredient) -> bool {
        if !self.types.is_empty() && !self.types.contains(&ingredient.kind) {
            return false;
        }
        if !self.rarities.is_empty()
            && !ingredient
                .rarity
                .is_some_and(|r| self.rarities.contains(&r))
        {
            return false;
        }
        true
    }

    pub fn apply<'a>(
        &self,
        ingredients: impl IntoIterator<Item = &'a Ingredient>,
    ) -> Vec<&'a Ingredient> {
        ingredients.into_iter().filter(|i| self.keeps(i)).collect()
    }

    pub fn active_count(&self) -> usize {
        self.types.len() + self.rarities.len()
    }
}

/// Search text, filters and sort order of the recipe listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeQuery {
    pub search: String,
    pub filter: RecipeFilter,
    pub sort: SortState<RecipeSortKey>,
}

impl RecipeQuery {
    pub fn run<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Recipe> {
        let found = search(catalog.recipes(), &self.search);
        let mut recipes = self.filter.apply(found);
        sort_recipes(&mut recipes, self.sort);
        recipes
    }
}

/// Search text, filters and sort order of the ingredient listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientQuery {
    pub search: String,
    pub filter: IngredientFilter,
    pub sort: SortState<IngredientSortKey>,
}

impl IngredientQuery {
    pub fn run<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Ingredient> {
        let found = search(catalog.ingredients(), &self.search);
        let mut ingredients = self.filter.apply(found);
        sort_ingredients(&mut ingredients, self.sort, catalog);
        ingredients
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ids, sample_catalog};
    use indoc::indoc;

    fn recipe(json: &str) -> Recipe {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_default_filter_keeps_everything() {
        let catalog = sample_catalog();
        let filter = RecipeFilter::default();
        assert!(!filter.is_active());
        assert_eq!(filter.apply(catalog.recipes()).len(), 4);
    }

    #[test]
    fn test_category_filter() {
        let catalog = sample_catalog();
        let filter = RecipeFilter {
            categories: [Category::Main, Category::Snack].into(),
            ..Default::default()
        };
        assert_eq!(ids(filter.apply(catalog.recipes())), vec!["soup", "salad"]);
    }

    #[test]
    fn test_rarity_filter_needs_one_matching_variant() {
        let mixed = recipe(indoc! {r#"
            {"id": "a", "name": "A", "category": "Main", "variants": [
              {"rarity": "Common", "ingredients": []},
              {"rarity": "Rare", "ingredients": []}
            ]}"#});
        let plain = recipe(indoc! {r#"
            {"id": "b", "name": "B", "category": "Main", "variants": [
              {"rarity": "Common", "ingredients": []},
              {"rarity": "Uncommon", "ingredients": []}
            ]}"#});

        let filter = RecipeFilter {
            rarities: [Rarity::Rare].into(),
            ..Default::default()
        };
        assert!(filter.keeps(&mixed));
        assert!(!filter.keeps(&plain));
    }

    #[test]
    fn test_unknown_cook_time_passes_ceiling() {
        let unknown = recipe(
            r#"{"id": "a", "name": "A", "category": "Main", "variants": [{"rarity": "Common", "ingredients": []}]}"#,
        );
        let slow = recipe(
            r#"{"id": "b", "name": "B", "category": "Main", "variants": [{"rarity": "Common", "ingredients": [], "cookTimeMin": 31}]}"#,
        );
        let exact = recipe(
            r#"{"id": "c", "name": "C", "category": "Main", "variants": [{"rarity": "Common", "ingredients": [], "cookTimeMin": 30}]}"#,
        );

        let filter = RecipeFilter {
            max_cook_time: Some(30.0),
            ..Default::default()
        };
        assert!(filter.keeps(&unknown));
        assert!(!filter.keeps(&slow));
        assert!(filter.keeps(&exact));
    }

    #[test]
    fn test_cook_time_ceiling_on_catalog() {
        let catalog = sample_catalog();
        let filter = RecipeFilter {
            max_cook_time: Some(40.0),
            ..Default::default()
        };
        // donut's Uncommon variant has no cook time
        assert_eq!(ids(filter.apply(catalog.recipes())), vec!["soup", "donut"]);
    }

    #[test]
    fn test_slider_maximum_means_any_cook_time() {
        assert_eq!(cook_time_ceiling(30.0, MAX_COOK_TIME_SLIDER), Some(30.0));
        assert_eq!(cook_time_ceiling(119.5, MAX_COOK_TIME_SLIDER), Some(119.5));
        assert_eq!(cook_time_ceiling(120.0, MAX_COOK_TIME_SLIDER), None);
        assert_eq!(cook_time_ceiling(240.0, MAX_COOK_TIME_SLIDER), None);
        assert_eq!(cook_time_ceiling(60.0, 60.0), None);
    }

    #[test]
    fn test_makeable_filter() {
        let catalog = sample_catalog();
        let filter = RecipeFilter {
            only_makeable: true,
            ..Default::default()
        };

        let owned = filter.clone().with_owned(["tomato"]);
        assert_eq!(ids(owned.apply(catalog.recipes())), vec!["soup"]);

        let more = filter.clone().with_owned(["tomato", "carrot", "strawberry"]);
        assert_eq!(ids(more.apply(catalog.recipes())), vec!["soup", "donut", "salad", "pancake"]);

        let nothing = filter.clone().with_owned(Vec::<String>::new());
        assert!(nothing.apply(catalog.recipes()).is_empty());
    }

    #[test]
    fn test_makeable_without_owned_data_is_empty() {
        let catalog = sample_catalog();
        let filter = RecipeFilter {
            only_makeable: true,
            owned_ingredients: None,
            ..Default::default()
        };
        assert!(filter.apply(catalog.recipes()).is_empty());
    }

    #[test]
    fn test_filters_compose_with_and() {
        let catalog = sample_catalog();
        let filter = RecipeFilter {
            categories: [Category::Dessert, Category::Snack].into(),
            rarities: [Rarity::Rare, Rarity::Legendary].into(),
            max_cook_time: Some(45.0),
            ..Default::default()
        };
        // salad's Rare variant takes 50 minutes but its VeryCommon one fits
        assert_eq!(ids(filter.apply(catalog.recipes())), vec!["donut", "salad"]);
        assert_eq!(filter.active_count(), 5);
    }

    #[test]
    fn test_tomato_soup_makeability() {
        let catalog = Catalog::from_json(
            r#"[{"id": "tomato", "name": "Tomato", "type": "Vegetable"}]"#,
            r#"[{"id": "soup", "name": "Tomato Soup", "category": "Main",
                 "variants": [{"rarity": "Common", "ingredients": [{"id": "tomato", "qty": 2}]}]}]"#,
            "[]",
        )
        .unwrap();
        let makeable = RecipeFilter {
            only_makeable: true,
            ..Default::default()
        };

        let with_tomato = makeable.clone().with_owned(["tomato"]);
        assert_eq!(ids(with_tomato.apply(catalog.recipes())), vec!["soup"]);

        let empty_pantry = makeable.with_owned(Vec::<&str>::new());
        assert!(empty_pantry.apply(catalog.recipes()).is_empty());
    }

    #[test]
    fn test_ingredient_filter() {
        let catalog = sample_catalog();

        let vegetables = IngredientFilter {
            types: [IngredientType::Vegetable].into(),
            ..Default::default()
        };
        assert_eq!(ids(vegetables.apply(catalog.ingredients())), vec!["tomato", "carrot"]);

        // mushroom has no rarity and drops out
        let rarities = IngredientFilter {
            rarities: Rarity::ALL.into_iter().collect(),
            ..Default::default()
        };
        assert_eq!(
            ids(rarities.apply(catalog.ingredients())),
            vec!["tomato", "carrot", "strawberry"]
        );
    }

    #[test]
    fn test_recipe_query_pipeline() {
        let catalog = sample_catalog();
        let mut query = RecipeQuery {
            search: "a".to_string(),
            filter: RecipeFilter {
                max_cook_time: Some(50.0),
                ..Default::default()
            },
            sort: SortState::new(RecipeSortKey::Name),
        };
        // search keeps soup, salad, pancake; pancake takes 60 minutes
        assert_eq!(ids(query.run(&catalog)), vec!["salad", "soup"]);

        query.sort.select(RecipeSortKey::Name);
        assert_eq!(ids(query.run(&catalog)), vec!["soup", "salad"]);
    }

    #[test]
    fn test_ingredient_query_pipeline() {
        let catalog = sample_catalog();
        let query = IngredientQuery {
            search: "r".to_string(),
            filter: IngredientFilter {
                types: [IngredientType::Vegetable, IngredientType::Fruit].into(),
                ..Default::default()
            },
            sort: SortState::with_direction(IngredientSortKey::Recipes, SortDirection::Descending),
        };
        // "r" also finds mushroom, which the type filter then drops
        assert_eq!(ids(query.run(&catalog)), vec!["carrot", "strawberry"]);
    }
}
