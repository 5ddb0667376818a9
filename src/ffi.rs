//! UniFFI bindings for cross-platform support (iOS, Android).
//!
//! This module provides FFI-safe types and functions for use with UniFFI.
//! Enums cross the boundary as their canonical names (`"VeryCommon"`,
//! `"Dessert"`, ...) and are parsed back on the way in.

use crate::assets::SyncError;
use crate::catalog::{
    Catalog, CatalogHandle, CatalogStats, DataLoadError, DirectorySource, RefreshError,
};
use crate::config::ConfigError;
use crate::craving::{CravingMatcher, MoodThesaurus};
use crate::filter::{
    cook_time_ceiling, IngredientQuery, RecipeQuery, SortDirection, SortState,
    MAX_COOK_TIME_SLIDER,
};
use crate::index::{best_variant as best_variant_internal, LookupError};
use crate::model::{DataVersion, Ingredient, Rarity, Recipe, RecipeVariant};
use crate::search::search;
use std::collections::BTreeSet;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;

/// FFI-safe error type that wraps all possible errors.
#[derive(Debug, uniffi::Error, thiserror::Error)]
pub enum GardenError {
    #[error("Data load error: {message}")]
    DataLoad { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("IO error: {message}")]
    IoError { message: String },
}

impl From<DataLoadError> for GardenError {
    fn from(e: DataLoadError) -> Self {
        GardenError::DataLoad {
            message: e.to_string(),
        }
    }
}

impl From<RefreshError> for GardenError {
    fn from(e: RefreshError) -> Self {
        match e {
            RefreshError::RefreshFailed(e) => e.into(),
        }
    }
}

impl From<LookupError> for GardenError {
    fn from(e: LookupError) -> Self {
        GardenError::NotFound {
            message: e.to_string(),
        }
    }
}

impl From<SyncError> for GardenError {
    fn from(e: SyncError) -> Self {
        match e {
            SyncError::DataError(e) => e.into(),
            other => GardenError::IoError {
                message: other.to_string(),
            },
        }
    }
}

impl From<ConfigError> for GardenError {
    fn from(e: ConfigError) -> Self {
        GardenError::InvalidArgument {
            message: e.to_string(),
        }
    }
}

fn parse_arg<T>(value: &str) -> Result<T, GardenError>
where
    T: FromStr,
    T::Err: Display,
{
    value.parse().map_err(|e: T::Err| GardenError::InvalidArgument {
        message: e.to_string(),
    })
}

fn parse_args<T>(values: &[String]) -> Result<BTreeSet<T>, GardenError>
where
    T: FromStr + Ord,
    T::Err: Display,
{
    values.iter().map(|v| parse_arg(v)).collect()
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiIngredient {
    pub id: String,
    pub name: String,
    /// Ingredient type name, e.g. "Fruit"
    pub kind: String,
    pub rarity: Option<String>,
    pub reharvestable: bool,
    pub notes: Vec<String>,
    pub aliases: Vec<String>,
}

impl From<&Ingredient> for FfiIngredient {
    fn from(i: &Ingredient) -> Self {
        FfiIngredient {
            id: i.id.clone(),
            name: i.name.clone(),
            kind: i.kind.to_string(),
            rarity: i.rarity.map(|r| r.to_string()),
            reharvestable: i.is_reharvestable(),
            notes: i.notes.clone(),
            aliases: i.aliases.clone(),
        }
    }
}

/// An ingredient slot, already joined with the catalog.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiVariantIngredient {
    pub id: String,
    /// Ingredient name, or the id when the reference is broken
    pub name: String,
    pub qty: i64,
    pub order_sensitive: bool,
    pub missing: bool,
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiVariant {
    pub rarity: String,
    pub ingredients: Vec<FfiVariantIngredient>,
    pub cook_time_minutes: Option<f64>,
    pub pot_color: Option<String>,
    pub notes: Vec<String>,
    pub verified: bool,
    pub sources: Vec<String>,
}

impl FfiVariant {
    fn new(variant: &RecipeVariant, catalog: &Catalog) -> Self {
        FfiVariant {
            rarity: variant.rarity.to_string(),
            ingredients: catalog
                .resolve_ingredients(variant)
                .into_iter()
                .map(|r| FfiVariantIngredient {
                    id: r.id.to_string(),
                    name: r.display_name().to_string(),
                    qty: r.qty,
                    order_sensitive: r.order_sensitive,
                    missing: r.is_missing(),
                })
                .collect(),
            cook_time_minutes: variant.cook_time_minutes,
            pot_color: variant.pot_color.map(|c| c.to_string()),
            notes: variant.notes.clone(),
            verified: variant.is_verified(),
            sources: variant.sources.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiRecipe {
    pub id: String,
    pub name: String,
    pub category: String,
    pub variants: Vec<FfiVariant>,
    pub cravings: Vec<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl FfiRecipe {
    fn new(recipe: &Recipe, catalog: &Catalog) -> Self {
        FfiRecipe {
            id: recipe.id.clone(),
            name: recipe.name.clone(),
            category: recipe.category.to_string(),
            variants: recipe
                .variants
                .iter()
                .map(|v| FfiVariant::new(v, catalog))
                .collect(),
            cravings: recipe.cravings.clone(),
            description: recipe.description.clone(),
            image: recipe.image.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiVersion {
    pub version: String,
    pub date: String,
    pub notes: Vec<String>,
}

impl From<&DataVersion> for FfiVersion {
    fn from(v: &DataVersion) -> Self {
        FfiVersion {
            version: v.version.clone(),
            date: v.date.clone(),
            notes: v.notes.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiStats {
    pub recipe_count: u32,
    pub ingredient_count: u32,
    pub variant_count: u32,
    pub category_count: u32,
    pub reharvestable_count: u32,
    pub verified_recipe_count: u32,
    pub avg_ingredients: u32,
}

/// Counts above `u32::MAX` are clamped rather than wrapped.
fn count_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

impl From<CatalogStats> for FfiStats {
    fn from(s: CatalogStats) -> Self {
        FfiStats {
            recipe_count: count_u32(s.recipe_count),
            ingredient_count: count_u32(s.ingredient_count),
            variant_count: count_u32(s.variant_count),
            category_count: count_u32(s.category_count),
            reharvestable_count: count_u32(s.reharvestable_count),
            verified_recipe_count: count_u32(s.verified_recipe_count),
            avg_ingredients: s.avg_ingredients,
        }
    }
}

/// Recipe listing state as sent by a UI.
#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiRecipeQuery {
    pub search: String,
    pub categories: Vec<String>,
    pub rarities: Vec<String>,
    /// Cook-time slider value in minutes; 120 (the slider maximum) or more
    /// means any cook time
    pub max_cook_time: Option<f64>,
    pub only_makeable: bool,
    /// `None` when the player's inventory is unknown
    pub owned_ingredients: Option<Vec<String>>,
    /// One of name, category, rarity, variants, ingredients
    pub sort_key: String,
    pub descending: bool,
}

impl TryFrom<FfiRecipeQuery> for RecipeQuery {
    type Error = GardenError;

    fn try_from(q: FfiRecipeQuery) -> Result<Self, Self::Error> {
        let mut query = RecipeQuery {
            search: q.search,
            ..RecipeQuery::default()
        };
        query.filter.categories = parse_args(&q.categories)?;
        query.filter.rarities = parse_args(&q.rarities)?;
        query.filter.max_cook_time = q
            .max_cook_time
            .and_then(|minutes| cook_time_ceiling(minutes, MAX_COOK_TIME_SLIDER));
        query.filter.only_makeable = q.only_makeable;
        query.filter.owned_ingredients = q.owned_ingredients.map(|ids| ids.into_iter().collect());
        query.sort = SortState::with_direction(sort_key(&q.sort_key)?, direction(q.descending));
        Ok(query)
    }
}

/// Ingredient listing state as sent by a UI.
#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiIngredientQuery {
    pub search: String,
    pub types: Vec<String>,
    pub rarities: Vec<String>,
    /// One of name, type, rarity, recipes
    pub sort_key: String,
    pub descending: bool,
}

impl TryFrom<FfiIngredientQuery> for IngredientQuery {
    type Error = GardenError;

    fn try_from(q: FfiIngredientQuery) -> Result<Self, Self::Error> {
        let mut query = IngredientQuery {
            search: q.search,
            ..IngredientQuery::default()
        };
        query.filter.types = parse_args(&q.types)?;
        query.filter.rarities = parse_args(&q.rarities)?;
        query.sort = SortState::with_direction(sort_key(&q.sort_key)?, direction(q.descending));
        Ok(query)
    }
}

/// Blank keys fall back to the default (name) order.
fn sort_key<K>(raw: &str) -> Result<K, GardenError>
where
    K: FromStr + Default,
    K::Err: Display,
{
    if raw.trim().is_empty() {
        Ok(K::default())
    } else {
        parse_arg(raw)
    }
}

fn direction(descending: bool) -> SortDirection {
    if descending {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    }
}

/// A recipe catalog shared with the host application.
///
/// Every call reads the snapshot current at call time; [`FfiCatalog::refresh`]
/// swaps in a new one without disturbing calls already running.
#[derive(uniffi::Object)]
pub struct FfiCatalog {
    handle: CatalogHandle,
    source: Option<DirectorySource>,
    matcher: CravingMatcher,
}

impl FfiCatalog {
    fn with_catalog(catalog: Catalog, source: Option<DirectorySource>) -> Self {
        FfiCatalog {
            handle: CatalogHandle::new(catalog),
            source,
            matcher: CravingMatcher::default(),
        }
    }

    fn recipes_to_ffi<'a>(
        recipes: impl IntoIterator<Item = &'a Recipe>,
        catalog: &Catalog,
    ) -> Vec<FfiRecipe> {
        recipes
            .into_iter()
            .map(|r| FfiRecipe::new(r, catalog))
            .collect()
    }

    fn require_recipe<'a>(catalog: &'a Catalog, id: &str) -> Result<&'a Recipe, GardenError> {
        catalog.recipe(id).ok_or_else(|| GardenError::NotFound {
            message: format!("Recipe not found: {id}"),
        })
    }
}

#[uniffi::export]
impl FfiCatalog {
    /// Loads the catalog from a directory of JSON data files.
    #[uniffi::constructor]
    pub fn open(data_dir: String) -> Result<Arc<Self>, GardenError> {
        let source = DirectorySource::new(data_dir);
        let catalog = Catalog::load(source.dir())?;
        Ok(Arc::new(Self::with_catalog(catalog, Some(source))))
    }

    /// Loads from a directory, or starts empty if that fails.
    #[uniffi::constructor]
    pub fn open_or_empty(data_dir: String) -> Arc<Self> {
        let source = DirectorySource::new(data_dir);
        let catalog = Catalog::load_or_empty(source.dir());
        Arc::new(Self::with_catalog(catalog, Some(source)))
    }

    /// Builds the catalog from the raw contents of the three data files.
    #[uniffi::constructor]
    pub fn from_json(
        ingredients_json: String,
        recipes_json: String,
        versions_json: String,
    ) -> Result<Arc<Self>, GardenError> {
        let catalog = Catalog::from_json(&ingredients_json, &recipes_json, &versions_json)?;
        Ok(Arc::new(Self::with_catalog(catalog, None)))
    }

    /// Reloads from the data directory this catalog was opened from.
    ///
    /// On failure the current data stays in place.
    pub fn refresh(&self) -> Result<(), GardenError> {
        match &self.source {
            Some(source) => {
                self.handle.refresh(source)?;
                Ok(())
            }
            None => Err(GardenError::InvalidArgument {
                message: "catalog was not opened from a directory".to_string(),
            }),
        }
    }

    /// Replaces the mood table used by [`FfiCatalog::crave`] with a YAML
    /// mapping of mood to keywords.
    pub fn with_moods_yaml(&self, yaml: String) -> Result<Arc<Self>, GardenError> {
        let thesaurus: MoodThesaurus =
            serde_yaml::from_str(&yaml).map_err(|e| GardenError::InvalidArgument {
                message: e.to_string(),
            })?;
        Ok(Arc::new(FfiCatalog {
            handle: CatalogHandle::new(self.handle.snapshot().as_ref().clone()),
            source: self.source.clone(),
            matcher: CravingMatcher::new(thesaurus),
        }))
    }

    pub fn is_empty(&self) -> bool {
        self.handle.snapshot().is_empty()
    }

    pub fn recipes(&self) -> Vec<FfiRecipe> {
        let catalog = self.handle.snapshot();
        Self::recipes_to_ffi(catalog.recipes(), &catalog)
    }

    pub fn ingredients(&self) -> Vec<FfiIngredient> {
        let catalog = self.handle.snapshot();
        catalog.ingredients().iter().map(FfiIngredient::from).collect()
    }

    pub fn recipe(&self, id: String) -> Option<FfiRecipe> {
        let catalog = self.handle.snapshot();
        catalog.recipe(&id).map(|r| FfiRecipe::new(r, &catalog))
    }

    pub fn ingredient(&self, id: String) -> Option<FfiIngredient> {
        let catalog = self.handle.snapshot();
        catalog.ingredient(&id).map(FfiIngredient::from)
    }

    /// Case-insensitive substring search over recipe names.
    pub fn search_recipes(&self, query: String) -> Vec<FfiRecipe> {
        let catalog = self.handle.snapshot();
        Self::recipes_to_ffi(search(catalog.recipes(), &query), &catalog)
    }

    /// Case-insensitive substring search over ingredient names and aliases.
    pub fn search_ingredients(&self, query: String) -> Vec<FfiIngredient> {
        let catalog = self.handle.snapshot();
        search(catalog.ingredients(), &query)
            .into_iter()
            .map(FfiIngredient::from)
            .collect()
    }

    /// Recipes matching a craving phrase. Returns immediately; any
    /// "searching" delay is up to the host UI.
    pub fn crave(&self, phrase: String) -> Vec<FfiRecipe> {
        let catalog = self.handle.snapshot();
        Self::recipes_to_ffi(self.matcher.matches(catalog.recipes(), &phrase), &catalog)
    }

    pub fn query_recipes(&self, query: FfiRecipeQuery) -> Result<Vec<FfiRecipe>, GardenError> {
        let query = RecipeQuery::try_from(query)?;
        let catalog = self.handle.snapshot();
        Ok(Self::recipes_to_ffi(query.run(&catalog), &catalog))
    }

    pub fn query_ingredients(
        &self,
        query: FfiIngredientQuery,
    ) -> Result<Vec<FfiIngredient>, GardenError> {
        let query = IngredientQuery::try_from(query)?;
        let catalog = self.handle.snapshot();
        Ok(query
            .run(&catalog)
            .into_iter()
            .map(FfiIngredient::from)
            .collect())
    }

    pub fn recipes_using_ingredient(&self, ingredient_id: String) -> Vec<FfiRecipe> {
        let catalog = self.handle.snapshot();
        Self::recipes_to_ffi(catalog.recipes_using_ingredient(&ingredient_id), &catalog)
    }

    pub fn related_recipes(&self, recipe_id: String, limit: u32) -> Result<Vec<FfiRecipe>, GardenError> {
        let catalog = self.handle.snapshot();
        let recipe = Self::require_recipe(&catalog, &recipe_id)?;
        Ok(Self::recipes_to_ffi(
            catalog.related_recipes(recipe, limit as usize),
            &catalog,
        ))
    }

    /// The variant to show for a recipe: the given rarity if present,
    /// otherwise the highest one.
    pub fn best_variant(
        &self,
        recipe_id: String,
        rarity: Option<String>,
    ) -> Result<Option<FfiVariant>, GardenError> {
        let target = rarity.as_deref().map(parse_arg::<Rarity>).transpose()?;
        let catalog = self.handle.snapshot();
        let recipe = Self::require_recipe(&catalog, &recipe_id)?;
        Ok(best_variant_internal(recipe, target).map(|v| FfiVariant::new(v, &catalog)))
    }

    /// Copyable ingredient list of a recipe's best variant for `rarity`.
    pub fn ingredient_list_text(
        &self,
        recipe_id: String,
        rarity: Option<String>,
    ) -> Result<Option<String>, GardenError> {
        let target = rarity.as_deref().map(parse_arg::<Rarity>).transpose()?;
        let catalog = self.handle.snapshot();
        let recipe = Self::require_recipe(&catalog, &recipe_id)?;
        Ok(best_variant_internal(recipe, target).map(|v| catalog.ingredient_list_text(v)))
    }

    pub fn versions(&self) -> Vec<FfiVersion> {
        self.handle
            .snapshot()
            .versions()
            .iter()
            .map(FfiVersion::from)
            .collect()
    }

    pub fn latest_version(&self) -> Option<FfiVersion> {
        self.handle.snapshot().latest_version().map(FfiVersion::from)
    }

    pub fn stats(&self) -> FfiStats {
        self.handle.snapshot().stats().into()
    }
}

/// Returns the library version.
#[uniffi::export]
pub fn library_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// All rarity names, lowest first.
#[uniffi::export]
pub fn rarity_names() -> Vec<String> {
    Rarity::ALL.iter().map(|r| r.to_string()).collect()
}
