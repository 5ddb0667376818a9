//! Data integrity checks and the missing-ingredient sync.
//!
//! The browsing code assumes references resolve and quantities are
//! positive; this module is where that is checked before data ships.
//!
//! Validation runs over the raw JSON records rather than the typed model, so
//! a record with a missing or mistyped field becomes a finding instead of
//! failing the whole load.

use crate::assets::SyncError;
use crate::catalog::{
    parse_json, read_json, Catalog, DataLoadError, INGREDIENTS_FILE, RECIPES_FILE, VERSIONS_FILE,
};
use crate::filter::compare_names;
use crate::model::{Category, Ingredient, IngredientType, Rarity, Recipe};
use camino::Utf8Path;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A single validation finding.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Finding {
    #[error("Duplicate ingredient id \"{0}\"")]
    DuplicateIngredientId(String),

    #[error("Ingredient at index {index} is missing required field \"{field}\"")]
    MissingIngredientField { index: usize, field: &'static str },

    #[error("Ingredient at index {index} has invalid {field} {value}")]
    InvalidIngredientField {
        index: usize,
        field: &'static str,
        value: String,
    },

    #[error("Duplicate recipe id \"{0}\"")]
    DuplicateRecipeId(String),

    #[error("Recipe at index {index} is missing required field \"{field}\"")]
    MissingRecipeField { index: usize, field: &'static str },

    #[error("Recipe \"{recipe}\" has invalid {field} {value}")]
    InvalidRecipeField {
        recipe: String,
        field: &'static str,
        value: String,
    },

    #[error("Recipe \"{recipe}\" references non-existent ingredient \"{ingredient}\"")]
    UnknownIngredient { recipe: String, ingredient: String },

    #[error("Recipe \"{recipe}\" has invalid quantity for ingredient \"{ingredient}\"")]
    InvalidQuantity { recipe: String, ingredient: String },

    #[error("Recipe \"{0}\" has no variants")]
    NoVariants(String),

    #[error("Recipe \"{recipe}\" variant {variant} has no ingredients")]
    EmptyVariant { recipe: String, variant: usize },

    #[error("{kind} id \"{id}\" is not kebab-case")]
    NotKebabCase { kind: &'static str, id: String },
}

impl Finding {
    pub fn severity(&self) -> Severity {
        match self {
            Finding::NoVariants(_) | Finding::EmptyVariant { .. } | Finding::NotKebabCase { .. } => {
                Severity::Warning
            }
            _ => Severity::Error,
        }
    }
}

/// Outcome of [`validate`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub findings: Vec<Finding>,
    pub ingredient_count: usize,
    pub recipe_count: usize,
    pub version_count: usize,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity() == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity() == Severity::Warning)
    }

    /// True when there are no errors. Warnings do not fail validation.
    pub fn is_ok(&self) -> bool {
        self.errors().next().is_none()
    }

    pub fn is_empty_data(&self) -> bool {
        self.ingredient_count == 0 && self.recipe_count == 0
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ingredients: {}", self.ingredient_count)?;
        writeln!(f, "Recipes: {}", self.recipe_count)?;
        writeln!(f, "Versions: {}", self.version_count)?;

        let warnings: Vec<_> = self.warnings().collect();
        if !warnings.is_empty() {
            writeln!(f, "\nWarnings:")?;
            for warning in warnings {
                writeln!(f, "  - {warning}")?;
            }
        }

        let errors: Vec<_> = self.errors().collect();
        if !errors.is_empty() {
            writeln!(f, "\nErrors:")?;
            for error in errors {
                writeln!(f, "  - {error}")?;
            }
        }
        Ok(())
    }
}

/// The three data files as untyped JSON records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCatalog {
    pub ingredients: Vec<Value>,
    pub recipes: Vec<Value>,
    pub versions: Vec<Value>,
}

impl RawCatalog {
    /// Reads the data files in `dir` without checking record shapes.
    ///
    /// A missing file counts as an empty list, so a fresh checkout with no
    /// data yet validates as empty.
    ///
    /// # Errors
    ///
    /// Returns `DataLoadError` if `dir` does not exist, a file cannot be
    /// read, or a file is not a JSON array.
    pub fn load(dir: &Utf8Path) -> Result<Self, DataLoadError> {
        if !dir.is_dir() {
            return Err(DataLoadError::DirectoryNotFound(dir.to_path_buf()));
        }
        Ok(RawCatalog {
            ingredients: read_records(&dir.join(INGREDIENTS_FILE))?,
            recipes: read_records(&dir.join(RECIPES_FILE))?,
            versions: read_records(&dir.join(VERSIONS_FILE))?,
        })
    }

    pub fn from_json(
        ingredients: &str,
        recipes: &str,
        versions: &str,
    ) -> Result<Self, DataLoadError> {
        Ok(RawCatalog {
            ingredients: parse_json(INGREDIENTS_FILE, ingredients)?,
            recipes: parse_json(RECIPES_FILE, recipes)?,
            versions: parse_json(VERSIONS_FILE, versions)?,
        })
    }

    /// Records of an already-typed catalog.
    pub fn from_catalog(catalog: &Catalog) -> Self {
        RawCatalog {
            ingredients: to_records(catalog.ingredients()),
            recipes: to_records(catalog.recipes()),
            versions: to_records(catalog.versions()),
        }
    }
}

fn read_records(path: &Utf8Path) -> Result<Vec<Value>, DataLoadError> {
    if path.exists() {
        read_json(path)
    } else {
        debug!("{path} not found, treating as empty");
        Ok(Vec::new())
    }
}

fn to_records<T: Serialize>(items: &[T]) -> Vec<Value> {
    items
        .iter()
        .filter_map(|item| serde_json::to_value(item).ok())
        .collect()
}

/// Trimmed, non-blank string under the first of `keys` present.
fn text<'a>(record: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|key| record.get(*key))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn list<'a>(record: &'a Value, key: &str) -> &'a [Value] {
    record
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn parses_as<T: DeserializeOwned>(value: &Value) -> bool {
    T::deserialize(value).is_ok()
}

fn quantity(slot: &Value) -> Option<i64> {
    slot.get("qty")
        .or_else(|| slot.get("quantity"))
        .and_then(Value::as_i64)
        .filter(|&qty| qty > 0)
}

fn kebab_case() -> &'static Regex {
    static KEBAB_CASE: OnceLock<Regex> = OnceLock::new();
    KEBAB_CASE.get_or_init(|| {
        Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("kebab-case pattern is valid")
    })
}

pub fn is_kebab_case(id: &str) -> bool {
    kebab_case().is_match(id)
}

/// Checks the raw records for the problems the browsing code assumes away.
pub fn validate(raw: &RawCatalog) -> ValidationReport {
    let mut findings = Vec::new();

    let mut ingredient_ids = HashSet::new();
    for (index, ingredient) in raw.ingredients.iter().enumerate() {
        match text(ingredient, &["id"]) {
            None => findings.push(Finding::MissingIngredientField { index, field: "id" }),
            Some(id) => {
                if !ingredient_ids.insert(id) {
                    findings.push(Finding::DuplicateIngredientId(id.to_string()));
                }
                if !is_kebab_case(id) {
                    findings.push(Finding::NotKebabCase {
                        kind: "Ingredient",
                        id: id.to_string(),
                    });
                }
            }
        }
        if text(ingredient, &["name"]).is_none() {
            findings.push(Finding::MissingIngredientField {
                index,
                field: "name",
            });
        }
        match ingredient.get("type") {
            None | Some(Value::Null) => findings.push(Finding::MissingIngredientField {
                index,
                field: "type",
            }),
            Some(kind) if !parses_as::<IngredientType>(kind) => {
                findings.push(Finding::InvalidIngredientField {
                    index,
                    field: "type",
                    value: kind.to_string(),
                });
            }
            Some(_) => {}
        }
        if let Some(rarity) = ingredient.get("rarity") {
            if !rarity.is_null() && !parses_as::<Rarity>(rarity) {
                findings.push(Finding::InvalidIngredientField {
                    index,
                    field: "rarity",
                    value: rarity.to_string(),
                });
            }
        }
    }

    let mut recipe_ids = HashSet::new();
    for (index, recipe) in raw.recipes.iter().enumerate() {
        let id = text(recipe, &["id"]);
        match id {
            None => findings.push(Finding::MissingRecipeField { index, field: "id" }),
            Some(id) => {
                if !recipe_ids.insert(id) {
                    findings.push(Finding::DuplicateRecipeId(id.to_string()));
                }
                if !is_kebab_case(id) {
                    findings.push(Finding::NotKebabCase {
                        kind: "Recipe",
                        id: id.to_string(),
                    });
                }
            }
        }
        let name = text(recipe, &["name"]);
        if name.is_none() {
            findings.push(Finding::MissingRecipeField {
                index,
                field: "name",
            });
        }
        let label = name
            .or(id)
            .map_or_else(|| format!("#{index}"), str::to_string);

        match recipe.get("category") {
            None | Some(Value::Null) => findings.push(Finding::MissingRecipeField {
                index,
                field: "category",
            }),
            Some(category) if !parses_as::<Category>(category) => {
                findings.push(Finding::InvalidRecipeField {
                    recipe: label.clone(),
                    field: "category",
                    value: category.to_string(),
                });
            }
            Some(_) => {}
        }

        let variants = list(recipe, "variants");
        if variants.is_empty() {
            findings.push(Finding::NoVariants(label.clone()));
        }
        for (variant_index, variant) in variants.iter().enumerate() {
            let rarity = variant.get("rarity").unwrap_or(&Value::Null);
            if !parses_as::<Rarity>(rarity) {
                findings.push(Finding::InvalidRecipeField {
                    recipe: label.clone(),
                    field: "rarity",
                    value: rarity.to_string(),
                });
            }

            let slots = list(variant, "ingredients");
            if slots.is_empty() {
                findings.push(Finding::EmptyVariant {
                    recipe: label.clone(),
                    variant: variant_index,
                });
            }
            for slot in slots {
                let ingredient = text(slot, &["id", "ingredientId"]).unwrap_or_default();
                if !ingredient_ids.contains(ingredient) {
                    findings.push(Finding::UnknownIngredient {
                        recipe: label.clone(),
                        ingredient: ingredient.to_string(),
                    });
                }
                if quantity(slot).is_none() {
                    findings.push(Finding::InvalidQuantity {
                        recipe: label.clone(),
                        ingredient: ingredient.to_string(),
                    });
                }
            }
        }
    }

    ValidationReport {
        findings,
        ingredient_count: raw.ingredients.len(),
        recipe_count: raw.recipes.len(),
        version_count: raw.versions.len(),
    }
}

/// Validates the data files in `dir`.
///
/// # Errors
///
/// Returns `DataLoadError` only when a file cannot be read or is not a JSON
/// array. Problems inside records are reported as findings.
pub fn validate_dir(dir: &Utf8Path) -> Result<ValidationReport, DataLoadError> {
    let raw = RawCatalog::load(dir)?;
    Ok(validate(&raw))
}

/// Validates a loaded catalog.
pub fn validate_catalog(catalog: &Catalog) -> ValidationReport {
    validate(&RawCatalog::from_catalog(catalog))
}

/// "bell-pepper" -> "Bell Pepper"
pub fn title_case_id(id: &str) -> String {
    id.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Placeholder ingredients for every id referenced by a recipe but absent
/// from `ingredients`, in first-reference order.
///
/// Placeholders are typed `Other` with `Common` rarity and need manual
/// touch-up.
pub fn missing_ingredients(ingredients: &[Ingredient], recipes: &[Recipe]) -> Vec<Ingredient> {
    let known: HashSet<&str> = ingredients.iter().map(|i| i.id.as_str()).collect();
    let mut seen = HashSet::new();

    recipes
        .iter()
        .flat_map(|recipe| &recipe.variants)
        .flat_map(|variant| variant.ingredient_ids())
        .filter(|id| !known.contains(id) && seen.insert(*id))
        .map(|id| Ingredient {
            id: id.to_string(),
            name: title_case_id(id),
            kind: IngredientType::Other,
            rarity: Some(Rarity::Common),
            reharvestable: None,
            notes: Vec::new(),
            aliases: Vec::new(),
        })
        .collect()
}

/// Adds placeholders for unknown ingredient references to the ingredients
/// file in `data_dir`, sorted by name.
///
/// The file is left untouched when nothing is missing. Returns the added
/// placeholders.
pub fn sync_missing_ingredients(data_dir: &Utf8Path) -> Result<Vec<Ingredient>, SyncError> {
    let catalog = Catalog::load(data_dir)?;
    let added = missing_ingredients(catalog.ingredients(), catalog.recipes());
    if added.is_empty() {
        info!("no missing ingredients in {data_dir}");
        return Ok(added);
    }

    let mut merged: Vec<Ingredient> = catalog.ingredients().to_vec();
    merged.extend(added.iter().cloned());
    merged.sort_by(|a, b| compare_names(&a.name, &b.name));

    let path = data_dir.join(INGREDIENTS_FILE);
    let json = serde_json::to_string_pretty(&merged).map_err(|source| SyncError::JsonError {
        path: path.clone(),
        source,
    })?;
    std::fs::write(&path, json).map_err(|source| SyncError::IoError {
        path: path.clone(),
        source,
    })?;

    for ingredient in &added {
        warn!(
            "added placeholder ingredient {} ({}), type and rarity need review",
            ingredient.name, ingredient.id
        );
    }
    Ok(added)
}
