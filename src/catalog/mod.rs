//! Catalog loading.
//!
//! A [`Catalog`] is an immutable snapshot of the three data files
//! (`ingredients.json`, `recipes.json`, `versions.json`) together with the
//! lookup index derived from them. Nothing mutates a snapshot after it is
//! built; a refresh produces a new one (see [`CatalogHandle`]).

use crate::index::LookupIndex;
use crate::model::{DataVersion, Ingredient, Recipe};
use camino::{Utf8Path, Utf8PathBuf};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

mod handle;
mod model;

pub use handle::{CatalogHandle, CatalogSource, DirectorySource, RefreshError};
pub use model::CatalogStats;

pub const INGREDIENTS_FILE: &str = "ingredients.json";
pub const RECIPES_FILE: &str = "recipes.json";
pub const VERSIONS_FILE: &str = "versions.json";

/// Errors that can occur when loading catalog data.
#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("Data directory does not exist: {0}")]
    DirectoryNotFound(Utf8PathBuf),

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed {file}: {source}")]
    Malformed {
        file: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Immutable in-memory snapshot of the recipe data.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    ingredients: Vec<Ingredient>,
    recipes: Vec<Recipe>,
    versions: Vec<DataVersion>,
    index: LookupIndex,
}

impl Catalog {
    /// Builds a snapshot from already-parsed collections.
    pub fn new(
        ingredients: Vec<Ingredient>,
        recipes: Vec<Recipe>,
        versions: Vec<DataVersion>,
    ) -> Self {
        let index = LookupIndex::build(&ingredients, &recipes);
        Catalog {
            ingredients,
            recipes,
            versions,
            index,
        }
    }

    /// A catalog with no data, used when loading fails.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads the three data files from `dir`.
    ///
    /// `ingredients.json` and `recipes.json` are required. A missing
    /// `versions.json` yields an empty changelog.
    ///
    /// # Errors
    ///
    /// Returns `DataLoadError` if the directory or a required file is missing
    /// or if any file is not valid JSON for its record type.
    pub fn load(dir: &Utf8Path) -> Result<Self, DataLoadError> {
        if !dir.is_dir() {
            return Err(DataLoadError::DirectoryNotFound(dir.to_path_buf()));
        }

        let ingredients: Vec<Ingredient> = read_json(&dir.join(INGREDIENTS_FILE))?;
        let recipes: Vec<Recipe> = read_json(&dir.join(RECIPES_FILE))?;

        let versions_path = dir.join(VERSIONS_FILE);
        let versions: Vec<DataVersion> = if versions_path.exists() {
            read_json(&versions_path)?
        } else {
            debug!(path = %versions_path, "no changelog file, using empty version list");
            Vec::new()
        };

        debug!(
            ingredients = ingredients.len(),
            recipes = recipes.len(),
            versions = versions.len(),
            "loaded catalog from {dir}"
        );
        Ok(Self::new(ingredients, recipes, versions))
    }

    /// Parses a catalog from the raw contents of the three files.
    pub fn from_json(
        ingredients: &str,
        recipes: &str,
        versions: &str,
    ) -> Result<Self, DataLoadError> {
        Ok(Self::new(
            parse_json(INGREDIENTS_FILE, ingredients)?,
            parse_json(RECIPES_FILE, recipes)?,
            parse_json(VERSIONS_FILE, versions)?,
        ))
    }

    /// Loads from `dir`, falling back to an empty catalog on any error.
    ///
    /// The failure is logged; callers detect the fallback with
    /// [`Catalog::is_empty`] and show a "no data loaded" state.
    pub fn load_or_empty(dir: &Utf8Path) -> Self {
        match Self::load(dir) {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!("failed to load catalog, continuing with no data: {e}");
                Self::empty()
            }
        }
    }

    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn versions(&self) -> &[DataVersion] {
        &self.versions
    }

    pub(crate) fn index(&self) -> &LookupIndex {
        &self.index
    }

    /// True when neither ingredients nor recipes were loaded.
    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty() && self.recipes.is_empty()
    }

    /// The most recent changelog entry.
    ///
    /// This is the last entry in file order, not the highest version label.
    pub fn latest_version(&self) -> Option<&DataVersion> {
        self.versions.last()
    }

    /// Summary figures shown on the home and listing pages.
    pub fn stats(&self) -> CatalogStats {
        CatalogStats::collect(&self.ingredients, &self.recipes)
    }
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Utf8Path) -> Result<T, DataLoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| DataLoadError::IoError {
        path: path.to_path_buf(),
        source,
    })?;
    let file = path.file_name().unwrap_or(path.as_str());
    parse_json(file, &content)
}

pub(crate) fn parse_json<T: DeserializeOwned>(file: &str, content: &str) -> Result<T, DataLoadError> {
    serde_json::from_str(content).map_err(|source| DataLoadError::Malformed {
        file: file.to_string(),
        source,
    })
}
