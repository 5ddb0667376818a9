//! Site configuration.
//!
//! Read from a YAML file; every key is optional:
//!
//! ```yaml
//! data_dir: data
//! public_data_dir: public/data
//! images_dir: public/images/recipes
//! craving_delay_ms: 500
//! max_cook_time: 120
//! # replaces the built-in mood table
//! moods:
//!   cozy: [soup, warm]
//! # or adds to it
//! extra_moods:
//!   savory: [Main, pie]
//! ```
//!
//! Relative paths are resolved against the directory holding the file.

use crate::craving::MoodThesaurus;
use crate::filter::{cook_time_ceiling, MAX_COOK_TIME_SLIDER};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "garden-recipes.yaml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    IoError {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ParseError {
        path: Utf8PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Source data files (ingredients.json, recipes.json, versions.json)
    pub data_dir: Utf8PathBuf,
    /// Where `sync-data` publishes the JSON files
    pub public_data_dir: Utf8PathBuf,
    /// Recipe images named after recipe ids
    pub images_dir: Utf8PathBuf,
    /// Cosmetic delay before craving results are shown
    pub craving_delay_ms: u64,
    /// Cook-time slider maximum; a ceiling at or above it means "any"
    pub max_cook_time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moods: Option<MoodThesaurus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_moods: Option<MoodThesaurus>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            data_dir: Utf8PathBuf::from("data"),
            public_data_dir: Utf8PathBuf::from("public/data"),
            images_dir: Utf8PathBuf::from("public/images/recipes"),
            craving_delay_ms: 500,
            max_cook_time: MAX_COOK_TIME_SLIDER,
            moods: None,
            extra_moods: None,
        }
    }
}

impl SiteConfig {
    /// Reads a config file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or is not valid YAML.
    pub fn from_path(path: &Utf8Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_yaml(&content).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Reads `path` if it exists, otherwise returns the defaults.
    pub fn load_or_default(path: &Utf8Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_path(path)
        } else {
            debug!("no config at {path}, using defaults");
            Ok(Self::default())
        }
    }

    fn resolve_paths(&mut self, base: &Utf8Path) {
        for dir in [
            &mut self.data_dir,
            &mut self.public_data_dir,
            &mut self.images_dir,
        ] {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
    }

    pub fn craving_delay(&self) -> Duration {
        Duration::from_millis(self.craving_delay_ms)
    }

    /// The mood table: `moods` if set, else the built-in table, plus
    /// `extra_moods`.
    pub fn thesaurus(&self) -> MoodThesaurus {
        let mut thesaurus = self.moods.clone().unwrap_or_default();
        if let Some(extra) = &self.extra_moods {
            thesaurus.extend(extra.clone());
        }
        thesaurus
    }

    /// Turns a slider value into a filter ceiling; the slider maximum means
    /// no ceiling.
    pub fn cook_time_ceiling(&self, minutes: f64) -> Option<f64> {
        cook_time_ceiling(minutes, self.max_cook_time)
    }
}
