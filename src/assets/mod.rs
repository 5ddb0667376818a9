//! Publishing data files and locating recipe images on disk.

use crate::catalog::DataLoadError;
use crate::model::Recipe;
use camino::{Utf8Path, Utf8PathBuf};
use glob::{glob, Pattern};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

/// Image extensions in lookup priority order.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Directory not found: {0}")]
    DirectoryNotFound(Utf8PathBuf),

    #[error("IO error on {path}: {source}")]
    IoError {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid glob pattern: {0}")]
    PatternError(#[from] glob::PatternError),

    #[error("Failed to read directory entry: {0}")]
    GlobError(#[from] glob::GlobError),

    #[error("Path is not valid UTF-8: {0:?}")]
    NonUtf8Path(PathBuf),

    #[error(transparent)]
    DataError(#[from] DataLoadError),

    #[error("Failed to serialize {path}: {source}")]
    JsonError {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Copies every `*.json` file in `data_dir` into `public_dir`.
///
/// `public_dir` is created if needed. Existing files are overwritten.
/// Returns the written paths, sorted.
pub fn sync_data(data_dir: &Utf8Path, public_dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>, SyncError> {
    if !data_dir.is_dir() {
        return Err(SyncError::DirectoryNotFound(data_dir.to_path_buf()));
    }

    std::fs::create_dir_all(public_dir).map_err(|source| SyncError::IoError {
        path: public_dir.to_path_buf(),
        source,
    })?;

    let pattern = format!("{}/*.json", Pattern::escape(data_dir.as_str()));
    let mut copied = Vec::new();
    for entry in glob(&pattern)? {
        let source_path = Utf8PathBuf::from_path_buf(entry?).map_err(SyncError::NonUtf8Path)?;
        if !source_path.is_file() {
            continue;
        }
        let Some(file_name) = source_path.file_name() else {
            continue;
        };
        let target = public_dir.join(file_name);
        std::fs::copy(&source_path, &target).map_err(|source| SyncError::IoError {
            path: target.clone(),
            source,
        })?;
        debug!("copied {source_path} -> {target}");
        copied.push(target);
    }

    copied.sort();
    info!("synced {} data file(s) to {public_dir}", copied.len());
    Ok(copied)
}

/// Image for a recipe.
///
/// A recipe's own `image` path wins. Otherwise `images_dir` is searched for
/// `<id>.<ext>` with the extensions in [`IMAGE_EXTENSIONS`] order.
pub fn find_recipe_image(recipe: &Recipe, images_dir: &Utf8Path) -> Option<Utf8PathBuf> {
    if let Some(image) = recipe.image.as_deref().filter(|s| !s.trim().is_empty()) {
        return Some(Utf8PathBuf::from(image));
    }

    IMAGE_EXTENSIONS.iter().find_map(|ext| {
        let image_path = images_dir.join(format!("{}.{ext}", recipe.id));
        if image_path.is_file() {
            Some(image_path)
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_catalog;
    use std::fs;
    use tempfile::TempDir;

    fn utf8_dir(temp_dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf()).unwrap()
    }

    #[test]
    fn test_sync_copies_only_json() {
        let temp_dir = TempDir::new().unwrap();
        let root = utf8_dir(&temp_dir);
        let data_dir = root.join("data");
        fs::create_dir_all(data_dir.join("nested")).unwrap();
        fs::write(data_dir.join("recipes.json"), "[]").unwrap();
        fs::write(data_dir.join("ingredients.json"), "[]").unwrap();
        fs::write(data_dir.join("notes.txt"), "skip me").unwrap();
        fs::write(data_dir.join("nested/versions.json"), "[]").unwrap();

        let public_dir = root.join("public/data");
        let copied = sync_data(&data_dir, &public_dir).unwrap();

        assert_eq!(
            copied,
            vec![
                public_dir.join("ingredients.json"),
                public_dir.join("recipes.json")
            ]
        );
        assert!(!public_dir.join("notes.txt").exists());
        assert!(!public_dir.join("versions.json").exists());
        assert_eq!(fs::read_to_string(public_dir.join("recipes.json")).unwrap(), "[]");
    }

    #[test]
    fn test_sync_overwrites_stale_copy() {
        let temp_dir = TempDir::new().unwrap();
        let root = utf8_dir(&temp_dir);
        let data_dir = root.join("data");
        let public_dir = root.join("public");
        fs::create_dir_all(&data_dir).unwrap();
        fs::create_dir_all(&public_dir).unwrap();
        fs::write(data_dir.join("versions.json"), "[{\"version\":\"2\"}]").unwrap();
        fs::write(public_dir.join("versions.json"), "[]").unwrap();

        sync_data(&data_dir, &public_dir).unwrap();
        assert_eq!(
            fs::read_to_string(public_dir.join("versions.json")).unwrap(),
            "[{\"version\":\"2\"}]"
        );
    }

    #[test]
    fn test_sync_missing_data_dir() {
        let temp_dir = TempDir::new().unwrap();
        let root = utf8_dir(&temp_dir);
        let err = sync_data(&root.join("nope"), &root.join("public")).unwrap_err();
        assert!(matches!(err, SyncError::DirectoryNotFound(_)));
    }

    #[test]
    fn test_find_recipe_image_by_id() {
        let temp_dir = TempDir::new().unwrap();
        let images_dir = utf8_dir(&temp_dir);
        let catalog = sample_catalog();
        let soup = catalog.recipe("soup").unwrap();

        assert!(find_recipe_image(soup, &images_dir).is_none());

        fs::write(images_dir.join("soup.png"), "").unwrap();
        assert_eq!(find_recipe_image(soup, &images_dir), Some(images_dir.join("soup.png")));

        // jpg takes priority over png
        fs::write(images_dir.join("soup.jpg"), "").unwrap();
        assert_eq!(find_recipe_image(soup, &images_dir), Some(images_dir.join("soup.jpg")));
    }

    #[test]
    fn test_declared_image_wins() {
        let temp_dir = TempDir::new().unwrap();
        let images_dir = utf8_dir(&temp_dir);
        fs::write(images_dir.join("soup.jpg"), "").unwrap();

        let mut soup = sample_catalog().recipe("soup").unwrap().clone();
        soup.image = Some("/images/recipes/tomato-soup.webp".to_string());

        assert_eq!(
            find_recipe_image(&soup, &images_dir),
            Some(Utf8PathBuf::from("/images/recipes/tomato-soup.webp"))
        );
    }
}
