use super::{Catalog, DataLoadError};
use camino::{Utf8Path, Utf8PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum RefreshError {
    #[error("Catalog refresh failed: {0}")]
    RefreshFailed(#[from] DataLoadError),
}

/// Somewhere a fresh catalog can be loaded from.
pub trait CatalogSource {
    fn load(&self) -> Result<Catalog, DataLoadError>;

    /// Human-readable origin, used in logs.
    fn describe(&self) -> String;
}

/// Loads catalogs from a directory of JSON files.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: Utf8PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<Utf8PathBuf>) -> Self {
        DirectorySource { dir: dir.into() }
    }

    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }
}

impl CatalogSource for DirectorySource {
    fn load(&self) -> Result<Catalog, DataLoadError> {
        Catalog::load(&self.dir)
    }

    fn describe(&self) -> String {
        self.dir.to_string()
    }
}

/// Shared pointer to the current catalog snapshot.
///
/// Readers take an `Arc<Catalog>` and keep using it for as long as they
/// like; a refresh swaps the whole snapshot and never touches one that is
/// already handed out.
#[derive(Debug, Default)]
pub struct CatalogHandle {
    current: RwLock<Arc<Catalog>>,
}

impl CatalogHandle {
    pub fn new(catalog: Catalog) -> Self {
        CatalogHandle {
            current: RwLock::new(Arc::new(catalog)),
        }
    }

    /// The snapshot in effect right now.
    pub fn snapshot(&self) -> Arc<Catalog> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the snapshot outright.
    pub fn replace(&self, catalog: Catalog) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(catalog);
    }

    /// Best-effort reload from `source`.
    ///
    /// On success the new snapshot is swapped in as a whole. On failure the
    /// previous snapshot stays in place, the failure is logged, and the error
    /// is returned for callers that want to inspect it.
    pub fn refresh(&self, source: &dyn CatalogSource) -> Result<Arc<Catalog>, RefreshError> {
        match source.load() {
            Ok(catalog) => {
                info!(
                    recipes = catalog.recipes().len(),
                    ingredients = catalog.ingredients().len(),
                    "refreshed catalog from {}",
                    source.describe()
                );
                let catalog = Arc::new(catalog);
                *self.current.write().unwrap_or_else(PoisonError::into_inner) = catalog.clone();
                Ok(catalog)
            }
            Err(e) => {
                warn!(
                    "refresh from {} failed, keeping previous data: {e}",
                    source.describe()
                );
                Err(RefreshError::RefreshFailed(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_catalog, write_data_dir, INGREDIENTS_JSON, RECIPES_JSON};
    use tempfile::TempDir;

    struct FailingSource;

    impl CatalogSource for FailingSource {
        fn load(&self) -> Result<Catalog, DataLoadError> {
            Err(DataLoadError::DirectoryNotFound("/gone".into()))
        }

        fn describe(&self) -> String {
            "nowhere".to_string()
        }
    }

    #[test]
    fn test_refresh_swaps_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let dir = write_data_dir(&temp_dir, INGREDIENTS_JSON, RECIPES_JSON, None);

        let handle = CatalogHandle::new(Catalog::empty());
        let before = handle.snapshot();
        assert!(before.is_empty());

        handle.refresh(&DirectorySource::new(dir)).unwrap();

        let after = handle.snapshot();
        assert_eq!(after.recipes().len(), 4);
        // Snapshots handed out earlier are untouched
        assert!(before.is_empty());
    }

    #[test]
    fn test_failed_refresh_keeps_previous_snapshot() {
        let handle = CatalogHandle::new(sample_catalog());

        let result = handle.refresh(&FailingSource);
        assert!(matches!(result, Err(RefreshError::RefreshFailed(_))));
        assert_eq!(handle.snapshot().recipes().len(), 4);
    }

    #[test]
    fn test_replace() {
        let handle = CatalogHandle::default();
        assert!(handle.snapshot().is_empty());
        handle.replace(sample_catalog());
        assert!(!handle.snapshot().is_empty());
    }
}
