//! Case-insensitive substring search over names and aliases.

use crate::model::{Ingredient, Recipe};

/// Anything with a display name and optional synonyms.
pub trait Searchable {
    fn name(&self) -> &str;

    fn aliases(&self) -> &[String] {
        &[]
    }

    /// Whether the name or any alias contains `needle`.
    ///
    /// `needle` must already be lower-cased.
    fn matches_query(&self, needle: &str) -> bool {
        self.name().to_lowercase().contains(needle)
            || self
                .aliases()
                .iter()
                .any(|alias| alias.to_lowercase().contains(needle))
    }
}

impl Searchable for Ingredient {
    fn name(&self) -> &str {
        &self.name
    }

    fn aliases(&self) -> &[String] {
        &self.aliases
    }
}

impl Searchable for Recipe {
    fn name(&self) -> &str {
        &self.name
    }
}

impl<T: Searchable + ?Sized> Searchable for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn aliases(&self) -> &[String] {
        (**self).aliases()
    }
}

/// Keeps the items whose name or alias contains `query`, in input order.
///
/// The query is trimmed and compared case-insensitively. A blank query keeps
/// every item.
pub fn search<T: Searchable>(items: impl IntoIterator<Item = T>, query: &str) -> Vec<T> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items.into_iter().collect();
    }
    items
        .into_iter()
        .filter(|item| item.matches_query(&needle))
        .collect()
}
