//! Shared fixtures for unit tests.

use crate::catalog::{Catalog, INGREDIENTS_FILE, RECIPES_FILE, VERSIONS_FILE};
use camino::Utf8PathBuf;
use indoc::indoc;
use std::fs;
use tempfile::TempDir;

pub(crate) const INGREDIENTS_JSON: &str = indoc! {r#"
    [
      {"id": "tomato", "name": "Tomato", "type": "Vegetable", "rarity": "Common", "aliases": ["love apple"]},
      {"id": "carrot", "name": "Carrot", "type": "Vegetable", "rarity": "VeryCommon", "reharvestable": true},
      {"id": "strawberry", "name": "Strawberry", "type": "Fruit", "rarity": "Rare", "aliases": ["berry"]},
      {"id": "mushroom", "name": "mushroom", "type": "Mushroom"}
    ]"#};

pub(crate) const RECIPES_JSON: &str = indoc! {r#"
    [
      {
        "id": "soup",
        "name": "Tomato Soup",
        "category": "Main",
        "variants": [
          {"rarity": "Common", "ingredients": [{"id": "tomato", "qty": 2}], "cookTimeMin": 5}
        ],
        "cravings": ["warm", "savory"],
        "description": "A warm bowl of comfort"
      },
      {
        "id": "donut",
        "name": "Donut",
        "category": "Dessert",
        "variants": [
          {"rarity": "Uncommon", "ingredients": [{"id": "strawberry", "qty": 1}, {"id": "carrot", "qty": 1}]},
          {"rarity": "Legendary", "ingredients": [{"id": "strawberry", "qty": 2}, {"id": "tomato", "qty": 1}, {"id": "carrot", "qty": 1}], "cookTimeMin": 30}
        ]
      },
      {
        "id": "salad",
        "name": "Garden Salad",
        "category": "Snack",
        "variants": [
          {"rarity": "VeryCommon", "ingredients": [{"id": "carrot", "qty": 1}, {"id": "tomato", "qty": 1}], "cookTimeMin": 45, "verified": true},
          {"rarity": "Rare", "ingredients": [{"id": "carrot", "qty": 1}, {"id": "tomato", "qty": 1}, {"id": "mushroom", "qty": 1}], "cookTimeMin": 50}
        ],
        "description": "Crisp and cold"
      },
      {
        "id": "pancake",
        "name": "Pancake",
        "category": "Breakfast",
        "variants": [
          {"rarity": "Common", "ingredients": [{"id": "strawberry", "qty": 1}], "cookTimeMin": 60}
        ],
        "cravings": ["fluffy"],
        "description": "A tall morning stack"
      }
    ]"#};

pub(crate) const VERSIONS_JSON: &str = indoc! {r#"
    [
      {"version": "1.0.0", "date": "2025-08-01", "notes": ["Initial data"]},
      {"version": "1.1.0", "date": "2025-08-05", "notes": ["Added donut", "Fixed salad"]}
    ]"#};

pub(crate) fn sample_catalog() -> Catalog {
    Catalog::from_json(INGREDIENTS_JSON, RECIPES_JSON, VERSIONS_JSON).unwrap()
}

/// Writes the data files into `temp_dir` and returns its path.
pub(crate) fn write_data_dir(
    temp_dir: &TempDir,
    ingredients: &str,
    recipes: &str,
    versions: Option<&str>,
) -> Utf8PathBuf {
    let dir = Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf()).unwrap();
    fs::write(dir.join(INGREDIENTS_FILE), ingredients).unwrap();
    fs::write(dir.join(RECIPES_FILE), recipes).unwrap();
    if let Some(versions) = versions {
        fs::write(dir.join(VERSIONS_FILE), versions).unwrap();
    }
    dir
}

/// Ids of the given items, in order.
pub(crate) fn ids<'a, T: HasId + 'a>(items: impl IntoIterator<Item = &'a T>) -> Vec<String> {
    items.into_iter().map(|i| i.item_id().to_string()).collect()
}

pub(crate) trait HasId {
    fn item_id(&self) -> &str;
}

impl HasId for crate::model::Recipe {
    fn item_id(&self) -> &str {
        &self.id
    }
}

impl HasId for crate::model::Ingredient {
    fn item_id(&self) -> &str {
        &self.id
    }
}

impl<T: HasId + ?Sized> HasId for &T {
    fn item_id(&self) -> &str {
        (**self).item_id()
    }
}
