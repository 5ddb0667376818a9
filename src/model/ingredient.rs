use super::Rarity;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Broad kind of a garden crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IngredientType {
    Fruit,
    Vegetable,
    Grain,
    Flower,
    Mushroom,
    Other,
}

impl IngredientType {
    pub const ALL: [IngredientType; 6] = [
        IngredientType::Fruit,
        IngredientType::Vegetable,
        IngredientType::Grain,
        IngredientType::Flower,
        IngredientType::Mushroom,
        IngredientType::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IngredientType::Fruit => "Fruit",
            IngredientType::Vegetable => "Vegetable",
            IngredientType::Grain => "Grain",
            IngredientType::Flower => "Flower",
            IngredientType::Mushroom => "Mushroom",
            IngredientType::Other => "Other",
        }
    }
}

impl fmt::Display for IngredientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for IngredientType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown ingredient type: {s}"))
    }
}

/// A crop that can be harvested and cooked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Kebab-case identifier, unique across the catalog
    pub id: String,
    /// Display name
    pub name: String,
    #[serde(rename = "type")]
    pub kind: IngredientType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<Rarity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reharvestable: Option<bool>,
    /// Source, event or limited-time notes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    /// Synonyms matched by text search
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

impl Ingredient {
    pub fn is_reharvestable(&self) -> bool {
        self.reharvestable.unwrap_or(false)
    }
}
