use super::{PotColor, Rarity, UNRANKED};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Menu category of a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Breakfast,
    Main,
    Dessert,
    Snack,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Breakfast,
        Category::Main,
        Category::Dessert,
        Category::Snack,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Breakfast => "Breakfast",
            Category::Main => "Main",
            Category::Dessert => "Dessert",
            Category::Snack => "Snack",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown category: {s}"))
    }
}

/// One ingredient slot of a variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantIngredient {
    /// Id of the referenced [`Ingredient`](super::Ingredient)
    #[serde(alias = "ingredientId")]
    pub id: String,
    #[serde(alias = "quantity")]
    pub qty: i64,
    #[serde(
        default,
        rename = "orderSensitive",
        skip_serializing_if = "Option::is_none"
    )]
    pub order_sensitive: Option<bool>,
}

/// A concrete way of cooking a recipe, tied to one rarity tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeVariant {
    pub rarity: Rarity,
    #[serde(default)]
    pub ingredients: Vec<VariantIngredient>,
    #[serde(
        default,
        rename = "cookTimeMin",
        alias = "cookTimeMinutes",
        skip_serializing_if = "Option::is_none"
    )]
    pub cook_time_minutes: Option<f64>,
    #[serde(default, rename = "potColor", skip_serializing_if = "Option::is_none")]
    pub pot_color: Option<PotColor>,
    /// Ordering, restrictions and alternatives
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
}

impl RecipeVariant {
    /// Whether this variant uses the given ingredient at least once.
    pub fn uses(&self, ingredient_id: &str) -> bool {
        self.ingredients.iter().any(|i| i.id == ingredient_id)
    }

    /// Ingredient ids in slot order.
    pub fn ingredient_ids(&self) -> impl Iterator<Item = &str> {
        self.ingredients.iter().map(|i| i.id.as_str())
    }

    pub fn is_verified(&self) -> bool {
        self.verified.unwrap_or(false)
    }
}

/// A dish with one or more rarity variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub variants: Vec<RecipeVariant>,
    /// Wishlist tags this recipe satisfies
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cravings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Recipe {
    /// Highest rarity rank across all variants, or [`UNRANKED`] without variants.
    pub fn max_rarity_rank(&self) -> i32 {
        self.variants
            .iter()
            .map(|v| v.rarity.rank())
            .max()
            .unwrap_or(UNRANKED)
    }

    /// Fewest ingredient slots needed by any variant.
    ///
    /// A recipe without variants reports `usize::MAX` so that it sorts after
    /// every real recipe in ascending order.
    pub fn min_ingredient_count(&self) -> usize {
        self.variants
            .iter()
            .map(|v| v.ingredients.len())
            .min()
            .unwrap_or(usize::MAX)
    }

    /// Whether any variant uses the given ingredient.
    pub fn uses(&self, ingredient_id: &str) -> bool {
        self.variants.iter().any(|v| v.uses(ingredient_id))
    }

    /// Distinct ingredient ids used across all variants, first occurrence order.
    pub fn ingredient_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for id in self.variants.iter().flat_map(|v| v.ingredient_ids()) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }
}
