use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rarity tier of an ingredient or recipe variant.
///
/// The declaration order is the game's rarity order and is load-bearing:
/// comparisons, "best variant" selection and rarity sorting all go through
/// [`Rarity::rank`], which is the position in [`Rarity::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    VeryCommon,
    Common,
    Uncommon,
    Rare,
    Legendary,
    Mythical,
    Divine,
    Prismatic,
    Transcendent,
}

impl Rarity {
    /// All tiers, lowest first.
    pub const ALL: [Rarity; 9] = [
        Rarity::VeryCommon,
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Legendary,
        Rarity::Mythical,
        Rarity::Divine,
        Rarity::Prismatic,
        Rarity::Transcendent,
    ];

    /// Position of this tier in [`Rarity::ALL`].
    pub fn rank(self) -> i32 {
        Self::ALL
            .iter()
            .position(|r| *r == self)
            .map(|p| p as i32)
            .unwrap_or(-1)
    }

    /// Rank used by sorting when an item may have no rarity at all.
    ///
    /// Items without a rarity sort below every real tier.
    pub fn rank_or_unranked(rarity: Option<Rarity>) -> i32 {
        rarity.map(Rarity::rank).unwrap_or(UNRANKED)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rarity::VeryCommon => "VeryCommon",
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Legendary => "Legendary",
            Rarity::Mythical => "Mythical",
            Rarity::Divine => "Divine",
            Rarity::Prismatic => "Prismatic",
            Rarity::Transcendent => "Transcendent",
        }
    }
}

/// Sentinel rank for items with no rarity.
pub const UNRANKED: i32 = -1;

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown rarity: {0}")]
pub struct UnknownRarity(pub String);

impl FromStr for Rarity {
    type Err = UnknownRarity;

    /// Accepts the canonical names case-insensitively, with or without
    /// separators (`very-common`, `Very Common`, `verycommon`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|r| r.as_str().to_lowercase() == wanted)
            .ok_or_else(|| UnknownRarity(s.to_string()))
    }
}

/// Colour of the cooking pot a variant requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PotColor {
    Default,
    Red,
    Green,
    Blue,
    Gold,
    Prismatic,
}

impl PotColor {
    pub fn as_str(self) -> &'static str {
        match self {
            PotColor::Default => "Default",
            PotColor::Red => "Red",
            PotColor::Green => "Green",
            PotColor::Blue => "Blue",
            PotColor::Gold => "Gold",
            PotColor::Prismatic => "Prismatic",
        }
    }
}

impl fmt::Display for PotColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
