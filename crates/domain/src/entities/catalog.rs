//! Catalog entities - purchasable subjects a character can ask to buy
//!
//! The catalog holds two kinds of subject:
//!
//! - **Equipment** - unique per character; owning it twice is a no-op
//! - **Items** - stackable consumables; each purchase adds one to the stack

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{DomainError, EquipmentId, ItemId};

/// Which catalog table a subject lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    Equipment,
    Item,
}

impl SubjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectKind::Equipment => "equipment",
            SubjectKind::Item => "item",
        }
    }
}

impl fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subject rarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Mythic,
}

impl Rarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
            Rarity::Mythic => "mythic",
        }
    }

    /// Legendary and mythic subjects make any decision risky.
    pub fn is_exotic(&self) -> bool {
        matches!(self, Rarity::Legendary | Rarity::Mythic)
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Rarity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "common" => Ok(Rarity::Common),
            "uncommon" => Ok(Rarity::Uncommon),
            "rare" => Ok(Rarity::Rare),
            "epic" => Ok(Rarity::Epic),
            "legendary" => Ok(Rarity::Legendary),
            "mythic" => Ok(Rarity::Mythic),
            other => Err(DomainError::parse(format!("Unknown rarity: {}", other))),
        }
    }
}

/// Typed reference into one of the two catalog tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum SubjectRef {
    Equipment(EquipmentId),
    Item(ItemId),
}

impl SubjectRef {
    pub fn kind(&self) -> SubjectKind {
        match self {
            SubjectRef::Equipment(_) => SubjectKind::Equipment,
            SubjectRef::Item(_) => SubjectKind::Item,
        }
    }
}

/// A purchasable catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSubject {
    pub reference: SubjectRef,
    pub name: String,
    /// Shop price in whole currency units
    pub price: i64,
    pub rarity: Rarity,
}

/// Inclusive price bounds for a catalog lookup.
///
/// A window whose `min` exceeds its `max` is empty and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceWindow {
    pub min: i64,
    pub max: i64,
}

impl PriceWindow {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, price: i64) -> bool {
        price >= self.min && price <= self.max
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }
}
