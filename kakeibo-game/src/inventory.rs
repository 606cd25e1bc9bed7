//! Player inventory: fungible currencies, crafting materials, equipment,
//! and the collection log.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Closed set of crafting material identifiers.
///
/// Materials are a fixed enumeration rather than free-form strings so that
/// recipe costs stay exhaustiveness-checked at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialId {
    /// Gathered automatically at day end.
    Herb,
    /// Produced by purification.
    Essence,
}

impl MaterialId {
    pub const ALL: [Self; 2] = [Self::Herb, Self::Essence];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Herb => "herb",
            Self::Essence => "essence",
        }
    }
}

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaterialId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "herb" => Ok(Self::Herb),
            "essence" => Ok(Self::Essence),
            _ => Err(()),
        }
    }
}

/// Category of a collection-log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionCategory {
    Discovery,
    Badge,
}

/// A single acquired achievement or discovery, stamped at acquisition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionEntry {
    pub id: String,
    pub category: CollectionCategory,
    #[serde(default)]
    pub acquired_on: Option<NaiveDate>,
}

/// Player inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Inventory {
    #[serde(default)]
    pub residue: u32,
    #[serde(default)]
    pub purifying_salt: u32,
    #[serde(default, deserialize_with = "lenient_materials")]
    pub materials: BTreeMap<MaterialId, u32>,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub collection: Vec<CollectionEntry>,
}

impl Inventory {
    #[must_use]
    pub fn material_count(&self, id: MaterialId) -> u32 {
        self.materials.get(&id).copied().unwrap_or(0)
    }

    pub fn add_material(&mut self, id: MaterialId, qty: u32) {
        let count = self.materials.entry(id).or_insert(0);
        *count = count.saturating_add(qty);
    }

    /// Debit a material, saturating at zero. Callers check coverage first.
    pub fn remove_material(&mut self, id: MaterialId, qty: u32) {
        if let Some(count) = self.materials.get_mut(&id) {
            *count = count.saturating_sub(qty);
        }
    }

    #[must_use]
    pub fn has_collected(&self, id: &str) -> bool {
        self.collection.iter().any(|entry| entry.id == id)
    }

    /// Append a collection entry, deduplicated by identifier.
    /// Returns whether the entry was actually added.
    pub fn record_collection(
        &mut self,
        id: &str,
        category: CollectionCategory,
        acquired_on: Option<NaiveDate>,
    ) -> bool {
        if self.has_collected(id) {
            return false;
        }
        self.collection.push(CollectionEntry {
            id: id.to_string(),
            category,
            acquired_on,
        });
        true
    }
}

/// Deserialize the material map leniently: unknown identifiers and
/// non-numeric counts from older saves are skipped rather than failing the
/// whole load.
fn lenient_materials<'de, D>(deserializer: D) -> Result<BTreeMap<MaterialId, u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: BTreeMap<String, serde_json::Value> = BTreeMap::deserialize(deserializer)?;
    let mut out = BTreeMap::new();
    for (key, value) in raw {
        let Ok(id) = key.parse::<MaterialId>() else {
            continue;
        };
        if let Some(count) = value.as_u64() {
            out.insert(id, u32::try_from(count).unwrap_or(u32::MAX));
        }
    }
    Ok(out)
}
