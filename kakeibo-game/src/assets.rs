//! Asset counters and their display levels.
//!
//! Each named asset accumulates from gameplay (defending, no-spend days,
//! fixed costs, purification, residue farming and crafting) and derives a
//! display level from fixed thresholds.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::ASSET_LEVEL_THRESHOLDS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Fortress,
    Airfield,
    Mansion,
    Tower,
    Warehouse,
}

impl AssetKind {
    pub const ALL: [Self; 5] = [
        Self::Fortress,
        Self::Airfield,
        Self::Mansion,
        Self::Tower,
        Self::Warehouse,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fortress => "fortress",
            Self::Airfield => "airfield",
            Self::Mansion => "mansion",
            Self::Tower => "tower",
            Self::Warehouse => "warehouse",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Five independent accumulating counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Assets {
    #[serde(default)]
    pub fortress: u32,
    #[serde(default)]
    pub airfield: u32,
    #[serde(default)]
    pub mansion: u32,
    #[serde(default)]
    pub tower: u32,
    #[serde(default)]
    pub warehouse: u32,
}

impl Assets {
    #[must_use]
    pub const fn count(&self, kind: AssetKind) -> u32 {
        match kind {
            AssetKind::Fortress => self.fortress,
            AssetKind::Airfield => self.airfield,
            AssetKind::Mansion => self.mansion,
            AssetKind::Tower => self.tower,
            AssetKind::Warehouse => self.warehouse,
        }
    }

    pub fn add(&mut self, kind: AssetKind, qty: u32) {
        let slot = match kind {
            AssetKind::Fortress => &mut self.fortress,
            AssetKind::Airfield => &mut self.airfield,
            AssetKind::Mansion => &mut self.mansion,
            AssetKind::Tower => &mut self.tower,
            AssetKind::Warehouse => &mut self.warehouse,
        };
        *slot = slot.saturating_add(qty);
    }

    /// Display level for an asset: 0 below the first threshold, up to 3.
    #[must_use]
    pub fn level(&self, kind: AssetKind) -> u8 {
        level_for(self.count(kind))
    }
}

pub(crate) fn level_for(count: u32) -> u8 {
    let mut level = 0;
    for threshold in ASSET_LEVEL_THRESHOLDS {
        if count >= threshold {
            level += 1;
        }
    }
    level
}
