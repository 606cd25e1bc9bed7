//! Static crafting catalog.
//!
//! Recipes turn gathered materials into equipment. The catalog is fixed in
//! code so balance changes go through version control, same as the tuning
//! constants.

use once_cell::sync::Lazy;
use smallvec::{SmallVec, smallvec};

use crate::inventory::{Inventory, MaterialId};

/// Material costs for one recipe. Small and fixed, so stack-allocated.
pub type RecipeCosts = SmallVec<[(MaterialId, u32); 4]>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub id: &'static str,
    pub name: &'static str,
    /// Equipment identifier appended to the inventory on success.
    pub output: &'static str,
    pub costs: RecipeCosts,
}

impl Recipe {
    /// Whether the inventory fully covers this recipe's material costs.
    #[must_use]
    pub fn affordable(&self, inventory: &Inventory) -> bool {
        self.costs
            .iter()
            .all(|&(id, qty)| inventory.material_count(id) >= qty)
    }
}

static CATALOG: Lazy<Vec<Recipe>> = Lazy::new(|| {
    vec![
        Recipe {
            id: "omamori",
            name: "Omamori Charm",
            output: "equip.omamori",
            costs: smallvec![(MaterialId::Herb, 3), (MaterialId::Essence, 1)],
        },
        Recipe {
            id: "prayer-beads",
            name: "Prayer Beads",
            output: "equip.prayer-beads",
            costs: smallvec![(MaterialId::Herb, 5), (MaterialId::Essence, 2)],
        },
        Recipe {
            id: "golden-ledger",
            name: "Golden Ledger",
            output: "equip.golden-ledger",
            costs: smallvec![(MaterialId::Herb, 10), (MaterialId::Essence, 5)],
        },
    ]
});

/// All craftable recipes in display order.
#[must_use]
pub fn catalog() -> &'static [Recipe] {
    &CATALOG
}

/// Look up a recipe by identifier.
#[must_use]
pub fn find_recipe(id: &str) -> Option<&'static Recipe> {
    CATALOG.iter().find(|recipe| recipe.id == id)
}
