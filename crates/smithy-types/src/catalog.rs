//! Catalog definitions: items, blocks, and recipes.
//!
//! These are the immutable records a recipe catalog hands out. The core never
//! constructs or caches them; it reads them from the catalog on every query.

use serde::{Deserialize, Serialize};

use crate::ids::{BlockId, ItemId};

/// An item type known to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDef {
    /// Catalog identifier.
    pub id: ItemId,
    /// Display name (e.g. `oak_planks`). Not guaranteed unique across data versions.
    pub name: String,
    /// Block placed in the world when this item is used on a face, if any.
    pub places: Option<BlockId>,
    /// Number of items one unit of this item smelts when burnt as fuel.
    pub fuel_value: Option<u32>,
}

/// A block type that can exist in the world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDef {
    /// Catalog identifier.
    pub id: BlockId,
    /// Display name (e.g. `iron_ore`).
    pub name: String,
    /// Item dropped when the block is dug with an acceptable tool.
    pub drops: Option<ItemId>,
    /// Tools able to harvest this block. Empty means bare hands work.
    pub harvest_tools: Vec<ItemId>,
}

impl BlockDef {
    /// Whether digging this block needs one of [`harvest_tools`](Self::harvest_tools).
    pub fn needs_tool(&self) -> bool {
        !self.harvest_tools.is_empty()
    }
}

/// One entry of a recipe's ingredient list.
///
/// Counts are signed because catalogs express recipes as inventory deltas.
/// Only positive counts are consumed ingredients; zero or negative entries are
/// by-products and are never resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// The ingredient item.
    pub item: ItemId,
    /// Per-batch delta.
    pub count: i32,
}

impl Ingredient {
    /// The per-batch amount consumed, or `None` for by-product entries.
    pub fn consumed(self) -> Option<u32> {
        if self.count > 0 {
            u32::try_from(self.count).ok()
        } else {
            None
        }
    }
}

/// A declarative transformation of ingredients into `output_count` items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// The item this recipe produces.
    pub produced: ItemId,
    /// Items produced per batch. Always greater than zero.
    pub output_count: u32,
    /// Ingredient deltas in declared order.
    pub ingredients: Vec<Ingredient>,
    /// Whether a placed workstation must be within reach to run the recipe.
    pub requires_workstation: bool,
}

impl Recipe {
    /// Consumed ingredients in declared order, by-products skipped.
    pub fn consumed(&self) -> impl Iterator<Item = (ItemId, u32)> + '_ {
        self.ingredients
            .iter()
            .filter_map(|ing| ing.consumed().map(|count| (ing.item, count)))
    }
}

/// A held inventory stack the executor can act on (equip, place).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemHandle {
    /// The item held in the slot.
    pub item: ItemId,
    /// Inventory slot index.
    pub slot: u32,
}

/// Handle for a long-running world operation such as smelting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OperationHandle(pub u64);

impl core::fmt::Display for OperationHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "op#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn by_products_are_not_consumed() {
        let recipe = Recipe {
            produced: ItemId(9),
            output_count: 1,
            ingredients: vec![
                Ingredient { item: ItemId(1), count: 3 },
                Ingredient { item: ItemId(2), count: 0 },
                Ingredient { item: ItemId(3), count: -1 },
                Ingredient { item: ItemId(4), count: 2 },
            ],
            requires_workstation: true,
        };
        let consumed: Vec<_> = recipe.consumed().collect();
        assert_eq!(consumed, vec![(ItemId(1), 3), (ItemId(4), 2)]);
    }

    #[test]
    fn block_tool_requirement() {
        let mut block = BlockDef {
            id: BlockId(0),
            name: String::from("stone"),
            drops: Some(ItemId(1)),
            harvest_tools: Vec::new(),
        };
        assert!(!block.needs_tool());
        block.harvest_tools.push(ItemId(2));
        assert!(block.needs_tool());
    }
}
