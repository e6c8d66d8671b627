//! YAML scenario files: a catalog plus an initial world layout.
//!
//! ```yaml
//! catalog:
//!   items: [{ name: oak_log }, { name: oak_planks }]
//!   blocks: [{ name: oak_log, drops: oak_log }]
//!   recipes:
//!     - { output: oak_planks, count: 4, ingredients: [{ item: oak_log, count: 1 }] }
//! world:
//!   agent: { position: [0, 1, 0], inventory: { oak_log: 1 } }
//!   ground: { block: grass_block, y: 0, from: -8, to: 8 }
//!   blocks:
//!     - { block: oak_log, at: [[3, 1, 0], [4, 1, 2]] }
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smithy_types::Position;
use tracing::info;

use crate::contracts::Catalog;
use crate::error::WorldError;
use crate::recipe_book::{CatalogData, RecipeBook};
use crate::sim::{SimWorld, WorldRules};

/// A complete, loadable sandbox description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Items, blocks, recipes, and smelting.
    pub catalog: CatalogData,
    /// Initial world state.
    #[serde(default)]
    pub world: WorldLayout,
}

/// Initial world state of a scenario.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldLayout {
    /// Physical rules.
    #[serde(default)]
    pub rules: WorldRules,
    /// Agent spawn point and starting inventory.
    #[serde(default)]
    pub agent: AgentSpawn,
    /// Optional flat ground layer.
    #[serde(default)]
    pub ground: Option<GroundLayer>,
    /// Individually placed blocks.
    #[serde(default)]
    pub blocks: Vec<BlockPlacement>,
}

/// Where the agent starts and what it carries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSpawn {
    /// Spawn position.
    #[serde(default)]
    pub position: Position,
    /// Starting inventory by item name.
    #[serde(default)]
    pub inventory: BTreeMap<String, u32>,
}

/// A square layer of one block type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundLayer {
    /// Block name.
    pub block: String,
    /// Height of the layer.
    #[serde(default)]
    pub y: i32,
    /// Lower x/z bound, inclusive.
    pub from: i32,
    /// Upper x/z bound, inclusive.
    pub to: i32,
}

/// One block type at a list of positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockPlacement {
    /// Block name.
    pub block: String,
    /// Positions to fill.
    pub at: Vec<Position>,
}

impl Scenario {
    /// Load a scenario from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, WorldError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse a scenario from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, WorldError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Validate the catalog and materialize the world.
    pub fn build(&self) -> Result<(Arc<RecipeBook>, SimWorld), WorldError> {
        let catalog = Arc::new(RecipeBook::from_data(&self.catalog)?);
        let layout = &self.world;
        let mut world = SimWorld::new(Arc::clone(&catalog), layout.rules.clone());

        if let Some(ground) = &layout.ground {
            let block = catalog
                .block_id(&ground.block)
                .ok_or_else(|| WorldError::UnknownBlock(ground.block.clone()))?;
            world.fill_layer(block, ground.y, ground.from, ground.to);
        }
        for placement in &layout.blocks {
            for pos in &placement.at {
                world.set_block_named(*pos, &placement.block)?;
            }
        }
        for (name, count) in &layout.agent.inventory {
            world.give_named(name, *count)?;
        }
        world.set_position(layout.agent.position);

        info!(
            items = catalog.item_count(),
            placements = layout.blocks.len(),
            spawn = %layout.agent.position,
            "Scenario loaded"
        );
        Ok((catalog, world))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::contracts::{Inventory, WorldProbe};

    const SMALL: &str = r"
catalog:
  items:
    - name: oak_log
    - name: oak_planks
  blocks:
    - name: grass_block
    - name: oak_log
      drops: oak_log
  recipes:
    - output: oak_planks
      count: 4
      ingredients:
        - { item: oak_log, count: 1 }
world:
  agent:
    position: [0, 1, 0]
    inventory:
      oak_planks: 2
  ground: { block: grass_block, y: 0, from: -2, to: 2 }
  blocks:
    - block: oak_log
      at: [[2, 1, 0], [-2, 1, 1]]
";

    #[test]
    fn builds_world_from_yaml() {
        let scenario = Scenario::parse(SMALL).unwrap();
        let (catalog, world) = scenario.build().unwrap();
        assert_eq!(world.position(), Position::new(0, 1, 0));
        assert_eq!(world.held_named("oak_planks"), 2);
        assert_eq!(world.block_count_named("grass_block"), 25);
        let log = catalog.block_id("oak_log").unwrap();
        assert_eq!(world.find_all(log, 64, 10).len(), 2);
        let planks = catalog.item_id("oak_planks").unwrap();
        assert!(world.find(planks).is_some());
        assert_eq!(world.rules(), &WorldRules::default());
    }

    #[test]
    fn unknown_names_fail_the_build() {
        let yaml = SMALL.replace("block: oak_log\n      at", "block: birch_log\n      at");
        let err = Scenario::parse(&yaml).unwrap().build().unwrap_err();
        assert!(matches!(err, WorldError::UnknownBlock(name) if name == "birch_log"));
    }

    #[test]
    fn malformed_yaml_is_a_yaml_error() {
        let err = Scenario::parse("catalog: [").unwrap_err();
        assert!(matches!(err, WorldError::Yaml { .. }));
    }
}
