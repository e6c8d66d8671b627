//! In-memory voxel sandbox implementing the agent contracts.
//!
//! [`SimWorld`] models exactly what the core can observe and do: a sparse map
//! of solid blocks, one agent position, an inventory, the equipped item, and a
//! simulated clock driving furnace jobs. Movement teleports; there is no
//! gravity, pathing, or collision beyond the agent's own two cells.
//!
//! Every confirmed action is appended to an [`ActionRecord`] log so callers can
//! assert on relative ordering.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use smithy_types::{BlockId, FaceVector, ItemHandle, ItemId, OperationHandle, Position, Recipe};
use tracing::debug;

use crate::contracts::{Catalog, Executor, Inventory, WorldProbe};
use crate::error::{ActionError, WorldError};
use crate::recipe_book::RecipeBook;

/// Physical rules of the sandbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldRules {
    /// Maximum distance (in blocks) at which the agent can dig, place or use.
    #[serde(default = "default_reach")]
    pub reach: u32,
    /// Block name that counts as a crafting workstation.
    #[serde(default = "default_workstation")]
    pub workstation: String,
    /// Block name that counts as a furnace.
    #[serde(default = "default_furnace")]
    pub furnace: String,
    /// Simulated milliseconds a furnace spends per smelted item.
    #[serde(default = "default_smelt_ms_per_item")]
    pub smelt_ms_per_item: u64,
}

impl Default for WorldRules {
    fn default() -> Self {
        Self {
            reach: default_reach(),
            workstation: default_workstation(),
            furnace: default_furnace(),
            smelt_ms_per_item: default_smelt_ms_per_item(),
        }
    }
}

const fn default_reach() -> u32 {
    4
}

fn default_workstation() -> String {
    String::from("crafting_table")
}

fn default_furnace() -> String {
    String::from("furnace")
}

const fn default_smelt_ms_per_item() -> u64 {
    10_000
}

/// A confirmed action, as recorded by the sandbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionRecord {
    /// An item was put in hand.
    Equip {
        /// Item name.
        item: String,
    },
    /// A block was placed.
    Place {
        /// Placed block name.
        block: String,
        /// Where it was placed.
        at: Position,
    },
    /// A block was dug.
    Dig {
        /// Dug block name.
        block: String,
        /// Where it was.
        at: Position,
    },
    /// The agent moved.
    Move {
        /// Destination.
        to: Position,
    },
    /// A craft transaction completed.
    Craft {
        /// Produced item name.
        item: String,
        /// Number of recipe batches run.
        batches: u32,
    },
    /// A furnace job was started.
    SmeltStarted {
        /// Input item name.
        input: String,
        /// Items loaded.
        count: u32,
    },
    /// A furnace job finished and its output was collected.
    SmeltFinished {
        /// Output item name.
        output: String,
        /// Items collected.
        count: u32,
    },
}

impl core::fmt::Display for ActionRecord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Equip { item } => write!(f, "equip {item}"),
            Self::Place { block, at } => write!(f, "place {block} at {at}"),
            Self::Dig { block, at } => write!(f, "dig {block} at {at}"),
            Self::Move { to } => write!(f, "move to {to}"),
            Self::Craft { item, batches } => write!(f, "craft {item} x{batches}"),
            Self::SmeltStarted { input, count } => write!(f, "smelt {count} {input}"),
            Self::SmeltFinished { output, count } => write!(f, "collect {count} {output}"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct SmeltJob {
    output: ItemId,
    count: u32,
    ready_at_ms: u64,
}

/// A single-agent voxel world.
#[derive(Debug, Clone)]
pub struct SimWorld {
    catalog: Arc<RecipeBook>,
    rules: WorldRules,
    blocks: BTreeMap<Position, BlockId>,
    position: Position,
    inventory: BTreeMap<ItemId, u32>,
    equipped: Option<ItemId>,
    clock_ms: u64,
    next_op: u64,
    jobs: BTreeMap<OperationHandle, SmeltJob>,
    actions: Vec<ActionRecord>,
}

impl SimWorld {
    /// Create an empty world with the agent at the origin.
    pub const fn new(catalog: Arc<RecipeBook>, rules: WorldRules) -> Self {
        Self {
            catalog,
            rules,
            blocks: BTreeMap::new(),
            position: Position::new(0, 0, 0),
            inventory: BTreeMap::new(),
            equipped: None,
            clock_ms: 0,
            next_op: 0,
            jobs: BTreeMap::new(),
            actions: Vec::new(),
        }
    }

    // -------------------------------------------------------------------
    // Setup
    // -------------------------------------------------------------------

    /// The catalog backing this world.
    pub const fn catalog(&self) -> &Arc<RecipeBook> {
        &self.catalog
    }

    /// The physical rules in force.
    pub const fn rules(&self) -> &WorldRules {
        &self.rules
    }

    /// Put a block at `pos`, replacing whatever was there.
    pub fn set_block(&mut self, pos: Position, block: BlockId) {
        self.blocks.insert(pos, block);
    }

    /// Put a block, by name, at `pos`.
    pub fn set_block_named(&mut self, pos: Position, name: &str) -> Result<(), WorldError> {
        let block = self
            .catalog
            .block_id(name)
            .ok_or_else(|| WorldError::UnknownBlock(name.to_owned()))?;
        self.set_block(pos, block);
        Ok(())
    }

    /// Fill the square `from..=to` (on both x and z) at height `y` with `block`.
    pub fn fill_layer(&mut self, block: BlockId, y: i32, from: i32, to: i32) {
        for x in from..=to {
            for z in from..=to {
                self.blocks.insert(Position::new(x, y, z), block);
            }
        }
    }

    /// Teleport the agent without recording an action.
    pub const fn set_position(&mut self, pos: Position) {
        self.position = pos;
    }

    /// Add `count` of `item` to the inventory.
    pub fn give(&mut self, item: ItemId, count: u32) -> Result<(), WorldError> {
        let held = self.inventory.entry(item).or_insert(0);
        *held = held
            .checked_add(count)
            .ok_or(WorldError::ArithmeticOverflow)?;
        Ok(())
    }

    /// Add `count` of the named item to the inventory.
    pub fn give_named(&mut self, name: &str, count: u32) -> Result<(), WorldError> {
        let item = self
            .catalog
            .item_id(name)
            .ok_or_else(|| WorldError::UnknownItem(name.to_owned()))?;
        self.give(item, count)
    }

    /// Quantity held of the named item; zero for unknown names.
    pub fn held_named(&self, name: &str) -> u32 {
        self.catalog
            .item_id(name)
            .map_or(0, |item| self.count(item))
    }

    /// Number of placed blocks of the named type.
    pub fn block_count_named(&self, name: &str) -> usize {
        self.catalog.block_id(name).map_or(0, |block| {
            self.blocks.values().filter(|b| **b == block).count()
        })
    }

    /// The item currently in hand.
    pub const fn equipped(&self) -> Option<ItemId> {
        self.equipped
    }

    /// Simulated time elapsed, in milliseconds.
    pub const fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    /// Every confirmed action, oldest first.
    pub fn actions(&self) -> &[ActionRecord] {
        &self.actions
    }

    // -------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------

    fn record(&mut self, action: ActionRecord) {
        debug!(action = %action, "sim action");
        self.actions.push(action);
    }

    fn occupied_by_agent(&self, pos: Position) -> bool {
        pos == self.position || pos == self.position.step(FaceVector::UP)
    }

    fn check_reach(&self, target: Position) -> Result<(), ActionError> {
        if self.position.is_within(target, self.rules.reach) {
            Ok(())
        } else {
            Err(ActionError::OutOfReach { target })
        }
    }

    fn take(&mut self, item: ItemId, count: u32) -> Result<(), ActionError> {
        let held = self.count(item);
        let remaining = held
            .checked_sub(count)
            .ok_or_else(|| ActionError::MissingIngredients {
                item: self.catalog.item_name(item),
                needed: count,
                held,
            })?;
        if remaining == 0 {
            self.inventory.remove(&item);
            if self.equipped == Some(item) {
                self.equipped = None;
            }
        } else {
            self.inventory.insert(item, remaining);
        }
        Ok(())
    }

    fn add(&mut self, item: ItemId, count: u32, context: &str) -> Result<(), ActionError> {
        self.give(item, count).map_err(|e| ActionError::Overflow {
            context: format!("{context}: {e}"),
        })
    }

    fn block_is(&self, pos: Position, name: &str) -> bool {
        self.catalog
            .block_id(name)
            .is_some_and(|block| self.block_at(pos) == Some(block))
    }
}

impl Inventory for SimWorld {
    fn count(&self, item: ItemId) -> u32 {
        self.inventory.get(&item).copied().unwrap_or(0)
    }

    fn find(&self, item: ItemId) -> Option<ItemHandle> {
        let slot = self
            .inventory
            .iter()
            .filter(|(_, held)| **held > 0)
            .position(|(id, _)| *id == item)?;
        Some(ItemHandle {
            item,
            slot: u32::try_from(slot).ok()?,
        })
    }

    fn items(&self) -> Vec<(ItemId, u32)> {
        self.inventory
            .iter()
            .filter(|(_, held)| **held > 0)
            .map(|(id, held)| (*id, *held))
            .collect()
    }
}

impl WorldProbe for SimWorld {
    fn position(&self) -> Position {
        self.position
    }

    fn find_nearest(&self, block: BlockId, max_radius: u32) -> Option<Position> {
        self.find_all(block, max_radius, 1).into_iter().next()
    }

    fn find_all(&self, block: BlockId, max_radius: u32, limit: usize) -> Vec<Position> {
        let origin = self.position;
        let mut found: Vec<Position> = self
            .blocks
            .iter()
            .filter(|(pos, id)| **id == block && origin.is_within(**pos, max_radius))
            .map(|(pos, _)| *pos)
            .collect();
        found.sort_by_key(|pos| (origin.distance_squared(*pos), *pos));
        found.truncate(limit);
        found
    }

    fn block_at(&self, pos: Position) -> Option<BlockId> {
        self.blocks.get(&pos).copied()
    }
}

impl Executor for SimWorld {
    fn equip(&mut self, handle: ItemHandle) -> Result<(), ActionError> {
        if self.count(handle.item) == 0 {
            return Err(ActionError::NotHeld {
                item: self.catalog.item_name(handle.item),
            });
        }
        self.equipped = Some(handle.item);
        let item = self.catalog.item_name(handle.item);
        self.record(ActionRecord::Equip { item });
        Ok(())
    }

    fn place(&mut self, reference: Position, face: FaceVector) -> Result<(), ActionError> {
        let item = self.equipped.ok_or(ActionError::NothingEquipped)?;
        let item_name = self.catalog.item_name(item);
        if self.count(item) == 0 {
            return Err(ActionError::NotHeld { item: item_name });
        }
        let block = self
            .catalog
            .item(item)
            .and_then(|def| def.places)
            .ok_or_else(|| ActionError::NotPlaceable {
                item: item_name.clone(),
            })?;
        let target = reference.step(face);
        self.check_reach(target)?;
        if self.block_at(reference).is_none() {
            return Err(ActionError::NoSupport { reference });
        }
        if self.block_at(target).is_some() || self.occupied_by_agent(target) {
            return Err(ActionError::Obstructed { target });
        }
        self.take(item, 1)?;
        self.blocks.insert(target, block);
        let block = self.catalog.block_name(block);
        self.record(ActionRecord::Place { block, at: target });
        Ok(())
    }

    fn dig(&mut self, pos: Position) -> Result<(), ActionError> {
        self.check_reach(pos)?;
        let block = self
            .block_at(pos)
            .ok_or(ActionError::NoBlock { target: pos })?;
        let (name, drops, tool_ok) = match self.catalog.block(block) {
            Some(def) => (
                def.name.clone(),
                def.drops,
                !def.needs_tool()
                    || self
                        .equipped
                        .is_some_and(|tool| def.harvest_tools.contains(&tool)),
            ),
            None => (block.to_string(), None, true),
        };
        if !tool_ok {
            return Err(ActionError::WrongTool { block: name });
        }
        self.blocks.remove(&pos);
        if let Some(item) = drops {
            self.add(item, 1, "dig")?;
        }
        self.record(ActionRecord::Dig {
            block: name,
            at: pos,
        });
        Ok(())
    }

    fn move_to(&mut self, goal: Position) -> Result<(), ActionError> {
        self.position = goal;
        self.record(ActionRecord::Move { to: goal });
        Ok(())
    }

    fn craft(
        &mut self,
        recipe: &Recipe,
        batches: u32,
        workstation: Option<Position>,
    ) -> Result<(), ActionError> {
        let item = self.catalog.item_name(recipe.produced);
        if recipe.requires_workstation {
            let table = workstation.ok_or_else(|| ActionError::WorkstationRequired {
                item: item.clone(),
            })?;
            if !self.block_is(table, &self.rules.workstation) {
                return Err(ActionError::WorkstationRequired { item });
            }
            self.check_reach(table)?;
        }

        let mut needed: BTreeMap<ItemId, u32> = BTreeMap::new();
        for (ingredient, per_batch) in recipe.consumed() {
            let total = per_batch
                .checked_mul(batches)
                .and_then(|n| n.checked_add(needed.get(&ingredient).copied().unwrap_or(0)))
                .ok_or_else(|| ActionError::Overflow {
                    context: format!("ingredients for {item}"),
                })?;
            needed.insert(ingredient, total);
        }
        for (ingredient, total) in &needed {
            let held = self.count(*ingredient);
            if held < *total {
                return Err(ActionError::MissingIngredients {
                    item: self.catalog.item_name(*ingredient),
                    needed: *total,
                    held,
                });
            }
        }
        let produced = recipe
            .output_count
            .checked_mul(batches)
            .ok_or_else(|| ActionError::Overflow {
                context: format!("output of {item}"),
            })?;

        for (ingredient, total) in needed {
            self.take(ingredient, total)?;
        }
        self.add(recipe.produced, produced, "craft")?;
        self.record(ActionRecord::Craft { item, batches });
        Ok(())
    }

    fn start_smelt(
        &mut self,
        furnace: Position,
        input: ItemId,
        fuel: ItemId,
        count: u32,
        fuel_units: u32,
    ) -> Result<OperationHandle, ActionError> {
        if !self.block_is(furnace, &self.rules.furnace) {
            return Err(ActionError::NoFurnace { at: furnace });
        }
        self.check_reach(furnace)?;
        let output = self
            .catalog
            .smelting_output(input)
            .ok_or_else(|| ActionError::NotSmeltable {
                item: self.catalog.item_name(input),
            })?;
        let capacity = self
            .catalog
            .item(fuel)
            .and_then(|def| def.fuel_value)
            .unwrap_or(0)
            .saturating_mul(fuel_units);
        if capacity < count {
            return Err(ActionError::InsufficientFuel {
                fuel: self.catalog.item_name(fuel),
                fuel_units,
                count,
            });
        }
        for (item, needed) in [(input, count), (fuel, fuel_units)] {
            let held = self.count(item);
            if held < needed {
                return Err(ActionError::MissingIngredients {
                    item: self.catalog.item_name(item),
                    needed,
                    held,
                });
            }
        }
        self.take(input, count)?;
        self.take(fuel, fuel_units)?;

        let duration = self
            .rules
            .smelt_ms_per_item
            .saturating_mul(u64::from(count));
        let op = OperationHandle(self.next_op);
        self.next_op = self.next_op.saturating_add(1);
        self.jobs.insert(
            op,
            SmeltJob {
                output,
                count,
                ready_at_ms: self.clock_ms.saturating_add(duration),
            },
        );
        let input = self.catalog.item_name(input);
        self.record(ActionRecord::SmeltStarted { input, count });
        Ok(op)
    }

    fn wait_for_completion(
        &mut self,
        op: OperationHandle,
        timeout: Duration,
    ) -> Result<(), ActionError> {
        let job = *self
            .jobs
            .get(&op)
            .ok_or(ActionError::UnknownOperation(op))?;
        let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        let remaining = job.ready_at_ms.saturating_sub(self.clock_ms);
        if remaining > timeout_ms {
            self.clock_ms = self.clock_ms.saturating_add(timeout_ms);
            return Err(ActionError::Timeout {
                op,
                waited_ms: timeout_ms,
            });
        }
        self.clock_ms = job.ready_at_ms.max(self.clock_ms);
        self.jobs.remove(&op);
        self.add(job.output, job.count, "smelt")?;
        let output = self.catalog.item_name(job.output);
        self.record(ActionRecord::SmeltFinished {
            output,
            count: job.count,
        });
        Ok(())
    }
}
