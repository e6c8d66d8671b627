//! The narrow contracts the core consumes from the live world.
//!
//! A running agent is observed through [`Inventory`] and [`WorldProbe`] and
//! driven through [`Executor`]; recipe data comes from a read-only
//! [`Catalog`]. The core only ever talks to these traits, so the same resolver
//! runs against a network-backed bot or the in-memory
//! [`SimWorld`](crate::sim::SimWorld).
//!
//! Every [`Executor`] call is a suspension point: it returns once the world
//! confirms the action or reports failure. Timeouts belong to the executor.

use std::time::Duration;

use smithy_types::{
    BlockDef, BlockId, FaceVector, ItemDef, ItemHandle, ItemId, OperationHandle, Position, Recipe,
};

use crate::error::ActionError;

/// Read-only item, block, and recipe lookup.
pub trait Catalog {
    /// Definition of an item, or `None` if the identifier is unknown.
    fn item(&self, id: ItemId) -> Option<&ItemDef>;

    /// Identifier of the item with the given name.
    fn item_id(&self, name: &str) -> Option<ItemId>;

    /// Definition of a block, or `None` if the identifier is unknown.
    fn block(&self, id: BlockId) -> Option<&BlockDef>;

    /// Identifier of the block with the given name.
    fn block_id(&self, name: &str) -> Option<BlockId>;

    /// Every recipe producing `item`, in catalog enumeration order. May be empty.
    fn recipes_for(&self, item: ItemId) -> &[Recipe];

    /// Blocks that drop `item` when dug, in catalog order.
    fn sources_of(&self, item: ItemId) -> Vec<BlockId>;

    /// The item produced by smelting `input`, if it is smeltable.
    fn smelting_output(&self, input: ItemId) -> Option<ItemId>;
}

/// Current inventory contents of the agent.
pub trait Inventory {
    /// Quantity of `item` currently held.
    fn count(&self, item: ItemId) -> u32;

    /// A held stack of `item`, if any.
    fn find(&self, item: ItemId) -> Option<ItemHandle>;

    /// Every held item with a non-zero quantity.
    fn items(&self) -> Vec<(ItemId, u32)>;
}

/// Spatial queries around the agent.
pub trait WorldProbe {
    /// The agent's current block position.
    fn position(&self) -> Position;

    /// The closest block of type `block` within `max_radius` of the agent.
    fn find_nearest(&self, block: BlockId, max_radius: u32) -> Option<Position>;

    /// Up to `limit` blocks of type `block` within `max_radius`, nearest first.
    fn find_all(&self, block: BlockId, max_radius: u32, limit: usize) -> Vec<Position>;

    /// The block at `pos`, or `None` for air / unloaded space.
    fn block_at(&self, pos: Position) -> Option<BlockId>;
}

/// Physical actions on the world. Each call blocks until confirmed.
pub trait Executor {
    /// Put the held stack in the agent's hand.
    fn equip(&mut self, handle: ItemHandle) -> Result<(), ActionError>;

    /// Place the equipped block against `reference`, on the side `face`.
    fn place(&mut self, reference: Position, face: FaceVector) -> Result<(), ActionError>;

    /// Dig the block at `pos`, collecting its drop.
    fn dig(&mut self, pos: Position) -> Result<(), ActionError>;

    /// Walk to `goal`. Path planning is the executor's concern.
    fn move_to(&mut self, goal: Position) -> Result<(), ActionError>;

    /// Run `recipe` `batches` times, using the workstation at `workstation` if given.
    fn craft(
        &mut self,
        recipe: &Recipe,
        batches: u32,
        workstation: Option<Position>,
    ) -> Result<(), ActionError>;

    /// Load a furnace with `count` of `input` and `fuel_units` of `fuel` and start it.
    fn start_smelt(
        &mut self,
        furnace: Position,
        input: ItemId,
        fuel: ItemId,
        count: u32,
        fuel_units: u32,
    ) -> Result<OperationHandle, ActionError>;

    /// Block until `op` completes (output collected) or `timeout` elapses.
    fn wait_for_completion(
        &mut self,
        op: OperationHandle,
        timeout: Duration,
    ) -> Result<(), ActionError>;
}

/// A live agent: everything the core needs besides the catalog.
pub trait Agent: Inventory + WorldProbe + Executor {}

impl<T: Inventory + WorldProbe + Executor> Agent for T {}
