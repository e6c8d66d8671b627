//! Error types for the `smithy-world` crate.
//!
//! [`ActionError`] is what an executor reports when a physical action does not
//! complete. [`WorldError`] covers catalog construction and scenario loading.

use smithy_types::{OperationHandle, Position};

/// A single physical action failed.
///
/// Names are carried as display strings so diagnostics read naturally without
/// a catalog at hand.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// The item is not in the inventory.
    #[error("{item} is not held")]
    NotHeld {
        /// Display name of the item.
        item: String,
    },

    /// A placement was attempted with an empty hand.
    #[error("nothing is equipped")]
    NothingEquipped,

    /// The equipped item has no block form.
    #[error("{item} cannot be placed")]
    NotPlaceable {
        /// Display name of the item.
        item: String,
    },

    /// The target is beyond the agent's interaction range.
    #[error("{target} is out of reach")]
    OutOfReach {
        /// The unreachable position.
        target: Position,
    },

    /// The target cell is occupied (by a block or by the agent).
    #[error("{target} is obstructed")]
    Obstructed {
        /// The occupied position.
        target: Position,
    },

    /// The reference block for a placement is air.
    #[error("no solid block to place against at {reference}")]
    NoSupport {
        /// The empty reference position.
        reference: Position,
    },

    /// There is no block to dig at the target.
    #[error("no block at {target}")]
    NoBlock {
        /// The empty position.
        target: Position,
    },

    /// The block needs a harvest tool that is not equipped.
    #[error("{block} needs a tool that is not equipped")]
    WrongTool {
        /// Display name of the block.
        block: String,
    },

    /// A craft was submitted without enough of an ingredient.
    #[error("missing ingredient {item}: need {needed}, hold {held}")]
    MissingIngredients {
        /// Display name of the ingredient.
        item: String,
        /// Quantity the craft needs.
        needed: u32,
        /// Quantity currently held.
        held: u32,
    },

    /// The recipe needs a workstation and none was supplied within reach.
    #[error("{item} needs a workstation within reach")]
    WorkstationRequired {
        /// Display name of the item being crafted.
        item: String,
    },

    /// The smelting target is not a furnace.
    #[error("no furnace at {at}")]
    NoFurnace {
        /// The position that was expected to hold a furnace.
        at: Position,
    },

    /// The input item has no smelting result.
    #[error("{item} cannot be smelted")]
    NotSmeltable {
        /// Display name of the item.
        item: String,
    },

    /// The supplied fuel cannot smelt the requested count.
    #[error("not enough fuel: {fuel_units} unit(s) of {fuel} cannot smelt {count} item(s)")]
    InsufficientFuel {
        /// Display name of the fuel item.
        fuel: String,
        /// Fuel units supplied.
        fuel_units: u32,
        /// Items requested.
        count: u32,
    },

    /// The operation handle is unknown or already completed.
    #[error("unknown operation {0}")]
    UnknownOperation(OperationHandle),

    /// The operation did not complete within the allowed wait.
    #[error("operation {op} did not complete within {waited_ms}ms")]
    Timeout {
        /// The pending operation.
        op: OperationHandle,
        /// How long the caller waited.
        waited_ms: u64,
    },

    /// A quantity computation overflowed.
    #[error("arithmetic overflow in {context}")]
    Overflow {
        /// What was being computed.
        context: String,
    },

    /// The live world refused the action for a reason not modelled above.
    #[error("action rejected: {reason}")]
    Rejected {
        /// Description reported by the world.
        reason: String,
    },
}

/// Errors from building a catalog or loading a scenario.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// An item name was referenced but never declared.
    #[error("unknown item: {0}")]
    UnknownItem(String),

    /// A block name was referenced but never declared.
    #[error("unknown block: {0}")]
    UnknownBlock(String),

    /// The same item name was declared twice.
    #[error("duplicate item: {0}")]
    DuplicateItem(String),

    /// The same block name was declared twice.
    #[error("duplicate block: {0}")]
    DuplicateBlock(String),

    /// A recipe definition is malformed.
    #[error("invalid recipe for {output}: {reason}")]
    InvalidRecipe {
        /// The recipe's output item name.
        output: String,
        /// What is wrong with it.
        reason: String,
    },

    /// More entries than identifiers can address.
    #[error("catalog too large")]
    CatalogTooLarge,

    /// An inventory quantity overflowed while seeding the world.
    #[error("arithmetic overflow in world setup")]
    ArithmeticOverflow,

    /// Failed to read a scenario file from disk.
    #[error("failed to read scenario file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse scenario YAML.
    #[error("failed to parse scenario YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for WorldError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}
