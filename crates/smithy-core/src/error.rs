//! Error types for the `smithy-core` crate.
//!
//! - [`ResolveError`] -- why a resolution branch failed.
//! - [`ToolError`] -- why a primitive tool (collect, place, smelt) failed.
//! - [`SessionError`] -- configured landmark names missing from the catalog.
//! - [`MissionError`] -- why a mission step failed.
//!
//! None of these are retried by the core. The first failure ends the branch,
//! the tool call, or the mission.

use smithy_world::ActionError;

/// A resolution branch failed. Fatal for the branch, propagated upward.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The identifier is not in the catalog.
    #[error("unknown item {item}")]
    UnknownItem {
        /// The identifier as displayed (`item#N`).
        item: String,
    },

    /// The item has no producing recipe and cannot be gathered.
    #[error("no recipe produces {item}")]
    NoRecipe {
        /// Display name of the item.
        item: String,
    },

    /// The item is already being resolved further up the call stack.
    #[error("cycle detected: {path}")]
    CycleDetected {
        /// The resolution path, e.g. `a -> b -> a`.
        path: String,
    },

    /// The workstation bootstrap ran out of options.
    #[error("no workstation available: {reason}")]
    WorkstationUnavailable {
        /// What was tried last.
        reason: String,
    },

    /// The executor reported failure for an action.
    #[error("{action} failed: {source}")]
    Execution {
        /// The attempted action, e.g. `craft stick`.
        action: String,
        /// The executor's error.
        source: ActionError,
    },

    /// Ingredients kept running short after every closure pass.
    #[error("short of {ingredient} for {item}: need {needed}, hold {held}")]
    IngredientShortfall {
        /// Display name of the item being crafted.
        item: String,
        /// Display name of the missing ingredient.
        ingredient: String,
        /// Quantity needed.
        needed: u32,
        /// Quantity held after the last pass.
        held: u32,
    },

    /// Gathering a raw resource failed.
    #[error("could not gather {item}: {source}")]
    Gather {
        /// Display name of the raw item.
        item: String,
        /// The collect tool's error.
        source: ToolError,
    },

    /// A quantity computation overflowed.
    #[error("arithmetic overflow computing {context}")]
    Arithmetic {
        /// What was being computed.
        context: String,
    },
}

/// A primitive tool call failed.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// The block name is not in the catalog.
    #[error("unknown block: {0}")]
    UnknownBlock(String),

    /// The item name is not in the catalog.
    #[error("unknown item: {0}")]
    UnknownItem(String),

    /// No instance of the block lies within the search radius.
    #[error("no {block} found within {radius} blocks")]
    NoneFound {
        /// Display name of the block.
        block: String,
        /// Radius searched.
        radius: u32,
    },

    /// The block needs a harvest tool and none is held.
    #[error("no tool able to harvest {block} is held")]
    MissingTool {
        /// Display name of the block.
        block: String,
    },

    /// Fewer blocks were mined than requested.
    #[error("collected {collected} of {wanted} {block}")]
    Shortfall {
        /// Display name of the block.
        block: String,
        /// Blocks requested.
        wanted: u32,
        /// Blocks actually mined.
        collected: u32,
    },

    /// The item is not in the inventory.
    #[error("{item} is not held")]
    NotHeld {
        /// Display name of the item.
        item: String,
    },

    /// No candidate spot around the agent accepted the block.
    #[error("no free spot to place {item}")]
    NoPlacement {
        /// Display name of the item.
        item: String,
    },

    /// No furnace is within interaction range.
    #[error("no furnace within {range} blocks")]
    NoFurnace {
        /// Interaction range searched.
        range: u32,
    },

    /// The input has no smelting result.
    #[error("{item} cannot be smelted")]
    NotSmeltable {
        /// Display name of the item.
        item: String,
    },

    /// The fuel item has no fuel value.
    #[error("{item} is not a fuel")]
    NotFuel {
        /// Display name of the item.
        item: String,
    },

    /// The executor reported failure.
    #[error("{action} failed: {source}")]
    Action {
        /// The attempted action.
        action: String,
        /// The executor's error.
        source: ActionError,
    },

    /// A quantity computation overflowed.
    #[error("arithmetic overflow computing {context}")]
    Arithmetic {
        /// What was being computed.
        context: String,
    },
}

/// The catalog lacks a landmark the configuration names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// A configured item name is not in the catalog.
    #[error("configured item {0} is not in the catalog")]
    UnknownItem(String),

    /// A configured item has no block form.
    #[error("configured item {0} cannot be placed as a block")]
    NotPlaceable(String),
}

/// A mission step failed.
#[derive(Debug, thiserror::Error)]
pub enum MissionError {
    /// The mission name is not known.
    #[error("unknown mission: {0}")]
    UnknownMission(String),

    /// A resolver call failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A primitive tool failed.
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// A requirement names a block that drops nothing.
    #[error("{block} drops nothing and cannot satisfy a requirement")]
    NoDrop {
        /// Display name of the block.
        block: String,
    },

    /// A phase ended without its declared quantity.
    #[error("requirement not met: need {needed} {item}, hold {held}")]
    RequirementUnmet {
        /// Display name of the item.
        item: String,
        /// Declared quantity.
        needed: u32,
        /// Quantity held.
        held: u32,
    },

    /// None of the smelting candidates is held.
    #[error("none of {candidates} is held")]
    NothingToSmelt {
        /// Candidate names, comma separated.
        candidates: String,
    },
}
