//! Shared type definitions for the Smithy crafting agent.
//!
//! This crate is the single source of truth for the value types passed between
//! the world contracts, the resolver/orchestrator core, and the engine binary.
//!
//! # Modules
//!
//! - [`ids`] -- Catalog indices ([`ItemId`], [`BlockId`]) and [`MissionId`]
//! - [`geometry`] -- Block coordinates and face vectors
//! - [`catalog`] -- Item, block, and recipe definitions plus action handles
//! - [`mission`] -- Mission names, phases, and reports

pub mod catalog;
pub mod geometry;
pub mod ids;
pub mod mission;

// Re-export all public types at crate root for convenience.
pub use catalog::{BlockDef, Ingredient, ItemDef, ItemHandle, OperationHandle, Recipe};
pub use geometry::{FaceVector, Position};
pub use ids::{BlockId, ItemId, MissionId};
pub use mission::{MissionName, MissionPhase, MissionReport};
