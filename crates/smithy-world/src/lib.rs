//! World contracts and a reference sandbox for the Smithy crafting agent.
//!
//! The core never touches a live world directly. It consumes the narrow
//! traits in [`contracts`]; this crate also ships an in-memory implementation
//! of them so the resolver and orchestrator can run end to end without a
//! server.
//!
//! # Modules
//!
//! - [`contracts`] -- [`Catalog`], [`Inventory`], [`WorldProbe`], [`Executor`]
//!   and the blanket [`Agent`] bound.
//! - [`error`] -- [`ActionError`] for failed actions, [`WorldError`] for
//!   catalog and scenario problems.
//! - [`recipe_book`] -- [`RecipeBook`], a validated in-memory catalog.
//! - [`sim`] -- [`SimWorld`], a single-agent voxel sandbox with a simulated
//!   clock and an action log.
//! - [`scenario`] -- YAML scenario files producing a catalog and a world.

pub mod contracts;
pub mod error;
pub mod recipe_book;
pub mod scenario;
pub mod sim;

// Re-export primary types at crate root.
pub use contracts::{Agent, Catalog, Executor, Inventory, WorldProbe};
pub use error::{ActionError, WorldError};
pub use recipe_book::{CatalogData, RecipeBook, RecipeBookBuilder};
pub use scenario::Scenario;
pub use sim::{ActionRecord, SimWorld, WorldRules};
