//! Recipe resolution and mission orchestration for the Smithy crafting agent.
//!
//! Given a target item and quantity, the core works out and executes the whole
//! dependency chain against a live agent: raw gathering, sub-crafts, tools,
//! and workstation placement. Missions string those resolutions together with
//! collect, place, and smelt steps into fixed multi-phase goals.
//!
//! Everything here is synchronous and strictly sequential; every agent call is
//! a suspension point owned by the executor.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `smithy-config.yaml` into
//!   strongly-typed structs.
//! - [`error`] -- [`ResolveError`], [`ToolError`], [`SessionError`],
//!   [`MissionError`].
//! - [`session`] -- [`Session`]: catalog, agent, and config for one call chain.
//! - [`quantity`] -- Checked batch, ingredient, and fuel arithmetic.
//! - [`report`] -- [`StepLog`], the flat diagnostic log handed to callers.
//! - [`resolver`] -- [`Resolver`] and the cycle-detecting [`ActiveSet`].
//! - [`workstation`] -- Crafting table bootstrap and reclaim.
//! - [`tools`] -- Collect, place, smelt, and inventory summary.
//! - [`mission`] -- Fixed mission plans and [`MissionState`].
//! - [`orchestrator`] -- [`Orchestrator`], which runs mission plans.
//!
//! [`ResolveError`]: error::ResolveError
//! [`ToolError`]: error::ToolError
//! [`SessionError`]: error::SessionError
//! [`MissionError`]: error::MissionError
//! [`Session`]: session::Session
//! [`StepLog`]: report::StepLog
//! [`Resolver`]: resolver::Resolver
//! [`ActiveSet`]: resolver::ActiveSet
//! [`MissionState`]: mission::MissionState
//! [`Orchestrator`]: orchestrator::Orchestrator

pub mod config;
pub mod error;
pub mod mission;
pub mod orchestrator;
pub mod quantity;
pub mod report;
pub mod resolver;
pub mod session;
pub mod tools;
pub mod workstation;

// Re-export primary types at crate root.
pub use config::{ConfigError, SmithyConfig};
pub use error::{MissionError, ResolveError, SessionError, ToolError};
pub use mission::{MissionPlan, MissionState, PhasePlan, Step, plan_for};
pub use orchestrator::Orchestrator;
pub use report::StepLog;
pub use resolver::{ActiveSet, Resolution, Resolver};
pub use session::{Landmarks, Session};
