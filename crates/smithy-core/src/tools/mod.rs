//! Primitive operations composed by the resolver and the mission orchestrator.
//!
//! - [`collect`] -- find and mine N blocks of a type.
//! - [`place`] -- put a held block down near the agent.
//! - [`smelt`] -- run a furnace job to completion.
//! - [`inventory`] -- human-readable inventory listing.
//!
//! Each tool takes the [`Session`](crate::session::Session) and appends to a
//! [`StepLog`](crate::report::StepLog); none of them retries a failed action
//! beyond what its description states.

pub mod collect;
pub mod inventory;
pub mod place;
pub mod smelt;
