//! The engine-only `run` section and task execution.
//!
//! `smithy-config.yaml` carries the core sections (see
//! [`SmithyConfig`]) plus a `run` section that only the engine reads:
//!
//! ```yaml
//! run:
//!   scenario: scenarios/iron_age.yaml
//!   task:
//!     mission: iron_pickaxe     # or: { craft: wooden_pickaxe, count: 1 }
//!   max_real_time_seconds: 30
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use smithy_core::tools::inventory;
use smithy_core::{Orchestrator, Resolver, Session, SmithyConfig};
use smithy_types::MissionReport;
use smithy_world::{RecipeBook, SimWorld};
use tracing::info;

use crate::error::EngineError;

/// What to run and against which world.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunConfig {
    /// Path to the scenario YAML, relative to the working directory.
    #[serde(default = "default_scenario")]
    pub scenario: PathBuf,

    /// The task to run.
    #[serde(default)]
    pub task: Task,

    /// Wall-clock bound for the whole task.
    #[serde(default = "default_max_real_time_seconds")]
    pub max_real_time_seconds: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            scenario: default_scenario(),
            task: Task::default(),
            max_real_time_seconds: default_max_real_time_seconds(),
        }
    }
}

impl RunConfig {
    /// Extract the `run` section from a full config file. Absent means defaults.
    ///
    /// # Errors
    ///
    /// Returns a YAML error if the file or the section does not parse.
    pub fn from_config_yaml(contents: &str) -> Result<Self, serde_yml::Error> {
        // Parse the full YAML and extract just the "run" section.
        let raw: serde_yml::Value = serde_yml::from_str(contents)?;
        match raw.get("run") {
            Some(run) => serde_yml::from_value(run.clone()),
            None => Ok(Self::default()),
        }
    }

    /// Apply `SMITHY_SCENARIO` / `SMITHY_MISSION` style overrides.
    pub fn apply_overrides(&mut self, scenario: Option<String>, mission: Option<String>) {
        if let Some(scenario) = scenario {
            self.scenario = PathBuf::from(scenario);
        }
        if let Some(mission) = mission {
            self.task = Task::Mission { mission };
        }
    }
}

/// A single unit of work for the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Task {
    /// Run a named mission.
    Mission {
        /// Mission name, e.g. `iron_pickaxe`.
        mission: String,
    },
    /// Resolve one item.
    Craft {
        /// Item name.
        craft: String,
        /// Quantity wanted.
        #[serde(default = "default_count")]
        count: u32,
    },
}

impl Default for Task {
    fn default() -> Self {
        Self::Mission {
            mission: String::from("iron_pickaxe"),
        }
    }
}

impl core::fmt::Display for Task {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Mission { mission } => write!(f, "mission {mission}"),
            Self::Craft { craft, count } => write!(f, "craft {count} {craft}"),
        }
    }
}

/// Result of a single-item task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CraftReport {
    /// Item requested.
    pub item: String,
    /// Quantity requested.
    pub count: u32,
    /// Whether the resolution succeeded.
    pub succeeded: bool,
    /// The error that ended the resolution, if any.
    pub error: Option<String>,
    /// Ordered diagnostic steps.
    pub steps: Vec<String>,
}

/// What the engine prints on stdout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    /// A mission ran.
    Mission(MissionReport),
    /// A single item was resolved.
    Craft(CraftReport),
}

impl Outcome {
    /// Whether the task succeeded.
    pub const fn succeeded(&self) -> bool {
        match self {
            Self::Mission(report) => report.succeeded,
            Self::Craft(report) => report.succeeded,
        }
    }
}

/// Run `task` to completion against `world`.
///
/// # Errors
///
/// Returns [`EngineError::Session`] if the configured landmarks are not in the
/// catalog. Task failures are reported in the [`Outcome`], not as errors.
pub fn run(
    task: &Task,
    catalog: &RecipeBook,
    world: &mut SimWorld,
    config: &SmithyConfig,
) -> Result<Outcome, EngineError> {
    let mut session = Session::new(catalog, world, config)?;
    info!(%task, inventory = %inventory::summary(&session), "Task started");

    let outcome = match task {
        Task::Mission { mission } => {
            Outcome::Mission(Orchestrator::new(&mut session).run_mission(mission))
        }
        Task::Craft { craft, count } => {
            let resolution = Resolver::new(&mut session).resolve_named(craft, *count);
            Outcome::Craft(CraftReport {
                item: craft.clone(),
                count: *count,
                succeeded: resolution.succeeded(),
                error: resolution.result.err().map(|err| err.to_string()),
                steps: resolution.steps,
            })
        }
    };

    info!(
        succeeded = outcome.succeeded(),
        inventory = %inventory::summary(&session),
        position = %session.agent().position(),
        "Final inventory"
    );
    Ok(outcome)
}

fn default_scenario() -> PathBuf {
    PathBuf::from("scenarios/iron_age.yaml")
}

const fn default_max_real_time_seconds() -> u64 {
    30
}

const fn default_count() -> u32 {
    1
}
