//! Runner binary for the Smithy crafting agent.
//!
//! Wires the core to the in-memory sandbox: loads configuration, builds the
//! scenario world, runs one task on a blocking worker under a wall-clock
//! bound, and prints the report as JSON on stdout. Logs go to stderr.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `smithy-config.yaml` (or `SMITHY_CONFIG`)
//! 2. Apply `SMITHY_SCENARIO` / `SMITHY_MISSION` overrides
//! 3. Initialize structured logging (tracing)
//! 4. Load the scenario and build the catalog and world
//! 5. Run the task on a blocking worker under `max_real_time_seconds`
//! 6. Print the report and exit non-zero if the task failed

mod error;
mod task;

use std::path::PathBuf;
use std::time::Duration;

use smithy_core::SmithyConfig;
use smithy_core::config::LoggingConfig;
use smithy_world::Scenario;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::task::RunConfig;

const DEFAULT_CONFIG: &str = "smithy-config.yaml";

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if startup fails or the task does not succeed.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1-2. Configuration first: the log level comes from it.
    let (config, mut run, loaded_from) = load_config()?;
    run.apply_overrides(
        std::env::var("SMITHY_SCENARIO").ok(),
        std::env::var("SMITHY_MISSION").ok(),
    );

    // 3. Initialize structured logging.
    init_logging(&config.logging);
    info!("smithy-engine starting");
    match &loaded_from {
        Some(path) => info!(path = %path.display(), "Configuration loaded"),
        None => info!("Config file not found, using defaults"),
    }
    info!(
        scenario = %run.scenario.display(),
        task = %run.task,
        max_real_time_seconds = run.max_real_time_seconds,
        interaction_range = config.agent.interaction_range,
        search_radius = config.agent.search_radius,
        "Run configured"
    );

    // 4. Build the world.
    let scenario = Scenario::from_file(&run.scenario)?;
    let (catalog, mut world) = scenario.build()?;

    // 5. Run the task. The core is synchronous, so it gets its own thread.
    let job = run.task.clone();
    let worker =
        tokio::task::spawn_blocking(move || task::run(&job, &catalog, &mut world, &config));
    let seconds = run.max_real_time_seconds;
    let Ok(joined) = tokio::time::timeout(Duration::from_secs(seconds), worker).await else {
        let err = EngineError::Timeout { seconds };
        error!(%err, "Aborting");
        // A blocking worker cannot be cancelled and would hold the runtime open.
        std::process::exit(2);
    };
    let outcome = joined.map_err(|join| EngineError::Worker {
        message: join.to_string(),
    })??;

    // 6. Report.
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    info!(succeeded = outcome.succeeded(), "smithy-engine shutdown complete");
    if !outcome.succeeded() {
        return Err(EngineError::TaskFailed {
            task: run.task.to_string(),
        }
        .into());
    }
    Ok(())
}

/// Route tracing to stderr; `RUST_LOG` overrides the configured level.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Load the core configuration and the `run` section from the same file.
///
/// Uses `SMITHY_CONFIG` if set, else `smithy-config.yaml` in the working
/// directory. A missing file means defaults for both.
fn load_config() -> Result<(SmithyConfig, RunConfig, Option<PathBuf>), EngineError> {
    let config_path = std::env::var("SMITHY_CONFIG")
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG), PathBuf::from);
    if !config_path.exists() {
        return Ok((SmithyConfig::default(), RunConfig::default(), None));
    }
    let contents = std::fs::read_to_string(&config_path)?;
    let config = SmithyConfig::parse(&contents)?;
    let run = RunConfig::from_config_yaml(&contents)?;
    Ok((config, run, Some(config_path)))
}
