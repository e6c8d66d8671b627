//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup and task execution.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Reading the configuration file failed.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Core configuration was invalid.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: smithy_core::ConfigError,
    },

    /// The `run` section could not be parsed.
    #[error("run section error: {source}")]
    Run {
        /// The underlying YAML error.
        #[from]
        source: serde_yml::Error,
    },

    /// Scenario loading or catalog construction failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: smithy_world::WorldError,
    },

    /// The configured landmarks are missing from the scenario's catalog.
    #[error("session error: {source}")]
    Session {
        /// The underlying session error.
        #[from]
        source: smithy_core::SessionError,
    },

    /// The report could not be serialized.
    #[error("report serialization failed: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// The worker thread running the task panicked or was cancelled.
    #[error("task worker failed: {message}")]
    Worker {
        /// Description of the worker failure.
        message: String,
    },

    /// The task did not finish within the wall-clock bound.
    #[error("task did not finish within {seconds}s")]
    Timeout {
        /// The configured bound.
        seconds: u64,
    },

    /// The task ran to completion but did not succeed.
    #[error("task failed: {task}")]
    TaskFailed {
        /// The task as configured.
        task: String,
    },
}
