//! Error types for the experiment runner.

use singlechannel_simulation::SimulationError;
use thiserror::Error;

/// Errors while configuring, running, or exporting an experiment.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Reading or writing a file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The TOML configuration could not be parsed.
    #[error("Invalid configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The configuration could not be rendered as TOML.
    #[error("Failed to render configuration: {0}")]
    ConfigRender(#[from] toml::ser::Error),

    /// A sweep failed.
    #[error("Simulation failed: {0}")]
    Simulation(#[from] SimulationError),

    /// The dwell-time histogram could not be created.
    #[error("Histogram setup failed: {0}")]
    Metrics(#[from] hdrhistogram::CreationError),

    /// Trace export failed.
    #[error("Trace export failed: {0}")]
    Export(#[from] serde_json::Error),
}
