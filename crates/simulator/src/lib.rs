//! Single-Channel Simulator
//!
//! Runs voltage-clamp experiments on one stochastically gated ion channel,
//! built on top of `singlechannel-simulation`.
//!
//! # Architecture
//!
//! The simulator builds on the gating core to provide:
//!
//! - **Configuration**: TOML experiment files in display units (ms, mV, pS)
//! - **Sweeps**: Repeated runs of one protocol from a seeded ChaCha8 stream
//! - **Metrics Collection**: Open probability, first latency, dwell-time percentiles
//! - **Export**: JSON traces for plotting
//!
//! # Example
//!
//! ```no_run
//! use singlechannel_simulator::{Simulator, SimulatorConfig, TraceExport};
//!
//! let config = SimulatorConfig::new()
//!     .with_gates(3, 1)
//!     .with_step(0.5, 100.0)
//!     .with_sweeps(20);
//!
//! let mut simulator = Simulator::new(config).unwrap();
//! let outcome = simulator.run().unwrap();
//! outcome.report.print();
//!
//! if let Some(run) = &outcome.last_run {
//!     TraceExport::from_run(run).write_json("trace.json").unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod metrics;
pub mod runner;

pub use config::{ChannelSection, ClampSection, RateSection, SimulatorConfig};
pub use error::HarnessError;
pub use export::TraceExport;
pub use metrics::{MetricsCollector, SimulationReport, SweepSummary};
pub use runner::{ExperimentOutcome, Simulator};
