//! Core types for single-channel gating simulations.
//!
//! This crate holds the data model shared by the simulation core and the
//! experiment harness:
//!
//! - **Gates**: identity (`GateClass`, `GateId`) and binary state (`GateState`)
//! - **Trajectories**: piecewise-constant time series recorded with doubled
//!   samples at every jump (`Trajectory`, `Sample`, `Step`)
//! - **Units**: conversions between the SI values used by the core and the
//!   display units used by the teaching panels

pub mod gate;
pub mod trajectory;
pub mod units;

pub use gate::{GateClass, GateId, GateState};
pub use trajectory::{Jump, Sample, Step, Trajectory};
