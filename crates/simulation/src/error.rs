//! Error types for gating simulations.

use singlechannel_types::GateId;
use thiserror::Error;

/// Contract violations detected before or during a run.
///
/// A run that fails never hands out a partial trajectory.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// A real-valued parameter was NaN or infinite.
    #[error("Parameter `{name}` must be finite, got {value}")]
    NonFiniteParameter { name: &'static str, value: f64 },

    /// The total duration was negative.
    #[error("Total duration must be non-negative, got {0} s")]
    NegativeDuration(f64),

    /// The step delay was negative.
    #[error("Step delay must be non-negative, got {0} s")]
    NegativeStepDelay(f64),

    /// The rate model returned a negative or NaN rate.
    #[error("Rate model returned invalid rate {rate} for gate {gate} at {voltage} V")]
    InvalidRate {
        gate: GateId,
        voltage: f64,
        rate: f64,
    },

    /// A gate had infinite opening and closing rates, so it would flip
    /// forever without time advancing.
    #[error("Gate {gate} has infinite opening and closing rates at {voltage} V (t = {time} s)")]
    UnstableGate { gate: GateId, voltage: f64, time: f64 },

    /// More events fired than the configured budget allows.
    #[error("Event budget of {limit} exhausted at t = {time} s")]
    EventBudgetExhausted { limit: u64, time: f64 },
}
