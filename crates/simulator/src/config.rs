//! Configuration types for the experiment runner.
//!
//! Experiments are described in the display units of the teaching panels
//! (ms, mV, pS, rates per ms) and converted to SI for the simulation core.

use crate::error::HarnessError;
use serde::{Deserialize, Serialize};
use singlechannel_simulation::{
    ChannelConfig, ClampProtocol, GateRates, InitialGateState, LevelRates, SimulationConfig,
    ThresholdRates,
};
use singlechannel_types::units::{mv_to_v, ms_to_s, per_ms_to_per_s, ps_to_s, v_to_mv, MILLI};
use std::path::Path;

/// Channel properties.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelSection {
    /// Number of activation gates.
    pub activation_gates: usize,

    /// Number of inactivation gates.
    pub inactivation_gates: usize,

    /// Channel reversal potential (mV).
    pub reversal_potential_mv: f64,

    /// Open channel conductance (pS).
    pub conductance_ps: f64,

    /// Gate states at the start of each sweep.
    pub initial_state: InitialGateState,
}

impl Default for ChannelSection {
    fn default() -> Self {
        Self {
            activation_gates: 3,
            inactivation_gates: 1,
            reversal_potential_mv: 0.0,
            conductance_ps: 10.0,
            initial_state: InitialGateState::AllClosed,
        }
    }
}

/// Voltage clamp protocol.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClampSection {
    /// Holding potential (mV).
    pub holding_potential_mv: f64,

    /// Step delay (ms).
    pub step_delay_ms: f64,

    /// Step potential (mV).
    pub step_potential_mv: f64,
}

impl Default for ClampSection {
    fn default() -> Self {
        Self {
            holding_potential_mv: -100.0,
            step_delay_ms: 0.5,
            step_potential_mv: 100.0,
        }
    }
}

/// Two-level rate model, rates per millisecond.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateSection {
    /// Voltage at which the rates switch (mV).
    pub threshold_mv: f64,

    /// Activation gate rates below and above the threshold.
    pub activation: LevelRates,

    /// Inactivation gate rates below and above the threshold.
    pub inactivation: LevelRates,
}

impl RateSection {
    /// Build the SI rate model.
    pub fn to_rate_model(&self) -> ThresholdRates {
        let per_s = |rates: GateRates| rates.scaled(per_ms_to_per_s(1.0));
        let levels = |levels: &LevelRates| LevelRates {
            below: per_s(levels.below),
            above: per_s(levels.above),
        };
        ThresholdRates {
            threshold: mv_to_v(self.threshold_mv),
            activation: levels(&self.activation),
            inactivation: levels(&self.inactivation),
        }
    }
}

impl Default for RateSection {
    fn default() -> Self {
        let si = ThresholdRates::default();
        let per_ms = |levels: LevelRates| LevelRates {
            below: levels.below.scaled(MILLI),
            above: levels.above.scaled(MILLI),
        };
        Self {
            threshold_mv: v_to_mv(si.threshold),
            activation: per_ms(si.activation),
            inactivation: per_ms(si.inactivation),
        }
    }
}

/// Configuration for an experiment: one or more sweeps of the same protocol.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Random seed for deterministic sweeps.
    pub seed: u64,

    /// Number of sweeps to run.
    pub sweeps: usize,

    /// Total duration of each sweep (ms).
    pub total_duration_ms: f64,

    /// Upper bound on events per sweep.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_events: Option<u64>,

    /// Channel properties.
    pub channel: ChannelSection,

    /// Voltage clamp protocol.
    pub clamp: ClampSection,

    /// Rate model.
    pub rates: RateSection,
}

impl SimulatorConfig {
    /// Create a configuration with the teaching panel defaults.
    pub fn new() -> Self {
        Self {
            seed: 12345,
            sweeps: 1,
            total_duration_ms: 4.0,
            max_events: Some(1_000_000),
            channel: ChannelSection::default(),
            clamp: ClampSection::default(),
            rates: RateSection::default(),
        }
    }

    /// Parse a TOML document. Missing fields take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, HarnessError> {
        Ok(toml::from_str(s)?)
    }

    /// Load a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, HarnessError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| HarnessError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String, HarnessError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the number of sweeps.
    pub fn with_sweeps(mut self, sweeps: usize) -> Self {
        self.sweeps = sweeps;
        self
    }

    /// Set the gate counts.
    pub fn with_gates(mut self, activation: usize, inactivation: usize) -> Self {
        self.channel.activation_gates = activation;
        self.channel.inactivation_gates = inactivation;
        self
    }

    /// Set the reversal potential (mV).
    pub fn with_reversal_potential_mv(mut self, mv: f64) -> Self {
        self.channel.reversal_potential_mv = mv;
        self
    }

    /// Set the open channel conductance (pS).
    pub fn with_conductance_ps(mut self, ps: f64) -> Self {
        self.channel.conductance_ps = ps;
        self
    }

    /// Set the initial gate states.
    pub fn with_initial_state(mut self, initial_state: InitialGateState) -> Self {
        self.channel.initial_state = initial_state;
        self
    }

    /// Set the holding potential (mV).
    pub fn with_holding_potential_mv(mut self, mv: f64) -> Self {
        self.clamp.holding_potential_mv = mv;
        self
    }

    /// Set the step delay (ms) and step potential (mV).
    pub fn with_step(mut self, delay_ms: f64, potential_mv: f64) -> Self {
        self.clamp.step_delay_ms = delay_ms;
        self.clamp.step_potential_mv = potential_mv;
        self
    }

    /// Set the total duration of each sweep (ms).
    pub fn with_total_duration_ms(mut self, ms: f64) -> Self {
        self.total_duration_ms = ms;
        self
    }

    /// Set or clear the per-sweep event bound.
    pub fn with_max_events(mut self, max_events: Option<u64>) -> Self {
        self.max_events = max_events;
        self
    }

    /// Set the rate model.
    pub fn with_rates(mut self, rates: RateSection) -> Self {
        self.rates = rates;
        self
    }

    /// Convert to the SI configuration of the simulation core.
    pub fn to_simulation_config(&self) -> SimulationConfig {
        let channel = ChannelConfig {
            activation_gates: self.channel.activation_gates,
            inactivation_gates: self.channel.inactivation_gates,
            reversal_potential: mv_to_v(self.channel.reversal_potential_mv),
            conductance: ps_to_s(self.channel.conductance_ps),
            initial_state: self.channel.initial_state,
        };
        let protocol = ClampProtocol {
            holding_potential: mv_to_v(self.clamp.holding_potential_mv),
            step_potential: mv_to_v(self.clamp.step_potential_mv),
            step_delay: ms_to_s(self.clamp.step_delay_ms),
        };
        SimulationConfig {
            max_events: self.max_events,
            ..SimulationConfig::new(channel, protocol, ms_to_s(self.total_duration_ms))
        }
    }

    /// Build the SI rate model.
    pub fn rate_model(&self) -> ThresholdRates {
        self.rates.to_rate_model()
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self::new()
    }
}
