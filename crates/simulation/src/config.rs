//! Configuration types for a gating run.
//!
//! All quantities are SI: seconds, volts, siemens.

use crate::error::SimulationError;
use serde::{Deserialize, Serialize};
use singlechannel_types::{GateClass, GateId, GateState};

/// How gates are set at t = 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialGateState {
    /// Every gate starts closed, so the channel starts closed.
    #[default]
    AllClosed,

    /// Activation gates start closed, inactivation gates start open.
    ///
    /// This is the resting condition of a sodium-like channel held at a
    /// hyperpolarized potential.
    Resting,
}

impl InitialGateState {
    /// Initial state of a gate of the given class.
    pub fn state_for(self, class: GateClass) -> GateState {
        match (self, class) {
            (InitialGateState::AllClosed, _) => GateState::Closed,
            (InitialGateState::Resting, GateClass::Activation) => GateState::Closed,
            (InitialGateState::Resting, GateClass::Inactivation) => GateState::Open,
        }
    }
}

/// Channel composition and conductance properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Number of activation (`m`) gates.
    pub activation_gates: usize,

    /// Number of inactivation (`h`) gates.
    pub inactivation_gates: usize,

    /// Reversal potential in volts.
    pub reversal_potential: f64,

    /// Open-channel conductance in siemens.
    pub conductance: f64,

    /// Gate states at t = 0.
    #[serde(default)]
    pub initial_state: InitialGateState,
}

impl ChannelConfig {
    /// Total number of gates.
    pub fn gate_count(&self) -> usize {
        self.activation_gates + self.inactivation_gates
    }

    /// Gate identifiers in registration order: activation gates first.
    pub fn gate_ids(&self) -> impl Iterator<Item = GateId> {
        let activation = (0..self.activation_gates).map(GateId::activation);
        let inactivation = (0..self.inactivation_gates).map(GateId::inactivation);
        activation.chain(inactivation)
    }

    /// Ohmic single-channel current in amperes.
    pub fn current(&self, channel_open: bool, voltage: f64) -> f64 {
        let open = if channel_open { 1.0 } else { 0.0 };
        open * (voltage - self.reversal_potential) * self.conductance
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            activation_gates: 3,
            inactivation_gates: 1,
            reversal_potential: 0.0,
            conductance: 10e-12,
            initial_state: InitialGateState::default(),
        }
    }
}

/// Two-level voltage clamp: holding potential, then a single step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClampProtocol {
    /// Holding potential in volts.
    pub holding_potential: f64,

    /// Step potential in volts.
    pub step_potential: f64,

    /// Time of the step in seconds.
    pub step_delay: f64,
}

impl ClampProtocol {
    /// Command voltage at time `t`.
    pub fn voltage_at(&self, t: f64) -> f64 {
        if t < self.step_delay {
            self.holding_potential
        } else {
            self.step_potential
        }
    }
}

impl Default for ClampProtocol {
    fn default() -> Self {
        Self {
            holding_potential: -0.100,
            step_potential: 0.100,
            step_delay: 0.5e-3,
        }
    }
}

/// Configuration for one gating run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Channel properties.
    pub channel: ChannelConfig,

    /// Voltage clamp protocol.
    pub protocol: ClampProtocol,

    /// Simulation end time in seconds.
    pub total_duration: f64,

    /// Upper bound on the number of events in one run.
    ///
    /// `None` means unbounded. A run that reaches the bound fails instead of
    /// returning a truncated trajectory.
    #[serde(default)]
    pub max_events: Option<u64>,
}

impl SimulationConfig {
    /// Create a configuration from its parts.
    pub fn new(channel: ChannelConfig, protocol: ClampProtocol, total_duration: f64) -> Self {
        Self {
            channel,
            protocol,
            total_duration,
            max_events: None,
        }
    }

    /// Set the gate counts.
    pub fn with_gates(mut self, activation: usize, inactivation: usize) -> Self {
        self.channel.activation_gates = activation;
        self.channel.inactivation_gates = inactivation;
        self
    }

    /// Set the reversal potential (volts).
    pub fn with_reversal_potential(mut self, volts: f64) -> Self {
        self.channel.reversal_potential = volts;
        self
    }

    /// Set the open-channel conductance (siemens).
    pub fn with_conductance(mut self, siemens: f64) -> Self {
        self.channel.conductance = siemens;
        self
    }

    /// Set the initial gate states.
    pub fn with_initial_state(mut self, initial_state: InitialGateState) -> Self {
        self.channel.initial_state = initial_state;
        self
    }

    /// Set the holding potential (volts).
    pub fn with_holding_potential(mut self, volts: f64) -> Self {
        self.protocol.holding_potential = volts;
        self
    }

    /// Set the step potential (volts).
    pub fn with_step_potential(mut self, volts: f64) -> Self {
        self.protocol.step_potential = volts;
        self
    }

    /// Set the step delay (seconds).
    pub fn with_step_delay(mut self, seconds: f64) -> Self {
        self.protocol.step_delay = seconds;
        self
    }

    /// Set the total duration (seconds).
    pub fn with_total_duration(mut self, seconds: f64) -> Self {
        self.total_duration = seconds;
        self
    }

    /// Bound the number of events in one run.
    pub fn with_max_events(mut self, max_events: u64) -> Self {
        self.max_events = Some(max_events);
        self
    }

    /// Whether the voltage step happens within the run.
    pub fn step_within_run(&self) -> bool {
        self.protocol.step_delay < self.total_duration
    }

    /// Check the configuration contract.
    pub fn validate(&self) -> Result<(), SimulationError> {
        let finite = [
            ("reversal_potential", self.channel.reversal_potential),
            ("conductance", self.channel.conductance),
            ("holding_potential", self.protocol.holding_potential),
            ("step_potential", self.protocol.step_potential),
            ("step_delay", self.protocol.step_delay),
            ("total_duration", self.total_duration),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(SimulationError::NonFiniteParameter { name, value });
            }
        }

        if self.total_duration < 0.0 {
            return Err(SimulationError::NegativeDuration(self.total_duration));
        }
        if self.protocol.step_delay < 0.0 {
            return Err(SimulationError::NegativeStepDelay(self.protocol.step_delay));
        }

        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new(ChannelConfig::default(), ClampProtocol::default(), 4e-3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.channel.gate_count(), 4);
        assert!(config.step_within_run());
    }

    #[test]
    fn test_gate_ids_registration_order() {
        let config = SimulationConfig::default().with_gates(2, 1);
        let ids: Vec<GateId> = config.channel.gate_ids().collect();
        assert_eq!(
            ids,
            vec![
                GateId::activation(0),
                GateId::activation(1),
                GateId::inactivation(0)
            ]
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let negative = SimulationConfig::default().with_total_duration(-1.0);
        assert_eq!(
            negative.validate(),
            Err(SimulationError::NegativeDuration(-1.0))
        );

        let nan = SimulationConfig::default().with_step_potential(f64::NAN);
        assert!(matches!(
            nan.validate(),
            Err(SimulationError::NonFiniteParameter {
                name: "step_potential",
                ..
            })
        ));

        let step = SimulationConfig::default().with_step_delay(-0.1);
        assert_eq!(step.validate(), Err(SimulationError::NegativeStepDelay(-0.1)));
    }

    #[test]
    fn test_zero_duration_is_valid() {
        let config = SimulationConfig::default().with_total_duration(0.0);
        assert!(config.validate().is_ok());
        assert!(!config.step_within_run());
    }

    #[test]
    fn test_initial_state_and_current() {
        assert_eq!(
            InitialGateState::Resting.state_for(GateClass::Inactivation),
            GateState::Open
        );
        assert_eq!(
            InitialGateState::AllClosed.state_for(GateClass::Inactivation),
            GateState::Closed
        );

        let channel = ChannelConfig {
            reversal_potential: 0.25,
            conductance: 2.0,
            ..Default::default()
        };
        assert_eq!(channel.current(false, 1.0), 0.0);
        assert_eq!(channel.current(true, 0.75), 1.0);
    }

    #[test]
    fn test_protocol_voltage_at() {
        let protocol = ClampProtocol::default();
        assert_eq!(protocol.voltage_at(0.0), -0.100);
        assert_eq!(protocol.voltage_at(0.5e-3), 0.100);
    }
}
