//! Trace export for plotting collaborators.
//!
//! Traces are written in display units as `[time, value]` pairs, ready to be
//! drawn as polylines; the doubled samples already encode the vertical jumps.

use crate::error::HarnessError;
use serde::Serialize;
use singlechannel_simulation::GatingRun;
use singlechannel_types::units::{MILLI, PICO};
use singlechannel_types::GateClass;
use std::path::Path;

/// One run's traces in display units.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TraceExport {
    /// Total duration (ms).
    pub total_duration_ms: f64,

    /// Clamp potential, `[ms, mV]`.
    pub voltage_mv: Vec<[f64; 2]>,

    /// Channel current, `[ms, pA]`.
    pub current_pa: Vec<[f64; 2]>,

    /// Channel open flag, `[ms, 0|1]`.
    pub channel_open: Vec<[f64; 2]>,

    /// Activation gate states, `[ms, 0|1]`, one series per gate.
    pub activation_gates: Vec<Vec<[f64; 2]>>,

    /// Inactivation gate states, `[ms, 0|1]`, one series per gate.
    pub inactivation_gates: Vec<Vec<[f64; 2]>>,
}

impl TraceExport {
    /// Convert a run from SI to display units.
    pub fn from_run(run: &GatingRun) -> Self {
        let ms = 1.0 / MILLI;
        let gates = |class: GateClass| {
            run.gates
                .iter()
                .filter(|g| g.id.class == class)
                .map(|g| g.trajectory.scaled(ms, 1.0).to_pairs())
                .collect()
        };

        Self {
            total_duration_ms: run.total_duration * ms,
            voltage_mv: run.voltage.scaled(ms, 1.0 / MILLI).to_pairs(),
            current_pa: run.current.scaled(ms, 1.0 / PICO).to_pairs(),
            channel_open: run.channel_open.scaled(ms, 1.0).to_pairs(),
            activation_gates: gates(GateClass::Activation),
            inactivation_gates: gates(GateClass::Inactivation),
        }
    }

    /// Render as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, HarnessError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write as JSON to `path`.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), HarnessError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?).map_err(|source| HarnessError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use singlechannel_simulation::{ConstantRates, GatingSimulator, SimulationConfig};

    #[test]
    fn test_export_units_and_shape() {
        let config = SimulationConfig::default().with_gates(2, 1);
        let simulator = GatingSimulator::new(config, ConstantRates::default());
        let run = simulator.run(&mut ChaCha8Rng::seed_from_u64(1)).unwrap();

        let export = TraceExport::from_run(&run);
        assert_eq!(export.activation_gates.len(), 2);
        assert_eq!(export.inactivation_gates.len(), 1);
        assert_eq!(export.voltage_mv.len(), run.sample_count());
        assert!((export.total_duration_ms - 4.0).abs() < 1e-9);
        assert!((export.voltage_mv[0][1] + 100.0).abs() < 1e-9);
        assert!((export.voltage_mv.last().unwrap()[1] - 100.0).abs() < 1e-9);

        let json = export.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["current_pa"].is_array());
        assert_eq!(value["activation_gates"].as_array().unwrap().len(), 2);
    }
}
