//! Experiment runner.

use crate::config::SimulatorConfig;
use crate::error::HarnessError;
use crate::metrics::{MetricsCollector, SimulationReport};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use singlechannel_simulation::{GatingRun, GatingSimulator, RunSequence, ThresholdRates};
use tracing::{debug, info, warn};

/// Result of an experiment: statistics over all sweeps plus the last sweep's
/// traces.
#[derive(Debug)]
pub struct ExperimentOutcome {
    pub report: SimulationReport,
    pub last_run: Option<GatingRun>,
}

/// Runs sweeps of one voltage-clamp protocol.
///
/// All sweeps draw from a single ChaCha8 stream seeded from the config, so an
/// experiment is reproducible given its seed.
pub struct Simulator {
    config: SimulatorConfig,
    simulator: GatingSimulator<ThresholdRates>,
    rng: ChaCha8Rng,
    sequence: RunSequence,
}

impl Simulator {
    /// Create a runner, validating the configuration up front.
    pub fn new(config: SimulatorConfig) -> Result<Self, HarnessError> {
        let simulation_config = config.to_simulation_config();
        simulation_config.validate()?;

        info!(
            seed = config.seed,
            sweeps = config.sweeps,
            activation_gates = config.channel.activation_gates,
            inactivation_gates = config.channel.inactivation_gates,
            "Creating single-channel simulator"
        );

        Ok(Self {
            simulator: GatingSimulator::new(simulation_config, config.rate_model()),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            sequence: RunSequence::new(),
            config,
        })
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Run sequence shared with anyone who may start a superseding run.
    pub fn sequence(&self) -> &RunSequence {
        &self.sequence
    }

    /// Run one sweep.
    ///
    /// Returns `Ok(None)` if a newer run was started through [`Self::sequence`]
    /// while this one was in progress.
    pub fn run_sweep(&mut self) -> Result<Option<GatingRun>, HarnessError> {
        let ticket = self.sequence.begin();
        let run = self.simulator.run(&mut self.rng)?;
        debug!(
            run = ticket.id(),
            events = run.events.len(),
            "Sweep finished"
        );
        Ok(ticket.publish(run))
    }

    /// Run the configured number of sweeps.
    pub fn run(&mut self) -> Result<ExperimentOutcome, HarnessError> {
        self.run_sweeps(self.config.sweeps)
    }

    /// Run `sweeps` sweeps, collecting statistics.
    pub fn run_sweeps(&mut self, sweeps: usize) -> Result<ExperimentOutcome, HarnessError> {
        let mut collector = MetricsCollector::new(self.simulator.config().protocol.step_delay)?;
        let mut last_run = None;

        for sweep in 0..sweeps {
            let Some(run) = self.run_sweep()? else {
                warn!(sweep, "Superseded by a newer run, stopping");
                break;
            };
            let summary = collector.record(&run);
            debug!(
                sweep,
                transitions = summary.transitions,
                openings = summary.openings,
                "Recorded sweep"
            );
            last_run = Some(run);
        }

        let report = collector.finish();
        info!(
            sweeps = report.sweep_count(),
            openings = report.total_openings(),
            "Experiment complete"
        );
        Ok(ExperimentOutcome { report, last_run })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use singlechannel_simulation::SimulationError;
    use tracing_test::traced_test;

    #[traced_test]
    #[test]
    fn test_same_seed_same_experiment() {
        let config = SimulatorConfig::new().with_seed(42).with_sweeps(3);
        let a = Simulator::new(config.clone()).unwrap().run().unwrap();
        let b = Simulator::new(config).unwrap().run().unwrap();

        assert_eq!(a.report.sweeps, b.report.sweeps);
        assert_eq!(a.last_run, b.last_run);
        assert_eq!(a.report.sweep_count(), 3);
    }

    #[traced_test]
    #[test]
    fn test_sweeps_differ_within_experiment() {
        let mut simulator = Simulator::new(SimulatorConfig::new().with_seed(3)).unwrap();
        let first = simulator.run_sweep().unwrap().unwrap();
        let second = simulator.run_sweep().unwrap().unwrap();
        assert_ne!(first.events, second.events);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimulatorConfig::new().with_total_duration_ms(-1.0);
        let err = Simulator::new(config).err().unwrap();
        assert!(matches!(
            err,
            HarnessError::Simulation(SimulationError::NegativeDuration(_))
        ));
    }

    #[test]
    fn test_sequence_advances_per_sweep() {
        let mut simulator = Simulator::new(SimulatorConfig::new()).unwrap();
        simulator.run_sweeps(2).unwrap();
        assert_eq!(simulator.sequence().latest(), 2);
    }
}
