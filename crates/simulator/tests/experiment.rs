//! End-to-end experiments: config file in, report and traces out.

use singlechannel_simulation::InitialGateState;
use singlechannel_simulator::{HarnessError, Simulator, SimulatorConfig, TraceExport};
use tracing_test::traced_test;

const EXPERIMENT: &str = r#"
seed = 2024
sweeps = 8
total_duration_ms = 6.0

[channel]
activation_gates = 3
inactivation_gates = 1
reversal_potential_mv = 0.0
conductance_ps = 10.0
initial_state = "resting"

[clamp]
holding_potential_mv = -100.0
step_delay_ms = 1.0
step_potential_mv = 20.0
"#;

#[traced_test]
#[test]
fn test_experiment_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("experiment.toml");
    std::fs::write(&path, EXPERIMENT).unwrap();

    let config = SimulatorConfig::load(&path).unwrap();
    assert_eq!(config.seed, 2024);
    assert_eq!(config.channel.initial_state, InitialGateState::Resting);

    let outcome = Simulator::new(config).unwrap().run().unwrap();
    assert_eq!(outcome.report.sweep_count(), 8);

    let run = outcome.last_run.expect("last sweep is kept");
    assert!((run.total_duration - 6e-3).abs() < 1e-12);
    assert_eq!(run.voltage.jumps().len(), 1);

    for sweep in &outcome.report.sweeps {
        assert!((0.0..=1.0).contains(&sweep.open_probability));
        // 10 pS across at most 100 mV from reversal is 1 pA.
        assert!(sweep.peak_current_pa <= 1.0 + 1e-9);
        if let Some(latency) = sweep.first_latency_ms {
            assert!(latency >= 0.0);
        }
    }
}

#[traced_test]
#[test]
fn test_experiment_is_reproducible() {
    let config = SimulatorConfig::from_toml_str(EXPERIMENT).unwrap();
    let a = Simulator::new(config.clone()).unwrap().run().unwrap();
    let b = Simulator::new(config).unwrap().run().unwrap();
    assert_eq!(a.report.sweeps, b.report.sweeps);
    assert_eq!(a.last_run, b.last_run);
}

#[traced_test]
#[test]
fn test_trace_export_written_to_disk() {
    let config = SimulatorConfig::new().with_seed(5);
    let outcome = Simulator::new(config).unwrap().run().unwrap();
    let run = outcome.last_run.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.json");
    TraceExport::from_run(&run).write_json(&path).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let voltage = json["voltage_mv"].as_array().unwrap();
    assert_eq!(voltage.len(), run.sample_count());
    assert_eq!(voltage[0][0].as_f64(), Some(0.0));
    assert_eq!(json["activation_gates"].as_array().unwrap().len(), 3);
    assert_eq!(json["inactivation_gates"].as_array().unwrap().len(), 1);
}

#[test]
fn test_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = SimulatorConfig::load(dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(err, HarnessError::Io { .. }));
}
