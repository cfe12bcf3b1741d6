//! Single-Channel Simulator CLI
//!
//! Runs voltage-clamp sweeps on a stochastically gated channel and reports
//! gating statistics.

use clap::{Parser, Subcommand};
use singlechannel_simulation::InitialGateState;
use singlechannel_simulator::{Simulator, SimulatorConfig, TraceExport};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "singlechannel-sim")]
#[command(about = "Stochastic single-channel voltage-clamp simulator")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run sweeps and print a summary
    Run {
        /// Experiment file (TOML); flags override its values
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Random seed
        #[arg(long)]
        seed: Option<u64>,

        /// Number of sweeps
        #[arg(long)]
        sweeps: Option<usize>,

        /// Number of activation (m) gates
        #[arg(long)]
        activation_gates: Option<usize>,

        /// Number of inactivation (h) gates
        #[arg(long)]
        inactivation_gates: Option<usize>,

        /// Reversal potential (mV)
        #[arg(long, allow_hyphen_values = true)]
        reversal_mv: Option<f64>,

        /// Open channel conductance (pS)
        #[arg(long)]
        conductance_ps: Option<f64>,

        /// Holding potential (mV)
        #[arg(long, allow_hyphen_values = true)]
        holding_mv: Option<f64>,

        /// Step potential (mV)
        #[arg(long, allow_hyphen_values = true)]
        step_mv: Option<f64>,

        /// Step delay (ms)
        #[arg(long)]
        step_delay_ms: Option<f64>,

        /// Sweep duration (ms)
        #[arg(short, long)]
        duration_ms: Option<f64>,

        /// Start with inactivation gates open
        #[arg(long)]
        resting: bool,

        /// Write the last sweep's traces as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the effective configuration as TOML
    ShowConfig {
        /// Experiment file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn load_config(path: Option<PathBuf>) -> Result<SimulatorConfig, Box<dyn std::error::Error>> {
    Ok(match path {
        Some(path) => SimulatorConfig::load(path)?,
        None => SimulatorConfig::default(),
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::ShowConfig { config } => {
            // No tracing here, output goes to stdout
            print!("{}", load_config(config)?.to_toml_string()?);
        }

        Commands::Run {
            config,
            seed,
            sweeps,
            activation_gates,
            inactivation_gates,
            reversal_mv,
            conductance_ps,
            holding_mv,
            step_mv,
            step_delay_ms,
            duration_ms,
            resting,
            output,
        } => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
                )
                .init();

            let mut config = load_config(config)?;
            if let Some(seed) = seed {
                config = config.with_seed(seed);
            }
            if let Some(sweeps) = sweeps {
                config = config.with_sweeps(sweeps);
            }
            let activation = activation_gates.unwrap_or(config.channel.activation_gates);
            let inactivation = inactivation_gates.unwrap_or(config.channel.inactivation_gates);
            config = config.with_gates(activation, inactivation);
            if let Some(mv) = reversal_mv {
                config = config.with_reversal_potential_mv(mv);
            }
            if let Some(ps) = conductance_ps {
                config = config.with_conductance_ps(ps);
            }
            if let Some(mv) = holding_mv {
                config = config.with_holding_potential_mv(mv);
            }
            let delay_ms = step_delay_ms.unwrap_or(config.clamp.step_delay_ms);
            let potential_mv = step_mv.unwrap_or(config.clamp.step_potential_mv);
            config = config.with_step(delay_ms, potential_mv);
            if let Some(ms) = duration_ms {
                config = config.with_total_duration_ms(ms);
            }
            if resting {
                config = config.with_initial_state(InitialGateState::Resting);
            }

            let mut simulator = Simulator::new(config)?;
            let outcome = simulator.run()?;
            outcome.report.print();

            if let (Some(path), Some(run)) = (output, &outcome.last_run) {
                TraceExport::from_run(run).write_json(&path)?;
                println!("Traces written to {}", path.display());
            }
        }
    }

    Ok(())
}
