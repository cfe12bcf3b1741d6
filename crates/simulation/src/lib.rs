//! Discrete-event stochastic gating simulator.
//!
//! Simulates one voltage-clamped ion channel made of independent two-state
//! gates. Each gate flips after an exponentially distributed waiting time whose
//! rate depends on the clamp voltage; the channel conducts only while every
//! gate is open. Given the same seed, a run produces identical results.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                   GatingSimulator                       │
//! │                                                         │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │   Event Queue (BinaryHeap<Reverse<Scheduled>>)     │ │
//! │  │   Ordered by: time, registration rank              │ │
//! │  │   m gates < h gates < voltage step < end           │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │ earliest candidate          │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │   ChannelState: gates, clamp voltage               │ │
//! │  │   open = AND(gates), I = open·(V − E_rev)·g        │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │                             │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │   Trajectories: doubled samples at every event     │ │
//! │  │   RateModel → redraw the affected gate clocks      │ │
//! │  └────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use singlechannel_simulation::{GatingSimulator, SimulationConfig, ThresholdRates};
//!
//! let simulator = GatingSimulator::new(SimulationConfig::default(), ThresholdRates::default());
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let run = simulator.run(&mut rng).unwrap();
//! assert_eq!(run.voltage.last().unwrap().time, 4e-3);
//! ```

mod config;
mod error;
mod event_queue;
mod rates;
mod run;
mod sequence;
mod simulator;

pub use config::{ChannelConfig, ClampProtocol, InitialGateState, SimulationConfig};
pub use error::SimulationError;
pub use rates::{ConstantRates, FnRates, GateRates, LevelRates, RateModel, ThresholdRates};
pub use run::{EventKind, GateTrace, GatingEvent, GatingRun};
pub use sequence::{RunSequence, RunTicket};
pub use simulator::GatingSimulator;
