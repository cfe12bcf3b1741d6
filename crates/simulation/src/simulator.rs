//! Race-of-exponential-clocks gating simulator.
//!
//! Each gate is a two-state process that flips after an exponentially
//! distributed waiting time whose rate depends on the clamp voltage. The
//! voltage step and the end of the run are deterministic events on the same
//! timeline. At every iteration the earliest pending candidate wins, time
//! jumps to it, and every trajectory records the doubled sample pair.
//!
//! Candidates live in an [`EventQueue`]. A gate's candidate is drawn when the
//! gate last changed or when the voltage last changed, whichever is later;
//! because exponential clocks are memoryless this has the same law as
//! redrawing every clock at every event.

use crate::config::SimulationConfig;
use crate::error::SimulationError;
use crate::event_queue::{EventQueue, EventSource};
use crate::rates::RateModel;
use crate::run::{EventKind, GateTrace, GatingEvent, GatingRun};
use rand::distributions::Open01;
use rand::Rng;
use singlechannel_types::{GateId, GateState, Trajectory};
use tracing::{debug, trace};

/// Mutable state of the channel during a run.
#[derive(Debug, Clone)]
struct ChannelState {
    gates: Vec<GateState>,
    voltage: f64,
    open: bool,
    current: f64,
}

impl ChannelState {
    fn initial(config: &SimulationConfig, gate_ids: &[GateId]) -> Self {
        let initial = config.channel.initial_state;
        let mut state = Self {
            gates: gate_ids.iter().map(|id| initial.state_for(id.class)).collect(),
            voltage: config.protocol.holding_potential,
            open: false,
            current: 0.0,
        };
        state.recompute(config);
        state
    }

    /// Re-derive channel-open and current from the gates and the voltage.
    fn recompute(&mut self, config: &SimulationConfig) {
        self.open = self.gates.iter().all(|g| g.is_open());
        self.current = config.channel.current(self.open, self.voltage);
    }
}

/// Appends to every trajectory in lockstep.
struct Recorder {
    voltage: Trajectory,
    current: Trajectory,
    channel_open: Trajectory,
    gates: Vec<Trajectory>,
}

impl Recorder {
    fn new(state: &ChannelState) -> Self {
        Self {
            voltage: Trajectory::starting_at(0.0, state.voltage),
            current: Trajectory::starting_at(0.0, state.current),
            channel_open: Trajectory::starting_at(0.0, GateState::from_open(state.open).as_f64()),
            gates: state
                .gates
                .iter()
                .map(|g| Trajectory::starting_at(0.0, g.as_f64()))
                .collect(),
        }
    }

    /// Record the pair at `time`: held values, then the values of `state`.
    fn record(&mut self, time: f64, state: &ChannelState) {
        push_pair(&mut self.voltage, time, state.voltage);
        push_pair(&mut self.current, time, state.current);
        push_pair(
            &mut self.channel_open,
            time,
            GateState::from_open(state.open).as_f64(),
        );
        for (trajectory, gate) in self.gates.iter_mut().zip(&state.gates) {
            push_pair(trajectory, time, gate.as_f64());
        }
    }

    fn finish(self, gate_ids: &[GateId], events: Vec<GatingEvent>, total_duration: f64) -> GatingRun {
        GatingRun {
            total_duration,
            voltage: self.voltage,
            current: self.current,
            channel_open: self.channel_open,
            gates: gate_ids
                .iter()
                .zip(self.gates)
                .map(|(&id, trajectory)| GateTrace { id, trajectory })
                .collect(),
            events,
        }
    }
}

fn push_pair(trajectory: &mut Trajectory, time: f64, after: f64) {
    let before = trajectory.last().map_or(after, |s| s.value);
    trajectory.push_jump(time, before, after);
}

/// Single-channel gating simulator.
///
/// Holds the run configuration and the rate model; each call to
/// [`run`](Self::run) is an independent run that owns all of its state.
#[derive(Debug, Clone)]
pub struct GatingSimulator<M> {
    config: SimulationConfig,
    rates: M,
}

impl<M: RateModel> GatingSimulator<M> {
    /// Create a simulator for the given configuration and rate model.
    pub fn new(config: SimulationConfig, rates: M) -> Self {
        Self { config, rates }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn rates(&self) -> &M {
        &self.rates
    }

    /// Run one simulation from t = 0 to the configured total duration.
    ///
    /// `rng` supplies the uniform draws; seed it for reproducible runs.
    ///
    /// # Errors
    ///
    /// Fails without producing any trajectory if the configuration is
    /// invalid, the rate model returns a negative or NaN rate, or the event
    /// budget is exhausted.
    pub fn run(&self, rng: &mut impl Rng) -> Result<GatingRun, SimulationError> {
        self.config.validate()?;

        let config = &self.config;
        let gate_ids: Vec<GateId> = config.channel.gate_ids().collect();
        let mut state = ChannelState::initial(config, &gate_ids);
        let mut recorder = Recorder::new(&state);
        let mut events = Vec::new();

        debug!(
            activation_gates = config.channel.activation_gates,
            inactivation_gates = config.channel.inactivation_gates,
            total_duration = config.total_duration,
            "Starting gating run"
        );

        if config.total_duration == 0.0 {
            debug!("Zero-length run, recording initial state only");
            return Ok(recorder.finish(&gate_ids, events, config.total_duration));
        }

        let mut queue = EventQueue::new(gate_ids.len());
        for index in 0..gate_ids.len() {
            self.schedule_gate(&mut queue, &gate_ids, &state, index, 0.0, rng)?;
        }
        if config.step_within_run() {
            queue.schedule(EventSource::VoltageStep, config.protocol.step_delay);
        }
        queue.schedule(EventSource::End, config.total_duration);

        let mut fired: u64 = 0;

        while let Some((key, source)) = queue.pop() {
            let time = key.time;

            if source != EventSource::End {
                if let Some(limit) = config.max_events {
                    if fired >= limit {
                        return Err(SimulationError::EventBudgetExhausted { limit, time });
                    }
                }
                fired += 1;
            }

            let kind = match source {
                EventSource::Gate(index) => {
                    let next = state.gates[index].toggled();
                    state.gates[index] = next;
                    state.recompute(config);
                    recorder.record(time, &state);
                    self.schedule_gate(&mut queue, &gate_ids, &state, index, time, rng)?;

                    let gate = gate_ids[index];
                    match next {
                        GateState::Open => EventKind::GateOpened { gate },
                        GateState::Closed => EventKind::GateClosed { gate },
                    }
                }
                EventSource::VoltageStep => {
                    let from = state.voltage;
                    state.voltage = config.protocol.step_potential;
                    state.recompute(config);
                    recorder.record(time, &state);
                    for index in 0..gate_ids.len() {
                        self.schedule_gate(&mut queue, &gate_ids, &state, index, time, rng)?;
                    }
                    EventKind::VoltageStep {
                        from,
                        to: state.voltage,
                    }
                }
                EventSource::End => {
                    recorder.record(time, &state);
                    EventKind::End
                }
            };

            trace!(time, ?kind, open = state.open, "Event fired");
            events.push(GatingEvent { time, kind });

            if source == EventSource::End {
                break;
            }
        }

        debug!(
            events = events.len(),
            samples = recorder.voltage.len(),
            "Gating run complete"
        );

        Ok(recorder.finish(&gate_ids, events, config.total_duration))
    }

    /// Draw the next transition time of gate `index` from time `now`.
    ///
    /// The rate is evaluated at the clamp voltage currently in effect. A zero
    /// rate leaves the gate without a pending candidate; an infinite rate
    /// fires at `now` unless the reverse rate is infinite too.
    fn schedule_gate(
        &self,
        queue: &mut EventQueue,
        gate_ids: &[GateId],
        state: &ChannelState,
        index: usize,
        now: f64,
        rng: &mut impl Rng,
    ) -> Result<(), SimulationError> {
        let gate = gate_ids[index];
        let (rate, reverse_rate) = match state.gates[index] {
            GateState::Closed => (
                self.rates.opening_rate(gate.class, state.voltage),
                self.rates.closing_rate(gate.class, state.voltage),
            ),
            GateState::Open => (
                self.rates.closing_rate(gate.class, state.voltage),
                self.rates.opening_rate(gate.class, state.voltage),
            ),
        };

        if rate.is_nan() || rate < 0.0 {
            return Err(SimulationError::InvalidRate {
                gate,
                voltage: state.voltage,
                rate,
            });
        }

        // Both directions instantaneous: the gate never settles and time
        // never advances.
        if rate == f64::INFINITY && reverse_rate == f64::INFINITY {
            return Err(SimulationError::UnstableGate {
                gate,
                voltage: state.voltage,
                time: now,
            });
        }

        if rate == 0.0 {
            queue.cancel(EventSource::Gate(index));
            return Ok(());
        }

        let uniform: f64 = rng.sample(Open01);
        let wait = -uniform.ln() / rate;
        queue.schedule(EventSource::Gate(index), now + wait);
        Ok(())
    }
}
