//! Results of a gating run.

use serde::Serialize;
use singlechannel_types::{GateId, Trajectory};

/// Recorded trajectory of one gate (0 = closed, 1 = open).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GateTrace {
    pub id: GateId,
    pub trajectory: Trajectory,
}

/// What happened at an event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventKind {
    GateOpened { gate: GateId },
    GateClosed { gate: GateId },
    VoltageStep { from: f64, to: f64 },
    End,
}

/// An event that fired during a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GatingEvent {
    pub time: f64,
    #[serde(flatten)]
    pub kind: EventKind,
}

/// Output of one run: every tracked quantity as a step-function trajectory.
///
/// All trajectories share the same sample times. Values are SI: volts for
/// `voltage`, amperes for `current`, 0/1 for `channel_open` and the gates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GatingRun {
    pub total_duration: f64,
    pub voltage: Trajectory,
    pub current: Trajectory,
    pub channel_open: Trajectory,
    pub gates: Vec<GateTrace>,
    pub events: Vec<GatingEvent>,
}

impl GatingRun {
    /// Trace of a specific gate.
    pub fn gate(&self, id: GateId) -> Option<&GateTrace> {
        self.gates.iter().find(|g| g.id == id)
    }

    /// Number of samples per trajectory.
    pub fn sample_count(&self) -> usize {
        self.voltage.len()
    }

    /// Number of gate transitions.
    pub fn transition_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| {
                matches!(
                    e.kind,
                    EventKind::GateOpened { .. } | EventKind::GateClosed { .. }
                )
            })
            .count()
    }

    /// Intervals `(start, end)` during which the channel conducts.
    ///
    /// An opening still in progress at the end of the run is closed at
    /// `total_duration`.
    pub fn channel_open_intervals(&self) -> Vec<(f64, f64)> {
        let mut intervals = Vec::new();
        let mut opened_at: Option<f64> = None;

        for step in self.channel_open.steps() {
            let open = step.value != 0.0;
            match (opened_at, open) {
                (None, true) => opened_at = Some(step.time),
                (Some(start), false) => {
                    intervals.push((start, step.time));
                    opened_at = None;
                }
                _ => {}
            }
        }

        if let Some(start) = opened_at {
            if self.total_duration > start {
                intervals.push((start, self.total_duration));
            }
        }

        intervals
    }

    /// Total time the channel spent open.
    pub fn open_time(&self) -> f64 {
        self.channel_open_intervals()
            .iter()
            .map(|(start, end)| end - start)
            .sum()
    }

    /// Fraction of the run the channel spent open.
    pub fn open_probability(&self) -> f64 {
        if self.total_duration > 0.0 {
            self.open_time() / self.total_duration
        } else {
            0.0
        }
    }
}
