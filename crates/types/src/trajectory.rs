//! Piecewise-constant trajectories.
//!
//! A trajectory is recorded in the doubled-sample form: every jump appends
//! two samples sharing the same time, the first holding the value before the
//! jump and the second the value after it. A plotting collaborator can draw
//! the samples as a polyline and get vertical edges without interpolation.
//!
//! The same data is also available as a list of [`Step`]s, one per recorded
//! instant, which is the semantic form (value after the instant plus whether
//! the value actually changed there). Instants that share a time stay
//! separate entries.

use serde::{Deserialize, Serialize};

/// A single recorded point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub time: f64,
    pub value: f64,
}

/// A discontinuity in a trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jump {
    pub time: f64,
    pub before: f64,
    pub after: f64,
}

/// Semantic view of one instant in a trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub time: f64,
    /// Value from this instant onwards.
    pub value: f64,
    /// Whether the value differs from the one held just before this entry.
    pub is_jump: bool,
}

/// Append-only step-function time series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trajectory {
    samples: Vec<Sample>,
}

impl Trajectory {
    /// Create an empty trajectory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a trajectory holding a single initial sample.
    pub fn starting_at(time: f64, value: f64) -> Self {
        Self {
            samples: vec![Sample { time, value }],
        }
    }

    /// Append a single sample.
    ///
    /// Times must be non-decreasing.
    pub fn push_sample(&mut self, time: f64, value: f64) {
        debug_assert!(
            self.samples.last().map_or(true, |s| s.time <= time),
            "trajectory times must be non-decreasing"
        );
        self.samples.push(Sample { time, value });
    }

    /// Append the doubled pair for an instant: the held value, then the new one.
    ///
    /// `before == after` is allowed and records a flat segment up to `time`.
    pub fn push_jump(&mut self, time: f64, before: f64, after: f64) {
        self.push_sample(time, before);
        self.push_sample(time, after);
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.time)
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.value)
    }

    /// Value of the step function at `time`.
    ///
    /// Right-continuous: at a jump time the value after the jump is returned.
    /// Returns `None` before the first sample.
    pub fn value_at(&self, time: f64) -> Option<f64> {
        let idx = self.samples.partition_point(|s| s.time <= time);
        if idx == 0 {
            None
        } else {
            Some(self.samples[idx - 1].value)
        }
    }

    /// All instants where the value changes.
    pub fn jumps(&self) -> Vec<Jump> {
        self.samples
            .windows(2)
            .filter(|w| w[0].time == w[1].time && w[0].value != w[1].value)
            .map(|w| Jump {
                time: w[1].time,
                before: w[0].value,
                after: w[1].value,
            })
            .collect()
    }

    /// Semantic view: the initial sample, then one entry per recorded pair.
    ///
    /// Events that share a time keep their own entries, so for a trajectory
    /// built with [`starting_at`](Self::starting_at) and
    /// [`push_jump`](Self::push_jump) the view is lossless and
    /// [`from_steps`](Self::from_steps) rebuilds it exactly.
    pub fn steps(&self) -> Vec<Step> {
        let Some((initial, rest)) = self.samples.split_first() else {
            return Vec::new();
        };

        let mut steps = vec![Step {
            time: initial.time,
            value: initial.value,
            is_jump: false,
        }];
        for pair in rest.chunks(2) {
            let before = pair[0];
            let after = pair[pair.len() - 1];
            steps.push(Step {
                time: after.time,
                value: after.value,
                is_jump: before.value != after.value,
            });
        }
        steps
    }

    /// Rebuild the doubled-sample form from a semantic view.
    ///
    /// The first step becomes a single sample, every later step a pair that
    /// starts from the value held before it.
    pub fn from_steps(steps: &[Step]) -> Self {
        let mut trajectory = Self::new();
        let mut held: Option<f64> = None;

        for step in steps {
            match held {
                None => trajectory.push_sample(step.time, step.value),
                Some(before) => trajectory.push_jump(step.time, before, step.value),
            }
            held = Some(step.value);
        }

        trajectory
    }

    /// Copy with time and value multiplied by the given factors.
    pub fn scaled(&self, time_scale: f64, value_scale: f64) -> Self {
        Self {
            samples: self
                .samples
                .iter()
                .map(|s| Sample {
                    time: s.time * time_scale,
                    value: s.value * value_scale,
                })
                .collect(),
        }
    }

    /// `[time, value]` pairs, the shape charting widgets consume.
    pub fn to_pairs(&self) -> Vec<[f64; 2]> {
        self.samples.iter().map(|s| [s.time, s.value]).collect()
    }
}
