//! Per-sweep summaries and experiment-wide statistics.

use crate::error::HarnessError;
use hdrhistogram::Histogram;
use singlechannel_simulation::GatingRun;
use singlechannel_types::units::{a_to_pa, s_to_ms, s_to_us};

/// Summary of one sweep.
#[derive(Clone, Debug, PartialEq)]
pub struct SweepSummary {
    /// Sweep number, starting at 0.
    pub sweep: usize,

    /// Number of gate transitions.
    pub transitions: usize,

    /// Number of channel openings.
    pub openings: usize,

    /// Fraction of the sweep the channel spent open.
    pub open_probability: f64,

    /// Delay from the voltage step to the first opening (ms).
    pub first_latency_ms: Option<f64>,

    /// Largest current magnitude (pA).
    pub peak_current_pa: f64,

    /// Durations of openings that closed before the end of the sweep (µs).
    pub open_dwell_times_us: Vec<f64>,
}

impl SweepSummary {
    /// Summarize a run. `step_delay` is in seconds.
    pub fn from_run(sweep: usize, run: &GatingRun, step_delay: f64) -> Self {
        let intervals = run.channel_open_intervals();

        let first_latency_ms = if step_delay < run.total_duration {
            intervals
                .iter()
                .find(|(start, _)| *start >= step_delay)
                .map(|(start, _)| s_to_ms(start - step_delay))
        } else {
            None
        };

        let open_dwell_times_us = intervals
            .iter()
            .filter(|(_, end)| *end < run.total_duration)
            .map(|(start, end)| s_to_us(end - start))
            .collect();

        let peak_current = run.current.values().map(f64::abs).fold(0.0, f64::max);

        Self {
            sweep,
            transitions: run.transition_count(),
            openings: intervals.len(),
            open_probability: run.open_probability(),
            first_latency_ms,
            peak_current_pa: a_to_pa(peak_current),
            open_dwell_times_us,
        }
    }
}

/// Collects sweep summaries while an experiment runs.
pub struct MetricsCollector {
    step_delay: f64,
    sweeps: Vec<SweepSummary>,
    dwell_times: Histogram<u64>,
}

impl MetricsCollector {
    /// Create a collector. `step_delay` is in seconds.
    pub fn new(step_delay: f64) -> Result<Self, HarnessError> {
        Ok(Self {
            step_delay,
            sweeps: Vec::new(),
            dwell_times: Histogram::new(3)?,
        })
    }

    /// Summarize and record one sweep.
    pub fn record(&mut self, run: &GatingRun) -> SweepSummary {
        let summary = SweepSummary::from_run(self.sweeps.len(), run, self.step_delay);
        for dwell in &summary.open_dwell_times_us {
            self.dwell_times.saturating_record(dwell.round() as u64);
        }
        self.sweeps.push(summary.clone());
        summary
    }

    /// Finish collection.
    pub fn finish(self) -> SimulationReport {
        SimulationReport {
            sweeps: self.sweeps,
            dwell_times: self.dwell_times,
        }
    }
}

/// Statistics across all sweeps of an experiment.
#[derive(Clone, Debug)]
pub struct SimulationReport {
    /// Per-sweep summaries in run order.
    pub sweeps: Vec<SweepSummary>,

    /// Completed open dwell times (µs).
    dwell_times: Histogram<u64>,
}

impl SimulationReport {
    /// Number of sweeps recorded.
    pub fn sweep_count(&self) -> usize {
        self.sweeps.len()
    }

    /// Open probability averaged over sweeps.
    pub fn mean_open_probability(&self) -> f64 {
        if self.sweeps.is_empty() {
            return 0.0;
        }
        self.sweeps.iter().map(|s| s.open_probability).sum::<f64>() / self.sweeps.len() as f64
    }

    /// Total channel openings over all sweeps.
    pub fn total_openings(&self) -> usize {
        self.sweeps.iter().map(|s| s.openings).sum()
    }

    /// Total gate transitions over all sweeps.
    pub fn total_transitions(&self) -> usize {
        self.sweeps.iter().map(|s| s.transitions).sum()
    }

    /// Mean first-opening latency over the sweeps that opened after the step (ms).
    pub fn mean_first_latency_ms(&self) -> Option<f64> {
        let latencies: Vec<f64> = self
            .sweeps
            .iter()
            .filter_map(|s| s.first_latency_ms)
            .collect();
        if latencies.is_empty() {
            None
        } else {
            Some(latencies.iter().sum::<f64>() / latencies.len() as f64)
        }
    }

    /// Number of completed openings in the dwell-time histogram.
    pub fn completed_openings(&self) -> u64 {
        self.dwell_times.len()
    }

    /// Open dwell time at the given percentile (0–100), in µs.
    pub fn dwell_percentile_us(&self, percentile: f64) -> Option<u64> {
        if self.dwell_times.is_empty() {
            None
        } else {
            Some(self.dwell_times.value_at_percentile(percentile))
        }
    }

    /// Mean open dwell time in µs.
    pub fn mean_dwell_us(&self) -> Option<f64> {
        if self.dwell_times.is_empty() {
            None
        } else {
            Some(self.dwell_times.mean())
        }
    }

    /// Print a summary to stdout.
    pub fn print(&self) {
        println!("=== Single-channel experiment ===");
        println!("Sweeps:               {}", self.sweep_count());
        println!("Gate transitions:     {}", self.total_transitions());
        println!("Channel openings:     {}", self.total_openings());
        println!("Mean open prob.:      {:.4}", self.mean_open_probability());
        match self.mean_first_latency_ms() {
            Some(latency) => println!("Mean first latency:   {:.4} ms", latency),
            None => println!("Mean first latency:   n/a"),
        }
        match (
            self.mean_dwell_us(),
            self.dwell_percentile_us(50.0),
            self.dwell_percentile_us(99.0),
        ) {
            (Some(mean), Some(p50), Some(p99)) => println!(
                "Open dwell (µs):      mean {:.1}, p50 {}, p99 {} (n = {})",
                mean,
                p50,
                p99,
                self.completed_openings()
            ),
            _ => println!("Open dwell (µs):      n/a"),
        }
        for sweep in &self.sweeps {
            println!(
                "  sweep {:>3}: {:>4} transitions, {:>3} openings, P(open) {:.4}, peak {:.3} pA",
                sweep.sweep,
                sweep.transitions,
                sweep.openings,
                sweep.open_probability,
                sweep.peak_current_pa
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use singlechannel_simulation::{EventKind, GatingEvent};
    use singlechannel_types::Trajectory;

    /// A 4 s run whose channel is open during [1, 2) and [3, 4].
    fn two_openings() -> GatingRun {
        let mut open = Trajectory::starting_at(0.0, 0.0);
        let mut current = Trajectory::starting_at(0.0, 0.0);
        for (t, before, after) in [(1.0, 0.0, 1.0), (2.0, 1.0, 0.0), (3.0, 0.0, 1.0), (4.0, 1.0, 1.0)] {
            open.push_jump(t, before, after);
            current.push_jump(t, -2e-12 * before, -2e-12 * after);
        }
        GatingRun {
            total_duration: 4.0,
            voltage: Trajectory::starting_at(0.0, -0.1),
            current,
            channel_open: open,
            gates: Vec::new(),
            events: vec![GatingEvent {
                time: 4.0,
                kind: EventKind::End,
            }],
        }
    }

    #[test]
    fn test_sweep_summary() {
        let summary = SweepSummary::from_run(0, &two_openings(), 0.5);
        assert_eq!(summary.openings, 2);
        assert_eq!(summary.open_probability, 0.5);
        assert!((summary.first_latency_ms.unwrap() - 500.0).abs() < 1e-9);
        assert!((summary.peak_current_pa - 2.0).abs() < 1e-9);
        // The second opening runs into the end of the sweep and is censored.
        assert_eq!(summary.open_dwell_times_us.len(), 1);
        assert!((summary.open_dwell_times_us[0] - 1e6).abs() < 1e-6);
    }

    #[test]
    fn test_no_latency_without_step() {
        let summary = SweepSummary::from_run(0, &two_openings(), 4.0);
        assert_eq!(summary.first_latency_ms, None);
    }

    #[test]
    fn test_report_aggregates() {
        let mut collector = MetricsCollector::new(0.5).unwrap();
        let first = collector.record(&two_openings());
        let second = collector.record(&two_openings());
        assert_eq!((first.sweep, second.sweep), (0, 1));
        let report = collector.finish();
        assert_eq!(report.sweeps, vec![first, second]);

        assert_eq!(report.sweep_count(), 2);
        assert_eq!(report.total_openings(), 4);
        assert_eq!(report.mean_open_probability(), 0.5);
        assert!((report.mean_first_latency_ms().unwrap() - 500.0).abs() < 1e-9);
        assert_eq!(report.completed_openings(), 2);
        let p50 = report.dwell_percentile_us(50.0).unwrap();
        assert!(p50.abs_diff(1_000_000) <= 1_000, "p50 = {p50}");
    }

    #[test]
    fn test_empty_report() {
        let report = MetricsCollector::new(0.0).unwrap().finish();
        assert_eq!(report.mean_open_probability(), 0.0);
        assert_eq!(report.dwell_percentile_us(50.0), None);
        assert_eq!(report.mean_dwell_us(), None);
    }
}
