//! Pending-event queue for the gating race.
//!
//! Every event source owns at most one pending candidate. Candidates are kept
//! in a binary min-heap ordered by (time, registration rank); rescheduling or
//! cancelling a source bumps its generation, and stale heap entries are
//! discarded lazily when they surface.
//!
//! Registration ranks: gates `0..gate_count` (activation before
//! inactivation), then the voltage step, then the end of the run. On equal
//! times the lower rank fires first.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Where an event comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventSource {
    /// Gate at this position in registration order.
    Gate(usize),
    /// The clamp voltage step.
    VoltageStep,
    /// The end of the run.
    End,
}

/// Ordering key of a pending event.
#[derive(Debug, Clone, Copy)]
pub struct EventKey {
    pub time: f64,
    pub rank: usize,
}

impl PartialEq for EventKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for EventKey {}

impl Ord for EventKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .total_cmp(&other.time)
            .then_with(|| self.rank.cmp(&other.rank))
    }
}

impl PartialOrd for EventKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    key: EventKey,
    source: EventSource,
    generation: u64,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Scheduled {}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-queue of pending events, one slot per source.
#[derive(Debug)]
pub struct EventQueue {
    heap: BinaryHeap<Reverse<Scheduled>>,
    /// Current generation per slot; heap entries with an older one are stale.
    generations: Vec<u64>,
    pending: Vec<bool>,
    gate_count: usize,
}

impl EventQueue {
    /// Create an empty queue for `gate_count` gates plus the step and end sources.
    pub fn new(gate_count: usize) -> Self {
        let slots = gate_count + 2;
        Self {
            heap: BinaryHeap::with_capacity(slots),
            generations: vec![0; slots],
            pending: vec![false; slots],
            gate_count,
        }
    }

    /// Registration rank of a source.
    pub fn rank(&self, source: EventSource) -> usize {
        match source {
            EventSource::Gate(index) => {
                debug_assert!(index < self.gate_count, "gate index out of range");
                index
            }
            EventSource::VoltageStep => self.gate_count,
            EventSource::End => self.gate_count + 1,
        }
    }

    /// Set the candidate time of `source`, replacing any pending one.
    pub fn schedule(&mut self, source: EventSource, time: f64) {
        let rank = self.rank(source);
        self.generations[rank] += 1;
        self.pending[rank] = true;
        self.heap.push(Reverse(Scheduled {
            key: EventKey { time, rank },
            source,
            generation: self.generations[rank],
        }));
    }

    /// Drop the pending candidate of `source`, if any.
    pub fn cancel(&mut self, source: EventSource) {
        let rank = self.rank(source);
        self.generations[rank] += 1;
        self.pending[rank] = false;
    }

    /// Remove and return the earliest pending event.
    pub fn pop(&mut self) -> Option<(EventKey, EventSource)> {
        while let Some(Reverse(entry)) = self.heap.pop() {
            let rank = entry.key.rank;
            if entry.generation != self.generations[rank] || !self.pending[rank] {
                continue;
            }
            self.pending[rank] = false;
            return Some((entry.key, entry.source));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    impl EventQueue {
        fn len(&self) -> usize {
            self.pending.iter().filter(|p| **p).count()
        }

        fn is_empty(&self) -> bool {
            self.len() == 0
        }

        fn is_pending(&self, source: EventSource) -> bool {
            self.pending[self.rank(source)]
        }

        fn peek_time(&mut self) -> Option<f64> {
            while let Some(Reverse(entry)) = self.heap.peek() {
                let rank = entry.key.rank;
                if entry.generation == self.generations[rank] && self.pending[rank] {
                    return Some(entry.key.time);
                }
                self.heap.pop();
            }
            None
        }
    }

    #[test]
    fn test_pops_in_time_order() {
        let mut queue = EventQueue::new(2);
        queue.schedule(EventSource::End, 4.0);
        queue.schedule(EventSource::Gate(1), 1.5);
        queue.schedule(EventSource::VoltageStep, 0.5);
        queue.schedule(EventSource::Gate(0), 2.0);
        assert_eq!(queue.len(), 4);

        let order: Vec<EventSource> = std::iter::from_fn(|| queue.pop().map(|(_, s)| s)).collect();
        assert_eq!(
            order,
            vec![
                EventSource::VoltageStep,
                EventSource::Gate(1),
                EventSource::Gate(0),
                EventSource::End
            ]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_ties_follow_registration_order() {
        let mut queue = EventQueue::new(2);
        queue.schedule(EventSource::End, 1.0);
        queue.schedule(EventSource::VoltageStep, 1.0);
        queue.schedule(EventSource::Gate(1), 1.0);
        queue.schedule(EventSource::Gate(0), 1.0);

        let order: Vec<EventSource> = std::iter::from_fn(|| queue.pop().map(|(_, s)| s)).collect();
        assert_eq!(
            order,
            vec![
                EventSource::Gate(0),
                EventSource::Gate(1),
                EventSource::VoltageStep,
                EventSource::End
            ]
        );
    }

    #[test]
    fn test_reschedule_replaces_candidate() {
        let mut queue = EventQueue::new(1);
        queue.schedule(EventSource::Gate(0), 1.0);
        queue.schedule(EventSource::End, 3.0);
        queue.schedule(EventSource::Gate(0), 5.0);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.peek_time(), Some(3.0));

        let (key, source) = queue.pop().unwrap();
        assert_eq!(source, EventSource::End);
        assert_eq!(key.time, 3.0);

        let (key, source) = queue.pop().unwrap();
        assert_eq!(source, EventSource::Gate(0));
        assert_eq!(key.time, 5.0);
        assert!(queue.pop().is_none());
    }

    #[test]
    fn test_cancel_removes_candidate() {
        let mut queue = EventQueue::new(1);
        queue.schedule(EventSource::Gate(0), 1.0);
        queue.schedule(EventSource::End, 2.0);
        queue.cancel(EventSource::Gate(0));
        queue.cancel(EventSource::Gate(0));
        assert!(!queue.is_pending(EventSource::Gate(0)));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pop().map(|(_, s)| s), Some(EventSource::End));
        assert_eq!(queue.peek_time(), None);
    }

    #[test]
    fn test_key_ordering_uses_rank_on_equal_time() {
        let a = EventKey { time: 1.0, rank: 0 };
        let b = EventKey { time: 1.0, rank: 3 };
        let c = EventKey { time: 0.5, rank: 9 };
        assert!(a < b);
        assert!(c < a);
    }
}
