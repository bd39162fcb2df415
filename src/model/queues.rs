// src/model/queues.rs

use serde::Serialize;
use std::collections::VecDeque;

/// Number of rounds an order or a shipment spends in transit.
pub const PIPELINE_LAG: usize = 2;

/// Fixed-lag FIFO between two neighbouring teams.
///
/// Every round pops exactly one value from the front and pushes exactly one
/// value to the back, so the length stays at [`PIPELINE_LAG`] at every round
/// boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PipelineQueue {
    buffer: VecDeque<u64>,
}

impl PipelineQueue {
    /// A queue pre-filled with the steady-state rate so the first rounds
    /// receive something.
    pub fn filled(value: u64) -> Self {
        Self {
            buffer: std::iter::repeat(value).take(PIPELINE_LAG).collect(),
        }
    }

    /// Items arrive at the destination. Call at the start of the round.
    pub fn pop_arrival(&mut self) -> u64 {
        // The length invariant guarantees a front element; an empty pipe
        // delivers nothing rather than panicking.
        self.buffer.pop_front().unwrap_or(0)
    }

    /// Items enter the pipeline. Call at the end of the round.
    pub fn push_departure(&mut self, item: u64) {
        self.buffer.push_back(item);
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Values in transit, front (next to arrive) first.
    pub fn in_transit(&self) -> impl Iterator<Item = u64> + '_ {
        self.buffer.iter().copied()
    }

    /// Sum of everything still in the pipe.
    pub fn total(&self) -> u64 {
        self.buffer.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_queue_has_lag_length() {
        let q = PipelineQueue::filled(5);
        assert_eq!(q.len(), PIPELINE_LAG);
        assert_eq!(q.in_transit().collect::<Vec<_>>(), vec![5, 5]);
    }

    #[test]
    fn test_values_arrive_after_lag() {
        let mut q = PipelineQueue::filled(0);
        q.pop_arrival();
        q.push_departure(7);
        assert_eq!(q.pop_arrival(), 0);
        q.push_departure(9);
        assert_eq!(q.pop_arrival(), 7);
        q.push_departure(11);
        assert_eq!(q.len(), PIPELINE_LAG);
        assert_eq!(q.total(), 20);
    }
}
