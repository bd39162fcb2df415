// src/model/demand.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::io::demand::ScheduleInput;

/// Customer demand used for round 0 when a schedule does not say otherwise.
pub const DEFAULT_BASE_DEMAND: u32 = 5;

/// External customer demand as a step function of the round index.
///
/// Keys are 0-based round indices where the demand changes. The value for a
/// round is the one stored under the largest key not after it, so the
/// schedule `{0: 5, 4: 10}` yields 5 for rounds 0..=3 and 10 from round 4 on.
/// Key 0 is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ScheduleInput", into = "BTreeMap<u32, u32>")]
pub struct DemandSchedule {
    steps: BTreeMap<u32, u32>,
}

impl DemandSchedule {
    /// Builds a schedule, backfilling round 0 with [`DEFAULT_BASE_DEMAND`].
    pub fn new(mut steps: BTreeMap<u32, u32>) -> Self {
        steps.entry(0).or_insert(DEFAULT_BASE_DEMAND);
        Self { steps }
    }

    /// Same demand every round.
    pub fn constant(value: u32) -> Self {
        Self::new(BTreeMap::from([(0, value)]))
    }

    /// Builds a schedule from one demand value per round, keeping only the
    /// rounds where the value changes. Values past round `u32::MAX` are
    /// ignored.
    pub fn from_per_round(values: &[u32]) -> Self {
        let mut steps = BTreeMap::new();
        let mut previous = None;
        for (round, &value) in values.iter().enumerate() {
            let Ok(round) = u32::try_from(round) else {
                break;
            };
            if previous != Some(value) {
                steps.insert(round, value);
                previous = Some(value);
            }
        }
        Self::new(steps)
    }

    pub fn demand_for_round(&self, round_index: u32) -> u32 {
        self.steps
            .range(..=round_index)
            .next_back()
            .map(|(_, &demand)| demand)
            .unwrap_or(DEFAULT_BASE_DEMAND)
    }

    /// The change points, ordered by round.
    pub fn steps(&self) -> &BTreeMap<u32, u32> {
        &self.steps
    }
}

impl Default for DemandSchedule {
    /// The classic step: 5 units per round, rising to 10 from round 4.
    fn default() -> Self {
        Self::new(BTreeMap::from([(0, DEFAULT_BASE_DEMAND), (4, 10)]))
    }
}

impl From<DemandSchedule> for BTreeMap<u32, u32> {
    fn from(schedule: DemandSchedule) -> Self {
        schedule.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_function_lookup() {
        let schedule = DemandSchedule::new(BTreeMap::from([(0, 5), (4, 10)]));
        for round in 0..4 {
            assert_eq!(schedule.demand_for_round(round), 5);
        }
        for round in [4, 5, 39, 10_000] {
            assert_eq!(schedule.demand_for_round(round), 10);
        }
    }

    #[test]
    fn test_missing_round_zero_is_backfilled() {
        let schedule = DemandSchedule::new(BTreeMap::from([(3, 12)]));
        assert_eq!(schedule.steps().get(&0), Some(&DEFAULT_BASE_DEMAND));
        assert_eq!(schedule.demand_for_round(2), DEFAULT_BASE_DEMAND);
        assert_eq!(schedule.demand_for_round(3), 12);
    }

    #[test]
    fn test_from_per_round_compresses_runs() {
        let schedule = DemandSchedule::from_per_round(&[4, 4, 4, 4, 8, 8, 8]);
        assert_eq!(schedule.steps(), &BTreeMap::from([(0, 4), (4, 8)]));
    }
}
