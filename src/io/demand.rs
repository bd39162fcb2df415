// src/io/demand.rs

use rand::Rng;
use rand_distr::{Distribution, Normal, NormalError};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::io::request::integer_like;
use crate::model::demand::DemandSchedule;

/// The shapes a demand schedule may arrive in from a client or a settings
/// file. Malformed entries are skipped rather than rejected, negative
/// numbers count as 0, and round 0 is backfilled afterwards.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScheduleInput {
    /// `"0:5, 4:10"`
    Text(String),
    /// `[{"round": 0, "demand": 5}, {"round": 4, "demand": 10}]`
    Entries(Vec<Value>),
    /// `{"0": 5, "4": 10}`
    Map(BTreeMap<String, Value>),
}

impl From<ScheduleInput> for DemandSchedule {
    fn from(input: ScheduleInput) -> Self {
        match input {
            ScheduleInput::Text(text) => parse_schedule_text(&text),
            ScheduleInput::Entries(entries) => {
                let steps = entries
                    .iter()
                    .filter_map(|entry| {
                        let round = entry.get("round").and_then(integer_like)?;
                        let demand = entry.get("demand").and_then(integer_like)?;
                        Some((non_negative(round)?, non_negative(demand)?))
                    })
                    .collect();
                DemandSchedule::new(steps)
            }
            ScheduleInput::Map(map) => {
                let steps = map
                    .iter()
                    .filter_map(|(round, demand)| {
                        let round = round.trim().parse::<i64>().ok()?;
                        let demand = integer_like(demand)?;
                        Some((non_negative(round)?, non_negative(demand)?))
                    })
                    .collect();
                DemandSchedule::new(steps)
            }
        }
    }
}

/// Parses the comma separated `round:demand` form, e.g. `"0:5, 4:10"`.
pub fn parse_schedule_text(text: &str) -> DemandSchedule {
    let steps = text
        .split(',')
        .filter_map(|part| {
            let (round, demand) = part.trim().split_once(':')?;
            let round = round.trim().parse::<i64>().ok()?;
            let demand = demand.trim().parse::<i64>().ok()?;
            Some((non_negative(round)?, non_negative(demand)?))
        })
        .collect();
    DemandSchedule::new(steps)
}

/// Negative numbers clamp to 0; anything past `u32::MAX` is dropped.
fn non_negative(value: i64) -> Option<u32> {
    u32::try_from(value.max(0)).ok()
}

/// Field deserializer for settings: an explicit `null` schedule means the
/// default one.
pub fn schedule_or_default<'de, D>(deserializer: D) -> Result<DemandSchedule, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<DemandSchedule>::deserialize(deserializer)?.unwrap_or_default())
}

/// Same demand every round.
/// Useful for testing stability (e.g., steady-state runs).
pub fn generate_constant_demand(value: u32) -> DemandSchedule {
    DemandSchedule::constant(value)
}

/// A "Step" pattern: 4 rounds of 4, then 8 for the rest.
/// This is the classic scenario used in the MIT Beer Game to trigger the Bullwhip effect.
pub fn generate_classic_beer_game_demand() -> DemandSchedule {
    DemandSchedule::new(BTreeMap::from([(0, 4), (4, 8)]))
}

/// Demand sampled from a Normal (Bell Curve) distribution.
///
/// # Arguments
/// * `rounds` - Length of the game.
/// * `mean` - The average order size (e.g., 10.0).
/// * `std_dev` - The standard deviation (volatility) (e.g., 2.0).
///
/// Samples are rounded to the nearest integer and clamped at 0.
pub fn generate_normal_demand<R: Rng + ?Sized>(
    rng: &mut R,
    rounds: usize,
    mean: f64,
    std_dev: f64,
) -> Result<DemandSchedule, NormalError> {
    if std_dev < 0.0 {
        return Err(NormalError::BadVariance);
    }
    let normal = Normal::new(mean, std_dev)?;
    let values: Vec<u32> = (0..rounds)
        .map(|_| {
            let sample: f64 = normal.sample(&mut *rng);
            sample.round().max(0.0) as u32
        })
        .collect();
    Ok(DemandSchedule::from_per_round(&values))
}
