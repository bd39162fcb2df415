// src/simulation/config.rs

use serde::{Deserialize, Serialize};

use crate::model::demand::DemandSchedule;

/// Longest game the engine accepts.
pub const MAX_ROUNDS: u32 = 100_000;

/// Everything needed to start a game. Changing settings means starting the
/// simulation over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameSettings {
    pub max_rounds: u32,
    /// Cost per unit in stock per round.
    pub holding_cost: f64,
    /// Cost per unit owed downstream per round.
    pub backlog_cost: f64,
    pub initial_stock: u32,
    pub initial_backlog: u32,
    /// Seeds both slots of every order pipeline.
    pub initial_incoming_order: u32,
    /// Seeds both slots of every delivery pipeline.
    pub initial_incoming_delivery: u32,
    /// `null` means the default schedule.
    #[serde(deserialize_with = "crate::io::demand::schedule_or_default")]
    pub demand_schedule: DemandSchedule,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            max_rounds: 40,
            holding_cost: 0.5,
            backlog_cost: 1.0,
            initial_stock: 15,
            initial_backlog: 0,
            initial_incoming_order: 5,
            initial_incoming_delivery: 5,
            demand_schedule: DemandSchedule::default(),
        }
    }
}

impl GameSettings {
    /// Clamps values into their valid ranges: between 1 and [`MAX_ROUNDS`]
    /// rounds and non-negative, finite cost rates. Invalid rates fall back
    /// to the defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        self.max_rounds = self.max_rounds.clamp(1, MAX_ROUNDS);
        self.holding_cost = clamp_rate(self.holding_cost, defaults.holding_cost);
        self.backlog_cost = clamp_rate(self.backlog_cost, defaults.backlog_cost);
        self
    }

    /// Parses settings from JSON, filling missing fields with defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let settings: Self = serde_json::from_str(text)?;
        Ok(settings.sanitized())
    }

    /// Total delay between placing an order and receiving the goods.
    pub fn lead_time(&self) -> usize {
        2 * crate::model::queues::PIPELINE_LAG
    }
}

fn clamp_rate(rate: f64, fallback: f64) -> f64 {
    if rate.is_finite() {
        rate.max(0.0)
    } else {
        fallback
    }
}
