// src/strategy/implementations.rs

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::simulation::config::GameSettings;
use crate::strategy::optimization::optimal_base_stock;
use crate::strategy::traits::{OrderPolicy, TeamObservation};

// =========================================================================
// 1. Naive Policy (Pass-Through)
// =========================================================================

/// The "Panic" strategy. It simply orders exactly what was demanded of it.
/// It ignores inventory levels and backlogs.
#[derive(Debug, Clone, Default)]
pub struct NaivePolicy;

impl NaivePolicy {
    pub fn new() -> Self {
        Self
    }
}

impl OrderPolicy for NaivePolicy {
    fn calculate_order(&mut self, observation: &TeamObservation) -> u32 {
        observation.expected_demand()
    }
}

// =========================================================================
// 2. Random Policy
// =========================================================================

/// Orders a random amount within a specific range.
/// Useful for simulating chaotic actors or testing system stability.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    min: u32,
    max: u32,
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(min: u32, max: u32) -> Self {
        Self::with_rng(min, max, StdRng::from_entropy())
    }

    /// Reproducible variant for tests and replays.
    pub fn seeded(min: u32, max: u32, seed: u64) -> Self {
        Self::with_rng(min, max, StdRng::seed_from_u64(seed))
    }

    fn with_rng(min: u32, max: u32, rng: StdRng) -> Self {
        Self {
            min: min.min(max),
            max: max.max(min),
            rng,
        }
    }
}

impl OrderPolicy for RandomPolicy {
    fn calculate_order(&mut self, _observation: &TeamObservation) -> u32 {
        self.rng.gen_range(self.min..=self.max)
    }
}

// =========================================================================
// 3. Base Stock Policy (Rational / "Order-Up-To")
// =========================================================================

/// A standard rational policy used in supply chain management.
///
/// It attempts to maintain a target inventory position.
/// Formula: Order = Demand + (Target - (Stock - Backlog + SupplyLine))
///
/// If we have too much inventory, we order 0.
#[derive(Debug, Clone)]
pub struct BaseStockPolicy {
    target_stock: i64,
}

impl BaseStockPolicy {
    pub fn new(target_stock: u32) -> Self {
        Self {
            target_stock: i64::from(target_stock),
        }
    }

    /// Creates a BaseStockPolicy with a target calculated from cost/demand parameters
    /// (Newsvendor Model).
    pub fn with_optimal_target(settings: &GameSettings, avg_demand: f64, std_dev_demand: f64) -> Self {
        let target = optimal_base_stock(
            settings.backlog_cost,
            settings.holding_cost,
            avg_demand,
            std_dev_demand,
            settings.lead_time(),
        );
        Self::new(target)
    }
}

impl OrderPolicy for BaseStockPolicy {
    fn calculate_order(&mut self, observation: &TeamObservation) -> u32 {
        // SupplyLine represents goods already on the way, so we account for them
        let net_inventory =
            signed(observation.stock) - signed(observation.backlog) + signed(observation.supply_line);
        let gap = self.target_stock - net_inventory;

        // If we are overstocked (gap is negative), this reduces the order.
        let raw_order = i64::from(observation.expected_demand()) + gap;
        clamp_order(raw_order as f64)
    }
}

// =========================================================================
// 4. Sterman Heuristic Policy
// =========================================================================
// Anchoring-and-adjustment rule from Sterman's beer game experiments.
// It weighs the inventory gap fully but mostly ignores the supply line.

#[derive(Debug, Clone)]
pub struct StermanHeuristic {
    target_inventory: i64,
    target_supply_line: i64,
    alpha: f64, // Weight for Inventory Gap (0.0 - 1.0)
    beta: f64,  // Weight for Supply Line Gap (0.0 - 1.0)
}

impl StermanHeuristic {
    /// Creates a typical "Human" agent who ignores the pipeline.
    pub fn new(target_inv: u32) -> Self {
        Self {
            target_inventory: i64::from(target_inv),
            target_supply_line: i64::from(target_inv / 2),
            alpha: 1.0,
            beta: 0.2,
        }
    }

    /// The optimal base stock (S) is split between on-hand inventory
    /// and pipeline inventory based on expected lead time consumption.
    pub fn with_optimal_target(settings: &GameSettings, avg_demand: f64, std_dev_demand: f64) -> Self {
        let lead_time = settings.lead_time();
        let total_base_stock = optimal_base_stock(
            settings.backlog_cost,
            settings.holding_cost,
            avg_demand,
            std_dev_demand,
            lead_time,
        );
        let pipeline_target = (avg_demand * lead_time as f64).round() as i64;

        Self {
            target_inventory: i64::from(total_base_stock) - pipeline_target,
            target_supply_line: pipeline_target,
            alpha: 1.0,
            beta: 0.2,
        }
    }
}

impl OrderPolicy for StermanHeuristic {
    fn calculate_order(&mut self, observation: &TeamObservation) -> u32 {
        let net_inv = signed(observation.stock) - signed(observation.backlog);
        let inventory_gap = (self.target_inventory - net_inv) as f64;
        let supply_line_gap = (self.target_supply_line - signed(observation.supply_line)) as f64;

        let order = f64::from(observation.expected_demand())
            + self.alpha * inventory_gap
            + self.beta * supply_line_gap;
        clamp_order(order)
    }
}

/// We cannot order negative amounts.
fn clamp_order(order: f64) -> u32 {
    order.round().clamp(0.0, f64::from(u32::MAX)) as u32
}

fn signed(quantity: u64) -> i64 {
    i64::try_from(quantity).unwrap_or(i64::MAX)
}
