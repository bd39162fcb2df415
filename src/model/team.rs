// src/model/team.rs

use serde::Serialize;

use crate::model::queues::PipelineQueue;
use crate::model::role::Role;
use crate::simulation::config::GameSettings;

/// What one completed round did to one team. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundSnapshot {
    /// 1-based round number.
    pub round: u32,
    pub incoming_order: u64,
    pub incoming_delivery: u64,
    pub outgoing_delivery: u64,
    pub placed_order: u32,
    pub stock_after: u64,
    pub backlog_after: u64,
    pub round_cost: f64,
    pub total_cost: f64,
}

/// The state of a single node in the supply chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamState {
    pub role: Role,

    /// Goods and backlog are `u64`: a single order is at most `u32::MAX`
    /// and a game is capped at [`MAX_ROUNDS`](crate::simulation::config::MAX_ROUNDS),
    /// so no reachable sum overflows.
    pub stock: u64,
    pub backlog: u64,
    pub total_cost: f64,

    /// Orders placed by the downstream neighbour, two rounds in transit.
    /// Unused for the Retailer, whose orders come from the market.
    pub order_queue: PipelineQueue,
    /// Goods shipped by the upstream neighbour (or produced, for the
    /// Factory), two rounds in transit.
    pub delivery_queue: PipelineQueue,

    pub last_round: Option<RoundSnapshot>,
}

impl TeamState {
    pub fn new(role: Role, settings: &GameSettings) -> Self {
        Self {
            role,
            stock: u64::from(settings.initial_stock),
            backlog: u64::from(settings.initial_backlog),
            total_cost: 0.0,
            order_queue: PipelineQueue::filled(u64::from(settings.initial_incoming_order)),
            delivery_queue: PipelineQueue::filled(u64::from(settings.initial_incoming_delivery)),
            last_round: None,
        }
    }

    /// Goods arrive from upstream and go straight into stock.
    pub fn receive_shipment(&mut self, quantity: u64) {
        self.stock += quantity;
    }

    /// Ships as much of the incoming order plus the old backlog as stock
    /// allows and backlogs the rest.
    ///
    /// Returns the quantity shipped downstream.
    pub fn process_order(&mut self, incoming_order: u64) -> u64 {
        let total_demand = self.backlog + incoming_order;
        let shipped = self.stock.min(total_demand);

        self.stock -= shipped;
        self.backlog = total_demand - shipped;

        debug_assert!(
            self.stock == 0 || self.backlog == 0,
            "{} holds stock {} and backlog {} at once",
            self.role,
            self.stock,
            self.backlog
        );
        shipped
    }

    /// Holding plus backlog cost of the current position.
    pub fn current_cost(&self, holding_cost: f64, backlog_cost: f64) -> f64 {
        self.stock as f64 * holding_cost + self.backlog as f64 * backlog_cost
    }

    /// Books one round of cost and returns it.
    pub fn charge_round(&mut self, holding_cost: f64, backlog_cost: f64) -> f64 {
        let cost = self.current_cost(holding_cost, backlog_cost);
        self.total_cost += cost;
        cost
    }

    /// Goods already on their way to this team.
    pub fn supply_line(&self) -> u64 {
        self.delivery_queue.total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team() -> TeamState {
        TeamState::new(Role::Wholesaler, &GameSettings::default())
    }

    #[test]
    fn test_new_team_uses_settings() {
        let t = team();
        assert_eq!(t.stock, 15);
        assert_eq!(t.backlog, 0);
        assert_eq!(t.order_queue.len(), 2);
        assert_eq!(t.delivery_queue.len(), 2);
        assert!(t.last_round.is_none());
    }

    #[test]
    fn test_process_order_with_enough_stock() {
        let mut t = team();
        t.receive_shipment(5);
        assert_eq!(t.process_order(5), 5);
        assert_eq!((t.stock, t.backlog), (15, 0));
    }

    #[test]
    fn test_process_order_short_builds_backlog() {
        let mut t = team();
        t.receive_shipment(0);
        assert_eq!(t.process_order(20), 15);
        assert_eq!((t.stock, t.backlog), (0, 5));

        // Old backlog is served first next round.
        t.receive_shipment(8);
        assert_eq!(t.process_order(2), 7);
        assert_eq!((t.stock, t.backlog), (1, 0));
    }

    #[test]
    fn test_charge_round_accumulates() {
        let mut t = team();
        t.backlog = 0;
        assert_eq!(t.charge_round(0.5, 1.0), 7.5);
        t.stock = 0;
        t.backlog = 3;
        assert_eq!(t.charge_round(0.5, 1.0), 3.0);
        assert_eq!(t.total_cost, 10.5);
    }

    #[test]
    fn test_orders_beyond_u32_are_kept_whole() {
        let mut t = team();
        let big = u64::from(u32::MAX);
        t.receive_shipment(big);
        t.receive_shipment(big);
        assert_eq!(t.stock, 15 + 2 * big);

        assert_eq!(t.process_order(3 * big), 15 + 2 * big);
        assert_eq!((t.stock, t.backlog), (0, big - 15));
        t.process_order(big);
        assert_eq!(t.backlog, 2 * big - 15);
    }
}
