// src/strategy/traits.rs

use std::fmt::Debug;

use crate::model::role::Role;
use crate::simulation::engine::Game;

/// What a team can see when it decides its order: its own position, the
/// last order it received, and the customer demand if it is the Retailer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeamObservation {
    pub role: Role,
    /// Current on-hand stock.
    pub stock: u64,
    /// Current unfilled orders.
    pub backlog: u64,
    /// The order received from downstream last round; the steady-state
    /// rate before round 1.
    pub incoming_demand: u32,
    /// Goods already on their way to this team.
    pub supply_line: u64,
    /// Customer demand for the open round, visible only to the Retailer.
    pub customer_demand: Option<u32>,
}

impl TeamObservation {
    pub fn of(game: &Game, role: Role) -> Self {
        let team = game.team(role);
        Self {
            role,
            stock: team.stock,
            backlog: team.backlog,
            incoming_demand: team
                .last_round
                .as_ref()
                .map(|snap| u32::try_from(snap.incoming_order).unwrap_or(u32::MAX))
                .unwrap_or(game.settings().initial_incoming_order),
            supply_line: team.supply_line(),
            customer_demand: (role == Role::Retailer).then(|| game.current_demand()),
        }
    }

    /// The demand figure a policy should react to: the customer demand when
    /// known, otherwise the last incoming order.
    pub fn expected_demand(&self) -> u32 {
        self.customer_demand.unwrap_or(self.incoming_demand)
    }
}

/// Decision rule that plays one team.
///
/// `Send` lets a policy run on whatever thread serves its team.
pub trait OrderPolicy: Debug + Send {
    /// Calculates how much to order from the upstream supplier this round.
    fn calculate_order(&mut self, observation: &TeamObservation) -> u32;
}
