// src/simulation/engine.rs

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::model::role::Role;
use crate::model::team::{RoundSnapshot, TeamState};
use crate::simulation::config::GameSettings;
use crate::simulation::error::{LifecycleError, SubmitError};

/// Stable identity of a game; survives resets.
pub type GameId = Uuid;

/// Post-round position of one team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamTotals {
    pub stock: u64,
    pub backlog: u64,
    pub total_cost: f64,
}

/// One completed round across the whole chain. Appended to the history once
/// and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundRecord {
    /// 1-based round number.
    pub round: u32,
    pub customer_demand: u32,
    pub orders: BTreeMap<Role, u32>,
    pub deliveries: BTreeMap<Role, u64>,
    pub round_costs: BTreeMap<Role, f64>,
    pub team_state: BTreeMap<Role, TeamTotals>,
}

/// Result of an accepted submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Recorded; the round closes once these roles have submitted too.
    Accepted { waiting_on: Vec<Role> },
    /// This submission was the last one missing and the round was run.
    RoundAdvanced(Arc<RoundRecord>),
}

impl SubmitOutcome {
    pub fn advanced(&self) -> Option<&RoundRecord> {
        match self {
            SubmitOutcome::RoundAdvanced(record) => Some(record),
            SubmitOutcome::Accepted { .. } => None,
        }
    }
}

/// One running beer game: four teams, their pipelines, and the barrier that
/// closes a round once every team has ordered.
#[derive(Debug, Clone)]
pub struct Game {
    id: GameId,
    settings: GameSettings,

    // Simulation state
    teams: [TeamState; 4],
    round_index: u32,
    pending: BTreeMap<Role, u32>,
    history: Vec<Arc<RoundRecord>>,

    // Lifecycle
    started: bool,
    completed: bool,
}

impl Game {
    pub fn new(id: GameId, settings: GameSettings) -> Self {
        let settings = settings.sanitized();
        Self {
            id,
            teams: Role::ALL.map(|role| TeamState::new(role, &settings)),
            settings,
            round_index: 0,
            pending: BTreeMap::new(),
            history: Vec::new(),
            started: false,
            completed: false,
        }
    }

    /// A game with a fresh random id.
    pub fn with_settings(settings: GameSettings) -> Self {
        Self::new(Uuid::new_v4(), settings)
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Rounds completed so far.
    pub fn round_index(&self) -> u32 {
        self.round_index
    }

    /// 1-based number of the round currently accepting orders.
    pub fn current_round(&self) -> u32 {
        self.round_index + 1
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn team(&self, role: Role) -> &TeamState {
        &self.teams[role.index()]
    }

    /// Teams in chain order.
    pub fn teams(&self) -> impl Iterator<Item = &TeamState> {
        self.teams.iter()
    }

    pub fn has_submitted(&self, role: Role) -> bool {
        self.pending.contains_key(&role)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Roles that have not ordered yet this round.
    pub fn waiting_on(&self) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|role| !self.pending.contains_key(role))
            .collect()
    }

    pub fn history(&self) -> &[Arc<RoundRecord>] {
        &self.history
    }

    /// The last `window` records, oldest first.
    pub fn recent_history(&self, window: usize) -> &[Arc<RoundRecord>] {
        let start = self.history.len().saturating_sub(window);
        &self.history[start..]
    }

    /// Customer demand the Retailer faces in the open round.
    pub fn current_demand(&self) -> u32 {
        self.settings
            .demand_schedule
            .demand_for_round(self.round_index)
    }

    // =================================================================
    // Lifecycle
    // =================================================================

    pub fn start(&mut self) -> Result<(), LifecycleError> {
        if self.started {
            return Err(LifecycleError::AlreadyStarted);
        }
        self.started = true;
        info!(game = %self.id, max_rounds = self.settings.max_rounds, "game started");
        Ok(())
    }

    /// Replaces the settings and rebuilds every team. Only allowed before
    /// the game starts.
    pub fn update_settings(&mut self, settings: GameSettings) -> Result<(), LifecycleError> {
        if self.started {
            return Err(LifecycleError::SettingsLocked);
        }
        *self = Game::new(self.id, settings);
        debug!(game = %self.id, "settings updated");
        Ok(())
    }

    /// Throws the simulation away and starts over with the same id and
    /// settings. The new game is not started.
    pub fn reset(&mut self) {
        *self = Game::new(self.id, self.settings.clone());
        info!(game = %self.id, "game reset");
    }

    // =================================================================
    // Submission barrier
    // =================================================================

    /// Records `role`'s order for the open round.
    ///
    /// When this is the fourth order of the round the round is advanced
    /// before returning. A rejected submission changes nothing.
    pub fn submit(&mut self, role: Role, quantity: i64) -> Result<SubmitOutcome, SubmitError> {
        let quantity = u32::try_from(quantity)
            .map_err(|_| SubmitError::InvalidQuantity(quantity.to_string()))?;
        self.check_open()?;
        if self.pending.contains_key(&role) {
            return Err(SubmitError::DuplicateSubmission(role));
        }

        self.pending.insert(role, quantity);
        debug!(
            game = %self.id,
            round = self.current_round(),
            %role,
            quantity,
            "order accepted"
        );

        if self.pending.len() < Role::ALL.len() {
            return Ok(SubmitOutcome::Accepted {
                waiting_on: self.waiting_on(),
            });
        }
        Ok(SubmitOutcome::RoundAdvanced(self.run_round()))
    }

    /// Like [`Game::submit`], but the caller names the round it is ordering
    /// for. Retrying an order for a round that has already closed is a
    /// `DuplicateSubmission` and never advances the game a second time.
    pub fn submit_for_round(
        &mut self,
        round: u32,
        role: Role,
        quantity: i64,
    ) -> Result<SubmitOutcome, SubmitError> {
        if quantity < 0 || quantity > i64::from(u32::MAX) {
            return Err(SubmitError::InvalidQuantity(quantity.to_string()));
        }
        self.check_open()?;
        let current = self.current_round();
        if round < current {
            return Err(SubmitError::DuplicateSubmission(role));
        }
        if round > current {
            return Err(SubmitError::RoundNotOpen {
                requested: round,
                current,
            });
        }
        self.submit(role, quantity)
    }

    fn check_open(&self) -> Result<(), SubmitError> {
        if !self.started {
            return Err(SubmitError::NotStarted);
        }
        if self.completed {
            return Err(SubmitError::AlreadyCompleted);
        }
        Ok(())
    }

    // =================================================================
    // Round advancement
    // =================================================================

    fn run_round(&mut self) -> Arc<RoundRecord> {
        let round = self.current_round();
        let demand = self.current_demand();
        let holding_cost = self.settings.holding_cost;
        let backlog_cost = self.settings.backlog_cost;
        let placed = std::mem::take(&mut self.pending);

        let mut incoming_orders = [0u64; 4];
        let mut incoming_deliveries = [0u64; 4];
        let mut outgoing = [0u64; 4];
        let mut round_costs = [0f64; 4];

        // PHASE 1: arrivals and fulfilment. Each team only touches its own
        // queues here; nothing is pushed until every team has popped.
        for role in Role::ALL {
            let i = role.index();
            let team = &mut self.teams[i];

            let incoming_delivery = team.delivery_queue.pop_arrival();
            let incoming_order = match role {
                Role::Retailer => u64::from(demand),
                _ => team.order_queue.pop_arrival(),
            };

            team.receive_shipment(incoming_delivery);
            outgoing[i] = team.process_order(incoming_order);
            round_costs[i] = team.charge_round(holding_cost, backlog_cost);

            incoming_orders[i] = incoming_order;
            incoming_deliveries[i] = incoming_delivery;
        }

        // PHASE 2: departures. Orders flow upstream, goods flow downstream.
        for role in Role::ALL {
            let i = role.index();
            let order = placed.get(&role).copied().unwrap_or_default();

            match role.upstream() {
                Some(upstream) => self.teams[upstream.index()]
                    .order_queue
                    .push_departure(u64::from(order)),
                // The factory's supplier is unconstrained: production
                // arrives after the usual lag.
                None => self.teams[i]
                    .delivery_queue
                    .push_departure(u64::from(order)),
            }
            if let Some(downstream) = role.downstream() {
                self.teams[downstream.index()]
                    .delivery_queue
                    .push_departure(outgoing[i]);
            }

            let team = &mut self.teams[i];
            team.last_round = Some(RoundSnapshot {
                round,
                incoming_order: incoming_orders[i],
                incoming_delivery: incoming_deliveries[i],
                outgoing_delivery: outgoing[i],
                placed_order: order,
                stock_after: team.stock,
                backlog_after: team.backlog,
                round_cost: round_costs[i],
                total_cost: team.total_cost,
            });
        }

        debug_assert!(
            self.teams
                .iter()
                .all(|t| t.order_queue.len() == 2 && t.delivery_queue.len() == 2),
            "pipeline length drifted in round {round}"
        );

        // PHASE 3: record & advance
        let per_role = |values: &[u64; 4]| -> BTreeMap<Role, u64> {
            Role::ALL.into_iter().map(|r| (r, values[r.index()])).collect()
        };
        let record = Arc::new(RoundRecord {
            round,
            customer_demand: demand,
            orders: placed,
            deliveries: per_role(&outgoing),
            round_costs: Role::ALL
                .into_iter()
                .map(|r| (r, round_costs[r.index()]))
                .collect(),
            team_state: self
                .teams
                .iter()
                .map(|t| {
                    (
                        t.role,
                        TeamTotals {
                            stock: t.stock,
                            backlog: t.backlog,
                            total_cost: t.total_cost,
                        },
                    )
                })
                .collect(),
        });
        self.history.push(Arc::clone(&record));

        self.round_index += 1;
        if self.round_index >= self.settings.max_rounds {
            self.completed = true;
        }

        info!(
            game = %self.id,
            round,
            demand,
            retailer_cost = round_costs[0],
            wholesaler_cost = round_costs[1],
            distributor_cost = round_costs[2],
            factory_cost = round_costs[3],
            "round advanced"
        );
        if self.completed {
            info!(game = %self.id, total_cost = self.total_chain_cost(), "game completed");
        }

        record
    }

    // =================================================================
    // Cost analysis
    // =================================================================

    /// Accumulated cost per team, chain order.
    pub fn cost_breakdown(&self) -> Vec<(Role, f64)> {
        self.teams.iter().map(|t| (t.role, t.total_cost)).collect()
    }

    /// Calculate the total cost for the entire supply chain so far
    pub fn total_chain_cost(&self) -> f64 {
        self.teams.iter().map(|t| t.total_cost).sum()
    }
}
