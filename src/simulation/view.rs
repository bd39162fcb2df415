// src/simulation/view.rs

//! Read-only projection of a game for one viewer.
//!
//! Nothing here mutates the game; who is looking only decides what is
//! left out.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::model::role::Role;
use crate::model::team::RoundSnapshot;
use crate::simulation::config::GameSettings;
use crate::simulation::engine::{Game, GameId, RoundRecord};

/// Number of history records shown to every viewer.
pub const HISTORY_WINDOW: usize = 10;

/// Who is asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    /// The game host; sees everything.
    Admin,
    /// A player on one team.
    Team(Role),
    /// Anyone else.
    Spectator,
}

impl Viewer {
    /// Only the host and the Retailer know the customer demand up front.
    pub fn sees_demand(self) -> bool {
        matches!(self, Viewer::Admin | Viewer::Team(Role::Retailer))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamView {
    pub stock: u64,
    pub backlog: u64,
    pub total_cost: f64,
    pub last_round: Option<RoundSnapshot>,
    pub order_submitted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub game_id: GameId,
    pub started: bool,
    pub completed: bool,
    /// 1-based round currently accepting orders.
    pub round: u32,
    pub max_rounds: u32,
    pub current_demand: Option<u32>,
    pub your_team: Option<Role>,
    pub submissions_count: usize,
    pub teams: BTreeMap<Role, TeamView>,
    pub history: Vec<Arc<RoundRecord>>,
    /// Full history, host only.
    pub history_all: Vec<Arc<RoundRecord>>,
    pub settings: GameSettings,
}

impl GameView {
    pub fn project(game: &Game, viewer: Viewer) -> Self {
        let teams = game
            .teams()
            .map(|team| {
                (
                    team.role,
                    TeamView {
                        stock: team.stock,
                        backlog: team.backlog,
                        total_cost: round_cents(team.total_cost),
                        last_round: team.last_round.clone().map(|mut snap| {
                            snap.total_cost = round_cents(snap.total_cost);
                            snap.round_cost = round_cents(snap.round_cost);
                            snap
                        }),
                        order_submitted: game.has_submitted(team.role),
                    },
                )
            })
            .collect();

        let your_team = match viewer {
            Viewer::Team(role) => Some(role),
            Viewer::Admin | Viewer::Spectator => None,
        };

        Self {
            game_id: game.id(),
            started: game.is_started(),
            completed: game.is_completed(),
            round: game.current_round(),
            max_rounds: game.settings().max_rounds,
            current_demand: viewer.sees_demand().then(|| game.current_demand()),
            your_team,
            submissions_count: game.pending_count(),
            teams,
            history: game.recent_history(HISTORY_WINDOW).to_vec(),
            history_all: match viewer {
                Viewer::Admin => game.history().to_vec(),
                Viewer::Team(_) | Viewer::Spectator => Vec::new(),
            },
            settings: game.settings().clone(),
        }
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::demand::DemandSchedule;

    fn played_game(rounds: usize) -> Game {
        let mut game = Game::with_settings(GameSettings {
            holding_cost: 1.0 / 3.0,
            demand_schedule: DemandSchedule::constant(6),
            ..GameSettings::default()
        });
        game.start().unwrap();
        for _ in 0..rounds {
            for role in Role::ALL {
                game.submit(role, 4).unwrap();
            }
        }
        game
    }

    #[test]
    fn test_demand_hidden_from_upstream_teams() {
        let game = played_game(0);
        assert_eq!(GameView::project(&game, Viewer::Admin).current_demand, Some(6));
        assert_eq!(
            GameView::project(&game, Viewer::Team(Role::Retailer)).current_demand,
            Some(6)
        );
        for role in [Role::Wholesaler, Role::Distributor, Role::Factory] {
            assert_eq!(GameView::project(&game, Viewer::Team(role)).current_demand, None);
        }
        assert_eq!(GameView::project(&game, Viewer::Spectator).current_demand, None);
    }

    #[test]
    fn test_history_window_and_admin_history() {
        let game = played_game(13);
        let admin = GameView::project(&game, Viewer::Admin);
        let player = GameView::project(&game, Viewer::Team(Role::Factory));

        assert_eq!(admin.history.len(), HISTORY_WINDOW);
        assert_eq!(admin.history_all.len(), 13);
        assert_eq!(player.history.len(), HISTORY_WINDOW);
        assert!(player.history_all.is_empty());
        assert_eq!(player.your_team, Some(Role::Factory));
    }

    #[test]
    fn test_costs_rounded_to_cents() {
        let game = played_game(1);
        let view = GameView::project(&game, Viewer::Spectator);
        // 14 units in stock at a third per unit.
        assert_eq!(view.teams[&Role::Retailer].total_cost, 4.67);
        // The game itself keeps full precision.
        assert_ne!(game.team(Role::Retailer).total_cost, 4.67);
    }

    #[test]
    fn test_projection_does_not_touch_state() {
        let mut game = played_game(0);
        game.submit(Role::Distributor, 2).unwrap();
        let before = game.team(Role::Distributor).clone();
        let view = GameView::project(&game, Viewer::Team(Role::Distributor));

        assert_eq!(view.submissions_count, 1);
        assert!(view.teams[&Role::Distributor].order_submitted);
        assert!(!view.teams[&Role::Retailer].order_submitted);
        assert_eq!(game.team(Role::Distributor), &before);
    }

    #[test]
    fn test_view_serializes_with_role_keys() {
        let game = played_game(1);
        let json = serde_json::to_value(GameView::project(&game, Viewer::Admin)).unwrap();
        assert_eq!(json["round"], 2);
        assert_eq!(json["teams"]["Retailer"]["stock"], 14);
        assert_eq!(json["history"][0]["orders"]["Factory"], 4);
    }
}
