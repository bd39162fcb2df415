// src/simulation/autoplay.rs

use tracing::debug;

use crate::model::role::Role;
use crate::simulation::engine::Game;
use crate::simulation::error::SubmitError;
use crate::strategy::traits::{OrderPolicy, TeamObservation};

/// One policy per role, chain order: Retailer, Wholesaler, Distributor, Factory.
pub type Strategies = [Box<dyn OrderPolicy>; 4];

/// Plays `game` to completion, letting each policy order for its team
/// through the normal submission barrier. Starts the game if needed.
///
/// Returns the number of rounds played.
pub fn play_out(game: &mut Game, strategies: &mut Strategies) -> Result<u32, SubmitError> {
    if !game.is_started() {
        game.start().ok();
    }

    let first = game.round_index();
    while !game.is_completed() {
        play_round(game, strategies)?;
    }
    Ok(game.round_index() - first)
}

/// Lets every policy that has not yet ordered this round submit.
pub fn play_round(game: &mut Game, strategies: &mut Strategies) -> Result<(), SubmitError> {
    for role in Role::ALL {
        if game.has_submitted(role) {
            continue;
        }
        let observation = TeamObservation::of(game, role);
        let order = strategies[role.index()].calculate_order(&observation);
        debug!(%role, order, stock = observation.stock, backlog = observation.backlog, "policy order");
        game.submit(role, i64::from(order))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::demand::DemandSchedule;
    use crate::simulation::config::GameSettings;
    use crate::strategy::implementations::NaivePolicy;

    fn naive() -> Strategies {
        [
            Box::new(NaivePolicy::new()),
            Box::new(NaivePolicy::new()),
            Box::new(NaivePolicy::new()),
            Box::new(NaivePolicy::new()),
        ]
    }

    #[test]
    fn test_steady_demand_keeps_chain_in_balance() {
        let mut game = Game::with_settings(GameSettings {
            max_rounds: 20,
            demand_schedule: DemandSchedule::constant(5),
            ..GameSettings::default()
        });
        let played = play_out(&mut game, &mut naive()).unwrap();

        assert_eq!(played, 20);
        assert!(game.is_completed());
        for team in game.teams() {
            assert_eq!((team.stock, team.backlog), (15, 0));
            assert_eq!(team.total_cost, 20.0 * 7.5);
        }
    }

    #[test]
    fn test_play_out_continues_a_started_game() {
        let mut game = Game::with_settings(GameSettings {
            max_rounds: 6,
            ..GameSettings::default()
        });
        game.start().unwrap();
        play_round(&mut game, &mut naive()).unwrap();

        assert_eq!(play_out(&mut game, &mut naive()).unwrap(), 5);
        assert_eq!(game.history().len(), 6);
    }

    #[test]
    fn test_play_round_skips_human_orders() {
        let mut game = Game::with_settings(GameSettings::default());
        game.start().unwrap();
        game.submit(Role::Distributor, 12).unwrap();
        play_round(&mut game, &mut naive()).unwrap();

        let record = &game.history()[0];
        assert_eq!(record.orders[&Role::Distributor], 12);
        assert_eq!(record.orders[&Role::Retailer], 5);
    }
}
