//! Autoplay a full game and export its history to disk.

use beer_game::io::demand::generate_classic_beer_game_demand;
use beer_game::io::reporting::write_simulation_log;
use beer_game::simulation::autoplay::{play_out, Strategies};
use beer_game::strategy::implementations::{BaseStockPolicy, NaivePolicy, StermanHeuristic};
use beer_game::{Game, GameSettings, Role};
use tempfile::TempDir;

#[test]
fn autoplayed_game_exports_one_row_per_team_and_round() {
    let settings = GameSettings {
        max_rounds: 25,
        demand_schedule: generate_classic_beer_game_demand(),
        ..GameSettings::default()
    };
    let mut strategies: Strategies = [
        Box::new(BaseStockPolicy::with_optimal_target(&settings, 6.0, 2.0)),
        Box::new(NaivePolicy::new()),
        Box::new(StermanHeuristic::new(15)),
        Box::new(NaivePolicy::new()),
    ];
    let mut game = Game::with_settings(settings);
    assert_eq!(play_out(&mut game, &mut strategies).unwrap(), 25);

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("run.csv");
    write_simulation_log(&path, game.history()).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 25 * Role::ALL.len());
    assert_eq!(&rows[0][1], "Retailer");
    assert_eq!(&rows[3][1], "Factory");
    assert_eq!(&rows[99][0], "25");

    let exported_total: f64 = rows
        .iter()
        .skip(rows.len() - Role::ALL.len())
        .map(|row| row[8].parse::<f64>().unwrap())
        .sum();
    assert!((exported_total - game.total_chain_cost()).abs() < 1e-6);
}
