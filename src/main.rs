use beer_game::io::demand;
use beer_game::io::reporting;
use beer_game::simulation::autoplay::{self, Strategies};
use beer_game::strategy::implementations::{
    BaseStockPolicy, NaivePolicy, RandomPolicy, StermanHeuristic,
};
use beer_game::strategy::traits::OrderPolicy;
use beer_game::{Game, GameSettings};
use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::error::Error;
use std::path::PathBuf;
use tracing::info;

/// Decision rule for an unattended team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PolicyKind {
    /// Orders exactly what was demanded.
    Naive,
    /// Orders uniformly between 0 and twice the base demand.
    Random,
    /// Order-up-to with a newsvendor target.
    BaseStock,
    /// Anchoring-and-adjustment, mostly ignoring the pipeline.
    Sterman,
}

/// Customer demand pattern, used when no explicit schedule is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DemandProfile {
    /// 5 units, rising to 10 at round 4.
    Default,
    /// 4 units, rising to 8 at round 4.
    Classic,
    /// Constant at the base demand.
    Constant,
    /// Normally distributed around the base demand.
    Normal,
}

#[derive(Parser, Debug)]
#[command(name = "beer-game")]
#[command(about = "Play out a beer distribution game with automated teams")]
struct Cli {
    /// JSON settings file (camelCase keys, missing keys use defaults)
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Number of rounds to play
    #[arg(long)]
    rounds: Option<u32>,

    /// Explicit demand schedule, e.g. "0:5, 4:10"
    #[arg(long, conflicts_with = "profile")]
    demand: Option<String>,

    /// Generated demand pattern
    #[arg(long, value_enum)]
    profile: Option<DemandProfile>,

    /// Seed for random demand and random policies
    #[arg(long, default_value_t = 7)]
    seed: u64,

    #[arg(long, value_enum, default_value_t = PolicyKind::BaseStock)]
    retailer: PolicyKind,

    #[arg(long, value_enum, default_value_t = PolicyKind::Naive)]
    wholesaler: PolicyKind,

    #[arg(long, value_enum, default_value_t = PolicyKind::Naive)]
    distributor: PolicyKind,

    #[arg(long, value_enum, default_value_t = PolicyKind::Naive)]
    factory: PolicyKind,

    /// Where to write the per-round CSV
    #[arg(short, long, default_value = "simulation_results.csv")]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let settings = load_settings(&cli)?;
    info!(
        rounds = settings.max_rounds,
        holding_cost = settings.holding_cost,
        backlog_cost = settings.backlog_cost,
        schedule = ?settings.demand_schedule.steps(),
        "settings loaded"
    );

    let base_demand = f64::from(settings.demand_schedule.demand_for_round(0));
    let mut strategies: Strategies = [
        build_policy(cli.retailer, &settings, base_demand, cli.seed),
        build_policy(cli.wholesaler, &settings, base_demand, cli.seed.wrapping_add(1)),
        build_policy(cli.distributor, &settings, base_demand, cli.seed.wrapping_add(2)),
        build_policy(cli.factory, &settings, base_demand, cli.seed.wrapping_add(3)),
    ];

    let mut game = Game::with_settings(settings);
    let rounds = autoplay::play_out(&mut game, &mut strategies)?;
    info!(rounds, "simulation finished");

    reporting::write_simulation_log(&cli.output, game.history())?;

    println!("=== Cost Analysis ===");
    for (role, cost) in game.cost_breakdown() {
        println!("{role}: ${cost:.2}");
    }
    println!("Total Supply Chain Cost: ${:.2}", game.total_chain_cost());
    Ok(())
}

fn load_settings(cli: &Cli) -> Result<GameSettings, Box<dyn Error>> {
    let mut settings = match &cli.settings {
        Some(path) => GameSettings::from_json(&std::fs::read_to_string(path)?)?,
        None => GameSettings::default(),
    };
    if let Some(rounds) = cli.rounds {
        settings.max_rounds = rounds;
    }

    if let Some(text) = &cli.demand {
        settings.demand_schedule = demand::parse_schedule_text(text);
    } else if let Some(profile) = cli.profile {
        let base = settings.demand_schedule.demand_for_round(0);
        settings.demand_schedule = match profile {
            DemandProfile::Default => beer_game::DemandSchedule::default(),
            DemandProfile::Classic => demand::generate_classic_beer_game_demand(),
            DemandProfile::Constant => demand::generate_constant_demand(base),
            DemandProfile::Normal => {
                let mut rng = StdRng::seed_from_u64(cli.seed);
                let std_dev = f64::from(base) * 0.4;
                demand::generate_normal_demand(
                    &mut rng,
                    settings.max_rounds as usize,
                    f64::from(base),
                    std_dev,
                )?
            }
        };
    }
    Ok(settings.sanitized())
}

fn build_policy(
    kind: PolicyKind,
    settings: &GameSettings,
    base_demand: f64,
    seed: u64,
) -> Box<dyn OrderPolicy> {
    let std_dev = base_demand * 0.4;
    match kind {
        PolicyKind::Naive => Box::new(NaivePolicy::new()),
        PolicyKind::Random => Box::new(RandomPolicy::seeded(0, (2.0 * base_demand) as u32, seed)),
        PolicyKind::BaseStock => Box::new(BaseStockPolicy::with_optimal_target(
            settings,
            base_demand,
            std_dev,
        )),
        PolicyKind::Sterman => Box::new(StermanHeuristic::with_optimal_target(
            settings,
            base_demand,
            std_dev,
        )),
    }
}
