//! Four-team beer distribution game.
//!
//! Retailer, Wholesaler, Distributor and Factory each order once per round.
//! When the last of the four orders arrives the round is run: goods and
//! orders move one step through two-round pipelines, stock and backlog are
//! settled, and holding/backlog cost is charged.
//!
//! - [`model`]: teams, pipelines, roles and the demand schedule.
//! - [`simulation`]: the [`Game`] engine, settings, errors and the public view.
//! - [`store`]: where live games are kept and locked.
//! - [`strategy`]: automated ordering policies.
//! - [`io`]: request parsing, demand generation and CSV export.

pub mod io;
pub mod model;
pub mod simulation;
pub mod store;
pub mod strategy;

pub use model::demand::DemandSchedule;
pub use model::role::Role;
pub use simulation::config::GameSettings;
pub use simulation::engine::{Game, GameId, RoundRecord, SubmitOutcome};
pub use simulation::error::{LifecycleError, SubmitError};
pub use simulation::view::{GameView, Viewer};
pub use store::{GameStore, InMemoryGameStore};
