//! Monte-Carlo BINGO: generate cards, draw balls until a pattern completes, and tally which
//! pattern won and after how many balls.

pub mod card;
pub mod draw;
pub mod error;
pub mod export;
pub mod rules;
pub mod simulation;
pub mod statistics;
pub mod types;
pub mod win_detector;

pub use card::Card;
pub use error::BingoError;
pub use rules::{BingoRules, STANDARD_RULES, STANDARD_RULES_FREE_CENTER};
pub use simulation::{GameResult, RunControl, SimulationConfig, Simulator};
pub use statistics::StatsAggregator;
