//! Command-line self-play for the Azul duel engine

pub mod config;
pub mod driver;

pub use config::Config;
pub use driver::{play_game, run, GameRecord};
