//! Command-line configuration for engine-vs-engine play

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{ensure, Result};
use azul_engine::constants::{DEFAULT_SECS_PER_MOVE, MAX_DEPTH};
use azul_engine::{Evaluator, EvaluatorKind, SearchOptions};
use clap::Parser;

/// Play Azul duels between two engine players
#[derive(Parser, Debug, Clone)]
#[command(name = "azul")]
#[command(about = "Engine-vs-engine Azul duels", long_about = None)]
pub struct Config {
    /// Seed for the first game (later games use seed + 1, seed + 2, ...); random if omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Thinking time per move, in seconds
    #[arg(long, default_value_t = DEFAULT_SECS_PER_MOVE)]
    pub think_time: f32,

    /// Deepest iterative-deepening pass
    #[arg(long, default_value_t = MAX_DEPTH)]
    pub max_depth: u32,

    /// Disable the transposition table
    #[arg(long)]
    pub no_tt: bool,

    /// Evaluator for player 1 (points | potential)
    #[arg(long, default_value = "potential")]
    pub eval0: EvaluatorKind,

    /// Evaluator for player 2 (points | potential)
    #[arg(long, default_value = "points")]
    pub eval1: EvaluatorKind,

    /// Number of games to play
    #[arg(long, default_value_t = 1)]
    pub games: u32,

    /// Write the final position of the last game as a JSON snapshot
    #[arg(long)]
    pub snapshot_out: Option<PathBuf>,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.think_time.is_finite() && self.think_time > 0.0,
            "think time must be a positive number of seconds, got {}",
            self.think_time
        );
        ensure!(self.max_depth >= 1, "max depth must be at least 1");
        ensure!(self.games >= 1, "at least one game must be played");
        Ok(())
    }

    pub fn time_budget(&self) -> Duration {
        Duration::from_secs_f32(self.think_time)
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions::default()
            .with_time_budget(self.time_budget())
            .with_max_depth(self.max_depth)
            .with_transposition_table(!self.no_tt)
    }

    pub fn evaluators(&self) -> [Box<dyn Evaluator>; 2] {
        [self.eval0.build(), self.eval1.build()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::parse_from(["azul"]);
        assert_eq!(config.seed, None);
        assert_eq!(config.think_time, DEFAULT_SECS_PER_MOVE);
        assert_eq!(config.max_depth, MAX_DEPTH);
        assert_eq!(config.eval0, EvaluatorKind::Potential);
        assert_eq!(config.eval1, EvaluatorKind::Points);
        assert!(config.validate().is_ok());

        let options = config.search_options();
        assert!(options.use_transposition_table);
        assert_eq!(options.time_budget, Duration::from_secs(1));
    }

    #[test]
    fn test_flags() {
        let config = Config::parse_from([
            "azul",
            "--seed",
            "7",
            "--think-time",
            "0.25",
            "--max-depth",
            "3",
            "--no-tt",
            "--eval1",
            "potential",
            "--games",
            "4",
        ]);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.games, 4);
        assert_eq!(config.eval1, EvaluatorKind::Potential);

        let options = config.search_options();
        assert_eq!(options.max_depth, 3);
        assert!(!options.use_transposition_table);
        assert_eq!(options.time_budget, Duration::from_millis(250));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Config::try_parse_from(["azul", "--eval0", "neural"]).is_err());

        let config = Config::parse_from(["azul", "--think-time", "0"]);
        assert!(config.validate().is_err());
    }
}
