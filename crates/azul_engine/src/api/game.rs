//! Game lifecycle
//!
//! Construction, round refills and round/game termination checks.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::board::has_complete_row;
use crate::constants::*;
use crate::error::{EngineError, EngineResult};
use crate::move_gen::no_tiles_left;
use crate::types::*;

impl GameState {
    /// Create a game with a deterministic tile sequence and deal the first round
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let a = GameState::seeded(0);
    /// let b = GameState::seeded(0);
    /// assert_eq!(a.serialize(), b.serialize());
    /// ```
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Create a game seeded from the operating system and deal the first round
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    fn with_rng(rng: StdRng) -> Self {
        let mut state = GameState {
            factories: [TileCounts::new(); FACTORY_COUNT],
            center: CenterPile::default(),
            players: [Player::default(), Player::default()],
            rng,
        };
        state.new_round();
        state
    }

    /// Uniformly random tile color
    pub fn random_tile(&mut self) -> Tile {
        Tile::ALL[self.rng.random_range(0..TILE_COLORS)]
    }

    /// Refill every factory, return the starting marker to the center and report who
    /// opens the round
    ///
    /// # Returns
    ///
    /// `0` when player 0 held the marker going into the call, `1` otherwise.
    pub fn new_round(&mut self) -> usize {
        for index in 0..FACTORY_COUNT {
            let mut factory = TileCounts::new();
            for _ in 0..TILES_PER_FACTORY {
                factory[self.random_tile()] += 1;
            }
            self.factories[index] = factory;
        }

        self.center.has_marker = true;

        let first_player = if self.players[0].has_starting_marker { 0 } else { 1 };
        for player in self.players.iter_mut() {
            player.has_starting_marker = false;
        }
        first_player
    }

    /// Every factory and the center hold zero tiles (the marker is not a tile)
    pub fn is_round_over(&self) -> bool {
        no_tiles_left(self)
    }

    /// Some player has completed a wall row
    pub fn is_game_over(&self) -> bool {
        self.players.iter().any(|player| has_complete_row(&player.wall))
    }

    pub fn player(&self, index: usize) -> EngineResult<&Player> {
        self.players
            .get(index)
            .ok_or(EngineError::PlayerOutOfRange { index })
    }

    pub fn player_mut(&mut self, index: usize) -> EngineResult<&mut Player> {
        self.players
            .get_mut(index)
            .ok_or(EngineError::PlayerOutOfRange { index })
    }

    /// Replace the factory contents, e.g. to set up a known position
    pub fn set_factories(&mut self, factories: [TileCounts; FACTORY_COUNT]) {
        self.factories = factories;
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
