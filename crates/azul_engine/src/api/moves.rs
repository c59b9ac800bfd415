//! Move execution and validation
//!
//! `make_move` and `undo_move` are exact inverses: every field a move touches is
//! restored from the move itself, so the search needs no history stack. Both check
//! that the move fits the state before mutating anything.

use crate::error::{EngineError, EngineResult};
use crate::move_gen::generate_moves;
use crate::types::*;

impl GameState {
    /// All legal moves for `player` (empty for an out-of-range index)
    pub fn all_moves(&self, player: usize) -> Vec<Move> {
        generate_moves(self, player)
    }

    /// Apply a move for `player_index`
    ///
    /// # Arguments
    ///
    /// * `player_index` - Player making the draw (0 or 1)
    /// * `mv` - A move produced by [`GameState::all_moves`] for this state
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidMove`] when the source does not hold exactly the drawn
    /// tiles, the target line cannot take them, or the marker is not available. The state
    /// is left untouched in that case.
    pub fn make_move(&mut self, player_index: usize, mv: &Move) -> EngineResult<()> {
        let player = self
            .players
            .get_mut(player_index)
            .ok_or(EngineError::PlayerOutOfRange {
                index: player_index,
            })?;

        let mut center_after = self.center.tiles;
        match mv.source {
            Source::Center => {
                if self.center.tiles[mv.drawing] != mv.taken() {
                    return Err(EngineError::invalid_move(format!(
                        "center holds {} {} tiles, move takes {}",
                        self.center.tiles[mv.drawing],
                        mv.drawing,
                        mv.taken()
                    )));
                }
                if mv.first_draw_from_center != self.center.has_marker {
                    return Err(EngineError::invalid_move(
                        "starting marker flag does not match the center",
                    ));
                }
            }
            Source::Factory(index) => {
                let factory = self.factories.get(index).ok_or_else(|| {
                    EngineError::invalid_move(format!("factory {index} does not exist"))
                })?;
                let mut rest = *factory;
                rest[mv.drawing] = 0;
                if factory[mv.drawing] != mv.taken() || rest != mv.moving_to_center {
                    return Err(EngineError::invalid_move(format!(
                        "factory {index} does not match the move"
                    )));
                }
                if mv.first_draw_from_center {
                    return Err(EngineError::invalid_move(
                        "factory draws cannot take the starting marker",
                    ));
                }
                if !center_after.add(&mv.moving_to_center) {
                    return Err(EngineError::invalid_move(
                        "center cannot hold the tiles swept from the factory",
                    ));
                }
            }
        }

        if let Some(row) = mv.pattern_line {
            let line = player.pattern_lines.get(row).ok_or_else(|| {
                EngineError::invalid_move(format!("pattern line {row} does not exist"))
            })?;
            if mv.amount == 0 || !line.accepts(mv.drawing) || line.space < mv.amount {
                return Err(EngineError::invalid_move(format!(
                    "pattern line {} cannot take {} {}",
                    row + 1,
                    mv.amount,
                    mv.drawing
                )));
            }
            if player.wall.has_tile(row, mv.drawing) {
                return Err(EngineError::invalid_move(format!(
                    "wall row {} already holds {}",
                    row + 1,
                    mv.drawing
                )));
            }
        } else if mv.amount != 0 {
            return Err(EngineError::invalid_move("floor-only move with a line amount"));
        }

        if let Some(row) = mv.pattern_line {
            let line = &mut player.pattern_lines[row];
            line.tile = Some(mv.drawing);
            line.space -= mv.amount;
        }

        if mv.first_draw_from_center {
            player.floor.insert(0, FloorTile::StartingMarker);
            player.has_starting_marker = true;
            self.center.has_marker = false;
        }

        player
            .floor
            .extend(std::iter::repeat(FloorTile::Tile(mv.drawing)).take(mv.floor_count as usize));

        match mv.source {
            Source::Center => self.center.tiles[mv.drawing] = 0,
            Source::Factory(index) => {
                self.center.tiles = center_after;
                self.factories[index].clear();
            }
        }

        Ok(())
    }

    /// Reverse a move previously applied with [`GameState::make_move`]
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidMove`] when the state does not look like the result
    /// of applying `mv`; nothing is modified in that case.
    pub fn undo_move(&mut self, player_index: usize, mv: &Move) -> EngineResult<()> {
        let player = self
            .players
            .get_mut(player_index)
            .ok_or(EngineError::PlayerOutOfRange {
                index: player_index,
            })?;

        if let Some(row) = mv.pattern_line {
            let line = player.pattern_lines.get(row).ok_or_else(|| {
                EngineError::invalid_move(format!("pattern line {row} does not exist"))
            })?;
            if line.tile != Some(mv.drawing) || line.filled(row) < mv.amount {
                return Err(EngineError::invalid_move(format!(
                    "pattern line {} does not hold the drawn tiles",
                    row + 1
                )));
            }
        }

        let marker_slots = usize::from(mv.first_draw_from_center);
        let floor_count = mv.floor_count as usize;
        if player.floor.len() < floor_count + marker_slots {
            return Err(EngineError::invalid_move("floor is shorter than the move"));
        }
        let tail_start = player.floor.len() - floor_count;
        if player.floor[tail_start..]
            .iter()
            .any(|&slot| slot != FloorTile::Tile(mv.drawing))
        {
            return Err(EngineError::invalid_move("floor does not end with the drawn tiles"));
        }
        if mv.first_draw_from_center
            && (player.floor[0] != FloorTile::StartingMarker || self.center.has_marker)
        {
            return Err(EngineError::invalid_move("starting marker is not on the floor"));
        }

        match mv.source {
            Source::Center => {
                if self.center.tiles[mv.drawing] != 0 {
                    return Err(EngineError::invalid_move(
                        "center still holds the drawn color",
                    ));
                }
            }
            Source::Factory(index) => {
                let factory = self.factories.get(index).ok_or_else(|| {
                    EngineError::invalid_move(format!("factory {index} does not exist"))
                })?;
                let mut center = self.center.tiles;
                if !factory.is_empty() || !center.subtract(&mv.moving_to_center) {
                    return Err(EngineError::invalid_move(format!(
                        "factory {index} cannot be restored"
                    )));
                }
            }
        }

        if let Some(row) = mv.pattern_line {
            let line = &mut player.pattern_lines[row];
            if line.filled(row) == mv.amount {
                line.tile = None;
            }
            line.space += mv.amount;
        }

        player.floor.truncate(tail_start);
        if mv.first_draw_from_center {
            player.floor.remove(0);
            player.has_starting_marker = false;
            self.center.has_marker = true;
        }

        match mv.source {
            Source::Center => self.center.tiles[mv.drawing] = mv.taken(),
            Source::Factory(index) => {
                self.center.tiles.subtract(&mv.moving_to_center);
                let factory = &mut self.factories[index];
                *factory = mv.moving_to_center;
                factory[mv.drawing] = mv.taken();
            }
        }

        Ok(())
    }

    /// Apply a move from an untrusted caller; it must be one of `all_moves(player_index)`
    pub fn try_make_move(&mut self, player_index: usize, mv: &Move) -> EngineResult<()> {
        self.player(player_index)?;
        if !self.all_moves(player_index).contains(mv) {
            return Err(EngineError::invalid_move(format!(
                "{mv} is not legal for player {}",
                player_index + 1
            )));
        }
        self.make_move(player_index, mv)
    }

    /// Copy of the state with `mv` applied
    pub fn state_after_move(&self, player_index: usize, mv: &Move) -> EngineResult<GameState> {
        let mut next = self.clone();
        next.make_move(player_index, mv)?;
        Ok(next)
    }
}
