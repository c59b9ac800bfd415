//! Canonical position encoding and transposition table
//!
//! `serialize` produces a byte string that is equal for two states exactly when they are
//! equivalent under the rules. Factories are interchangeable, so their encodings are
//! sorted before being written. The RNG is not part of the position.

use std::collections::HashMap;

use super::types::*;

impl GameState {
    /// Canonical byte encoding of the position
    ///
    /// Layout: sorted factory counts, center counts and marker flag, then per player the
    /// marker flag, floor length, whether the floor opens with the marker, points, pattern
    /// lines, wall bits and bonus flags. Floor colors and their order never affect scoring,
    /// so only the slot count is written.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(128);

        let mut factories = self.factories;
        factories.sort_unstable_by_key(TileCounts::packed);
        for factory in &factories {
            out.extend_from_slice(&factory.0);
        }

        out.extend_from_slice(&self.center.tiles.0);
        out.push(self.center.has_marker as u8);

        for player in &self.players {
            out.push(player.has_starting_marker as u8);
            out.push(player.floor.len() as u8);
            out.push((player.floor.first() == Some(&FloorTile::StartingMarker)) as u8);
            out.extend_from_slice(&player.points.to_le_bytes());
            for line in &player.pattern_lines {
                out.push(line.tile.map_or(0, Tile::code));
                out.push(line.space);
            }
            out.extend_from_slice(&player.wall.0.to_le_bytes());
            out.extend_from_slice(&player.bonuses.packed());
        }

        out
    }
}

/// How a stored score relates to the true value
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Bound {
    Exact,
    /// Search failed high: true score is at least `score`
    Lower,
    /// Search failed low: true score is at most `score`
    Upper,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TableEntry {
    pub score: f32,
    pub depth: u32,
    pub bound: Bound,
}

/// Result of probing the table for a node
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Probe {
    /// Stored exact score (or a bound that closes the window) answers the node
    Cutoff(f32),
    /// Window narrowed by a stored bound
    Window { alpha: f32, beta: f32 },
    Miss,
}

/// Cache from position (plus side to move) to a previous search result
///
/// Owned by one search and cleared between searches.
#[derive(Debug, Default)]
pub struct TranspositionTable {
    entries: HashMap<Vec<u8>, TableEntry>,
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table key: canonical encoding followed by the side to move
    pub fn key(state: &GameState, turn: usize) -> Vec<u8> {
        let mut key = state.serialize();
        key.push(turn as u8);
        key
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Look up a node searched to at least `depth`
    pub fn probe(&self, key: &[u8], depth: u32, alpha: f32, beta: f32) -> Probe {
        let Some(entry) = self.entries.get(key) else {
            return Probe::Miss;
        };
        if entry.depth < depth {
            return Probe::Miss;
        }

        let (alpha, beta) = match entry.bound {
            Bound::Exact => return Probe::Cutoff(entry.score),
            Bound::Lower => (alpha.max(entry.score), beta),
            Bound::Upper => (alpha, beta.min(entry.score)),
        };
        if alpha >= beta {
            Probe::Cutoff(entry.score)
        } else {
            Probe::Window { alpha, beta }
        }
    }

    /// Store a result, classifying it against the window the node was searched with
    pub fn store(&mut self, key: Vec<u8>, score: f32, depth: u32, alpha_orig: f32, beta: f32) {
        let bound = if score <= alpha_orig {
            Bound::Upper
        } else if score >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        };

        match self.entries.get(&key) {
            Some(existing) if existing.depth > depth => {}
            _ => {
                self.entries.insert(key, TableEntry { score, depth, bound });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;

    #[test]
    fn test_serialize_ignores_factory_order() {
        let mut state = GameState::seeded(21);
        let before = state.serialize();
        state.factories.reverse();
        assert_eq!(state.serialize(), before);
        state.factories.swap(0, 3);
        assert_eq!(state.serialize(), before);
    }

    #[test]
    fn test_serialize_sees_every_field() {
        let base = GameState::seeded(21);
        let encoded = base.serialize();
        assert_eq!(
            encoded.len(),
            FACTORY_COUNT * TILE_COLORS + TILE_COLORS + 1 + PLAYER_COUNT * (3 + 4 + 2 * WALL_SIZE + 4 + 3),
            "Fresh round has empty floors"
        );

        let mut changed = base.clone();
        changed.players[1].points += 1;
        assert_ne!(changed.serialize(), encoded, "Points are encoded");

        let mut changed = base.clone();
        changed.players[0].bonuses.columns[2] = true;
        assert_ne!(changed.serialize(), encoded, "Bonus flags are encoded");

        let mut changed = base.clone();
        changed.center.has_marker = false;
        assert_ne!(changed.serialize(), encoded, "Marker location is encoded");

        let mut changed = base.clone();
        changed.players[0].floor.push(FloorTile::Tile(Tile::Red));
        assert_ne!(changed.serialize(), encoded, "Floor is encoded");
    }

    #[test]
    fn test_serialize_ignores_floor_order() {
        //! Dumping two factories to the floor in either order reaches the same position
        let mut start = GameState::seeded(8);
        let mut factories = [TileCounts::new(); FACTORY_COUNT];
        factories[0] = TileCounts([4, 0, 0, 0, 0]);
        factories[1] = TileCounts([0, 0, 4, 0, 0]);
        factories[2] = TileCounts([0, 4, 0, 0, 0]);
        start.set_factories(factories);

        let floor_dump = |state: &GameState, player: usize, factory: usize| {
            state
                .all_moves(player)
                .into_iter()
                .find(|mv| mv.source == Source::Factory(factory) && mv.pattern_line.is_none())
                .expect("floor-only draw is always generated")
        };

        let play = |order: [usize; 2]| {
            let mut state = start.clone();
            let first = floor_dump(&state, 0, order[0]);
            state.make_move(0, &first).expect("legal move applies");
            let reply = floor_dump(&state, 1, 2);
            state.make_move(1, &reply).expect("legal move applies");
            let second = floor_dump(&state, 0, order[1]);
            state.make_move(0, &second).expect("legal move applies");
            state
        };

        let blue_first = play([0, 1]);
        let red_first = play([1, 0]);
        assert_ne!(blue_first.players[0].floor, red_first.players[0].floor);
        assert_eq!(
            blue_first.calculate_points(ScoringMode::Normal),
            red_first.calculate_points(ScoringMode::Normal)
        );
        assert_eq!(blue_first.serialize(), red_first.serialize());
        assert_eq!(
            TranspositionTable::key(&blue_first, 1),
            TranspositionTable::key(&red_first, 1),
            "Transposed draws share a table entry"
        );
    }

    #[test]
    fn test_serialize_sees_marker_on_floor() {
        let base = GameState::seeded(4);
        let mut tiles_only = base.clone();
        tiles_only.players[0].floor = vec![FloorTile::Tile(Tile::Red), FloorTile::Tile(Tile::Red)];
        let mut with_marker = base.clone();
        with_marker.players[0].floor = vec![FloorTile::StartingMarker, FloorTile::Tile(Tile::Red)];
        assert_ne!(tiles_only.serialize(), with_marker.serialize());
    }

    #[test]
    fn test_serialize_ignores_rng() {
        let mut a = GameState::seeded(1);
        let b = a.clone();
        let _ = a.random_tile();
        assert_eq!(a.serialize(), b.serialize());
    }

    #[test]
    fn test_probe_respects_depth() {
        let mut table = TranspositionTable::new();
        table.store(vec![1, 2, 3], 4.0, 2, -10.0, 10.0);

        assert_eq!(table.probe(&[1, 2, 3], 2, -10.0, 10.0), Probe::Cutoff(4.0));
        assert_eq!(table.probe(&[1, 2, 3], 3, -10.0, 10.0), Probe::Miss, "Shallow entry");
        assert_eq!(table.probe(&[9], 1, -10.0, 10.0), Probe::Miss);
    }

    #[test]
    fn test_bounds_narrow_window() {
        let mut table = TranspositionTable::new();
        table.store(vec![1], 6.0, 3, -10.0, 5.0);
        assert_eq!(
            table.probe(&[1], 3, -10.0, 10.0),
            Probe::Window {
                alpha: 6.0,
                beta: 10.0
            }
        );
        assert_eq!(table.probe(&[1], 3, -10.0, 5.0), Probe::Cutoff(6.0));

        table.store(vec![2], -3.0, 3, -1.0, 5.0);
        assert_eq!(
            table.probe(&[2], 1, -10.0, 10.0),
            Probe::Window {
                alpha: -10.0,
                beta: -3.0
            }
        );
    }

    #[test]
    fn test_deeper_entry_not_overwritten() {
        let mut table = TranspositionTable::new();
        table.store(vec![7], 1.0, 5, -10.0, 10.0);
        table.store(vec![7], 2.0, 1, -10.0, 10.0);
        assert_eq!(table.probe(&[7], 5, -10.0, 10.0), Probe::Cutoff(1.0));
        assert_eq!(table.len(), 1);
        table.clear();
        assert!(table.is_empty());
    }

    #[test]
    fn test_key_includes_side_to_move() {
        let state = GameState::seeded(3);
        assert_ne!(
            TranspositionTable::key(&state, 0),
            TranspositionTable::key(&state, 1)
        );
    }
}
