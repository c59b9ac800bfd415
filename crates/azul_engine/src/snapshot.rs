//! JSON snapshot import/export
//!
//! The format mirrors the board a player sees: tile names in upper case, walls as
//! `"FULL"`/`"EMPTY"` grids, factories as color-to-count maps and a 1-based `turn`.
//! Import checks every field and reports the first problem it finds.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::bitset::Wall;
use crate::constants::*;
use crate::error::{EngineError, EngineResult};
use crate::types::*;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternLineSnapshot {
    pub tile: String,
    pub space: u8,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub pattern_lines: Vec<PatternLineSnapshot>,
    pub wall: Vec<Vec<String>>,
    pub floor: Vec<String>,
    pub points: u32,
    pub has_starting_marker: bool,
    #[serde(default)]
    pub bonuses: BonusFlags,
}

/// Serialized form of a position plus the side to move
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub player1: PlayerSnapshot,
    pub player2: PlayerSnapshot,
    pub factories: Vec<BTreeMap<String, u8>>,
    pub center_pile: BTreeMap<String, u8>,
    /// 1-based player to move
    pub turn: u8,
}

fn parse_tile(name: &str) -> EngineResult<Tile> {
    Tile::from_name(name).ok_or_else(|| EngineError::UnknownTile(name.to_string()))
}

fn counts_to_map(counts: &TileCounts) -> BTreeMap<String, u8> {
    counts
        .iter()
        .map(|(tile, count)| (tile.name().to_string(), count))
        .collect()
}

fn map_to_counts(map: &BTreeMap<String, u8>, what: &str) -> EngineResult<(TileCounts, u8)> {
    let mut counts = TileCounts::new();
    let mut markers = 0;
    for (name, &count) in map {
        if name == STARTING_MARKER_NAME {
            markers = count;
        } else {
            let tile = parse_tile(name)?;
            counts[tile] = counts[tile].checked_add(count).ok_or_else(|| {
                EngineError::invalid_snapshot(format!("{what}: too many {name} tiles"))
            })?;
        }
    }
    Ok((counts, markers))
}

fn player_to_snapshot(player: &Player) -> PlayerSnapshot {
    PlayerSnapshot {
        pattern_lines: player
            .pattern_lines
            .iter()
            .map(|line| PatternLineSnapshot {
                tile: line.tile.map_or(EMPTY_NAME, Tile::name).to_string(),
                space: line.space,
            })
            .collect(),
        wall: (0..WALL_SIZE)
            .map(|row| {
                (0..WALL_SIZE)
                    .map(|col| {
                        let name = if player.wall.contains(row, col) { FULL_NAME } else { EMPTY_NAME };
                        name.to_string()
                    })
                    .collect()
            })
            .collect(),
        floor: player
            .floor
            .iter()
            .map(|slot| match slot {
                FloorTile::StartingMarker => STARTING_MARKER_NAME.to_string(),
                FloorTile::Tile(tile) => tile.name().to_string(),
            })
            .collect(),
        points: player.points,
        has_starting_marker: player.has_starting_marker,
        bonuses: player.bonuses,
    }
}

fn player_from_snapshot(snapshot: &PlayerSnapshot, label: &str) -> EngineResult<Player> {
    if snapshot.pattern_lines.len() != WALL_SIZE {
        return Err(EngineError::invalid_snapshot(format!(
            "{label}: expected {WALL_SIZE} pattern lines, found {}",
            snapshot.pattern_lines.len()
        )));
    }
    if snapshot.wall.len() != WALL_SIZE || snapshot.wall.iter().any(|row| row.len() != WALL_SIZE) {
        return Err(EngineError::invalid_snapshot(format!(
            "{label}: wall must be {WALL_SIZE}x{WALL_SIZE}"
        )));
    }

    let mut wall = Wall::new();
    for (row, cells) in snapshot.wall.iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            match cell.as_str() {
                FULL_NAME => wall.insert(row, col),
                EMPTY_NAME => {}
                other => {
                    return Err(EngineError::invalid_snapshot(format!(
                        "{label}: wall cell ({row}, {col}) is {other:?}, expected FULL or EMPTY"
                    )))
                }
            }
        }
    }

    let mut pattern_lines = [PatternLine::new(0); WALL_SIZE];
    for (row, line) in snapshot.pattern_lines.iter().enumerate() {
        let capacity = row as u8 + 1;
        if line.space > capacity {
            return Err(EngineError::invalid_snapshot(format!(
                "{label}: pattern line {} has space {} but holds at most {capacity}",
                row + 1,
                line.space
            )));
        }
        let tile = if line.tile == EMPTY_NAME {
            None
        } else {
            Some(parse_tile(&line.tile)?)
        };
        if tile.is_none() != (line.space == capacity) {
            return Err(EngineError::invalid_snapshot(format!(
                "{label}: pattern line {} must be empty exactly when it has full space",
                row + 1
            )));
        }
        if let Some(tile) = tile {
            if wall.has_tile(row, tile) {
                return Err(EngineError::invalid_snapshot(format!(
                    "{label}: pattern line {} holds {tile} already on the wall",
                    row + 1
                )));
            }
        }
        pattern_lines[row] = PatternLine { tile, space: line.space };
    }

    let mut floor = Vec::with_capacity(snapshot.floor.len());
    for (index, name) in snapshot.floor.iter().enumerate() {
        if name == STARTING_MARKER_NAME {
            if index != 0 {
                return Err(EngineError::invalid_snapshot(format!(
                    "{label}: starting marker must be the first floor slot"
                )));
            }
            floor.push(FloorTile::StartingMarker);
        } else {
            floor.push(FloorTile::Tile(parse_tile(name)?));
        }
    }
    if floor.first() == Some(&FloorTile::StartingMarker) && !snapshot.has_starting_marker {
        return Err(EngineError::invalid_snapshot(format!(
            "{label}: starting marker on the floor but has_starting_marker is false"
        )));
    }

    Ok(Player {
        pattern_lines,
        wall,
        floor,
        points: snapshot.points,
        has_starting_marker: snapshot.has_starting_marker,
        bonuses: snapshot.bonuses,
    })
}

impl GameState {
    /// Snapshot of the position with `turn` (0-based) to move
    pub fn to_snapshot(&self, turn: usize) -> Snapshot {
        let mut center_pile = counts_to_map(&self.center.tiles);
        if self.center.has_marker {
            center_pile.insert(STARTING_MARKER_NAME.to_string(), 1);
        }

        Snapshot {
            player1: player_to_snapshot(&self.players[0]),
            player2: player_to_snapshot(&self.players[1]),
            factories: self.factories.iter().map(counts_to_map).collect(),
            center_pile,
            turn: turn as u8 + 1,
        }
    }

    pub fn to_json(&self, turn: usize) -> EngineResult<String> {
        Ok(serde_json::to_string_pretty(&self.to_snapshot(turn))?)
    }

    /// Replace the position with a validated snapshot, keeping this state's RNG
    ///
    /// # Returns
    ///
    /// The 0-based player to move.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidSnapshot`] or [`EngineError::UnknownTile`] describing the first
    /// problem found. The state is unchanged on error.
    pub fn load_snapshot(&mut self, snapshot: &Snapshot) -> EngineResult<usize> {
        let turn = match snapshot.turn {
            1 | 2 => snapshot.turn as usize - 1,
            other => {
                return Err(EngineError::invalid_snapshot(format!(
                    "turn must be 1 or 2, found {other}"
                )))
            }
        };

        let players = [
            player_from_snapshot(&snapshot.player1, "player1")?,
            player_from_snapshot(&snapshot.player2, "player2")?,
        ];

        if snapshot.factories.len() != FACTORY_COUNT {
            return Err(EngineError::invalid_snapshot(format!(
                "expected {FACTORY_COUNT} factories, found {}",
                snapshot.factories.len()
            )));
        }
        let mut factories = [TileCounts::new(); FACTORY_COUNT];
        for (index, map) in snapshot.factories.iter().enumerate() {
            let what = format!("factory {}", index + 1);
            let (counts, markers) = map_to_counts(map, &what)?;
            if markers > 0 {
                return Err(EngineError::invalid_snapshot(format!(
                    "{what} holds the starting marker"
                )));
            }
            if counts.total() > TILES_PER_FACTORY as u32 {
                return Err(EngineError::invalid_snapshot(format!(
                    "{what} holds {} tiles, at most {TILES_PER_FACTORY} allowed",
                    counts.total()
                )));
            }
            factories[index] = counts;
        }

        let (center_tiles, markers) = map_to_counts(&snapshot.center_pile, "center pile")?;
        if markers > 1 {
            return Err(EngineError::invalid_snapshot(
                "center pile holds more than one starting marker",
            ));
        }
        let center_limit = (FACTORY_COUNT * (TILES_PER_FACTORY - 1)) as u32;
        if center_tiles.total() > center_limit {
            return Err(EngineError::invalid_snapshot(format!(
                "center pile holds {} tiles, at most {center_limit} allowed",
                center_tiles.total()
            )));
        }
        let holders = players.iter().filter(|p| p.has_starting_marker).count() + markers as usize;
        if holders > 1 {
            return Err(EngineError::invalid_snapshot(
                "starting marker is claimed more than once",
            ));
        }

        self.factories = factories;
        self.center = CenterPile {
            tiles: center_tiles,
            has_marker: markers == 1,
        };
        self.players = players;
        Ok(turn)
    }

    /// Parse and load a JSON snapshot; see [`GameState::load_snapshot`]
    pub fn load_json(&mut self, json: &str) -> EngineResult<usize> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        self.load_snapshot(&snapshot)
    }

    /// Build a state from a JSON snapshot, with a fresh OS-seeded RNG
    pub fn from_json(json: &str) -> EngineResult<(GameState, usize)> {
        let mut state = GameState::new();
        let turn = state.load_json(json)?;
        Ok((state, turn))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn played_state() -> (GameState, usize) {
        let mut state = GameState::seeded(17);
        let mut turn = 0;
        for _ in 0..6 {
            let mv = state.all_moves(turn)[1];
            state.make_move(turn, &mv).expect("legal move applies");
            turn = 1 - turn;
        }
        (state, turn)
    }

    #[test]
    fn test_export_import_preserves_position() {
        let (state, turn) = played_state();
        let json = state.to_json(turn).expect("export succeeds");

        let mut loaded = GameState::seeded(99);
        let loaded_turn = loaded.load_json(&json).expect("import succeeds");
        assert_eq!(loaded_turn, turn);
        assert_eq!(loaded.serialize(), state.serialize());
    }

    #[test]
    fn test_export_format() {
        let state = GameState::seeded(17);
        let value: serde_json::Value =
            serde_json::from_str(&state.to_json(1).expect("export succeeds")).expect("valid json");

        assert_eq!(value["turn"], 2);
        assert_eq!(value["center_pile"]["STARTING_MARKER"], 1);
        assert_eq!(value["player1"]["pattern_lines"][2]["tile"], "EMPTY");
        assert_eq!(value["player1"]["pattern_lines"][2]["space"], 3);
        assert_eq!(value["player2"]["wall"][4][4], "EMPTY");
        assert_eq!(value["factories"].as_array().map(Vec::len), Some(FACTORY_COUNT));
    }

    #[test]
    fn test_missing_bonuses_default() {
        let state = GameState::seeded(5);
        let mut value = serde_json::to_value(state.to_snapshot(0)).expect("serializable");
        if let Some(player) = value["player1"].as_object_mut() {
            player.remove("bonuses");
        }

        let mut loaded = GameState::seeded(5);
        loaded
            .load_json(&value.to_string())
            .expect("bonuses are optional");
        assert_eq!(loaded.players[0].bonuses, BonusFlags::default());
    }

    #[test]
    fn test_rejects_unknown_tile() {
        let state = GameState::seeded(5);
        let mut snapshot = state.to_snapshot(0);
        snapshot.player2.floor.push("PURPLE".to_string());

        let err = GameState::seeded(5)
            .load_snapshot(&snapshot)
            .expect_err("unknown tile must fail");
        assert!(matches!(err, EngineError::UnknownTile(ref name) if name == "PURPLE"));
    }

    #[test]
    fn test_rejects_bad_geometry() {
        let state = GameState::seeded(5);

        let mut snapshot = state.to_snapshot(0);
        snapshot.player1.pattern_lines.pop();
        let err = GameState::seeded(5).load_snapshot(&snapshot).expect_err("4 lines");
        assert!(err.to_string().contains("pattern lines"), "got: {err}");

        let mut snapshot = state.to_snapshot(0);
        snapshot.player1.pattern_lines[0].space = 2;
        assert!(GameState::seeded(5).load_snapshot(&snapshot).is_err());

        let mut snapshot = state.to_snapshot(0);
        snapshot.player2.wall[1][1] = "HALF".to_string();
        let err = GameState::seeded(5).load_snapshot(&snapshot).expect_err("bad cell");
        assert!(err.to_string().contains("(1, 1)"), "got: {err}");

        let mut snapshot = state.to_snapshot(0);
        snapshot.factories[0].insert("RED".to_string(), 4);
        snapshot.factories[0].insert("BLUE".to_string(), 4);
        assert!(GameState::seeded(5).load_snapshot(&snapshot).is_err());
    }

    #[test]
    fn test_rejects_inconsistent_rules() {
        let state = GameState::seeded(5);

        let mut snapshot = state.to_snapshot(0);
        snapshot.turn = 3;
        assert!(GameState::seeded(5).load_snapshot(&snapshot).is_err());

        let mut snapshot = state.to_snapshot(0);
        snapshot.player1.has_starting_marker = true;
        let err = GameState::seeded(5).load_snapshot(&snapshot).expect_err("two markers");
        assert!(err.to_string().contains("more than once"), "got: {err}");

        let mut snapshot = state.to_snapshot(0);
        snapshot.player1.pattern_lines[1] = PatternLineSnapshot {
            tile: "EMPTY".to_string(),
            space: 1,
        };
        assert!(GameState::seeded(5).load_snapshot(&snapshot).is_err());

        let mut snapshot = state.to_snapshot(0);
        snapshot.player1.floor = vec!["RED".to_string(), "STARTING_MARKER".to_string()];
        assert!(GameState::seeded(5).load_snapshot(&snapshot).is_err());
    }

    #[test]
    fn test_rejects_overfull_center() {
        let state = GameState::seeded(5);
        let mut snapshot = state.to_snapshot(0);
        snapshot.center_pile.insert("BLUE".to_string(), 254);
        snapshot.factories[0] = BTreeMap::from([("BLUE".to_string(), 2), ("RED".to_string(), 2)]);

        let mut loaded = GameState::seeded(5);
        let before = loaded.serialize();
        let err = loaded.load_snapshot(&snapshot).expect_err("center beyond any reachable size");
        assert!(matches!(err, EngineError::InvalidSnapshot { .. }), "got: {err}");
        assert!(err.to_string().contains("center pile holds 254"), "got: {err}");
        assert_eq!(loaded.serialize(), before, "failed import leaves the state alone");

        snapshot.center_pile.insert("BLUE".to_string(), 15);
        let turn = loaded.load_snapshot(&snapshot).expect("largest reachable center");
        let mv = loaded
            .all_moves(turn)
            .into_iter()
            .find(|mv| mv.source == Source::Factory(0) && mv.drawing == Tile::Red)
            .expect("factory 0 offers red");
        loaded.make_move(turn, &mv).expect("sweeping blue into the center fits");
        assert_eq!(loaded.center.tiles[Tile::Blue], 17);
    }

    #[test]
    fn test_rejects_malformed_json() {
        let mut state = GameState::seeded(5);
        let before = state.serialize();
        let err = state.load_json("{\"player1\": 3}").expect_err("wrong shape");
        assert!(matches!(err, EngineError::Json(_)));
        assert_eq!(state.serialize(), before);
    }
}
