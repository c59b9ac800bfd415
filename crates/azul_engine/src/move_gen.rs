//! Move generation
//!
//! Enumerates every legal draw for a player. Sources are visited center first,
//! then factories in order; within a source, colors in [`Tile::ALL`] order. For
//! each color the floor-only move comes first, followed by one move per pattern
//! line that can take the color.

use super::constants::*;
use super::types::*;

/// Pattern lines of `player` that can receive `tile`
///
/// A line qualifies when it is empty or already holds `tile`, still has space, and the
/// wall cell of `tile` in that row is free.
pub fn open_lines(player: &Player, tile: Tile) -> impl Iterator<Item = usize> + '_ {
    (0..WALL_SIZE).filter(move |&row| {
        player.pattern_lines[row].accepts(tile) && !player.wall.has_tile(row, tile)
    })
}

fn push_source_moves(
    moves: &mut Vec<Move>,
    player: &Player,
    source: Source,
    counts: &TileCounts,
    first_draw_from_center: bool,
) {
    for (tile, count) in counts.iter() {
        let moving_to_center = match source {
            Source::Center => TileCounts::new(),
            Source::Factory(_) => {
                let mut rest = *counts;
                rest[tile] = 0;
                rest
            }
        };

        let base = Move {
            drawing: tile,
            source,
            amount: 0,
            pattern_line: None,
            floor_count: count,
            first_draw_from_center,
            moving_to_center,
        };
        moves.push(base);

        for row in open_lines(player, tile) {
            let amount = count.min(player.pattern_lines[row].space);
            moves.push(Move {
                amount,
                pattern_line: Some(row),
                floor_count: count - amount,
                ..base
            });
        }
    }
}

/// All legal moves for `player_index`; empty when the index is out of range or
/// the round is over
pub fn generate_moves(state: &GameState, player_index: usize) -> Vec<Move> {
    let Some(player) = state.players.get(player_index) else {
        return Vec::new();
    };

    let mut moves = Vec::with_capacity(64);
    push_source_moves(
        &mut moves,
        player,
        Source::Center,
        &state.center.tiles,
        state.center.has_marker,
    );
    for (index, factory) in state.factories.iter().enumerate() {
        push_source_moves(&mut moves, player, Source::Factory(index), factory, false);
    }
    moves
}

/// Whether there is nothing left to draw
pub fn no_tiles_left(state: &GameState) -> bool {
    state.center.tiles.is_empty() && state.factories.iter().all(TileCounts::is_empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_state() -> GameState {
        let mut state = GameState::seeded(7);
        for factory in state.factories.iter_mut() {
            factory.clear();
        }
        state.center = CenterPile::default();
        state
    }

    #[test]
    fn test_five_single_tile_factories_give_thirty_moves() {
        //! Each color: one floor move plus five open lines
        let mut state = empty_state();
        for (index, tile) in Tile::ALL.into_iter().enumerate() {
            state.factories[index][tile] = 1;
        }

        let moves = generate_moves(&state, 0);
        assert_eq!(moves.len(), 30);
        assert!(moves.iter().all(|m| !m.is_center_draw()));
    }

    #[test]
    fn test_floor_move_comes_first_per_color() {
        let mut state = empty_state();
        state.factories[2][Tile::Red] = 3;
        state.factories[2][Tile::Blue] = 1;

        let moves = generate_moves(&state, 0);
        let first_red = moves
            .iter()
            .position(|m| m.drawing == Tile::Red)
            .expect("red moves should exist");
        assert_eq!(moves[first_red].pattern_line, None);
        assert_eq!(moves[first_red].floor_count, 3);
        assert_eq!(moves[first_red].moving_to_center[Tile::Blue], 1);
        assert_eq!(moves[first_red].moving_to_center[Tile::Red], 0);
    }

    #[test]
    fn test_amount_capped_by_space() {
        let mut state = empty_state();
        state.factories[0][Tile::Black] = 4;

        let moves = generate_moves(&state, 0);
        let line0 = moves
            .iter()
            .find(|m| m.pattern_line == Some(0))
            .expect("line 0 move should exist");
        assert_eq!(line0.amount, 1);
        assert_eq!(line0.floor_count, 3);

        let line4 = moves
            .iter()
            .find(|m| m.pattern_line == Some(4))
            .expect("line 4 move should exist");
        assert_eq!(line4.amount, 4);
        assert_eq!(line4.floor_count, 0);
    }

    #[test]
    fn test_blocked_lines_are_skipped() {
        let mut state = empty_state();
        state.factories[0][Tile::Yellow] = 2;
        // Line 1 holds another color, wall row 2 already has yellow, line 3 is full
        state.players[0].pattern_lines[1] = PatternLine {
            tile: Some(Tile::Blue),
            space: 1,
        };
        state.players[0]
            .wall
            .insert(2, Tile::Yellow.wall_column(2));
        state.players[0].pattern_lines[3] = PatternLine {
            tile: Some(Tile::Yellow),
            space: 0,
        };

        let lines: Vec<_> = generate_moves(&state, 0)
            .iter()
            .filter_map(|m| m.pattern_line)
            .collect();
        assert_eq!(lines, vec![0, 4]);
    }

    #[test]
    fn test_center_moves_carry_marker_flag() {
        let mut state = empty_state();
        state.center.has_marker = true;
        state.center.tiles[Tile::Star] = 2;
        state.factories[1][Tile::Star] = 1;

        let moves = generate_moves(&state, 1);
        for m in &moves {
            assert_eq!(
                m.first_draw_from_center,
                m.is_center_draw(),
                "Only center draws take the marker"
            );
        }
        assert!(moves[0].is_center_draw(), "Center is visited first");
    }

    #[test]
    fn test_no_moves_when_empty() {
        let state = empty_state();
        assert!(no_tiles_left(&state));
        assert!(generate_moves(&state, 0).is_empty());
        assert!(generate_moves(&state, 5).is_empty());
    }
}
