//! Board utilities and scoring helpers
//!
//! Fundamental wall and floor arithmetic used by scoring and evaluation:
//! - Adjacency points for a tile placed on the wall
//! - Floor penalties by slot count
//! - One-shot row / column / color bonuses

use super::bitset::Wall;
use super::constants::*;
use super::types::*;

/// Length of the filled run through `(row, col)` along one axis, counting only neighbours
fn run_neighbours(wall: &Wall, row: usize, col: usize, dr: isize, dc: isize) -> u32 {
    let mut count = 0;
    for sign in [-1isize, 1] {
        let mut r = row as isize + dr * sign;
        let mut c = col as isize + dc * sign;
        while (0..WALL_SIZE as isize).contains(&r)
            && (0..WALL_SIZE as isize).contains(&c)
            && wall.contains(r as usize, c as usize)
        {
            count += 1;
            r += dr * sign;
            c += dc * sign;
        }
    }
    count
}

/// Points for placing a tile at `(row, col)` given the other filled cells of `wall`
///
/// An isolated tile scores 1. Otherwise the tile scores the length of its horizontal
/// run (if it has a horizontal neighbour) plus the length of its vertical run (if it has a
/// vertical neighbour). The cell itself may or may not already be set in `wall`.
pub fn placement_points(wall: &Wall, row: usize, col: usize) -> u32 {
    let horizontal = run_neighbours(wall, row, col, 0, 1);
    let vertical = run_neighbours(wall, row, col, 1, 0);

    match (horizontal, vertical) {
        (0, 0) => 1,
        (h, 0) => h + 1,
        (0, v) => v + 1,
        (h, v) => h + 1 + v + 1,
    }
}

/// Penalty for a floor holding `slots` tiles (the starting marker counts as a slot)
pub fn floor_penalty(slots: usize) -> u32 {
    let table: u32 = FLOOR_PENALTIES.iter().take(slots).sum();
    let overflow = slots.saturating_sub(FLOOR_PENALTIES.len()) as u32;
    table + overflow * FLOOR_OVERFLOW_PENALTY
}

/// Bonus points for every completed row, column and color set not yet flagged
///
/// Marks the awarded bonuses in `flags`; the caller decides whether to keep them.
pub fn award_bonuses(wall: &Wall, flags: &mut BonusFlags) -> u32 {
    let mut points = 0;

    for i in 0..WALL_SIZE {
        if !flags.rows[i] && wall.row_complete(i) {
            flags.rows[i] = true;
            points += HORIZONTAL_LINE_BONUS;
        }
        if !flags.columns[i] && wall.column_complete(i) {
            flags.columns[i] = true;
            points += VERTICAL_LINE_BONUS;
        }
    }

    for tile in Tile::ALL {
        if !flags.colors[tile.index()] && wall.color_complete(tile) {
            flags.colors[tile.index()] = true;
            points += FIVE_OF_A_KIND_BONUS;
        }
    }

    points
}

/// Whether any wall row is complete
pub fn has_complete_row(wall: &Wall) -> bool {
    (0..WALL_SIZE).any(|row| wall.row_complete(row))
}
