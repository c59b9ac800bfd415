//! # Wall - 5x5 Scoring Grid as a Bitset
//!
//! ## Overview
//!
//! A player's wall has 25 cells, each either filled or empty. The grid is stored as the low
//! 25 bits of a single `u32`, so copying a wall, comparing two walls or counting filled
//! cells is a single integer operation. Search copies walls constantly (scratch copies for
//! non-mutating scoring queries) and this keeps those copies free.
//!
//! The cell at `(row, col)` maps to bit `row * WALL_SIZE + col`:
//!
//! ```text
//! bit  0..=4   row 0
//! bit  5..=9   row 1
//! ...
//! bit 20..=24  row 4
//! ```
//!
//! Row, column and color-set completion checks are mask comparisons against precomputed
//! masks.

use crate::constants::{TILE_COLORS, WALL_COLUMN, WALL_SIZE};
use crate::types::Tile;

const ROW_MASK: u32 = 0b11111;
const FULL_MASK: u32 = (1 << (WALL_SIZE * WALL_SIZE)) - 1;

const fn column_mask(col: usize) -> u32 {
    let mut mask = 0;
    let mut row = 0;
    while row < WALL_SIZE {
        mask |= 1 << (row * WALL_SIZE + col);
        row += 1;
    }
    mask
}

const fn color_mask(color: usize) -> u32 {
    let mut mask = 0;
    let mut row = 0;
    while row < WALL_SIZE {
        mask |= 1 << (row * WALL_SIZE + WALL_COLUMN[row][color]);
        row += 1;
    }
    mask
}

const COLUMN_MASKS: [u32; WALL_SIZE] = [
    column_mask(0),
    column_mask(1),
    column_mask(2),
    column_mask(3),
    column_mask(4),
];

const COLOR_MASKS: [u32; TILE_COLORS] = [
    color_mask(0),
    color_mask(1),
    color_mask(2),
    color_mask(3),
    color_mask(4),
];

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Wall(pub u32);

impl Wall {
    pub fn new() -> Self {
        Wall(0)
    }

    #[inline]
    fn bit(row: usize, col: usize) -> u32 {
        debug_assert!(row < WALL_SIZE && col < WALL_SIZE);
        1 << (row * WALL_SIZE + col)
    }

    pub fn insert(&mut self, row: usize, col: usize) {
        self.0 |= Self::bit(row, col);
    }

    pub fn remove(&mut self, row: usize, col: usize) {
        self.0 &= !Self::bit(row, col);
    }

    #[inline]
    pub fn contains(&self, row: usize, col: usize) -> bool {
        (self.0 & Self::bit(row, col)) != 0
    }

    /// Whether the cell reserved for `tile` in `row` is filled
    #[inline]
    pub fn has_tile(&self, row: usize, tile: Tile) -> bool {
        self.contains(row, tile.wall_column(row))
    }

    #[inline]
    pub fn count_ones(&self) -> u32 {
        self.0.count_ones()
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    pub fn is_full(&self) -> bool {
        self.0 & FULL_MASK == FULL_MASK
    }

    pub fn row_complete(&self, row: usize) -> bool {
        let mask = ROW_MASK << (row * WALL_SIZE);
        self.0 & mask == mask
    }

    pub fn column_complete(&self, col: usize) -> bool {
        self.0 & COLUMN_MASKS[col] == COLUMN_MASKS[col]
    }

    /// All five cells of one color are filled
    pub fn color_complete(&self, tile: Tile) -> bool {
        let mask = COLOR_MASKS[tile.index()];
        self.0 & mask == mask
    }

    pub fn filled_in_row(&self, row: usize) -> u32 {
        ((self.0 >> (row * WALL_SIZE)) & ROW_MASK).count_ones()
    }
}
