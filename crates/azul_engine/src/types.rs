//! # Engine Core Types - Data Structures for the Tile-Drafting State Machine
//!
//! ## Overview
//!
//! This module defines the data structures shared by move generation, scoring and search.
//! Like the rest of the engine they favour small `Copy` values: a [`Move`] is a handful of
//! bytes, a factory is a five element count array and a wall is a single `u32`. The search
//! applies and undoes moves millions of times on one shared [`GameState`], so nothing in
//! the hot path allocates except the floor vector.
//!
//! ## The `GameState` Structure
//!
//! [`GameState`] is the authoritative board:
//! 1. **Factories** (`factories: [TileCounts; FACTORY_COUNT]`) - the draw piles
//! 2. **Center pile** (`center: CenterPile`) - overflow pool plus the starting marker
//! 3. **Players** (`players: [Player; 2]`) - pattern lines, wall, floor, points, bonuses
//! 4. **Random source** - seeded `StdRng` used to refill factories
//!
//! ## Tiles and Sentinels
//!
//! Only the five colors of [`Tile`] are real tiles. The two sentinel values of the board
//! game are expressed through the type system instead of extra enum variants:
//! - an empty pattern line is `tile: None`
//! - the starting marker only ever appears as [`FloorTile::StartingMarker`] on a floor or
//!   as the `has_marker` flag of the [`CenterPile`]
//!
//! ## The `Move` Structure - Reversible Draw Description
//!
//! A [`Move`] carries enough of the pre-move state to be undone exactly without a history
//! stack. For factory draws, `moving_to_center` records the other colors that were swept
//! into the center pile, so undo can split them back out of the center.

use std::fmt;
use std::ops::{Index, IndexMut};

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::bitset::Wall;
use super::constants::*;

/// Tile colors (order fixed for serialization and wall layout)
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tile {
    Blue = 0,
    Yellow = 1,
    Red = 2,
    Black = 3,
    Star = 4,
}

impl Tile {
    pub const ALL: [Tile; TILE_COLORS] =
        [Tile::Blue, Tile::Yellow, Tile::Red, Tile::Black, Tile::Star];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(idx: usize) -> Option<Tile> {
        Tile::ALL.get(idx).copied()
    }

    /// Column of this color in the given wall row
    #[inline]
    pub fn wall_column(self, row: usize) -> usize {
        WALL_COLUMN[row][self.index()]
    }

    /// Byte code used by the canonical encoding (0 is reserved for empty)
    #[inline]
    pub fn code(self) -> u8 {
        self as u8 + 1
    }

    pub fn name(self) -> &'static str {
        match self {
            Tile::Blue => "BLUE",
            Tile::Yellow => "YELLOW",
            Tile::Red => "RED",
            Tile::Black => "BLACK",
            Tile::Star => "STAR",
        }
    }

    pub fn from_name(name: &str) -> Option<Tile> {
        Tile::ALL.into_iter().find(|tile| tile.name() == name)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Multiset of tiles, indexed by color
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCounts(pub [u8; TILE_COLORS]);

impl TileCounts {
    pub fn new() -> Self {
        TileCounts([0; TILE_COLORS])
    }

    pub fn total(&self) -> u32 {
        self.0.iter().map(|&count| count as u32).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&count| count == 0)
    }

    pub fn clear(&mut self) {
        self.0 = [0; TILE_COLORS];
    }

    /// Adds `other` to `self`; returns false and leaves `self` untouched on overflow
    pub fn add(&mut self, other: &TileCounts) -> bool {
        if self.0.iter().zip(other.0).any(|(&count, extra)| count.checked_add(extra).is_none()) {
            return false;
        }
        for (count, extra) in self.0.iter_mut().zip(other.0) {
            *count += extra;
        }
        true
    }

    /// Removes `other` from `self`; returns false and leaves `self` untouched on underflow
    pub fn subtract(&mut self, other: &TileCounts) -> bool {
        if self.0.iter().zip(other.0).any(|(&count, less)| count < less) {
            return false;
        }
        for (count, less) in self.0.iter_mut().zip(other.0) {
            *count -= less;
        }
        true
    }

    /// Colors with a non-zero count, in color order
    pub fn iter(&self) -> impl Iterator<Item = (Tile, u8)> + '_ {
        Tile::ALL
            .into_iter()
            .map(move |tile| (tile, self[tile]))
            .filter(|&(_, count)| count > 0)
    }

    /// Packs the counts into one integer (3 bits per color), used as a sort key
    pub fn packed(&self) -> u16 {
        self.0
            .iter()
            .rev()
            .fold(0u16, |acc, &count| (acc << 3) | count as u16)
    }
}

impl Index<Tile> for TileCounts {
    type Output = u8;

    fn index(&self, tile: Tile) -> &u8 {
        &self.0[tile.index()]
    }
}

impl IndexMut<Tile> for TileCounts {
    fn index_mut(&mut self, tile: Tile) -> &mut u8 {
        &mut self.0[tile.index()]
    }
}

impl FromIterator<Tile> for TileCounts {
    fn from_iter<I: IntoIterator<Item = Tile>>(iter: I) -> Self {
        let mut counts = TileCounts::new();
        for tile in iter {
            counts[tile] += 1;
        }
        counts
    }
}

/// Center pile: tiles plus the starting marker until someone claims it
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CenterPile {
    pub tiles: TileCounts,
    pub has_marker: bool,
}

/// Content of a floor slot
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FloorTile {
    StartingMarker,
    Tile(Tile),
}


#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PatternLine {
    pub tile: Option<Tile>,
    pub space: u8,
}

impl PatternLine {
    /// Empty line for the given row (row i holds i + 1 tiles)
    pub fn new(row: usize) -> Self {
        PatternLine {
            tile: None,
            space: row as u8 + 1,
        }
    }

    pub fn is_full(&self) -> bool {
        self.space == 0
    }

    /// Tiles currently sitting on the line
    pub fn filled(&self, row: usize) -> u8 {
        row as u8 + 1 - self.space
    }

    pub fn accepts(&self, tile: Tile) -> bool {
        self.space > 0 && self.tile.map_or(true, |current| current == tile)
    }
}

/// Bonuses already paid out, so repeated scoring never pays them twice
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BonusFlags {
    pub rows: [bool; WALL_SIZE],
    pub columns: [bool; WALL_SIZE],
    pub colors: [bool; TILE_COLORS],
}

impl BonusFlags {
    pub(crate) fn packed(&self) -> [u8; 3] {
        let pack = |flags: &[bool]| {
            flags
                .iter()
                .enumerate()
                .fold(0u8, |acc, (i, &set)| acc | ((set as u8) << i))
        };
        [pack(&self.rows), pack(&self.columns), pack(&self.colors)]
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Player {
    pub pattern_lines: [PatternLine; WALL_SIZE],
    pub wall: Wall,
    pub floor: Vec<FloorTile>,
    pub points: u32,
    pub has_starting_marker: bool,
    pub bonuses: BonusFlags,
}

impl Default for Player {
    fn default() -> Self {
        Player {
            pattern_lines: std::array::from_fn(PatternLine::new),
            wall: Wall::new(),
            floor: Vec::new(),
            points: 0,
            has_starting_marker: false,
            bonuses: BonusFlags::default(),
        }
    }
}

/// Where a move draws its tiles from
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    Center,
    Factory(usize),
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Center => f.write_str("center"),
            Source::Factory(index) => write!(f, "factory {}", index + 1),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub drawing: Tile,
    pub source: Source,
    /// Tiles placed on the pattern line
    pub amount: u8,
    /// `None` sends every drawn tile to the floor
    pub pattern_line: Option<usize>,
    /// Drawn tiles that overflow to the floor
    pub floor_count: u8,
    pub first_draw_from_center: bool,
    /// Remaining factory tiles swept into the center (always empty for center draws)
    pub moving_to_center: TileCounts,
}

impl Move {
    #[inline]
    pub fn is_center_draw(&self) -> bool {
        self.source == Source::Center
    }

    /// Total tiles of `drawing` taken from the source
    #[inline]
    pub fn taken(&self) -> u8 {
        self.amount + self.floor_count
    }

    /// Pattern line index with the floor encoded as -1
    pub fn pattern_line_index(&self) -> i8 {
        self.pattern_line.map_or(-1, |line| line as i8)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x{} from {}", self.drawing, self.taken(), self.source)?;
        match self.pattern_line {
            Some(line) => write!(f, " -> line {}", line + 1)?,
            None => f.write_str(" -> floor")?,
        }
        if self.pattern_line.is_some() && self.floor_count > 0 {
            write!(f, " (+{} floor)", self.floor_count)?;
        }
        if self.first_draw_from_center {
            f.write_str(" [marker]")?;
        }
        Ok(())
    }
}

/// Points a pattern line yields (completed) or would yield once completed
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PointChange {
    pub pattern_line: usize,
    pub tile: Tile,
    pub points: u32,
    pub space_left: u8,
    pub completed: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PointsResult {
    pub point_changes: Vec<PointChange>,
    pub bonus_points: u32,
    pub floor_penalty: u32,
}

impl PointsResult {
    /// Points scored this round by completed lines and bonuses, minus the floor penalty
    pub fn realized_points(&self) -> i64 {
        let completed: u32 = self
            .point_changes
            .iter()
            .filter(|change| change.completed)
            .map(|change| change.points)
            .sum();
        completed as i64 + self.bonus_points as i64 - self.floor_penalty as i64
    }
}

/// Which parts of end-of-round scoring to run
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScoringMode {
    /// Move completed lines to the wall and charge the floor
    #[default]
    Normal,
    /// Normal scoring plus row, column and color bonuses
    IncludeBonus,
    /// Only the bonuses; pattern lines and floor are left alone
    BonusOnly,
}

impl ScoringMode {
    pub(crate) fn scores_lines(self) -> bool {
        self != ScoringMode::BonusOnly
    }

    pub(crate) fn scores_bonus(self) -> bool {
        self != ScoringMode::Normal
    }
}

/// Central game state structure for the engine
///
/// Holds the complete board. Search works on clones of this struct and mutates them
/// through `make_move` / `undo_move`; round scoring and refills are driver operations.
#[derive(Clone, Debug)]
pub struct GameState {
    pub factories: [TileCounts; FACTORY_COUNT],
    pub center: CenterPile,
    pub players: [Player; PLAYER_COUNT],
    pub(crate) rng: StdRng,
}
