//! # Engine Constants - Board Geometry, Scoring Tables & Search Parameters
//!
//! ## Overview
//!
//! This module centralizes the fixed numbers of the game: how many factories are laid out,
//! how many tiles each one receives, the size of the wall, the floor penalty table and the
//! bonus values awarded for completed rows, columns and color sets. The search tuning
//! parameters (score bounds, depth cap) live here as well so that the state engine and the
//! search agree on a single source of truth.
//!
//! ## Wall Layout
//!
//! Each row of the wall is a left rotation of the color order
//! `[Blue, Yellow, Red, Black, Star]` by the row index:
//!
//! ```text
//! row 0:  B  Y  R  K  S
//! row 1:  S  B  Y  R  K
//! row 2:  K  S  B  Y  R
//! row 3:  R  K  S  B  Y
//! row 4:  Y  R  K  S  B
//! ```
//!
//! so the column of a color in a given row is `(color_index + row) % WALL_SIZE`. The
//! [`WALL_COLUMN`] lookup table stores the result for O(1) access during move generation
//! and scoring.
//!
//! ## Floor Penalties
//!
//! Floor slots are charged by position. The first seven slots follow
//! [`FLOOR_PENALTIES`]; every slot past the table costs [`FLOOR_OVERFLOW_PENALTY`].
//! The starting marker occupies a slot like any tile.

/// Number of factories laid out for a two player game
pub const FACTORY_COUNT: usize = 5;

/// Tiles placed on each factory at the start of a round
pub const TILES_PER_FACTORY: usize = 4;

/// Side length of the wall; also the number of pattern lines
pub const WALL_SIZE: usize = 5;

/// Number of real tile colors
pub const TILE_COLORS: usize = 5;

/// Number of players at the table
pub const PLAYER_COUNT: usize = 2;

pub const FLOOR_PENALTIES: [u32; 7] = [1, 1, 2, 2, 2, 3, 3];
pub const FLOOR_OVERFLOW_PENALTY: u32 = 3;

pub const HORIZONTAL_LINE_BONUS: u32 = 2;
pub const VERTICAL_LINE_BONUS: u32 = 7;
pub const FIVE_OF_A_KIND_BONUS: u32 = 10;

/// WALL_COLUMN[row][color_index] => column of that color in the row
pub const WALL_COLUMN: [[usize; TILE_COLORS]; WALL_SIZE] = [
    [0, 1, 2, 3, 4],
    [1, 2, 3, 4, 0],
    [2, 3, 4, 0, 1],
    [3, 4, 0, 1, 2],
    [4, 0, 1, 2, 3],
];

/// Bound used for the alpha-beta window; larger than any reachable evaluation
pub const SCORE_INF: f32 = 999_999.0;

/// Hard cap for iterative deepening (a round never lasts longer than this many plies)
pub const MAX_DEPTH: u32 = 4 * FACTORY_COUNT as u32;

/// Default thinking time per engine move, in seconds
pub const DEFAULT_SECS_PER_MOVE: f32 = 1.0;

/// Names used by the JSON snapshot format
pub const EMPTY_NAME: &str = "EMPTY";
pub const FULL_NAME: &str = "FULL";
pub const STARTING_MARKER_NAME: &str = "STARTING_MARKER";
