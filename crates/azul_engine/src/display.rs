//! Compact text rendering of a position, for logs and the command-line driver
//!
//! ```text
//! factories: [BBYR] [KKSS] [----] [YYYY] [BRKS]
//! center:    * YR
//! player 1   12 pts
//!     . | B . . . .
//!    .. | . B . . .
//!   ... | . . . . .
//!  ..RR | . . . . .
//! KKKKK | . . . . .
//!  floor: * R
//! ```

use std::fmt;

use crate::constants::*;
use crate::types::*;

fn letter(tile: Tile) -> char {
    match tile {
        Tile::Blue => 'B',
        Tile::Yellow => 'Y',
        Tile::Red => 'R',
        Tile::Black => 'K',
        Tile::Star => 'S',
    }
}

fn write_counts(f: &mut fmt::Formatter<'_>, counts: &TileCounts) -> fmt::Result {
    for (tile, count) in counts.iter() {
        for _ in 0..count {
            write!(f, "{}", letter(tile))?;
        }
    }
    Ok(())
}

fn write_player(f: &mut fmt::Formatter<'_>, index: usize, player: &Player) -> fmt::Result {
    write!(f, "player {}   {} pts", index + 1, player.points)?;
    if player.has_starting_marker {
        f.write_str(" (first)")?;
    }
    writeln!(f)?;

    for (row, line) in player.pattern_lines.iter().enumerate() {
        let filled = line.filled(row) as usize;
        let mut cells = String::new();
        for _ in 0..line.space {
            cells.push('.');
        }
        if let Some(tile) = line.tile {
            cells.extend(std::iter::repeat(letter(tile)).take(filled));
        }
        write!(f, "{cells:>width$} |", width = WALL_SIZE)?;

        for col in 0..WALL_SIZE {
            if player.wall.contains(row, col) {
                let tile = Tile::ALL
                    .into_iter()
                    .find(|tile| tile.wall_column(row) == col)
                    .map_or('?', letter);
                write!(f, " {tile}")?;
            } else {
                f.write_str(" .")?;
            }
        }
        writeln!(f)?;
    }

    f.write_str(" floor:")?;
    for slot in &player.floor {
        match slot {
            FloorTile::StartingMarker => f.write_str(" *")?,
            FloorTile::Tile(tile) => write!(f, " {}", letter(*tile))?,
        }
    }
    writeln!(f)
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("factories:")?;
        for factory in &self.factories {
            f.write_str(" [")?;
            if factory.is_empty() {
                f.write_str("----")?;
            } else {
                write_counts(f, factory)?;
            }
            f.write_str("]")?;
        }
        writeln!(f)?;

        f.write_str("center:    ")?;
        if self.center.has_marker {
            f.write_str("* ")?;
        }
        write_counts(f, &self.center.tiles)?;
        writeln!(f)?;

        for (index, player) in self.players.iter().enumerate() {
            write_player(f, index, player)?;
        }
        Ok(())
    }
}
