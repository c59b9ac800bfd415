//! End-of-round scoring
//!
//! Both entry points share one pass over each player. The query works on a copy of
//! the wall and bonus flags and leaves the state alone; the mutating variant commits
//! the copies, clears completed lines and empties the floor.

use crate::bitset::Wall;
use crate::board::{award_bonuses, floor_penalty, placement_points};
use crate::constants::*;
use crate::types::*;

struct PlayerScore {
    result: PointsResult,
    wall: Wall,
    bonuses: BonusFlags,
    positive: u32,
}

/// Score one player without touching it
///
/// Lines are processed top to bottom on a scratch wall, so a tile placed from line 0 is
/// already visible when line 1 is scored. Incomplete lines report what they would score if
/// completed now.
fn score_player(player: &Player, mode: ScoringMode) -> PlayerScore {
    let mut wall = player.wall;
    let mut bonuses = player.bonuses;
    let mut point_changes = Vec::new();
    let mut positive = 0;

    if mode.scores_lines() {
        for (row, line) in player.pattern_lines.iter().enumerate() {
            let Some(tile) = line.tile else { continue };
            let col = tile.wall_column(row);
            let points = placement_points(&wall, row, col);

            if line.is_full() {
                wall.insert(row, col);
                positive += points;
            }
            point_changes.push(PointChange {
                pattern_line: row,
                tile,
                points,
                space_left: line.space,
                completed: line.is_full(),
            });
        }
    }

    let bonus_points = if mode.scores_bonus() {
        award_bonuses(&wall, &mut bonuses)
    } else {
        0
    };
    positive += bonus_points;

    let floor_penalty = if mode.scores_lines() {
        floor_penalty(player.floor.len()).min(positive + player.points)
    } else {
        0
    };

    PlayerScore {
        result: PointsResult {
            point_changes,
            bonus_points,
            floor_penalty,
        },
        wall,
        bonuses,
        positive,
    }
}

impl GameState {
    /// Points each player would receive if the round were scored now
    ///
    /// Pure query: calling it any number of times returns the same results and leaves
    /// the state unchanged. Bonuses already paid out are not reported again.
    pub fn calculate_points(&self, mode: ScoringMode) -> [PointsResult; PLAYER_COUNT] {
        let [a, b] = &self.players;
        [score_player(a, mode).result, score_player(b, mode).result]
    }

    /// Score the round and commit it
    ///
    /// Completed lines move to the wall and are emptied, the floor is charged and
    /// cleared (unless `mode` is [`ScoringMode::BonusOnly`]), and awarded bonuses are
    /// flagged so they never pay twice. Points never drop below zero.
    pub fn calculate_points_and_modify(&mut self, mode: ScoringMode) -> [PointsResult; PLAYER_COUNT] {
        self.players.each_mut().map(|player| {
            let score = score_player(player, mode);

            player.points = player.points + score.positive - score.result.floor_penalty;
            player.wall = score.wall;
            player.bonuses = score.bonuses;

            if mode.scores_lines() {
                for (row, line) in player.pattern_lines.iter_mut().enumerate() {
                    if line.is_full() {
                        *line = PatternLine::new(row);
                    }
                }
                player.floor.clear();
            }

            score.result
        })
    }
}
