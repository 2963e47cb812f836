//! Move selection for each skill tier

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use crate::backend::SearchBackend;
use crate::board::{Board, Piece};
use crate::error::GameError;
use crate::search::SearchEngine;
use crate::WIDTH;

/// The configured skill tier of the computer player
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    VeryHard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::VeryHard,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::VeryHard => "very-hard",
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Medium
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Difficulty::ALL
            .iter()
            .copied()
            .find(|d| d.name() == lowered || (lowered == "very_hard" && *d == Difficulty::VeryHard))
            .ok_or_else(|| GameError::UnknownDifficulty(s.to_string()))
    }
}

/// How a move is picked
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// uniformly among the legal columns
    Random,
    /// take an immediate win, else block the opponent's, else play randomly
    OneStepHeuristic,
    /// minimax search to a fixed depth
    BoundedSearch { depth: usize },
}

/// Maps tiers to strategies and runs them
pub struct DifficultyPolicy {
    hard_depth: usize,
    very_hard_depth: usize,
    rng: StdRng,
}

impl DifficultyPolicy {
    pub const DEFAULT_HARD_DEPTH: usize = 6;
    pub const DEFAULT_VERY_HARD_DEPTH: usize = 9;

    pub fn new(hard_depth: usize, very_hard_depth: usize, seed: Option<u64>) -> Self {
        Self {
            hard_depth,
            very_hard_depth,
            rng: match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            },
        }
    }

    pub fn strategy(&self, difficulty: Difficulty) -> Strategy {
        match difficulty {
            Difficulty::Easy => Strategy::Random,
            Difficulty::Medium => Strategy::OneStepHeuristic,
            Difficulty::Hard => Strategy::BoundedSearch {
                depth: self.hard_depth,
            },
            Difficulty::VeryHard => Strategy::BoundedSearch {
                depth: self.very_hard_depth,
            },
        }
    }

    /// Picks a column for `me` on `board`, or `None` if no column is playable.
    ///
    /// The very-hard tier is served by `accelerated` when one is installed,
    /// which must mirror `board`. Every other search runs on `engine`.
    pub fn choose_move(
        &mut self,
        difficulty: Difficulty,
        board: &mut Board,
        me: Piece,
        engine: &mut SearchEngine,
        accelerated: Option<&mut (dyn SearchBackend + 'static)>,
    ) -> Option<usize> {
        match self.strategy(difficulty) {
            Strategy::Random => self.random_move(board),
            Strategy::OneStepHeuristic => self.one_step_move(board, me),
            Strategy::BoundedSearch { depth } => {
                let start = Instant::now();
                let (score, column) = match accelerated {
                    Some(backend) if difficulty == Difficulty::VeryHard => {
                        let result = backend.get_best_move(depth, me);
                        info!("{} searched by {} backend", difficulty, backend.name());
                        result
                    }
                    _ => {
                        let result = engine.search(board, depth, me);
                        info!("{} search visited {} nodes", difficulty, engine.node_count);
                        result
                    }
                };
                info!(
                    "{} search to depth {}: column {:?}, score {}, {:.3}ms",
                    difficulty,
                    depth,
                    column,
                    score,
                    start.elapsed().as_secs_f64() * 1000.0
                );
                // never hand back a column the board cannot take
                column
                    .filter(|&c| board.playable(c))
                    .or_else(|| self.random_move(board))
            }
        }
    }

    /// A uniformly random legal column
    pub fn random_move(&mut self, board: &Board) -> Option<usize> {
        let columns = board.legal_columns();
        if columns.is_empty() {
            return None;
        }
        Some(columns[self.rng.random_range(0..columns.len())])
    }

    /// Wins on the spot if possible, otherwise blocks the opponent's immediate
    /// win, otherwise plays randomly
    pub fn one_step_move(&mut self, board: &mut Board, me: Piece) -> Option<usize> {
        for piece in [me, me.opponent()].iter() {
            if let Some(column) = Self::immediate_win(board, *piece) {
                return Some(column);
            }
        }
        self.random_move(board)
    }

    /// The leftmost column where `piece` would complete a line
    fn immediate_win(board: &mut Board, piece: Piece) -> Option<usize> {
        for column in 0..WIDTH {
            if let Ok(row) = board.place(column, piece) {
                let wins = board.wins_from(piece, row, column);
                board.undo(column);
                if wins {
                    return Some(column);
                }
            }
        }
        None
    }
}

impl Default for DifficultyPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_HARD_DEPTH, Self::DEFAULT_VERY_HARD_DEPTH, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tier_names() {
        assert_eq!("easy".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert_eq!(" Hard ".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!("very-hard".parse::<Difficulty>(), Ok(Difficulty::VeryHard));
        assert_eq!(
            "impossible".parse::<Difficulty>(),
            Err(GameError::UnknownDifficulty("impossible".to_string()))
        );
    }

    #[test]
    fn tiers_map_to_strategies() {
        let policy = DifficultyPolicy::new(4, 8, Some(1));
        assert_eq!(policy.strategy(Difficulty::Easy), Strategy::Random);
        assert_eq!(policy.strategy(Difficulty::Medium), Strategy::OneStepHeuristic);
        assert_eq!(
            policy.strategy(Difficulty::Hard),
            Strategy::BoundedSearch { depth: 4 }
        );
        assert_eq!(
            policy.strategy(Difficulty::VeryHard),
            Strategy::BoundedSearch { depth: 8 }
        );
    }

    #[test]
    fn random_move_only_picks_legal_columns() {
        let mut policy = DifficultyPolicy::new(4, 8, Some(7));
        let board = Board::from_moves("000000222222").unwrap();
        for _ in 0..100 {
            let column = policy.random_move(&board).unwrap();
            assert!(column != 0 && column != 2, "picked full column {}", column);
        }
    }

    #[test]
    fn one_step_prefers_win_over_block() {
        // both sides have three on their own row, open at column 3
        let mut board = Board::from_moves("001122").unwrap();
        let mut policy = DifficultyPolicy::new(4, 8, Some(3));
        assert_eq!(policy.one_step_move(&mut board, Piece::PlayerA), Some(3));
        assert_eq!(board, Board::from_moves("001122").unwrap());
    }
}
