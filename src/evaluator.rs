//! Heuristic scoring of non-terminal positions

use serde::{Deserialize, Serialize};

use crate::board::{Board, Piece};
use crate::win::WINDOWS;
use crate::{HEIGHT, WIDTH};

/// Score contributions of the position features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    /// per own piece in the middle column
    pub center: i32,
    /// four own pieces in a window
    pub four: i32,
    /// three own pieces and one empty cell
    pub three: i32,
    /// two own pieces and two empty cells
    pub two: i32,
    /// three opponent pieces and one empty cell
    pub opponent_three: i32,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            center: 3,
            four: 100,
            three: 5,
            two: 2,
            opponent_three: -80,
        }
    }
}

/// Scores a position from the point of view of one side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Evaluator {
    /// Only credit a window with one empty cell if that cell can be played next
    pub gravity_aware: bool,
    pub weights: Weights,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self {
            gravity_aware: true,
            weights: Weights::default(),
        }
    }
}

impl Evaluator {
    pub fn new(gravity_aware: bool, weights: Weights) -> Self {
        Self {
            gravity_aware,
            weights,
        }
    }

    /// Sum of the centre bonus and the score of every window, for `me` against the other side
    pub fn evaluate(&self, board: &Board, me: Piece) -> i32 {
        let opponent = me.opponent();

        let center = WIDTH / 2;
        let mut score = (0..HEIGHT)
            .filter(|&row| board.get(row, center) == me)
            .count() as i32
            * self.weights.center;

        for window in WINDOWS.iter() {
            let (mut own, mut opp) = (0, 0);
            let mut hole = None;
            for &(row, column) in window.iter() {
                match board.get(row, column) {
                    p if p == me => own += 1,
                    p if p == opponent => opp += 1,
                    _ => hole = Some((row, column)),
                }
            }
            let empty = window.len() - own - opp;

            score += match (own, opp, empty) {
                (4, 0, 0) => self.weights.four,
                (3, 0, 1) if self.reachable(board, hole) => self.weights.three,
                (2, 0, 2) => self.weights.two,
                (0, 3, 1) if self.reachable(board, hole) => self.weights.opponent_three,
                _ => 0,
            };
        }
        score
    }

    // the single empty cell of a window counts only if a piece can land there next
    fn reachable(&self, board: &Board, hole: Option<(usize, usize)>) -> bool {
        if !self.gravity_aware {
            return true;
        }
        match hole {
            Some((row, column)) => board.height(column) == row,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_board_is_zero() {
        let board = Board::new();
        let evaluator = Evaluator::default();
        assert_eq!(evaluator.evaluate(&board, Piece::PlayerA), 0);
        assert_eq!(evaluator.evaluate(&board, Piece::PlayerB), 0);
    }

    #[test]
    fn center_scores_higher_than_edge() {
        let evaluator = Evaluator::default();
        let center = Board::from_moves("3").unwrap();
        let edge = Board::from_moves("0").unwrap();
        assert!(
            evaluator.evaluate(&center, Piece::PlayerA) > evaluator.evaluate(&edge, Piece::PlayerA)
        );
    }

    #[test]
    fn open_three_is_rewarded_and_threat_penalised() {
        let evaluator = Evaluator::default();
        let mut board = Board::new();
        for column in 0..3 {
            board.place(column, Piece::PlayerA).unwrap();
        }
        // bottom row: three A pieces with column 3 open and playable
        let own = evaluator.evaluate(&board, Piece::PlayerA);
        let theirs = evaluator.evaluate(&board, Piece::PlayerB);
        assert!(own >= evaluator.weights.three);
        assert!(theirs <= evaluator.weights.opponent_three);
    }

    #[test]
    fn floating_threes_only_count_without_gravity() {
        // A holds row 1 of columns 0..3, with column 3 empty below row 1
        let board = Board::from_moves("6001122").unwrap();
        assert_eq!(board.get(1, 0), Piece::PlayerA);
        assert_eq!(board.get(1, 1), Piece::PlayerA);
        assert_eq!(board.get(1, 2), Piece::PlayerA);
        assert_eq!(board.height(3), 0);

        let gravity = Evaluator::default();
        let flat = Evaluator::new(false, Weights::default());
        assert_eq!(
            flat.evaluate(&board, Piece::PlayerA) - gravity.evaluate(&board, Piece::PlayerA),
            flat.weights.three
        );
    }

    #[test]
    fn floating_opponent_threes_are_not_penalised() {
        // B holds row 1 of columns 0..3 on top of A's row, column 3 is still empty
        let board = Board::from_moves("001122").unwrap();
        assert_eq!(board.get(1, 2), Piece::PlayerB);
        assert_eq!(board.height(3), 0);

        let gravity = Evaluator::default();
        let flat = Evaluator::new(false, Weights::default());
        assert_eq!(
            gravity.evaluate(&board, Piece::PlayerA) - flat.evaluate(&board, Piece::PlayerA),
            -flat.weights.opponent_three
        );
    }

    #[test]
    fn completed_line_earns_four_weight() {
        let board = Board::from_moves("0101010").unwrap();
        let scored = Evaluator::default();
        let unscored = Evaluator::new(
            true,
            Weights {
                four: 0,
                ..Weights::default()
            },
        );
        assert_eq!(
            scored.evaluate(&board, Piece::PlayerA) - unscored.evaluate(&board, Piece::PlayerA),
            scored.weights.four
        );
    }
}
