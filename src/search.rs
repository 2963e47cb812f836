//! Depth-bounded minimax search with alpha-beta pruning

use log::{debug, warn};

use std::time::{Duration, Instant};

use crate::board::{Board, Piece};
use crate::evaluator::Evaluator;
use crate::transposition_table::*;
use crate::WIDTH;

/// Score of a won position, before the remaining-depth bonus
pub const WIN_SENTINEL: i32 = 1_000_000;

const INFINITY: i32 = 1_000_000_000;

/// Returns the columns ordered from the middle outwards, as
/// the middle columns are often better moves
pub const fn move_order() -> [usize; WIDTH] {
    let mut move_order = [0; WIDTH];
    let mut i = 0;
    while i < WIDTH {
        move_order[i] = (WIDTH / 2) + (1 - i % 2) * (i / 2) - (i % 2) * (i / 2 + 1);
        i += 1;
    }
    move_order
}

/// Caps on the work done for a single decision
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_nodes: Option<u64>,
    pub time_limit: Option<Duration>,
}

impl SearchLimits {
    pub fn unlimited() -> Self {
        Self::default()
    }
}

/// A minimax agent that scores positions for one side ("self") against the other
///
/// # Notes
/// The search mutates the board it is given through `place`/`undo` pairs and
/// always hands it back exactly as it received it. Results are cached in a
/// transposition table that lives as long as the engine, so one engine should
/// serve one game and be `reset` between games.
///
/// # Position Scoring
/// A win for self found with `d` plies of search left scores `WIN_SENTINEL + d`,
/// so faster wins score higher. Losses score `-(WIN_SENTINEL + d)`, so slower
/// losses are preferred. Everything else comes from the [`Evaluator`].
#[derive(Clone)]
pub struct SearchEngine {
    evaluator: Evaluator,
    transposition_table: TranspositionTable,
    limits: SearchLimits,

    /// The number of nodes visited by the last search (for diagnostics only)
    pub node_count: u64,
    deadline: Option<Instant>,
    aborted: bool,
}

impl SearchEngine {
    /// Creates a new `SearchEngine` with a default-sized transposition table
    pub fn new(evaluator: Evaluator) -> Self {
        Self::new_with_transposition_table(evaluator, TranspositionTable::new())
    }

    /// Creates a new `SearchEngine` with a given transposition table
    pub fn new_with_transposition_table(
        evaluator: Evaluator,
        transposition_table: TranspositionTable,
    ) -> Self {
        Self {
            evaluator,
            transposition_table,
            limits: SearchLimits::unlimited(),
            node_count: 0,
            deadline: None,
            aborted: false,
        }
    }

    /// Sets the node and time budget of every following search
    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn set_limits(&mut self, limits: SearchLimits) {
        self.limits = limits;
    }

    pub fn limits(&self) -> SearchLimits {
        self.limits
    }

    pub fn transposition_table(&self) -> &TranspositionTable {
        &self.transposition_table
    }

    /// Forgets every cached result, for use at the start of a new game
    pub fn reset(&mut self) {
        self.transposition_table.clear();
    }

    /// Searches `depth` plies ahead for `me`, who is to move on `board`.
    ///
    /// Returns the score of the position and the best column, or `None` when the
    /// position is already decided or no column is playable. When the budget in
    /// [`SearchLimits`] runs out, the result of the deepest completed iteration
    /// is returned.
    pub fn search(&mut self, board: &mut Board, depth: usize, me: Piece) -> (i32, Option<usize>) {
        let start = Instant::now();
        self.node_count = 0;
        self.aborted = false;
        self.deadline = self.limits.time_limit.map(|limit| start + limit);

        // positions that are already decided have no best move
        if board.has_winning_position(me) {
            return (WIN_SENTINEL + depth as i32, None);
        }
        if board.has_winning_position(me.opponent()) {
            return (-(WIN_SENTINEL + depth as i32), None);
        }

        let first = match move_order().iter().copied().find(|&c| board.playable(c)) {
            Some(column) => column,
            None => return (self.evaluator.evaluate(board, me), None),
        };
        if depth == 0 {
            return (self.evaluator.evaluate(board, me), None);
        }

        // check for win for self on this move
        for &column in move_order().iter() {
            if let Some(true) = self.probe_win(board, column, me) {
                return (WIN_SENTINEL + depth as i32, Some(column));
            }
        }

        // iterative deepening, so a partial search still has a move to offer
        let mut best = (self.evaluator.evaluate(board, me), Some(first));
        for iteration in 1..=depth {
            let result = self.top_level_search(board, iteration, me);
            if self.aborted {
                warn!(
                    "search budget exhausted during depth {}, using depth {} result after {} nodes",
                    iteration,
                    iteration - 1,
                    self.node_count
                );
                break;
            }
            best = result;
            debug!(
                "depth {}: score {}, column {:?}, {} nodes, {:.3}ms",
                iteration,
                best.0,
                best.1,
                self.node_count,
                start.elapsed().as_secs_f64() * 1000.0
            );
            // a forced result will not change with more depth, only its
            // remaining-depth bonus does
            if best.0.abs() >= WIN_SENTINEL {
                best.0 += best.0.signum() * (depth - iteration) as i32;
                break;
            }
        }
        best
    }

    /// Places `piece` in `column` if possible, reporting whether it wins, and takes it back
    fn probe_win(&self, board: &mut Board, column: usize, piece: Piece) -> Option<bool> {
        if !board.playable(column) {
            return None;
        }
        let row = board
            .place(column, piece)
            .expect("playable column rejected a piece");
        let wins = board.wins_from(piece, row, column);
        board.undo(column);
        Some(wins)
    }

    /// Searches every root move with a full window, bypassing the transposition table
    fn top_level_search(&mut self, board: &mut Board, depth: usize, me: Piece) -> (i32, Option<usize>) {
        self.node_count += 1;
        if self.out_of_budget() {
            self.aborted = true;
            return (-INFINITY, None);
        }
        let mut alpha = -INFINITY;
        let beta = INFINITY;

        let mut best_score = -INFINITY;
        let mut best_move = None;
        for &column in move_order().iter() {
            if !board.playable(column) {
                continue;
            }
            let row = board
                .place(column, me)
                .expect("playable column rejected a piece");
            if board.wins_from(me, row, column) {
                board.undo(column);
                return (WIN_SENTINEL + depth as i32, Some(column));
            }
            let score = self.minimax(board, depth - 1, alpha, beta, me.opponent(), me);
            board.undo(column);
            if self.aborted {
                return (best_score, best_move);
            }

            if score > best_score {
                best_score = score;
                best_move = Some(column);
            }
            alpha = alpha.max(best_score);
        }
        (best_score, best_move)
    }

    /// Scores the position with `mover` to play, maximizing for `me`
    fn minimax(
        &mut self,
        board: &mut Board,
        depth: usize,
        mut alpha: i32,
        mut beta: i32,
        mover: Piece,
        me: Piece,
    ) -> i32 {
        self.node_count += 1;
        if self.out_of_budget() {
            self.aborted = true;
            return 0;
        }

        // winning placements return before recursing, so no line exists here yet
        if depth == 0 || board.is_full() {
            return self.evaluator.evaluate(board, me);
        }

        let key = Self::key(board, mover, me);
        if let Some(entry) = self.transposition_table.get(key) {
            if entry.depth as usize >= depth {
                match entry.bound {
                    Bound::Exact => return entry.score,
                    Bound::Lower => alpha = alpha.max(entry.score),
                    Bound::Upper => beta = beta.min(entry.score),
                }
                if alpha >= beta {
                    // prune the exploration
                    return entry.score;
                }
            }
        }
        let (window_alpha, window_beta) = (alpha, beta);

        let maximizing = mover == me;
        let mut best = if maximizing { -INFINITY } else { INFINITY };
        for &column in move_order().iter() {
            if !board.playable(column) {
                continue;
            }
            let row = board
                .place(column, mover)
                .expect("playable column rejected a piece");
            if board.wins_from(mover, row, column) {
                board.undo(column);
                let score = if maximizing {
                    WIN_SENTINEL + depth as i32
                } else {
                    -(WIN_SENTINEL + depth as i32)
                };
                self.store(key, depth, score, Bound::Exact);
                return score;
            }

            let score = self.minimax(board, depth - 1, alpha, beta, mover.opponent(), me);
            board.undo(column);
            if self.aborted {
                return 0;
            }

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(best);
            } else {
                best = best.min(score);
                beta = beta.min(best);
            }
            if alpha >= beta {
                break;
            }
        }

        let bound = if best <= window_alpha {
            Bound::Upper
        } else if best >= window_beta {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.store(key, depth, best, bound);
        best
    }

    fn store(&mut self, key: u64, depth: usize, score: i32, bound: Bound) {
        self.transposition_table.set(Entry {
            key,
            depth: depth as u8,
            score,
            bound,
        });
    }

    fn out_of_budget(&self) -> bool {
        if let Some(max_nodes) = self.limits.max_nodes {
            if self.node_count > max_nodes {
                return true;
            }
        }
        match self.deadline {
            // reading the clock is comparatively slow, only do it every 1024 nodes
            Some(deadline) => self.node_count & 1023 == 0 && Instant::now() >= deadline,
            None => false,
        }
    }

    // key for transposition table: exact contents plus side to move and maximizing side
    fn key(board: &Board, mover: Piece, me: Piece) -> u64 {
        let mut key = board.position_code();
        if mover == Piece::PlayerB {
            key |= 1 << 62;
        }
        if me == Piece::PlayerB {
            key |= 1 << 63;
        }
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_order_is_center_out() {
        assert_eq!(move_order(), [3, 2, 4, 1, 5, 0, 6]);
    }
}
