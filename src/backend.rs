//! The contract shared by every search implementation
//!
//! An alternative engine, for example a native library wrapped over FFI, can
//! stand in for the crate's own search for the highest tier by implementing
//! [`SearchBackend`]. A backend keeps its own copy of the board, which the
//! game controller keeps in step through `make_move` and `reset`.

use crate::board::{Board, Piece};
use crate::config::SearchConfig;
use crate::error::InvalidMove;
use crate::evaluator::Evaluator;
use crate::search::{SearchEngine, SearchLimits};

pub trait SearchBackend: Send {
    /// Drops `piece` into `column` on the backend's board, returning the row
    fn make_move(&mut self, column: usize, piece: Piece) -> Result<usize, InvalidMove>;

    /// Whether the piece at (`row`, `column`) completes a line for `piece`
    fn check_winner(&self, piece: Piece, row: usize, column: usize) -> bool;

    /// Score and best column for `piece` to move, searching `depth` plies
    fn get_best_move(&mut self, depth: usize, piece: Piece) -> (i32, Option<usize>);

    /// Empties the board and forgets cached results
    fn reset(&mut self);

    /// Caps the work of every following `get_best_move`. Backends that
    /// manage their own budget may ignore it.
    fn set_limits(&mut self, _limits: SearchLimits) {}

    fn name(&self) -> &str;
}

/// The crate's own search, packaged behind the backend contract
#[derive(Clone)]
pub struct NativeBackend {
    board: Board,
    engine: SearchEngine,
}

impl NativeBackend {
    pub fn new(evaluator: Evaluator, limits: SearchLimits) -> Self {
        Self {
            board: Board::new(),
            engine: SearchEngine::new(evaluator).with_limits(limits),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }
}

impl Default for NativeBackend {
    fn default() -> Self {
        Self::new(Evaluator::default(), SearchConfig::default().limits())
    }
}

impl SearchBackend for NativeBackend {
    fn make_move(&mut self, column: usize, piece: Piece) -> Result<usize, InvalidMove> {
        self.board.place(column, piece)
    }

    fn check_winner(&self, piece: Piece, row: usize, column: usize) -> bool {
        self.board.wins_from(piece, row, column)
    }

    fn get_best_move(&mut self, depth: usize, piece: Piece) -> (i32, Option<usize>) {
        self.engine.search(&mut self.board, depth, piece)
    }

    fn reset(&mut self) {
        self.board = Board::new();
        self.engine.reset();
    }

    fn set_limits(&mut self, limits: SearchLimits) {
        self.engine.set_limits(limits);
    }

    fn name(&self) -> &str {
        "native"
    }
}
