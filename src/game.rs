//! The game controller consumed by front-ends

use log::{info, warn};

use crate::backend::SearchBackend;
use crate::board::{Board, Grid, Piece};
use crate::config::EngineConfig;
use crate::error::GameError;
use crate::policy::{Difficulty, DifficultyPolicy};
use crate::search::SearchEngine;
use crate::transposition_table::TranspositionTable;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Playing,
    Won(Piece),
    Draw,
}

/// The board, whose turn it is and the computer's tier
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub current: Piece,
    pub difficulty: Difficulty,
}

/// A game between a human (or any external caller) and the computer.
///
/// `PlayerA` always opens. Either side may be moved by `make_move` or
/// `computer_move`; both play for whoever's turn it is.
pub struct Game {
    state: GameState,
    status: Status,
    policy: DifficultyPolicy,
    engine: SearchEngine,
    accelerated: Option<Box<dyn SearchBackend>>,
}

impl Game {
    /// Creates a game with the default configuration at the given tier
    pub fn new(difficulty: Difficulty) -> Self {
        let mut config = EngineConfig::default();
        config.difficulty = difficulty;
        Self::from_config(&config)
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        let engine = SearchEngine::new_with_transposition_table(
            config.evaluator,
            TranspositionTable::with_capacity(config.search.table_capacity),
        )
        .with_limits(config.search.limits());

        Self {
            state: GameState {
                board: Board::new(),
                current: Piece::PlayerA,
                difficulty: config.difficulty,
            },
            status: Status::Playing,
            policy: DifficultyPolicy::new(
                config.search.hard_depth,
                config.search.very_hard_depth,
                config.seed,
            ),
            engine,
            accelerated: None,
        }
    }

    /// Installs an alternative search implementation for the very-hard tier.
    ///
    /// The backend is reset, given this game's search budget and brought up to
    /// date with the moves played so far.
    pub fn with_backend(mut self, mut backend: Box<dyn SearchBackend>) -> Self {
        backend.reset();
        backend.set_limits(self.engine.limits());
        for played in self.state.board.moves().to_vec() {
            if let Err(err) = backend.make_move(played.column, played.piece) {
                warn!("{} backend rejected replayed move: {}", backend.name(), err);
                return self;
            }
        }
        info!("using {} backend for {}", backend.name(), Difficulty::VeryHard);
        self.accelerated = Some(backend);
        self
    }

    /// Plays the current player's piece into `column`, returning whether it won
    pub fn make_move(&mut self, column: usize) -> Result<bool, GameError> {
        self.ensure_playing()?;
        let piece = self.state.current;
        let row = self.state.board.place(column, piece)?;
        Ok(self.commit(column, row, piece))
    }

    /// Lets the computer choose and play a move for the current player at the
    /// active tier, returning whether it won
    pub fn computer_move(&mut self) -> Result<bool, GameError> {
        self.ensure_playing()?;
        let piece = self.state.current;
        let difficulty = self.state.difficulty;

        let column = self
            .policy
            .choose_move(
                difficulty,
                &mut self.state.board,
                piece,
                &mut self.engine,
                self.accelerated.as_deref_mut(),
            )
            .ok_or(GameError::GameOver)?;
        info!("{} computer plays column {} for {:?}", difficulty, column, piece);

        let row = self.state.board.place(column, piece)?;
        Ok(self.commit(column, row, piece))
    }

    pub fn is_full(&self) -> bool {
        self.state.board.is_full()
    }

    /// A copy of the grid, row 0 at the bottom
    pub fn get_board(&self) -> Grid {
        self.state.board.snapshot()
    }

    pub fn board(&self) -> &Board {
        &self.state.board
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Changes the tier used by the next computer move.
    ///
    /// Unknown tier names are rejected and the current tier is kept.
    pub fn set_difficulty<S: AsRef<str>>(&mut self, tier: S) -> Result<(), GameError> {
        let difficulty = tier.as_ref().parse::<Difficulty>()?;
        self.set_difficulty_level(difficulty);
        Ok(())
    }

    pub fn set_difficulty_level(&mut self, difficulty: Difficulty) {
        self.state.difficulty = difficulty;
    }

    pub fn difficulty(&self) -> Difficulty {
        self.state.difficulty
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn current_player(&self) -> Piece {
        self.state.current
    }

    /// Starts a new game at the same tier, clearing cached search results
    pub fn reset(&mut self) {
        self.state.board = Board::new();
        self.state.current = Piece::PlayerA;
        self.status = Status::Playing;
        self.engine.reset();
        if let Some(backend) = self.accelerated.as_mut() {
            backend.reset();
        }
    }

    fn ensure_playing(&self) -> Result<(), GameError> {
        match self.status {
            Status::Playing => Ok(()),
            _ => Err(GameError::GameOver),
        }
    }

    fn commit(&mut self, column: usize, row: usize, piece: Piece) -> bool {
        if let Some(backend) = self.accelerated.as_mut() {
            if let Err(err) = backend.make_move(column, piece) {
                warn!("{} backend out of sync, dropping it: {}", backend.name(), err);
                self.accelerated = None;
            }
        }

        let won = self.state.board.wins_from(piece, row, column);
        if won {
            self.status = Status::Won(piece);
        } else {
            if self.state.board.is_full() {
                self.status = Status::Draw;
            }
            self.state.current = piece.opponent();
        }
        won
    }
}
