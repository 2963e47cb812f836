//! A tiered computer opponent for the board game 'Connect 4'
//!
//! The engine plays on the canonical 7x6 grid and picks moves at one of
//! four skill tiers, from uniformly random play up to a depth-bounded
//! minimax search with alpha-beta pruning and a transposition table.
//!
//! # Basic Usage
//!
//! ```
//! use connect4_engine::{game::Game, policy::Difficulty};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! let mut game = Game::new(Difficulty::Hard);
//! game.make_move(3)?;
//! let won = game.computer_move()?;
//!
//! assert!(!won);
//! assert_eq!(game.board().num_moves(), 2);
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod error;

pub mod board;

pub mod win;

pub mod evaluator;

pub mod transposition_table;

pub mod search;

pub mod policy;

pub mod backend;

pub mod game;

pub mod config;

pub mod arena;


/// The width of the game board in tiles
pub const WIDTH: usize = 7;

/// The height of the game board in tiles
pub const HEIGHT: usize = 6;

/// The number of contiguous tiles needed to win
pub const CONNECT: usize = 4;

// the position key packs a (HEIGHT + 1) bit column for every column, and
// reserves the two top bits for the side to move and the maximizing side
const_assert!(WIDTH * (HEIGHT + 1) < 62);
