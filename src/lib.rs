//! An adversarial search agent for the board game 'Connect 4'
//!
//! The automated player picks its moves with one of four interchangeable
//! strategies: a uniform-random baseline, plain minimax, alpha-beta pruning
//! and a depth-cutoff alpha-beta variant. Non-terminal leaves are scored with
//! a window-based positional heuristic.
//!
//! # Basic Usage
//!
//! ```
//! use connect4_search::{Algorithm, Board, Piece, SearchConfig, Searcher};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! // the human has three in a row along the bottom, the AI must block column 4
//! let board: Board = Board::from_moves("17273", Piece::Human)?;
//!
//! let mut searcher = Searcher::with_seed(7);
//! let result = searcher.choose_move(&board, &SearchConfig::new(Algorithm::AlphaBeta, 4))?;
//!
//! assert_eq!(result.column, Some(3));
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod board;

pub mod evaluation;

pub mod search;

pub mod game;

mod test;

pub use board::{Board, BoardError, Cell, Piece};
pub use evaluation::{evaluate, evaluate_window};
pub use game::{Game, GameError, GameState, Turn};
pub use search::{
    compare_strategies, Algorithm, SearchConfig, SearchError, SearchResult, Searcher, WIN_SCORE,
};

/// The width of the game board in tiles
pub const WIDTH: usize = 7;

/// The height of the game board in tiles
pub const HEIGHT: usize = 6;

/// Number of discs in a row needed to win
pub const SERIES_LEN: usize = 4;

// a board smaller than a winning line can never be won
const_assert!(WIDTH >= SERIES_LEN);
const_assert!(HEIGHT >= SERIES_LEN);
