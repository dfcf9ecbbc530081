//! A game between a human and the automated player
//!
//! `Game` owns the authoritative board and the turn order. It applies the
//! human's moves and the searcher's recommendations in place, and keeps a
//! short log of what each search cost.

use log::info;
use rand::Rng;
use thiserror::Error;

use std::collections::VecDeque;

use crate::board::{Board, BoardError, Piece};
use crate::search::{SearchConfig, SearchError, SearchResult, Searcher};

/// How many search summaries are kept
pub const LOG_CAPACITY: usize = 16;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Turn {
    Human,
    Ai,
}

impl Turn {
    fn piece(self) -> Piece {
        match self {
            Turn::Human => Piece::Human,
            Turn::Ai => Piece::Ai,
        }
    }

    fn next(self) -> Self {
        match self {
            Turn::Human => Turn::Ai,
            Turn::Ai => Turn::Human,
        }
    }

    fn random() -> Self {
        if rand::thread_rng().gen_bool(0.5) {
            Turn::Human
        } else {
            Turn::Ai
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum GameState {
    Playing,
    HumanWin,
    AiWin,
    Draw,
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("it is not the {0:?} player's turn")]
    NotYourTurn(Turn),
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Search(#[from] SearchError),
}

pub struct Game {
    board: Board,
    turn: Turn,
    state: GameState,
    config: SearchConfig,
    searcher: Searcher,
    log: VecDeque<String>,
}

impl Game {
    /// Starts a new game, picking the first player at random if `first` is `None`
    pub fn new(config: SearchConfig, first: Option<Turn>) -> Self {
        Self::with_searcher(config, first, Searcher::new())
    }

    pub fn with_searcher(config: SearchConfig, first: Option<Turn>, searcher: Searcher) -> Self {
        Self {
            board: Board::new(),
            turn: first.unwrap_or_else(Turn::random),
            state: GameState::Playing,
            config,
            searcher,
            log: VecDeque::with_capacity(LOG_CAPACITY),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Search summaries, oldest first
    pub fn log(&self) -> impl Iterator<Item = &str> {
        self.log.iter().map(String::as_str)
    }

    /// Switches the AI to another strategy, effective from its next move
    pub fn set_config(&mut self, config: SearchConfig) {
        self.config = config;
    }

    /// Plays the human's disc into a 0-indexed column
    pub fn play_human(&mut self, column: usize) -> Result<GameState, GameError> {
        self.check_turn(Turn::Human)?;
        self.play(column)
    }

    /// Lets the searcher choose and play the AI's move
    pub fn play_ai(&mut self) -> Result<(SearchResult, GameState), GameError> {
        self.check_turn(Turn::Ai)?;

        let result = self.searcher.choose_move(&self.board, &self.config)?;
        let message = format!(
            "AI ({}) explored {} nodes in {:.2} seconds.",
            self.config.algorithm,
            result.nodes_visited,
            result.elapsed.as_secs_f64()
        );
        info!("{}", message);
        if self.log.len() == LOG_CAPACITY {
            self.log.pop_front();
        }
        self.log.push_back(message);

        // a non-terminal board always has an open column
        let column = result.column.ok_or(BoardError::GameOver)?;
        let state = self.play(column)?;
        Ok((result, state))
    }

    /// Clears the board and keeps the current turn
    pub fn restart(&mut self) {
        self.board = Board::new();
        self.state = GameState::Playing;
        self.log.clear();
    }

    /// Clears the board and picks who moves first again
    pub fn new_game(&mut self, first: Option<Turn>) {
        self.restart();
        self.turn = first.unwrap_or_else(Turn::random);
    }

    fn check_turn(&self, turn: Turn) -> Result<(), GameError> {
        if self.state != GameState::Playing {
            return Err(BoardError::GameOver.into());
        }
        if self.turn != turn {
            return Err(GameError::NotYourTurn(turn));
        }
        Ok(())
    }

    fn play(&mut self, column: usize) -> Result<GameState, GameError> {
        let piece = self.turn.piece();
        self.board.play(column, piece)?;

        self.state = if self.board.has_connect_four(piece) {
            match self.turn {
                Turn::Human => GameState::HumanWin,
                Turn::Ai => GameState::AiWin,
            }
        } else if self.board.is_full() {
            GameState::Draw
        } else {
            GameState::Playing
        };
        self.turn = self.turn.next();
        Ok(self.state)
    }
}
