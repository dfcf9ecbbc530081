//! Adversarial game tree search for the automated player
//!
//! All scores are computed from the automated player's ([`Piece::Ai`]) point of
//! view: the AI maximises, the human opponent minimises. Forced wins and losses
//! are reported with the finite [`WIN_SCORE`] sentinel so they stay comparable
//! with heuristic scores.

use log::debug;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use rayon::prelude::*;
use thiserror::Error;

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use crate::board::{Board, Piece};
use crate::evaluation::evaluate;

/// Score of a position the AI has won, negated for a loss
pub const WIN_SCORE: i64 = 100_000_000_000_000;

const AI_PIECE: Piece = Piece::Ai;
const HUMAN_PIECE: Piece = Piece::Human;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Random,
    Minimax,
    AlphaBeta,
    AlphaBetaCutoff,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Random,
        Algorithm::Minimax,
        Algorithm::AlphaBeta,
        Algorithm::AlphaBetaCutoff,
    ];

    /// The search depth used by the interactive game when none is given
    pub fn default_depth(self) -> usize {
        match self {
            Algorithm::Random => 1,
            Algorithm::Minimax => 4,
            Algorithm::AlphaBeta => 6,
            Algorithm::AlphaBetaCutoff => 5,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algorithm::Random => "Random Move",
            Algorithm::Minimax => "Minimax",
            Algorithm::AlphaBeta => "Alpha-Beta",
            Algorithm::AlphaBetaCutoff => "A-B Cutoff",
        };
        f.write_str(name)
    }
}

impl FromStr for Algorithm {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalised.as_str() {
            "random" | "randommove" => Ok(Algorithm::Random),
            "minimax" => Ok(Algorithm::Minimax),
            "alphabeta" | "ab" => Ok(Algorithm::AlphaBeta),
            "alphabetacutoff" | "abcutoff" | "cutoff" => Ok(Algorithm::AlphaBetaCutoff),
            _ => Err(SearchError::UnknownAlgorithm { name: s.to_string() }),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("{algorithm} needs a search depth of at least 1")]
    InvalidDepth { algorithm: Algorithm },
    #[error("unknown algorithm '{name}', expected one of random, minimax, alpha-beta, ab-cutoff")]
    UnknownAlgorithm { name: String },
}

/// Parameters of a single move decision
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    pub algorithm: Algorithm,
    /// Plies to search for `Minimax` and `AlphaBeta`
    pub depth: usize,
    /// Plies to search for `AlphaBetaCutoff`
    pub cutoff_depth: usize,
    /// Stop expanding new siblings once this much time has passed
    pub time_limit: Option<Duration>,
}

impl SearchConfig {
    pub fn new(algorithm: Algorithm, depth: usize) -> Self {
        Self {
            algorithm,
            depth,
            cutoff_depth: depth,
            time_limit: None,
        }
    }

    pub fn cutoff(cutoff_depth: usize) -> Self {
        Self::new(Algorithm::AlphaBetaCutoff, cutoff_depth)
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }

    pub fn validate(&self) -> Result<(), SearchError> {
        let plies = match self.algorithm {
            Algorithm::Random => return Ok(()),
            Algorithm::Minimax | Algorithm::AlphaBeta => self.depth,
            Algorithm::AlphaBetaCutoff => self.cutoff_depth,
        };
        if plies == 0 {
            return Err(SearchError::InvalidDepth {
                algorithm: self.algorithm,
            });
        }
        Ok(())
    }
}

impl From<Algorithm> for SearchConfig {
    fn from(algorithm: Algorithm) -> Self {
        Self::new(algorithm, algorithm.default_depth())
    }
}

/// Outcome and cost of one top-level search
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchResult {
    /// The chosen column, `None` only if the searched board was already terminal
    pub column: Option<usize>,
    pub score: i64,
    pub nodes_visited: u64,
    pub elapsed: Duration,
    /// `false` if the time limit cut the search short
    pub completed: bool,
}

/// How far a search may go below the current node
#[derive(Copy, Clone, Debug)]
enum Horizon {
    /// plies left to search, counting down to zero
    Remaining(usize),
    /// plies searched so far, counting up to the cutoff
    Elapsed { ply: usize, cutoff: usize },
}

impl Horizon {
    fn reached(self) -> bool {
        match self {
            Horizon::Remaining(depth) => depth == 0,
            Horizon::Elapsed { ply, cutoff } => ply >= cutoff,
        }
    }

    fn deeper(self) -> Self {
        match self {
            Horizon::Remaining(depth) => Horizon::Remaining(depth.saturating_sub(1)),
            Horizon::Elapsed { ply, cutoff } => Horizon::Elapsed {
                ply: ply + 1,
                cutoff,
            },
        }
    }
}

/// Score of a finished game from the AI's point of view
fn terminal_score<const ROWS: usize, const COLS: usize>(board: &Board<ROWS, COLS>) -> i64 {
    if board.has_connect_four(AI_PIECE) {
        WIN_SCORE
    } else if board.has_connect_four(HUMAN_PIECE) {
        -WIN_SCORE
    } else {
        0
    }
}

/// The leaf rule shared by every strategy, checked before expanding a node
fn leaf_score<const ROWS: usize, const COLS: usize>(
    board: &Board<ROWS, COLS>,
    horizon_reached: bool,
) -> Option<i64> {
    if board.is_terminal() {
        Some(terminal_score(board))
    } else if horizon_reached {
        Some(evaluate(board, AI_PIECE))
    } else {
        None
    }
}

/// The positions reachable by dropping `piece` into each of `columns`
fn children<'b, const ROWS: usize, const COLS: usize>(
    board: &'b Board<ROWS, COLS>,
    columns: &'b [usize],
    piece: Piece,
) -> impl Iterator<Item = (usize, Board<ROWS, COLS>)> + 'b {
    columns.iter().filter_map(move |&column| {
        board
            .next_open_row(column)
            .map(|row| (column, board.with_piece(row, column, piece)))
    })
}

fn player_piece(maximizing: bool) -> Piece {
    if maximizing {
        AI_PIECE
    } else {
        HUMAN_PIECE
    }
}

/// State of one top-level search: the node counter lives here, never on the
/// `Searcher`, so every `choose_move` call starts from zero
struct SearchContext<'a> {
    rng: &'a mut StdRng,
    node_count: u64,
    deadline: Option<Instant>,
    timed_out: bool,
}

impl SearchContext<'_> {
    fn expired(&mut self) -> bool {
        if !self.timed_out {
            if let Some(deadline) = self.deadline {
                self.timed_out = Instant::now() >= deadline;
            }
        }
        self.timed_out
    }

    fn random_column(&mut self, columns: &[usize]) -> Option<usize> {
        columns.choose(&mut *self.rng).copied()
    }

    fn random_move<const ROWS: usize, const COLS: usize>(
        &mut self,
        board: &Board<ROWS, COLS>,
    ) -> (Option<usize>, i64) {
        self.node_count += 1;

        if board.is_terminal() {
            return (None, terminal_score(board));
        }
        let moves = board.valid_moves();
        match self.random_column(&moves) {
            Some(column) => {
                let score = children(board, &[column], AI_PIECE)
                    .next()
                    .and_then(|(_, child)| leaf_score(&child, true))
                    .unwrap_or_default();
                (Some(column), score)
            }
            None => (None, 0),
        }
    }

    fn minimax<const ROWS: usize, const COLS: usize>(
        &mut self,
        board: &Board<ROWS, COLS>,
        horizon: Horizon,
        maximizing: bool,
    ) -> (Option<usize>, i64) {
        self.node_count += 1;

        if let Some(score) = leaf_score(board, horizon.reached()) {
            // the parent knows which column led here
            return (None, score);
        }

        let moves = board.valid_moves();
        let mut best_column = self.random_column(&moves);
        let mut best_score = if maximizing { i64::MIN } else { i64::MAX };

        for (column, child) in children(board, &moves, player_piece(maximizing)) {
            let (_, score) = self.minimax(&child, horizon.deeper(), !maximizing);

            // strict comparison keeps the earliest column on ties
            let better = if maximizing {
                score > best_score
            } else {
                score < best_score
            };
            if better {
                best_score = score;
                best_column = Some(column);
            }

            if self.expired() {
                break;
            }
        }

        (best_column, best_score)
    }

    fn alpha_beta<const ROWS: usize, const COLS: usize>(
        &mut self,
        board: &Board<ROWS, COLS>,
        horizon: Horizon,
        mut alpha: i64,
        mut beta: i64,
        maximizing: bool,
    ) -> (Option<usize>, i64) {
        self.node_count += 1;

        if let Some(score) = leaf_score(board, horizon.reached()) {
            return (None, score);
        }

        let moves = board.valid_moves();
        let mut best_column = self.random_column(&moves);
        let mut best_score = if maximizing { i64::MIN } else { i64::MAX };

        for (column, child) in children(board, &moves, player_piece(maximizing)) {
            let (_, score) = self.alpha_beta(&child, horizon.deeper(), alpha, beta, !maximizing);

            if maximizing {
                if score > best_score {
                    best_score = score;
                    best_column = Some(column);
                }
                alpha = alpha.max(best_score);
            } else {
                if score < best_score {
                    best_score = score;
                    best_column = Some(column);
                }
                beta = beta.min(best_score);
            }

            // the other player will never allow this branch, prune the remaining siblings
            if alpha >= beta || self.expired() {
                break;
            }
        }

        (best_column, best_score)
    }
}

/// Chooses moves for the automated player
///
/// The searcher only owns the random number generator used by the `Random`
/// strategy (and for the provisional best column at each search node), so one
/// searcher can be reused for any number of positions.
pub struct Searcher {
    rng: StdRng,
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Searcher {
    /// Creates a `Searcher` seeded from system entropy
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a `Searcher` with reproducible random choices
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Picks a column for the AI to play on `board`
    ///
    /// The board is only read; every simulated move is made on a copy.
    pub fn choose_move<const ROWS: usize, const COLS: usize>(
        &mut self,
        board: &Board<ROWS, COLS>,
        config: &SearchConfig,
    ) -> Result<SearchResult, SearchError> {
        config.validate()?;

        let start = Instant::now();
        let mut context = SearchContext {
            rng: &mut self.rng,
            node_count: 0,
            deadline: config.time_limit.and_then(|limit| start.checked_add(limit)),
            timed_out: false,
        };

        let (column, score) = match config.algorithm {
            Algorithm::Random => context.random_move(board),
            Algorithm::Minimax => context.minimax(board, Horizon::Remaining(config.depth), true),
            Algorithm::AlphaBeta => context.alpha_beta(
                board,
                Horizon::Remaining(config.depth),
                i64::MIN,
                i64::MAX,
                true,
            ),
            Algorithm::AlphaBetaCutoff => context.alpha_beta(
                board,
                Horizon::Elapsed {
                    ply: 0,
                    cutoff: config.cutoff_depth,
                },
                i64::MIN,
                i64::MAX,
                true,
            ),
        };

        let result = SearchResult {
            column,
            score,
            nodes_visited: context.node_count,
            elapsed: start.elapsed(),
            completed: !context.timed_out,
        };
        debug!(
            "{} chose column {:?} with score {} after {} nodes in {:.3}s",
            config.algorithm,
            result.column,
            result.score,
            result.nodes_visited,
            result.elapsed.as_secs_f64()
        );
        Ok(result)
    }
}

/// Runs independent searches on the same board in parallel
///
/// Each configuration gets its own `Searcher`, seeded from `seed` and its
/// position, and the results come back in the order of `configs`.
pub fn compare_strategies<const ROWS: usize, const COLS: usize>(
    board: &Board<ROWS, COLS>,
    configs: &[SearchConfig],
    seed: u64,
) -> Result<Vec<(Algorithm, SearchResult)>, SearchError> {
    configs
        .par_iter()
        .enumerate()
        .map(|(i, config)| {
            let mut searcher = Searcher::with_seed(seed.wrapping_add(i as u64));
            searcher
                .choose_move(board, config)
                .map(|result| (config.algorithm, result))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizon_counts_both_ways() {
        let remaining = Horizon::Remaining(2);
        assert!(!remaining.reached());
        assert!(!remaining.deeper().reached());
        assert!(remaining.deeper().deeper().reached());

        let elapsed = Horizon::Elapsed { ply: 0, cutoff: 2 };
        assert!(!elapsed.reached());
        assert!(!elapsed.deeper().reached());
        assert!(elapsed.deeper().deeper().reached());
    }

    #[test]
    fn leaf_rule() {
        let board: Board = Board::new();
        assert_eq!(leaf_score(&board, false), None);
        assert_eq!(leaf_score(&board, true), Some(0));

        let won: Board = Board::from_moves("1212121", Piece::Ai).unwrap();
        assert_eq!(leaf_score(&won, false), Some(WIN_SCORE));

        let lost: Board = Board::from_moves("1212121", Piece::Human).unwrap();
        assert_eq!(leaf_score(&lost, false), Some(-WIN_SCORE));

        let mut open: Board = Board::new();
        open.drop_piece(0, 3, Piece::Ai);
        assert_eq!(leaf_score(&open, true), Some(evaluate(&open, Piece::Ai)));
    }

    #[test]
    fn algorithm_names() {
        assert_eq!("random".parse(), Ok(Algorithm::Random));
        assert_eq!("Minimax".parse(), Ok(Algorithm::Minimax));
        assert_eq!("alpha-beta".parse(), Ok(Algorithm::AlphaBeta));
        assert_eq!("AB-Cutoff".parse(), Ok(Algorithm::AlphaBetaCutoff));
        assert!("negamax".parse::<Algorithm>().is_err());

        for algorithm in Algorithm::ALL.iter() {
            assert_eq!(algorithm.to_string().parse(), Ok(*algorithm));
        }
    }

    #[test]
    fn zero_depth_is_rejected() {
        let board: Board = Board::new();
        let mut searcher = Searcher::with_seed(0);

        for algorithm in [
            Algorithm::Minimax,
            Algorithm::AlphaBeta,
            Algorithm::AlphaBetaCutoff,
        ] {
            assert_eq!(
                searcher.choose_move(&board, &SearchConfig::new(algorithm, 0)),
                Err(SearchError::InvalidDepth { algorithm })
            );
        }
        assert!(searcher
            .choose_move(&board, &SearchConfig::new(Algorithm::Random, 0))
            .is_ok());
    }

    #[test]
    fn default_depths() {
        assert_eq!(SearchConfig::from(Algorithm::Minimax).depth, 4);
        assert_eq!(SearchConfig::from(Algorithm::AlphaBeta).depth, 6);
        assert_eq!(SearchConfig::from(Algorithm::AlphaBetaCutoff).cutoff_depth, 5);
    }

    #[test]
    fn random_move_is_legal() {
        let mut board: Board = Board::from_moves("111111222222333333", Piece::Human).unwrap();
        let mut searcher = Searcher::with_seed(42);
        let config = SearchConfig::from(Algorithm::Random);

        for _ in 0..50 {
            let result = searcher.choose_move(&board, &config).unwrap();
            let column = result.column.unwrap();
            assert!(board.is_valid_move(column));
            assert_eq!(result.nodes_visited, 1);
        }

        // with a single open column the choice is forced
        for column in [4, 5, 6] {
            while board.is_valid_move(column) {
                let piece = if board.disc_count() % 2 == 0 {
                    Piece::Human
                } else {
                    Piece::Ai
                };
                board.play(column, piece).unwrap();
            }
        }
        assert_eq!(board.valid_moves(), vec![3]);
        let result = searcher.choose_move(&board, &config).unwrap();
        assert_eq!(result.column, Some(3));
    }

    #[test]
    fn terminal_root_has_no_column() {
        let won: Board = Board::from_moves("1212121", Piece::Human).unwrap();
        let mut searcher = Searcher::with_seed(1);

        for algorithm in Algorithm::ALL.iter() {
            let result = searcher
                .choose_move(&won, &SearchConfig::new(*algorithm, 3))
                .unwrap();
            assert_eq!(result.column, None);
            assert_eq!(result.score, -WIN_SCORE);
            assert_eq!(result.nodes_visited, 1);
        }
    }

    #[test]
    fn minimax_node_count_is_full_tree() {
        let board: Board = Board::new();
        let mut searcher = Searcher::with_seed(3);
        let result = searcher
            .choose_move(&board, &SearchConfig::new(Algorithm::Minimax, 3))
            .unwrap();
        assert_eq!(result.nodes_visited, 1 + 7 + 49 + 343);
        assert!(result.completed);
    }

    #[test]
    fn time_limit_stops_after_first_sibling() {
        let board: Board = Board::new();
        let mut searcher = Searcher::with_seed(5);

        for algorithm in [Algorithm::Minimax, Algorithm::AlphaBeta, Algorithm::AlphaBetaCutoff] {
            let config = SearchConfig::new(algorithm, 3).with_time_limit(Duration::ZERO);
            let result = searcher.choose_move(&board, &config).unwrap();
            // only the leftmost path is explored
            assert_eq!(result.nodes_visited, 4);
            assert_eq!(result.column, Some(0));
            assert!(!result.completed);
        }
    }

    #[test]
    fn compare_keeps_input_order() {
        let board: Board = Board::from_moves("4453", Piece::Human).unwrap();
        let configs: Vec<SearchConfig> = Algorithm::ALL
            .iter()
            .map(|&algorithm| SearchConfig::new(algorithm, 3))
            .collect();

        let results = compare_strategies(&board, &configs, 11).unwrap();
        let algorithms: Vec<Algorithm> = results.iter().map(|(algorithm, _)| *algorithm).collect();
        assert_eq!(algorithms, Algorithm::ALL.to_vec());

        let mut searcher = Searcher::with_seed(0);
        let minimax = searcher.choose_move(&board, &configs[1]).unwrap();
        assert_eq!(results[1].1.column, minimax.column);
        assert_eq!(results[1].1.score, minimax.score);
        assert_eq!(results[2].1.score, minimax.score);
    }
}
