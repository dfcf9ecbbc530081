//! Positional heuristic for non-terminal leaves
//!
//! Every line of four cells on the board is scored on its own and the results
//! are summed, so a disc taking part in several potential lines is counted once
//! per line. This deliberately favours central, multi-threat configurations.

use crate::board::{Board, Cell, Piece};
use crate::SERIES_LEN;

/// Bonus per disc in the centre column
pub const CENTER_WEIGHT: i64 = 3;

const FOUR_SCORE: i64 = 100;
const THREE_SCORE: i64 = 5;
const TWO_SCORE: i64 = 2;
const OPPONENT_THREE_PENALTY: i64 = 4;

/// Scores a single window of four cells from `piece`'s point of view
pub fn evaluate_window(window: &[Cell; SERIES_LEN], piece: Piece) -> i64 {
    let count = |target: Cell| window.iter().filter(|&&cell| cell == target).count();
    let own = count(Cell::Disc(piece));
    let opponent = count(Cell::Disc(piece.opponent()));
    let empty = count(Cell::Empty);

    let mut score = match (own, empty) {
        (4, _) => FOUR_SCORE,
        (3, 1) => THREE_SCORE,
        (2, 2) => TWO_SCORE,
        _ => 0,
    };

    // an open three for the opponent is one move from a loss
    if opponent == 3 && empty == 1 {
        score -= OPPONENT_THREE_PENALTY;
    }

    score
}

/// Heuristic score of a whole board for `piece`
pub fn evaluate<const ROWS: usize, const COLS: usize>(
    board: &Board<ROWS, COLS>,
    piece: Piece,
) -> i64 {
    let center = COLS / 2;
    let center_count = (0..ROWS)
        .filter(|&row| board.cell(row, center) == Cell::Disc(piece))
        .count() as i64;

    let windows: i64 = board
        .windows()
        .map(|window| evaluate_window(&window, piece))
        .sum();

    center_count * CENTER_WEIGHT + windows
}
