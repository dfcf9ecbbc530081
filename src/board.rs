//! Grid state, move legality and win detection

use thiserror::Error;

use std::fmt;

use crate::{HEIGHT, SERIES_LEN, WIDTH};

/// Row/column steps of the four line orientations:
/// horizontal, vertical, ascending diagonal, descending diagonal
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (-1, 1)];

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Piece {
    Human,
    Ai,
}

impl Piece {
    pub fn opponent(self) -> Self {
        match self {
            Piece::Human => Piece::Ai,
            Piece::Ai => Piece::Human,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Cell {
    Empty,
    Disc(Piece),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    fn symbol(&self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Disc(Piece::Human) => 'X',
            Cell::Disc(Piece::Ai) => 'O',
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    #[error("column {column} is out of range, the board has {columns} columns")]
    ColumnOutOfRange { column: usize, columns: usize },
    #[error("column {column} is full")]
    ColumnFull { column: usize },
    #[error("the game is already over")]
    GameOver,
    #[error("could not parse '{character}' as a valid move")]
    InvalidMove { character: char },
}

/// A Connect 4 grid with gravity
///
/// Row 0 is the bottom of the board. The dimensions are part of the type,
/// `Board` on its own is the standard 6x7 board.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Board<const ROWS: usize = HEIGHT, const COLS: usize = WIDTH> {
    cells: [[Cell; COLS]; ROWS],
}

impl<const ROWS: usize, const COLS: usize> Default for Board<ROWS, COLS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const ROWS: usize, const COLS: usize> Board<ROWS, COLS> {
    /// Creates an empty board
    pub fn new() -> Self {
        assert!(ROWS >= SERIES_LEN && COLS >= SERIES_LEN);
        Self {
            cells: [[Cell::Empty; COLS]; ROWS],
        }
    }

    /// Builds a position from a string of 1-indexed column digits,
    /// alternating pieces starting with `first`
    pub fn from_moves<S: AsRef<str>>(moves: S, first: Piece) -> Result<Self, BoardError> {
        let mut board = Self::new();
        let mut piece = first;

        for column_char in moves.as_ref().chars() {
            let column = match column_char.to_digit(10) {
                Some(digit @ 1..=9) => digit as usize - 1,
                _ => {
                    return Err(BoardError::InvalidMove {
                        character: column_char,
                    })
                }
            };
            // abort if the position is won at any point
            if board.winner().is_some() {
                return Err(BoardError::GameOver);
            }
            board.play(column, piece)?;
            piece = piece.opponent();
        }
        Ok(board)
    }

    pub fn rows(&self) -> usize {
        ROWS
    }

    pub fn columns(&self) -> usize {
        COLS
    }

    pub fn cell(&self, row: usize, column: usize) -> Cell {
        self.cells[row][column]
    }

    /// Whether a disc can be dropped into `column`, i.e. its top cell is empty
    pub fn is_valid_move(&self, column: usize) -> bool {
        column < COLS && self.cells[ROWS - 1][column].is_empty()
    }

    /// Returns the lowest empty row in `column`, or `None` if it is full
    pub fn next_open_row(&self, column: usize) -> Option<usize> {
        (0..ROWS).find(|&row| self.cells[row][column].is_empty())
    }

    /// Sets a cell in place, for the authoritative game state
    pub fn drop_piece(&mut self, row: usize, column: usize, piece: Piece) {
        self.cells[row][column] = Cell::Disc(piece);
    }

    /// Returns a copy of the board with one more disc, leaving `self` untouched
    pub fn with_piece(&self, row: usize, column: usize, piece: Piece) -> Self {
        let mut next = *self;
        next.drop_piece(row, column, piece);
        next
    }

    /// Drops a disc into `column` under gravity, returning the row it landed in
    pub fn play(&mut self, column: usize, piece: Piece) -> Result<usize, BoardError> {
        if column >= COLS {
            return Err(BoardError::ColumnOutOfRange {
                column,
                columns: COLS,
            });
        }
        let row = self
            .next_open_row(column)
            .ok_or(BoardError::ColumnFull { column })?;
        self.drop_piece(row, column, piece);
        Ok(row)
    }

    /// Playable columns in ascending order, empty when the board is full
    pub fn valid_moves(&self) -> Vec<usize> {
        (0..COLS).filter(|&column| self.is_valid_move(column)).collect()
    }

    pub fn is_full(&self) -> bool {
        (0..COLS).all(|column| !self.is_valid_move(column))
    }

    pub fn disc_count(&self) -> usize {
        self.cells
            .iter()
            .flat_map(|row| row.iter())
            .filter(|cell| !cell.is_empty())
            .count()
    }

    /// Every line of four cells on the board, in all four orientations
    pub fn windows(&self) -> impl Iterator<Item = [Cell; SERIES_LEN]> + '_ {
        DIRECTIONS.into_iter().flat_map(move |(d_row, d_col)| {
            (0..ROWS).flat_map(move |row| {
                (0..COLS).filter_map(move |column| self.window(row, column, d_row, d_col))
            })
        })
    }

    fn window(
        &self,
        row: usize,
        column: usize,
        d_row: isize,
        d_col: isize,
    ) -> Option<[Cell; SERIES_LEN]> {
        let reach = SERIES_LEN as isize - 1;
        let last_row = row as isize + d_row * reach;
        let last_col = column as isize + d_col * reach;
        if last_row < 0 || last_row >= ROWS as isize || last_col < 0 || last_col >= COLS as isize {
            return None;
        }

        let mut window = [Cell::Empty; SERIES_LEN];
        for (i, cell) in window.iter_mut().enumerate() {
            let r = row as isize + d_row * i as isize;
            let c = column as isize + d_col * i as isize;
            *cell = self.cells[r as usize][c as usize];
        }
        Some(window)
    }

    /// Check if `piece` has four in a row in any orientation
    pub fn has_connect_four(&self, piece: Piece) -> bool {
        self.windows()
            .any(|window| window.iter().all(|&cell| cell == Cell::Disc(piece)))
    }

    pub fn winner(&self) -> Option<Piece> {
        [Piece::Ai, Piece::Human]
            .iter()
            .copied()
            .find(|&piece| self.has_connect_four(piece))
    }

    /// A position is terminal when either side has won or the board is full
    pub fn is_terminal(&self) -> bool {
        self.has_connect_four(Piece::Human) || self.has_connect_four(Piece::Ai) || self.is_full()
    }
}

impl<const ROWS: usize, const COLS: usize> fmt::Display for Board<ROWS, COLS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // top row first so the board reads naturally
        for row in self.cells.iter().rev() {
            let line: String = row.iter().map(Cell::symbol).collect();
            writeln!(f, "{}", line)?;
        }
        let footer: String = (1..=COLS)
            .map(|column| std::char::from_digit((column % 10) as u32, 10).unwrap_or('?'))
            .collect();
        write!(f, "{}", footer)
    }
}
