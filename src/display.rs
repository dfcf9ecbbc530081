use anyhow::Result;
use crossterm::{
    cursor::MoveTo,
    style::{style, Attribute, Color, PrintStyledContent},
    QueueableCommand,
};

use std::io::{stdout, Write};

use connect4_search::{Board, Cell, Piece};

/// Draws the board in colour at the cursor, bottom row last
pub fn draw(board: &Board) -> Result<()> {
    let mut stdout = stdout();

    // make room for the grid, then paint it upwards from the cursor
    for _ in 0..board.rows() {
        stdout.queue(PrintStyledContent(style("\n")))?;
    }
    stdout.flush()?;

    let (origin_x, origin_y) = crossterm::cursor::position()?;

    for row in 0..board.rows() {
        for column in 0..board.columns() {
            let (pos_x, pos_y) = (origin_x + column as u16, origin_y - 1 - row as u16);

            stdout
                .queue(MoveTo(pos_x, pos_y))?
                .queue(PrintStyledContent(
                    style("O")
                        .attribute(Attribute::Bold)
                        .on(Color::DarkBlue)
                        .with(match board.cell(row, column) {
                            Cell::Disc(Piece::Human) => Color::Red,
                            Cell::Disc(Piece::Ai) => Color::Yellow,
                            Cell::Empty => Color::DarkBlue,
                        }),
                ))?;
        }
    }

    let cols: String = (1..=board.columns()).map(|x| x.to_string()).collect();
    stdout
        .queue(MoveTo(origin_x, origin_y))?
        .queue(PrintStyledContent(style(cols + "\n")))?;
    stdout.flush()?;
    Ok(())
}

/// Draws the board as plain text, for terminals without cursor control
pub fn print(board: &Board) {
    println!("{}\n", board);
}
