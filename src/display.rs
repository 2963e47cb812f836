use anyhow::Result;
use crossterm::{
    style::{style, Attribute, Color, Print, PrintStyledContent},
    QueueableCommand,
};

use std::io::{stdout, Write};

use connect4_engine::board::{Board, Piece};
use connect4_engine::WIDTH;

/// Prints the board top row first under 1-indexed column labels, underlining
/// the most recent placement
pub fn display(board: &Board) -> Result<()> {
    let mut stdout = stdout();
    let last = board.last_move();

    let labels: String = (1..=WIDTH).map(|x| x.to_string()).collect();
    stdout.queue(Print(labels + "\n"))?;

    let grid = board.snapshot();
    for (row, cells) in grid.iter().enumerate().rev() {
        for (column, &piece) in cells.iter().enumerate() {
            let mut cell = style("O")
                .attribute(Attribute::Bold)
                .on(Color::DarkBlue)
                .with(piece_color(piece));
            if let Some(m) = last {
                if (m.row, m.column) == (row, column) {
                    cell = cell.attribute(Attribute::Underlined);
                }
            }
            stdout.queue(PrintStyledContent(cell))?;
        }
        stdout.queue(Print("\n"))?;
    }
    stdout.flush()?;
    Ok(())
}

fn piece_color(piece: Piece) -> Color {
    match piece {
        Piece::PlayerA => Color::Red,
        Piece::PlayerB => Color::Yellow,
        Piece::Empty => Color::DarkBlue,
    }
}

pub fn player_name(piece: Piece) -> &'static str {
    match piece {
        Piece::PlayerA => "Red",
        Piece::PlayerB => "Yellow",
        Piece::Empty => "Nobody",
    }
}
