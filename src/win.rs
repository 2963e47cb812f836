//! Four-in-a-row detection

use crate::board::{Board, Piece};
use crate::{CONNECT, HEIGHT, WIDTH};

/// The four line directions as (row step, column step): horizontal, vertical, '/' and '\'
pub const AXES: [(i32, i32); 4] = [(0, 1), (1, 0), (1, 1), (-1, 1)];

/// The number of distinct `CONNECT`-long windows on the board
pub const NUM_WINDOWS: usize = HEIGHT * (WIDTH - CONNECT + 1)
    + (HEIGHT - CONNECT + 1) * WIDTH
    + 2 * (HEIGHT - CONNECT + 1) * (WIDTH - CONNECT + 1);

/// Every window as a list of (row, column) cells
pub static WINDOWS: [[(usize, usize); CONNECT]; NUM_WINDOWS] = windows();

const fn windows() -> [[(usize, usize); CONNECT]; NUM_WINDOWS] {
    let mut windows = [[(0, 0); CONNECT]; NUM_WINDOWS];
    let mut n = 0;
    let mut axis = 0;
    while axis < AXES.len() {
        let (dr, dc) = AXES[axis];
        let mut row = 0;
        while row < HEIGHT {
            let mut column = 0;
            while column < WIDTH {
                let end_row = row as i32 + dr * (CONNECT as i32 - 1);
                let end_column = column as i32 + dc * (CONNECT as i32 - 1);
                if end_row >= 0 && end_row < HEIGHT as i32 && end_column >= 0 && end_column < WIDTH as i32 {
                    let mut i = 0;
                    while i < CONNECT {
                        windows[n][i] = (
                            (row as i32 + dr * i as i32) as usize,
                            (column as i32 + dc * i as i32) as usize,
                        );
                        i += 1;
                    }
                    n += 1;
                }
                column += 1;
            }
            row += 1;
        }
        axis += 1;
    }
    windows
}

impl Board {
    /// Checks whether the piece at (`row`, `column`), just placed, completes a line.
    ///
    /// Only the cells reachable from the placed piece along each axis are examined.
    pub fn wins_from(&self, piece: Piece, row: usize, column: usize) -> bool {
        if piece.is_empty() {
            return false;
        }
        for &(dr, dc) in AXES.iter() {
            let mut run = 0;
            for dir in [-1i32, 1].iter() {
                let mut r = row as i32 + dir * dr;
                let mut c = column as i32 + dir * dc;
                loop {
                    if r < 0
                        || r >= HEIGHT as i32
                        || c < 0
                        || c >= WIDTH as i32
                        || self.get(r as usize, c as usize) != piece
                    {
                        break;
                    }
                    r += dir * dr;
                    c += dir * dc;
                    run += 1;
                }
            }
            if run >= CONNECT - 1 {
                return true;
            }
        }
        false
    }

    /// Checks every window on the board for a line of `piece`, without needing a last move
    pub fn has_winning_position(&self, piece: Piece) -> bool {
        !piece.is_empty()
            && WINDOWS
                .iter()
                .any(|window| window.iter().all(|&(row, column)| self.get(row, column) == piece))
    }
}
