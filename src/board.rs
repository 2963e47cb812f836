use crate::error::{InvalidMove, InvalidPosition};
use crate::{HEIGHT, WIDTH};

/// The contents of a single tile
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Piece {
    Empty,
    PlayerA,
    PlayerB,
}

impl Piece {
    pub fn is_empty(self) -> bool {
        matches!(self, Piece::Empty)
    }

    /// The piece of the other player. `Empty` maps to itself.
    pub fn opponent(self) -> Piece {
        match self {
            Piece::PlayerA => Piece::PlayerB,
            Piece::PlayerB => Piece::PlayerA,
            Piece::Empty => Piece::Empty,
        }
    }
}

impl Default for Piece {
    fn default() -> Self {
        Piece::Empty
    }
}

/// A single placement. The row is always derived from the column's height.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Move {
    pub column: usize,
    pub row: usize,
    pub piece: Piece,
}

/// A snapshot of the board, indexed `[row][column]` with row 0 at the bottom
pub type Grid = [[Piece; WIDTH]; HEIGHT];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cells: [Piece; WIDTH * HEIGHT], // cells are stored left-to-right, bottom-to-top
    heights: [usize; WIDTH],
    history: Vec<Move>,
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [Piece::Empty; WIDTH * HEIGHT],
            heights: [0; WIDTH],
            history: Vec::with_capacity(WIDTH * HEIGHT),
        }
    }

    /// Replays a string of 0-indexed column digits, alternating pieces and
    /// starting with `PlayerA`. The final move may win, but no move may follow a win.
    pub fn from_moves<S: AsRef<str>>(moves: S) -> Result<Self, InvalidPosition> {
        let mut board = Self::new();
        let mut piece = Piece::PlayerA;
        let mut won = false;

        for (index, column_char) in moves.as_ref().chars().enumerate() {
            let column = column_char
                .to_digit(10)
                .ok_or(InvalidPosition::Parse(column_char))? as usize;
            if won {
                return Err(InvalidPosition::PlayAfterWin { index });
            }
            let row = board.place(column, piece)?;
            won = board.wins_from(piece, row, column);
            piece = piece.opponent();
        }
        Ok(board)
    }

    /// Builds a board from an external snapshot, checking that it could have
    /// arisen from legal play
    pub fn from_grid(grid: &Grid) -> Result<Self, InvalidPosition> {
        let mut board = Self::new();
        let (mut player_a, mut player_b) = (0, 0);

        for column in 0..WIDTH {
            let mut top_reached = false;
            for row in 0..HEIGHT {
                let piece = grid[row][column];
                if piece.is_empty() {
                    top_reached = true;
                    continue;
                }
                if top_reached {
                    return Err(InvalidPosition::FloatingPiece { row, column });
                }
                match piece {
                    Piece::PlayerA => player_a += 1,
                    _ => player_b += 1,
                }
            }
        }
        if player_a != player_b && player_a != player_b + 1 {
            return Err(InvalidPosition::Unbalanced { player_a, player_b });
        }

        // any bottom-up order keeps each column's placements in stack order
        for row in 0..HEIGHT {
            for column in 0..WIDTH {
                let piece = grid[row][column];
                if !piece.is_empty() {
                    board.place(column, piece)?;
                }
            }
        }

        if board.has_winning_position(Piece::PlayerA) && board.has_winning_position(Piece::PlayerB) {
            return Err(InvalidPosition::DoubleWin);
        }
        Ok(board)
    }

    /// Drops `piece` into `column`, returning the row it landed on.
    ///
    /// Nothing is written unless the column is in range and has space.
    pub fn place(&mut self, column: usize, piece: Piece) -> Result<usize, InvalidMove> {
        debug_assert!(!piece.is_empty(), "cannot place an empty piece");
        if column >= WIDTH {
            return Err(InvalidMove::OutOfBounds { column });
        }
        let row = self.heights[column];
        if row >= HEIGHT {
            return Err(InvalidMove::ColumnFull { column });
        }

        self.cells[column + WIDTH * row] = piece;
        self.heights[column] += 1;
        self.history.push(Move { column, row, piece });
        Ok(row)
    }

    /// Removes the most recent piece placed into `column`.
    ///
    /// Only valid for the column of the most recent placement; search relies on
    /// strict place/undo nesting. Debug builds check this.
    pub fn undo(&mut self, column: usize) {
        let last = self.history.pop();
        debug_assert_eq!(
            last.map(|m| m.column),
            Some(column),
            "undo out of order for column {}",
            column
        );
        self.heights[column] -= 1;
        self.cells[column + WIDTH * self.heights[column]] = Piece::Empty;
    }

    pub fn playable(&self, column: usize) -> bool {
        column < WIDTH && self.heights[column] < HEIGHT
    }

    /// Columns that can still take a piece, left to right
    pub fn legal_columns(&self) -> Vec<usize> {
        (0..WIDTH).filter(|&column| self.playable(column)).collect()
    }

    pub fn is_full(&self) -> bool {
        self.history.len() == WIDTH * HEIGHT
    }

    pub fn height(&self, column: usize) -> usize {
        self.heights[column]
    }

    /// The piece at `row` (counted from the bottom) and `column`
    pub fn get(&self, row: usize, column: usize) -> Piece {
        self.cells[column + WIDTH * row]
    }

    pub fn num_moves(&self) -> usize {
        self.history.len()
    }

    /// Every placement so far, oldest first
    pub fn moves(&self) -> &[Move] {
        &self.history
    }

    pub fn last_move(&self) -> Option<Move> {
        self.history.last().copied()
    }

    /// The side to move, assuming `PlayerA` opened the game
    pub fn to_move(&self) -> Piece {
        let player_a = self.cells.iter().filter(|&&p| p == Piece::PlayerA).count();
        let player_b = self.cells.iter().filter(|&&p| p == Piece::PlayerB).count();
        if player_a > player_b {
            Piece::PlayerB
        } else {
            Piece::PlayerA
        }
    }

    pub fn snapshot(&self) -> Grid {
        let mut grid = [[Piece::Empty; WIDTH]; HEIGHT];
        for (row, cells) in grid.iter_mut().enumerate() {
            cells.copy_from_slice(&self.cells[WIDTH * row..WIDTH * (row + 1)]);
        }
        grid
    }

    /// A unique code for the exact contents of the board.
    ///
    /// Each column occupies `HEIGHT + 1` bits holding `player_a + occupied`, which
    /// never carries into the next column and is distinct for every column filling.
    pub fn position_code(&self) -> u64 {
        let mut code = 0u64;
        for column in 0..WIDTH {
            let occupied = (1u64 << self.heights[column]) - 1;
            let mut player_a = 0u64;
            for row in 0..self.heights[column] {
                if self.get(row, column) == Piece::PlayerA {
                    player_a |= 1 << row;
                }
            }
            code |= (occupied + player_a) << (column * (HEIGHT + 1));
        }
        code
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_lands_on_lowest_row() {
        let mut board = Board::new();
        assert_eq!(board.place(3, Piece::PlayerA), Ok(0));
        assert_eq!(board.place(3, Piece::PlayerB), Ok(1));
        assert_eq!(board.get(0, 3), Piece::PlayerA);
        assert_eq!(board.get(1, 3), Piece::PlayerB);
        assert_eq!(board.height(3), 2);
    }

    #[test]
    fn rejected_moves_do_not_mutate() {
        let mut board = Board::from_moves("000000").unwrap();
        let before = board.clone();

        assert_eq!(
            board.place(0, Piece::PlayerA),
            Err(InvalidMove::ColumnFull { column: 0 })
        );
        assert_eq!(
            board.place(WIDTH, Piece::PlayerA),
            Err(InvalidMove::OutOfBounds { column: WIDTH })
        );
        assert_eq!(board, before);
    }

    #[test]
    fn undo_restores_previous_state() {
        let mut board = Board::from_moves("3324").unwrap();
        let before = board.clone();
        board.place(4, Piece::PlayerA).unwrap();
        board.undo(4);
        assert_eq!(board, before);
    }

    #[test]
    fn snapshot_uses_bottom_row_zero() {
        let board = Board::from_moves("01").unwrap();
        let grid = board.snapshot();
        assert_eq!(grid[0][0], Piece::PlayerA);
        assert_eq!(grid[0][1], Piece::PlayerB);
        assert_eq!(grid[HEIGHT - 1][0], Piece::Empty);
    }

    #[test]
    fn from_grid_round_trips_snapshot() {
        let board = Board::from_moves("3344256").unwrap();
        let rebuilt = Board::from_grid(&board.snapshot()).unwrap();
        assert_eq!(rebuilt.snapshot(), board.snapshot());
        assert_eq!(rebuilt.position_code(), board.position_code());
        assert_eq!(rebuilt.to_move(), Piece::PlayerB);
    }

    #[test]
    fn from_grid_rejects_floating_pieces() {
        let mut grid = [[Piece::Empty; WIDTH]; HEIGHT];
        grid[1][2] = Piece::PlayerA;
        assert_eq!(
            Board::from_grid(&grid),
            Err(InvalidPosition::FloatingPiece { row: 1, column: 2 })
        );
    }

    #[test]
    fn from_moves_rejects_play_after_win() {
        assert_eq!(
            Board::from_moves("01010106"),
            Err(InvalidPosition::PlayAfterWin { index: 7 })
        );
        assert_eq!(Board::from_moves("0x"), Err(InvalidPosition::Parse('x')));
    }

    #[test]
    fn position_codes_differ_by_owner() {
        let a = Board::from_moves("01").unwrap();
        let b = Board::from_moves("10").unwrap();
        assert_ne!(a.position_code(), b.position_code());
    }
}
