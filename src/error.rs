use std::path::PathBuf;

/// A placement that cannot be made on the current board.
///
/// Raised before any mutation of the board happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidMove {
    #[error("Invalid move, column {column} out of range. Columns must be between 0 and {}", crate::WIDTH - 1)]
    OutOfBounds { column: usize },

    #[error("Invalid move, column {column} full")]
    ColumnFull { column: usize },
}

/// Errors raised by the game controller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error(transparent)]
    InvalidMove(#[from] InvalidMove),

    #[error("the game is already over")]
    GameOver,

    #[error("unknown difficulty '{0}', expected one of: easy, medium, hard, very-hard")]
    UnknownDifficulty(String),
}

/// An externally supplied board that could not have arisen from legal play.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidPosition {
    #[error("floating piece at row {row}, column {column}")]
    FloatingPiece { row: usize, column: usize },

    #[error("piece counts are unbalanced: {player_a} for player A, {player_b} for player B")]
    Unbalanced { player_a: usize, player_b: usize },

    #[error("both players have four in a row")]
    DoubleWin,

    #[error("could not parse '{0}' as a valid move")]
    Parse(char),

    #[error("position is already won before move {index}")]
    PlayAfterWin { index: usize },

    #[error(transparent)]
    InvalidMove(#[from] InvalidMove),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_move_display() {
        assert_eq!(
            InvalidMove::OutOfBounds { column: 9 }.to_string(),
            "Invalid move, column 9 out of range. Columns must be between 0 and 6"
        );
        assert_eq!(
            InvalidMove::ColumnFull { column: 2 }.to_string(),
            "Invalid move, column 2 full"
        );
    }

    #[test]
    fn game_error_is_transparent_over_moves() {
        let err: GameError = InvalidMove::ColumnFull { column: 4 }.into();
        assert_eq!(err.to_string(), "Invalid move, column 4 full");
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::Validation("search.hard_depth must be > 0".to_string());
        assert_eq!(
            err.to_string(),
            "config validation error: search.hard_depth must be > 0"
        );
    }
}
