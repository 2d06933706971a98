use thiserror::Error;

/// Errors produced by board manipulation and the search engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The target cell already holds a mark.
    #[error("invalid move: position {position} is already occupied")]
    InvalidMove { position: usize },

    /// The target cell is not on the board.
    #[error("position {position} is out of bounds (must be 0-8)")]
    InvalidPosition { position: usize },

    /// The engine was asked to move on a finished game.
    #[error("no moves available: the game is already decided")]
    NoMovesAvailable,

    #[error("game already over")]
    GameOver,

    #[error("board string has wrong length: expected {expected} cells, got {got} in '{context}'")]
    InvalidBoardLength {
        expected: usize,
        got: usize,
        context: String,
    },

    #[error("invalid character '{character}' at position {position} in '{context}'")]
    InvalidCellCharacter {
        character: char,
        position: usize,
        context: String,
    },

    #[error("unreachable position: X={x_count}, O={o_count}")]
    InvalidPieceCounts { x_count: usize, o_count: usize },
}

impl Error {
    /// Returns `true` for rejections of a requested move, which a caller
    /// recovers from by asking for another cell.
    pub fn is_invalid_move(&self) -> bool {
        matches!(
            self,
            Error::InvalidMove { .. } | Error::InvalidPosition { .. }
        )
    }
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;
