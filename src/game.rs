use crate::board::{Board, Cell, Move, Outcome, Player};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The live game: a board plus the side to move.
///
/// Owned by the caller driving the game. The engine only ever receives copies
/// of the board, so searching never disturbs the game in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    side_to_move: Player,
    first_player: Player,
}

impl GameState {
    /// Creates an empty game with `first_player` on move.
    pub fn new(first_player: Player) -> Self {
        Self {
            board: Board::new(),
            side_to_move: first_player,
            first_player,
        }
    }

    /// Rebuilds a game from a board snapshot.
    ///
    /// # Errors
    ///
    /// `InvalidPieceCounts` when the snapshot cannot arise from alternating
    /// play with `side_to_move` on move: mark counts more than one apart, the
    /// wrong side to move for the counts, both sides holding a line, or the
    /// side to move having already won.
    pub fn from_snapshot(board: Board, side_to_move: Player) -> Result<Self> {
        let x_count = board.count(Cell::X);
        let o_count = board.count(Cell::O);
        let invalid = Error::InvalidPieceCounts { x_count, o_count };

        let first_player = if x_count == o_count {
            side_to_move
        } else if x_count == o_count + 1 && side_to_move == Player::O {
            Player::X
        } else if o_count == x_count + 1 && side_to_move == Player::X {
            Player::O
        } else {
            return Err(invalid);
        };

        let x_won = board.has_won(Player::X);
        let o_won = board.has_won(Player::O);
        if (x_won && o_won) || board.has_won(side_to_move) {
            return Err(invalid);
        }

        Ok(Self {
            board,
            side_to_move,
            first_player,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Player {
        self.side_to_move
    }

    pub fn first_player(&self) -> Player {
        self.first_player
    }

    pub fn outcome(&self) -> Outcome {
        self.board.outcome()
    }

    /// The completed line of a won game.
    pub fn winning_line(&self) -> Option<[usize; 3]> {
        self.board.winning_line()
    }

    /// Plays `mv` for the side to move and hands the turn over.
    ///
    /// # Errors
    ///
    /// `GameOver` once the game is decided; `InvalidMove` / `InvalidPosition`
    /// for a cell that cannot be played. The state is unchanged on error.
    pub fn play(&mut self, mv: Move) -> Result<Outcome> {
        if self.outcome().is_terminal() {
            return Err(Error::GameOver);
        }

        self.board = self.board.apply_move(mv, self.side_to_move)?;
        debug!(player = ?self.side_to_move, mv, "move played");
        self.side_to_move = self.side_to_move.opponent();

        Ok(self.outcome())
    }

    /// Clears the board; the same side opens again.
    pub fn reset(&mut self) {
        *self = Self::new(self.first_player);
    }
}

impl Default for GameState {
    /// Creates a new game with 'X' starting.
    fn default() -> Self {
        GameState::new(Player::X)
    }
}
