//! An optimal Tic-Tac-Toe opponent.
//!
//! The engine runs a full-depth minimax search with alpha-beta pruning over
//! the 3x3 board and returns a provably optimal cell to play. Scores are fixed
//! to O's point of view: O maximizes, X minimizes, whichever side the engine
//! is playing.
//!
//! Rendering and input handling are left to the caller, which owns a
//! [`GameState`], plays the human's moves into it and asks the [`Engine`]
//! for replies.
//!
//! # Example
//!
//! ```rust
//! use minimax_ttt::board::{Board, Player};
//! use minimax_ttt::minimax::{Engine, ScoredMove};
//!
//! // O to move and win on cell 2
//! let board: Board = "OO.XX....".parse().unwrap();
//!
//! let engine = Engine::builder()
//!     .with_alpha_beta_pruning(true)
//!     .with_depth_scoring(true)
//!     .build();
//!
//! let best = engine.best_move(board, Player::O).unwrap();
//! assert_eq!(best, ScoredMove { mv: 2, value: 10 });
//! ```

/// Contains the `Board` value type and the cell, player and outcome enums.
pub mod board;
/// Contains the crate error type.
pub mod error;
/// Contains `GameState`, the live game driven by the caller.
pub mod game;
/// The core module of the library, containing the minimax `Engine`.
pub mod minimax;
/// Contains traits and implementations for random number generation.
pub mod random;
/// Evaluation constants and terminal scoring.
pub mod score;
/// Contains `SearchNode`, the element of a recorded search tree.
pub mod search_node;

#[cfg(test)]
pub(crate) mod test_utils;

pub use board::{Board, Cell, Move, Outcome, Player};
pub use error::{Error, Result};
pub use game::GameState;
pub use minimax::{
    Analysis, Engine, EngineBuilder, EngineConfig, ScoredMove, SearchStats, best_move,
};
