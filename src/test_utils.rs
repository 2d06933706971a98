//! Proptest strategies shared by the unit tests.

use crate::board::{Board, Move, Player};
use proptest::prelude::*;

/// Plays `moves` in order from an empty board, skipping occupied cells and
/// stopping as soon as the game is decided.
pub(crate) fn play_out(first: Player, moves: &[Move]) -> (Board, Player) {
    let mut board = Board::new();
    let mut side = first;
    for &mv in moves {
        if board.outcome().is_terminal() {
            break;
        }
        if let Ok(next) = board.apply_move(mv, side) {
            board = next;
            side = side.opponent();
        }
    }
    (board, side)
}

/// Any position reachable by alternating play, with the side to move.
pub(crate) fn reachable_position() -> impl Strategy<Value = (Board, Player)> {
    (
        prop_oneof![Just(Player::X), Just(Player::O)],
        prop::collection::vec(0u8..9, 0..12),
    )
        .prop_map(|(first, moves)| play_out(first, &moves))
}

/// A reachable position that is still in progress.
pub(crate) fn open_position() -> impl Strategy<Value = (Board, Player)> {
    reachable_position().prop_filter("game already decided", |(b, _)| {
        !b.outcome().is_terminal()
    })
}
