//! Terminal evaluation.
//!
//! Scores are absolute, not relative to the side to move: an O win is
//! positive and an X win negative. O is therefore the maximizing side and X
//! the minimizing side in every search.

use crate::board::Outcome;

/// Score of a position O has won.
pub const WIN_SCORE: i32 = 10;
/// Score of a position X has won.
pub const LOSS_SCORE: i32 = -WIN_SCORE;
/// Score of a drawn position.
pub const DRAW_SCORE: i32 = 0;

/// Lower search bound; below every reachable score.
pub const NEG_INFINITY: i32 = i32::MIN;
/// Upper search bound; above every reachable score.
pub const INFINITY: i32 = i32::MAX;

/// Scores a decided `outcome` reached `depth` plies below the root candidate.
///
/// With `depth_sensitive` set a win is worth less the later it happens, so the
/// winning side prefers the fastest win and the losing side the slowest loss.
/// Returns `None` while the game is still in progress.
pub fn terminal_score(outcome: Outcome, depth: u32, depth_sensitive: bool) -> Option<i32> {
    let penalty = if depth_sensitive {
        depth.min(WIN_SCORE as u32 - 1) as i32
    } else {
        0
    };

    match outcome {
        Outcome::OWins => Some(WIN_SCORE - penalty),
        Outcome::XWins => Some(LOSS_SCORE + penalty),
        Outcome::Draw => Some(DRAW_SCORE),
        Outcome::InProgress => None,
    }
}

/// Maps a score back to the outcome it promises under optimal play.
pub fn expected_outcome(score: i32) -> Outcome {
    match score {
        s if s > DRAW_SCORE => Outcome::OWins,
        s if s < DRAW_SCORE => Outcome::XWins,
        _ => Outcome::Draw,
    }
}
