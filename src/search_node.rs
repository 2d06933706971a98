use crate::board::{Move, Player};

/// A position visited during a traced search.
///
/// Nodes are stored in an `ego_tree::Tree`; the root is the position the
/// search started from and every child is reached by one move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchNode {
    /// The move that led to this position. `None` for the root.
    pub mv: Option<Move>,
    /// The side that played `mv`, or the side to move at the root.
    pub player: Player,
    /// Plies between the root and this position.
    pub ply: u32,
    /// The minimax value backed up into this node, from O's point of view.
    /// Stays `None` only if the search never finished the node.
    pub value: Option<i32>,
    /// Set when the remaining children were skipped by an alpha-beta cutoff.
    pub cutoff: bool,
}

impl SearchNode {
    /// Creates the root node for a search with `side_to_move` on move.
    pub fn root(side_to_move: Player) -> Self {
        Self {
            mv: None,
            player: side_to_move,
            ply: 0,
            value: None,
            cutoff: false,
        }
    }

    /// Creates a node for `mv` played by `player`.
    pub fn new(mv: Move, player: Player, ply: u32) -> Self {
        Self {
            mv: Some(mv),
            player,
            ply,
            value: None,
            cutoff: false,
        }
    }

    /// Returns `true` for the node the search started from.
    pub fn is_root(&self) -> bool {
        self.mv.is_none()
    }
}
