use crate::board::{Board, Move, Outcome, Player};
use crate::error::{Error, Result};
use crate::game::GameState;
use crate::random::{RandomGenerator, StandardRandomGenerator};
use crate::score::{self, DRAW_SCORE, INFINITY, NEG_INFINITY};
use crate::search_node::SearchNode;
use ego_tree::{NodeId, Tree};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A move chosen by the engine together with its minimax value.
///
/// The value is always from O's point of view: positive means O wins with
/// best play, negative means X wins, zero is a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoredMove {
    pub mv: Move,
    pub value: i32,
}

impl ScoredMove {
    /// The result this move leads to if both sides keep playing optimally.
    pub fn expected_outcome(&self) -> Outcome {
        score::expected_outcome(self.value)
    }
}

/// Counters collected during one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Positions visited, the root included.
    pub nodes: u64,
    /// Alpha-beta cutoffs taken.
    pub cutoffs: u64,
}

/// Everything a single search produced.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub best: ScoredMove,
    pub stats: SearchStats,
    /// The explored tree, present when tracing is enabled.
    pub trace: Option<Tree<SearchNode>>,
}

/// Engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Skip subtrees that cannot change the result.
    pub alpha_beta_pruning: bool,
    /// Prefer faster wins and slower losses. Without it the engine is still
    /// optimal but indifferent to how quickly a won game ends.
    pub depth_scoring: bool,
    /// Pick a random cell instead of searching when moving first.
    pub random_opening: bool,
    /// Record the explored tree in [`Analysis::trace`].
    pub trace: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            alpha_beta_pruning: true,
            depth_scoring: true,
            random_opening: true,
            trace: false,
        }
    }
}

/// The optimal opponent.
///
/// O is always the maximizing side and X the minimizing side; the engine can
/// play either, the side to move is passed with every request. Only the
/// configuration and the opening RNG live in the engine, no search state is
/// kept between calls.
pub struct Engine<K: RandomGenerator = StandardRandomGenerator> {
    config: EngineConfig,
    random: K,
}

impl<K: RandomGenerator> Default for Engine<K> {
    fn default() -> Self {
        Engine::new(EngineConfig::default(), K::default())
    }
}

/// A builder for creating instances of `Engine`.
pub struct EngineBuilder<K: RandomGenerator> {
    config: EngineConfig,
    random_generator: K,
}

impl EngineBuilder<StandardRandomGenerator> {
    /// Creates a builder with the default configuration.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            random_generator: StandardRandomGenerator,
        }
    }
}

impl Default for EngineBuilder<StandardRandomGenerator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: RandomGenerator> EngineBuilder<K> {
    /// Replaces the whole configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the random number generator used for the opening move.
    pub fn with_random_generator<R: RandomGenerator>(self, rg: R) -> EngineBuilder<R> {
        EngineBuilder {
            config: self.config,
            random_generator: rg,
        }
    }

    /// Enables or disables alpha-beta pruning.
    pub fn with_alpha_beta_pruning(mut self, use_abp: bool) -> Self {
        self.config.alpha_beta_pruning = use_abp;
        self
    }

    /// Enables or disables depth-adjusted terminal scores.
    pub fn with_depth_scoring(mut self, enabled: bool) -> Self {
        self.config.depth_scoring = enabled;
        self
    }

    /// Enables or disables the random first move on an empty board.
    pub fn with_random_opening(mut self, enabled: bool) -> Self {
        self.config.random_opening = enabled;
        self
    }

    /// Enables or disables recording of the search tree.
    pub fn with_trace(mut self, enabled: bool) -> Self {
        self.config.trace = enabled;
        self
    }

    pub fn build(self) -> Engine<K> {
        Engine::new(self.config, self.random_generator)
    }
}

impl Engine<StandardRandomGenerator> {
    /// Returns a new builder for `Engine`.
    pub fn builder() -> EngineBuilder<StandardRandomGenerator> {
        EngineBuilder::new()
    }
}

impl<K: RandomGenerator> Engine<K> {
    pub fn new(config: EngineConfig, random: K) -> Self {
        Self { config, random }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the optimal move for `side_to_move`.
    ///
    /// Moves are tried in ascending cell order and a later move only replaces
    /// the current best on a strict improvement, so among equally good moves
    /// the lowest index wins.
    ///
    /// # Errors
    ///
    /// `NoMovesAvailable` if the game on `board` is already decided.
    pub fn best_move(&self, board: Board, side_to_move: Player) -> Result<ScoredMove> {
        self.analyze(board, side_to_move).map(|analysis| analysis.best)
    }

    /// Runs a plain minimax search without pruning.
    ///
    /// Always returns the same value as [`Engine::best_move`]; it exists as a
    /// reference to check the pruned search against.
    pub fn full_minimax(&self, board: Board, side_to_move: Player) -> Result<ScoredMove> {
        let mut searcher = Searcher::new(EngineConfig {
            alpha_beta_pruning: false,
            trace: false,
            ..self.config
        });
        searcher.root(board, side_to_move)
    }

    /// Like [`Engine::best_move`], also returning search statistics and,
    /// when enabled, the explored tree.
    pub fn analyze(&self, board: Board, side_to_move: Player) -> Result<Analysis> {
        let mut searcher = Searcher::new(self.config);
        if self.config.trace {
            searcher.trace = Some(Tree::new(SearchNode::root(side_to_move)));
        }

        let best = searcher.root(board, side_to_move)?;
        debug!(
            side = ?side_to_move,
            mv = best.mv,
            value = best.value,
            nodes = searcher.stats.nodes,
            cutoffs = searcher.stats.cutoffs,
            "search complete"
        );

        Ok(Analysis {
            best,
            stats: searcher.stats,
            trace: searcher.trace,
        })
    }

    /// Chooses the engine's reply in a running game.
    ///
    /// On an empty board with random openings enabled any cell is played,
    /// every opening draws under optimal play. Otherwise this is
    /// [`Engine::best_move`] for the side to move. The opening is reported
    /// with a draw value.
    pub fn choose_move(&mut self, state: &GameState) -> Result<ScoredMove> {
        let board = *state.board();
        if board.outcome().is_terminal() {
            return Err(Error::NoMovesAvailable);
        }

        if self.config.random_opening && board.is_empty_board() {
            let moves = board.legal_moves();
            if let Some(&mv) = self.random.choose(&moves) {
                debug!(side = ?state.side_to_move(), mv, "random opening");
                return Ok(ScoredMove {
                    mv,
                    value: DRAW_SCORE,
                });
            }
        }

        self.best_move(board, state.side_to_move())
    }
}

/// Searches with the default engine settings.
pub fn best_move(board: Board, side_to_move: Player) -> Result<ScoredMove> {
    Engine::builder().build().best_move(board, side_to_move)
}

/// State of one search; discarded when the search returns.
struct Searcher {
    pruning: bool,
    depth_scoring: bool,
    stats: SearchStats,
    trace: Option<Tree<SearchNode>>,
}

impl Searcher {
    fn new(config: EngineConfig) -> Self {
        Self {
            pruning: config.alpha_beta_pruning,
            depth_scoring: config.depth_scoring,
            stats: SearchStats::default(),
            trace: None,
        }
    }

    fn root(&mut self, board: Board, side: Player) -> Result<ScoredMove> {
        if board.outcome().is_terminal() {
            return Err(Error::NoMovesAvailable);
        }

        self.stats.nodes += 1;
        let root_id = self.trace.as_ref().map(|tree| tree.root().id());
        let maximizing = side.is_maximizing();
        let mut alpha = NEG_INFINITY;
        let mut beta = INFINITY;
        let mut best: Option<ScoredMove> = None;

        for mv in board.legal_moves() {
            let child = board.apply_move(mv, side)?;
            let child_id = self.record(root_id, mv, side, 1);
            let value = self.search(child, side.opponent(), 1, alpha, beta, child_id);

            let improves = match best {
                None => true,
                Some(current) if maximizing => value > current.value,
                Some(current) => value < current.value,
            };
            if improves {
                best = Some(ScoredMove { mv, value });
            }

            if maximizing {
                alpha = alpha.max(value);
            } else {
                beta = beta.min(value);
            }
            if self.pruning && alpha >= beta {
                self.stats.cutoffs += 1;
                break;
            }
        }

        let best = best.ok_or(Error::NoMovesAvailable)?;
        self.annotate(root_id, best.value, false);
        Ok(best)
    }

    /// Returns the value of `board` with `side` on move, `ply` plies below
    /// the root. Fail-soft: a cut node returns the bound that caused the cut.
    fn search(
        &mut self,
        board: Board,
        side: Player,
        ply: u32,
        mut alpha: i32,
        mut beta: i32,
        node: Option<NodeId>,
    ) -> i32 {
        self.stats.nodes += 1;

        // depth counts the plies after the root candidate move
        if let Some(value) = score::terminal_score(board.outcome(), ply - 1, self.depth_scoring) {
            self.annotate(node, value, false);
            return value;
        }

        let maximizing = side.is_maximizing();
        let mut best = if maximizing { NEG_INFINITY } else { INFINITY };
        let mut cut = false;

        for mv in board.legal_moves() {
            let Ok(child) = board.apply_move(mv, side) else {
                continue;
            };
            let child_id = self.record(node, mv, side, ply + 1);
            let value = self.search(child, side.opponent(), ply + 1, alpha, beta, child_id);

            if maximizing {
                best = best.max(value);
                alpha = alpha.max(value);
            } else {
                best = best.min(value);
                beta = beta.min(value);
            }
            if self.pruning && alpha >= beta {
                self.stats.cutoffs += 1;
                cut = true;
                break;
            }
        }

        self.annotate(node, best, cut);
        best
    }

    fn record(
        &mut self,
        parent: Option<NodeId>,
        mv: Move,
        player: Player,
        ply: u32,
    ) -> Option<NodeId> {
        let tree = self.trace.as_mut()?;
        let mut parent = tree.get_mut(parent?)?;
        Some(parent.append(SearchNode::new(mv, player, ply)).id())
    }

    fn annotate(&mut self, node: Option<NodeId>, value: i32, cutoff: bool) {
        let (Some(tree), Some(id)) = (self.trace.as_mut(), node) else {
            return;
        };
        if let Some(mut entry) = tree.get_mut(id) {
            let data = entry.value();
            data.value = Some(value);
            data.cutoff = cutoff;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::CustomNumberGenerator;
    use crate::score::{LOSS_SCORE, WIN_SCORE};
    use crate::test_utils::open_position;
    use proptest::prelude::*;

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    fn engine() -> Engine<CustomNumberGenerator> {
        Engine::builder()
            .with_random_generator(CustomNumberGenerator::default())
            .build()
    }

    /// Textbook minimax with flat scores, kept independent of `Searcher`.
    fn reference_value(board: Board, side: Player) -> i32 {
        if let Some(value) = score::terminal_score(board.outcome(), 0, false) {
            return value;
        }
        let values = board.legal_moves().into_iter().map(|mv| {
            let child = board.apply_move(mv, side).unwrap();
            reference_value(child, side.opponent())
        });
        if side.is_maximizing() {
            values.max().unwrap()
        } else {
            values.min().unwrap()
        }
    }

    #[test]
    fn takes_immediate_win() {
        // arrange
        let b = board("OO.XX....");

        // act
        let best = engine().best_move(b, Player::O).unwrap();

        // assert
        assert_eq!(best, ScoredMove { mv: 2, value: WIN_SCORE });
        assert_eq!(best.expected_outcome(), Outcome::OWins);
    }

    #[test]
    fn blocks_immediate_threat() {
        let b = board("XX.O.....");

        let best = engine().best_move(b, Player::O).unwrap();

        assert_eq!(best.mv, 2);
        // X still forks after the block, three plies later
        assert_eq!(best.value, LOSS_SCORE + 3);
    }

    #[test]
    fn minimizing_side_takes_its_win() {
        let best = engine().best_move(board("XX.OO...."), Player::X).unwrap();
        assert_eq!(best, ScoredMove { mv: 2, value: LOSS_SCORE });
    }

    #[test]
    fn empty_board_is_a_draw() {
        let e = engine();
        let x = e.best_move(Board::new(), Player::X).unwrap();
        let o = e.best_move(Board::new(), Player::O).unwrap();

        assert_eq!(x, ScoredMove { mv: 0, value: DRAW_SCORE });
        assert_eq!(o, ScoredMove { mv: 0, value: DRAW_SCORE });
    }

    #[test]
    fn depth_scoring_prefers_faster_win() {
        // O wins at once on 7; blocking on 3 first also wins, two plies later
        let b = board("....XXO.O");
        let fast = engine().best_move(b, Player::O).unwrap();
        let flat = Engine::builder()
            .with_depth_scoring(false)
            .build()
            .best_move(b, Player::O)
            .unwrap();

        assert_eq!(fast, ScoredMove { mv: 7, value: WIN_SCORE });
        assert_eq!(flat, ScoredMove { mv: 3, value: WIN_SCORE });
    }

    #[test]
    fn terminal_board_is_rejected() {
        let e = engine();
        assert_eq!(
            e.best_move(board("XXXOO...."), Player::O),
            Err(Error::NoMovesAvailable)
        );
        assert_eq!(
            e.best_move(board("XOXXOOOXX"), Player::O),
            Err(Error::NoMovesAvailable)
        );
        assert_eq!(
            e.full_minimax(board("XXXOO...."), Player::O),
            Err(Error::NoMovesAvailable)
        );
    }

    #[test]
    fn pruning_visits_fewer_nodes() {
        let pruned = engine().analyze(Board::new(), Player::X).unwrap();
        let full = Engine::builder()
            .with_alpha_beta_pruning(false)
            .build()
            .analyze(Board::new(), Player::X)
            .unwrap();

        assert_eq!(pruned.best.value, full.best.value);
        assert_eq!(full.stats.nodes, 549_946);
        assert_eq!(full.stats.cutoffs, 0);
        assert!(pruned.stats.nodes < full.stats.nodes);
        assert!(pruned.stats.cutoffs > 0);
    }

    #[test]
    fn trace_mirrors_search() {
        // arrange
        let b = board("OO.XX....");
        let e = Engine::builder().with_trace(true).build();

        // act
        let analysis = e.analyze(b, Player::O).unwrap();

        // assert
        let tree = analysis.trace.unwrap();
        assert_eq!(tree.nodes().count() as u64, analysis.stats.nodes);
        let root = tree.root();
        assert!(root.value().is_root());
        assert_eq!(root.value().value, Some(WIN_SCORE));
        let first = root.first_child().unwrap().value();
        assert_eq!(first.mv, Some(2));
        assert_eq!(first.ply, 1);
        assert_eq!(first.value, Some(WIN_SCORE));
        assert!(tree.nodes().all(|n| n.value().value.is_some()));
        assert!(tree.nodes().any(|n| n.value().cutoff));
    }

    #[test]
    fn trace_is_off_by_default() {
        let analysis = engine().analyze(board("OO.XX...."), Player::O).unwrap();
        assert!(analysis.trace.is_none());
    }

    #[test]
    fn random_opening_on_empty_board() {
        // arrange
        let mut e = engine();
        let game = GameState::new(Player::O);

        // act
        let opening = e.choose_move(&game).unwrap();

        // assert
        assert_eq!(opening, ScoredMove { mv: 4, value: DRAW_SCORE });
    }

    #[test]
    fn disabled_random_opening_searches() {
        let mut e = Engine::builder().with_random_opening(false).build();
        let opening = e.choose_move(&GameState::new(Player::O)).unwrap();
        assert_eq!(opening, ScoredMove { mv: 0, value: DRAW_SCORE });
    }

    #[test]
    fn choose_move_after_opening_searches() {
        let mut e = engine();
        let mut game = GameState::default();
        game.play(0).unwrap();
        game.play(4).unwrap();
        game.play(1).unwrap();

        let reply = e.choose_move(&game).unwrap();

        assert_eq!(reply.mv, 2);
        assert_eq!(reply, e.best_move(*game.board(), Player::O).unwrap());
    }

    #[test]
    fn choose_move_on_finished_game() {
        let mut game = GameState::default();
        for mv in [0, 3, 1, 4, 2] {
            game.play(mv).unwrap();
        }
        assert_eq!(engine().choose_move(&game), Err(Error::NoMovesAvailable));
    }

    #[test]
    fn free_function_matches_engine() {
        let b = board("X...O...X");
        assert_eq!(best_move(b, Player::O), engine().best_move(b, Player::O));
    }

    #[test]
    fn config_serializes() {
        let config = EngineConfig {
            trace: true,
            ..EngineConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
        assert_eq!(
            Engine::builder().with_config(config).build().config(),
            &config
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn best_move_is_legal((b, side) in open_position()) {
            let best = engine().best_move(b, side).unwrap();
            prop_assert!(b.legal_moves().contains(&best.mv));
        }

        #[test]
        fn best_move_is_deterministic((b, side) in open_position()) {
            let e = engine();
            prop_assert_eq!(e.best_move(b, side), e.best_move(b, side));
        }

        #[test]
        fn pruned_and_full_search_agree((b, side) in open_position()) {
            for depth_scoring in [true, false] {
                let e = Engine::builder().with_depth_scoring(depth_scoring).build();
                let pruned = e.best_move(b, side).unwrap();
                let full = e.full_minimax(b, side).unwrap();
                prop_assert_eq!(pruned.value, full.value);
                prop_assert_eq!(pruned.mv, full.mv);
            }
        }

        #[test]
        fn flat_value_matches_reference((b, side) in open_position()) {
            let e = Engine::builder().with_depth_scoring(false).build();
            prop_assert_eq!(e.best_move(b, side).unwrap().value, reference_value(b, side));
        }
    }
}
