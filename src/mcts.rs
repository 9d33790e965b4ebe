//! Monte Carlo Tree Search (MCTS) with UCT selection.
//!
//! Each iteration of the search:
//! - descends from the root to a leaf, picking the child with the best UCT score
//! - expands the leaf with one child per legal move
//! - runs random playouts from the leaf
//! - adds the playout results to every node on the path
//!
//! Win credit is always counted for the player to move at the root. When the
//! player choosing at a node is the other one, selection scores children by
//! their loss rate instead.

use std::time::{Duration, Instant};

use log::{debug, info};

use crate::constants::{ROLLOUTS_PER_LEAF, UCT_EXPLORATION};
use crate::game::{Game, PlayerId};
use crate::playout::{roll_out, RolloutResults};

/// A node in the MCTS search tree.
pub struct EvalNode<G: Game> {
    /// The game state at this node
    pub game: G,
    /// The move leading from the parent to this node, `None` for the root
    pub mv: Option<G::Move>,
    /// Number of playouts run through this node
    pub n: u32,
    /// Win credit of the root player (a draw counts half)
    pub w: f64,
    /// One child per legal move, in the order of `possible_moves`
    pub children: Vec<EvalNode<G>>,
}

impl<G: Game> EvalNode<G> {
    pub fn new(game: G) -> Self {
        Self {
            game,
            mv: None,
            n: 0,
            w: 0.0,
            children: Vec::new(),
        }
    }

    fn child(game: G, mv: G::Move) -> Self {
        Self {
            mv: Some(mv),
            ..Self::new(game)
        }
    }

    /// Estimated probability of a root player win, `None` while unvisited.
    #[inline]
    pub fn score(&self) -> Option<f64> {
        (self.n > 0).then(|| self.w / self.n as f64)
    }

    /// Add playout results, crediting wins of `reference`.
    pub fn update_stats(&mut self, results: &RolloutResults, reference: PlayerId) {
        self.n += results.nb_simulations();
        self.w += results.nb_wins(reference);
    }

    /// Number of nodes in this subtree.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(EvalNode::size).sum::<usize>()
    }
}

/// UCT score of a visited `child` of a node visited `parent_n` times.
///
/// `for_reference` tells whether the player choosing between the children is
/// the root player; if not, the child's loss rate is used as exploitation term.
fn uct<G: Game>(child: &EvalNode<G>, parent_n: u32, for_reference: bool) -> f64 {
    debug_assert!(child.n > 0, "UCT of an unvisited node");
    let n = child.n as f64;
    let wins = if for_reference { child.w } else { n - child.w };
    wins / n + UCT_EXPLORATION * ((parent_n as f64).ln() / n).sqrt()
}

/// Select the child to descend into. Unvisited children always come first.
fn most_urgent<G: Game>(node: &EvalNode<G>, reference: PlayerId) -> usize {
    if let Some(unvisited) = node.children.iter().position(|c| c.n == 0) {
        return unvisited;
    }
    let for_reference = node.game.player() == reference;
    node.children
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| {
            uct(a, node.n, for_reference)
                .partial_cmp(&uct(b, node.n, for_reference))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Descend through the tree to a leaf, returning the child indices taken.
fn tree_descend<G: Game>(root: &EvalNode<G>, reference: PlayerId) -> Vec<usize> {
    let mut path = Vec::new();
    let mut node = root;
    while !node.children.is_empty() {
        let idx = most_urgent(node, reference);
        path.push(idx);
        node = &node.children[idx];
    }
    path
}

/// Add `results` to the root and to every node on `path`.
fn tree_update<G: Game>(
    root: &mut EvalNode<G>,
    path: &[usize],
    results: &RolloutResults,
    reference: PlayerId,
) {
    root.update_stats(results, reference);
    let mut node = root;
    for &idx in path {
        node = &mut node.children[idx];
        node.update_stats(results, reference);
    }
}

/// Expand a leaf with one child per legal move.
fn expand<G: Game>(node: &mut EvalNode<G>) {
    debug_assert!(node.children.is_empty());
    node.children = node
        .game
        .possible_moves()
        .into_iter()
        .map(|mv| EvalNode::child(node.game.clone_and_play(&mv), mv))
        .collect();
}

/// How long a search may run.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SearchBudget {
    /// Wall-clock time in milliseconds
    Time(u64),
    /// Number of tree iterations
    Iterations(usize),
}

/// Monte Carlo tree search over any [`Game`].
pub struct MonteCarloTreeSearch<G: Game> {
    root: EvalNode<G>,
    /// Player to move at the root, all win credit is counted for this player
    reference: PlayerId,
    rollouts_per_leaf: u32,
    /// Total number of playouts
    total_simulations: u64,
    rng: fastrand::Rng,
}

impl<G: Game> MonteCarloTreeSearch<G> {
    pub fn new(game: G) -> Self {
        Self::with_rng(game, fastrand::Rng::new())
    }

    /// A search with a seeded random generator, for reproducible results.
    pub fn with_seed(game: G, seed: u64) -> Self {
        Self::with_rng(game, fastrand::Rng::with_seed(seed))
    }

    fn with_rng(game: G, rng: fastrand::Rng) -> Self {
        Self {
            reference: game.player(),
            root: EvalNode::new(game),
            rollouts_per_leaf: ROLLOUTS_PER_LEAF,
            total_simulations: 0,
            rng,
        }
    }

    /// Number of playouts run from each selected leaf. Must be at least 1.
    pub fn with_rollouts_per_leaf(mut self, rollouts: u32) -> Self {
        assert!(rollouts > 0, "at least one rollout per leaf is needed");
        self.rollouts_per_leaf = rollouts;
        self
    }

    pub fn root(&self) -> &EvalNode<G> {
        &self.root
    }

    pub fn total_simulations(&self) -> u64 {
        self.total_simulations
    }

    /// Perform one iteration: selection, expansion, simulation and backpropagation.
    ///
    /// Returns `true` when there is nothing left to explore, i.e. the root
    /// position is over.
    pub fn evaluate_tree_once(&mut self) -> bool {
        let path = tree_descend(&self.root, self.reference);
        let leaf = path
            .iter()
            .fold(&mut self.root, |node, &idx| &mut node.children[idx]);

        // A finished game is not expanded, its playouts return immediately
        if leaf.game.winner().is_none() {
            expand(leaf);
        }
        let root_is_over = path.is_empty() && leaf.children.is_empty();

        let results = roll_out(&leaf.game, self.rollouts_per_leaf, &mut self.rng);
        tree_update(&mut self.root, &path, &results, self.reference);
        self.total_simulations += results.nb_simulations() as u64;

        if root_is_over {
            debug!("root position is over, nothing to explore");
        }
        root_is_over
    }

    /// Run iterations until `time_limit_ms` milliseconds have elapsed or the
    /// root position is over. Returns the number of iterations.
    pub fn evaluate_tree_with_time_limit(&mut self, time_limit_ms: u64) -> usize {
        let start = Instant::now();
        let limit = Duration::from_millis(time_limit_ms);
        let mut iterations = 0;

        while start.elapsed() < limit {
            iterations += 1;
            if self.evaluate_tree_once() {
                break;
            }
        }

        info!(
            "Stopped search after {} ms and {iterations} iterations. Root stats is {:.1}/{} ({})",
            start.elapsed().as_millis(),
            self.root.w,
            self.root.n,
            self.root
                .score()
                .map_or("no playouts".to_string(), |s| format!("{:.2}% win", 100.0 * s)),
        );
        iterations
    }

    /// Run at most `max_iterations` iterations. Returns the number actually run.
    pub fn evaluate_tree_with_iterations(&mut self, max_iterations: usize) -> usize {
        for i in 0..max_iterations {
            if self.evaluate_tree_once() {
                return i + 1;
            }
        }
        max_iterations
    }

    pub fn evaluate(&mut self, budget: SearchBudget) -> usize {
        match budget {
            SearchBudget::Time(ms) => self.evaluate_tree_with_time_limit(ms),
            SearchBudget::Iterations(n) => self.evaluate_tree_with_iterations(n),
        }
    }

    /// The best move found so far: the visited root child with the best win
    /// rate, ties broken by visit count.
    ///
    /// Falls back to the first legal move when no child has been visited yet,
    /// and returns `None` only when the root player has no legal move.
    pub fn best_move(&self) -> Option<G::Move> {
        let best = self
            .root
            .children
            .iter()
            .filter_map(|c| c.score().map(|s| (s, c.n, c)))
            .max_by(|(sa, na, _), (sb, nb, _)| {
                sa.partial_cmp(sb)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(na.cmp(nb))
            })
            .and_then(|(_, _, c)| c.mv.clone());

        best.or_else(|| self.root.game.possible_moves().into_iter().next())
    }

    /// Per-move statistics of the root children.
    pub fn stats(&self) -> String {
        let mut out = format!("MCTS with {} evals\n", self.total_simulations);
        for child in &self.root.children {
            let Some(mv) = &child.mv else { continue };
            let score = child
                .score()
                .map_or("n/a".to_string(), |s| format!("{s:.3}"));
            out.push_str(&format!("{mv} : {score} ({:.1}/{})\n", child.w, child.n));
        }
        out
    }
}
