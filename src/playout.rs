//! Monte Carlo playouts (random game simulation).
//!
//! A playout plays uniformly random legal moves for both sides until the game
//! ends. A player left without legal moves loses on the spot, and a playout
//! that runs longer than [`MAX_ROLLOUT_TURNS`] plies is scored as a draw.

use crate::constants::MAX_ROLLOUT_TURNS;
use crate::game::{Game, Outcome, PlayerId};

/// Aggregated results of a batch of playouts.
///
/// A draw counts as half a win for each player.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RolloutResults {
    /// Wins of [`PlayerId::One`]
    pub win1: f64,
    /// Wins of [`PlayerId::Two`]
    pub win2: f64,
    /// Number of playouts
    pub n: u32,
}

impl RolloutResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one playout.
    pub fn update(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::WonBy(PlayerId::One) => self.win1 += 1.0,
            Outcome::WonBy(PlayerId::Two) => self.win2 += 1.0,
            Outcome::Draw => {
                self.win1 += 0.5;
                self.win2 += 0.5;
            }
        }
        self.n += 1;
    }

    /// Merge `other` into these results.
    pub fn add(&mut self, other: &RolloutResults) {
        self.win1 += other.win1;
        self.win2 += other.win2;
        self.n += other.n;
    }

    pub fn nb_wins(&self, player: PlayerId) -> f64 {
        match player {
            PlayerId::One => self.win1,
            PlayerId::Two => self.win2,
        }
    }

    pub fn nb_simulations(&self) -> u32 {
        self.n
    }
}

/// Pick a move uniformly at random, `None` if there is none.
pub fn random_move<'a, M>(rng: &mut fastrand::Rng, moves: &'a [M]) -> Option<&'a M> {
    if moves.is_empty() {
        return None;
    }
    moves.get(rng.usize(..moves.len()))
}

/// Play random moves until the game is over and return its outcome.
///
/// `game` holds the final position when this returns.
pub fn play_randomly_to_end<G: Game>(game: &mut G, rng: &mut fastrand::Rng) -> Outcome {
    for _ in 0..MAX_ROLLOUT_TURNS {
        if let Some(outcome) = game.winner() {
            return outcome;
        }
        let moves = game.possible_moves();
        match random_move(rng, &moves) {
            Some(mv) => game.play(mv),
            None => return Outcome::WonBy(game.player().other()),
        }
    }
    game.winner().unwrap_or(Outcome::Draw)
}

/// Run `nb_runs` playouts, each from a fresh copy of `game`.
pub fn roll_out<G: Game>(game: &G, nb_runs: u32, rng: &mut fastrand::Rng) -> RolloutResults {
    let mut results = RolloutResults::new();
    for _ in 0..nb_runs {
        results.update(play_randomly_to_end(&mut game.clone(), rng));
    }
    results
}
