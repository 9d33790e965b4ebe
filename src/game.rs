//! Two-player, turn-based game abstraction.
//!
//! The search in [`crate::mcts`] and the rollouts in [`crate::playout`] only
//! talk to a game through the [`Game`] trait, so other games can be plugged in
//! without touching the engine.

use std::fmt::{self, Debug, Display};
use std::hash::Hash;

/// One of the two players. `One` always moves first.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub const BOTH: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];

    pub fn other(self) -> PlayerId {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    pub fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }
}

impl Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerId::One => write!(f, "one"),
            PlayerId::Two => write!(f, "two"),
        }
    }
}

/// The final result of a game.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Outcome {
    WonBy(PlayerId),
    Draw,
}

/// A move of some game. Only needs to be comparable and printable.
pub trait Move: Clone + Debug + Display + Eq + Hash {}

/// The state of a two-player game.
///
/// Cloning must produce a fully independent copy: playing a move on a clone
/// never affects the original.
pub trait Game: Clone + Debug + Display {
    type Move: Move;

    /// All legal moves for the player to move, in a deterministic order.
    /// Empty when that player cannot move.
    fn possible_moves(&self) -> Vec<Self::Move>;

    /// Play `mv`, which must be one of [`Game::possible_moves`].
    /// Playing anything else is a logic error and panics in debug builds.
    fn play(&mut self, mv: &Self::Move);

    /// The player to move.
    fn player(&self) -> PlayerId;

    /// The outcome decided by the rules of the game alone, `None` while the game continues.
    ///
    /// This does not detect a player who is stuck without legal moves, see [`Game::outcome`].
    fn winner(&self) -> Option<Outcome>;

    /// Like [`Game::winner`], but also scores a player without legal moves as the loser.
    fn outcome(&self) -> Option<Outcome> {
        self.winner().or_else(|| {
            self.possible_moves()
                .is_empty()
                .then(|| Outcome::WonBy(self.player().other()))
        })
    }

    /// Human readable name of a player.
    fn player_name(&self, player: PlayerId) -> String {
        format!("Player {player}")
    }

    /// Human readable view of the whole state.
    fn view(&self) -> String {
        format!("{self}\n")
    }

    fn clone_and_play(&self, mv: &Self::Move) -> Self {
        let mut next = self.clone();
        next.play(mv);
        next
    }
}
