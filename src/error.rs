//! Error types for the draughts engine.

use thiserror::Error;

use crate::game::PlayerId;

/// A move was played that is not in the current list of legal moves.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid move {mv} for player {player}")]
pub struct InvalidMoveError {
    pub mv: String,
    pub player: PlayerId,
}

/// Main error type of the crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    InvalidMove(#[from] InvalidMoveError),

    #[error("invalid board size {size}: must be even and at least {min}")]
    InvalidBoardSize { size: usize, min: usize },

    #[error("invalid move notation '{input}': {reason}")]
    InvalidNotation { input: String, reason: &'static str },

    #[error("game already over")]
    GameOver,
}
