//! Constants for board geometry, game rules and engine parameters.
//!
//! The board size is a runtime parameter (see [`crate::board::CheckerBoard::new`]);
//! the values here are the defaults used by the binary and by
//! [`crate::draughts::EnglishDraughts::default`].

// =============================================================================
// Board Geometry
// =============================================================================

/// Default board size (NxN). English draughts is played on 8x8.
pub const DEFAULT_BOARD_SIZE: usize = 8;

/// Smallest board that leaves an empty row between the two armies.
pub const MIN_BOARD_SIZE: usize = 4;

// =============================================================================
// Game Rules
// =============================================================================

/// Number of consecutive king-only moves without capture that ends the game in a draw.
pub const DRAW_KING_MOVES: u32 = 25;

// =============================================================================
// MCTS (Monte Carlo Tree Search) Parameters
// =============================================================================

/// UCT exploration constant `c = 1/sqrt(2)`.
pub const UCT_EXPLORATION: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// Number of rollouts run from each selected leaf.
pub const ROLLOUTS_PER_LEAF: u32 = 1;

/// Default thinking time per move in milliseconds.
pub const DEFAULT_TIME_LIMIT_MS: u64 = 1000;

/// Maximum number of plies in a single rollout. Reaching it scores a draw.
pub const MAX_ROLLOUT_TURNS: u32 = 1000;
