//! Draughts-MCTS: English draughts with a Monte Carlo Tree Search player.
//!
//! ## Modules
//!
//! - [`constants`] - Board defaults and engine parameters
//! - [`board`] - Checkerboard topology and occupancy
//! - [`game`] - Generic two-player game abstraction
//! - [`draughts`] - English draughts rules (move generation, captures, promotion)
//! - [`playout`] - Random game simulation for position evaluation
//! - [`mcts`] - Monte Carlo Tree Search with UCT
//! - [`player`] - Random, MCTS and human players
//! - [`session`] - Text protocol to play against the engine
//! - [`error`] - Error types
//!
//! ## Example
//!
//! ```
//! use draughts_mcts::draughts::{EnglishDraughts, parse_move};
//! use draughts_mcts::game::Game;
//! use draughts_mcts::mcts::MonteCarloTreeSearch;
//!
//! // Create a new game and play a move
//! let mut game = EnglishDraughts::default();
//! game.play(&parse_move("22-18").unwrap());
//!
//! // Run MCTS to find the best response
//! let mut mcts = MonteCarloTreeSearch::new(game);
//! mcts.evaluate_tree_with_iterations(100);
//! println!("Best move: {}", mcts.best_move().unwrap());
//! ```

pub mod board;
pub mod constants;
pub mod draughts;
pub mod error;
pub mod game;
pub mod mcts;
pub mod player;
pub mod playout;
pub mod session;
