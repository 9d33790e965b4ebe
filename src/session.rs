//! Line-oriented text protocol for playing against the engine.
//!
//! The protocol follows the shape of GTP: every command may be prefixed by a
//! numeric id, successful replies start with `=` and failures with `?`, and
//! each reply is followed by an empty line.
//!
//! ## Supported Commands
//!
//! - `name`, `version` - Engine identification
//! - `list_commands` - List all supported commands
//! - `known_command <cmd>` - Check if a command is supported
//! - `quit` - Exit the session
//! - `boardsize <size>` - Start a new game on a `size`x`size` board
//! - `clear_board` - Start a new game on the current board size
//! - `time_limit <ms>` - Set the thinking time per engine move
//! - `moves` - List the legal moves of the player to move
//! - `play <move>` - Play a move such as `22-18` or `22x15x6`
//! - `genmove` - Let the engine search and play a move
//! - `showboard` - Show the board and whose turn it is
//! - `winner` - `white`, `black`, `draw` or `none`
//! - `stats` - Root statistics of the last engine search

use std::io::{BufRead, Write};

use anyhow::Result;
use log::debug;

use crate::constants::{DEFAULT_BOARD_SIZE, DEFAULT_TIME_LIMIT_MS};
use crate::draughts::{parse_move, EnglishDraughts};
use crate::error::Error;
use crate::game::{Game, Outcome, PlayerId};
use crate::mcts::SearchBudget;
use crate::player::{MctsPlayer, Player};

/// The list of known commands.
const KNOWN_COMMANDS: &[&str] = &[
    "boardsize",
    "clear_board",
    "genmove",
    "known_command",
    "list_commands",
    "moves",
    "name",
    "play",
    "quit",
    "showboard",
    "stats",
    "time_limit",
    "version",
    "winner",
];

/// Session state.
pub struct Session {
    /// Current game
    game: EnglishDraughts,
    /// Engine used for `genmove`
    engine: MctsPlayer,
    budget: SearchBudget,
    seed: Option<u64>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_budget(SearchBudget::Time(DEFAULT_TIME_LIMIT_MS), None)
    }

    /// A session whose engine searches with `budget`, seeded when `seed` is given.
    pub fn with_budget(budget: SearchBudget, seed: Option<u64>) -> Self {
        Self {
            game: EnglishDraughts::new(DEFAULT_BOARD_SIZE),
            engine: Self::make_engine(budget, seed),
            budget,
            seed,
        }
    }

    fn make_engine(budget: SearchBudget, seed: Option<u64>) -> MctsPlayer {
        match seed {
            Some(seed) => MctsPlayer::with_seed(budget, seed),
            None => MctsPlayer::new(budget),
        }
    }

    pub fn game(&self) -> &EnglishDraughts {
        &self.game
    }

    /// Run the command loop until `quit` or end of input.
    pub fn run(&mut self, input: impl BufRead, mut output: impl Write) -> Result<()> {
        for line in input.lines() {
            let line = line?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }

            let command = parts[0].to_lowercase();
            let args = &parts[1..];
            debug!("session command: {command} {args:?}");

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            writeln!(output, "{prefix}{id_str} {message}\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command id from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end == 0 {
            return (None, trimmed);
        }
        match trimmed[..end].parse::<u32>() {
            Ok(id) => (Some(id), trimmed[end..].trim()),
            Err(_) => (None, trimmed),
        }
    }

    fn outcome_name(outcome: Option<Outcome>) -> &'static str {
        match outcome {
            Some(Outcome::WonBy(PlayerId::One)) => "white",
            Some(Outcome::WonBy(PlayerId::Two)) => "black",
            Some(Outcome::Draw) => "draw",
            None => "none",
        }
    }

    fn new_game(&mut self, size: usize) -> (bool, String) {
        match EnglishDraughts::try_new(size) {
            Ok(game) => {
                self.game = game;
                (true, String::new())
            }
            Err(e) => (false, e.to_string()),
        }
    }

    /// Parse and play a move given in draughts notation.
    fn play_notation(&mut self, notation: &str) -> Result<(), Error> {
        if self.game.outcome().is_some() {
            return Err(Error::GameOver);
        }
        let mv = parse_move(notation)?;
        self.game.try_play(&mv)?;
        Ok(())
    }

    /// Execute a command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let Some(cmd) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                (true, known.to_string())
            }

            "quit" => (true, String::new()),

            "boardsize" => match args.first().map(|a| a.parse::<usize>()) {
                None => (false, "missing argument".to_string()),
                Some(Ok(size)) => self.new_game(size),
                Some(Err(_)) => (false, "invalid size".to_string()),
            },

            "clear_board" => self.new_game(self.game.board().size()),

            "time_limit" => match args.first().map(|a| a.parse::<u64>()) {
                None => (false, "missing argument".to_string()),
                Some(Ok(ms)) => {
                    self.budget = SearchBudget::Time(ms);
                    self.engine = Self::make_engine(self.budget, self.seed);
                    (true, String::new())
                }
                Some(Err(_)) => (false, "invalid time".to_string()),
            },

            "moves" => {
                let moves: Vec<String> = self
                    .game
                    .possible_moves()
                    .iter()
                    .map(|m| m.to_string())
                    .collect();
                (true, moves.join(" "))
            }

            "play" => {
                let Some(notation) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                match self.play_notation(notation) {
                    Ok(()) => (true, String::new()),
                    Err(e) => (false, e.to_string()),
                }
            }

            "genmove" => {
                if self.game.outcome().is_some() {
                    return (false, Error::GameOver.to_string());
                }
                match self.engine.select_move(&self.game) {
                    Some(mv) => {
                        self.game.play(&mv);
                        (true, mv.to_string())
                    }
                    None => (true, "resign".to_string()),
                }
            }

            "showboard" => (true, format!("\n{}", self.game.view().trim_end())),

            "winner" => (true, Self::outcome_name(self.game.outcome()).to_string()),

            "stats" => match self.engine.last_stats() {
                Some(stats) => (true, stats.trim_end().to_string()),
                None => (false, "no search yet".to_string()),
            },

            _ => (false, format!("unknown command: {command}")),
        }
    }
}
