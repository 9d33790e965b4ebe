//! Draughts-MCTS: English draughts against a Monte Carlo Tree Search engine.
//!
//! ## Usage
//!
//! - `draughts-mcts` - Show a demo
//! - `draughts-mcts play` - Play against the engine on the terminal
//! - `draughts-mcts selfplay` - Watch the engine play against itself
//! - `draughts-mcts session` - Start the text protocol on stdin/stdout

use std::io;

use anyhow::{ensure, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;

use draughts_mcts::board::CheckerBoard;
use draughts_mcts::constants::{DEFAULT_BOARD_SIZE, DEFAULT_TIME_LIMIT_MS, MIN_BOARD_SIZE, ROLLOUTS_PER_LEAF};
use draughts_mcts::draughts::{DraughtsMove, EnglishDraughts};
use draughts_mcts::game::{Game, Outcome, PlayerId};
use draughts_mcts::mcts::{MonteCarloTreeSearch, SearchBudget};
use draughts_mcts::player::{play_match, HumanPlayer, MctsPlayer, Player, RandomPlayer};
use draughts_mcts::session::Session;

/// Draughts-MCTS: English draughts with a Monte Carlo Tree Search engine
#[derive(Parser)]
#[command(name = "draughts-mcts")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Board size (even, at least 4)
    #[arg(long, default_value_t = DEFAULT_BOARD_SIZE)]
    size: usize,

    /// Thinking time per engine move in milliseconds
    #[arg(long, short, default_value_t = DEFAULT_TIME_LIMIT_MS)]
    time: u64,

    /// Random playouts per expanded leaf
    #[arg(long, default_value_t = ROLLOUTS_PER_LEAF)]
    rollouts: u32,

    /// Seed for reproducible searches
    #[arg(long)]
    seed: Option<u64>,

    /// Log search details to stderr
    #[arg(long, short)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play against the engine, entering moves such as 22-18 or 22x15x6
    Play {
        /// The side you play
        #[arg(long, value_enum, default_value_t = Side::White)]
        side: Side,
    },
    /// Let the engine play a full game against itself
    Selfplay {
        /// Play against a uniformly random opponent instead
        #[arg(long)]
        random_opponent: bool,
    },
    /// Start the text protocol on stdin/stdout
    Session,
    /// Run a short search from the start position
    Demo,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Side {
    White,
    Black,
}

impl From<Side> for PlayerId {
    fn from(side: Side) -> Self {
        match side {
            Side::White => PlayerId::One,
            Side::Black => PlayerId::Two,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    simple_logging::log_to_stderr(level);

    ensure!(
        CheckerBoard::is_valid_size(cli.size),
        "board size must be even and at least {MIN_BOARD_SIZE}, got {}",
        cli.size
    );
    ensure!(cli.rollouts > 0, "at least one rollout per leaf is needed");

    match cli.command {
        Some(Commands::Play { side }) => run_play(&cli, side.into()),
        Some(Commands::Selfplay { random_opponent }) => run_selfplay(&cli, random_opponent),
        Some(Commands::Session) => {
            let mut session = Session::with_budget(SearchBudget::Time(cli.time), cli.seed);
            session.run(io::stdin().lock(), io::stdout())
        }
        Some(Commands::Demo) | None => run_demo(&cli),
    }
}

fn engine(cli: &Cli) -> MctsPlayer {
    let budget = SearchBudget::Time(cli.time);
    match cli.seed {
        Some(seed) => MctsPlayer::with_seed(budget, seed),
        None => MctsPlayer::new(budget),
    }
    .with_rollouts_per_leaf(cli.rollouts)
}

fn print_outcome(game: &EnglishDraughts, outcome: Outcome) {
    match outcome {
        Outcome::WonBy(p) => println!("{} wins!", game.player_name(p)),
        Outcome::Draw => println!("Draw."),
    }
}

/// A player that prints the engine statistics after each of its moves.
struct Verbose(MctsPlayer);

impl Player<EnglishDraughts> for Verbose {
    fn select_move(&mut self, game: &EnglishDraughts) -> Option<DraughtsMove> {
        let mv = self.0.select_move(game);
        if let Some(stats) = self.0.last_stats() {
            print!("{stats}");
        }
        mv
    }
}

fn run_play(cli: &Cli, human_side: PlayerId) -> Result<()> {
    let game = EnglishDraughts::new(cli.size);
    print!("{}", game.view());

    let stdin = io::stdin();
    let mut human = HumanPlayer::new(stdin.lock(), io::stdout());
    let mut ai = Verbose(engine(cli));
    let players: [&mut dyn Player<EnglishDraughts>; 2] = match human_side {
        PlayerId::One => [&mut human, &mut ai],
        PlayerId::Two => [&mut ai, &mut human],
    };

    let outcome = play_match(game.clone(), players, |state, mv| {
        println!("Played {mv}");
        print!("{}", state.view());
    });
    print_outcome(&game, outcome);
    Ok(())
}

fn run_selfplay(cli: &Cli, random_opponent: bool) -> Result<()> {
    let game = EnglishDraughts::new(cli.size);
    print!("{}", game.view());

    let mut one = Verbose(engine(cli));
    let mut two: Box<dyn Player<EnglishDraughts>> = if random_opponent {
        Box::new(match cli.seed {
            Some(seed) => RandomPlayer::with_seed(seed.wrapping_add(1)),
            None => RandomPlayer::new(),
        })
    } else {
        Box::new(Verbose(engine(cli)))
    };
    let players: [&mut dyn Player<EnglishDraughts>; 2] = [&mut one, two.as_mut()];

    let outcome = play_match(game.clone(), players, |state, mv| {
        println!("Played {mv}");
        print!("{}", state.view());
    });
    print_outcome(&game, outcome);
    Ok(())
}

fn run_demo(cli: &Cli) -> Result<()> {
    println!("Draughts-MCTS: English draughts with Monte Carlo Tree Search\n");

    let game = EnglishDraughts::new(cli.size);
    print!("{}", game.view());

    let mut mcts = match cli.seed {
        Some(seed) => MonteCarloTreeSearch::with_seed(game, seed),
        None => MonteCarloTreeSearch::new(game),
    }
    .with_rollouts_per_leaf(cli.rollouts);

    println!("Searching for {} ms...", cli.time);
    mcts.evaluate_tree_with_time_limit(cli.time);
    print!("{}", mcts.stats());
    if let Some(mv) = mcts.best_move() {
        println!("Best move: {mv}");
    }
    Ok(())
}
