//! Players that pick moves for one side of a [`Game`].

use std::io::{self, BufRead, Write};

use log::debug;

use crate::draughts::{parse_move, DraughtsMove, EnglishDraughts};
use crate::game::{Game, Outcome};
use crate::mcts::{MonteCarloTreeSearch, SearchBudget};
use crate::playout::random_move;

/// Something that chooses moves.
pub trait Player<G: Game> {
    /// Choose a move for the player to move in `game`. `None` means the
    /// player has no move or gives up.
    fn select_move(&mut self, game: &G) -> Option<G::Move>;
}

/// Plays uniformly random legal moves.
pub struct RandomPlayer {
    rng: fastrand::Rng,
}

impl RandomPlayer {
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl Default for RandomPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Game> Player<G> for RandomPlayer {
    fn select_move(&mut self, game: &G) -> Option<G::Move> {
        random_move(&mut self.rng, &game.possible_moves()).cloned()
    }
}

/// Runs a fresh tree search for every move.
pub struct MctsPlayer {
    budget: SearchBudget,
    rollouts_per_leaf: u32,
    rng: fastrand::Rng,
    last_stats: Option<String>,
}

impl MctsPlayer {
    pub fn new(budget: SearchBudget) -> Self {
        Self::with_seed(budget, fastrand::u64(..))
    }

    pub fn with_seed(budget: SearchBudget, seed: u64) -> Self {
        Self {
            budget,
            rollouts_per_leaf: crate::constants::ROLLOUTS_PER_LEAF,
            rng: fastrand::Rng::with_seed(seed),
            last_stats: None,
        }
    }

    pub fn with_rollouts_per_leaf(mut self, rollouts: u32) -> Self {
        self.rollouts_per_leaf = rollouts;
        self
    }

    /// Root statistics of the last search.
    pub fn last_stats(&self) -> Option<&str> {
        self.last_stats.as_deref()
    }
}

impl<G: Game> Player<G> for MctsPlayer {
    fn select_move(&mut self, game: &G) -> Option<G::Move> {
        let mut mcts = MonteCarloTreeSearch::with_seed(game.clone(), self.rng.u64(..))
            .with_rollouts_per_leaf(self.rollouts_per_leaf);
        let iterations = mcts.evaluate(self.budget);
        let mv = mcts.best_move();
        debug!(
            "searched {iterations} iterations, best move {}",
            mv.as_ref().map_or("none".to_string(), |m| m.to_string())
        );
        self.last_stats = Some(mcts.stats());
        mv
    }
}

/// Reads draughts moves from a text input, re-asking until a legal move is given.
pub struct HumanPlayer<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> HumanPlayer<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Show the legal moves and read one line. `None` at end of input.
    fn prompt(&mut self, listing: &str) -> io::Result<Option<String>> {
        writeln!(self.output, "Possible moves: {listing}")?;
        write!(self.output, "Your move? ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl<R: BufRead, W: Write> Player<EnglishDraughts> for HumanPlayer<R, W> {
    /// Gives up (`None`) when there is no legal move, at end of input, on
    /// `resign`, or when the terminal cannot be read or written.
    fn select_move(&mut self, game: &EnglishDraughts) -> Option<DraughtsMove> {
        let moves = game.possible_moves();
        if moves.is_empty() {
            return None;
        }
        let listing = moves
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(" ");

        loop {
            let line = match self.prompt(&listing) {
                Ok(Some(line)) => line,
                Ok(None) => {
                    debug!("end of input, {} resigns", game.player());
                    return None;
                }
                Err(e) => {
                    debug!("terminal I/O failed, giving up: {e}");
                    return None;
                }
            };
            if line == "resign" {
                return None;
            }

            let reply = match parse_move(&line) {
                Ok(mv) => match moves.iter().find(|&m| *m == mv) {
                    Some(legal) => return Some(legal.clone()),
                    None => writeln!(self.output, "Illegal move: {mv}"),
                },
                Err(e) => writeln!(self.output, "{e}"),
            };
            if let Err(e) = reply {
                debug!("terminal I/O failed, giving up: {e}");
                return None;
            }
        }
    }
}

/// Play a game to the end. `players[0]` plays for [`crate::game::PlayerId::One`].
///
/// `on_move` is called after every move with the new state. A player left
/// without legal moves loses before being asked, and a player who returns
/// no move loses as well.
pub fn play_match<G: Game>(
    mut game: G,
    mut players: [&mut dyn Player<G>; 2],
    mut on_move: impl FnMut(&G, &G::Move),
) -> Outcome {
    loop {
        if let Some(outcome) = game.outcome() {
            return outcome;
        }
        let current = game.player();
        let Some(mv) = players[current.index()].select_move(&game) else {
            return Outcome::WonBy(current.other());
        };
        game.play(&mv);
        on_move(&game, &mv);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, CheckerBoard};
    use crate::game::PlayerId;

    #[test]
    fn test_random_player_is_legal() {
        let game = EnglishDraughts::default();
        let mut player = RandomPlayer::with_seed(1);
        for _ in 0..10 {
            let mv = player.select_move(&game).unwrap();
            assert!(game.possible_moves().contains(&mv));
        }
    }

    #[test]
    fn test_human_player_retries() {
        let game = EnglishDraughts::default();
        let input = "hello\n22-26\n22-18\n".as_bytes();
        let mut output = Vec::new();
        let mv = HumanPlayer::new(input, &mut output).select_move(&game);
        assert_eq!(mv.unwrap().to_string(), "22-18");

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Illegal move: 22-26"));
        assert!(text.contains("invalid move notation 'hello'"));
        assert_eq!(text.matches("Your move?").count(), 3);
    }

    #[test]
    fn test_human_player_end_of_input() {
        let game = EnglishDraughts::default();
        let mut player = HumanPlayer::new("".as_bytes(), Vec::new());
        assert!(player.select_move(&game).is_none());
        let mut player = HumanPlayer::new("resign\n".as_bytes(), Vec::new());
        assert!(player.select_move(&game).is_none());
    }

    #[test]
    fn test_blocked_human_loses_without_prompt() {
        // White's only man on 5 is stuck behind the black man on 1
        let mut board = CheckerBoard::empty(8);
        board.set(5, Cell::Man(PlayerId::One));
        board.set(1, Cell::Man(PlayerId::Two));
        board.set(9, Cell::Man(PlayerId::Two));
        let game = EnglishDraughts::from_board(board, PlayerId::One);
        assert!(game.possible_moves().is_empty());

        let mut output = Vec::new();
        let mut human = HumanPlayer::new("5-1\n5-9\n1-5\n".as_bytes(), &mut output);
        assert!(human.select_move(&game).is_none());

        let mut random = RandomPlayer::with_seed(4);
        let mut plies = 0;
        let outcome = play_match(game, [&mut human, &mut random], |_, _| plies += 1);
        assert_eq!(outcome, Outcome::WonBy(PlayerId::Two));
        assert_eq!(plies, 0);

        drop(human);
        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.matches("Your move?").count(), 0);
    }

    #[test]
    fn test_human_player_write_error_gives_up() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let game = EnglishDraughts::default();
        let mut human = HumanPlayer::new("22-18\n".as_bytes(), Broken);
        assert!(human.select_move(&game).is_none());
    }

    #[test]
    fn test_mcts_player_records_stats() {
        let game = EnglishDraughts::default();
        let mut player = MctsPlayer::with_seed(SearchBudget::Iterations(30), 1);
        let mv = player.select_move(&game).unwrap();
        assert!(game.possible_moves().contains(&mv));
        assert!(player.last_stats().unwrap().starts_with("MCTS with 30 evals"));
    }

    #[test]
    fn test_match_on_small_board() {
        let mut one = RandomPlayer::with_seed(1);
        let mut two = RandomPlayer::with_seed(2);
        let mut plies = 0;
        let _outcome = play_match(
            EnglishDraughts::new(6),
            [&mut one, &mut two],
            |_, _| plies += 1,
        );
        assert!(plies > 0);
    }

    #[test]
    fn test_match_resignation_loses() {
        let mut board = CheckerBoard::empty(8);
        board.set(22, Cell::Man(PlayerId::One));
        board.set(3, Cell::Man(PlayerId::Two));
        let game = EnglishDraughts::from_board(board, PlayerId::One);
        let mut human = HumanPlayer::new("resign\n".as_bytes(), Vec::new());
        let mut random = RandomPlayer::with_seed(3);
        let outcome = play_match(game, [&mut human, &mut random], |_, _| {});
        assert_eq!(outcome, Outcome::WonBy(PlayerId::Two));
    }
}
