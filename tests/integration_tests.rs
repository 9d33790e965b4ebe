//! Integration tests for draughts-mcts
//!
//! Rule properties are checked over positions reached by random play, the
//! search is checked on small hand-built positions.

use draughts_mcts::board::{Cell, CheckerBoard, Tile};
use draughts_mcts::draughts::{parse_move, DraughtsMove, EnglishDraughts};
use draughts_mcts::game::{Game, Outcome, PlayerId};
use draughts_mcts::mcts::MonteCarloTreeSearch;
use draughts_mcts::playout::{random_move, roll_out};

// =============================================================================
// Helper functions
// =============================================================================

/// Build an 8x8 position. Kings must also be listed in `white` or `black`.
fn setpos(white: &[Tile], black: &[Tile], kings: &[Tile], player: PlayerId) -> EnglishDraughts {
    let mut board = CheckerBoard::empty(8);
    for &t in white {
        board.set(t, Cell::Man(PlayerId::One));
    }
    for &t in black {
        board.set(t, Cell::Man(PlayerId::Two));
    }
    for &t in kings {
        board.crown_piece(t);
    }
    EnglishDraughts::from_board(board, player)
}

/// States visited by a few random games, from the start position to the final one.
fn random_states(games: usize, seed: u64) -> Vec<EnglishDraughts> {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut states = Vec::new();
    for _ in 0..games {
        let mut game = EnglishDraughts::default();
        while game.winner().is_none() && states.len() < 5000 {
            states.push(game.clone());
            let moves = game.possible_moves();
            let Some(mv) = random_move(&mut rng, &moves) else {
                break;
            };
            game.play(mv);
        }
        states.push(game);
    }
    states
}

/// Whether `mv` is a strict prefix of another legal move of `game`.
fn can_extend(game: &EnglishDraughts, mv: &DraughtsMove) -> bool {
    game.possible_moves()
        .iter()
        .any(|other| other.tiles().len() > mv.tiles().len() && other.tiles().starts_with(mv.tiles()))
}

// =============================================================================
// Move generation
// =============================================================================

#[test]
fn test_start_position_moves() {
    let game = EnglishDraughts::default();
    assert_eq!(game.board().count(PlayerId::One), 12);
    let moves = game.possible_moves();
    assert_eq!(moves.len(), 7);
    assert!(moves.iter().all(|m| !m.is_capture() && m.tiles().len() == 2));
    // Only the front row (21-24) can move, by increasing source tile
    assert!(moves.iter().all(|m| (21..=24).contains(&m.from())));
    assert!(moves.windows(2).all(|w| w[0].from() <= w[1].from()));
}

#[test]
fn test_forced_double_jump_three_pieces() {
    let game = setpos(&[22], &[18, 10], &[], PlayerId::One);
    let moves: Vec<String> = game.possible_moves().iter().map(|m| m.to_string()).collect();
    assert_eq!(moves, vec!["22x15x6"]);
}

#[test]
fn test_black_double_jump() {
    // Blacks move down: 11x18x25 over 15 and 22
    let game = setpos(&[15, 22], &[11], &[], PlayerId::Two);
    let moves: Vec<String> = game.possible_moves().iter().map(|m| m.to_string()).collect();
    assert_eq!(moves, vec!["11x18x25"]);
}

#[test]
fn test_captures_are_mandatory_and_maximal() {
    for game in random_states(10, 1) {
        let moves = game.possible_moves();
        if moves.iter().any(|m| m.is_capture()) {
            assert!(
                moves.iter().all(|m| m.is_capture()),
                "mixed capture and simple moves in {game}"
            );
            for mv in &moves {
                assert!(!can_extend(&game, mv), "{mv} is not maximal in {game}");
            }
        }
    }
}

#[test]
fn test_moves_are_well_formed() {
    for game in random_states(10, 2) {
        let board = game.board();
        for mv in game.possible_moves() {
            assert!(mv.tiles().len() >= 2);
            assert_eq!(board.owner(mv.from()), Some(game.player()));
            for step in mv.tiles().windows(2) {
                if mv.is_capture() {
                    let over = board.square_between(step[0], step[1]);
                    assert!(over.is_some(), "{mv} has a non-jump step");
                    assert_eq!(board.owner(over.unwrap()), Some(game.player().other()));
                } else {
                    assert!(board.is_step(step[0], step[1]), "{mv} is not a step");
                    assert!(board.is_empty(step[1]));
                }
            }
        }
    }
}

// =============================================================================
// Move application
// =============================================================================

#[test]
fn test_play_piece_counts() {
    for game in random_states(10, 3) {
        let me = game.player();
        let mine = game.board().count(me);
        let theirs = game.board().count(me.other());
        for mv in game.possible_moves() {
            let after = game.clone_and_play(&mv);
            assert_eq!(after.board().count(me), mine, "{mv} changed the mover's pieces");
            assert_eq!(
                after.board().count(me.other()),
                theirs - mv.nb_captures(),
                "{mv} removed the wrong number of pieces"
            );
            assert_eq!(after.player(), me.other());
            assert_eq!(after.turn(), game.turn() + 1);
        }
    }
}

#[test]
fn test_promotion_is_permanent() {
    for game in random_states(10, 4) {
        let me = game.player();
        for mv in game.possible_moves() {
            let after = game.clone_and_play(&mv);
            let board = after.board();
            if board.in_promotion_row(mv.to(), me) || game.board().is_king(mv.from()) {
                assert!(board.is_king(mv.to()), "{mv} should end on a king");
            }
            // The mover's kings are never demoted
            let kings = |b: &CheckerBoard| b.pieces_of(me).into_iter().filter(|&t| b.is_king(t)).count();
            assert!(kings(board) >= kings(game.board()));
        }
    }
}

#[test]
fn test_clone_isolation() {
    let mut original = EnglishDraughts::default();
    original.play(&parse_move("22-18").unwrap());
    let mut copy = original.clone();

    original.play(&parse_move("9-13").unwrap());
    copy.play(&parse_move("11-15").unwrap());

    assert!(original.board().is_black(13) && original.board().is_empty(15));
    assert!(copy.board().is_black(15) && copy.board().is_empty(13));
}

#[test]
fn test_invalid_move_is_an_error() {
    let mut game = EnglishDraughts::default();
    let err = game.try_play(&parse_move("9-13").unwrap()).unwrap_err();
    assert_eq!(err.to_string(), "invalid move 9-13 for player one");
    assert_eq!(game, EnglishDraughts::default());
}

// =============================================================================
// Game end
// =============================================================================

#[test]
fn test_winner_matches_piece_counts() {
    for game in random_states(10, 5) {
        let ones = game.board().count(PlayerId::One);
        let twos = game.board().count(PlayerId::Two);
        let expected = if ones == 0 {
            Some(Outcome::WonBy(PlayerId::Two))
        } else if twos == 0 {
            Some(Outcome::WonBy(PlayerId::One))
        } else if game.king_moves_without_capture() >= 25 {
            Some(Outcome::Draw)
        } else {
            None
        };
        assert_eq!(game.winner(), expected);
    }
}

#[test]
fn test_small_boards_play_out() {
    for size in [4, 6, 10] {
        let game = EnglishDraughts::new(size);
        let mut rng = fastrand::Rng::with_seed(size as u64);
        let results = roll_out(&game, 5, &mut rng);
        assert_eq!(results.nb_simulations(), 5);
        let total = results.nb_wins(PlayerId::One) + results.nb_wins(PlayerId::Two);
        assert_eq!(total, 5.0);
    }
}

// =============================================================================
// Search
// =============================================================================

#[test]
fn test_single_iteration_from_root() {
    let game = EnglishDraughts::default();
    let mut mcts = MonteCarloTreeSearch::with_seed(game.clone(), 11);
    mcts.evaluate_tree_once();

    let root = mcts.root();
    assert_eq!(root.size(), 1 + game.possible_moves().len());
    assert_eq!(root.n, 1);
    for (child, mv) in root.children.iter().zip(game.possible_moves()) {
        assert_eq!(child.mv.as_ref(), Some(&mv));
        assert_eq!(child.game, game.clone_and_play(&mv));
    }
}

#[test]
fn test_engine_avoids_immediate_loss() {
    // White's last man on 23 either steps to 18, where 14x23 ends the game,
    // or to 19, where it survives for now
    let game = setpos(&[23], &[14, 26], &[26], PlayerId::One);
    let moves: Vec<String> = game.possible_moves().iter().map(|m| m.to_string()).collect();
    assert_eq!(moves, vec!["23-18", "23-19"]);

    let mut mcts = MonteCarloTreeSearch::with_seed(game, 13).with_rollouts_per_leaf(4);
    mcts.evaluate_tree_with_iterations(500);

    let losing = &mcts.root().children[0];
    assert_eq!(losing.score(), Some(0.0));
    assert_eq!(mcts.best_move().unwrap().to_string(), "23-19");
}
