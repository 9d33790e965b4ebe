//! English draughts rules.
//!
//! This module provides the draughts implementation of [`Game`]:
//! - Simple moves and mandatory, maximal capture chains
//! - Move application with capture removal and promotion
//! - Win, loss and draw detection
//!
//! Moves use the tile numbers of [`CheckerBoard`] and print in the usual
//! notation: `22-18` for a step, `22x13x6` for a capture chain.

use std::fmt;
use std::str::FromStr;

use crate::board::{CheckerBoard, Direction, Tile};
use crate::constants::{DEFAULT_BOARD_SIZE, DRAW_KING_MOVES, MIN_BOARD_SIZE};
use crate::error::{Error, InvalidMoveError};
use crate::game::{Game, Move, Outcome, PlayerId};

/// A draughts move: the starting tile followed by every landing tile.
///
/// Equality and hashing only look at the tiles, the capture flag is derived
/// from them and only matters for display.
#[derive(Clone, Debug)]
pub struct DraughtsMove {
    tiles: Vec<Tile>,
    capture: bool,
}

impl DraughtsMove {
    fn step(from: Tile, to: Tile) -> Self {
        Self {
            tiles: vec![from, to],
            capture: false,
        }
    }

    fn jumps(tiles: Vec<Tile>) -> Self {
        debug_assert!(tiles.len() >= 2);
        Self {
            tiles,
            capture: true,
        }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn from(&self) -> Tile {
        self.tiles[0]
    }

    pub fn to(&self) -> Tile {
        self.tiles[self.tiles.len() - 1]
    }

    pub fn is_capture(&self) -> bool {
        self.capture
    }

    /// Number of pieces taken by this move.
    pub fn nb_captures(&self) -> usize {
        if self.capture { self.tiles.len() - 1 } else { 0 }
    }
}

impl PartialEq for DraughtsMove {
    fn eq(&self, other: &Self) -> bool {
        self.tiles == other.tiles
    }
}

impl Eq for DraughtsMove {}

impl std::hash::Hash for DraughtsMove {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.tiles.hash(state);
    }
}

impl Move for DraughtsMove {}

impl fmt::Display for DraughtsMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = if self.capture { 'x' } else { '-' };
        for (i, tile) in self.tiles.iter().enumerate() {
            if i > 0 {
                write!(f, "{sep}")?;
            }
            write!(f, "{tile}")?;
        }
        Ok(())
    }
}

impl FromStr for DraughtsMove {
    type Err = Error;

    /// Parse `22-18` or `22x13x6`. The separator sets the capture flag.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| Error::InvalidNotation {
            input: s.to_string(),
            reason,
        };
        let s = s.trim();
        let capture = s.contains(['x', 'X']);
        if capture && s.contains('-') {
            return Err(invalid("mixed '-' and 'x' separators"));
        }
        let tiles = s
            .split(['-', 'x', 'X'])
            .map(|part| part.trim().parse::<Tile>().map_err(|_| invalid("bad tile number")))
            .collect::<Result<Vec<_>, _>>()?;
        if tiles.len() < 2 {
            return Err(invalid("a move needs at least two tiles"));
        }
        if tiles.contains(&0) {
            return Err(invalid("tiles are numbered from 1"));
        }
        if !capture && tiles.len() > 2 {
            return Err(invalid("a simple move has exactly two tiles"));
        }
        Ok(Self { tiles, capture })
    }
}

/// Parse a move in draughts notation.
pub fn parse_move(s: &str) -> Result<DraughtsMove, Error> {
    s.parse()
}

/// An English draughts game state.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnglishDraughts {
    board: CheckerBoard,
    player: PlayerId,
    /// Incremented after every move, starts at 1
    turn: u32,
    /// Consecutive moves made by a king without any capture
    king_moves_without_capture: u32,
}

impl Default for EnglishDraughts {
    fn default() -> Self {
        Self::new(DEFAULT_BOARD_SIZE)
    }
}

impl EnglishDraughts {
    /// A new game on a `size`x`size` board. Panics on an invalid size, see [`EnglishDraughts::try_new`].
    pub fn new(size: usize) -> Self {
        Self::from_board(CheckerBoard::new(size), PlayerId::One)
    }

    pub fn try_new(size: usize) -> Result<Self, Error> {
        if !CheckerBoard::is_valid_size(size) {
            return Err(Error::InvalidBoardSize {
                size,
                min: MIN_BOARD_SIZE,
            });
        }
        Ok(Self::new(size))
    }

    /// Start from an arbitrary position with `player` to move.
    pub fn from_board(board: CheckerBoard, player: PlayerId) -> Self {
        Self {
            board,
            player,
            turn: 1,
            king_moves_without_capture: 0,
        }
    }

    pub fn board(&self) -> &CheckerBoard {
        &self.board
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn king_moves_without_capture(&self) -> u32 {
        self.king_moves_without_capture
    }

    fn is_adversary(&self, tile: Tile) -> bool {
        self.board.owner(tile) == Some(self.player.other())
    }

    /// Directions the piece standing on `from` may move in.
    fn directions(&self, from: Tile) -> &'static [Direction] {
        if self.board.is_king(from) {
            &Direction::ALL
        } else {
            Direction::forward(self.player)
        }
    }

    /// Append the single-step moves of the piece on `from`.
    fn step_moves(&self, from: Tile, out: &mut Vec<DraughtsMove>) {
        for &dir in self.directions(from) {
            if let Some(to) = self.board.neighbor(from, dir) {
                if self.board.is_empty(to) {
                    out.push(DraughtsMove::step(from, to));
                }
            }
        }
    }

    /// Append every maximal capture chain of the piece on `from`.
    fn capture_moves(&self, from: Tile, out: &mut Vec<DraughtsMove>) {
        let dirs = self.directions(from);
        let mut path = vec![from];
        let mut captured = Vec::new();
        self.extend_captures(dirs, &mut path, &mut captured, out);
    }

    /// Try every jump from the end of `path`. Only chains that cannot be
    /// extended any further are emitted.
    ///
    /// The board is not modified while searching: pieces taken earlier in the
    /// chain stay on their tiles and are tracked in `captured` instead, so they
    /// can neither be jumped twice nor landed on.
    fn extend_captures(
        &self,
        dirs: &[Direction],
        path: &mut Vec<Tile>,
        captured: &mut Vec<Tile>,
        out: &mut Vec<DraughtsMove>,
    ) {
        let at = path[path.len() - 1];
        let origin = path[0];
        let mut extended = false;

        for &dir in dirs {
            let Some(over) = self.board.neighbor(at, dir) else {
                continue;
            };
            let Some(land) = self.board.neighbor(over, dir) else {
                continue;
            };
            if !self.is_adversary(over) || captured.contains(&over) {
                continue;
            }
            // The moving piece has left its origin, so a king may come back to it
            if !self.board.is_empty(land) && land != origin {
                continue;
            }

            extended = true;
            path.push(land);
            captured.push(over);
            self.extend_captures(dirs, path, captured, out);
            captured.pop();
            path.pop();
        }

        if !extended && path.len() > 1 {
            out.push(DraughtsMove::jumps(path.clone()));
        }
    }

    /// Play `mv` after checking that it is legal.
    ///
    /// The move is matched on its tiles, so a parsed move with the wrong
    /// separator is still accepted.
    pub fn try_play(&mut self, mv: &DraughtsMove) -> Result<(), InvalidMoveError> {
        let legal = self
            .possible_moves()
            .into_iter()
            .find(|m| m == mv)
            .ok_or_else(|| InvalidMoveError {
                mv: mv.to_string(),
                player: self.player,
            })?;
        self.apply(&legal);
        Ok(())
    }

    fn apply(&mut self, mv: &DraughtsMove) {
        let from = mv.from();
        let to = mv.to();
        let was_king = self.board.is_king(from);
        let mut captured_any = false;

        for step in mv.tiles().windows(2) {
            if let Some(over) = self.board.square_between(step[0], step[1]) {
                self.board.remove_piece(over);
                captured_any = true;
            }
            self.board.move_piece(step[0], step[1]);
        }

        if !was_king && self.board.in_promotion_row(to, self.player) {
            self.board.crown_piece(to);
        }

        self.king_moves_without_capture = if captured_any || !was_king {
            0
        } else {
            self.king_moves_without_capture + 1
        };

        self.player = self.player.other();
        self.turn += 1;
    }
}

impl Game for EnglishDraughts {
    type Move = DraughtsMove;

    /// Captures are mandatory: if any piece can capture, only the maximal
    /// capture chains are returned. Otherwise all single steps, by increasing
    /// source tile.
    fn possible_moves(&self) -> Vec<DraughtsMove> {
        let pieces = self.board.pieces_of(self.player);
        let mut moves = Vec::new();

        for &from in &pieces {
            self.capture_moves(from, &mut moves);
        }
        if moves.is_empty() {
            for &from in &pieces {
                self.step_moves(from, &mut moves);
            }
        }
        moves
    }

    fn play(&mut self, mv: &DraughtsMove) {
        debug_assert!(
            self.possible_moves().contains(mv),
            "illegal move {mv} in position {self}"
        );
        self.apply(mv);
    }

    fn player(&self) -> PlayerId {
        self.player
    }

    fn winner(&self) -> Option<Outcome> {
        if self.board.count(PlayerId::One) == 0 {
            Some(Outcome::WonBy(PlayerId::Two))
        } else if self.board.count(PlayerId::Two) == 0 {
            Some(Outcome::WonBy(PlayerId::One))
        } else if self.king_moves_without_capture >= DRAW_KING_MOVES {
            Some(Outcome::Draw)
        } else {
            None
        }
    }

    fn player_name(&self, player: PlayerId) -> String {
        match player {
            PlayerId::One => "Player with the whites".to_string(),
            PlayerId::Two => "Player with the blacks".to_string(),
        }
    }

    fn view(&self) -> String {
        format!(
            "{}Turn #{}. {} plays.\n",
            self.board.board_view(),
            self.turn,
            self.player_name(self.player)
        )
    }
}

impl fmt::Display for EnglishDraughts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.player {
            PlayerId::One => 'W',
            PlayerId::Two => 'B',
        };
        write!(f, "{}. {tag}:{}", self.turn, self.board)
    }
}
