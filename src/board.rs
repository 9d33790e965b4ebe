//! Checkerboard topology and occupancy.
//!
//! Only the dark tiles of an NxN board are playable. They are numbered from 1
//! to N²/2 row by row, starting from the top row; 0 is never a valid tile.
//! Even rows start on column 1, odd rows on column 0, so on 8x8:
//!
//! ```text
//!    .  1  .  2  .  3  .  4
//!    5  .  6  .  7  .  8  .
//!    .  9  . 10  . 11  . 12
//!   ...
//! ```
//!
//! Player one ("whites") starts on the bottom rows and moves up,
//! player two ("blacks") starts on the top rows and moves down.

use std::fmt;

use crate::constants::MIN_BOARD_SIZE;
use crate::game::PlayerId;

/// A playable tile id, between 1 and N²/2 inclusive.
pub type Tile = usize;

/// The four diagonal directions, "up" being towards row 0.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    pub const UP: [Direction; 2] = [Direction::UpLeft, Direction::UpRight];
    pub const DOWN: [Direction; 2] = [Direction::DownLeft, Direction::DownRight];
    pub const ALL: [Direction; 4] = [
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];

    /// The directions a man of `player` is allowed to move in.
    pub fn forward(player: PlayerId) -> &'static [Direction] {
        match player {
            PlayerId::One => &Self::UP,
            PlayerId::Two => &Self::DOWN,
        }
    }

    fn delta(self) -> (isize, isize) {
        match self {
            Direction::UpLeft => (-1, -1),
            Direction::UpRight => (-1, 1),
            Direction::DownLeft => (1, -1),
            Direction::DownRight => (1, 1),
        }
    }
}

/// Content of a tile.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Empty,
    Man(PlayerId),
    King(PlayerId),
}

impl Cell {
    /// The player owning the piece, `None` for an empty tile.
    pub fn owner(self) -> Option<PlayerId> {
        match self {
            Cell::Empty => None,
            Cell::Man(p) | Cell::King(p) => Some(p),
        }
    }

    /// Whether the tile holds a king.
    pub fn is_king(self) -> bool {
        matches!(self, Cell::King(_))
    }

    fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Man(PlayerId::One) => 'w',
            Cell::Man(PlayerId::Two) => 'b',
            Cell::King(PlayerId::One) => 'W',
            Cell::King(PlayerId::Two) => 'B',
        }
    }
}

/// An NxN checkerboard. Index 0 of `cells` is the unused sentinel tile.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CheckerBoard {
    size: usize,
    cells: Vec<Cell>,
}

impl CheckerBoard {
    /// Whether `size` is a supported board size.
    pub fn is_valid_size(size: usize) -> bool {
        size >= MIN_BOARD_SIZE && size % 2 == 0
    }

    /// An empty board. Panics if `size` is not valid.
    pub fn empty(size: usize) -> Self {
        assert!(
            Self::is_valid_size(size),
            "invalid board size {size}, must be even and at least {MIN_BOARD_SIZE}"
        );
        Self {
            size,
            cells: vec![Cell::Empty; size * size / 2 + 1],
        }
    }

    /// A board in the starting position: each side fills `size/2 - 1` rows.
    pub fn new(size: usize) -> Self {
        let mut board = Self::empty(size);
        let per_row = size / 2;
        let rows = per_row - 1;
        for tile in 1..=rows * per_row {
            board.cells[tile] = Cell::Man(PlayerId::Two);
        }
        for tile in (size - rows) * per_row + 1..=board.nb_tiles() {
            board.cells[tile] = Cell::Man(PlayerId::One);
        }
        board
    }

    /// Side length of the board.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of playable tiles.
    pub fn nb_tiles(&self) -> usize {
        self.cells.len() - 1
    }

    /// All playable tiles, from 1 up to [`CheckerBoard::nb_tiles`].
    pub fn tiles(&self) -> impl Iterator<Item = Tile> {
        1..=self.nb_tiles()
    }

    fn check(&self, tile: Tile) {
        assert!(
            tile >= 1 && tile <= self.nb_tiles(),
            "tile {tile} out of range 1..={}",
            self.nb_tiles()
        );
    }

    /// Row and column (both 0-based, row 0 at the top) of a tile.
    pub fn coords(&self, tile: Tile) -> (usize, usize) {
        self.check(tile);
        let per_row = self.size / 2;
        let row = (tile - 1) / per_row;
        let k = (tile - 1) % per_row;
        let col = 2 * k + if row % 2 == 0 { 1 } else { 0 };
        (row, col)
    }

    /// The tile at the given coordinates, `None` for light squares and off-board coordinates.
    pub fn tile_at(&self, row: isize, col: isize) -> Option<Tile> {
        let size = self.size as isize;
        if row < 0 || col < 0 || row >= size || col >= size || (row + col) % 2 == 0 {
            return None;
        }
        Some(row as usize * (self.size / 2) + col as usize / 2 + 1)
    }

    /// The diagonal neighbor of `tile`, `None` if it would fall off the board.
    pub fn neighbor(&self, tile: Tile, dir: Direction) -> Option<Tile> {
        let (row, col) = self.coords(tile);
        let (dr, dc) = dir.delta();
        self.tile_at(row as isize + dr, col as isize + dc)
    }

    /// The tile jumped over when going from `from` to `to`, `None` if that is a single step.
    pub fn square_between(&self, from: Tile, to: Tile) -> Option<Tile> {
        let (fr, fc) = self.coords(from);
        let (tr, tc) = self.coords(to);
        if fr.abs_diff(tr) != 2 || fc.abs_diff(tc) != 2 {
            return None;
        }
        self.tile_at(((fr + tr) / 2) as isize, ((fc + tc) / 2) as isize)
    }

    /// Whether `to` is a diagonal neighbor of `from`.
    pub fn is_step(&self, from: Tile, to: Tile) -> bool {
        Direction::ALL
            .iter()
            .any(|&dir| self.neighbor(from, dir) == Some(to))
    }

    /// Content of `tile`. Panics when the tile is out of range.
    pub fn get(&self, tile: Tile) -> Cell {
        self.check(tile);
        self.cells[tile]
    }

    /// Put `cell` on `tile`, replacing whatever was there.
    pub fn set(&mut self, tile: Tile, cell: Cell) {
        self.check(tile);
        self.cells[tile] = cell;
    }

    /// Whether no piece stands on `tile`.
    pub fn is_empty(&self, tile: Tile) -> bool {
        self.get(tile) == Cell::Empty
    }

    /// The player owning the piece on `tile`, if any.
    pub fn owner(&self, tile: Tile) -> Option<PlayerId> {
        self.get(tile).owner()
    }

    /// Whether a white piece (man or king) stands on `tile`.
    pub fn is_white(&self, tile: Tile) -> bool {
        self.owner(tile) == Some(PlayerId::One)
    }

    /// Whether a black piece (man or king) stands on `tile`.
    pub fn is_black(&self, tile: Tile) -> bool {
        self.owner(tile) == Some(PlayerId::Two)
    }

    /// Whether a king of either color stands on `tile`.
    pub fn is_king(&self, tile: Tile) -> bool {
        self.get(tile).is_king()
    }

    /// Whether `tile` lies on row 0, where white men are crowned.
    pub fn in_top_row(&self, tile: Tile) -> bool {
        self.coords(tile).0 == 0
    }

    /// Whether `tile` lies on the last row, where black men are crowned.
    pub fn in_bottom_row(&self, tile: Tile) -> bool {
        self.coords(tile).0 == self.size - 1
    }

    /// Whether a man of `player` ending on `tile` gets crowned.
    pub fn in_promotion_row(&self, tile: Tile, player: PlayerId) -> bool {
        match player {
            PlayerId::One => self.in_top_row(tile),
            PlayerId::Two => self.in_bottom_row(tile),
        }
    }

    /// Move the piece on `from` to the empty tile `to`.
    pub fn move_piece(&mut self, from: Tile, to: Tile) {
        let cell = self.get(from);
        assert!(cell != Cell::Empty, "no piece to move on tile {from}");
        assert!(self.is_empty(to), "tile {to} is not empty");
        self.cells[from] = Cell::Empty;
        self.cells[to] = cell;
    }

    /// Take the piece on `tile` off the board.
    pub fn remove_piece(&mut self, tile: Tile) {
        self.set(tile, Cell::Empty);
    }

    /// Turn the man on `tile` into a king. Kings stay kings.
    pub fn crown_piece(&mut self, tile: Tile) {
        match self.get(tile) {
            Cell::Man(p) => self.cells[tile] = Cell::King(p),
            Cell::King(_) => {}
            Cell::Empty => panic!("no piece to crown on tile {tile}"),
        }
    }

    /// Tiles holding a piece of `player`, in increasing order.
    pub fn pieces_of(&self, player: PlayerId) -> Vec<Tile> {
        self.tiles()
            .filter(|&t| self.cells[t].owner() == Some(player))
            .collect()
    }

    /// Number of pieces of `player` on the board, kings included.
    pub fn count(&self, player: PlayerId) -> usize {
        self.cells
            .iter()
            .filter(|c| c.owner() == Some(player))
            .count()
    }

    /// Grid diagram of the board, with the tile range of each row on the right.
    pub fn board_view(&self) -> String {
        let per_row = self.size / 2;
        let mut out = String::new();
        for row in 0..self.size {
            for col in 0..self.size {
                let ch = match self.tile_at(row as isize, col as isize) {
                    Some(tile) => self.cells[tile].symbol(),
                    None => ' ',
                };
                out.push(' ');
                out.push(ch);
            }
            let first = row * per_row + 1;
            out.push_str(&format!("   {first:>2}-{:<2}\n", first + per_row - 1));
        }
        out
    }
}

impl fmt::Display for CheckerBoard {
    /// Compact listing: `W:21,22,K3:B:1,2`, kings prefixed with `K`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (player, tag)) in [(PlayerId::One, 'W'), (PlayerId::Two, 'B')]
            .into_iter()
            .enumerate()
        {
            if i > 0 {
                write!(f, ":")?;
            }
            write!(f, "{tag}:")?;
            let list: Vec<String> = self
                .pieces_of(player)
                .into_iter()
                .map(|t| {
                    if self.is_king(t) {
                        format!("K{t}")
                    } else {
                        t.to_string()
                    }
                })
                .collect();
            write!(f, "{}", list.join(","))?;
        }
        Ok(())
    }
}
