use std::fmt;
use std::num::NonZeroU8;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ParseError;

/// Number of cells on the board.
pub const CELLS: usize = 16;

/// Size of the alphabet: the blank cell plus ranks `1..=17`.
pub const RANKS: usize = 18;

/// Board symbols indexed by rank. Rank 0 is the blank cell.
const SYMBOLS: [char; RANKS] = [
    ' ', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h',
];

const fn nonzero(rank: u8) -> NonZeroU8 {
    match NonZeroU8::new(rank) {
        Some(r) => r,
        None => panic!("rank 0 is the blank cell"),
    }
}

/// A single tile, identified by its rank (displayed value `2^rank`).
///
/// Ranks run `1..=Tile::MAX_RANK`; the blank cell is represented as `None` in a [`Cell`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tile(NonZeroU8);

/// Content of one board cell: `None` is blank.
pub type Cell = Option<Tile>;

impl Tile {
    /// Highest rank the alphabet can express (`'h'`, 131072).
    pub const MAX_RANK: u8 = 17;
    /// The common spawn tile (value 2).
    pub const TWO: Tile = Tile(nonzero(1));
    /// The rare spawn tile (value 4).
    pub const FOUR: Tile = Tile(nonzero(2));

    /// Build a tile from its rank; `None` for 0 or anything above [`Tile::MAX_RANK`].
    #[inline]
    pub fn new(rank: u8) -> Option<Tile> {
        if rank > Self::MAX_RANK { return None; }
        NonZeroU8::new(rank).map(Tile)
    }

    #[inline]
    pub fn rank(self) -> u8 { self.0.get() }

    /// Displayed value, e.g. 2048 for rank 11.
    #[inline]
    pub fn value(self) -> u32 { 1 << self.rank() }

    /// The tile two copies of `self` merge into.
    ///
    /// Top-rank tiles have no successor in the alphabet and therefore never merge.
    #[inline]
    pub fn promoted(self) -> Option<Tile> { Tile::new(self.rank() + 1) }

    /// True if `self` and `other` combine into a single tile.
    #[inline]
    pub fn merges_with(self, other: Tile) -> bool { self == other && self.rank() < Self::MAX_RANK }

    #[inline]
    pub fn symbol(self) -> char { SYMBOLS[self.rank() as usize] }

    pub fn from_symbol(symbol: char) -> Option<Tile> {
        SYMBOLS
            .iter()
            .position(|&s| s == symbol)
            .and_then(|rank| Tile::new(rank as u8))
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tile({})", self.symbol())
    }
}

/// Symbol used to store/display a cell.
#[inline]
pub fn cell_symbol(cell: Cell) -> char { cell.map_or(SYMBOLS[0], Tile::symbol) }

/// Rank of a cell, 0 for blank.
#[inline]
pub fn cell_rank(cell: Cell) -> u8 { cell.map_or(0, Tile::rank) }

/// Parse one board symbol. The search harness wildcard `'x'` is not part of the alphabet.
pub fn parse_cell(symbol: char) -> Result<Cell, ParseError> {
    if symbol == SYMBOLS[0] { return Ok(None); }
    Tile::from_symbol(symbol).map(Some).ok_or(ParseError::Symbol(symbol))
}

/// The 16-cell board in storage order.
///
/// Index 0 is the bottom-right cell when rendered, index 15 the top-left one.
/// The textual form is the 16 cell symbols in index order, e.g. `"3311            "`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Board([Cell; CELLS]);

impl Board {
    /// A board with every cell blank.
    pub const EMPTY: Board = Board([None; CELLS]);

    #[inline]
    pub fn from_cells(cells: [Cell; CELLS]) -> Self { Board(cells) }

    /// Build a board from raw ranks (0 = blank).
    ///
    /// ```
    /// use emu2048::engine::Board;
    /// let b = Board::from_ranks([1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]).unwrap();
    /// assert_eq!(b.to_symbols(), "11              ");
    /// ```
    pub fn from_ranks(ranks: [u8; CELLS]) -> Result<Self, ParseError> {
        let mut cells = [None; CELLS];
        for (cell, &rank) in cells.iter_mut().zip(ranks.iter()) {
            if rank == 0 { continue; }
            *cell = Some(Tile::new(rank).ok_or(ParseError::Rank(rank))?);
        }
        Ok(Board(cells))
    }

    #[inline]
    pub fn cells(&self) -> &[Cell; CELLS] { &self.0 }

    #[inline]
    pub fn get(&self, idx: usize) -> Cell { self.0[idx] }

    #[inline]
    pub fn set(&mut self, idx: usize, cell: Cell) { self.0[idx] = cell; }

    /// Count the number of blank cells.
    pub fn count_empty(&self) -> usize { self.0.iter().filter(|c| c.is_none()).count() }

    /// Indices of blank cells in storage order.
    pub fn empty_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().enumerate().filter(|(_, c)| c.is_none()).map(|(i, _)| i)
    }

    /// All tiles in storage order, blanks skipped.
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ { self.0.iter().flatten().copied() }

    pub fn highest_tile(&self) -> Option<Tile> { self.tiles().max() }

    /// Number of tiles per rank; slot 0 counts blank cells.
    pub fn rank_histogram(&self) -> [u8; RANKS] {
        let mut hist = [0u8; RANKS];
        for &cell in &self.0 {
            hist[cell_rank(cell) as usize] += 1;
        }
        hist
    }

    /// Swap left and right columns.
    pub fn mirror_horizontal(self) -> Self {
        let mut out = [None; CELLS];
        for (idx, cell) in self.0.into_iter().enumerate() {
            out[(idx / 4) * 4 + (3 - idx % 4)] = cell;
        }
        Board(out)
    }

    /// Swap top and bottom rows.
    pub fn mirror_vertical(self) -> Self {
        let mut out = [None; CELLS];
        for (idx, cell) in self.0.into_iter().enumerate() {
            out[(3 - idx / 4) * 4 + idx % 4] = cell;
        }
        Board(out)
    }

    /// The 16-symbol storage string.
    pub fn to_symbols(&self) -> String { self.0.iter().map(|&c| cell_symbol(c)).collect() }
}

impl FromStr for Board {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let found = s.chars().count();
        if found != CELLS {
            return Err(ParseError::BoardLength { expected: CELLS, found });
        }
        let mut cells = [None; CELLS];
        for (cell, symbol) in cells.iter_mut().zip(s.chars()) {
            *cell = parse_cell(symbol)?;
        }
        Ok(Board(cells))
    }
}

impl TryFrom<String> for Board {
    type Error = ParseError;
    fn try_from(s: String) -> Result<Self, Self::Error> { s.parse() }
}

impl From<Board> for String {
    fn from(b: Board) -> Self { b.to_symbols() }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({:?})", self.to_symbols())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: Vec<char> = self.0.iter().map(|&c| cell_symbol(c)).collect();
        writeln!(f, "╔═══╦═══╦═══╦═══╗")?;
        for row in (0..4).rev() {
            let base = row * 4;
            writeln!(f, "║ {} ║ {} ║ {} ║ {} ║", s[base + 3], s[base + 2], s[base + 1], s[base])?;
            if row > 0 { writeln!(f, "╟───╫───╫───╫───╢")?; }
        }
        write!(f, "╚═══╩═══╩═══╩═══╝")
    }
}
