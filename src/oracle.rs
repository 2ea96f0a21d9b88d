//! Lookup-table reference for moves, used to cross-check the engine.
//!
//! Every lane is reduced to a *shape*: four slots naming, per position, the
//! first position holding an equal tile (1..=4) or 0 for a blank. Positions
//! run from the edge the tiles slide toward. Shape `1 2 3 3`, for example, is
//! "two distinct tiles followed by a mergeable pair". There are 52 shapes.
//!
//! The resolved shape uses the same slot numbers, plus `0xa..=0xc` for "the
//! tile at position 1..=3, promoted". Packed four bits per slot with position
//! 0 in the low nibble, `0x3321` resolves to `0x0c21`.
//!
//! The oracle reads a whole lane, then writes a whole lane. Routed through a
//! [`Memory`], that gives the naive access cost the engine is measured against.

use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;

use crate::engine::lane::{self, LANES, LANE_LEN};
use crate::engine::{Board, Cell, Memory, Move, MoveOutcome, Tile};
use crate::fixtures::CASES;

/// Marks codes that are not a shape.
const NO_SHAPE: u16 = u16::MAX;
/// Slot offset of promoted tiles: `PROMOTED + p` is position `p` promoted.
const PROMOTED: u8 = 0xa;

/// Shape of one lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variant([u8; LANE_LEN]);

impl Variant {
    #[inline]
    pub fn slots(self) -> [u8; LANE_LEN] { self.0 }

    /// 16-bit code, position 0 in the low nibble.
    pub fn code(self) -> u16 {
        self.0.iter().rev().fold(0, |acc, &s| (acc << 4) | u16::from(s))
    }

    fn from_code(code: u16) -> Self {
        let mut slots = [0; LANE_LEN];
        for (pos, slot) in slots.iter_mut().enumerate() {
            *slot = ((code >> (4 * pos)) & 0xf) as u8;
        }
        Variant(slots)
    }

    /// The lane is unchanged by a move.
    pub fn is_fixed(self) -> bool { resolve(self) == self.code() }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{:04x}", self.code()) }
}

fn same(a: Cell, b: Cell) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.merges_with(b),
        _ => false,
    }
}

/// Shape of a lane given in position order.
///
/// ```
/// use emu2048::engine::Tile;
/// use emu2048::oracle::classify;
/// let t = Tile::new;
/// assert_eq!(classify([t(3), t(1), t(1), t(1)]).code(), 0x2221);
/// ```
pub fn classify(lane: [Cell; LANE_LEN]) -> Variant {
    let mut slots = [0u8; LANE_LEN];
    for pos in 0..LANE_LEN {
        if lane[pos].is_none() {
            continue;
        }
        // Nearest earlier equal tile wins, matching the resolved-shape table.
        let slot = (0..pos)
            .rev()
            .find(|&earlier| same(lane[earlier], lane[pos]))
            .map_or(pos as u8 + 1, |earlier| slots[earlier]);
        slots[pos] = slot;
    }
    Variant(slots)
}

/// Slide a shape symbolically: equal neighbours among the occupied slots
/// collapse into one promoted slot, first pair first.
fn slide(shape: Variant) -> u16 {
    let occupied: Vec<u8> = shape.0.iter().copied().filter(|&s| s != 0).collect();
    let mut out = [0u8; LANE_LEN];
    let (mut read, mut write) = (0, 0);
    while read < occupied.len() {
        if read + 1 < occupied.len() && occupied[read] == occupied[read + 1] {
            out[write] = PROMOTED - 1 + occupied[read];
            read += 2;
        } else {
            out[write] = occupied[read];
            read += 1;
        }
        write += 1;
    }
    Variant(out).code()
}

fn table() -> &'static [u16] {
    static TABLE: OnceLock<Box<[u16]>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = vec![NO_SHAPE; 1 << 16].into_boxed_slice();
        // Ranks 0..=4 are enough to produce every shape.
        for n in 0..5u32.pow(LANE_LEN as u32) {
            let mut lane = [None; LANE_LEN];
            let mut rest = n;
            for cell in lane.iter_mut() {
                *cell = Tile::new((rest % 5) as u8);
                rest /= 5;
            }
            let shape = classify(lane);
            table[usize::from(shape.code())] = slide(shape);
        }
        table
    })
}

/// Resolved code for `shape`.
pub fn resolve(shape: Variant) -> u16 {
    let out = table()[usize::from(shape.code())];
    debug_assert_ne!(out, NO_SHAPE, "{shape} is not a lane shape");
    out
}

/// Every lane shape, sorted by code.
pub fn shapes() -> Vec<Variant> {
    table()
        .iter()
        .enumerate()
        .filter(|&(_, &out)| out != NO_SHAPE)
        .map(|(code, _)| Variant::from_code(code as u16))
        .collect()
}

/// Result of a reference move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OracleOutcome {
    pub board: Board,
    pub moved: bool,
    pub merges: u32,
    pub score_delta: u64,
}

impl OracleOutcome {
    /// The counters in the engine's terms.
    pub fn outcome(&self) -> MoveOutcome {
        MoveOutcome { moved: self.moved, merges: self.merges, score_delta: self.score_delta }
    }
}

struct LaneResult {
    cells: [Cell; LANE_LEN],
    moved: bool,
    merges: u32,
    score_delta: u64,
}

fn shift_lane(lane: [Cell; LANE_LEN]) -> LaneResult {
    let shape = classify(lane);
    let resolved = Variant::from_code(resolve(shape));
    let mut result = LaneResult {
        cells: [None; LANE_LEN],
        moved: resolved != shape,
        merges: 0,
        score_delta: 0,
    };
    for (cell, slot) in result.cells.iter_mut().zip(resolved.0) {
        *cell = match slot {
            0 => None,
            1..=4 => lane[usize::from(slot - 1)],
            _ => {
                let merged = lane[usize::from(slot - PROMOTED)].and_then(Tile::promoted);
                if let Some(tile) = merged {
                    result.merges += 1;
                    result.score_delta += u64::from(tile.value());
                }
                merged
            }
        };
    }
    result
}

/// Cell storage the reference move reads and writes.
trait Storage {
    fn load(&mut self, index: usize) -> Cell;
    fn store(&mut self, index: usize, cell: Cell);
    fn snapshot(&self) -> Board;
}

impl Storage for Board {
    fn load(&mut self, index: usize) -> Cell { self.get(index) }
    fn store(&mut self, index: usize, cell: Cell) { self.set(index, cell) }
    fn snapshot(&self) -> Board { *self }
}

impl Storage for Memory<'_> {
    fn load(&mut self, index: usize) -> Cell { self.read(index) }

    fn store(&mut self, index: usize, cell: Cell) {
        match cell {
            Some(tile) => self.write(index, tile),
            None => self.clear(index),
        }
    }

    fn snapshot(&self) -> Board { *self.board() }
}

fn run<S: Storage + ?Sized>(storage: &mut S, dir: Move) -> OracleOutcome {
    let mut outcome = OracleOutcome { board: Board::EMPTY, moved: false, merges: 0, score_delta: 0 };
    for l in 0..LANES {
        let idx = lane::indices(l, dir);
        let result = shift_lane(idx.map(|i| storage.load(i)));
        for (&i, &cell) in idx.iter().zip(&result.cells) {
            storage.store(i, cell);
        }
        outcome.moved |= result.moved;
        outcome.merges += result.merges;
        outcome.score_delta += result.score_delta;
    }
    outcome.board = storage.snapshot();
    outcome
}

/// Reference move of `board` toward `dir`.
pub fn shift(board: Board, dir: Move) -> OracleOutcome {
    let mut out = board;
    run(&mut out, dir)
}

/// Reference move through the cursor: per lane, four reads in position
/// order, then four writes.
pub fn shift_through(mem: &mut Memory<'_>, dir: Move) -> OracleOutcome { run(mem, dir) }

/// Shapes of the four lanes of `board` seen from `dir`.
pub fn variants(board: &Board, dir: Move) -> [Variant; LANES] {
    std::array::from_fn(|l| classify(lane::indices(l, dir).map(|i| board.get(i))))
}

/// Distinct lane shapes seen so far.
#[derive(Debug, Clone, Default)]
pub struct VariantStore {
    seen: HashSet<Variant>,
}

impl VariantStore {
    pub fn new() -> Self { Self::default() }

    /// Store with every shape covered by the shared move table.
    pub fn from_fixtures() -> Self {
        let mut store = Self::new();
        for case in CASES {
            if let Ok(board) = case.board.parse::<Board>() {
                store.record_board(&board, case.dir);
            }
        }
        store
    }

    /// Returns `true` if `v` was not seen before.
    pub fn record(&mut self, v: Variant) -> bool { self.seen.insert(v) }

    /// Record all lanes of `board`; returns how many shapes were new.
    pub fn record_board(&mut self, board: &Board, dir: Move) -> usize {
        variants(board, dir).into_iter().filter(|&v| self.record(v)).count()
    }

    pub fn contains(&self, v: Variant) -> bool { self.seen.contains(&v) }

    pub fn len(&self) -> usize { self.seen.len() }

    pub fn is_empty(&self) -> bool { self.seen.is_empty() }

    /// Shapes not recorded yet, sorted by code.
    pub fn missing(&self) -> Vec<Variant> {
        shapes().into_iter().filter(|v| !self.contains(*v)).collect()
    }
}
