//! Memory cursor: the sequential-access cost model around board storage.
//!
//! The board is treated as a circular shift register that only rotates
//! forward. Reaching cell `i` from the last visited cell costs the number of
//! forward shifts between them. The cursor is part of the game state and is
//! not reset between moves, so the cost of a move depends on where the
//! previous one stopped.

use serde::{Deserialize, Serialize};

use super::state::{Board, Cell, Tile, CELLS};

/// Last accessed index plus the profiling counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    last: usize,
    iterations: u64,
    steps: u64,
}

/// Snapshot of a [`Cursor`]'s counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorStats {
    /// Index the cursor rests on.
    pub position: usize,
    /// Cumulative forward shifts.
    pub iterations: u64,
    /// Cumulative move-engine transitions.
    pub steps: u64,
}

impl CursorStats {
    /// Counters accumulated since `earlier`; `position` is kept from `self`.
    pub fn since(self, earlier: CursorStats) -> CursorStats {
        CursorStats {
            position: self.position,
            iterations: self.iterations - earlier.iterations,
            steps: self.steps - earlier.steps,
        }
    }
}

impl Cursor {
    pub const fn new() -> Self { Cursor { last: 0, iterations: 0, steps: 0 } }

    /// Index of the last accessed cell.
    #[inline]
    pub fn position(&self) -> usize { self.last }

    #[inline]
    pub fn iterations(&self) -> u64 { self.iterations }

    #[inline]
    pub fn steps(&self) -> u64 { self.steps }

    pub fn stats(&self) -> CursorStats {
        CursorStats { position: self.last, iterations: self.iterations, steps: self.steps }
    }

    /// Forward shifts needed to bring `index` under the cursor.
    ///
    /// ```
    /// use emu2048::engine::Cursor;
    /// let c = Cursor::new();
    /// assert_eq!(c.distance(0), 0);
    /// assert_eq!(c.distance(15), 15);
    /// ```
    #[inline]
    pub fn distance(&self, index: usize) -> usize {
        if index >= self.last { index - self.last } else { CELLS - self.last + index }
    }

    /// Move to `index`, charging the distance. Returns the distance travelled.
    #[inline]
    pub fn visit(&mut self, index: usize) -> usize {
        debug_assert!(index < CELLS, "cell index {index} out of range");
        let dist = self.distance(index);
        self.iterations += dist as u64;
        self.last = index;
        dist
    }

    /// Count one move-engine transition.
    #[inline]
    pub fn tick(&mut self) { self.steps += 1; }

    /// Zero the counters; the position is kept.
    pub fn reset_counters(&mut self) {
        self.iterations = 0;
        self.steps = 0;
    }

    /// Back to index 0 with zeroed counters.
    pub fn reset(&mut self) { *self = Cursor::new(); }
}

/// Board storage seen through the cursor: every access is charged.
pub struct Memory<'a> {
    board: &'a mut Board,
    cursor: &'a mut Cursor,
}

impl<'a> Memory<'a> {
    pub fn new(board: &'a mut Board, cursor: &'a mut Cursor) -> Self { Memory { board, cursor } }

    #[inline]
    pub fn read(&mut self, index: usize) -> Cell {
        self.cursor.visit(index);
        self.board.get(index)
    }

    /// Store a tile. Blanking a cell goes through [`Memory::clear`].
    #[inline]
    pub fn write(&mut self, index: usize, tile: Tile) {
        self.cursor.visit(index);
        self.board.set(index, Some(tile));
    }

    #[inline]
    pub fn clear(&mut self, index: usize) {
        self.cursor.visit(index);
        self.board.set(index, None);
    }

    #[inline]
    pub fn board(&self) -> &Board { self.board }

    #[inline]
    pub fn cursor(&self) -> &Cursor { self.cursor }

    #[inline]
    pub fn cursor_mut(&mut self) -> &mut Cursor { self.cursor }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_only_rotates_forward() {
        let mut c = Cursor::new();
        assert_eq!(c.visit(5), 5);
        assert_eq!(c.visit(5), 0);
        assert_eq!(c.visit(4), 15);
        assert_eq!(c.visit(0), 12);
        assert_eq!(c.iterations(), 32);
        assert_eq!(c.position(), 0);
    }

    #[test]
    fn it_charges_every_access() {
        let mut board = Board::EMPTY;
        let mut cursor = Cursor::new();
        let mut mem = Memory::new(&mut board, &mut cursor);
        mem.write(3, Tile::TWO);
        assert_eq!(mem.read(3), Some(Tile::TWO));
        mem.clear(2);
        assert_eq!(mem.read(3), Some(Tile::TWO));
        assert_eq!(mem.cursor().iterations(), 3 + 0 + 15 + 1);
        assert_eq!(mem.board().get(2), None);
        assert_eq!(cursor.position(), 3);
    }

    #[test]
    fn it_stats_since() {
        let mut c = Cursor::new();
        c.visit(10);
        c.tick();
        let before = c.stats();
        c.visit(2);
        c.tick();
        c.tick();
        let delta = c.stats().since(before);
        assert_eq!(delta, CursorStats { position: 2, iterations: 8, steps: 2 });
        c.reset_counters();
        assert_eq!(c.stats(), CursorStats { position: 2, iterations: 0, steps: 0 });
    }
}
