//! Two-register single-pass move engine.
//!
//! Each direction is compacted by one scan over its 4 lanes. Only two cell
//! values are live at a time: `current`, the value sitting at the destination
//! slot `base_pos`, and `lookahead`, the value at the scan slot `view_pos`.
//!
//! ```text
//! position    0   1   2   3
//!           ║ a ║ b ║   ║   ║   <-- move direction
//!             ^   ^
//!          base   view
//! ```
//!
//! Every step evaluates the predicates below on the registers, then possibly
//! moves the scanned tile (clear at `view_pos`, write at the destination),
//! and finally loads the next `lookahead` (and `current` at a lane start):
//!
//! - `has_pair`: both registers hold tiles;
//! - `can_merge`: a pair of equal, promotable tiles;
//! - `has_gap`: a pair with at least one blank between them;
//! - `should_place`: the scanned tile moves (into a blank destination, a merge, or across a gap);
//! - `advance_base`: the tile lands one slot past `base_pos` (gap, no merge).
//!
//! After a merge `current` is blanked so the merged tile cannot merge again in
//! the same move. `base_pos` advances whenever a pair was seen: that slot
//! now holds a settled tile.
//!
//! [`transition`] is pure; [`compact`] executes its actions through [`Memory`].

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::lane::{self, LANES, LANE_LEN};
use super::memory::{Cursor, Memory};
use super::state::{cell_symbol, Board, Cell, Tile};
use super::Move;
use crate::score::Score;

/// Control state of the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// First step: nothing loaded yet.
    ScanStart,
    /// Scanning positions 1 and 2 of a lane.
    ScanBody,
    /// Scanning position 3; the step ends by loading the next lane.
    LaneAdvance,
    /// All lanes processed.
    Done,
}

/// The engine's registers between two steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Registers {
    pub phase: Phase,
    /// Value at the destination slot.
    pub current: Cell,
    /// Value at the scan slot.
    pub lookahead: Cell,
    pub lane: usize,
    pub base_pos: usize,
    pub view_pos: usize,
}

impl Registers {
    /// Registers at the beginning of every move.
    pub const START: Registers = Registers {
        phase: Phase::ScanStart,
        current: None,
        lookahead: None,
        lane: 0,
        base_pos: 0,
        view_pos: 0,
    };
}

impl Default for Registers {
    fn default() -> Self { Registers::START }
}

/// Move one tile: blank `clear`, then store `tile` at `write`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    pub clear: usize,
    pub write: usize,
    pub tile: Tile,
}

/// Side effects requested by one step, in execution order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Action {
    pub place: Option<Placement>,
    /// Tile produced by a merge; feeds the score.
    pub merged: Option<Tile>,
    /// Cell to load into `current`.
    pub load_current: Option<usize>,
    /// Cell to load into `lookahead`.
    pub load_lookahead: Option<usize>,
}

/// Result of [`transition`]: the next registers (before loads) and the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Step {
    pub next: Registers,
    pub action: Action,
}

/// Result of compacting one direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    /// At least one tile moved or merged.
    pub moved: bool,
    pub merges: u32,
    /// Sum of the merged tiles' values.
    pub score_delta: u64,
}

/// Predicates of one step, named as in the module docs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Predicates {
    has_pair: bool,
    can_merge: bool,
    should_place: bool,
    advance_base: bool,
}

impl Predicates {
    fn evaluate(regs: &Registers) -> Self {
        let start = regs.phase == Phase::ScanStart;
        let base_empty = regs.current.is_none();
        let view_empty = regs.lookahead.is_none();
        let has_pair = !start && !base_empty && !view_empty;
        let can_merge = match (regs.current, regs.lookahead) {
            (Some(a), Some(b)) => has_pair && a.merges_with(b),
            _ => false,
        };
        let has_gap = has_pair && regs.view_pos - regs.base_pos > 1;
        let should_place = !start && !view_empty && (base_empty || can_merge || has_gap);
        let advance_base = has_gap && !can_merge;
        Predicates { has_pair, can_merge, should_place, advance_base }
    }
}

/// One engine step. Pure: memory effects are described by the returned [`Action`].
///
/// ```
/// use emu2048::engine::shift::{transition, Phase, Registers};
/// use emu2048::engine::Move;
/// let step = transition(&Registers::START, Move::Left);
/// assert_eq!(step.next.phase, Phase::ScanBody);
/// assert_eq!(step.action.load_current, Some(3));
/// assert_eq!(step.action.load_lookahead, Some(2));
/// ```
pub fn transition(regs: &Registers, dir: Move) -> Step {
    if regs.phase == Phase::Done {
        return Step { next: *regs, action: Action::default() };
    }
    let p = Predicates::evaluate(regs);
    let mut action = Action::default();
    let mut next = *regs;

    if p.should_place {
        if let Some(tile) = regs.lookahead {
            let merged = if p.can_merge { tile.promoted() } else { None };
            let write_pos = if p.advance_base { regs.base_pos + 1 } else { regs.base_pos };
            action.place = Some(Placement {
                clear: lane::index(regs.lane, regs.view_pos, dir),
                write: lane::index(regs.lane, write_pos, dir),
                tile: merged.unwrap_or(tile),
            });
            action.merged = merged;
        }
    }
    if p.has_pair || p.should_place {
        next.current = if p.can_merge { None } else { regs.lookahead };
    }

    let lane_done = regs.view_pos + 1 >= LANE_LEN;
    if lane_done {
        next.lane = regs.lane + 1;
        next.base_pos = 0;
        next.view_pos = 1;
    } else {
        next.base_pos = if p.has_pair { regs.base_pos + 1 } else { regs.base_pos };
        next.view_pos = regs.view_pos + 1;
    }

    next.phase = if lane_done && next.lane >= LANES {
        Phase::Done
    } else if next.view_pos == LANE_LEN - 1 {
        Phase::LaneAdvance
    } else {
        Phase::ScanBody
    };

    if next.phase != Phase::Done {
        if regs.phase == Phase::ScanStart || lane_done {
            action.load_current = Some(lane::index(next.lane, 0, dir));
        }
        action.load_lookahead = Some(lane::index(next.lane, next.view_pos, dir));
    }

    Step { next, action }
}

/// Slide and merge all lanes toward `dir`, in place, through the cursor.
///
/// The score accumulator is credited once per merge. Every call takes
/// exactly 13 steps.
pub fn compact(mem: &mut Memory<'_>, score: &mut Score, dir: Move) -> MoveOutcome {
    let mut regs = Registers::START;
    let mut outcome = MoveOutcome::default();

    while regs.phase != Phase::Done {
        mem.cursor_mut().tick();
        let Step { mut next, action } = transition(&regs, dir);

        if let Some(p) = action.place {
            mem.clear(p.clear);
            mem.write(p.write, p.tile);
            outcome.moved = true;
        }
        if let Some(tile) = action.merged {
            score.add_rank(tile.rank());
            outcome.merges += 1;
            outcome.score_delta += u64::from(tile.value());
        }
        if let Some(idx) = action.load_current {
            next.current = mem.read(idx);
        }
        if let Some(idx) = action.load_lookahead {
            next.lookahead = mem.read(idx);
        }

        trace!(
            phase = ?regs.phase,
            lane = regs.lane,
            base = regs.base_pos,
            view = regs.view_pos,
            current = %cell_symbol(regs.current),
            lookahead = %cell_symbol(regs.lookahead),
            place = ?action.place,
            cursor = mem.cursor().position(),
            "engine step"
        );
        regs = next;
    }

    outcome
}

/// Compact `board` toward `dir` with a scratch cursor and score.
pub fn shift_board(board: Board, dir: Move) -> (Board, MoveOutcome) {
    let mut out = board;
    let mut cursor = Cursor::new();
    let mut score = Score::ZERO;
    let outcome = compact(&mut Memory::new(&mut out, &mut cursor), &mut score, dir);
    (out, outcome)
}

impl Board {
    /// Board after sliding/merging toward `dir` (no spawn).
    ///
    /// ```
    /// use emu2048::engine::{Board, Move};
    /// let b: Board = "3311            ".parse().unwrap();
    /// assert_eq!(b.shift(Move::Left).to_symbols(), "  42            ");
    /// ```
    #[inline]
    pub fn shift(self, dir: Move) -> Board { shift_board(self, dir).0 }

    /// Like [`Board::shift`], also reporting merges and score delta.
    #[inline]
    pub fn shifted(self, dir: Move) -> (Board, MoveOutcome) { shift_board(self, dir) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::CASES;

    fn tile(rank: u8) -> Cell { Tile::new(rank) }

    fn run(board: &str, dir: Move) -> (String, MoveOutcome, Cursor) {
        let mut b: Board = board.parse().unwrap();
        let mut cursor = Cursor::new();
        let mut score = Score::ZERO;
        let outcome = compact(&mut Memory::new(&mut b, &mut cursor), &mut score, dir);
        (b.to_symbols(), outcome, cursor)
    }

    #[test]
    fn it_matches_fixture_table() {
        for (i, case) in CASES.iter().enumerate() {
            let (result, outcome, _) = run(case.board, case.dir);
            assert_eq!(result, case.result, "case #{i} {:?} {:?}", case.board, case.dir);
            assert_eq!(outcome.moved, case.moved, "case #{i} moved flag");
        }
    }

    #[test]
    fn it_merges_vertically() {
        let (result, outcome, _) = run("     1   1      ", Move::Up);
        assert_eq!(result, "             2  ");
        assert!(outcome.moved);
        assert_eq!((outcome.merges, outcome.score_delta), (1, 4));
    }

    #[test]
    fn it_slides_across_gap() {
        let (result, outcome, _) = run("    1 2         ", Move::Left);
        assert_eq!(result, "      12        ");
        assert!(outcome.moved);
        assert_eq!(outcome.merges, 0);
    }

    #[test]
    fn it_merges_two_pairs() {
        let (result, outcome, _) = run("3311            ", Move::Left);
        assert_eq!(result, "  42            ");
        assert_eq!((outcome.merges, outcome.score_delta), (2, 4 + 16));
    }

    #[test]
    fn it_merges_each_tile_once() {
        let (result, outcome, _) = run("1111            ", Move::Left);
        assert_eq!(result, "  22            ");
        assert_eq!(outcome.merges, 2);
        let (result, _, _) = run("111             ", Move::Right);
        assert_eq!(result, "21              ");
    }

    #[test]
    fn it_keeps_top_rank_pairs_apart() {
        let (result, outcome, _) = run("  hh            ", Move::Left);
        assert_eq!(result, "  hh            ");
        assert!(!outcome.moved);
    }

    #[test]
    fn it_takes_thirteen_steps() {
        for dir in Move::ALL {
            let (_, _, cursor) = run("                ", dir);
            assert_eq!(cursor.steps(), 13);
        }
    }

    #[test]
    fn it_charges_cursor_distance() {
        // Empty board: only loads. Right reads 0..15 in order.
        let (_, _, cursor) = run("                ", Move::Right);
        assert_eq!(cursor.iterations(), 15);
        assert_eq!(cursor.position(), 15);
        // Left reads every lane backwards.
        let (_, _, cursor) = run("                ", Move::Left);
        assert_eq!(cursor.iterations(), 204);
        assert_eq!(cursor.position(), 12);
        let (_, _, cursor) = run("     1   1      ", Move::Up);
        assert_eq!(cursor.iterations(), 195);
    }

    #[test]
    fn it_steps_through_a_merge() {
        // Lane 0 toward the left reads cells 3, 2, 1, 0.
        let dir = Move::Left;
        let start = transition(&Registers::START, dir);
        assert_eq!(start.action.place, None);
        assert_eq!(start.next.phase, Phase::ScanBody);
        assert_eq!((start.next.base_pos, start.next.view_pos), (0, 1));

        let regs = Registers { current: tile(1), lookahead: tile(1), ..start.next };
        let step = transition(&regs, dir);
        assert_eq!(step.action.place, Some(Placement { clear: 2, write: 3, tile: Tile::FOUR }));
        assert_eq!(step.action.merged, Some(Tile::FOUR));
        assert_eq!(step.next.current, None);
        assert_eq!((step.next.base_pos, step.next.view_pos), (1, 2));
        assert_eq!(step.action.load_current, None);
        assert_eq!(step.action.load_lookahead, Some(1));
    }

    #[test]
    fn it_steps_across_a_gap() {
        let dir = Move::Right;
        let regs = Registers {
            phase: Phase::LaneAdvance,
            current: tile(2),
            lookahead: tile(3),
            lane: 1,
            base_pos: 0,
            view_pos: 3,
        };
        let step = transition(&regs, dir);
        // Lands right behind the base tile, then the scan moves to lane 2.
        assert_eq!(step.action.place, Some(Placement { clear: 7, write: 5, tile: Tile::new(3).unwrap() }));
        assert_eq!(step.action.merged, None);
        assert_eq!(step.next.lane, 2);
        assert_eq!((step.next.base_pos, step.next.view_pos), (0, 1));
        assert_eq!(step.next.phase, Phase::ScanBody);
        assert_eq!(step.action.load_current, Some(8));
        assert_eq!(step.action.load_lookahead, Some(9));
    }

    #[test]
    fn it_holds_on_adjacent_distinct_tiles() {
        let regs = Registers {
            phase: Phase::ScanBody,
            current: tile(1),
            lookahead: tile(2),
            lane: 0,
            base_pos: 0,
            view_pos: 1,
        };
        let step = transition(&regs, Move::Down);
        assert_eq!(step.action.place, None);
        assert_eq!(step.next.current, tile(2));
        assert_eq!((step.next.base_pos, step.next.view_pos), (1, 2));
        assert_eq!(step.next.phase, Phase::ScanBody);
        let step = transition(&Registers { lookahead: None, ..step.next }, Move::Down);
        assert_eq!(step.next.phase, Phase::LaneAdvance);
    }

    #[test]
    fn it_finishes_after_last_lane() {
        let regs = Registers {
            phase: Phase::LaneAdvance,
            current: None,
            lookahead: None,
            lane: 3,
            base_pos: 0,
            view_pos: 3,
        };
        let step = transition(&regs, Move::Up);
        assert_eq!(step.next.phase, Phase::Done);
        assert_eq!(step.action, Action::default());
        let again = transition(&step.next, Move::Up);
        assert_eq!(again.next, step.next);
    }

    #[test]
    fn it_shifts_through_board_helpers() {
        let b: Board = " 11             ".parse().unwrap();
        assert_eq!(b.shift(Move::Right).to_symbols(), "2               ");
        let (after, outcome) = b.shifted(Move::Left);
        assert_eq!(after.to_symbols(), "   2            ");
        assert_eq!(outcome, MoveOutcome { moved: true, merges: 1, score_delta: 4 });
    }
}
