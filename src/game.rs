//! Owned game state: board, memory cursor and score, moved as one unit.

use tracing::debug;

use crate::engine::{compact, Board, Cursor, CursorStats, Memory, Move, MoveOutcome};
use crate::score::Score;
use crate::spawn::{Spawned, Spawner};

/// One emulator session.
///
/// The cursor keeps its position from one move to the next; only the
/// profiling counters can be reset.
///
/// ```
/// use emu2048::game::Game;
/// use emu2048::engine::Move;
/// use emu2048::spawn::LfsrSpawner;
///
/// let mut spawner = LfsrSpawner::default();
/// let mut game = Game::new();
/// game.start(&mut spawner, 2);
/// let outcome = game.make_move(Move::Left, &mut spawner);
/// assert_eq!(game.board().count_empty(), if outcome.moved { 13 } else { 14 });
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    board: Board,
    cursor: Cursor,
    score: Score,
    last_move: Option<Move>,
    last_spawn: Option<Spawned>,
    moves: u64,
}

impl Default for Game {
    fn default() -> Self { Game::new() }
}

impl Game {
    pub fn new() -> Self { Game::from_board(Board::EMPTY) }

    pub fn from_board(board: Board) -> Self {
        Game {
            board,
            cursor: Cursor::new(),
            score: Score::ZERO,
            last_move: None,
            last_spawn: None,
            moves: 0,
        }
    }

    pub fn with_score(mut self, score: Score) -> Self {
        self.score = score;
        self
    }

    #[inline]
    pub fn board(&self) -> &Board { &self.board }

    #[inline]
    pub fn score(&self) -> &Score { &self.score }

    #[inline]
    pub fn cursor(&self) -> &Cursor { &self.cursor }

    pub fn stats(&self) -> CursorStats { self.cursor.stats() }

    /// Last direction that changed the board.
    pub fn last_move(&self) -> Option<Move> { self.last_move }

    pub fn last_spawn(&self) -> Option<Spawned> { self.last_spawn }

    /// Number of moves that changed the board.
    pub fn moves(&self) -> u64 { self.moves }

    /// Slide/merge toward `dir` without spawning. Returns what happened; a
    /// move that reports `moved == false` left the board untouched.
    pub fn shift(&mut self, dir: Move) -> MoveOutcome {
        let mut mem = Memory::new(&mut self.board, &mut self.cursor);
        let outcome = compact(&mut mem, &mut self.score, dir);
        if outcome.moved {
            self.last_move = Some(dir);
            self.moves += 1;
        }
        debug!(
            dir = %dir,
            moved = outcome.moved,
            merges = outcome.merges,
            score_delta = outcome.score_delta,
            cursor = self.cursor.position(),
            "move"
        );
        outcome
    }

    /// Place one tile with `spawner`.
    pub fn spawn<S: Spawner + ?Sized>(&mut self, spawner: &mut S) -> Option<Spawned> {
        let spawned = spawner.spawn(&mut self.board);
        if spawned.is_some() { self.last_spawn = spawned; }
        spawned
    }

    /// Shift, then spawn one tile if the board changed.
    pub fn make_move<S: Spawner + ?Sized>(&mut self, dir: Move, spawner: &mut S) -> MoveOutcome {
        let outcome = self.shift(dir);
        if outcome.moved { self.spawn(spawner); }
        outcome
    }

    /// Place the opening tiles.
    pub fn start<S: Spawner + ?Sized>(&mut self, spawner: &mut S, tiles: usize) {
        for _ in 0..tiles {
            self.spawn(spawner);
        }
    }

    /// Zero the iteration and step counters, keeping the cursor position.
    pub fn reset_counters(&mut self) { self.cursor.reset_counters(); }

    /// One-line summary: board string, score, last spawn and move, move count.
    pub fn status_line(&self) -> String {
        format!(
            "field: '{}' score: {} last spawn: {} last move: {} step: {}",
            self.board.to_symbols(),
            self.score.grouped(),
            self.last_spawn.map_or_else(|| "-".to_string(), |s| format!("{}@{}", s.tile.symbol(), s.index)),
            self.last_move.map_or(" ", Move::label),
            self.moves,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spawn::ScriptedSpawner;

    fn game(board: &str) -> Game { Game::from_board(board.parse().unwrap()) }

    #[test]
    fn it_keeps_cursor_between_moves() {
        let mut g = game("                ");
        g.shift(Move::Right);
        assert_eq!(g.cursor().position(), 15);
        let before = g.stats();
        g.shift(Move::Right);
        // Second pass starts from 15, so reaching cell 0 costs one shift.
        assert_eq!(g.stats().since(before).iterations, 16);
        assert_eq!(g.stats().steps, 26);
    }

    #[test]
    fn it_accumulates_score() {
        let mut g = game("3311            ");
        let outcome = g.shift(Move::Left);
        assert_eq!(outcome.score_delta, 20);
        assert_eq!(g.score().as_str(), "     20");
        assert_eq!(g.last_move(), Some(Move::Left));
        assert_eq!(g.moves(), 1);
    }

    #[test]
    fn it_leaves_board_alone_on_noop() {
        let mut g = game("1231123112311231");
        let before = *g.board();
        let outcome = g.shift(Move::Left);
        assert!(!outcome.moved);
        assert_eq!(*g.board(), before);
        assert_eq!(g.last_move(), None);
        assert_eq!(g.moves(), 0);
        assert_eq!(g.stats().steps, 13);
    }

    #[test]
    fn it_spawns_only_after_a_move() {
        let mut spawner: ScriptedSpawner = "pa".parse().unwrap();
        let mut g = game("1               ");
        let outcome = g.make_move(Move::Right, &mut spawner);
        assert!(!outcome.moved);
        assert_eq!(spawner.remaining(), 2);
        let outcome = g.make_move(Move::Left, &mut spawner);
        assert!(outcome.moved);
        assert_eq!(g.board().to_symbols(), "   1           1");
        assert_eq!(g.last_spawn().map(|s| s.index), Some(15));
    }

    #[test]
    fn it_formats_status() {
        let mut spawner: ScriptedSpawner = "b".parse().unwrap();
        let mut g = Game::new();
        g.start(&mut spawner, 1);
        assert_eq!(
            g.status_line(),
            "field: ' 1              ' score:       0 last spawn: 1@1 last move:   step: 0"
        );
    }
}
