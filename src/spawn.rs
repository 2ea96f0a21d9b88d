//! Tile spawn policies.
//!
//! Every policy honours the same contract: pick exactly one blank cell, put a
//! 2 (rank 1) or a 4 (rank 2) there, and never touch an occupied cell.

use std::collections::VecDeque;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::engine::{Board, Tile, CELLS};

/// Where a tile was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Spawned {
    pub index: usize,
    pub tile: Tile,
}

pub trait Spawner {
    /// Place one tile on a blank cell; `None` when nothing could be placed.
    fn spawn(&mut self, board: &mut Board) -> Option<Spawned>;
}

impl<S: Spawner + ?Sized> Spawner for Box<S> {
    fn spawn(&mut self, board: &mut Board) -> Option<Spawned> { (**self).spawn(board) }
}

/// Put `tile` on the `nth` blank cell.
fn place_nth(board: &mut Board, nth: usize, tile: Tile) -> Option<Spawned> {
    let index = board.empty_cells().nth(nth)?;
    board.set(index, Some(tile));
    Some(Spawned { index, tile })
}

/// Uniform blank cell; a 2 with 90% probability, else a 4.
#[derive(Debug, Clone)]
pub struct RandomSpawner<R> {
    rng: R,
}

impl<R: Rng> RandomSpawner<R> {
    pub fn new(rng: R) -> Self { RandomSpawner { rng } }
}

impl RandomSpawner<StdRng> {
    /// Deterministic spawner for reproducible sessions.
    pub fn seeded(seed: u64) -> Self { RandomSpawner::new(StdRng::seed_from_u64(seed)) }

    pub fn from_entropy() -> Self { RandomSpawner::new(StdRng::from_entropy()) }
}

impl<R: Rng> Spawner for RandomSpawner<R> {
    fn spawn(&mut self, board: &mut Board) -> Option<Spawned> {
        let empty = board.count_empty();
        if empty == 0 { return None; }
        let nth = self.rng.gen_range(0..empty);
        let tile = if self.rng.gen_range(0..10) < 9 { Tile::TWO } else { Tile::FOUR };
        place_nth(board, nth, tile)
    }
}

/// 16-bit linear-feedback shift register (taps at bits 9 and 1).
///
/// Each spawn clocks the register once; the new state picks the blank cell
/// (`state % blanks`) and the tile (a 4 when `(state >> 8) % 10 == 0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LfsrSpawner {
    state: u16,
}

impl LfsrSpawner {
    pub const DEFAULT_SEED: u16 = 0x8988;

    /// A zero seed would lock the register, so it falls back to [`LfsrSpawner::DEFAULT_SEED`].
    pub fn new(seed: u16) -> Self {
        LfsrSpawner { state: if seed == 0 { Self::DEFAULT_SEED } else { seed } }
    }

    #[inline]
    pub fn state(&self) -> u16 { self.state }

    /// Clock the register once and return the new state.
    #[inline]
    pub fn clock(&mut self) -> u16 {
        let s = self.state;
        let feedback = ((s >> 9) ^ (s >> 1)) & 1;
        self.state = (feedback << 15) | (s >> 1);
        self.state
    }
}

impl Default for LfsrSpawner {
    fn default() -> Self { LfsrSpawner::new(Self::DEFAULT_SEED) }
}

impl Spawner for LfsrSpawner {
    fn spawn(&mut self, board: &mut Board) -> Option<Spawned> {
        let state = self.clock();
        let empty = board.count_empty();
        if empty == 0 { return None; }
        let tile = if (state >> 8) % 10 == 0 { Tile::FOUR } else { Tile::TWO };
        place_nth(board, usize::from(state) % empty, tile)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("invalid spawn letter {0:?} (expected a-p for a 2, A-P for a 4)")]
    Letter(char),
}

/// Manual placements read from a script.
///
/// Letters `a..=p` put a 2 on cell 0..=15, `A..=P` put a 4. Entries that
/// target an occupied cell are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptedSpawner {
    queue: VecDeque<Spawned>,
}

impl ScriptedSpawner {
    pub fn new(placements: impl IntoIterator<Item = Spawned>) -> Self {
        ScriptedSpawner { queue: placements.into_iter().collect() }
    }

    /// Placements not consumed yet.
    pub fn remaining(&self) -> usize { self.queue.len() }
}

impl FromStr for ScriptedSpawner {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut queue = VecDeque::new();
        for c in s.chars().filter(|c| !c.is_whitespace()) {
            let (base, tile) = match c {
                'a'..='p' => (b'a', Tile::TWO),
                'A'..='P' => (b'A', Tile::FOUR),
                _ => return Err(ScriptError::Letter(c)),
            };
            let index = usize::from(c as u8 - base);
            debug_assert!(index < CELLS);
            queue.push_back(Spawned { index, tile });
        }
        Ok(ScriptedSpawner { queue })
    }
}

impl Spawner for ScriptedSpawner {
    fn spawn(&mut self, board: &mut Board) -> Option<Spawned> {
        while let Some(next) = self.queue.pop_front() {
            if board.get(next.index).is_none() {
                board.set(next.index, Some(next.tile));
                return Some(next);
            }
            debug!(index = next.index, "scripted spawn skipped occupied cell");
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_fills_board_then_stops() {
        let mut spawner = RandomSpawner::seeded(7);
        let mut board = Board::EMPTY;
        for filled in 1..=CELLS {
            let before = board;
            let s = spawner.spawn(&mut board).unwrap();
            assert_eq!(before.get(s.index), None);
            assert_eq!(board.get(s.index), Some(s.tile));
            assert_eq!(board.count_empty(), CELLS - filled);
        }
        assert_eq!(spawner.spawn(&mut board), None);
    }

    #[test]
    fn it_mostly_spawns_twos() {
        let mut spawner = RandomSpawner::seeded(42);
        let mut fours = 0;
        for _ in 0..10_000 {
            let mut board = Board::EMPTY;
            let s = spawner.spawn(&mut board).unwrap();
            assert!(s.tile == Tile::TWO || s.tile == Tile::FOUR);
            if s.tile == Tile::FOUR { fours += 1; }
        }
        assert!((700..1300).contains(&fours), "fours = {fours}");
    }

    #[test]
    fn it_clocks_lfsr() {
        let mut lfsr = LfsrSpawner::default();
        let seq: Vec<u16> = (0..5).map(|_| lfsr.clock()).collect();
        assert_eq!(seq, vec![0x44c4, 0x2262, 0x1131, 0x0898, 0x044c]);
        assert_eq!(LfsrSpawner::new(0).state(), LfsrSpawner::DEFAULT_SEED);
    }

    #[test]
    fn it_spawns_from_lfsr_deterministically() {
        let mut lfsr = LfsrSpawner::default();
        let mut board = Board::EMPTY;
        let got: Vec<usize> = (0..3).map(|_| lfsr.spawn(&mut board).unwrap().index).collect();
        assert_eq!(got, vec![4, 13, 6]);
        assert_eq!(board.count_empty(), 13);
    }

    #[test]
    fn it_follows_script_and_skips_occupied() {
        let mut spawner: ScriptedSpawner = "aAc P".parse().unwrap();
        assert_eq!(spawner.remaining(), 4);
        let mut board = Board::EMPTY;
        assert_eq!(spawner.spawn(&mut board), Some(Spawned { index: 0, tile: Tile::TWO }));
        // 'A' targets cell 0 again and is skipped.
        assert_eq!(spawner.spawn(&mut board), Some(Spawned { index: 2, tile: Tile::TWO }));
        assert_eq!(spawner.spawn(&mut board), Some(Spawned { index: 15, tile: Tile::FOUR }));
        assert_eq!(spawner.spawn(&mut board), None);
        assert_eq!(board.to_symbols(), "1 1            2");
    }

    #[test]
    fn it_rejects_bad_script() {
        assert_eq!("abq".parse::<ScriptedSpawner>(), Err(ScriptError::Letter('q')));
    }
}
