//! Lane indexer: (lane, position, direction) -> cell index.
//!
//! Storage is laid out as a 16-cell shift register, index 15 top-left and
//! index 0 bottom-right:
//!
//! ```text
//!   f e d c
//!   b a 9 8
//!   7 6 5 4
//!   3 2 1 0
//! ```
//!
//! Position 0 of a lane is the cell nearest the edge the tiles move toward.

use super::Move;

/// Number of lanes per direction.
pub const LANES: usize = 4;
/// Number of cells in one lane.
pub const LANE_LEN: usize = 4;

/// Cell index for `pos` in `lane` when moving in `dir`.
///
/// A bijection over the 4 positions of each lane, and over all 16 cells per direction.
///
/// ```
/// use emu2048::engine::{lane, Move};
/// assert_eq!(lane::index(0, 0, Move::Left), 3);
/// assert_eq!(lane::index(0, 0, Move::Right), 0);
/// assert_eq!(lane::index(0, 0, Move::Up), 12);
/// assert_eq!(lane::index(0, 0, Move::Down), 0);
/// ```
#[inline]
pub fn index(lane: usize, pos: usize, dir: Move) -> usize {
    debug_assert!(lane < LANES && pos < LANE_LEN);
    match dir {
        Move::Left => lane * LANE_LEN + (LANE_LEN - 1 - pos),
        Move::Right => lane * LANE_LEN + pos,
        Move::Up => lane + (LANE_LEN - 1 - pos) * LANE_LEN,
        Move::Down => lane + pos * LANE_LEN,
    }
}

/// The 4 cell indices of `lane`, position 0 first.
#[inline]
pub fn indices(lane: usize, dir: Move) -> [usize; LANE_LEN] {
    [index(lane, 0, dir), index(lane, 1, dir), index(lane, 2, dir), index(lane, 3, dir)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Board;

    #[test]
    fn it_is_a_bijection_per_direction() {
        for dir in Move::ALL {
            let mut seen = [false; LANES * LANE_LEN];
            for lane in 0..LANES {
                for pos in 0..LANE_LEN {
                    let idx = index(lane, pos, dir);
                    assert!(!seen[idx], "{dir:?} maps two positions to {idx}");
                    seen[idx] = true;
                }
            }
            assert!(seen.iter().all(|&s| s));
        }
    }

    #[test]
    fn it_reads_lanes_toward_the_edge() {
        // 1 is the bottom-right cell, g the top-left one.
        let b: Board = "123456789abcdefg".parse().unwrap();
        let lane = |lane: usize, dir: Move| -> String {
            indices(lane, dir).iter().map(|&i| b.get(i).unwrap().symbol()).collect()
        };
        assert_eq!(lane(0, Move::Left), "4321");
        assert_eq!(lane(3, Move::Left), "gfed");
        assert_eq!(lane(0, Move::Right), "1234");
        assert_eq!(lane(2, Move::Right), "9abc");
        assert_eq!(lane(0, Move::Up), "d951");
        assert_eq!(lane(3, Move::Up), "gc84");
        assert_eq!(lane(0, Move::Down), "159d");
        assert_eq!(lane(1, Move::Down), "26ae");
    }

    #[test]
    fn it_mirrors_left_right() {
        for lane in 0..LANES {
            for pos in 0..LANE_LEN {
                let l = index(lane, pos, Move::Left);
                let r = index(lane, pos, Move::Right);
                assert_eq!(l / 4, r / 4);
                assert_eq!(l % 4, 3 - r % 4);
            }
        }
    }
}
