//! Board model and the shift-register move engine.
//!
//! - [`state`]: `Tile`, `Cell` and the 16-cell `Board`.
//! - [`lane`]: (lane, position, direction) -> cell index.
//! - [`memory`]: forward-only cursor with access cost, and the `Memory` facade.
//! - [`shift`]: the two-register state machine that slides and merges tiles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod lane;
pub mod memory;
pub mod shift;
pub mod state;

pub use memory::{Cursor, CursorStats, Memory};
pub use shift::{compact, MoveOutcome};
pub use state::{Board, Cell, Tile, CELLS};

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// The direction seen in a left/right mirror.
    pub fn mirrored(self) -> Move {
        match self {
            Move::Left => Move::Right,
            Move::Right => Move::Left,
            other => other,
        }
    }

    /// The direction seen in an up/down mirror.
    pub fn flipped(self) -> Move {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            other => other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Move::Up => "↑",
            Move::Down => "↓",
            Move::Left => "←",
            Move::Right => "→",
        }
    }

    /// Single-character form used in move scripts: `u d l r` (any case) or arrows.
    pub fn from_char(c: char) -> Option<Move> {
        match c {
            'u' | 'U' | '↑' => Some(Move::Up),
            'd' | 'D' | '↓' => Some(Move::Down),
            'l' | 'L' | '←' => Some(Move::Left),
            'r' | 'R' | '→' => Some(Move::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Move::Up => "UP",
            Move::Down => "DOWN",
            Move::Left => "LEFT",
            Move::Right => "RIGHT",
        };
        f.write_str(name)
    }
}

impl FromStr for Move {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if let Some(m) = Move::from_char(c) { return Ok(m); }
        }
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(Move::Up),
            "down" => Ok(Move::Down),
            "left" => Ok(Move::Left),
            "right" => Ok(Move::Right),
            _ => Err(ParseError::Move(s.to_string())),
        }
    }
}

/// Errors from parsing boards, tiles, scores and moves.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("board must have {expected} cells, got {found}")]
    BoardLength { expected: usize, found: usize },
    #[error("invalid cell symbol {0:?}")]
    Symbol(char),
    #[error("invalid rank {0} (expected 0..=17)")]
    Rank(u8),
    #[error("invalid score {0:?}")]
    Score(String),
    #[error("unknown move {0:?}")]
    Move(String),
}

/// Parse a move script such as `"LLURD"` or `"←↑"`. Whitespace is ignored.
pub fn parse_moves(script: &str) -> Result<Vec<Move>, ParseError> {
    script
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| Move::from_char(c).ok_or_else(|| ParseError::Move(c.to_string())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_parses_moves() {
        assert_eq!("l".parse::<Move>(), Ok(Move::Left));
        assert_eq!("Down".parse::<Move>(), Ok(Move::Down));
        assert_eq!("→".parse::<Move>(), Ok(Move::Right));
        assert!("sideways".parse::<Move>().is_err());
        assert_eq!(parse_moves("lu ↓R").unwrap(), vec![Move::Left, Move::Up, Move::Down, Move::Right]);
        assert_eq!(parse_moves("lx"), Err(ParseError::Move("x".into())));
    }

    #[test]
    fn it_mirrors_directions() {
        assert_eq!(Move::Left.mirrored(), Move::Right);
        assert_eq!(Move::Up.mirrored(), Move::Up);
        assert_eq!(Move::Up.flipped(), Move::Down);
        assert_eq!(Move::Right.flipped(), Move::Right);
    }
}
