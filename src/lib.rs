//! emu2048: a 2048 move engine modelled on a sequential shift-register memory
//!
//! This crate provides:
//! - A 16-cell `Board` with one-symbol-per-cell string form (`engine` module)
//! - The two-register move engine that slides and merges tiles through a
//!   forward-only memory cursor, counting every access (`engine::shift`)
//! - A fixed-width digit-string `Score` (`score` module)
//! - Spawn policies: seeded random, LFSR and scripted (`spawn` module)
//! - `Game` sessions and their `GameConfig` (`game`, `config` modules)
//!
//! Quick start:
//! ```
//! use emu2048::engine::{Board, Move};
//! use emu2048::game::Game;
//!
//! let board: Board = "3311            ".parse().unwrap();
//! let mut game = Game::from_board(board);
//! let outcome = game.shift(Move::Left);
//! assert!(outcome.moved);
//! assert_eq!(game.board().to_symbols(), "  42            ");
//! assert_eq!(game.score().as_str(), "     20");
//! assert_eq!(game.stats().steps, 13);
//! ```
//!
//! With the `oracle` feature, a lookup-table reference (`oracle`) and the
//! shared move table (`fixtures`) are exported for cross-checking.
//!
pub mod config;
pub mod engine;
pub mod game;
pub mod score;
pub mod spawn;

#[cfg(any(test, feature = "oracle"))]
pub mod fixtures;
#[cfg(any(test, feature = "oracle"))]
pub mod oracle;
