//! Chess rules engine.
//!
//! This crate provides:
//! - [`GameState`] - the authoritative board, side to move, logs and status flags
//! - [`MoveGenerator`] - pseudo-legal move enumeration that honours pins
//! - [`attacks`] - pin, check and attacked-square detection by ray casting
//! - [`Game`] - a move-request session producing commentary lines
//! - Coordinate notation parsing ([`parse_notation`]) and perft
//!
//! # Architecture
//!
//! The board is a plain 8x8 mailbox. Legal moves are found in two steps:
//! a scan outward from the king finds pins and checks, then the generator
//! produces moves that respect the pins. In check, non-king moves are kept
//! only if they capture the checker or block the line. King steps and
//! en-passant captures are verified by playing them and taking them back.
//!
//! The library logs through `tracing` and never installs a subscriber.
//!
//! # Example
//!
//! ```
//! use chess_engine::{Game, GameState};
//!
//! let mut state = GameState::new();
//! println!("Legal moves from starting position: {}", state.valid_moves().len());
//!
//! let mut game = Game::new();
//! game.play_notation("e2-e4", None).unwrap();
//! let reply = game.play_notation("e7-e5", None).unwrap();
//! assert_eq!(reply.commentary, "1... e7-e5");
//! println!("Position after 1. e2-e4 e7-e5: {}", game.state().to_fen());
//! ```

mod config;
mod error;
mod game;
pub mod movegen;
pub mod notation;
mod state;

pub use config::{ConfigError, GameConfig};
pub use error::MoveError;
pub use game::{Game, MoveRecord, Snapshot};
pub use movegen::attacks::{self, AttackReport, Check, Direction, Pins};
pub use movegen::perft::{perft, perft_divide};
pub use movegen::MoveGenerator;
pub use notation::{parse_notation, MoveRequest, NotationError};
pub use state::{GameState, Status};
