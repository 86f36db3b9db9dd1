//! Core types for chess.
//!
//! This crate provides the fundamental value types used by the rules engine:
//! - [`Piece`], [`PieceKind`] and [`Color`] for piece representation
//! - [`Square`] for board coordinates (row 0 is Black's back rank)
//! - [`Board`], the 8x8 grid of cells
//! - [`CastleRights`] and [`Move`] for per-ply bookkeeping
//! - FEN position setup

mod board;
mod castle;
mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use board::Board;
pub use castle::CastleRights;
pub use color::Color;
pub use fen::{Fen, FenError};
pub use mov::Move;
pub use piece::{Piece, PieceKind};
pub use square::Square;
