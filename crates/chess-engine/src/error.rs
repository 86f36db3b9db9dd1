//! Errors surfaced to callers requesting moves.

use crate::notation::NotationError;
use chess_core::PieceKind;
use thiserror::Error;

/// Why a move request was refused. The game state is left untouched in
/// every case.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MoveError {
    /// The requested squares or notation match no legal move.
    #[error("illegal move: {0}")]
    IllegalMoveRequested(String),

    /// The notation string could not be read as a move.
    #[error("malformed notation: {0}")]
    MalformedNotation(#[from] NotationError),

    /// A promotion move was matched but no promotion piece was supplied.
    #[error("promotion piece required for {0}")]
    PromotionChoiceMissing(String),

    /// Pawns may not promote to pawns or kings.
    #[error("cannot promote to {0}")]
    InvalidPromotionPiece(PieceKind),
}
