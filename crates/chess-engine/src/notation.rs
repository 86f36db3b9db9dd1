//! Coordinate move notation.
//!
//! Moves render as `<Piece><from>-<to>` with pawns carrying no letter
//! (`Ng1-f3`, `e2-e4`), an appended promotion letter (`e7-e8Q`), or `O-O` /
//! `O-O-O` for castling. This module parses that format back into a
//! [`MoveRequest`] and matches requests against a legal-move list.

use chess_core::{Move, PieceKind, Square};
use std::fmt;
use thiserror::Error;

/// Error type for notation parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotationError {
    #[error("empty notation string")]
    Empty,

    #[error("unknown piece letter '{0}'")]
    UnknownPiece(char),

    #[error("invalid square '{0}'")]
    InvalidSquare(String),

    #[error("expected '<from>-<to>', got '{0}'")]
    MissingSeparator(String),

    #[error("invalid promotion piece '{0}'")]
    InvalidPromotion(char),
}

/// A parsed but not yet validated move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRequest {
    Squares {
        /// The piece letter given, if any. `None` means "any piece".
        piece: Option<PieceKind>,
        start: Square,
        end: Square,
        promotion: Option<PieceKind>,
    },
    Castle {
        kingside: bool,
    },
}

impl MoveRequest {
    /// The promotion kind spelled out in the request.
    pub fn promotion(&self) -> Option<PieceKind> {
        match *self {
            MoveRequest::Squares { promotion, .. } => promotion,
            MoveRequest::Castle { .. } => None,
        }
    }

    /// Returns true if `m` is the move this request names.
    pub fn matches(&self, m: &Move) -> bool {
        match *self {
            MoveRequest::Castle { kingside } => m.is_castle() && m.is_kingside_castle() == kingside,
            MoveRequest::Squares {
                piece, start, end, ..
            } => {
                m.start() == start
                    && m.end() == end
                    && piece.map_or(true, |kind| kind == m.piece_moved().kind)
            }
        }
    }

    /// Finds the move this request names in a legal-move list.
    pub fn find_in(&self, moves: &[Move]) -> Option<Move> {
        moves.iter().find(|m| self.matches(m)).copied()
    }
}

impl fmt::Display for MoveRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MoveRequest::Castle { kingside: true } => write!(f, "O-O"),
            MoveRequest::Castle { kingside: false } => write!(f, "O-O-O"),
            MoveRequest::Squares {
                piece,
                start,
                end,
                promotion,
            } => {
                if let Some(letter) = piece.and_then(PieceKind::notation_letter) {
                    write!(f, "{}", letter)?;
                }
                write!(f, "{}-{}", start, end)?;
                if let Some(letter) = promotion.and_then(PieceKind::notation_letter) {
                    write!(f, "{}", letter)?;
                }
                Ok(())
            }
        }
    }
}

/// Strips one trailing status suffix (`++`, `+`, `#`, `$`).
fn strip_status_suffix(s: &str) -> &str {
    if let Some(rest) = s.strip_suffix("++") {
        return rest;
    }
    s.strip_suffix(&['+', '#', '$'][..]).unwrap_or(s)
}

/// Parses a notation string into a move request.
pub fn parse_notation(text: &str) -> Result<MoveRequest, NotationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(NotationError::Empty);
    }
    let text = strip_status_suffix(text);

    match text {
        "O-O" | "0-0" => return Ok(MoveRequest::Castle { kingside: true }),
        "O-O-O" | "0-0-0" => return Ok(MoveRequest::Castle { kingside: false }),
        _ => {}
    }

    let mut chars = text.chars();
    let first = chars.next().ok_or(NotationError::Empty)?;
    let (piece, rest) = if first.is_ascii_uppercase() || first == 'p' {
        let kind = PieceKind::from_letter(first).ok_or(NotationError::UnknownPiece(first))?;
        (Some(kind), chars.as_str())
    } else {
        (None, text)
    };

    let (from, to) = rest
        .split_once('-')
        .ok_or_else(|| NotationError::MissingSeparator(text.to_string()))?;
    let start =
        Square::from_algebraic(from).ok_or_else(|| NotationError::InvalidSquare(from.to_string()))?;

    let dest = to
        .get(..2)
        .ok_or_else(|| NotationError::InvalidSquare(to.to_string()))?;
    let end =
        Square::from_algebraic(dest).ok_or_else(|| NotationError::InvalidSquare(to.to_string()))?;

    let mut tail = to[2..].chars();
    let promotion = match (tail.next(), tail.next()) {
        (None, _) => None,
        (Some(c), None) => {
            let kind = PieceKind::from_letter(c.to_ascii_uppercase())
                .filter(|k| k.is_promotion_target())
                .ok_or(NotationError::InvalidPromotion(c))?;
            Some(kind)
        }
        (Some(_), Some(_)) => return Err(NotationError::InvalidSquare(to.to_string())),
    };

    Ok(MoveRequest::Squares {
        piece,
        start,
        end,
        promotion,
    })
}
