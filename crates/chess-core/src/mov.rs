//! Move representation.

use crate::{Board, Color, Piece, PieceKind, Square};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A single ply.
///
/// A move is built from its start and end squares and the board as it stands
/// *before* the move is made: the moved and captured pieces are read off the
/// board at construction. Build moves before mutating the board.
///
/// Identity is the coordinate pair only. Flags and the promotion choice are not
/// compared, so a move requested by coordinates equals the generated move with
/// the same squares.
#[derive(Clone, Copy)]
pub struct Move {
    start: Square,
    end: Square,
    piece_moved: Piece,
    piece_captured: Option<Piece>,
    en_passant: bool,
    castle: bool,
    promotion: Option<PieceKind>,
}

impl Move {
    /// Creates an ordinary move (including captures and promotions).
    ///
    /// Returns `None` if `start` is empty on `board`.
    pub fn new(start: Square, end: Square, board: &Board) -> Option<Self> {
        let piece_moved = board.get(start)?;
        Some(Move {
            start,
            end,
            piece_moved,
            piece_captured: board.get(end),
            en_passant: false,
            castle: false,
            promotion: None,
        })
    }

    /// Creates an en-passant capture. The captured piece is read from the
    /// square beside `start`, not the (empty) destination.
    ///
    /// Returns `None` unless that square holds an enemy pawn.
    pub fn en_passant(start: Square, end: Square, board: &Board) -> Option<Self> {
        let mut m = Move::new(start, end, board)?;
        let victim = board.get(m.en_passant_victim())?;
        if victim.kind != PieceKind::Pawn || victim.color == m.piece_moved.color {
            return None;
        }
        m.en_passant = true;
        m.piece_captured = Some(victim);
        Some(m)
    }

    /// Creates a castling move, expressed as the king's two-square step.
    pub fn castle(start: Square, end: Square, board: &Board) -> Option<Self> {
        let mut m = Move::new(start, end, board)?;
        m.castle = true;
        Some(m)
    }

    /// Returns a copy of this move carrying the chosen promotion kind.
    #[inline]
    pub const fn with_promotion(mut self, kind: PieceKind) -> Self {
        self.promotion = Some(kind);
        self
    }

    #[inline]
    pub const fn start(self) -> Square {
        self.start
    }

    #[inline]
    pub const fn end(self) -> Square {
        self.end
    }

    #[inline]
    pub const fn piece_moved(self) -> Piece {
        self.piece_moved
    }

    #[inline]
    pub const fn piece_captured(self) -> Option<Piece> {
        self.piece_captured
    }

    #[inline]
    pub const fn mover(self) -> Color {
        self.piece_moved.color
    }

    /// True if a pawn reaches the far rank.
    #[inline]
    pub const fn is_pawn_promotion(self) -> bool {
        matches!(self.piece_moved.kind, PieceKind::Pawn)
            && self.end.row() == self.piece_moved.color.promotion_row()
    }

    #[inline]
    pub const fn is_en_passant(self) -> bool {
        self.en_passant
    }

    #[inline]
    pub const fn is_castle(self) -> bool {
        self.castle
    }

    /// True for a castle toward the h-file.
    #[inline]
    pub const fn is_kingside_castle(self) -> bool {
        self.castle && self.end.col() > self.start.col()
    }

    /// True for a pawn advancing two rows.
    #[inline]
    pub const fn is_double_push(self) -> bool {
        matches!(self.piece_moved.kind, PieceKind::Pawn)
            && self.start.row().abs_diff(self.end.row()) == 2
    }

    /// The promotion kind chosen for this move, once one has been chosen.
    #[inline]
    pub const fn promotion(self) -> Option<PieceKind> {
        self.promotion
    }

    /// The square of the pawn removed by an en-passant capture: same row as
    /// the start, same column as the end.
    #[inline]
    pub fn en_passant_victim(self) -> Square {
        match Square::new(self.start.row(), self.end.col()) {
            Some(sq) => sq,
            None => unreachable!("start row and end column are on the board"),
        }
    }

    /// Renders the move as `<Piece><from>-<to>`, e.g. `Ng1-f3` or `e2-e4`.
    ///
    /// Pawns carry no letter, castling renders as `O-O` / `O-O-O`, and a chosen
    /// promotion is appended as its letter (`e7-e8Q`).
    pub fn to_notation(self) -> String {
        if self.castle {
            return if self.is_kingside_castle() {
                "O-O".to_string()
            } else {
                "O-O-O".to_string()
            };
        }
        let mut s = String::with_capacity(7);
        if let Some(letter) = self.piece_moved.kind.notation_letter() {
            s.push(letter);
        }
        s.push_str(&format!("{}-{}", self.start, self.end));
        if let Some(letter) = self.promotion.and_then(PieceKind::notation_letter) {
            s.push(letter);
        }
        s
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.start.hash(state);
        self.end.hash(state);
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self.to_notation())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_notation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn reads_pieces_from_board() {
        let board = Board::standard();
        let m = Move::new(sq("g1"), sq("f3"), &board).unwrap();
        assert_eq!(m.piece_moved(), Piece::new(Color::White, PieceKind::Knight));
        assert_eq!(m.piece_captured(), None);
        assert_eq!(m.mover(), Color::White);
        assert!(!m.is_pawn_promotion());
    }

    #[test]
    fn notation() {
        let board = Board::standard();
        assert_eq!(Move::new(sq("g1"), sq("f3"), &board).unwrap().to_notation(), "Ng1-f3");
        assert_eq!(Move::new(sq("e2"), sq("e4"), &board).unwrap().to_notation(), "e2-e4");
        assert_eq!(Move::new(sq("e7"), sq("e5"), &board).unwrap().to_notation(), "e7-e5");
    }

    #[test]
    fn castle_notation() {
        let mut board = Board::empty();
        board.set(Square::E1, Some(Piece::new(Color::White, PieceKind::King)));
        board.set(Square::E8, Some(Piece::new(Color::Black, PieceKind::King)));
        assert_eq!(Move::castle(Square::E1, Square::G1, &board).unwrap().to_notation(), "O-O");
        assert_eq!(Move::castle(Square::E8, Square::C8, &board).unwrap().to_notation(), "O-O-O");
        assert!(Move::castle(Square::E1, Square::G1, &board).unwrap().is_kingside_castle());
    }

    #[test]
    fn promotion_flag_and_notation() {
        let mut board = Board::empty();
        board.set(sq("e7"), Some(Piece::new(Color::White, PieceKind::Pawn)));
        board.set(sq("d2"), Some(Piece::new(Color::Black, PieceKind::Pawn)));
        let white = Move::new(sq("e7"), sq("e8"), &board).unwrap();
        let black = Move::new(sq("d2"), sq("d1"), &board).unwrap();
        assert!(white.is_pawn_promotion());
        assert!(black.is_pawn_promotion());
        assert_eq!(white.to_notation(), "e7-e8");
        assert_eq!(white.with_promotion(PieceKind::Knight).to_notation(), "e7-e8N");
    }

    #[test]
    fn equality_ignores_promotion_and_flags() {
        let mut board = Board::empty();
        board.set(sq("e7"), Some(Piece::new(Color::White, PieceKind::Pawn)));
        let plain = Move::new(sq("e7"), sq("e8"), &board).unwrap();
        let queen = plain.with_promotion(PieceKind::Queen);
        let knight = plain.with_promotion(PieceKind::Knight);
        assert_eq!(queen, knight);
        assert_eq!(plain, queen);
    }

    #[test]
    fn en_passant_records_victim() {
        let mut board = Board::empty();
        board.set(sq("e5"), Some(Piece::new(Color::White, PieceKind::Pawn)));
        board.set(sq("d5"), Some(Piece::new(Color::Black, PieceKind::Pawn)));
        let m = Move::en_passant(sq("e5"), sq("d6"), &board).unwrap();
        assert!(m.is_en_passant());
        assert_eq!(
            m.piece_captured(),
            Some(Piece::new(Color::Black, PieceKind::Pawn))
        );
        assert_eq!(m.en_passant_victim(), sq("d5"));
    }

    #[test]
    fn double_push() {
        let board = Board::standard();
        assert!(Move::new(sq("e2"), sq("e4"), &board).unwrap().is_double_push());
        assert!(!Move::new(sq("e2"), sq("e3"), &board).unwrap().is_double_push());
        assert!(!Move::new(sq("b1"), sq("c3"), &board).unwrap().is_double_push());
    }

    #[test]
    fn move_from_empty_square_is_none() {
        let board = Board::standard();
        assert!(Move::new(sq("e4"), sq("e5"), &board).is_none());
        assert!(Move::castle(Square::F1, Square::G1, &Board::empty()).is_none());
    }

    #[test]
    fn en_passant_requires_enemy_pawn_beside() {
        let mut board = Board::empty();
        board.set(sq("e5"), Some(Piece::new(Color::White, PieceKind::Pawn)));
        assert!(Move::en_passant(sq("e5"), sq("d6"), &board).is_none());

        board.set(sq("d5"), Some(Piece::new(Color::Black, PieceKind::Knight)));
        assert!(Move::en_passant(sq("e5"), sq("d6"), &board).is_none());

        board.set(sq("d5"), Some(Piece::new(Color::White, PieceKind::Pawn)));
        assert!(Move::en_passant(sq("e5"), sq("d6"), &board).is_none());
    }
}
