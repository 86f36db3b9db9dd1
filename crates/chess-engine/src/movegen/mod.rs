//! Move generation.
//!
//! [`MoveGenerator`] enumerates pseudo-legal moves for the side to move,
//! already honouring pins from an [`AttackReport`]. It does not check king
//! safety for king steps or en-passant captures; [`GameState`] settles those
//! by playing the move and taking it back.
//!
//! [`GameState`]: crate::GameState

pub mod attacks;
pub mod perft;

use attacks::{square_attacked, Direction, Pins};
use chess_core::{Board, CastleRights, Color, Move, PieceKind, Square};

/// Pseudo-legal move enumeration for one position and one side.
pub struct MoveGenerator<'a> {
    board: &'a Board,
    us: Color,
    pins: &'a Pins,
    en_passant: Option<Square>,
}

impl<'a> MoveGenerator<'a> {
    pub fn new(board: &'a Board, us: Color, pins: &'a Pins, en_passant: Option<Square>) -> Self {
        MoveGenerator {
            board,
            us,
            pins,
            en_passant,
        }
    }

    /// Generates pseudo-legal moves for every piece of the side to move.
    pub fn generate(&self, moves: &mut Vec<Move>) {
        for (from, piece) in self.board.pieces() {
            if piece.color == self.us {
                self.piece_moves(from, piece.kind, moves);
            }
        }
    }

    /// Generates moves for the piece of the given kind on `from`.
    pub fn piece_moves(&self, from: Square, kind: PieceKind, moves: &mut Vec<Move>) {
        match kind {
            PieceKind::Pawn => self.pawn_moves(from, moves),
            PieceKind::Knight => self.knight_moves(from, moves),
            PieceKind::Bishop => self.slide(from, &Direction::DIAGONAL, moves),
            PieceKind::Rook => self.slide(from, &Direction::ORTHOGONAL, moves),
            PieceKind::Queen => {
                self.slide(from, &Direction::ORTHOGONAL, moves);
                self.slide(from, &Direction::DIAGONAL, moves);
            }
            PieceKind::King => self.king_moves(from, moves),
        }
    }

    fn pawn_moves(&self, from: Square, moves: &mut Vec<Move>) {
        let step = self.us.pawn_step();
        let forward = Direction { dr: step, dc: 0 };

        if self.pins.allows(from, forward) {
            if let Some(one) = forward.step(from, 1) {
                if self.board.is_empty(one) {
                    moves.extend(Move::new(from, one, self.board));
                    if from.row() == self.us.pawn_row() {
                        if let Some(two) = forward.step(from, 2) {
                            if self.board.is_empty(two) {
                                moves.extend(Move::new(from, two, self.board));
                            }
                        }
                    }
                }
            }
        }

        for dc in [-1, 1] {
            let capture = Direction { dr: step, dc };
            if !self.pins.allows(from, capture) {
                continue;
            }
            let Some(to) = capture.step(from, 1) else {
                continue;
            };
            match self.board.color_at(to) {
                Some(color) if color != self.us => moves.extend(Move::new(from, to, self.board)),
                // Only when an enemy pawn stands beside us on the target's file.
                None if self.en_passant == Some(to) => {
                    moves.extend(Move::en_passant(from, to, self.board))
                }
                _ => {}
            }
        }
    }

    fn knight_moves(&self, from: Square, moves: &mut Vec<Move>) {
        // A pinned knight can never stay on the pin line.
        if self.pins.get(from).is_some() {
            return;
        }
        for offset in Direction::KNIGHT {
            if let Some(to) = offset.step(from, 1) {
                if self.board.color_at(to) != Some(self.us) {
                    moves.extend(Move::new(from, to, self.board));
                }
            }
        }
    }

    fn slide(&self, from: Square, directions: &[Direction], moves: &mut Vec<Move>) {
        for &direction in directions {
            if !self.pins.allows(from, direction) {
                continue;
            }
            for distance in 1..8 {
                let Some(to) = direction.step(from, distance) else {
                    break;
                };
                match self.board.color_at(to) {
                    None => moves.extend(Move::new(from, to, self.board)),
                    Some(color) => {
                        if color != self.us {
                            moves.extend(Move::new(from, to, self.board));
                        }
                        break;
                    }
                }
            }
        }
    }

    /// King steps onto any square not held by a friendly piece. Whether the
    /// destination is safe is decided by the caller.
    fn king_moves(&self, from: Square, moves: &mut Vec<Move>) {
        for direction in Direction::ALL {
            if let Some(to) = direction.step(from, 1) {
                if self.board.color_at(to) != Some(self.us) {
                    moves.extend(Move::new(from, to, self.board));
                }
            }
        }
    }

    /// Generates castling moves for a king standing on `king`.
    ///
    /// The caller must not call this while the king is in check. The squares
    /// between king and rook must be empty, the rook must still stand on its
    /// corner, and the squares the king crosses and lands on must not be
    /// attacked.
    pub fn castle_moves(&self, king: Square, rights: CastleRights, moves: &mut Vec<Move>) {
        if king.row() != self.us.back_row() || king.col() != 4 {
            return;
        }
        if rights.can_castle_kingside(self.us) {
            self.castle_toward(king, 7, &[5, 6], &[5, 6], moves);
        }
        if rights.can_castle_queenside(self.us) {
            self.castle_toward(king, 0, &[1, 2, 3], &[3, 2], moves);
        }
    }

    fn castle_toward(
        &self,
        king: Square,
        rook_col: u8,
        empty_cols: &[u8],
        safe_cols: &[u8],
        moves: &mut Vec<Move>,
    ) {
        let row = king.row();
        let on_row = |col: u8| Square::new(row, col);

        let rook_home = on_row(rook_col).and_then(|sq| self.board.get(sq));
        if rook_home.map(|p| (p.color, p.kind)) != Some((self.us, PieceKind::Rook)) {
            return;
        }
        let clear = empty_cols
            .iter()
            .filter_map(|&col| on_row(col))
            .all(|sq| self.board.is_empty(sq));
        if !clear {
            return;
        }
        let them = self.us.opposite();
        let safe = safe_cols
            .iter()
            .filter_map(|&col| on_row(col))
            .all(|sq| !square_attacked(self.board, sq, them));
        if !safe {
            return;
        }
        let target_col = if rook_col > king.col() { 6 } else { 2 };
        if let Some(target) = on_row(target_col) {
            moves.extend(Move::castle(king, target, self.board));
        }
    }
}
