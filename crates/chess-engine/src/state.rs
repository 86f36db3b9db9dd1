//! Authoritative game state: board, logs, and legal-move filtering.

use crate::movegen::attacks::{self, AttackReport};
use crate::movegen::MoveGenerator;
use crate::notation::MoveRequest;
use crate::MoveError;
use chess_core::{Board, CastleRights, Color, Fen, FenError, Move, Piece, PieceKind, Square};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// The four status flags, as of the last call to
/// [`GameState::valid_moves`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Status {
    pub in_check: bool,
    pub in_double_check: bool,
    pub checkmate: bool,
    pub stalemate: bool,
}

impl Status {
    /// Commentary suffix: `#` mate, `$` stalemate, `++` double check, `+` check.
    pub const fn suffix(self) -> &'static str {
        if self.checkmate {
            "#"
        } else if self.stalemate {
            "$"
        } else if self.in_double_check {
            "++"
        } else if self.in_check {
            "+"
        } else {
            ""
        }
    }
}

/// The state of one game.
///
/// Mutated in place by [`make_move`](Self::make_move) and
/// [`undo_move`](Self::undo_move). Every ply pushes onto the move, en-passant
/// and castle-rights logs; undo pops them, so make followed by undo restores
/// the state exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    side_to_move: Color,
    move_log: Vec<Move>,
    en_passant_possible: Option<Square>,
    en_passant_log: Vec<Option<Square>>,
    castle_rights: CastleRights,
    castle_rights_log: Vec<CastleRights>,
    white_king: Square,
    black_king: Square,
    halfmove_clock: u32,
    halfmove_log: Vec<u32>,
    fullmove_number: u32,
    status: Status,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Creates the standard starting position.
    pub fn new() -> Self {
        Self::from_parts(Fen::default())
    }

    /// Creates a state from a FEN string. Both kings must be present.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parsed = Fen::parse(fen)?;
        for color in [Color::White, Color::Black] {
            if parsed.board.find_king(color).is_none() {
                return Err(FenError::MissingKing(color));
            }
        }
        let state = Self::from_parts(parsed);
        let them = state.side_to_move.opposite();
        if state.square_under_attack(state.side_to_move, state.king_location(them)) {
            return Err(FenError::OpponentInCheck(them));
        }
        Ok(state)
    }

    fn from_parts(fen: Fen) -> Self {
        let king = |color| {
            fen.board
                .find_king(color)
                .unwrap_or_else(|| panic!("no {} king on the board", color))
        };
        GameState {
            white_king: king(Color::White),
            black_king: king(Color::Black),
            side_to_move: fen.side_to_move,
            move_log: Vec::new(),
            en_passant_possible: fen.en_passant,
            en_passant_log: vec![fen.en_passant],
            castle_rights: fen.castling,
            castle_rights_log: vec![fen.castling],
            halfmove_clock: fen.halfmove_clock,
            halfmove_log: Vec::new(),
            fullmove_number: fen.fullmove_number,
            status: Status::default(),
            board: fen.board,
        }
    }

    /// Returns the position as a FEN string.
    pub fn to_fen(&self) -> String {
        Fen {
            board: self.board.clone(),
            side_to_move: self.side_to_move,
            castling: self.castle_rights,
            en_passant: self.en_passant_possible,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
        .to_string()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn white_to_move(&self) -> bool {
        self.side_to_move == Color::White
    }

    /// Moves played so far, oldest first, with any promotion choice attached.
    pub fn move_log(&self) -> &[Move] {
        &self.move_log
    }

    /// The square a pawn may capture onto en passant this ply, if any.
    pub fn en_passant_possible(&self) -> Option<Square> {
        self.en_passant_possible
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    pub fn castle_rights(&self) -> CastleRights {
        self.castle_rights
    }

    /// Returns the cached king square for a color.
    pub fn king_location(&self, color: Color) -> Square {
        match color {
            Color::White => self.white_king,
            Color::Black => self.black_king,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn in_check(&self) -> bool {
        self.status.in_check
    }

    pub fn in_double_check(&self) -> bool {
        self.status.in_double_check
    }

    pub fn checkmate(&self) -> bool {
        self.status.checkmate
    }

    pub fn stalemate(&self) -> bool {
        self.status.stalemate
    }

    /// Plays a move produced by [`valid_moves`](Self::valid_moves).
    ///
    /// Legality is not re-checked. A promotion move needs a promotion kind,
    /// either passed here or already attached to the move; without one the
    /// state is left untouched and [`MoveError::PromotionChoiceMissing`] is
    /// returned. The promotion argument is ignored for other moves.
    pub fn make_move(&mut self, mv: Move, promotion: Option<PieceKind>) -> Result<(), MoveError> {
        let mv = if mv.is_pawn_promotion() {
            let kind = promotion
                .or(mv.promotion())
                .ok_or_else(|| MoveError::PromotionChoiceMissing(mv.to_notation()))?;
            if !kind.is_promotion_target() {
                return Err(MoveError::InvalidPromotionPiece(kind));
            }
            mv.with_promotion(kind)
        } else {
            mv
        };
        self.apply(mv);
        debug!(ply = self.move_log.len(), mv = %mv, "move made");
        Ok(())
    }

    /// Takes back the last move. Does nothing if no move has been made.
    pub fn undo_move(&mut self) {
        if let Some(mv) = self.revert() {
            debug!(ply = self.move_log.len() + 1, mv = %mv, "move undone");
            self.status.checkmate = false;
            self.status.stalemate = false;
        }
    }

    /// Applies a move whose promotion, if any, is already attached.
    pub(crate) fn apply(&mut self, mv: Move) {
        let us = mv.mover();
        let them = us.opposite();
        let start = mv.start();
        let end = mv.end();
        debug_assert!(!mv.is_pawn_promotion() || mv.promotion().is_some());
        debug_assert!(
            mv.piece_captured().map_or(true, |p| p.kind != PieceKind::King),
            "{} captures a king",
            mv
        );

        let placed = match mv.promotion() {
            Some(kind) if mv.is_pawn_promotion() => Piece::new(us, kind),
            _ => mv.piece_moved(),
        };
        self.board.set(start, None);
        self.board.set(end, Some(placed));
        self.move_log.push(mv);
        self.side_to_move = them;

        if mv.piece_moved().kind == PieceKind::King {
            self.set_king_location(us, end);
        }

        if mv.is_en_passant() {
            self.board.set(mv.en_passant_victim(), None);
        }

        self.en_passant_possible = if mv.is_double_push() {
            Square::new((start.row() + end.row()) / 2, start.col())
        } else {
            None
        };
        self.en_passant_log.push(self.en_passant_possible);

        if mv.is_castle() {
            let (rook_from, rook_to) = castle_rook_squares(mv);
            let rook = self.board.set(rook_from, None);
            self.board.set(rook_to, rook);
        }

        self.update_castle_rights(mv);
        self.castle_rights_log.push(self.castle_rights);

        self.halfmove_log.push(self.halfmove_clock);
        if mv.piece_moved().kind == PieceKind::Pawn || mv.piece_captured().is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if us == Color::Black {
            self.fullmove_number += 1;
        }
    }

    /// Exact inverse of [`apply`](Self::apply) for the last logged move.
    pub(crate) fn revert(&mut self) -> Option<Move> {
        let mv = self.move_log.pop()?;
        let us = mv.mover();

        self.board.set(mv.start(), Some(mv.piece_moved()));
        if mv.is_en_passant() {
            self.board.set(mv.end(), None);
            self.board.set(mv.en_passant_victim(), mv.piece_captured());
        } else {
            self.board.set(mv.end(), mv.piece_captured());
        }
        self.side_to_move = us;

        if mv.piece_moved().kind == PieceKind::King {
            self.set_king_location(us, mv.start());
        }

        self.en_passant_log.pop();
        self.en_passant_possible = self.en_passant_log.last().copied().flatten();

        self.castle_rights_log.pop();
        if let Some(rights) = self.castle_rights_log.last() {
            self.castle_rights = *rights;
        }

        if mv.is_castle() {
            let (rook_from, rook_to) = castle_rook_squares(mv);
            let rook = self.board.set(rook_to, None);
            self.board.set(rook_from, rook);
        }

        if let Some(clock) = self.halfmove_log.pop() {
            self.halfmove_clock = clock;
        }
        if us == Color::Black {
            self.fullmove_number -= 1;
        }
        Some(mv)
    }

    fn set_king_location(&mut self, color: Color, sq: Square) {
        match color {
            Color::White => self.white_king = sq,
            Color::Black => self.black_king = sq,
        }
    }

    fn update_castle_rights(&mut self, mv: Move) {
        let us = mv.mover();
        match mv.piece_moved().kind {
            PieceKind::King => self.castle_rights.remove_color(us),
            PieceKind::Rook if mv.start().row() == us.back_row() => match mv.start().col() {
                0 => self.castle_rights.remove_queenside(us),
                7 => self.castle_rights.remove_kingside(us),
                _ => {}
            },
            _ => {}
        }

        // A rook captured on its corner takes its side's right with it.
        if let Some(captured) = mv.piece_captured() {
            let them = captured.color;
            if captured.kind == PieceKind::Rook && mv.end().row() == them.back_row() {
                match mv.end().col() {
                    0 => self.castle_rights.remove_queenside(them),
                    7 => self.castle_rights.remove_kingside(them),
                    _ => {}
                }
            }
        }
    }

    /// Scans for pins and checks against the side to move's king.
    pub fn check_for_pins_and_checks(&self) -> AttackReport {
        let us = self.side_to_move;
        attacks::check_for_pins_and_checks(&self.board, self.king_location(us), us)
    }

    /// Returns true if `attacker` attacks the square.
    pub fn square_under_attack(&self, attacker: Color, sq: Square) -> bool {
        attacks::square_attacked(&self.board, sq, attacker)
    }

    /// Generates every legal move for the side to move and refreshes the
    /// status flags.
    pub fn valid_moves(&mut self) -> Vec<Move> {
        let us = self.side_to_move;
        let king = self.king_location(us);
        let report = self.check_for_pins_and_checks();

        let mut moves = Vec::with_capacity(48);
        let generator = MoveGenerator::new(&self.board, us, &report.pins, self.en_passant_possible);
        if report.in_double_check {
            // Only the king can answer two checkers.
            generator.piece_moves(king, PieceKind::King, &mut moves);
        } else {
            generator.generate(&mut moves);
            if let Some(check) = report.checks.first() {
                let resolving = check.resolving_squares(king);
                moves.retain(|m| {
                    m.piece_moved().kind == PieceKind::King
                        || m.is_en_passant()
                        || resolving.contains(&m.end())
                });
            } else {
                generator.castle_moves(king, self.castle_rights, &mut moves);
            }
        }

        // King steps and en-passant captures are settled by playing them.
        moves.retain(|m| {
            let simulate =
                (m.piece_moved().kind == PieceKind::King && !m.is_castle()) || m.is_en_passant();
            !simulate || self.leaves_king_safe(*m)
        });

        self.status = Status {
            in_check: report.in_check,
            in_double_check: report.in_double_check,
            checkmate: moves.is_empty() && report.in_check,
            stalemate: moves.is_empty() && !report.in_check,
        };
        trace!(count = moves.len(), side = %us, "legal moves generated");
        if self.status.checkmate {
            debug!(loser = %us, "checkmate");
        } else if self.status.stalemate {
            debug!(side = %us, "stalemate");
        }
        moves
    }

    /// Plays `mv`, tests whether the mover's king is attacked, and takes the
    /// move back.
    fn leaves_king_safe(&mut self, mv: Move) -> bool {
        let us = mv.mover();
        self.apply(mv);
        let safe = !attacks::square_attacked(&self.board, self.king_location(us), us.opposite());
        self.revert();
        safe
    }

    /// Finds the legal move named by a request.
    pub fn resolve(&mut self, request: &MoveRequest) -> Result<Move, MoveError> {
        request
            .find_in(&self.valid_moves())
            .ok_or_else(|| MoveError::IllegalMoveRequested(request.to_string()))
    }
}

/// Rook origin and destination for a castling move.
fn castle_rook_squares(mv: Move) -> (Square, Square) {
    let row = mv.end().row();
    let (from_col, to_col) = if mv.is_kingside_castle() {
        (7, mv.end().col() - 1)
    } else {
        (0, mv.end().col() + 1)
    };
    match (Square::new(row, from_col), Square::new(row, to_col)) {
        (Some(from), Some(to)) => (from, to),
        _ => unreachable!("castling squares are on the back rank"),
    }
}
