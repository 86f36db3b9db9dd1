//! Pin and check detection by ray-casting from the king.
//!
//! From the king's square, a ray is walked in each of the 8 king directions.
//! The first friendly piece on a ray is a pin candidate; an enemy piece able to
//! attack along that ray then either pins the candidate or, with nothing in
//! between, gives check. Knights cannot be blocked, so the 8 knight offsets are
//! probed directly.

use chess_core::{Board, Color, Piece, PieceKind, Square};

/// A unit step on the board, as row and column deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Direction {
    pub dr: i8,
    pub dc: i8,
}

impl Direction {
    const fn new(dr: i8, dc: i8) -> Self {
        Direction { dr, dc }
    }

    pub const ORTHOGONAL: [Direction; 4] = [
        Direction::new(-1, 0),
        Direction::new(0, -1),
        Direction::new(1, 0),
        Direction::new(0, 1),
    ];

    pub const DIAGONAL: [Direction; 4] = [
        Direction::new(-1, -1),
        Direction::new(-1, 1),
        Direction::new(1, -1),
        Direction::new(1, 1),
    ];

    /// The 8 king directions, orthogonals first.
    pub const ALL: [Direction; 8] = [
        Direction::new(-1, 0),
        Direction::new(0, -1),
        Direction::new(1, 0),
        Direction::new(0, 1),
        Direction::new(-1, -1),
        Direction::new(-1, 1),
        Direction::new(1, -1),
        Direction::new(1, 1),
    ];

    pub const KNIGHT: [Direction; 8] = [
        Direction::new(-2, -1),
        Direction::new(-2, 1),
        Direction::new(-1, -2),
        Direction::new(-1, 2),
        Direction::new(1, -2),
        Direction::new(1, 2),
        Direction::new(2, -1),
        Direction::new(2, 1),
    ];

    #[inline]
    pub const fn reversed(self) -> Self {
        Direction::new(-self.dr, -self.dc)
    }

    #[inline]
    pub const fn is_orthogonal(self) -> bool {
        self.dr == 0 || self.dc == 0
    }

    /// Returns the square `distance` steps from `from`, if on the board.
    #[inline]
    pub fn step(self, from: Square, distance: i8) -> Option<Square> {
        from.offset(self.dr * distance, self.dc * distance)
    }
}

/// A piece giving check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Check {
    /// Where the checking piece stands.
    pub square: Square,
    /// Step from the king toward the checker (a knight offset for knights).
    pub direction: Direction,
    pub checker: PieceKind,
}

impl Check {
    /// Squares a non-king move may land on to resolve this check: the
    /// checker's square, plus the squares between it and the king unless the
    /// checker is a knight.
    pub fn resolving_squares(&self, king: Square) -> Vec<Square> {
        if self.checker == PieceKind::Knight {
            return vec![self.square];
        }
        let mut squares = Vec::with_capacity(7);
        for distance in 1..8 {
            match self.direction.step(king, distance) {
                Some(sq) => {
                    squares.push(sq);
                    if sq == self.square {
                        break;
                    }
                }
                None => break,
            }
        }
        squares
    }
}

/// Pin directions indexed by the pinned piece's square.
///
/// The stored direction points from the king toward the pinned piece; the
/// piece may move along it or its reverse, never off the line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pins {
    by_square: [[Option<Direction>; 8]; 8],
}

impl Pins {
    #[inline]
    pub fn get(&self, sq: Square) -> Option<Direction> {
        self.by_square[sq.row() as usize][sq.col() as usize]
    }

    fn insert(&mut self, sq: Square, direction: Direction) {
        self.by_square[sq.row() as usize][sq.col() as usize] = Some(direction);
    }

    /// Returns true if a piece on `sq` may travel in `direction`.
    #[inline]
    pub fn allows(&self, sq: Square, direction: Direction) -> bool {
        match self.get(sq) {
            None => true,
            Some(pin) => pin == direction || pin == direction.reversed(),
        }
    }

    pub fn len(&self) -> usize {
        self.by_square.iter().flatten().filter(|p| p.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of scanning the board around one king. Recomputed on every call;
/// nothing here outlives the position it was computed for.
#[derive(Debug, Clone, Default)]
pub struct AttackReport {
    pub in_check: bool,
    pub in_double_check: bool,
    pub pins: Pins,
    pub checks: Vec<Check>,
}

/// Returns true if `piece`, standing `distance` steps from a target along
/// `direction` (measured from the target), attacks that target.
fn attacks_along(piece: Piece, direction: Direction, distance: i8) -> bool {
    match piece.kind {
        PieceKind::Rook => direction.is_orthogonal(),
        PieceKind::Bishop => !direction.is_orthogonal(),
        PieceKind::Queen => true,
        PieceKind::King => distance == 1,
        // A pawn hits the target diagonally, from the side it advances from.
        PieceKind::Pawn => {
            distance == 1
                && !direction.is_orthogonal()
                && direction.dr == -piece.color.pawn_step()
        }
        PieceKind::Knight => false,
    }
}

/// Scans for pins against, and checks on, the `color` king standing on `king`.
pub fn check_for_pins_and_checks(board: &Board, king: Square, color: Color) -> AttackReport {
    let mut report = AttackReport::default();

    for direction in Direction::ALL {
        let mut candidate: Option<Square> = None;
        for distance in 1..8 {
            let Some(sq) = direction.step(king, distance) else {
                break;
            };
            let Some(piece) = board.get(sq) else {
                continue;
            };
            if piece.color == color {
                if candidate.is_some() {
                    // Two friendly pieces on the ray: nothing beyond can pin.
                    break;
                }
                candidate = Some(sq);
                continue;
            }
            if attacks_along(piece, direction, distance) {
                match candidate {
                    Some(pinned) => report.pins.insert(pinned, direction),
                    None => report.checks.push(Check {
                        square: sq,
                        direction,
                        checker: piece.kind,
                    }),
                }
            }
            break;
        }
    }

    let enemy_knight = Piece::new(color.opposite(), PieceKind::Knight);
    for offset in Direction::KNIGHT {
        if let Some(sq) = offset.step(king, 1) {
            if board.get(sq) == Some(enemy_knight) {
                report.checks.push(Check {
                    square: sq,
                    direction: offset,
                    checker: PieceKind::Knight,
                });
            }
        }
    }

    debug_assert!(
        report.checks.len() <= 2,
        "{} checkers on the {} king",
        report.checks.len(),
        color
    );
    report.in_check = !report.checks.is_empty();
    report.in_double_check = report.checks.len() >= 2;
    report
}

/// Returns true if any piece of color `by` attacks `target`.
///
/// Works directly from the board by casting rays outward from the target, so
/// it needs no piece on the target square.
pub fn square_attacked(board: &Board, target: Square, by: Color) -> bool {
    for direction in Direction::ALL {
        for distance in 1..8 {
            let Some(sq) = direction.step(target, distance) else {
                break;
            };
            if let Some(piece) = board.get(sq) {
                if piece.color == by && attacks_along(piece, direction, distance) {
                    return true;
                }
                break;
            }
        }
    }

    let knight = Piece::new(by, PieceKind::Knight);
    Direction::KNIGHT
        .iter()
        .filter_map(|offset| offset.step(target, 1))
        .any(|sq| board.get(sq) == Some(knight))
}
