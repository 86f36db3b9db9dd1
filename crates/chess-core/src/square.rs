//! Board square representation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A square on the chess board, addressed by row and column.
///
/// Row 0 is Black's back rank (rank 8) and row 7 is White's (rank 1).
/// Column 0 is the a-file.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    /// Creates a square from row and column, or `None` if either is outside 0-7.
    #[inline]
    pub const fn new(row: u8, col: u8) -> Option<Self> {
        if row < 8 && col < 8 {
            Some(Square { row, col })
        } else {
            None
        }
    }

    /// Creates a square from row and column that are known to be on the board.
    #[inline]
    pub(crate) const fn at(row: u8, col: u8) -> Self {
        debug_assert!(row < 8 && col < 8);
        Square { row, col }
    }

    /// Parses a square from algebraic notation (e.g., "e4").
    pub const fn from_algebraic(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if file < b'a' || file > b'h' || rank < b'1' || rank > b'8' {
            return None;
        }
        Some(Square::at(b'8' - rank, file - b'a'))
    }

    #[inline]
    pub const fn row(self) -> u8 {
        self.row
    }

    #[inline]
    pub const fn col(self) -> u8 {
        self.col
    }

    /// Returns the file letter ('a'-'h').
    #[inline]
    pub const fn file_char(self) -> char {
        (b'a' + self.col) as char
    }

    /// Returns the rank digit ('1'-'8').
    #[inline]
    pub const fn rank_char(self) -> char {
        (b'8' - self.row) as char
    }

    /// Returns the square displaced by the given row and column deltas,
    /// or `None` if it falls off the board.
    #[inline]
    pub const fn offset(self, dr: i8, dc: i8) -> Option<Self> {
        let row = self.row as i8 + dr;
        let col = self.col as i8 + dc;
        if row < 0 || row > 7 || col < 0 || col > 7 {
            None
        } else {
            Some(Square::at(row as u8, col as u8))
        }
    }

    /// Returns the algebraic notation for this square.
    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.file_char(), self.rank_char())
    }

    /// Iterates over all 64 squares, row by row from row 0.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..8u8).flat_map(|row| (0..8u8).map(move |col| Square::at(row, col)))
    }

    // Castling squares
    pub const A1: Square = Square::at(7, 0);
    pub const C1: Square = Square::at(7, 2);
    pub const D1: Square = Square::at(7, 3);
    pub const E1: Square = Square::at(7, 4);
    pub const F1: Square = Square::at(7, 5);
    pub const G1: Square = Square::at(7, 6);
    pub const H1: Square = Square::at(7, 7);
    pub const A8: Square = Square::at(0, 0);
    pub const C8: Square = Square::at(0, 2);
    pub const D8: Square = Square::at(0, 3);
    pub const E8: Square = Square::at(0, 4);
    pub const F8: Square = Square::at(0, 5);
    pub const G8: Square = Square::at(0, 6);
    pub const H8: Square = Square::at(0, 7);
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({})", self.to_algebraic())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_new() {
        let sq = Square::new(4, 4).unwrap();
        assert_eq!(sq.row(), 4);
        assert_eq!(sq.col(), 4);
        assert_eq!(sq.to_algebraic(), "e4");
        assert_eq!(Square::new(8, 0), None);
        assert_eq!(Square::new(0, 8), None);
    }

    #[test]
    fn square_from_algebraic() {
        assert_eq!(Square::from_algebraic("a1"), Some(Square::A1));
        assert_eq!(Square::from_algebraic("h8"), Some(Square::H8));
        assert_eq!(Square::from_algebraic("e2"), Square::new(6, 4));
        assert_eq!(Square::from_algebraic("E2"), Square::new(6, 4));
        assert_eq!(Square::from_algebraic("i1"), None);
        assert_eq!(Square::from_algebraic("a9"), None);
        assert_eq!(Square::from_algebraic("a0"), None);
        assert_eq!(Square::from_algebraic(""), None);
    }

    #[test]
    fn square_to_algebraic() {
        assert_eq!(Square::A1.to_algebraic(), "a1");
        assert_eq!(Square::H8.to_algebraic(), "h8");
        assert_eq!(Square::E1.to_string(), "e1");
        assert_eq!(format!("{:?}", Square::G8), "Square(g8)");
    }

    #[test]
    fn square_offset() {
        let e2 = Square::from_algebraic("e2").unwrap();
        assert_eq!(e2.offset(-2, 0), Square::from_algebraic("e4"));
        assert_eq!(e2.offset(1, 1), Square::from_algebraic("f1"));
        assert_eq!(Square::A1.offset(1, 0), None);
        assert_eq!(Square::H8.offset(0, 1), None);
    }

    #[test]
    fn all_squares() {
        let all: Vec<Square> = Square::all().collect();
        assert_eq!(all.len(), 64);
        assert_eq!(all[0], Square::A8);
        assert_eq!(all[63], Square::H1);
    }

    proptest::proptest! {
        #[test]
        fn algebraic_round_trip(row in 0u8..8, col in 0u8..8) {
            let sq = Square::new(row, col).unwrap();
            let text = sq.to_algebraic();
            proptest::prop_assert_eq!(Square::from_algebraic(&text), Some(sq));
        }

        #[test]
        fn offset_stays_on_board(row in 0u8..8, col in 0u8..8, dr in -8i8..=8, dc in -8i8..=8) {
            let sq = Square::new(row, col).unwrap();
            let expected_row = row as i8 + dr;
            let expected_col = col as i8 + dc;
            let on_board = (0..8).contains(&expected_row) && (0..8).contains(&expected_col);
            proptest::prop_assert_eq!(sq.offset(dr, dc).is_some(), on_board);
        }
    }
}
