//! The 8x8 grid of cells.

use crate::{Color, Piece, PieceKind, Square};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// An 8x8 grid where every cell is either a piece or empty (`None`).
///
/// Indexed by [`Square`]; `cells[row][col]` with row 0 at Black's back rank.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// Creates a board with no pieces.
    pub const fn empty() -> Self {
        Board {
            cells: [[None; 8]; 8],
        }
    }

    /// Creates the standard starting arrangement.
    pub fn standard() -> Self {
        const BACK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut board = Board::empty();
        for color in [Color::White, Color::Black] {
            for (col, kind) in BACK.iter().enumerate() {
                board.cells[color.back_row() as usize][col] = Some(Piece::new(color, *kind));
                board.cells[color.pawn_row() as usize][col] =
                    Some(Piece::new(color, PieceKind::Pawn));
            }
        }
        board
    }

    /// Returns the piece on the square, if any.
    #[inline]
    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.cells[sq.row() as usize][sq.col() as usize]
    }

    /// Places a piece on (or clears) a square, returning what was there.
    #[inline]
    pub fn set(&mut self, sq: Square, cell: Option<Piece>) -> Option<Piece> {
        std::mem::replace(&mut self.cells[sq.row() as usize][sq.col() as usize], cell)
    }

    /// Returns true if the square holds no piece.
    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.get(sq).is_none()
    }

    /// Returns the color of the piece on the square, if any.
    #[inline]
    pub fn color_at(&self, sq: Square) -> Option<Color> {
        self.get(sq).map(|p| p.color)
    }

    /// Locates the king of the given color by scanning the grid.
    pub fn find_king(&self, color: Color) -> Option<Square> {
        let king = Piece::new(color, PieceKind::King);
        Square::all().find(|sq| self.get(*sq) == Some(king))
    }

    /// Iterates over occupied squares and the pieces on them.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.get(sq).map(|p| (sq, p)))
    }

    /// Returns the rows of the grid, row 0 first.
    pub fn rows(&self) -> &[[Option<Piece>; 8]; 8] {
        &self.cells
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl Index<Square> for Board {
    type Output = Option<Piece>;

    #[inline]
    fn index(&self, sq: Square) -> &Self::Output {
        &self.cells[sq.row() as usize][sq.col() as usize]
    }
}

impl IndexMut<Square> for Board {
    #[inline]
    fn index_mut(&mut self, sq: Square) -> &mut Self::Output {
        &mut self.cells[sq.row() as usize][sq.col() as usize]
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for row in &self.cells {
            for cell in row {
                let c = cell.map_or('.', |p| p.to_fen_char());
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
