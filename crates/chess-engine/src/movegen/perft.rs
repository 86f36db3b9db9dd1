//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator.
//! A promotion counts once per promotion piece.

use crate::GameState;
use chess_core::{Move, PieceKind};

/// Expands a promotion move into one move per promotion piece.
fn expand(mv: Move) -> impl Iterator<Item = Move> {
    let kinds: &'static [PieceKind] = if mv.is_pawn_promotion() {
        &PieceKind::PROMOTIONS
    } else {
        &[]
    };
    let plain = (!mv.is_pawn_promotion()).then_some(mv);
    plain
        .into_iter()
        .chain(kinds.iter().map(move |&kind| mv.with_promotion(kind)))
}

/// Counts the number of leaf nodes at the given depth.
pub fn perft(state: &mut GameState, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = state.valid_moves();

    if depth == 1 {
        return moves.iter().flat_map(|&m| expand(m)).count() as u64;
    }

    let mut nodes = 0u64;
    for m in moves.into_iter().flat_map(expand) {
        state.apply(m);
        nodes += perft(state, depth - 1);
        state.revert();
    }
    nodes
}

/// Perft with divide - shows node count for each move at depth-1.
/// Useful for debugging to identify which moves have incorrect counts.
pub fn perft_divide(state: &mut GameState, depth: u32) -> Vec<(String, u64)> {
    let moves = state.valid_moves();
    let mut results = Vec::with_capacity(moves.len());

    for m in moves.into_iter().flat_map(expand) {
        state.apply(m);
        let nodes = if depth > 1 {
            perft(state, depth - 1)
        } else {
            1
        };
        state.revert();
        results.push((m.to_notation(), nodes));
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}
