//! Property tests over random legal games.

use chess_core::{Color, Move, PieceKind};
use chess_engine::{attacks, parse_notation, GameState};
use proptest::prelude::*;
use proptest::sample::Index;
use proptest::test_runner::TestCaseError;

fn choose(moves: &[Move], pick: &Index) -> Move {
    let mv = moves[pick.index(moves.len())];
    if mv.is_pawn_promotion() {
        let kinds = PieceKind::PROMOTIONS;
        mv.with_promotion(kinds[pick.index(kinds.len())])
    } else {
        mv
    }
}

/// Plays up to `picks.len()` random legal moves, calling `check` on the
/// state before each move with the legal moves found there. Stops at the
/// first failed check.
fn random_game(
    picks: &[Index],
    mut check: impl FnMut(&mut GameState, &[Move]) -> Result<(), TestCaseError>,
) -> Result<GameState, TestCaseError> {
    let mut state = GameState::new();
    for pick in picks {
        let moves = state.valid_moves();
        check(&mut state, &moves)?;
        if moves.is_empty() {
            break;
        }
        let mv = choose(&moves, pick);
        state
            .make_move(mv, mv.promotion())
            .map_err(|e| TestCaseError::fail(format!("{} rejected: {}", mv, e)))?;
    }
    Ok(state)
}

fn picks() -> impl Strategy<Value = Vec<Index>> {
    prop::collection::vec(any::<Index>(), 0..60)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn undo_restores_every_position(picks in picks()) {
        let mut fens = Vec::new();
        let mut state = random_game(&picks, |state, _| {
            fens.push(state.to_fen());
            Ok(())
        })?;
        // The last recorded position had no move played from it.
        fens.truncate(state.move_log().len());
        while let Some(expected) = fens.pop() {
            state.undo_move();
            prop_assert_eq!(state.to_fen(), expected);
        }
        prop_assert!(state.move_log().is_empty());
        prop_assert_eq!(state.to_fen(), GameState::new().to_fen());
    }

    #[test]
    fn legal_moves_never_leave_own_king_attacked(picks in picks()) {
        random_game(&picks, |state, moves| {
            let us = state.side_to_move();
            for &mv in moves {
                let mv = if mv.is_pawn_promotion() { mv.with_promotion(PieceKind::Queen) } else { mv };
                state
                    .make_move(mv, None)
                    .map_err(|e| TestCaseError::fail(e.to_string()))?;
                let king = state.king_location(us);
                let attacked = state.square_under_attack(us.opposite(), king);
                state.undo_move();
                prop_assert!(!attacked, "{} leaves the {} king attacked", mv, us);
            }
            Ok(())
        })?;
    }

    #[test]
    fn checks_restrict_the_move_set(picks in picks()) {
        random_game(&picks, |state, moves| {
            let status = state.status();
            let us = state.side_to_move();
            let king = state.king_location(us);
            for color in [Color::White, Color::Black] {
                let kings: Vec<_> = state
                    .board()
                    .pieces()
                    .filter(|(_, p)| p.kind == PieceKind::King && p.color == color)
                    .map(|(sq, _)| sq)
                    .collect();
                prop_assert_eq!(kings, vec![state.king_location(color)]);
            }
            prop_assert_eq!(status.in_check, state.square_under_attack(us.opposite(), king));

            if status.in_double_check {
                prop_assert!(moves.iter().all(|m| m.piece_moved().kind == PieceKind::King));
            } else if status.in_check {
                let report = state.check_for_pins_and_checks();
                let resolving = report.checks[0].resolving_squares(king);
                for m in moves {
                    prop_assert!(!m.is_castle());
                    if m.piece_moved().kind != PieceKind::King && !m.is_en_passant() {
                        prop_assert!(resolving.contains(&m.end()), "{} ignores the check", m);
                    }
                }
            }
            prop_assert_eq!(status.checkmate, moves.is_empty() && status.in_check);
            prop_assert_eq!(status.stalemate, moves.is_empty() && !status.in_check);
            Ok(())
        })?;
    }

    #[test]
    fn notation_round_trips(picks in picks()) {
        random_game(&picks, |state, moves| {
            for &mv in moves {
                let request = parse_notation(&mv.to_notation())
                    .map_err(|e| TestCaseError::fail(e.to_string()))?;
                prop_assert_eq!(state.resolve(&request), Ok(mv));
            }
            Ok(())
        })?;
    }

    #[test]
    fn en_passant_target_only_after_double_push(picks in picks()) {
        random_game(&picks, |state, moves| {
            let last_double = state.move_log().last().map_or(false, |m| m.is_double_push());
            prop_assert_eq!(state.en_passant_possible().is_some(), last_double);
            if state.en_passant_possible().is_none() {
                prop_assert!(moves.iter().all(|m| !m.is_en_passant()));
            }
            Ok(())
        })?;
    }

    #[test]
    fn castling_requires_rights_and_safety(picks in picks()) {
        random_game(&picks, |state, moves| {
            let us = state.side_to_move();
            let rights = state.castle_rights();
            for m in moves.iter().filter(|m| m.is_castle()) {
                prop_assert!(!state.in_check());
                if m.is_kingside_castle() {
                    prop_assert!(rights.can_castle_kingside(us));
                } else {
                    prop_assert!(rights.can_castle_queenside(us));
                }
                let step: i8 = if m.is_kingside_castle() { 1 } else { -1 };
                for distance in 1..=2 {
                    let sq = m
                        .start()
                        .offset(0, step * distance)
                        .ok_or_else(|| TestCaseError::fail("castling off the board"))?;
                    prop_assert_eq!(sq.row(), us.back_row());
                    prop_assert!(state.board().is_empty(sq));
                    prop_assert!(!attacks::square_attacked(state.board(), sq, us.opposite()));
                }
            }
            Ok(())
        })?;
    }
}
