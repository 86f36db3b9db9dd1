//! Move-request sessions with commentary.
//!
//! The [`Game`] struct is the single writer of one [`GameState`]. Callers
//! (renderers, speech front ends) request moves by squares or notation,
//! and each accepted ply yields a [`MoveRecord`] with a commentary line.

use crate::config::{ConfigError, GameConfig};
use crate::notation::{parse_notation, MoveRequest};
use crate::state::{GameState, Status};
use crate::MoveError;
use chess_core::{Board, Color, FenError, Move, PieceKind, Square};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A played ply as announced to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Fullmove number the ply belongs to.
    pub number: u32,
    pub color: Color,
    /// Coordinate notation, e.g. `Qd1-h5` or `e7-e8Q`.
    pub notation: String,
    /// Status of the side to move after the ply.
    pub status: Status,
    /// Narration line, e.g. `3. Qd1-h5+` or `3... Ke8-e7`.
    pub commentary: String,
}

impl MoveRecord {
    fn new(number: u32, color: Color, mv: Move, status: Status) -> Self {
        let notation = mv.to_notation();
        let dots = match color {
            Color::White => ".",
            Color::Black => "...",
        };
        let commentary = format!("{}{} {}{}", number, dots, notation, status.suffix());
        MoveRecord {
            number,
            color,
            notation,
            status,
            commentary,
        }
    }
}

/// Read-only view of a game for renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub board: Board,
    pub side_to_move: Color,
    /// Notation of every ply so far, oldest first.
    pub moves: Vec<String>,
    pub status: Status,
    pub fen: String,
}

/// A chess game driven by move requests.
#[derive(Debug, Clone)]
pub struct Game {
    state: GameState,
    initial: GameState,
    /// Legal moves for the side to move, refreshed after every change.
    legal: Vec<Move>,
    records: Vec<MoveRecord>,
    config: GameConfig,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a new game with the standard starting position.
    pub fn new() -> Self {
        Self::from_state(GameState::new(), GameConfig::default())
    }

    /// Creates a game from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let config = GameConfig {
            start_fen: Some(fen.to_string()),
            ..GameConfig::default()
        };
        Ok(Self::from_state(GameState::from_fen(fen)?, config))
    }

    /// Creates a game from a validated configuration.
    pub fn with_config(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = config.initial_state()?;
        Ok(Self::from_state(state, config))
    }

    fn from_state(state: GameState, config: GameConfig) -> Self {
        let mut game = Game {
            initial: state.clone(),
            state,
            legal: Vec::new(),
            records: Vec::new(),
            config,
        };
        game.refresh();
        game
    }

    fn refresh(&mut self) {
        self.legal = self.state.valid_moves();
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Legal moves for the side to move. Promotion moves appear once,
    /// without a promotion piece.
    pub fn legal_moves(&self) -> &[Move] {
        &self.legal
    }

    pub fn records(&self) -> &[MoveRecord] {
        &self.records
    }

    pub fn status(&self) -> Status {
        self.state.status()
    }

    /// Returns true once the side to move is mated or stalemated.
    pub fn is_over(&self) -> bool {
        self.legal.is_empty()
    }

    /// Plays the legal move from `start` to `end`.
    ///
    /// A promotion move needs `promotion`, or an `auto_promotion` in the
    /// config. On error the game is unchanged.
    pub fn play(
        &mut self,
        start: Square,
        end: Square,
        promotion: Option<PieceKind>,
    ) -> Result<&MoveRecord, MoveError> {
        let found = self
            .legal
            .iter()
            .find(|m| m.start() == start && m.end() == end)
            .copied();
        match found {
            Some(mv) => self.commit(mv, promotion),
            None => Err(rejected(MoveError::IllegalMoveRequested(format!(
                "{}-{}",
                start, end
            )))),
        }
    }

    /// Plays a move written in coordinate notation, e.g. `Ng1-f3`, `O-O` or
    /// `e7-e8Q`. An explicit `promotion` overrides the notation's letter.
    pub fn play_notation(
        &mut self,
        text: &str,
        promotion: Option<PieceKind>,
    ) -> Result<&MoveRecord, MoveError> {
        let request = parse_notation(text).map_err(|e| rejected(e.into()))?;
        self.play_request(&request, promotion)
    }

    /// Plays a parsed move request.
    pub fn play_request(
        &mut self,
        request: &MoveRequest,
        promotion: Option<PieceKind>,
    ) -> Result<&MoveRecord, MoveError> {
        match request.find_in(&self.legal) {
            Some(mv) => self.commit(mv, promotion.or(request.promotion())),
            None => Err(rejected(MoveError::IllegalMoveRequested(
                request.to_string(),
            ))),
        }
    }

    fn commit(
        &mut self,
        mv: Move,
        promotion: Option<PieceKind>,
    ) -> Result<&MoveRecord, MoveError> {
        let number = self.state.fullmove_number();
        let color = self.state.side_to_move();
        let promotion = promotion.or(self.config.auto_promotion);
        self.state.make_move(mv, promotion).map_err(rejected)?;
        self.refresh();

        // The log holds the move with its promotion piece attached.
        let played = self.state.move_log().last().copied().unwrap_or(mv);
        let index = self.records.len();
        self.records
            .push(MoveRecord::new(number, color, played, self.state.status()));
        Ok(&self.records[index])
    }

    /// Takes back the last ply and returns its record.
    pub fn undo(&mut self) -> Option<MoveRecord> {
        let record = self.records.pop()?;
        self.state.undo_move();
        self.refresh();
        Some(record)
    }

    /// Returns to the starting position.
    pub fn reset(&mut self) {
        self.state = self.initial.clone();
        self.records.clear();
        self.refresh();
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.state.board().clone(),
            side_to_move: self.state.side_to_move(),
            moves: self.records.iter().map(|r| r.notation.clone()).collect(),
            status: self.state.status(),
            fen: self.state.to_fen(),
        }
    }
}

fn rejected(err: MoveError) -> MoveError {
    warn!(error = %err, "move request rejected");
    err
}
