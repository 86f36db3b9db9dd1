//! Game configuration loaded from TOML.
//!
//! ```toml
//! start_fen = "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1"
//! auto_promotion = "queen"
//! ```

use crate::GameState;
use chess_core::{FenError, PieceKind};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading or applying a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// The configured start position is not a valid FEN.
    #[error("Invalid start position: {0}")]
    InvalidStartPosition(#[from] FenError),
    /// The configured auto-promotion piece is a pawn or king.
    #[error("Invalid auto-promotion piece: {0}")]
    InvalidPromotion(PieceKind),
}

/// Settings for a [`Game`](crate::Game) session.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct GameConfig {
    /// Starting position. Defaults to the standard start.
    #[serde(default)]
    pub start_fen: Option<String>,
    /// Promotion piece used when a promotion is played without a choice.
    /// When unset, such moves are refused.
    #[serde(default)]
    pub auto_promotion: Option<PieceKind>,
}

impl GameConfig {
    /// Parses and validates a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseError`] on invalid TOML, or a validation
    /// error from [`Self::validate`].
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Checks the start position and promotion piece.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(kind) = self.auto_promotion {
            if !kind.is_promotion_target() {
                return Err(ConfigError::InvalidPromotion(kind));
            }
        }
        self.initial_state().map(|_| ())
    }

    /// Builds the starting [`GameState`].
    pub fn initial_state(&self) -> Result<GameState, ConfigError> {
        match &self.start_fen {
            Some(fen) => Ok(GameState::from_fen(fen)?),
            None => Ok(GameState::new()),
        }
    }
}
