//! Game settings
//!
//! Loaded from a JSON file; anything missing takes its default.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::{Playfield, SessionParams};

/// Default directory holding `model.json`
pub const DEFAULT_MODEL_DIR: &str = "saved_pong_ai";

/// Where the policy paddle gets its actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PolicySource {
    /// Dense network loaded from a model directory
    Model { dir: String },
    /// Built-in ball tracker
    Tracking,
    /// Paddle never moves
    None,
}

impl Default for PolicySource {
    fn default() -> Self {
        PolicySource::Model {
            dir: DEFAULT_MODEL_DIR.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid playfield {width}x{height}")]
    InvalidPlayfield { width: f32, height: f32 },

    #[error("Winning score must be at least 1")]
    InvalidWinningScore,

    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f32 },

    #[error("Ball x speed must be non-zero")]
    StalledBall,
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Playfield ===
    pub playfield_width: f32,
    pub playfield_height: f32,

    // === Rules ===
    pub winning_score: u32,
    /// Serve velocity (normalized per tick)
    pub ball_vx: f32,
    pub ball_vy: f32,

    // === Paddles ===
    /// Human paddle movement per tick
    pub human_speed: f32,
    /// Policy paddle movement per unit of velocity signal
    pub action_scale: f32,

    // === Policy ===
    pub policy: PolicySource,

    /// RNG seed for serve directions
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            playfield_width: PLAYFIELD_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,
            winning_score: WINNING_SCORE,
            ball_vx: BALL_BASE_VX,
            ball_vy: BALL_BASE_VY,
            human_speed: HUMAN_PADDLE_SPEED,
            action_scale: POLICY_ACTION_SCALE,
            policy: PolicySource::default(),
            seed: 0,
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a file
    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Read settings from a file, falling back to defaults on any error
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("Using default settings ({}: {})", path.display(), err);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.playfield_width > 0.0 && self.playfield_height > 0.0) {
            return Err(SettingsError::InvalidPlayfield {
                width: self.playfield_width,
                height: self.playfield_height,
            });
        }
        if self.winning_score == 0 {
            return Err(SettingsError::InvalidWinningScore);
        }
        let tunables = [
            ("ball_vx", self.ball_vx),
            ("ball_vy", self.ball_vy),
            ("human_speed", self.human_speed),
            ("action_scale", self.action_scale),
        ];
        if let Some(&(name, value)) = tunables.iter().find(|(_, v)| !v.is_finite()) {
            return Err(SettingsError::NonFinite { name, value });
        }
        // A ball with no x speed never reaches either edge
        if self.ball_vx == 0.0 {
            return Err(SettingsError::StalledBall);
        }
        Ok(())
    }

    /// Session tunables derived from these settings
    pub fn session_params(&self) -> SessionParams {
        SessionParams {
            playfield: Playfield {
                width: self.playfield_width,
                height: self.playfield_height,
            },
            base_velocity: Vec2::new(self.ball_vx, self.ball_vy),
            winning_score: self.winning_score,
            human_speed: self.human_speed,
            action_scale: self.action_scale,
        }
    }
}
