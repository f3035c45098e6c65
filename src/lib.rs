//! Duel Pong - human vs. policy Pong simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, scoring, tick)
//! - `policy`: Control policies for the non-human paddle
//! - `driver`: Fixed-rate game loop that feeds input and presents snapshots
//! - `dataset`: Labelled training samples for learned policies
//! - `settings`: Data-driven configuration

pub mod dataset;
pub mod driver;
pub mod policy;
pub mod settings;
pub mod sim;

pub use driver::{GameLoop, InputSource, Renderer};
pub use policy::{Action, Observation, Policy, PolicyError, PolicyPort};
pub use settings::{PolicySource, Settings};
pub use sim::{GameSession, GameStatus, HumanInput, SessionSnapshot, advance_tick};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const TICK_DT: f32 = 1.0 / 60.0;
    /// Maximum ticks per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions (pixels)
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Paddle box (pixels)
    pub const PADDLE_WIDTH_PX: f32 = 20.0;
    pub const PADDLE_HEIGHT_PX: f32 = 100.0;
    /// Gap between a paddle's outer edge and its side of the playfield
    pub const PADDLE_INSET_PX: f32 = 30.0;
    /// Paddle centers stay within [PADDLE_MIN_Y, PADDLE_MAX_Y]
    pub const PADDLE_MIN_Y: f32 = 0.05;
    pub const PADDLE_MAX_Y: f32 = 0.95;

    /// Ball box (pixels)
    pub const BALL_SIZE_PX: f32 = 10.0;
    /// Base per-tick ball velocity (normalized)
    pub const BALL_BASE_VX: f32 = 0.01;
    pub const BALL_BASE_VY: f32 = 0.007;

    /// Human paddle movement per tick (normalized)
    pub const HUMAN_PADDLE_SPEED: f32 = 0.02;
    /// Policy velocity signal → paddle movement per tick
    pub const POLICY_ACTION_SCALE: f32 = 0.04;

    /// First side to reach this many points wins
    pub const WINNING_SCORE: u32 = 10;
}

/// Clamp a paddle center to its legal band
#[inline]
pub fn clamp_paddle_y(y: f32) -> f32 {
    y.clamp(consts::PADDLE_MIN_Y, consts::PADDLE_MAX_Y)
}
