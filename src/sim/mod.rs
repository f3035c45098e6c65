//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod scoring;
pub mod state;
pub mod tick;

pub use collision::{Aabb, CollisionReport, resolve_collisions};
pub use scoring::{ScoreEvent, check_scoring};
pub use state::{
    Ball, GameSession, GameStatus, Paddle, PaddleDirection, Playfield, Score, SessionParams,
    SessionSnapshot, Side,
};
pub use tick::{HumanInput, TickReport, advance_tick};
