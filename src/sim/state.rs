//! Game state and core simulation types
//!
//! A `GameSession` owns everything the simulation mutates. Collision,
//! scoring and the policy port operate on it explicitly; none of them keep
//! state of their own.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::clamp_paddle_y;
use crate::consts::*;

/// Which side of the playfield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// Human-controlled paddle
    Left,
    /// Policy-controlled paddle
    Right,
}

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Ticks advance the simulation
    InProgress,
    /// A side reached the winning score; only `reset()` leaves this state
    GameOver { winner: Side },
}

/// Direction of a single paddle nudge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddleDirection {
    /// Toward the top of the playfield (decreasing y)
    Up,
    /// Toward the bottom of the playfield (increasing y)
    Down,
}

impl PaddleDirection {
    #[inline]
    fn sign(self) -> f32 {
        match self {
            PaddleDirection::Up => -1.0,
            PaddleDirection::Down => 1.0,
        }
    }
}

/// Playfield size in pixels, used to map normalized boxes to pixel space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
        }
    }
}

impl Playfield {
    /// Ball width as a fraction of playfield width
    #[inline]
    pub fn ball_width_norm(&self) -> f32 {
        BALL_SIZE_PX / self.width
    }

    /// Ball height as a fraction of playfield height
    #[inline]
    pub fn ball_height_norm(&self) -> f32 {
        BALL_SIZE_PX / self.height
    }

    /// Map a normalized point to pixels
    #[inline]
    pub fn to_pixels(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x * self.width, p.y * self.height)
    }
}

/// A paddle; only its vertical center moves
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    /// Normalized vertical center, always within [PADDLE_MIN_Y, PADDLE_MAX_Y]
    pub center_y: f32,
}

impl Default for Paddle {
    fn default() -> Self {
        Self { center_y: 0.5 }
    }
}

impl Paddle {
    /// Move the paddle by `delta` and clamp to the legal band
    pub fn shift(&mut self, delta: f32) {
        self.center_y = clamp_paddle_y(self.center_y + delta);
        debug_assert!(
            (PADDLE_MIN_Y..=PADDLE_MAX_Y).contains(&self.center_y),
            "paddle center {} escaped clamp band",
            self.center_y
        );
    }
}

/// The ball. `pos` is the top-left corner of its box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Per-tick velocity; magnitudes stay fixed, only signs change
    pub vel: Vec2,
}

impl Ball {
    /// Ball at the center moving with `vel`
    pub fn centered(vel: Vec2) -> Self {
        Self {
            pos: Vec2::splat(0.5),
            vel,
        }
    }

    /// Re-center with base magnitudes and independently random signs
    pub fn serve<R: Rng>(&mut self, base: Vec2, rng: &mut R) {
        let sx = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let sy = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        self.pos = Vec2::splat(0.5);
        self.vel = Vec2::new(base.x.abs() * sx, base.y.abs() * sy);
    }
}

/// Points per side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    pub left: u32,
    pub right: u32,
}

impl Score {
    pub fn increment(&mut self, side: Side) {
        match side {
            Side::Left => self.left += 1,
            Side::Right => self.right += 1,
        }
    }

    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// First side at or above `threshold`
    pub fn winner(&self, threshold: u32) -> Option<Side> {
        if self.left >= threshold {
            Some(Side::Left)
        } else if self.right >= threshold {
            Some(Side::Right)
        } else {
            None
        }
    }
}

/// Tunables fixed for the lifetime of a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionParams {
    pub playfield: Playfield,
    /// Serve velocity; its magnitudes are reused on every re-serve
    pub base_velocity: Vec2,
    pub winning_score: u32,
    /// Human paddle movement per tick per pressed key
    pub human_speed: f32,
    /// Paddle movement per unit of policy velocity signal
    pub action_scale: f32,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            playfield: Playfield::default(),
            base_velocity: Vec2::new(BALL_BASE_VX, BALL_BASE_VY),
            winning_score: WINNING_SCORE,
            human_speed: HUMAN_PADDLE_SPEED,
            action_scale: POLICY_ACTION_SCALE,
        }
    }
}

/// Read-only view handed to the renderer each tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub ball: Ball,
    pub human_paddle_y: f32,
    pub policy_paddle_y: f32,
    pub score: Score,
    pub status: GameStatus,
    pub time_ticks: u64,
}

/// Complete game state for one session
#[derive(Debug, Clone)]
pub struct GameSession {
    pub params: SessionParams,
    pub ball: Ball,
    /// Left paddle
    pub human: Paddle,
    /// Right paddle
    pub policy: Paddle,
    pub score: Score,
    pub status: GameStatus,
    /// Ticks advanced since the last reset
    pub time_ticks: u64,
    /// Seed the RNG was created from
    pub seed: u64,
    pub(crate) rng: Pcg32,
}

impl GameSession {
    /// Create a fresh session with the given tunables and seed
    pub fn new(params: SessionParams, seed: u64) -> Self {
        Self {
            params,
            ball: Ball::centered(params.base_velocity),
            human: Paddle::default(),
            policy: Paddle::default(),
            score: Score::default(),
            status: GameStatus::InProgress,
            time_ticks: 0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Session with default tunables
    pub fn with_seed(seed: u64) -> Self {
        Self::new(SessionParams::default(), seed)
    }

    /// Start over: paddles centered, ball served with the base velocity,
    /// scores zeroed, back in progress. The RNG stream continues.
    pub fn reset(&mut self) {
        self.ball = Ball::centered(self.params.base_velocity);
        self.human = Paddle::default();
        self.policy = Paddle::default();
        self.score = Score::default();
        self.status = GameStatus::InProgress;
        self.time_ticks = 0;
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        matches!(self.status, GameStatus::GameOver { .. })
    }

    /// Move the human paddle by `speed` in `direction`. No-op once over.
    pub fn apply_human_input(&mut self, direction: PaddleDirection, speed: f32) {
        if self.is_over() {
            return;
        }
        self.human.shift(direction.sign() * speed);
    }

    /// Advance ball position by its velocity. Collisions are resolved
    /// separately afterward in the same tick.
    pub fn integrate_ball(&mut self) {
        self.ball.pos += self.ball.vel;
    }

    /// Re-serve the ball from the center using the session RNG
    pub fn serve_ball(&mut self) {
        let base = self.params.base_velocity;
        self.ball.serve(base, &mut self.rng);
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            ball: self.ball,
            human_paddle_y: self.human.center_y,
            policy_paddle_y: self.policy.center_y,
            score: self.score,
            status: self.status,
            time_ticks: self.time_ticks,
        }
    }
}
