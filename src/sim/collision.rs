//! Collision detection and response
//!
//! Three collision classes are resolved each tick in a fixed order: wall
//! bounce, near (left) paddle, far (right) paddle. Paddle tests are discrete
//! box overlaps in pixel space, so a ball fast enough to jump across a
//! paddle in one tick passes through it.

use glam::Vec2;

use super::state::{Ball, GameSession, Playfield, Side};
use crate::consts::*;

/// Axis-aligned box in pixel space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self {
            min,
            max: min + size,
        }
    }

    /// Strict overlap; boxes that only share an edge do not intersect
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

/// Which collisions fired during one resolution pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub wall: bool,
    pub near_paddle: bool,
    pub far_paddle: bool,
}

/// Ball box in pixels
pub fn ball_box(ball: &Ball, playfield: &Playfield) -> Aabb {
    Aabb::new(playfield.to_pixels(ball.pos), Vec2::splat(BALL_SIZE_PX))
}

/// Paddle box in pixels for the given side
pub fn paddle_box(side: Side, center_y: f32, playfield: &Playfield) -> Aabb {
    let left = match side {
        Side::Left => PADDLE_INSET_PX,
        Side::Right => playfield.width - PADDLE_INSET_PX - PADDLE_WIDTH_PX,
    };
    let top = center_y * playfield.height - PADDLE_HEIGHT_PX / 2.0;
    Aabb::new(
        Vec2::new(left, top),
        Vec2::new(PADDLE_WIDTH_PX, PADDLE_HEIGHT_PX),
    )
}

/// Bounce off the top and bottom walls: clamp to the bound and negate `vy`
pub fn resolve_walls(ball: &mut Ball, playfield: &Playfield) -> bool {
    let floor = 1.0 - playfield.ball_height_norm();
    if ball.pos.y <= 0.0 {
        ball.pos.y = 0.0;
        ball.vel.y = -ball.vel.y;
        true
    } else if ball.pos.y >= floor {
        ball.pos.y = floor;
        ball.vel.y = -ball.vel.y;
        true
    } else {
        false
    }
}

/// On overlap with the paddle on `side`, snap `vx` to point away from it.
///
/// Snapping rather than negating keeps the ball heading outward while it is
/// still embedded in the paddle on following ticks.
pub fn resolve_paddle(ball: &mut Ball, side: Side, center_y: f32, playfield: &Playfield) -> bool {
    let hit = ball_box(ball, playfield).intersects(&paddle_box(side, center_y, playfield));
    if hit {
        ball.vel.x = match side {
            Side::Left => ball.vel.x.abs(),
            Side::Right => -ball.vel.x.abs(),
        };
    }
    hit
}

/// Resolve wall, near paddle, then far paddle collisions for this tick
pub fn resolve_collisions(session: &mut GameSession) -> CollisionReport {
    let playfield = session.params.playfield;
    let wall = resolve_walls(&mut session.ball, &playfield);
    let near_paddle = resolve_paddle(
        &mut session.ball,
        Side::Left,
        session.human.center_y,
        &playfield,
    );
    let far_paddle = resolve_paddle(
        &mut session.ball,
        Side::Right,
        session.policy.center_y,
        &playfield,
    );

    debug_assert!(
        session.ball.pos.y >= 0.0 && session.ball.pos.y <= 1.0 - playfield.ball_height_norm(),
        "ball y {} escaped wall band",
        session.ball.pos.y
    );

    CollisionReport {
        wall,
        near_paddle,
        far_paddle,
    }
}
