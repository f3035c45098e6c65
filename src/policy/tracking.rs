//! Hand-coded tracking policy
//!
//! Moves toward the ball's height and holds still inside a dead band around
//! the paddle center. This is also the rule used to label training samples.

use super::{Observation, Policy, PolicyError};

/// Half-width of the band in which the paddle holds still
pub const DEAD_BAND: f32 = 0.05;

/// -1 (up), 1 (down) or 0 (hold) for the given observation
#[inline]
pub fn label_move(obs: &Observation, dead_band: f32) -> f32 {
    if obs.ball_y < obs.paddle_y - dead_band {
        -1.0
    } else if obs.ball_y > obs.paddle_y + dead_band {
        1.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TrackingPolicy {
    pub dead_band: f32,
}

impl Default for TrackingPolicy {
    fn default() -> Self {
        Self {
            dead_band: DEAD_BAND,
        }
    }
}

impl Policy for TrackingPolicy {
    fn name(&self) -> &str {
        "tracking"
    }

    fn infer(&self, obs: &Observation) -> Result<f32, PolicyError> {
        Ok(label_move(obs, self.dead_band))
    }
}
