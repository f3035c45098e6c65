//! Control policies for the non-human paddle
//!
//! A policy maps a five-scalar observation to one velocity signal. The
//! `PolicyPort` sits between the simulation and whatever backend is loaded,
//! turning an absent backend or a failed inference into "no action" so the
//! simulation never has to care which happened.

pub mod mlp;
pub mod tracking;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::settings::PolicySource;
use crate::sim::GameSession;

pub use mlp::{Activation, DenseLayer, MlpModel, MlpPolicy};
pub use tracking::TrackingPolicy;

/// Number of scalars in an observation
pub const OBSERVATION_LEN: usize = 5;

/// Snapshot of the state a policy sees, in fixed order:
/// `[ball.x, ball.y, ball.vx, ball.vy, policy_paddle.center_y]`
///
/// `ball_x`/`ball_y` are the top-left corner of the ball's box (the same
/// anchor the simulation uses), so the ball's center sits half a ball
/// (5 px at 600 px tall) below `ball_y`. Trained models must be fed the
/// same anchor they were trained on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub ball_x: f32,
    pub ball_y: f32,
    pub ball_vx: f32,
    pub ball_vy: f32,
    pub paddle_y: f32,
}

impl Observation {
    /// Observation for the policy-controlled paddle
    pub fn from_session(session: &GameSession) -> Self {
        Self {
            ball_x: session.ball.pos.x,
            ball_y: session.ball.pos.y,
            ball_vx: session.ball.vel.x,
            ball_vy: session.ball.vel.y,
            paddle_y: session.policy.center_y,
        }
    }

    pub fn from_array(v: [f32; OBSERVATION_LEN]) -> Self {
        Self {
            ball_x: v[0],
            ball_y: v[1],
            ball_vx: v[2],
            ball_vy: v[3],
            paddle_y: v[4],
        }
    }

    pub fn to_array(&self) -> [f32; OBSERVATION_LEN] {
        [
            self.ball_x,
            self.ball_y,
            self.ball_vx,
            self.ball_vy,
            self.paddle_y,
        ]
    }
}

/// A velocity signal for one tick, nominally in [-1, 1] but not clamped
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub velocity_signal: f32,
}

/// Errors from loading or running a policy backend
#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("policy unavailable at {path}: {source}")]
    Unavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("model parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("cannot bind model: {0}")]
    Binding(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("malformed policy output: {0}")]
    MalformedOutput(f32),
}

/// A backend that produces a velocity signal from an observation.
///
/// Implementations must not block for long: the simulation waits on the
/// result before finishing the tick.
pub trait Policy {
    fn name(&self) -> &str;
    fn infer(&self, obs: &Observation) -> Result<f32, PolicyError>;
}

/// The simulation's only access to a policy.
///
/// Owns the backend for its whole lifetime; dropping the port releases it,
/// including when the backend never loaded.
pub struct PolicyPort {
    backend: Option<Box<dyn Policy>>,
    load_error: Option<PolicyError>,
    inference_failures: u64,
}

impl PolicyPort {
    /// Port around a loaded backend
    pub fn new(backend: Box<dyn Policy>) -> Self {
        log::info!("Policy '{}' ready", backend.name());
        Self {
            backend: Some(backend),
            load_error: None,
            inference_failures: 0,
        }
    }

    /// Port that never acts
    pub fn inert() -> Self {
        Self {
            backend: None,
            load_error: None,
            inference_failures: 0,
        }
    }

    /// Port from a load attempt. A failed load is logged once, leaves the
    /// port inert, and keeps the error for `load_error()`.
    pub fn from_load(result: Result<Box<dyn Policy>, PolicyError>) -> Self {
        match result {
            Ok(backend) => Self::new(backend),
            Err(err) => {
                log::warn!("Policy failed to load, paddle will stay idle: {}", err);
                Self {
                    backend: None,
                    load_error: Some(err),
                    inference_failures: 0,
                }
            }
        }
    }

    /// Build the port described by the configured source
    pub fn from_source(source: &PolicySource) -> Self {
        match source {
            PolicySource::Model { dir } => Self::from_load(
                MlpPolicy::load(dir).map(|p| Box::new(p) as Box<dyn Policy>),
            ),
            PolicySource::Tracking => Self::new(Box::new(TrackingPolicy::default())),
            PolicySource::None => Self::inert(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    /// Why the backend is missing, if loading failed
    pub fn load_error(&self) -> Option<&PolicyError> {
        self.load_error.as_ref()
    }

    /// Per-tick failures seen so far
    pub fn inference_failures(&self) -> u64 {
        self.inference_failures
    }

    /// Ask for this tick's action. `None` means the paddle does not move.
    pub fn query(&mut self, obs: &Observation) -> Option<Action> {
        let backend = self.backend.as_ref()?;
        match backend.infer(obs) {
            Ok(velocity_signal) if velocity_signal.is_finite() => Some(Action { velocity_signal }),
            Ok(bad) => {
                self.inference_failures += 1;
                log::trace!("{}: {}", backend.name(), PolicyError::MalformedOutput(bad));
                None
            }
            Err(err) => {
                self.inference_failures += 1;
                log::trace!("{}: {}", backend.name(), err);
                None
            }
        }
    }
}

impl Drop for PolicyPort {
    fn drop(&mut self) {
        match self.backend.take() {
            Some(backend) => log::debug!("Releasing policy '{}'", backend.name()),
            None => log::debug!("Releasing inert policy port"),
        }
    }
}

impl std::fmt::Debug for PolicyPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyPort")
            .field("backend", &self.backend.as_ref().map(|b| b.name().to_string()))
            .field("load_error", &self.load_error)
            .field("inference_failures", &self.inference_failures)
            .finish()
    }
}
