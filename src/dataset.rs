//! Labelled samples for training a policy network
//!
//! Each sample is a random observation (ball anywhere, small velocity,
//! paddle anywhere) labelled with the tracking rule's move.

use std::io::Write;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::policy::Observation;
use crate::policy::tracking::{DEAD_BAND, label_move};

/// Velocities are drawn from [-MAX_SAMPLE_SPEED, MAX_SAMPLE_SPEED)
pub const MAX_SAMPLE_SPEED: f32 = 0.01;

/// Default sample count
pub const DEFAULT_SAMPLES: usize = 50_000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub input: [f32; 5],
    pub label: f32,
}

/// Draw one random observation
pub fn random_observation<R: Rng>(rng: &mut R) -> Observation {
    Observation {
        ball_x: rng.random::<f32>(),
        ball_y: rng.random::<f32>(),
        ball_vx: (rng.random::<f32>() - 0.5) * 2.0 * MAX_SAMPLE_SPEED,
        ball_vy: (rng.random::<f32>() - 0.5) * 2.0 * MAX_SAMPLE_SPEED,
        paddle_y: rng.random::<f32>(),
    }
}

/// Generate `count` labelled samples from `seed`
pub fn generate(count: usize, seed: u64) -> Vec<Sample> {
    let mut rng = Pcg32::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let obs = random_observation(&mut rng);
            Sample {
                input: obs.to_array(),
                label: label_move(&obs, DEAD_BAND),
            }
        })
        .collect()
}

/// Write samples as a JSON array
pub fn write_json<W: Write>(samples: &[Sample], writer: W) -> Result<(), serde_json::Error> {
    serde_json::to_writer(writer, samples)
}
