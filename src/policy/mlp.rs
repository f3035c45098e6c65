//! Dense feed-forward network policy
//!
//! Weights live in `<model dir>/model.json`:
//!
//! ```json
//! { "layers": [ { "weights": [[...], ...], "bias": [...], "activation": "relu" } ] }
//! ```
//!
//! `weights` is row-major `[outputs][inputs]`. The first layer must take the
//! five observation scalars and the last must emit a single value.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{OBSERVATION_LEN, Observation, Policy, PolicyError};

/// File name expected inside a model directory
pub const MODEL_FILE: &str = "model.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Relu,
    Tanh,
    Linear,
}

impl Activation {
    #[inline]
    fn apply(self, x: f32) -> f32 {
        match self {
            Activation::Relu => x.max(0.0),
            Activation::Tanh => x.tanh(),
            Activation::Linear => x,
        }
    }
}

/// One fully connected layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
    pub activation: Activation,
}

impl DenseLayer {
    pub fn inputs(&self) -> usize {
        self.weights.first().map_or(0, Vec::len)
    }

    pub fn outputs(&self) -> usize {
        self.weights.len()
    }

    fn forward(&self, input: &[f32]) -> Vec<f32> {
        self.weights
            .iter()
            .zip(&self.bias)
            .map(|(row, b)| {
                let z: f32 = row.iter().zip(input).map(|(w, x)| w * x).sum::<f32>() + b;
                self.activation.apply(z)
            })
            .collect()
    }
}

/// Serialized network
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlpModel {
    pub layers: Vec<DenseLayer>,
}

impl MlpModel {
    /// Check every layer lines up and the ends match the 5-in/1-out contract
    pub fn validate(&self) -> Result<(), PolicyError> {
        let first = self
            .layers
            .first()
            .ok_or_else(|| PolicyError::Binding("model has no layers".into()))?;
        if first.inputs() != OBSERVATION_LEN {
            return Err(PolicyError::Binding(format!(
                "input width {} (expected {})",
                first.inputs(),
                OBSERVATION_LEN
            )));
        }

        let mut width = OBSERVATION_LEN;
        for (i, layer) in self.layers.iter().enumerate() {
            if layer.outputs() == 0 {
                return Err(PolicyError::Binding(format!("layer {} is empty", i)));
            }
            if layer.bias.len() != layer.outputs() {
                return Err(PolicyError::Binding(format!(
                    "layer {}: {} bias terms for {} outputs",
                    i,
                    layer.bias.len(),
                    layer.outputs()
                )));
            }
            if let Some(row) = layer.weights.iter().position(|r| r.len() != width) {
                return Err(PolicyError::Binding(format!(
                    "layer {} row {}: expected {} inputs",
                    i, row, width
                )));
            }
            width = layer.outputs();
        }

        if width != 1 {
            return Err(PolicyError::Binding(format!(
                "output width {} (expected 1)",
                width
            )));
        }
        Ok(())
    }

    pub fn forward(&self, input: &[f32]) -> Vec<f32> {
        self.layers
            .iter()
            .fold(input.to_vec(), |acc, layer| layer.forward(&acc))
    }
}

/// Policy backed by an `MlpModel`
#[derive(Debug, Clone)]
pub struct MlpPolicy {
    model: MlpModel,
    source: Option<PathBuf>,
}

impl MlpPolicy {
    /// Wrap an in-memory model after validating its shape
    pub fn from_model(model: MlpModel) -> Result<Self, PolicyError> {
        model.validate()?;
        Ok(Self {
            model,
            source: None,
        })
    }

    /// Load `model.json` from a model directory
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let path = dir.as_ref().join(MODEL_FILE);
        let json = std::fs::read_to_string(&path).map_err(|source| PolicyError::Unavailable {
            path: path.display().to_string(),
            source,
        })?;
        let model: MlpModel = serde_json::from_str(&json)?;
        let mut policy = Self::from_model(model)?;
        log::info!(
            "Loaded policy model from {} ({} layers)",
            path.display(),
            policy.model.layers.len()
        );
        policy.source = Some(path);
        Ok(policy)
    }

    pub fn model(&self) -> &MlpModel {
        &self.model
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

impl Policy for MlpPolicy {
    fn name(&self) -> &str {
        "mlp"
    }

    fn infer(&self, obs: &Observation) -> Result<f32, PolicyError> {
        let out = self.model.forward(&obs.to_array());
        match out.as_slice() {
            [v] if v.is_finite() => Ok(*v),
            [v] => Err(PolicyError::MalformedOutput(*v)),
            _ => Err(PolicyError::Inference(format!(
                "expected 1 output, got {}",
                out.len()
            ))),
        }
    }
}
