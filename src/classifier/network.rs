use crate::error::{CropSenseError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Relu,
    Softmax,
}

/// One fully-connected layer. Weights are row-major: one row per output
/// unit, each row as wide as the layer input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f64>>,
    pub biases: Vec<f64>,
    pub activation: Activation,
}

impl DenseLayer {
    pub fn input_width(&self) -> usize {
        self.weights.first().map(|row| row.len()).unwrap_or(0)
    }

    pub fn output_width(&self) -> usize {
        self.weights.len()
    }

    fn forward(&self, input: &[f64]) -> Result<Vec<f64>> {
        if input.len() != self.input_width() {
            return Err(CropSenseError::ShapeMismatch {
                expected: self.input_width(),
                actual: input.len(),
            });
        }

        let mut out: Vec<f64> = self
            .weights
            .iter()
            .zip(self.biases.iter())
            .map(|(row, bias)| {
                row.iter().zip(input.iter()).map(|(w, x)| w * x).sum::<f64>() + bias
            })
            .collect();

        match self.activation {
            Activation::Relu => {
                for v in &mut out {
                    if *v < 0.0 {
                        *v = 0.0;
                    }
                }
            }
            Activation::Softmax => out = softmax(&out),
        }

        Ok(out)
    }
}

/// Sequential dense network exported by the training pipeline. Read-only
/// after load; `predict` returns the output distribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseNetwork {
    pub layers: Vec<DenseLayer>,
}

impl DenseNetwork {
    pub fn input_width(&self) -> usize {
        self.layers.first().map(|l| l.input_width()).unwrap_or(0)
    }

    pub fn n_classes(&self) -> usize {
        self.layers.last().map(|l| l.output_width()).unwrap_or(0)
    }

    /// Structural consistency check, run once at artifact load.
    pub fn validate(&self) -> Result<()> {
        if self.layers.is_empty() {
            return Err(CropSenseError::ArtifactLoad("network has no layers".into()));
        }

        let mut expected_input = self.input_width();
        for (i, layer) in self.layers.iter().enumerate() {
            if layer.weights.is_empty() || layer.input_width() == 0 {
                return Err(CropSenseError::ArtifactLoad(format!(
                    "network layer {} is empty",
                    i
                )));
            }
            if layer.weights.iter().any(|row| row.len() != layer.input_width()) {
                return Err(CropSenseError::ArtifactLoad(format!(
                    "network layer {} has ragged weight rows",
                    i
                )));
            }
            if layer.biases.len() != layer.output_width() {
                return Err(CropSenseError::ArtifactLoad(format!(
                    "network layer {} has {} biases for {} units",
                    i,
                    layer.biases.len(),
                    layer.output_width()
                )));
            }
            if layer.input_width() != expected_input {
                return Err(CropSenseError::ArtifactLoad(format!(
                    "network layer {} expects {} inputs but receives {}",
                    i,
                    layer.input_width(),
                    expected_input
                )));
            }
            expected_input = layer.output_width();
        }

        Ok(())
    }

    /// Forward pass. The width check fires before any layer arithmetic.
    pub fn predict(&self, input: &[f64]) -> Result<Vec<f64>> {
        if input.len() != self.input_width() {
            return Err(CropSenseError::ShapeMismatch {
                expected: self.input_width(),
                actual: input.len(),
            });
        }

        let mut current = input.to_vec();
        for layer in &self.layers {
            current = layer.forward(&current)?;
        }
        Ok(current)
    }
}

/// Numerically stable softmax.
fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|v| (v - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.iter().map(|e| e / sum).collect()
}

/// Index of the maximum probability. Ties break to the lowest index.
pub fn argmax(probabilities: &[f64]) -> usize {
    let mut best = 0;
    for (i, p) in probabilities.iter().enumerate().skip(1) {
        if *p > probabilities[best] {
            best = i;
        }
    }
    best
}
