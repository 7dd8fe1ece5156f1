pub mod artifacts;
pub mod context;
pub mod encoder;
pub mod network;
pub mod scaler;

pub use artifacts::ModelArtifacts;
pub use context::ContextResolver;
pub use encoder::FeatureEncoder;
pub use network::{argmax, DenseNetwork};
pub use scaler::StandardScaler;

use crate::error::Result;
use crate::models::{Reading, ReadingContext};
use std::path::Path;

/// Outcome of one classification: the winning class index plus the
/// distribution it was taken from.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub class_index: i64,
    pub probabilities: Vec<f64>,
}

/// Inference front door. Built only from a successfully loaded artifact
/// set (the one Uninitialized → Ready transition); immutable for the
/// rest of the process lifetime and shareable across threads.
pub struct Classifier {
    encoder: FeatureEncoder,
    scaler: StandardScaler,
    network: DenseNetwork,
}

impl Classifier {
    pub fn load(dir: &Path) -> Result<Self> {
        Ok(Self::from_artifacts(ModelArtifacts::load(dir)?))
    }

    pub fn from_artifacts(artifacts: ModelArtifacts) -> Self {
        Self {
            encoder: FeatureEncoder::new(artifacts.columns),
            scaler: artifacts.scaler,
            network: artifacts.network,
        }
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    pub fn n_classes(&self) -> usize {
        self.network.n_classes()
    }

    /// encode → scale → predict → argmax. Any error aborts the attempt;
    /// the reading's stored result is never touched from here.
    pub fn classify(
        &self,
        context: &ReadingContext,
        reading: &Reading,
    ) -> Result<Classification> {
        let features = self.encoder.encode(context, reading);
        let scaled = self.scaler.transform(&features)?;
        let probabilities = self.network.predict(&scaled)?;
        let class_index = argmax(&probabilities) as i64;

        Ok(Classification {
            class_index,
            probabilities,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::network::{Activation, DenseLayer};
    use crate::error::CropSenseError;

    fn sample_columns() -> Vec<String> {
        [
            "crop ID_Tomato",
            "crop ID_Wheat",
            "soil_type_Loamy",
            "Seedling Stage_Flowering",
            "MOI",
            "temp",
            "humidity",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn identity_scaler(width: usize) -> StandardScaler {
        StandardScaler {
            mean: vec![0.0; width],
            scale: vec![1.0; width],
        }
    }

    /// Single softmax layer over the 7 sample columns, 3 classes.
    fn sample_network() -> DenseNetwork {
        DenseNetwork {
            layers: vec![DenseLayer {
                weights: vec![
                    vec![1.0, 0.0, 0.0, 0.0, -0.1, 0.0, 0.0],
                    vec![0.0, 1.0, 0.5, 0.0, 0.1, 0.0, 0.0],
                    vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.1, 0.1],
                ],
                biases: vec![0.0, 0.0, 0.0],
                activation: Activation::Softmax,
            }],
        }
    }

    fn sample_classifier() -> Classifier {
        Classifier::from_artifacts(ModelArtifacts {
            network: sample_network(),
            columns: sample_columns(),
            scaler: identity_scaler(7),
        })
    }

    fn sample_context() -> ReadingContext {
        ReadingContext {
            crop_name: "Tomato".into(),
            soil: "Loamy".into(),
            growth_stage_name: "Flowering".into(),
        }
    }

    #[test]
    fn classification_returns_full_distribution() {
        let classifier = sample_classifier();
        let reading = Reading::new(1, "Loamy", 2, 35.0, 24.0, 60.0);

        let outcome = classifier.classify(&sample_context(), &reading).unwrap();
        assert_eq!(outcome.probabilities.len(), classifier.n_classes());

        let sum: f64 = outcome.probabilities.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert_eq!(
            outcome.class_index,
            argmax(&outcome.probabilities) as i64
        );
    }

    #[test]
    fn identical_inputs_classify_identically() {
        let classifier = sample_classifier();
        let reading = Reading::new(1, "Loamy", 2, 35.0, 24.0, 60.0);

        let first = classifier.classify(&sample_context(), &reading).unwrap();
        let second = classifier.classify(&sample_context(), &reading).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn mean_valued_input_returns_baseline_class() {
        // A reading sitting exactly on the training mean scales to the
        // zero vector, so the logits reduce to the output biases and the
        // class with the highest prior must win.
        let scaler = StandardScaler {
            mean: vec![0.0, 0.0, 0.0, 0.0, 30.0, 22.0, 55.0],
            scale: vec![1.0, 1.0, 1.0, 1.0, 12.0, 6.0, 15.0],
        };
        let network = DenseNetwork {
            layers: vec![DenseLayer {
                weights: vec![
                    vec![0.7, -0.2, 0.4, 0.1, 0.3, -0.5, 0.2],
                    vec![-0.3, 0.6, 0.1, -0.4, 0.2, 0.3, -0.1],
                    vec![0.5, 0.5, -0.6, 0.2, -0.1, 0.4, 0.3],
                ],
                biases: vec![0.1, 0.9, 0.3],
                activation: Activation::Softmax,
            }],
        };
        let classifier = Classifier::from_artifacts(ModelArtifacts {
            network,
            columns: sample_columns(),
            scaler,
        });

        // Unseen categories keep every indicator at its zero mean; the
        // numerics are pinned to theirs.
        let context = ReadingContext {
            crop_name: "unseen".into(),
            soil: "unseen".into(),
            growth_stage_name: "unseen".into(),
        };
        let reading = Reading::new(1, "unseen", 2, 30.0, 22.0, 55.0);

        let outcome = classifier.classify(&context, &reading).unwrap();
        assert_eq!(outcome.class_index, 1);
    }

    #[test]
    fn column_width_drift_is_shape_mismatch_before_inference() {
        // 7 training columns but a network expecting 5 inputs: the
        // mismatch must surface as ShapeMismatch, not a bad prediction.
        let classifier = Classifier::from_artifacts(ModelArtifacts {
            network: DenseNetwork {
                layers: vec![DenseLayer {
                    weights: vec![vec![1.0; 5], vec![-1.0; 5]],
                    biases: vec![0.0, 0.0],
                    activation: Activation::Softmax,
                }],
            },
            columns: sample_columns(),
            scaler: identity_scaler(7),
        });

        let reading = Reading::new(1, "Loamy", 2, 35.0, 24.0, 60.0);
        let err = classifier
            .classify(&sample_context(), &reading)
            .unwrap_err();
        assert!(matches!(
            err,
            CropSenseError::ShapeMismatch {
                expected: 5,
                actual: 7
            }
        ));
    }

    #[test]
    fn scaler_width_drift_is_shape_mismatch_before_scaling() {
        let classifier = Classifier::from_artifacts(ModelArtifacts {
            network: sample_network(),
            columns: sample_columns(),
            scaler: identity_scaler(6),
        });

        let reading = Reading::new(1, "Loamy", 2, 35.0, 24.0, 60.0);
        let err = classifier
            .classify(&sample_context(), &reading)
            .unwrap_err();
        assert!(matches!(
            err,
            CropSenseError::ShapeMismatch {
                expected: 6,
                actual: 7
            }
        ));
    }

    #[test]
    fn unseen_category_still_classifies() {
        let classifier = sample_classifier();
        let context = ReadingContext {
            crop_name: "Dragonfruit".into(),
            soil: "Loamy".into(),
            growth_stage_name: "Flowering".into(),
        };
        let reading = Reading::new(1, "Loamy", 2, 35.0, 24.0, 60.0);

        let outcome = classifier.classify(&context, &reading).unwrap();
        assert!(outcome.class_index >= 0);
        assert!((outcome.probabilities.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }
}
