use crate::error::{CropSenseError, Result};
use serde::{Deserialize, Serialize};

/// Frozen standardization parameters fitted at training time. Applied
/// unchanged at inference; never refitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn width(&self) -> usize {
        self.mean.len()
    }

    /// Internal consistency check, run once at artifact load.
    pub fn validate(&self) -> Result<()> {
        if self.mean.len() != self.scale.len() {
            return Err(CropSenseError::ArtifactLoad(format!(
                "scaler mean/scale length mismatch: {} vs {}",
                self.mean.len(),
                self.scale.len()
            )));
        }
        if self.scale.iter().any(|s| *s == 0.0 || !s.is_finite()) {
            return Err(CropSenseError::ArtifactLoad(
                "scaler has zero or non-finite scale entries".into(),
            ));
        }
        Ok(())
    }

    pub fn transform(&self, features: &[f64]) -> Result<Vec<f64>> {
        if features.len() != self.mean.len() {
            return Err(CropSenseError::ShapeMismatch {
                expected: self.mean.len(),
                actual: features.len(),
            });
        }

        Ok(features
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_scaler() -> StandardScaler {
        StandardScaler {
            mean: vec![10.0, 20.0, 30.0],
            scale: vec![2.0, 5.0, 10.0],
        }
    }

    #[test]
    fn transform_standardizes_elementwise() {
        let scaler = sample_scaler();
        let out = scaler.transform(&[12.0, 10.0, 30.0]).unwrap();
        assert_eq!(out, vec![1.0, -2.0, 0.0]);
    }

    #[test]
    fn mean_input_maps_to_zero_vector() {
        let scaler = sample_scaler();
        let out = scaler.transform(&[10.0, 20.0, 30.0]).unwrap();
        assert!(out.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn width_mismatch_is_rejected() {
        let scaler = sample_scaler();
        let err = scaler.transform(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            CropSenseError::ShapeMismatch {
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn validate_rejects_degenerate_parameters() {
        let mismatched = StandardScaler {
            mean: vec![0.0, 0.0],
            scale: vec![1.0],
        };
        assert!(matches!(
            mismatched.validate(),
            Err(CropSenseError::ArtifactLoad(_))
        ));

        let zero_scale = StandardScaler {
            mean: vec![0.0],
            scale: vec![0.0],
        };
        assert!(matches!(
            zero_scale.validate(),
            Err(CropSenseError::ArtifactLoad(_))
        ));

        assert!(sample_scaler().validate().is_ok());
    }
}
