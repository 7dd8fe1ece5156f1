use crate::models::{Reading, ReadingContext};
use std::collections::HashMap;

// Categorical column headers as they appear in the training dataset.
// `Seedling Stage` is the growth-stage column; the headers are frozen
// with the model and cannot be renamed here.
pub const CROP_COLUMN: &str = "crop ID";
pub const SOIL_COLUMN: &str = "soil_type";
pub const GROWTH_STAGE_COLUMN: &str = "Seedling Stage";

pub const MOISTURE_COLUMN: &str = "MOI";
pub const TEMPERATURE_COLUMN: &str = "temp";
pub const HUMIDITY_COLUMN: &str = "humidity";

/// Builds model-ready feature vectors from resolved context and raw
/// sensor values.
///
/// The training-time column list defines both the vector width and the
/// position of every feature. Indicator columns are named
/// `<column>_<category>`; numeric columns use their literal header. The
/// name → offset map is built once, so encoding is a handful of index
/// writes into a zero-filled vector.
pub struct FeatureEncoder {
    columns: Vec<String>,
    offsets: HashMap<String, usize>,
}

impl FeatureEncoder {
    pub fn new(training_columns: Vec<String>) -> Self {
        let offsets = training_columns
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self {
            columns: training_columns,
            offsets,
        }
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Category names the model was trained on for one categorical
    /// column.
    pub fn known_categories(&self, column: &str) -> Vec<&str> {
        let prefix = format!("{}_", column);
        self.columns
            .iter()
            .filter_map(|c| c.strip_prefix(prefix.as_str()))
            .collect()
    }

    /// Produce a vector of exactly `width()` entries in training-column
    /// order: 1.0 at each matching categorical indicator, raw values at
    /// the numeric offsets, 0.0 everywhere else.
    ///
    /// A category the model never saw is not an error: it is logged and
    /// its dimension stays all-zero, which is what reindexing against
    /// the training columns produced in the training pipeline.
    pub fn encode(&self, context: &ReadingContext, reading: &Reading) -> Vec<f64> {
        let mut features = vec![0.0; self.columns.len()];

        self.set_indicator(&mut features, CROP_COLUMN, &context.crop_name);
        self.set_indicator(&mut features, SOIL_COLUMN, context.soil.as_str());
        self.set_indicator(&mut features, GROWTH_STAGE_COLUMN, &context.growth_stage_name);

        self.set_numeric(&mut features, MOISTURE_COLUMN, reading.moi);
        self.set_numeric(&mut features, TEMPERATURE_COLUMN, reading.temp);
        self.set_numeric(&mut features, HUMIDITY_COLUMN, reading.humidity);

        features
    }

    fn set_indicator(&self, features: &mut [f64], column: &str, category: &str) {
        let name = format!("{}_{}", column, category);
        match self.offsets.get(&name) {
            Some(&offset) => features[offset] = 1.0,
            None => tracing::warn!(
                column,
                category,
                "category unseen at training time; indicators stay zero"
            ),
        }
    }

    fn set_numeric(&self, features: &mut [f64], column: &str, value: f64) {
        match self.offsets.get(column) {
            Some(&offset) => features[offset] = value,
            None => tracing::warn!(column, "numeric column missing from training columns"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_columns() -> Vec<String> {
        [
            "crop ID_Tomato",
            "crop ID_Wheat",
            "soil_type_Loamy",
            "soil_type_Sandy",
            "Seedling Stage_Flowering",
            "Seedling Stage_Seedling",
            "MOI",
            "temp",
            "humidity",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn sample_context() -> ReadingContext {
        ReadingContext {
            crop_name: "Tomato".into(),
            soil: "Loamy".into(),
            growth_stage_name: "Flowering".into(),
        }
    }

    fn sample_reading() -> Reading {
        Reading::new(1, "Loamy", 2, 35.0, 24.0, 60.0)
    }

    #[test]
    fn encodes_in_training_column_order() {
        let encoder = FeatureEncoder::new(sample_columns());
        let features = encoder.encode(&sample_context(), &sample_reading());

        assert_eq!(features.len(), encoder.width());
        assert_eq!(
            features,
            vec![1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 35.0, 24.0, 60.0]
        );
    }

    #[test]
    fn one_indicator_per_categorical_dimension() {
        let encoder = FeatureEncoder::new(sample_columns());
        let features = encoder.encode(&sample_context(), &sample_reading());

        // Exactly three indicator positions are set.
        let ones = features[..6].iter().filter(|v| **v == 1.0).count();
        assert_eq!(ones, 3);
    }

    #[test]
    fn unseen_category_zero_fills_without_error() {
        let encoder = FeatureEncoder::new(sample_columns());
        let context = ReadingContext {
            crop_name: "Dragonfruit".into(),
            soil: "Loamy".into(),
            growth_stage_name: "Flowering".into(),
        };

        let features = encoder.encode(&context, &sample_reading());

        // Both crop indicators stay zero; everything else is untouched.
        assert_eq!(features[0], 0.0);
        assert_eq!(features[1], 0.0);
        assert_eq!(features[2], 1.0);
        assert_eq!(features[6], 35.0);
    }

    #[test]
    fn encoding_is_deterministic() {
        let encoder = FeatureEncoder::new(sample_columns());
        let a = encoder.encode(&sample_context(), &sample_reading());
        let b = encoder.encode(&sample_context(), &sample_reading());
        assert_eq!(a, b);
    }

    #[test]
    fn known_categories_per_column() {
        let encoder = FeatureEncoder::new(sample_columns());
        assert_eq!(encoder.known_categories(CROP_COLUMN), vec!["Tomato", "Wheat"]);
        assert_eq!(
            encoder.known_categories(GROWTH_STAGE_COLUMN),
            vec!["Flowering", "Seedling"]
        );
        assert!(encoder.known_categories("no such column").is_empty());
    }
}
