use super::reference::SoilLabel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One sensor observation: numeric fields plus the categorical context
/// needed to classify it. `result` stays `None` until a classification
/// has been stored; the pipeline itself never writes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub id: Option<i64>,
    pub crop_id: i64,
    #[serde(rename = "soil_name")]
    pub soil: SoilLabel,
    pub growth_stage_id: i64,
    /// Soil moisture, percent.
    pub moi: f64,
    /// Ambient temperature, degrees Celsius.
    pub temp: f64,
    /// Relative humidity, percent.
    pub humidity: f64,
    pub result: Option<i64>,
    pub timestamp: DateTime<Utc>,
}

impl Reading {
    pub fn new(
        crop_id: i64,
        soil: impl Into<SoilLabel>,
        growth_stage_id: i64,
        moi: f64,
        temp: f64,
        humidity: f64,
    ) -> Self {
        Self {
            id: None,
            crop_id,
            soil: soil.into(),
            growth_stage_id,
            moi,
            temp,
            humidity,
            result: None,
            timestamp: Utc::now(),
        }
    }
}

/// Resolved human-readable context for a reading. Crop and growth stage
/// come from reference-table lookups; the soil label is carried over
/// verbatim from the reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingContext {
    pub crop_name: String,
    pub soil: SoilLabel,
    pub growth_stage_name: String,
}
