use serde::{Deserialize, Serialize};

/// A crop variety the model was trained to recognize by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crop {
    pub id: Option<i64>,
    pub name: String,
}

impl Crop {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

/// A known soil type. Reference data only: readings store a free-form
/// soil label rather than a foreign key into this table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilType {
    pub id: Option<i64>,
    pub name: String,
}

impl SoilType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthStage {
    pub id: Option<i64>,
    pub name: String,
}

impl GrowthStage {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

/// Soil label carried directly on a reading. Unlike `crop_id` and
/// `growth_stage_id` this is an unchecked string with no referential
/// guarantee: it may name a row in `soil_types`, or nothing at all.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SoilLabel(String);

impl SoilLabel {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SoilLabel {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SoilLabel {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for SoilLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
