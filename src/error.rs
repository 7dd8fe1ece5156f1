use thiserror::Error;

#[derive(Error, Debug)]
pub enum CropSenseError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Missing reference: {entity} id {id} does not exist")]
    MissingReference { entity: &'static str, id: i64 },

    #[error("Artifact load error: {0}")]
    ArtifactLoad(String),

    #[error("Shape mismatch: expected {expected} features, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Data source unavailable: {0}")]
    DataSourceUnavailable(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, CropSenseError>;
