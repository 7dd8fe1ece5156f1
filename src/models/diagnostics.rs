use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Append-only diagnostic trail. Written as a side effect by whatever
/// component has something to report; never read by the classification
/// path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: Option<i64>,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}
