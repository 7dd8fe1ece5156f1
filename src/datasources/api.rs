use crate::config::IngestApiConfig;
use crate::error::{CropSenseError, Result};
use crate::models::Reading;

/// Client for the external ingestion service. The API stores readings
/// as they arrive from the field sensors; classification pulls them
/// from here when not reading the local store directly.
pub struct ReadingsApiClient {
    client: reqwest::Client,
    config: IngestApiConfig,
}

impl ReadingsApiClient {
    pub fn new(config: IngestApiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Most recent reading, or `None` when the service has none yet.
    pub async fn fetch_latest(&self) -> Result<Option<Reading>> {
        let url = format!("{}/readings/", self.config.url.trim_end_matches('/'));

        let response = self.client.get(&url).send().await.map_err(|e| {
            CropSenseError::DataSourceUnavailable(format!("ingest API: {}", e))
        })?;

        if !response.status().is_success() {
            return Err(CropSenseError::DataSourceUnavailable(format!(
                "ingest API returned {}",
                response.status()
            )));
        }

        let mut readings: Vec<Reading> = response.json().await.map_err(|e| {
            CropSenseError::DataSourceUnavailable(format!(
                "Failed to parse ingest API response: {}",
                e
            ))
        })?;

        Ok(readings.pop())
    }

    pub async fn fetch_reading(&self, id: i64) -> Result<Option<Reading>> {
        let url = format!(
            "{}/readings/{}",
            self.config.url.trim_end_matches('/'),
            id
        );

        let response = self.client.get(&url).send().await.map_err(|e| {
            CropSenseError::DataSourceUnavailable(format!("ingest API: {}", e))
        })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(CropSenseError::DataSourceUnavailable(format!(
                "ingest API returned {}",
                response.status()
            )));
        }

        let reading: Reading = response.json().await.map_err(|e| {
            CropSenseError::DataSourceUnavailable(format!(
                "Failed to parse ingest API response: {}",
                e
            ))
        })?;

        Ok(Some(reading))
    }

    pub async fn test_connection(&self) -> Result<bool> {
        let url = format!("{}/readings/", self.config.url.trim_end_matches('/'));

        let response = self.client.get(&url).send().await.map_err(|e| {
            CropSenseError::DataSourceUnavailable(format!("ingest API: {}", e))
        })?;

        Ok(response.status().is_success())
    }
}
