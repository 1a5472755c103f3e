//! Dataset provider: HTTP fetch, local file, or synthetic sample.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::blocking::Client;

use crate::data::sample::{SampleConfig, generate_dataset};
use crate::domain::Dataset;
use crate::error::AppError;

/// Historical automobile sales published by the IBM Skills Network course.
pub const DEFAULT_DATA_URL: &str = "https://cf-courses-data.s3.us.cloud-object-storage.appdomain.cloud/IBMDeveloperSkillsNetwork-DV0101EN-SkillsNetwork/Data%20Files/historical_automobile_sales.csv";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where the sales table comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetSource {
    Url(String),
    File(PathBuf),
    Sample(SampleConfig),
}

impl DatasetSource {
    pub fn describe(&self) -> String {
        match self {
            DatasetSource::Url(url) => url.clone(),
            DatasetSource::File(path) => path.display().to_string(),
            DatasetSource::Sample(cfg) => format!("synthetic sample (seed {})", cfg.seed),
        }
    }

    /// Load the whole table. Blocks until the table is complete or fails.
    pub fn load(&self, timeout: Duration) -> Result<Dataset, AppError> {
        tracing::info!(source = %self.describe(), "loading dataset");
        let dataset = match self {
            DatasetSource::Url(url) => DatasetClient::new(url.clone(), timeout)?.fetch()?,
            DatasetSource::File(path) => crate::io::ingest::load_csv_file(path)?,
            DatasetSource::Sample(cfg) => generate_dataset(cfg)?,
        };
        tracing::info!(
            rows = dataset.stats.rows_used,
            skipped = dataset.row_errors.len(),
            years = %format!("{}-{}", dataset.stats.year_min, dataset.stats.year_max),
            "dataset ready"
        );
        Ok(dataset)
    }
}

/// Blocking HTTP client for the published CSV.
pub struct DatasetClient {
    client: Client,
    url: String,
}

impl DatasetClient {
    pub fn new(url: String, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::new(4, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, url })
    }

    pub fn fetch(&self) -> Result<Dataset, AppError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| AppError::new(4, format!("Dataset request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("Dataset request failed with status {}.", resp.status()),
            ));
        }

        let body = resp
            .bytes()
            .map_err(|e| AppError::new(4, format!("Failed to read dataset response: {e}")))?;
        tracing::debug!(bytes = body.len(), url = %self.url, "dataset downloaded");

        crate::io::ingest::read_dataset(&body[..], &self.url)
    }
}
