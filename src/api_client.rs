use crate::config::Config;
use crate::errors::{AppError, PREDICTION_FAILED};
use crate::models::{ErrorBody, MetaResponse, PredictRequest, PredictResponse};
use reqwest;
use std::time::Duration;
use tracing;

/// Client for the course-load risk prediction service.
///
/// Every call is a single round trip: no retries and no caching.
#[derive(Clone)]
pub struct RiskApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl RiskApiClient {
    /// Creates a new `RiskApiClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Origin of the prediction service, e.g. `http://localhost:8000`.
    /// * `timeout` - Optional per-request timeout. `None` waits indefinitely.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, AppError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            AppError::Config(format!("Failed to create risk API client: {}", e))
        })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Creates a client from the loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::new(config.api_base_url.clone(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches the model metadata.
    ///
    /// # Returns
    ///
    /// * `Result<MetaResponse, AppError>` - The metadata, `AppError::MetadataFetch` on a
    ///   non-success status, or `AppError::Transport` when no response arrived.
    pub async fn get_meta(&self) -> Result<MetaResponse, AppError> {
        let url = format!("{}/meta", self.base_url);
        tracing::info!("Fetching model metadata: {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            tracing::warn!("GET /meta returned {}", response.status());
            return Err(AppError::MetadataFetch);
        }

        let meta: MetaResponse = response.json().await?;
        tracing::info!(
            "Model {} expects {} features",
            meta.model_tag,
            meta.feature_names().len()
        );
        Ok(meta)
    }

    /// Requests a prediction for the given features.
    ///
    /// # Arguments
    ///
    /// * `request` - The coerced feature values.
    ///
    /// # Returns
    ///
    /// * `Result<PredictResponse, AppError>` - The prediction, or `AppError::Prediction`
    ///   carrying the backend `detail` (or a generic message) on a non-success status.
    pub async fn predict(&self, request: &PredictRequest) -> Result<PredictResponse, AppError> {
        let url = format!("{}/predict", self.base_url);
        tracing::info!("Requesting prediction for {} features", request.features.len());
        tracing::debug!("Prediction payload: {:?}", request.features);

        let response = self.client.post(&url).json(request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body
                    .message()
                    .map(str::to_string)
                    .unwrap_or_else(|| PREDICTION_FAILED.to_string()),
                Err(_) => PREDICTION_FAILED.to_string(),
            };
            tracing::warn!("POST /predict returned {}: {}", status, message);
            return Err(AppError::Prediction(message));
        }

        // Parsed as plain JSON; only a body that is not JSON at all is an error.
        let body: serde_json::Value = response.json().await?;
        let prediction = PredictResponse::from(body);
        tracing::info!(
            "Prediction received: score={} level={}",
            prediction.score_text(),
            prediction.risk_level
        );
        Ok(prediction)
    }

    /// Checks the backend liveness endpoint.
    pub async fn health(&self) -> Result<serde_json::Value, AppError> {
        let url = format!("{}/health", self.base_url);
        tracing::info!("Checking backend health: {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Transport(format!(
                "Health check returned {}: {}",
                status, error_text
            )));
        }

        Ok(response.json().await?)
    }
}
