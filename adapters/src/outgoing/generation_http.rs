use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

use domain::media::GeneratedAssetRef;
use postflow_application::{
    error::{AppError, AppResult},
    infrastructure_config::GenerationConfig,
    ports::outgoing::generation_engine::GenerationEnginePort,
};

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    video_id: String,
}

/// Talks to the external generation engine over plain HTTP.
pub struct HttpGenerationEngine {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpGenerationEngine {
    pub fn new(endpoint: Url, request_timeout: Option<Duration>) -> AppResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(request_timeout) = request_timeout {
            builder = builder.timeout(request_timeout);
        }

        let client = builder.build().map_err(|e| AppError::ConfigError {
            message: format!("Failed to build generation HTTP client: {e}"),
        })?;

        Ok(Self { client, endpoint })
    }

    pub fn from_config(config: &GenerationConfig) -> AppResult<Self> {
        Self::new(
            config.endpoint()?,
            config.request_timeout_secs.map(Duration::from_secs),
        )
    }

    fn upstream(message: String) -> AppError {
        warn!("{}", message);
        AppError::UpstreamError { message }
    }
}

#[async_trait::async_trait]
impl GenerationEnginePort for HttpGenerationEngine {
    #[instrument(skip(self, request_body), fields(endpoint = %self.endpoint))]
    async fn generate(&self, request_body: Bytes) -> AppResult<GeneratedAssetRef> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(request_body)
            .send()
            .await
            .map_err(|e| Self::upstream(format!("Generation request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::upstream(format!(
                "Generation engine returned status {status}"
            )));
        }

        let body: GenerationResponse = response
            .json()
            .await
            .map_err(|e| Self::upstream(format!("Malformed generation response: {e}")))?;

        let reference = GeneratedAssetRef::new(body.video_id)
            .map_err(|e| Self::upstream(format!("Unusable generation reference: {e}")))?;

        debug!(reference = reference.as_str(), "Generation engine answered");

        Ok(reference)
    }
}
