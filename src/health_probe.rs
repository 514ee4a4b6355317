use crate::config::Config;
use crate::errors::AppError;
use reqwest::Client;
use std::time::Duration;

/// Reachability check against `GET /health`.
#[derive(Clone)]
pub struct HealthApi {
    client: Client,
    base_url: String,
}

impl HealthApi {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(5).min(config.request_timeout()))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create health client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
        })
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(AppError::TransportFailure(format!(
                "Health check returned {}",
                response.status()
            )));
        }

        tracing::debug!("Health API reachable at {}", self.base_url);
        Ok(())
    }
}
