use crate::config::Config;
use crate::errors::AppError;
use crate::models::{DiseaseCategory, ErrorEnvelope, RecommendationSet, RecommendationsResponse};
use reqwest::Client;

/// Client for `GET /recommendations/{category}?risk_score=`.
#[derive(Clone)]
pub struct RecommendationClient {
    client: Client,
    base_url: String,
}

impl RecommendationClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| {
                AppError::Config(format!("Failed to create recommendation client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
        })
    }

    /// Fetches guidance for a score obtained from a prior prediction.
    ///
    /// Every failure is a `TransportFailure`; the caller keeps showing the
    /// risk result regardless.
    pub async fn get_recommendations(
        &self,
        category: DiseaseCategory,
        score: f64,
    ) -> Result<RecommendationSet, AppError> {
        let url = reqwest::Url::parse_with_params(
            &format!("{}/recommendations/{}", self.base_url, category.as_str()),
            &[("risk_score", score.to_string())],
        )
        .map_err(|e| AppError::TransportFailure(format!("Failed to build URL: {}", e)))?;

        tracing::info!("Fetching {} recommendations", category);
        tracing::debug!("Recommendations URL: {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            AppError::TransportFailure(format!("Recommendations request failed: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .json::<ErrorEnvelope>()
                .await
                .map(|e| match e.details {
                    Some(details) => format!("{}: {}", e.error, details),
                    None => e.error,
                })
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!("Recommendations returned {}: {}", status, error_text);
            return Err(AppError::TransportFailure(format!(
                "Recommendations returned status {}: {}",
                status, error_text
            )));
        }

        let parsed: RecommendationsResponse = response.json().await.map_err(|e| {
            AppError::TransportFailure(format!("Failed to parse recommendations response: {}", e))
        })?;

        let sections = parsed.recommendations.sections().count();
        tracing::info!("✓ Received {} recommendation sections", sections);
        Ok(parsed.recommendations)
    }
}
