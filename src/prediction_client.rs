use crate::config::Config;
use crate::errors::AppError;
use crate::metrics::HealthMetricsRecord;
use crate::models::{DiseaseCategory, ErrorEnvelope, PredictionResponse, RiskResult, RiskZone};
use reqwest::Client;

/// Client for `POST /predict/{category}`.
///
/// Score and zone are opaque model outputs; this type only marshals the
/// request and classifies failures.
#[derive(Clone)]
pub struct RiskPredictionClient {
    client: Client,
    base_url: String,
}

impl RiskPredictionClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create prediction client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
        })
    }

    /// Submits one metrics record. One request per call, no retries.
    ///
    /// # Errors
    ///
    /// * `ValidationFailure` - the service rejected the payload; the message is
    ///   the service's `error` field, verbatim.
    /// * `TransportFailure` - network error, timeout, or a response that is not
    ///   a usable prediction.
    pub async fn predict(
        &self,
        category: DiseaseCategory,
        metrics: &HealthMetricsRecord,
    ) -> Result<RiskResult, AppError> {
        if metrics.category() != category {
            return Err(AppError::ValidationFailure(format!(
                "Metrics were collected for {}, not {}",
                metrics.category(),
                category
            )));
        }

        let url = format!("{}/predict/{}", self.base_url, category.as_str());
        tracing::info!(
            "Requesting {} risk prediction ({} fields)",
            category,
            metrics.len()
        );

        let response = self
            .client
            .post(&url)
            .json(metrics)
            .send()
            .await
            .map_err(|e| {
                AppError::TransportFailure(format!("Prediction request failed: {}", e))
            })?;

        let status = response.status();
        let body: serde_json::Value = response.json().await.map_err(|e| {
            AppError::TransportFailure(format!(
                "Failed to parse prediction response ({}): {}",
                status, e
            ))
        })?;

        if let Ok(envelope) = serde_json::from_value::<ErrorEnvelope>(body.clone()) {
            tracing::warn!("Prediction rejected ({}): {}", status, envelope.error);
            return Err(AppError::ValidationFailure(envelope.error));
        }

        if !status.is_success() {
            return Err(AppError::TransportFailure(format!(
                "Prediction service returned {}",
                status
            )));
        }

        let parsed: PredictionResponse = serde_json::from_value(body).map_err(|e| {
            AppError::TransportFailure(format!("Unexpected prediction response: {}", e))
        })?;

        if !parsed.risk_score.is_finite() || !(0.0..=100.0).contains(&parsed.risk_score) {
            return Err(AppError::TransportFailure(format!(
                "Risk score out of range: {}",
                parsed.risk_score
            )));
        }

        let zone = parsed
            .zone
            .as_deref()
            .map(RiskZone::parse)
            .unwrap_or(RiskZone::Unknown);

        tracing::info!(
            "✓ {} risk prediction received: {:.2} ({:?})",
            category,
            parsed.risk_score,
            zone
        );

        Ok(RiskResult {
            category,
            score: parsed.risk_score,
            zone,
        })
    }
}
