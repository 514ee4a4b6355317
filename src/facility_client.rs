use crate::config::Config;
use crate::errors::AppError;
use crate::models::{
    Coordinate, DataSource, FacilityRecord, HospitalPayload, HospitalsResponse, SearchParameters,
};
use reqwest::{Client, StatusCode};
use std::collections::HashSet;

/// Error code a facility-search service may send to say it is unprovisioned.
pub const SERVICE_UNAVAILABLE_CODE: &str = "service_unavailable";

/// Classified result of one facility search request.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Non-empty result set.
    Success {
        facilities: Vec<FacilityRecord>,
        source: DataSource,
    },
    /// Request succeeded but returned no facilities.
    EmptyResult,
    /// The service reports it is not configured (e.g. missing upstream key).
    ServiceUnavailable { detail: String },
    /// Unreachable, timed out, or returned something unparsable.
    NetworkFailure { detail: String },
    /// The service answered with an error that is neither of the above.
    Rejected {
        error: String,
        details: Option<String>,
    },
}

impl SearchOutcome {
    /// Whether this outcome is answered with demo data.
    pub fn triggers_fallback(&self) -> bool {
        matches!(
            self,
            SearchOutcome::ServiceUnavailable { .. } | SearchOutcome::NetworkFailure { .. }
        )
    }
}

/// Client for `GET /hospitals/{category}`.
#[derive(Clone)]
pub struct FacilitySearchClient {
    client: Client,
    base_url: String,
}

impl FacilitySearchClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| {
                AppError::Config(format!("Failed to create facility search client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
        })
    }

    /// Issues exactly one request and classifies the response. Never retries.
    pub async fn search(&self, coord: Coordinate, params: SearchParameters) -> SearchOutcome {
        let url = match reqwest::Url::parse_with_params(
            &format!("{}/hospitals/{}", self.base_url, params.category.as_str()),
            &[
                ("lat", coord.latitude.to_string()),
                ("lng", coord.longitude.to_string()),
                ("radius", params.radius_meters().to_string()),
            ],
        ) {
            Ok(url) => url,
            Err(e) => {
                return SearchOutcome::NetworkFailure {
                    detail: format!("Failed to build URL: {}", e),
                }
            }
        };

        tracing::info!(
            "Searching {} facilities within {}m",
            params.category,
            params.radius_meters()
        );
        tracing::debug!("Facility search URL: {}", url);

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Facility search request failed: {}", e);
                return SearchOutcome::NetworkFailure {
                    detail: format!("Facility search request failed: {}", e),
                };
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::error!("Failed to read facility search response: {}", e);
                return SearchOutcome::NetworkFailure {
                    detail: format!("Failed to read facility search response: {}", e),
                };
            }
        };

        classify_response(status, &body)
    }
}

/// Maps a status code and raw body onto a `SearchOutcome`.
pub fn classify_response(status: StatusCode, body: &str) -> SearchOutcome {
    let parsed = serde_json::from_str::<HospitalsResponse>(body);

    if status == StatusCode::SERVICE_UNAVAILABLE {
        let detail = parsed
            .ok()
            .and_then(|r| r.error)
            .unwrap_or_else(|| format!("Facility search returned {}", status));
        tracing::warn!("Facility search unavailable: {}", detail);
        return SearchOutcome::ServiceUnavailable { detail };
    }

    let parsed = match parsed {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::error!("Malformed facility search response ({}): {}", status, e);
            return SearchOutcome::NetworkFailure {
                detail: format!("Malformed facility search response: {}", e),
            };
        }
    };

    if let Some(error) = parsed.error {
        // The structured code wins; the prose match covers services that only
        // send a message.
        let unprovisioned = parsed.code.as_deref() == Some(SERVICE_UNAVAILABLE_CODE)
            || error.to_ascii_lowercase().contains("not configured");
        if unprovisioned {
            tracing::warn!("Facility search not configured: {}", error);
            return SearchOutcome::ServiceUnavailable { detail: error };
        }
        tracing::error!("Facility search returned error {}: {}", status, error);
        return SearchOutcome::Rejected {
            error,
            details: parsed.details,
        };
    }

    if !status.is_success() {
        return SearchOutcome::Rejected {
            error: format!("Facility search returned status {}", status),
            details: None,
        };
    }

    let facilities = to_facility_records(parsed.hospitals.unwrap_or_default());
    if facilities.is_empty() {
        tracing::info!("Facility search returned no facilities");
        return SearchOutcome::EmptyResult;
    }

    tracing::info!("Received {} facilities", facilities.len());
    SearchOutcome::Success {
        facilities,
        source: DataSource::remote(parsed.source),
    }
}

/// Converts raw facility objects into records, dropping unusable entries and
/// keeping ids unique within the set.
fn to_facility_records(raw: Vec<serde_json::Value>) -> Vec<FacilityRecord> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut records = Vec::with_capacity(raw.len());

    for (index, value) in raw.into_iter().enumerate() {
        let payload: HospitalPayload = match serde_json::from_value(value) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("Skipping malformed facility #{}: {}", index, e);
                continue;
            }
        };

        let latitude = payload
            .lat
            .or_else(|| payload.location.as_ref().and_then(|l| l.lat));
        let longitude = payload
            .lng
            .or_else(|| payload.location.as_ref().and_then(|l| l.lng));
        let (Some(latitude), Some(longitude)) = (latitude, longitude) else {
            tracing::warn!("Skipping facility #{} without coordinates", index);
            continue;
        };

        let base_id =
            non_blank(payload.place_id).unwrap_or_else(|| format!("facility_{}", index + 1));
        let mut id = base_id.clone();
        let mut n = 2;
        while taken.contains(&id) {
            id = format!("{}-{}", base_id, n);
            n += 1;
        }
        if id != base_id {
            tracing::warn!("Duplicate facility id {}, stored as {}", base_id, id);
        }
        taken.insert(id.clone());

        records.push(FacilityRecord {
            id,
            name: non_blank(payload.name).unwrap_or_else(|| "Unnamed facility".to_string()),
            address: non_blank(payload.vicinity).unwrap_or_default(),
            rating: payload.rating,
            rating_count: payload.user_ratings_total,
            latitude,
            longitude,
            distance_km: payload.distance_km,
            phone: non_blank(payload.phone),
            website: non_blank(payload.website),
        });
    }

    records
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
