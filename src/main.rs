use health_assist::config::Config;
use health_assist::core::models::{DiseaseCategory, SearchParameters};
use health_assist::core::search::{SearchOrchestrator, SearchState};
use health_assist::integrations::facility_client::FacilitySearchClient;
use health_assist::integrations::geolocation::{FixedPosition, GeoLocator};
use health_assist::integrations::health_probe::HealthApi;
use health_assist::obs;
use std::sync::Arc;

/// Smoke driver for the facility finder.
///
/// Loads configuration, checks the API is reachable, then runs one specialist
/// search from the configured position (or reports that positioning is
/// unavailable when none is configured).
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    obs::init_tracing("health_assist=debug");

    let config = Config::from_env()?;

    let health = HealthApi::new(&config)?;
    match health.ping().await {
        Ok(()) => tracing::info!("✓ Health API reachable: {}", config.api_base_url),
        Err(e) => tracing::warn!("Health API not reachable, demo data expected: {}", e),
    }

    let locator = match config.demo_position {
        Some(position) => GeoLocator::new(Arc::new(FixedPosition(position))),
        None => GeoLocator::unsupported(),
    };
    let finder = SearchOrchestrator::new(locator, FacilitySearchClient::new(&config)?);

    let params = SearchParameters::new(
        DiseaseCategory::Diabetes,
        SearchParameters::DEFAULT_RADIUS_METERS as i64,
    );

    match finder.search(params).await {
        Some(SearchState::Displaying(results)) | Some(SearchState::DisplayingFallback(results)) => {
            if let Some(notice) = &results.notice {
                tracing::warn!("{:?}: {}", notice.severity, notice.message);
            }
            tracing::info!(
                "{} facilities ({})",
                results.count(),
                results.source.label()
            );
            for facility in &results.facilities {
                tracing::info!(
                    "  {} - {} ({})",
                    facility.name,
                    facility.address,
                    facility
                        .rating
                        .map(|r| format!("{:.1}★", r))
                        .unwrap_or_else(|| "unrated".to_string())
                );
            }
        }
        Some(SearchState::Failed { notice, .. }) => tracing::error!("{}", notice.message),
        other => tracing::debug!("Search ended in {:?}", other),
    }

    Ok(())
}
