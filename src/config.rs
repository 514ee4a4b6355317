use crate::models::Coordinate;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5001";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the health API (prediction, recommendations, facility search).
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    /// Fixed position for the demo driver; the library never reads it.
    pub demo_position: Option<Coordinate>,
}

impl Config {
    /// Configuration pointing at `api_base_url` with default timeouts.
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: normalize_base_url(&api_base_url.into()),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            demo_position: None,
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            api_base_url: std::env::var("HEALTH_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string())
                .parse_base_url()?,
            request_timeout_secs: std::env::var("HEALTH_API_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| {
                    anyhow::anyhow!("HEALTH_API_TIMEOUT_SECS must be a positive number of seconds")
                })?,
            demo_position: demo_position_from_env()?,
        };

        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Health API base URL: {}", config.api_base_url);
        tracing::debug!("Request timeout: {}s", config.request_timeout_secs);
        if config.demo_position.is_some() {
            tracing::info!("Demo position configured");
        }

        Ok(config)
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}

trait ParseBaseUrl {
    fn parse_base_url(self) -> anyhow::Result<String>;
}

impl ParseBaseUrl for String {
    fn parse_base_url(self) -> anyhow::Result<String> {
        if self.trim().is_empty() {
            anyhow::bail!("HEALTH_API_BASE_URL cannot be empty");
        }
        if !self.starts_with("http://") && !self.starts_with("https://") {
            anyhow::bail!("HEALTH_API_BASE_URL must start with http:// or https://");
        }
        url::Url::parse(&self)
            .map_err(|e| anyhow::anyhow!("HEALTH_API_BASE_URL is not a valid URL: {}", e))?;
        Ok(normalize_base_url(&self))
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn demo_position_from_env() -> anyhow::Result<Option<Coordinate>> {
    let lat = std::env::var("HEALTH_ASSIST_LAT").ok();
    let lng = std::env::var("HEALTH_ASSIST_LNG").ok();

    match (lat, lng) {
        (None, None) => Ok(None),
        (Some(lat), Some(lng)) => {
            let coordinate = Coordinate::new(
                lat.trim()
                    .parse()
                    .map_err(|_| anyhow::anyhow!("HEALTH_ASSIST_LAT must be a number"))?,
                lng.trim()
                    .parse()
                    .map_err(|_| anyhow::anyhow!("HEALTH_ASSIST_LNG must be a number"))?,
            );
            if !coordinate.is_valid() {
                anyhow::bail!("HEALTH_ASSIST_LAT/HEALTH_ASSIST_LNG are out of range");
            }
            Ok(Some(coordinate))
        }
        _ => anyhow::bail!("HEALTH_ASSIST_LAT and HEALTH_ASSIST_LNG must be set together"),
    }
}
