use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============ Domain Models ============

/// Disease category shared by the prediction forms and the specialist search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiseaseCategory {
    Diabetes,
    Heart,
    Kidney,
}

impl DiseaseCategory {
    pub const ALL: [DiseaseCategory; 3] = [
        DiseaseCategory::Diabetes,
        DiseaseCategory::Heart,
        DiseaseCategory::Kidney,
    ];

    /// Path segment used by every remote endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            DiseaseCategory::Diabetes => "diabetes",
            DiseaseCategory::Heart => "heart",
            DiseaseCategory::Kidney => "kidney",
        }
    }

    /// Specialty label shown next to the category in the facility finder.
    pub fn specialty(&self) -> &'static str {
        match self {
            DiseaseCategory::Diabetes => "Diabetes / Endocrinology",
            DiseaseCategory::Heart => "Heart Disease / Cardiology",
            DiseaseCategory::Kidney => "Kidney Disease / Nephrology",
        }
    }

    pub fn specialist_description(&self) -> &'static str {
        match self {
            DiseaseCategory::Diabetes => "Endocrinology specialists and diabetes clinics",
            DiseaseCategory::Heart => "Cardiologists and heart specialists",
            DiseaseCategory::Kidney => "Nephrologists and kidney disease specialists",
        }
    }
}

impl fmt::Display for DiseaseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiseaseCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "diabetes" => Ok(DiseaseCategory::Diabetes),
            "heart" => Ok(DiseaseCategory::Heart),
            "kidney" => Ok(DiseaseCategory::Kidney),
            other => Err(format!("Invalid disease type: {}", other)),
        }
    }
}

/// A device position, produced once per search invocation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both components are finite and inside WGS84 bounds.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// A medical facility shown in the finder, real or synthetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityRecord {
    /// Unique within one result set.
    pub id: String,
    pub name: String,
    pub address: String,
    pub rating: Option<f64>,
    pub rating_count: Option<u64>,
    pub latitude: f64,
    pub longitude: f64,
    pub distance_km: Option<f64>,
    pub phone: Option<String>,
    pub website: Option<String>,
}

/// Marker shown with every synthetic result set.
pub const DEMO_SOURCE_LABEL: &str = "Demo Mode";

/// Label of a remote source. Only `DataSource::remote` builds one, so it can
/// never spell the demo marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SourceLabel(String);

impl SourceLabel {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Where a facility result set came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DataSource {
    Remote(SourceLabel),
    Demo,
}

impl DataSource {
    /// Source reported by the facility-search service. Absent or blank labels
    /// become `"Unknown"`; a label impersonating the demo marker does too.
    pub fn remote(label: Option<String>) -> Self {
        match label.map(|l| l.trim().to_string()) {
            Some(l) if !l.is_empty() && !l.eq_ignore_ascii_case(DEMO_SOURCE_LABEL) => {
                DataSource::Remote(SourceLabel(l))
            }
            _ => DataSource::Remote(SourceLabel("Unknown".to_string())),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            DataSource::Remote(label) => label.as_str(),
            DataSource::Demo => DEMO_SOURCE_LABEL,
        }
    }

    pub fn is_demo(&self) -> bool {
        matches!(self, DataSource::Demo)
    }
}

/// Parameters of one facility search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchParameters {
    pub category: DiseaseCategory,
    radius_meters: u32,
}

impl SearchParameters {
    pub const MIN_RADIUS_METERS: u32 = 1_000;
    pub const MAX_RADIUS_METERS: u32 = 50_000;
    pub const DEFAULT_RADIUS_METERS: u32 = 5_000;

    /// Builds parameters with the radius clamped into the supported range.
    pub fn new(category: DiseaseCategory, radius_meters: i64) -> Self {
        let clamped = radius_meters.clamp(
            Self::MIN_RADIUS_METERS as i64,
            Self::MAX_RADIUS_METERS as i64,
        ) as u32;
        if clamped as i64 != radius_meters {
            tracing::debug!(
                "Search radius {}m clamped to {}m",
                radius_meters,
                clamped
            );
        }
        Self {
            category,
            radius_meters: clamped,
        }
    }

    /// Builds parameters from a kilometre input such as the radius text box.
    /// Non-finite input falls back to the default radius.
    pub fn from_kilometers(category: DiseaseCategory, km: f64) -> Self {
        if !km.is_finite() {
            return Self::new(category, Self::DEFAULT_RADIUS_METERS as i64);
        }
        let meters = (km * 1000.0).round();
        // Saturating float-to-int cast keeps huge inputs at the upper bound.
        Self::new(category, meters as i64)
    }

    pub fn radius_meters(&self) -> u32 {
        self.radius_meters
    }

    pub fn radius_km(&self) -> f64 {
        self.radius_meters as f64 / 1000.0
    }
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            category: DiseaseCategory::Diabetes,
            radius_meters: Self::DEFAULT_RADIUS_METERS,
        }
    }
}

/// Visual weight of a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    /// Something degraded but data is still shown (fallback, empty area).
    Warning,
    /// Nothing usable could be shown.
    Error,
}

/// A message for the user, tagged with how it should be presented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

/// Discrete risk tier assigned by the remote model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskZone {
    Green,
    Yellow,
    Red,
    Unknown,
}

impl RiskZone {
    /// Case-insensitive parse; anything unrecognised is `Unknown`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "green" => RiskZone::Green,
            "yellow" => RiskZone::Yellow,
            "red" => RiskZone::Red,
            _ => RiskZone::Unknown,
        }
    }

    pub fn headline(&self) -> &'static str {
        match self {
            RiskZone::Green => "Low Risk",
            RiskZone::Yellow => "Moderate Risk",
            RiskZone::Red => "High Risk",
            RiskZone::Unknown => "Risk Level Unknown",
        }
    }
}

/// Score and zone returned by the remote predictor. Immutable once received.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskResult {
    pub category: DiseaseCategory,
    /// In `[0, 100]`.
    pub score: f64,
    pub zone: RiskZone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AdviceCategory {
    Lifestyle,
    Diet,
    Exercise,
    Monitoring,
    Medical,
}

impl AdviceCategory {
    /// Display order.
    pub const ALL: [AdviceCategory; 5] = [
        AdviceCategory::Lifestyle,
        AdviceCategory::Diet,
        AdviceCategory::Exercise,
        AdviceCategory::Monitoring,
        AdviceCategory::Medical,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            AdviceCategory::Lifestyle => "Lifestyle Changes",
            AdviceCategory::Diet => "Dietary Recommendations",
            AdviceCategory::Exercise => "Exercise Routine",
            AdviceCategory::Monitoring => "Health Monitoring",
            AdviceCategory::Medical => "Medical Advice",
        }
    }
}

/// Categorized guidance fetched after a successful prediction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationSet {
    #[serde(default)]
    pub lifestyle: Vec<String>,
    #[serde(default)]
    pub diet: Vec<String>,
    #[serde(default)]
    pub exercise: Vec<String>,
    #[serde(default)]
    pub monitoring: Vec<String>,
    #[serde(default)]
    pub medical: Vec<String>,
}

impl RecommendationSet {
    pub fn get(&self, category: AdviceCategory) -> &[String] {
        match category {
            AdviceCategory::Lifestyle => &self.lifestyle,
            AdviceCategory::Diet => &self.diet,
            AdviceCategory::Exercise => &self.exercise,
            AdviceCategory::Monitoring => &self.monitoring,
            AdviceCategory::Medical => &self.medical,
        }
    }

    /// Non-empty sections in display order.
    pub fn sections(&self) -> impl Iterator<Item = (AdviceCategory, &[String])> + '_ {
        AdviceCategory::ALL
            .into_iter()
            .map(move |c| (c, self.get(c)))
            .filter(|(_, items)| !items.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.sections().next().is_none()
    }
}

/// A facility result set ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacilityResults {
    pub coordinate: Coordinate,
    pub facilities: Vec<FacilityRecord>,
    pub source: DataSource,
    pub notice: Option<Notice>,
    pub completed_at: DateTime<Utc>,
}

impl FacilityResults {
    pub fn count(&self) -> usize {
        self.facilities.len()
    }
}

// ============ Wire Models ============

/// Body of `GET /hospitals/{category}`. Facilities are kept as raw values so
/// that one malformed entry does not discard the whole response.
#[derive(Debug, Deserialize)]
pub(crate) struct HospitalsResponse {
    pub hospitals: Option<Vec<serde_json::Value>>,
    pub source: Option<String>,
    pub error: Option<String>,
    pub details: Option<String>,
    pub code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HospitalPayload {
    pub place_id: Option<String>,
    pub name: Option<String>,
    #[serde(alias = "address")]
    pub vicinity: Option<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u64>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub location: Option<LocationPayload>,
    pub distance_km: Option<f64>,
    pub phone: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LocationPayload {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// Body of a successful `POST /predict/{category}`.
#[derive(Debug, Deserialize)]
pub(crate) struct PredictionResponse {
    pub risk_score: f64,
    pub zone: Option<String>,
}

/// Body of `GET /recommendations/{category}`.
#[derive(Debug, Deserialize)]
pub(crate) struct RecommendationsResponse {
    #[serde(default)]
    pub recommendations: RecommendationSet,
}

/// Error envelope shared by every endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: String,
    pub details: Option<String>,
}
