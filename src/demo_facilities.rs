use crate::models::{Coordinate, FacilityRecord};

/// Number of synthetic facilities in every demo result set.
pub const DEMO_FACILITY_COUNT: usize = 5;

/// Largest latitude/longitude offset applied to the anchor, in degrees.
pub const MAX_DEMO_OFFSET_DEGREES: f64 = 0.02;

struct DemoTemplate {
    name: &'static str,
    address: &'static str,
    rating: f64,
    rating_count: u64,
    d_lat: f64,
    d_lng: f64,
}

const TEMPLATES: [DemoTemplate; DEMO_FACILITY_COUNT] = [
    DemoTemplate {
        name: "City General Hospital",
        address: "123 Main Street, Downtown",
        rating: 4.5,
        rating_count: 1250,
        d_lat: 0.01,
        d_lng: 0.01,
    },
    DemoTemplate {
        name: "Medical Center - Specialty Clinic",
        address: "456 Health Avenue, Medical District",
        rating: 4.7,
        rating_count: 890,
        d_lat: -0.01,
        d_lng: 0.015,
    },
    DemoTemplate {
        name: "Community Healthcare Center",
        address: "789 Care Street, Uptown",
        rating: 4.3,
        rating_count: 650,
        d_lat: 0.015,
        d_lng: -0.01,
    },
    DemoTemplate {
        name: "University Medical Center",
        address: "321 University Boulevard",
        rating: 4.8,
        rating_count: 2100,
        d_lat: -0.015,
        d_lng: -0.015,
    },
    DemoTemplate {
        name: "Regional Health Clinic",
        address: "555 Wellness Way, East Side",
        rating: 4.2,
        rating_count: 420,
        d_lat: 0.02,
        d_lng: 0.0,
    },
];

/// Synthesizes the fixed set of demo facilities around `anchor`.
///
/// Pure: the same anchor always yields the same records. Callers must tag the
/// result with `DataSource::Demo`.
pub fn generate(anchor: Coordinate) -> Vec<FacilityRecord> {
    TEMPLATES
        .iter()
        .enumerate()
        .map(|(i, t)| FacilityRecord {
            id: format!("demo_{}", i + 1),
            name: t.name.to_string(),
            address: t.address.to_string(),
            rating: Some(t.rating),
            rating_count: Some(t.rating_count),
            latitude: anchor.latitude + t.d_lat,
            longitude: anchor.longitude + t.d_lng,
            distance_km: None,
            phone: None,
            website: None,
        })
        .collect()
}
