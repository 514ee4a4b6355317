//! Health Assist client library
//!
//! Client-side core of the health-risk assistant: acquires the device
//! position, finds nearby medical facilities with a demo-data fallback, and
//! drives risk prediction followed by recommendation retrieval.
//!
//! # Modules
//!
//! - `core`: Domain workflows, models and errors.
//! - `integrations`: Remote services and platform capabilities.
//! - `obs`: Observability and logging.
//! - `config`: Configuration management.
//! - `demo_facilities`: Synthetic facilities shown when search is unavailable.
//! - `errors`: Error handling types.
//! - `facility_client`: Nearby-facility search client and outcome classification.
//! - `geolocation`: Single-shot device position acquisition.
//! - `health_probe`: API reachability check.
//! - `invocation`: Single-owner state slot shared by the workflows.
//! - `metrics`: Per-disease metric schemas and form validation.
//! - `models`: Core data models and wire payloads.
//! - `prediction`: Prediction workflow state machine.
//! - `prediction_client`: Risk prediction client.
//! - `recommendation_client`: Recommendation client.
//! - `search`: Facility search workflow state machine.

pub mod core;
pub mod integrations;
pub mod obs;

pub mod config;
pub mod demo_facilities;
pub mod errors;
pub mod facility_client;
pub mod geolocation;
pub mod health_probe;
mod invocation;
pub mod metrics;
pub mod models;
pub mod prediction;
pub mod prediction_client;
pub mod recommendation_client;
pub mod search;
