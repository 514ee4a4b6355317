//! Device position acquisition.
//!
//! Platforms expose positioning as a callback-based request. `GeoLocator`
//! turns that into a single awaitable acquisition with two failure kinds:
//! no capability at all, or a failed acquisition of any cause.

use crate::errors::AppError;
use crate::models::Coordinate;
use std::fmt;
use std::sync::Arc;
use tokio::sync::oneshot;

/// Why the platform could not produce a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionErrorCode {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
}

impl fmt::Display for PositionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionErrorCode::PermissionDenied => f.write_str("permission denied"),
            PositionErrorCode::PositionUnavailable => f.write_str("position unavailable"),
            PositionErrorCode::Timeout => f.write_str("timeout"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionError {
    pub code: PositionErrorCode,
    pub message: String,
}

pub type PositionCallback = Box<dyn FnOnce(Result<Coordinate, PositionError>) + Send>;

/// A platform positioning capability.
///
/// Implementations invoke the callback at most once. They may prompt the user
/// for permission on every request.
pub trait PositionProvider: Send + Sync {
    fn request_position(&self, on_result: PositionCallback);
}

/// Provider that always reports the same coordinate.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Coordinate);

impl PositionProvider for FixedPosition {
    fn request_position(&self, on_result: PositionCallback) {
        on_result(Ok(self.0));
    }
}

/// Single-shot position acquisition. Nothing is cached between calls.
#[derive(Clone)]
pub struct GeoLocator {
    provider: Option<Arc<dyn PositionProvider>>,
}

impl GeoLocator {
    pub fn new(provider: Arc<dyn PositionProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// A locator for a platform without positioning capability.
    pub fn unsupported() -> Self {
        Self { provider: None }
    }

    pub fn is_supported(&self) -> bool {
        self.provider.is_some()
    }

    pub async fn acquire(&self) -> Result<Coordinate, AppError> {
        let provider = self
            .provider
            .as_ref()
            .ok_or(AppError::UnsupportedCapability)?;

        let (tx, rx) = oneshot::channel();
        provider.request_position(Box::new(move |result| {
            // Receiver gone means the caller stopped waiting.
            let _ = tx.send(result);
        }));

        let coordinate = match rx.await {
            Ok(Ok(coordinate)) => coordinate,
            Ok(Err(e)) => {
                tracing::warn!("Position request failed ({}): {}", e.code, e.message);
                return Err(AppError::AcquisitionFailure(format!(
                    "{}: {}",
                    e.code, e.message
                )));
            }
            Err(_) => {
                tracing::warn!("Position provider dropped the request without answering");
                return Err(AppError::AcquisitionFailure(
                    "position request abandoned".to_string(),
                ));
            }
        };

        if !coordinate.is_valid() {
            tracing::warn!("Position provider returned an out-of-range coordinate");
            return Err(AppError::AcquisitionFailure(format!(
                "invalid coordinate ({}, {})",
                coordinate.latitude, coordinate.longitude
            )));
        }

        tracing::debug!("Position acquired");
        Ok(coordinate)
    }
}
