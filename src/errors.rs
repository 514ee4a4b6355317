use crate::models::Notice;
use std::fmt;

/// Copy shown whenever the device position cannot be obtained.
pub const LOCATION_UNAVAILABLE_MESSAGE: &str =
    "Unable to retrieve your location. Please enable location services.";

/// Copy shown when the platform has no positioning capability at all.
pub const LOCATION_UNSUPPORTED_MESSAGE: &str = "Geolocation is not supported on this device";

/// Application-specific error types.
///
/// Facility search does not fail through this type: its non-success cases are
/// `SearchOutcome` variants because they resolve to a fallback, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// The platform offers no positioning capability.
    UnsupportedCapability,
    /// Permission denied, timeout or signal loss while acquiring a position.
    AcquisitionFailure(String),
    /// Input rejected, either by local form validation or by the remote model.
    ValidationFailure(String),
    /// Network, timeout or malformed response from a remote service.
    TransportFailure(String),
    /// Invalid client configuration.
    Config(String),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<AppError>,
        /// Additional context message.
        context: String,
    },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::UnsupportedCapability => write!(f, "Geolocation unsupported"),
            AppError::AcquisitionFailure(msg) => write!(f, "Location acquisition failed: {}", msg),
            AppError::ValidationFailure(msg) => write!(f, "Validation failed: {}", msg),
            AppError::TransportFailure(msg) => write!(f, "Transport failure: {}", msg),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Strips any context wrappers and returns the underlying error.
    pub fn root(&self) -> &AppError {
        match self {
            AppError::WithContext { source, .. } => source.root(),
            other => other,
        }
    }

    /// Converts the error into the message shown to the user.
    ///
    /// Validation messages are surfaced verbatim; everything else maps to
    /// fixed copy so that transport internals never reach the screen.
    pub fn notice(&self) -> Notice {
        match self {
            AppError::UnsupportedCapability => {
                Notice::error(LOCATION_UNSUPPORTED_MESSAGE.to_string())
            }
            AppError::AcquisitionFailure(_) => {
                Notice::error(LOCATION_UNAVAILABLE_MESSAGE.to_string())
            }
            AppError::ValidationFailure(msg) => Notice::error(msg.clone()),
            AppError::TransportFailure(_) => {
                Notice::error("Prediction failed. Please try again.".to_string())
            }
            AppError::Config(_) => Notice::error("Service is misconfigured".to_string()),
            AppError::WithContext { source, .. } => source.notice(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self.root(), AppError::TransportFailure(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self.root(), AppError::ValidationFailure(_))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::TransportFailure(err.to_string())
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `AppError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T, AppError>;

    /// Add context lazily (only evaluated on error).
    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T, AppError> {
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: context.into(),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: f(),
        })
    }
}
