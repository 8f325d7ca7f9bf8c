//! Error types for DigitalOcean API operations.
//!
//! Errors fall into three families:
//!
//! - **request-build** errors ([`Error::InvalidRequest`], [`Error::ValidationError`],
//!   [`Error::InvalidEndpoint`]) are returned before any network call is attempted;
//! - **transport** errors cover network failures and non-2xx responses. Status-bearing
//!   variants carry the [`Response`] metadata so callers can still inspect the status
//!   code and rate limits;
//! - **decode** errors ([`Error::DecodeError`]) mean the body did not match the expected
//!   envelope shape.

use thiserror::Error;

use crate::types::Response;

/// Main error type for DigitalOcean API operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Request could not be constructed (for example an unserializable body)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Caller supplied options failed validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Request path or base URL is not a valid endpoint
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Operation timed out
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// API endpoint could not be reached
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The API answered 404
    #[error("Not found: {message}")]
    NotFound {
        /// Message reported by the API
        message: String,
        /// Response metadata of the failed call
        response: Box<Response>,
    },

    /// The API rejected the credentials (401/403)
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Message reported by the API
        message: String,
        /// Response metadata of the failed call
        response: Box<Response>,
    },

    /// Any other non-2xx answer
    #[error("API error {}: {message}", .response.status)]
    Api {
        /// Message reported by the API
        message: String,
        /// Response metadata of the failed call
        response: Box<Response>,
    },

    /// The response body did not match the expected envelope
    #[error("Failed to decode response: {message}")]
    DecodeError {
        /// Decoder message
        message: String,
        /// Response metadata, when the body came from a completed call
        response: Option<Box<Response>>,
    },
}

/// Specialized result type for DigitalOcean API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error body returned by the API on non-2xx responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct ApiErrorBody {
    /// Machine readable error id (e.g. `not_found`)
    #[serde(default)]
    pub id: String,
    /// Human readable message
    #[serde(default)]
    pub message: String,
}

impl ApiErrorBody {
    /// Extract the most useful message from a raw error body.
    ///
    /// Falls back to the raw text when the body is not the API's JSON error shape.
    #[must_use]
    pub fn message_from(body: &str) -> String {
        match serde_json::from_str::<Self>(body) {
            Ok(parsed) if !parsed.message.is_empty() => parsed.message,
            _ if body.trim().is_empty() => "no response body".to_string(),
            _ => body.trim().to_string(),
        }
    }
}

impl Error {
    /// Build a decode error for a body received with `response`.
    #[must_use]
    pub fn decode(message: impl Into<String>, response: Response) -> Self {
        Self::DecodeError {
            message: message.into(),
            response: Some(Box::new(response)),
        }
    }

    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::Api { .. } => "API_ERROR",
            Self::DecodeError { .. } => "DECODE_ERROR",
        }
    }

    /// Response metadata attached to the error, if the call got that far.
    #[must_use]
    pub fn response(&self) -> Option<&Response> {
        match self {
            Self::NotFound { response, .. }
            | Self::Unauthorized { response, .. }
            | Self::Api { response, .. } => Some(response),
            Self::DecodeError { response, .. } => response.as_deref(),
            _ => None,
        }
    }

    /// True for errors raised before any network call was attempted.
    #[must_use]
    pub const fn is_request_build(&self) -> bool {
        matches!(
            self,
            Self::InvalidRequest(_) | Self::ValidationError(_) | Self::InvalidEndpoint(_)
        )
    }

    /// True for network failures and non-2xx responses.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::HttpError(_)
                | Self::Timeout(_)
                | Self::ServiceUnavailable(_)
                | Self::NotFound { .. }
                | Self::Unauthorized { .. }
                | Self::Api { .. }
        )
    }

    /// True when the body could not be decoded into the expected envelope.
    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(self, Self::DecodeError { .. })
    }

    /// True for server-side failures and undecodable bodies; these are logged at `warn`.
    #[must_use]
    pub fn should_log(&self) -> bool {
        match self {
            Self::ConfigError(_) | Self::DecodeError { .. } => true,
            Self::Api { response, .. } => response.status.is_server_error(),
            _ => false,
        }
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::DecodeError {
            message: err.to_string(),
            response: None,
        }
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ValidationError(err.to_string())
    }
}
