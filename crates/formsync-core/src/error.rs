//! Core error types for formsync-core.
//!
//! This module defines the error hierarchy using thiserror. Remote API
//! failures are classified only as not-found vs everything else; local
//! file failures are fatal to the calling operation.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for formsync-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Record store errors (JSONL file, identifier files)
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Remote API errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// OAuth-related errors
    #[error("OAuth error: {0}")]
    OAuth(#[from] OAuthError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Local record store errors.
///
/// Permission failures, missing directories and disk-full conditions are
/// deliberately not distinguished from one another: all I/O problems abort
/// the calling operation with no retry.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying file I/O failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be serialized to a single JSON line
    #[error("Failed to serialize record: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A line of a JSONL file is not a complete JSON object.
    /// One malformed line fails the whole read.
    #[error("Malformed record at {path}:{line}: {source}")]
    MalformedLine {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Data directory could not be resolved or created
    #[error("Failed to resolve data directory: {0}")]
    DataDir(String),
}

/// Remote API errors.
///
/// The only classification the reconcilers care about is [`ApiError::NotFound`]
/// (triggers recreation); every other variant is propagated unchanged.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The remote side reports the resource does not exist (HTTP 404,
    /// or 410 Gone for deleted calendar events).
    #[error("Resource not found")]
    NotFound,

    /// Non-success HTTP response other than not-found
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Transport-level failure
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body did not match the expected shape
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Credentials missing or rejected before the request could be made
    #[error("Not authenticated: {0}")]
    NotAuthenticated(String),
}

impl ApiError {
    /// Whether this failure means the remote resource no longer exists.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound)
    }
}

/// OAuth-specific errors.
#[derive(Error, Debug)]
pub enum OAuthError {
    /// Authorization failed
    #[error("Authorization failed: {0}")]
    AuthorizationFailed(String),

    /// Token exchange failed
    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(String),

    /// Token refresh failed
    #[error("Token refresh failed: {0}")]
    TokenRefreshFailed(String),

    /// Invalid callback
    #[error("Invalid OAuth callback: {0}")]
    InvalidCallback(String),

    /// Access token expired
    #[error("Access token expired and no refresh token available")]
    TokenExpired,

    /// Not authenticated
    #[error("Not authenticated with {service}")]
    NotAuthenticated { service: String },

    /// Credentials not configured
    #[error("OAuth credentials not configured for {service}")]
    CredentialsNotConfigured { service: String },

    /// Credential storage (OS keyring) failure
    #[error("Credential storage error: {0}")]
    Storage(String),

    /// IO failure during the callback listener
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Network failure talking to the token endpoint
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid time range
    #[error("Invalid time range: end ({end}) must be greater than start ({start})")]
    InvalidTimeRange {
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<Box<dyn std::error::Error + Send + Sync>> for CoreError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        CoreError::Custom(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
