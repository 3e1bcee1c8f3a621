use std::time::Duration;

use thiserror::Error;

use crate::types::{Role, VendorRecord};

/// Errors that can occur while adapting a request
#[derive(Debug, Error)]
pub enum AdapterError {
    /// A message role has no vendor representation
    #[error("unsupported message role: {role}")]
    UnsupportedRole { role: Role },

    /// The vendor call failed or reported a failure
    #[error("vendor request failed: {0}")]
    VendorRequest(#[from] VendorFailure),

    /// Client sent a request that cannot be adapted
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Unexpected internal error
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Ways a vendor call can fail
#[derive(Debug, Error)]
pub enum VendorFailure {
    /// A record carried a non-zero status code
    #[error(
        "status {} in session '{}': {}",
        .0.status_code,
        .0.session_id,
        .0.message.as_deref().unwrap_or("no message")
    )]
    Status(Box<VendorRecord>),

    /// The connection could not be opened or broke mid-call
    #[error("transport error: {0}")]
    Transport(String),

    /// No frame arrived within the configured timeout
    #[error("no response within {0:?}")]
    Timeout(Duration),
}

impl AdapterError {
    /// Whether the caller may reasonably retry the same request
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::VendorRequest(_) | Self::Internal(_))
    }

    /// The offending vendor record, when the vendor reported the failure
    pub fn vendor_record(&self) -> Option<&VendorRecord> {
        match self {
            Self::VendorRequest(VendorFailure::Status(record)) => Some(record.as_ref()),
            _ => None,
        }
    }
}

#[cfg(feature = "http")]
impl AdapterError {
    /// HTTP status code for this error
    pub const fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;

        match self {
            Self::UnsupportedRole { .. } | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::VendorRequest(VendorFailure::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            Self::VendorRequest(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error type (e.g. `invalid_request_error`)
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::UnsupportedRole { .. } | Self::InvalidRequest(_) => "invalid_request_error",
            Self::VendorRequest(_) => "upstream_error",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Message safe to expose to API consumers
    pub fn client_message(&self) -> String {
        match self {
            Self::Internal(_) => "an internal error occurred".to_owned(),
            other => other.to_string(),
        }
    }
}
