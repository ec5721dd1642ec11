//! Client error types

use super::RequestDescriptor;
use reqwest::StatusCode;
use thiserror::Error;

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// Protected request rejected locally because the client believes it
    /// is logged out; nothing was sent
    #[error("Not authenticated, skipped {request}")]
    Unauthenticated { request: RequestDescriptor },

    /// Network or request error, including timeouts
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server returned a non-2xx status
    #[error("Server error {status} for {request}: {message}")]
    Status {
        status: StatusCode,
        message: String,
        request: RequestDescriptor,
    },

    /// The session refresh attempted after a 401 failed
    #[error("Session refresh failed: {0}")]
    RefreshFailed(#[source] Box<ClientError>),

    /// A concurrent request already tried to refresh the session and failed
    #[error("Session expired, a concurrent refresh already failed")]
    SessionExpired,

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Create error from HTTP status code
    pub fn from_status(status: StatusCode, message: String, request: RequestDescriptor) -> Self {
        Self::Status {
            status,
            message,
            request,
        }
    }

    /// Status code returned by the server, if any
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// Whether this error means the session is gone, as opposed to a
    /// failure of the individual call
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::Unauthenticated { .. } | Self::RefreshFailed(_) | Self::SessionExpired
        ) || self.is_unauthorized()
    }

    /// The request this error belongs to, when known
    pub fn request(&self) -> Option<&RequestDescriptor> {
        match self {
            Self::Unauthenticated { request } | Self::Status { request, .. } => Some(request),
            _ => None,
        }
    }
}
