use axum::http::StatusCode;

/// Failures of a single upstream call. Transport errors never cross into
/// handler logic in any other shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpstreamError {
    #[error("API timeout")]
    Timeout,

    #[error("API unavailable")]
    Unavailable,

    /// Non-2xx reply; carries `error.message` from the body or the status text.
    #[error("{0}")]
    Rejected(String),

    #[error("{0}")]
    Unknown(String),
}

/// Unified error type for relay operations.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("{0}")]
    Internal(String),
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Config(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(UpstreamError::Timeout | UpstreamError::Unavailable) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::Upstream(UpstreamError::Rejected(_)) => StatusCode::BAD_REQUEST,
            Self::Upstream(UpstreamError::Unknown(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short tag used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Validation(_) => "validation",
            Self::Upstream(UpstreamError::Timeout) => "upstream_timeout",
            Self::Upstream(UpstreamError::Unavailable) => "upstream_unavailable",
            Self::Upstream(UpstreamError::Rejected(_)) => "upstream_rejected",
            Self::Upstream(UpstreamError::Unknown(_)) => "upstream_unknown",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() || e.is_request() {
            Self::Unavailable
        } else {
            Self::Unknown(e.to_string())
        }
    }
}

impl From<serde_json::Error> for UpstreamError {
    fn from(e: serde_json::Error) -> Self {
        Self::Unknown(format!("invalid JSON from upstream: {e}"))
    }
}
