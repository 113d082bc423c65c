use thiserror::Error;

/// Errors raised while talking to the portal backend
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Invalid gateway configuration
    #[error("Gateway configuration error: {0}")]
    Configuration(String),

    /// Connection, timeout or protocol failure
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend rejected the bearer token (401/403)
    #[error("Backend rejected the bearer token")]
    Unauthorized,

    /// Backend answered 404
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Any other non-success HTTP status
    #[error("Backend returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Envelope carried `success: false`
    #[error("Backend reported failure: {0}")]
    Backend(String),

    /// Envelope carried `success: true` without a payload
    #[error("Backend response did not include data")]
    MissingData,

    /// Body was not a valid envelope for the expected payload
    #[error("Failed to decode backend response: {0}")]
    Decode(String),
}

impl GatewayError {
    /// Whether the backend was reached and answered (as opposed to an
    /// unreachable or misconfigured backend)
    pub fn is_backend_response(&self) -> bool {
        matches!(
            self,
            GatewayError::Unauthorized
                | GatewayError::NotFound(_)
                | GatewayError::Status { .. }
                | GatewayError::Backend(_)
                | GatewayError::MissingData
                | GatewayError::Decode(_)
        )
    }
}
