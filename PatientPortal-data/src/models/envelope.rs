use serde::{Deserialize, Serialize};

use crate::gateway::GatewayError;

/// Response envelope used by every backend endpoint.
///
/// Success: `{"success": true, "data": ...}`.
/// Failure: `{"success": false, "error": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Whether the backend handled the request
    pub success: bool,

    /// Payload, present on success
    #[serde(default = "Option::default")]
    pub data: Option<T>,

    /// Error text, present on failure
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Build a success envelope
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Build a failure envelope
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Unwrap the envelope into its payload or the backend's error
    pub fn into_result(self) -> Result<T, GatewayError> {
        if self.success {
            self.data.ok_or(GatewayError::MissingData)
        } else {
            Err(GatewayError::Backend(
                self.error.unwrap_or_else(|| "Unknown backend error".to_string()),
            ))
        }
    }
}
