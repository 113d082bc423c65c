use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use patient_portal_domain::services::ServiceError;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

/// Error response format for API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type/code - machine-readable identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            details: None,
        }
    }

    /// Create a not found error response
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("not_found", message)
    }

    /// Create a validation error response
    pub fn validation_error(message: impl Into<String>, details: Option<serde_json::Value>) -> Self {
        Self {
            details,
            ..Self::new("validation_error", message)
        }
    }

    /// Create a bad request error response
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("bad_request", message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("unauthorized", message)
    }

    pub fn insufficient_data(message: impl Into<String>) -> Self {
        Self::new("insufficient_data", message)
    }

    /// Stored data the portal cannot interpret
    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new("unprocessable", message)
    }

    /// The backend failed or could not be reached
    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new("bad_gateway", message)
    }

    /// Create an internal error response
    pub fn internal_error() -> Self {
        Self::new("internal_error", "An unexpected error occurred")
    }

    pub fn status_code(&self) -> StatusCode {
        match self.error.as_str() {
            "validation_error" | "bad_request" => StatusCode::BAD_REQUEST,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "not_found" | "insufficient_data" => StatusCode::NOT_FOUND,
            "unprocessable" => StatusCode::UNPROCESSABLE_ENTITY,
            "bad_gateway" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

impl From<ServiceError> for ErrorResponse {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::ValidationError(msg) => ErrorResponse::validation_error(msg, None),
            ServiceError::NotFound(msg) => ErrorResponse::not_found(msg),
            ServiceError::Unauthorized(msg) => ErrorResponse::unauthorized(msg),
            ServiceError::MalformedReading(msg) => ErrorResponse::unprocessable(msg),
            ServiceError::InsufficientData(msg) => ErrorResponse::insufficient_data(msg),
            ServiceError::GatewayError(msg) => {
                error!("Backend call failed: {}", msg);
                ErrorResponse::bad_gateway("The portal backend is unavailable")
            }
            ServiceError::Internal(msg) => {
                error!("Internal error: {}", msg);
                ErrorResponse::internal_error()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ServiceError::ValidationError("x".into()), StatusCode::BAD_REQUEST),
            (ServiceError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ServiceError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (ServiceError::MalformedReading("x".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (ServiceError::InsufficientData("x".into()), StatusCode::NOT_FOUND),
            (ServiceError::GatewayError("x".into()), StatusCode::BAD_GATEWAY),
            (ServiceError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(ErrorResponse::from(err).into_response().status(), expected);
        }
    }

    #[test]
    fn test_gateway_details_are_not_leaked() {
        let response = ErrorResponse::from(ServiceError::GatewayError(
            "Transport error: connection refused to 10.0.0.5".into(),
        ));
        assert!(!response.message.contains("10.0.0.5"));
    }
}
