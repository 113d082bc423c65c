use thiserror::Error;
use validator::ValidationErrors;

use patient_portal_data::gateway::GatewayError;
use patient_portal_data::repository::RepositoryError;

use super::chart::ChartError;

/// Errors surfaced by the domain services
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Request failed validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backend rejected the caller's token
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A stored reading value could not be interpreted
    #[error("Malformed reading: {0}")]
    MalformedReading(String),

    /// Not enough readings to compute a result
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Backend unreachable or returned an error
    #[error("Backend error: {0}")]
    GatewayError(String),

    /// Failure inside the portal itself
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Flatten validator output into one message, `field: message` per field
    pub fn from_validation(errors: &ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .iter()
            .map(|(field, errors)| {
                let error_msgs: Vec<String> = errors
                    .iter()
                    .map(|err| match &err.message {
                        Some(msg) => msg.to_string(),
                        None => format!("Invalid {}", field),
                    })
                    .collect();
                format!("{}: {}", field, error_msgs.join(", "))
            })
            .collect();
        // field_errors is a HashMap; sort for a stable message
        messages.sort();

        ServiceError::ValidationError(messages.join("; "))
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(msg) => ServiceError::NotFound(msg),
            RepositoryError::Gateway(GatewayError::Unauthorized) => {
                ServiceError::Unauthorized("Access token was rejected by the backend".to_string())
            }
            RepositoryError::Gateway(GatewayError::NotFound(path)) => {
                ServiceError::NotFound(format!("Backend resource {} not found", path))
            }
            RepositoryError::Gateway(e) => ServiceError::GatewayError(e.to_string()),
            RepositoryError::Lock(msg) => ServiceError::Internal(msg),
        }
    }
}

impl From<ChartError> for ServiceError {
    fn from(err: ChartError) -> Self {
        ServiceError::MalformedReading(err.to_string())
    }
}
