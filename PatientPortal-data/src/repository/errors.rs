use std::sync::PoisonError;
use thiserror::Error;

use crate::gateway::GatewayError;

/// Failure of a repository call, whichever store backs it
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backend call failed
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// In-memory store lock was poisoned
    #[error("Lock error: {0}")]
    Lock(String),
}

impl<T> From<PoisonError<T>> for RepositoryError {
    fn from(error: PoisonError<T>) -> Self {
        RepositoryError::Lock(error.to_string())
    }
}
