use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use super::handlers::error::ErrorResponse;

/// Bearer token presented by the caller, forwarded to the backend as-is
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header value
pub fn parse_bearer(header_value: &str) -> Option<AccessToken> {
    let (scheme, token) = header_value.trim().split_once(' ')?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }
    Some(AccessToken::new(token))
}

/// Reject requests without a bearer token; otherwise stash it in the
/// request extensions for the handlers
pub async fn require_bearer_token(mut req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();

    let header_value = match req.headers().get(header::AUTHORIZATION) {
        Some(value) => match value.to_str() {
            Ok(value) => value,
            Err(_) => {
                warn!("Invalid Authorization header format on {}", path);
                return ErrorResponse::unauthorized("Invalid Authorization header format").into_response();
            }
        },
        None => {
            debug!("Missing Authorization header on {}", path);
            return ErrorResponse::unauthorized("Missing Authorization header").into_response();
        }
    };

    let Some(token) = parse_bearer(header_value) else {
        warn!("Authorization header on {} does not contain a Bearer token", path);
        return ErrorResponse::unauthorized("Authorization header must contain a Bearer token")
            .into_response();
    };

    req.extensions_mut().insert(token);
    next.run(req).await
}
