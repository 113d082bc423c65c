use std::fmt;
use std::time::Duration;

use tracing::warn;

/// Default backend base URL when `PORTAL_BACKEND_URL` is not set
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Connection settings for the portal backend.
///
/// The bearer token is carried explicitly instead of being read from ambient
/// storage: the API layer derives one configuration per caller.
#[derive(Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Base URL of the backend REST API, e.g. `https://portal.example.org/api`
    pub base_url: String,
    /// Bearer token forwarded on every request, if any
    pub bearer_token: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl GatewayConfig {
    /// Create a configuration for the given base URL with default settings
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            bearer_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Load the configuration from environment variables
    pub fn from_env() -> Self {
        let base_url = std::env::var("PORTAL_BACKEND_URL").unwrap_or_else(|_| {
            warn!("PORTAL_BACKEND_URL not set - using {}", DEFAULT_BASE_URL);
            DEFAULT_BASE_URL.to_string()
        });

        let timeout_secs = std::env::var("PORTAL_BACKEND_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let bearer_token = std::env::var("PORTAL_BACKEND_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());

        Self {
            base_url,
            bearer_token,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Return a copy of this configuration carrying the given bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Return a copy of this configuration with a different timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validate the configuration, reporting every problem found
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        match url::Url::parse(&self.base_url) {
            Ok(parsed) => {
                if parsed.scheme() != "http" && parsed.scheme() != "https" {
                    errors.push(format!(
                        "PORTAL_BACKEND_URL must use http or https, got '{}'",
                        parsed.scheme()
                    ));
                }
            }
            Err(e) => errors.push(format!("PORTAL_BACKEND_URL is not a valid URL: {}", e)),
        }

        if self.timeout.is_zero() {
            errors.push("PORTAL_BACKEND_TIMEOUT_SECS must be greater than zero".to_string());
        }

        if let Some(token) = &self.bearer_token {
            if token.trim().is_empty() {
                errors.push("Bearer token must not be blank".to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Join a backend path onto the base URL
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}
