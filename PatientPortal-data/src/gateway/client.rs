use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, warn};

use super::config::GatewayConfig;
use super::errors::GatewayError;
use crate::models::ApiEnvelope;

/// Authenticated client for the portal backend.
///
/// Cloning is cheap: the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    config: GatewayConfig,
}

impl HttpGateway {
    /// Create a gateway from a configuration
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        if let Err(errors) = config.validate() {
            return Err(GatewayError::Configuration(errors.join("; ")));
        }

        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { client, config })
    }

    /// The configuration this gateway was built from
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Derive a gateway that forwards the given bearer token, sharing the
    /// connection pool of this one
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            client: self.client.clone(),
            config: self.config.clone().with_token(token),
        }
    }

    /// GET `path` and unwrap the envelope
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, GatewayError> {
        let request = self.request(Method::GET, path).query(query);
        self.execute(request, path).await
    }

    /// POST a JSON body to `path` and unwrap the envelope
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, GatewayError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::POST, path).json(body);
        self.execute(request, path).await
    }

    /// PUT a JSON body to `path` and unwrap the envelope
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, GatewayError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::PUT, path).json(body);
        self.execute(request, path).await
    }

    /// Check that the backend answers its health endpoint
    pub async fn ping(&self) -> Result<(), GatewayError> {
        let response = self.request(Method::GET, "/health").send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(GatewayError::Status {
                status: status.as_u16(),
                message: "Health endpoint did not report success".to_string(),
            })
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.config.endpoint(path);
        let request = self.client.request(method, url);
        match &self.config.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        path: &str,
    ) -> Result<T, GatewayError> {
        debug!("Calling portal backend: {}", path);

        let response = request.send().await.map_err(|e| {
            error!("Portal backend unreachable for {}: {}", path, e);
            GatewayError::Transport(e)
        })?;

        let status = response.status();
        let body = response.text().await?;

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                warn!("Portal backend rejected credentials for {}", path);
                Err(GatewayError::Unauthorized)
            }
            StatusCode::NOT_FOUND => Err(GatewayError::NotFound(path.to_string())),
            status if !status.is_success() => {
                // Failure bodies usually still follow the envelope shape
                let message = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(&body)
                    .ok()
                    .and_then(|envelope| envelope.error)
                    .unwrap_or(body);
                error!("Portal backend returned {} for {}: {}", status, path, message);
                Err(GatewayError::Status {
                    status: status.as_u16(),
                    message,
                })
            }
            _ => {
                let envelope: ApiEnvelope<T> = serde_json::from_str(&body)
                    .map_err(|e| GatewayError::Decode(e.to_string()))?;
                envelope.into_result()
            }
        }
    }
}
