pub mod auth;
pub mod handlers;
pub mod routes;
pub mod state;

#[cfg(test)]
mod routes_tests;

use std::sync::Arc;

use axum::Router;
use patient_portal_data::gateway::{GatewayConfig, GatewayError, HttpGateway};
use patient_portal_domain::health::GatewayHealthService;

pub use routes::create_app;
pub use state::{AppState, GatewayServices, ServiceFactory};

/// Build the application router talking to the backend described by `config`
pub fn create_application(config: GatewayConfig) -> Result<Router, GatewayError> {
    let gateway = HttpGateway::new(config)?;

    let state = AppState {
        services: Arc::new(GatewayServices::new(gateway.clone())),
        health: Arc::new(GatewayHealthService::new(gateway)),
    };

    Ok(create_app(state))
}
