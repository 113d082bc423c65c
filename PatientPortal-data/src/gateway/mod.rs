// HTTP gateway to the portal backend
pub mod config;
pub mod errors;
mod client;

// Re-export commonly used types
pub use client::HttpGateway;
pub use config::GatewayConfig;
pub use errors::GatewayError;
