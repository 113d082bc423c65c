//! Domain layer health check functionality
//! Reports whether the portal backend behind the gateway is reachable

use std::collections::HashMap;

use async_trait::async_trait;
use patient_portal_data::gateway::HttpGateway;
use tracing::warn;

/// Name of the backend component in health reports
pub const BACKEND_COMPONENT: &str = "backend";

/// System health status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemStatus {
    /// All components are healthy
    Healthy,
    /// Some components are degraded but the system is functional
    Degraded,
    /// System is not functioning properly
    Unhealthy,
}

/// Component health status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Represents a health component with status and optional details
#[derive(Debug, Clone, PartialEq)]
pub struct HealthComponent {
    pub status: ComponentStatus,
    pub details: Option<String>,
}

/// Represents the overall health of the system
#[derive(Debug, Clone, PartialEq)]
pub struct SystemHealth {
    /// Overall system status
    pub status: SystemStatus,
    /// Map of component names to their health status
    pub components: HashMap<String, HealthComponent>,
}

impl SystemHealth {
    /// Overall status is the worst component status
    pub fn from_components(components: HashMap<String, HealthComponent>) -> Self {
        let status = if components.values().any(|c| c.status == ComponentStatus::Unhealthy) {
            SystemStatus::Unhealthy
        } else if components.values().any(|c| c.status == ComponentStatus::Degraded) {
            SystemStatus::Degraded
        } else {
            SystemStatus::Healthy
        };

        Self { status, components }
    }
}

/// Trait for health services
#[async_trait]
pub trait HealthServiceTrait: Send + Sync + std::fmt::Debug {
    /// Get the overall system health
    async fn get_system_health(&self) -> SystemHealth;

    /// Check the status of the backend.
    /// Ok(true) when healthy, Ok(false) when it answers with an error,
    /// Err when it cannot be reached.
    async fn check_backend_status(&self) -> Result<bool, String>;
}

/// Health service probing the backend's health endpoint through the gateway
#[derive(Debug, Clone)]
pub struct GatewayHealthService {
    gateway: HttpGateway,
}

impl GatewayHealthService {
    pub fn new(gateway: HttpGateway) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl HealthServiceTrait for GatewayHealthService {
    async fn get_system_health(&self) -> SystemHealth {
        let backend = match self.check_backend_status().await {
            Ok(true) => HealthComponent {
                status: ComponentStatus::Healthy,
                details: None,
            },
            Ok(false) => HealthComponent {
                status: ComponentStatus::Degraded,
                details: Some("Backend is reachable but reported an error".to_string()),
            },
            Err(e) => HealthComponent {
                status: ComponentStatus::Unhealthy,
                details: Some(e),
            },
        };

        SystemHealth::from_components(
            vec![(BACKEND_COMPONENT.to_string(), backend)].into_iter().collect(),
        )
    }

    async fn check_backend_status(&self) -> Result<bool, String> {
        match self.gateway.ping().await {
            Ok(()) => Ok(true),
            Err(e) if e.is_backend_response() => {
                warn!("Backend health check returned an error: {}", e);
                Ok(false)
            }
            Err(e) => Err(format!("Backend unreachable: {}", e)),
        }
    }
}
