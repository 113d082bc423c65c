use std::sync::Arc;

use patient_portal_data::gateway::HttpGateway;
use patient_portal_domain::health::HealthServiceTrait;
use patient_portal_domain::services::{
    create_profile_service, create_vital_signs_service, ProfileServiceTrait, VitalSignsServiceTrait,
};

use super::auth::AccessToken;

/// Hands out services acting on behalf of the caller that owns `token`
pub trait ServiceFactory: Send + Sync {
    fn vital_signs(&self, token: &AccessToken) -> Arc<dyn VitalSignsServiceTrait>;
    fn profile(&self, token: &AccessToken) -> Arc<dyn ProfileServiceTrait>;
}

/// Services backed by the portal backend; each call forwards the caller's token
#[derive(Debug, Clone)]
pub struct GatewayServices {
    gateway: HttpGateway,
}

impl GatewayServices {
    pub fn new(gateway: HttpGateway) -> Self {
        Self { gateway }
    }
}

impl ServiceFactory for GatewayServices {
    fn vital_signs(&self, token: &AccessToken) -> Arc<dyn VitalSignsServiceTrait> {
        Arc::new(create_vital_signs_service(self.gateway.with_token(token.as_str())))
    }

    fn profile(&self, token: &AccessToken) -> Arc<dyn ProfileServiceTrait> {
        Arc::new(create_profile_service(self.gateway.with_token(token.as_str())))
    }
}

/// Shared state of the router
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<dyn ServiceFactory>,
    pub health: Arc<dyn HealthServiceTrait>,
}

/// The same service instances for every caller, for handler tests
#[cfg(test)]
pub(crate) struct StaticServices {
    pub vital_signs: Arc<dyn VitalSignsServiceTrait>,
    pub profile: Arc<dyn ProfileServiceTrait>,
}

#[cfg(test)]
impl ServiceFactory for StaticServices {
    fn vital_signs(&self, _token: &AccessToken) -> Arc<dyn VitalSignsServiceTrait> {
        self.vital_signs.clone()
    }

    fn profile(&self, _token: &AccessToken) -> Arc<dyn ProfileServiceTrait> {
        self.profile.clone()
    }
}
