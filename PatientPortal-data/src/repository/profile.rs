use async_trait::async_trait;
use tracing::debug;

use super::errors::RepositoryError;
use crate::gateway::{GatewayError, HttpGateway};
use crate::models::profile::{PatientProfileRecord, UpdatePatientProfileRecord};

/// Repository trait for patient profiles
#[async_trait]
pub trait PatientProfileRepositoryTrait: Send + Sync {
    /// Fetch a patient's profile
    async fn get_profile(&self, patient_id: &str) -> Result<PatientProfileRecord, RepositoryError>;

    /// Apply a partial update and return the stored profile
    async fn update_profile(
        &self,
        patient_id: &str,
        update: UpdatePatientProfileRecord,
    ) -> Result<PatientProfileRecord, RepositoryError>;
}

/// Repository backed by the portal REST backend
#[derive(Debug, Clone)]
pub struct PatientProfileRepository {
    gateway: HttpGateway,
}

impl PatientProfileRepository {
    /// Create a new repository on top of a gateway
    pub fn new(gateway: HttpGateway) -> Self {
        Self { gateway }
    }
}

fn profile_path(patient_id: &str) -> String {
    format!("/patients/{}", urlencoding::encode(patient_id))
}

fn not_found_as_missing_profile(patient_id: &str) -> impl FnOnce(GatewayError) -> RepositoryError + '_ {
    move |e| match e {
        GatewayError::NotFound(_) => {
            RepositoryError::NotFound(format!("Profile for patient {} not found", patient_id))
        }
        other => RepositoryError::Gateway(other),
    }
}

#[async_trait]
impl PatientProfileRepositoryTrait for PatientProfileRepository {
    async fn get_profile(&self, patient_id: &str) -> Result<PatientProfileRecord, RepositoryError> {
        debug!("Fetching profile for patient {}", patient_id);
        self.gateway
            .get(&profile_path(patient_id), &[])
            .await
            .map_err(not_found_as_missing_profile(patient_id))
    }

    async fn update_profile(
        &self,
        patient_id: &str,
        update: UpdatePatientProfileRecord,
    ) -> Result<PatientProfileRecord, RepositoryError> {
        debug!("Updating profile for patient {}", patient_id);
        self.gateway
            .put(&profile_path(patient_id), &update)
            .await
            .map_err(not_found_as_missing_profile(patient_id))
    }
}
