// Mock repositories backed by the in-memory store.
// Available in tests and to dependent crates through the `mock` feature.

use async_trait::async_trait;

use super::errors::RepositoryError;
use super::in_memory::InMemoryStorage;
use super::profile::PatientProfileRepositoryTrait;
use super::vital_signs::{HistoryFilter, VitalSignsRepositoryTrait};
use crate::gateway::GatewayError;
use crate::models::profile::{PatientProfileRecord, UpdatePatientProfileRecord};
use crate::models::vital_sign::{CreateVitalSignRecord, VitalSignRecord};

fn unavailable() -> RepositoryError {
    RepositoryError::Gateway(GatewayError::Backend(
        "Backend unavailable - mock is configured to fail".to_string(),
    ))
}

/// Mock implementation of the vital signs repository
#[derive(Debug, Clone, Default)]
pub struct MockVitalSignsRepository {
    storage: InMemoryStorage,
    unavailable: bool,
    unauthorized: bool,
}

impl MockVitalSignsRepository {
    /// Create an empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Preload readings, kept in the given order
    pub fn with_records(self, records: Vec<VitalSignRecord>) -> Self {
        for record in records {
            self.storage
                .store_reading(record)
                .expect("failed to preload mock reading");
        }
        self
    }

    /// Configure every call to fail as if the backend were down
    pub fn with_unavailable_backend(mut self) -> Self {
        self.unavailable = true;
        self
    }

    /// Configure every call to fail as if the token were rejected
    pub fn with_rejected_token(mut self) -> Self {
        self.unauthorized = true;
        self
    }

    /// The underlying store, for assertions
    pub fn storage(&self) -> &InMemoryStorage {
        &self.storage
    }

    fn check_available(&self) -> Result<(), RepositoryError> {
        if self.unauthorized {
            return Err(RepositoryError::Gateway(GatewayError::Unauthorized));
        }
        if self.unavailable {
            return Err(unavailable());
        }
        Ok(())
    }
}

#[async_trait]
impl VitalSignsRepositoryTrait for MockVitalSignsRepository {
    async fn get_latest(&self, patient_id: &str) -> Result<Vec<VitalSignRecord>, RepositoryError> {
        self.check_available()?;
        self.storage.latest_for_patient(patient_id)
    }

    async fn get_history(
        &self,
        patient_id: &str,
        filter: HistoryFilter,
    ) -> Result<Vec<VitalSignRecord>, RepositoryError> {
        self.check_available()?;
        self.storage.readings_for_patient(patient_id, &filter)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<VitalSignRecord>, RepositoryError> {
        self.check_available()?;
        self.storage.reading_by_id(id)
    }

    async fn create(&self, record: CreateVitalSignRecord) -> Result<VitalSignRecord, RepositoryError> {
        self.check_available()?;
        self.storage.create_reading(record)
    }
}

/// Mock implementation of the patient profile repository
#[derive(Debug, Clone, Default)]
pub struct MockPatientProfileRepository {
    storage: InMemoryStorage,
    unavailable: bool,
}

impl MockPatientProfileRepository {
    /// Create an empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Preload a profile
    pub fn with_profile(self, profile: PatientProfileRecord) -> Self {
        self.storage
            .store_profile(profile)
            .expect("failed to preload mock profile");
        self
    }

    /// Configure every call to fail as if the backend were down
    pub fn with_unavailable_backend(mut self) -> Self {
        self.unavailable = true;
        self
    }
}

#[async_trait]
impl PatientProfileRepositoryTrait for MockPatientProfileRepository {
    async fn get_profile(&self, patient_id: &str) -> Result<PatientProfileRecord, RepositoryError> {
        if self.unavailable {
            return Err(unavailable());
        }
        self.storage.profile(patient_id)?.ok_or_else(|| {
            RepositoryError::NotFound(format!("Profile for patient {} not found", patient_id))
        })
    }

    async fn update_profile(
        &self,
        patient_id: &str,
        update: UpdatePatientProfileRecord,
    ) -> Result<PatientProfileRecord, RepositoryError> {
        if self.unavailable {
            return Err(unavailable());
        }
        self.storage.update_profile(patient_id, &update)
    }
}
