// Testing utilities for the domain layer
// Only available in tests and with the "mock" feature

use std::collections::HashMap;

use async_trait::async_trait;

use crate::health::{ComponentStatus, HealthComponent, HealthServiceTrait, SystemHealth, BACKEND_COMPONENT};
use crate::services::profile::ProfileService;
use crate::services::vital_signs::VitalSignsService;
use patient_portal_data::models::{PatientProfileRecord, VitalSignRecord};

// Re-export the in-memory repositories from the data layer
pub use patient_portal_data::repository::{MockPatientProfileRepository, MockVitalSignsRepository};

/// Wire reading for patient `p1`
pub fn sample_record(id: &str, reading_type: &str, value: &str, reading_date: &str) -> VitalSignRecord {
    VitalSignRecord {
        id: id.to_string(),
        patient_id: "p1".to_string(),
        reading_type: reading_type.to_string(),
        reading_value: value.to_string(),
        reading_unit: None,
        reading_status: None,
        reading_date: reading_date
            .parse()
            .unwrap_or_else(|_| panic!("invalid sample date {}", reading_date)),
        notes: None,
    }
}

/// Wire profile of a 170 cm, 65 kg patient named Jane Doe
pub fn sample_profile_record(patient_id: &str) -> PatientProfileRecord {
    PatientProfileRecord {
        id: patient_id.to_string(),
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        email: Some("jane.doe@example.com".to_string()),
        phone: Some("+1 555 0100".to_string()),
        date_of_birth: chrono::NaiveDate::from_ymd_opt(1985, 4, 12),
        gender: Some("female".to_string()),
        address: None,
        height_cm: Some(170.0),
        weight_kg: Some(65.0),
        blood_type: Some("O+".to_string()),
        emergency_contact_name: None,
        emergency_contact_phone: None,
    }
}

/// Vital signs service over an in-memory repository preloaded with `records`
pub fn mock_vital_signs_service(records: Vec<VitalSignRecord>) -> VitalSignsService<MockVitalSignsRepository> {
    VitalSignsService::new(MockVitalSignsRepository::new().with_records(records))
}

/// Profile service over an in-memory repository, optionally holding `profile`
pub fn mock_profile_service(profile: Option<PatientProfileRecord>) -> ProfileService<MockPatientProfileRepository> {
    let repository = match profile {
        Some(profile) => MockPatientProfileRepository::new().with_profile(profile),
        None => MockPatientProfileRepository::new(),
    };
    ProfileService::new(repository)
}

/// Mock implementation of the HealthServiceTrait for testing
#[derive(Debug, Clone)]
pub struct MockHealthService {
    backend_status: ComponentStatus,
    components: HashMap<String, HealthComponent>,
}

impl Default for MockHealthService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHealthService {
    /// Create a new mock health service with all components healthy
    pub fn new() -> Self {
        Self {
            backend_status: ComponentStatus::Healthy,
            components: HashMap::new(),
        }
    }

    /// Configure the mock with a degraded backend
    pub fn with_degraded_backend(mut self) -> Self {
        self.backend_status = ComponentStatus::Degraded;
        self
    }

    /// Configure the mock with an unreachable backend
    pub fn with_unhealthy_backend(mut self) -> Self {
        self.backend_status = ComponentStatus::Unhealthy;
        self
    }

    /// Add a custom component
    pub fn with_component(mut self, name: &str, status: ComponentStatus, details: Option<String>) -> Self {
        self.components
            .insert(name.to_string(), HealthComponent { status, details });
        self
    }
}

#[async_trait]
impl HealthServiceTrait for MockHealthService {
    async fn get_system_health(&self) -> SystemHealth {
        let mut components = self.components.clone();
        components.insert(
            BACKEND_COMPONENT.to_string(),
            HealthComponent {
                status: self.backend_status,
                details: match self.backend_status {
                    ComponentStatus::Healthy => None,
                    ComponentStatus::Degraded => Some("Backend is responding slowly".to_string()),
                    ComponentStatus::Unhealthy => Some("Backend connection failed".to_string()),
                },
            },
        );

        SystemHealth::from_components(components)
    }

    async fn check_backend_status(&self) -> Result<bool, String> {
        match self.backend_status {
            ComponentStatus::Healthy => Ok(true),
            ComponentStatus::Degraded => Ok(false),
            ComponentStatus::Unhealthy => Err("Backend connection failed".to_string()),
        }
    }
}
