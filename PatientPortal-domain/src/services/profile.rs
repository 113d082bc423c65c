use async_trait::async_trait;
use chrono::Utc;
use tracing::info;
use validator::Validate;

use crate::entities::conversions;
use crate::entities::profile::{PatientProfile, UpdateProfileRequest};
use crate::services::errors::ServiceError;
use patient_portal_data::gateway::HttpGateway;
use patient_portal_data::repository::{PatientProfileRepository, PatientProfileRepositoryTrait};

/// Trait for profile service operations
#[async_trait]
pub trait ProfileServiceTrait: Send + Sync {
    /// Validate a profile update
    fn validate_update_request(&self, request: &UpdateProfileRequest) -> Result<(), ServiceError>;

    /// The patient's profile with derived BMI
    async fn get_profile(&self, patient_id: &str) -> Result<PatientProfile, ServiceError>;

    /// Validate and apply a partial update, returning the stored profile
    async fn update_profile(
        &self,
        patient_id: &str,
        request: UpdateProfileRequest,
    ) -> Result<PatientProfile, ServiceError>;
}

/// Profile service over a repository
pub struct ProfileService<R: PatientProfileRepositoryTrait> {
    repository: R,
}

impl<R: PatientProfileRepositoryTrait> ProfileService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R: PatientProfileRepositoryTrait> ProfileServiceTrait for ProfileService<R> {
    fn validate_update_request(&self, request: &UpdateProfileRequest) -> Result<(), ServiceError> {
        request
            .validate()
            .map_err(|errors| ServiceError::from_validation(&errors))?;

        if let Some(date_of_birth) = request.date_of_birth {
            if date_of_birth > Utc::now().date_naive() {
                return Err(ServiceError::ValidationError(
                    "Date of birth cannot be in the future".to_string(),
                ));
            }
        }

        Ok(())
    }

    async fn get_profile(&self, patient_id: &str) -> Result<PatientProfile, ServiceError> {
        let record = self.repository.get_profile(patient_id).await?;
        Ok(conversions::convert_to_domain_profile(record))
    }

    async fn update_profile(
        &self,
        patient_id: &str,
        request: UpdateProfileRequest,
    ) -> Result<PatientProfile, ServiceError> {
        self.validate_update_request(&request)?;

        let update = conversions::convert_to_data_profile_update(&request);
        let record = self.repository.update_profile(patient_id, update).await?;
        info!("Updated profile for patient {}", patient_id);

        Ok(conversions::convert_to_domain_profile(record))
    }
}

/// Create a profile service talking to the portal backend
pub fn create_profile_service(gateway: HttpGateway) -> ProfileService<PatientProfileRepository> {
    ProfileService::new(PatientProfileRepository::new(gateway))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::insights::BmiCategory;
    use crate::testing::{mock_profile_service, sample_profile_record};
    use chrono::Duration;
    use patient_portal_data::repository::MockPatientProfileRepository;

    #[tokio::test]
    async fn test_get_profile_derives_bmi() {
        let service = mock_profile_service(Some(sample_profile_record("p1")));

        let profile = service.get_profile("p1").await.unwrap();
        assert_eq!(profile.full_name(), "Jane Doe");
        assert_eq!(profile.bmi, Some(22.5));
        assert_eq!(profile.bmi_category, Some(BmiCategory::Normal));
    }

    #[tokio::test]
    async fn test_get_missing_profile_is_not_found() {
        let service = mock_profile_service(None);

        let result = service.get_profile("p1").await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_profile_applies_changes() {
        let service = mock_profile_service(Some(sample_profile_record("p1")));

        let profile = service
            .update_profile(
                "p1",
                UpdateProfileRequest {
                    weight_kg: Some(86.7),
                    blood_type: Some("b-".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(profile.weight_kg, Some(86.7));
        assert_eq!(profile.blood_type.as_deref(), Some("B-"));
        assert_eq!(profile.bmi, Some(30.0));
        assert_eq!(profile.bmi_category, Some(BmiCategory::Obese));
        assert_eq!(profile.first_name, "Jane");
    }

    #[tokio::test]
    async fn test_update_profile_validation() {
        let service = mock_profile_service(Some(sample_profile_record("p1")));

        let result = service
            .update_profile(
                "p1",
                UpdateProfileRequest {
                    email: Some("jane-at-example".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(ServiceError::ValidationError(msg)) if msg.contains("email")));

        let tomorrow = Utc::now().date_naive() + Duration::days(1);
        let result = service.validate_update_request(&UpdateProfileRequest {
            date_of_birth: Some(tomorrow),
            ..Default::default()
        });
        assert!(matches!(result, Err(ServiceError::ValidationError(msg)) if msg.contains("future")));
    }

    #[tokio::test]
    async fn test_unavailable_backend() {
        let service = ProfileService::new(MockPatientProfileRepository::new().with_unavailable_backend());

        let result = service.get_profile("p1").await;
        assert!(matches!(result, Err(ServiceError::GatewayError(_))));
    }
}
