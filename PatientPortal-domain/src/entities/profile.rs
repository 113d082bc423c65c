use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::insights::BmiCategory;

/// Blood groups accepted on the profile form
pub const BLOOD_TYPES: [&str; 8] = ["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];

/// Patient profile as shown on the profile screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct PatientProfile {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub address: Option<String>,

    /// Height in centimeters
    pub height_cm: Option<f64>,

    /// Weight in kilograms
    pub weight_kg: Option<f64>,

    pub blood_type: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,

    /// Body mass index derived from height and weight, one decimal
    pub bmi: Option<f64>,

    /// Category of the derived BMI
    pub bmi_category: Option<BmiCategory>,
}

impl PatientProfile {
    /// First and last name joined for display
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

fn validate_blood_type(blood_type: &str) -> Result<(), ValidationError> {
    if BLOOD_TYPES.contains(&blood_type.trim().to_ascii_uppercase().as_str()) {
        Ok(())
    } else {
        let mut error = ValidationError::new("blood_type");
        error.message = Some("Blood type must be one of A+, A-, B+, B-, AB+, AB-, O+, O-".into());
        Err(error)
    }
}

/// Partial profile update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "First name must be between 1 and 100 characters"))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Last name must be between 1 and 100 characters"))]
    pub last_name: Option<String>,

    #[validate(email(message = "Email address is not valid"))]
    pub email: Option<String>,

    #[validate(length(min = 5, max = 32, message = "Phone number must be between 5 and 32 characters"))]
    pub phone: Option<String>,

    /// Must not be in the future
    pub date_of_birth: Option<NaiveDate>,

    #[validate(length(max = 32, message = "Gender cannot exceed 32 characters"))]
    pub gender: Option<String>,

    #[validate(length(max = 255, message = "Address cannot exceed 255 characters"))]
    pub address: Option<String>,

    #[validate(range(min = 30.0, max = 272.0, message = "Height must be between 30 and 272 cm"))]
    pub height_cm: Option<f64>,

    #[validate(range(min = 1.0, max = 500.0, message = "Weight must be between 1 and 500 kg"))]
    pub weight_kg: Option<f64>,

    #[validate(custom = "validate_blood_type")]
    pub blood_type: Option<String>,

    #[validate(length(max = 100, message = "Emergency contact name cannot exceed 100 characters"))]
    pub emergency_contact_name: Option<String>,

    #[validate(length(min = 5, max = 32, message = "Emergency contact phone must be between 5 and 32 characters"))]
    pub emergency_contact_phone: Option<String>,
}
