use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::string_or_number;

/// Wire model for a patient's profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientProfileRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub height_cm: Option<f64>,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub blood_type: Option<String>,
    #[serde(default)]
    pub emergency_contact_name: Option<String>,
    #[serde(default)]
    pub emergency_contact_phone: Option<String>,
}

/// Wire payload for a partial profile update; absent fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePatientProfileRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact_phone: Option<String>,
}

impl UpdatePatientProfileRecord {
    /// Apply this update on top of an existing profile
    pub fn apply_to(&self, profile: &mut PatientProfileRecord) {
        if let Some(value) = &self.first_name {
            profile.first_name = value.clone();
        }
        if let Some(value) = &self.last_name {
            profile.last_name = value.clone();
        }
        if self.email.is_some() {
            profile.email = self.email.clone();
        }
        if self.phone.is_some() {
            profile.phone = self.phone.clone();
        }
        if self.date_of_birth.is_some() {
            profile.date_of_birth = self.date_of_birth;
        }
        if self.gender.is_some() {
            profile.gender = self.gender.clone();
        }
        if self.address.is_some() {
            profile.address = self.address.clone();
        }
        if self.height_cm.is_some() {
            profile.height_cm = self.height_cm;
        }
        if self.weight_kg.is_some() {
            profile.weight_kg = self.weight_kg;
        }
        if self.blood_type.is_some() {
            profile.blood_type = self.blood_type.clone();
        }
        if self.emergency_contact_name.is_some() {
            profile.emergency_contact_name = self.emergency_contact_name.clone();
        }
        if self.emergency_contact_phone.is_some() {
            profile.emergency_contact_phone = self.emergency_contact_phone.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_decodes_with_missing_optionals() {
        let json = r#"{"id": 9, "firstName": "Ada", "lastName": "Byron", "heightCm": 170}"#;
        let profile: PatientProfileRecord = serde_json::from_str(json).unwrap();
        assert_eq!(profile.id, "9");
        assert_eq!(profile.height_cm, Some(170.0));
        assert_eq!(profile.date_of_birth, None);
    }

    #[test]
    fn test_apply_update_only_touches_present_fields() {
        let mut profile = PatientProfileRecord {
            id: "9".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Byron".to_string(),
            email: Some("ada@example.org".to_string()),
            phone: None,
            date_of_birth: None,
            gender: None,
            address: None,
            height_cm: Some(170.0),
            weight_kg: Some(60.0),
            blood_type: None,
            emergency_contact_name: None,
            emergency_contact_phone: None,
        };

        let update = UpdatePatientProfileRecord {
            last_name: Some("Lovelace".to_string()),
            weight_kg: Some(62.5),
            ..Default::default()
        };
        update.apply_to(&mut profile);

        assert_eq!(profile.first_name, "Ada");
        assert_eq!(profile.last_name, "Lovelace");
        assert_eq!(profile.email.as_deref(), Some("ada@example.org"));
        assert_eq!(profile.weight_kg, Some(62.5));
        assert_eq!(profile.height_cm, Some(170.0));
    }
}
