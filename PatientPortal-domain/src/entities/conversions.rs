use chrono::{DateTime, Utc};
use patient_portal_data::models::{
    CreateVitalSignRecord, PatientProfileRecord, UpdatePatientProfileRecord, VitalSignRecord,
};
use tracing::warn;

use crate::entities::profile::{PatientProfile, UpdateProfileRequest};
use crate::entities::vital_sign::{
    CreateVitalSignRequest, ReadingStatus, ReadingType, UnknownReadingType, VitalSignReading,
};
use crate::services::insights::{calculate_bmi, categorize_bmi};

/// Conversion functions between domain entities and data models.
/// Named convert_to_[target_layer]_[model_name].

/// Convert a wire reading into a domain reading.
///
/// The unit is defaulted from the reading type when the backend stored none,
/// and an unrecognized status is treated as absent.
pub fn convert_to_domain_reading(record: VitalSignRecord) -> Result<VitalSignReading, UnknownReadingType> {
    let reading_type: ReadingType = record.reading_type.parse()?;

    let reading_unit = match record.reading_unit {
        Some(unit) if !unit.trim().is_empty() => unit,
        _ => reading_type.default_unit().to_string(),
    };

    let reading_status = record
        .reading_status
        .as_deref()
        .and_then(|status| status.parse::<ReadingStatus>().ok());

    Ok(VitalSignReading {
        id: record.id,
        patient_id: record.patient_id,
        reading_type,
        reading_value: record.reading_value,
        reading_unit,
        reading_status,
        reading_date: record.reading_date,
        notes: record.notes,
    })
}

/// Convert a batch of wire readings, dropping those of an unknown type
pub fn convert_to_domain_readings(records: Vec<VitalSignRecord>) -> Vec<VitalSignReading> {
    records
        .into_iter()
        .filter_map(|record| {
            let id = record.id.clone();
            match convert_to_domain_reading(record) {
                Ok(reading) => Some(reading),
                Err(e) => {
                    warn!("Dropping reading {}: {}", id, e);
                    None
                }
            }
        })
        .collect()
}

/// Convert a validated submission into the wire payload
pub fn convert_to_data_create_request(
    request: &CreateVitalSignRequest,
    reading_date: DateTime<Utc>,
) -> CreateVitalSignRecord {
    let reading_unit = request
        .reading_unit
        .as_deref()
        .map(str::trim)
        .filter(|unit| !unit.is_empty())
        .unwrap_or_else(|| request.reading_type.default_unit())
        .to_string();

    CreateVitalSignRecord {
        patient_id: request.patient_id.clone(),
        reading_type: request.reading_type.as_str().to_string(),
        reading_value: request.reading_value.trim().to_string(),
        reading_unit,
        reading_status: request.reading_status.map(|status| status.as_str().to_string()),
        reading_date,
        notes: request.notes.clone(),
    }
}

/// Convert a wire profile into the domain view, deriving BMI
pub fn convert_to_domain_profile(record: PatientProfileRecord) -> PatientProfile {
    let bmi = calculate_bmi(record.height_cm, record.weight_kg);

    PatientProfile {
        id: record.id,
        first_name: record.first_name,
        last_name: record.last_name,
        email: record.email,
        phone: record.phone,
        date_of_birth: record.date_of_birth,
        gender: record.gender,
        address: record.address,
        height_cm: record.height_cm,
        weight_kg: record.weight_kg,
        blood_type: record.blood_type,
        emergency_contact_name: record.emergency_contact_name,
        emergency_contact_phone: record.emergency_contact_phone,
        bmi,
        bmi_category: bmi.map(categorize_bmi),
    }
}

/// Convert a validated profile update into the wire payload
pub fn convert_to_data_profile_update(request: &UpdateProfileRequest) -> UpdatePatientProfileRecord {
    UpdatePatientProfileRecord {
        first_name: request.first_name.as_ref().map(|value| value.trim().to_string()),
        last_name: request.last_name.as_ref().map(|value| value.trim().to_string()),
        email: request.email.as_ref().map(|value| value.trim().to_string()),
        phone: request.phone.clone(),
        date_of_birth: request.date_of_birth,
        gender: request.gender.clone(),
        address: request.address.clone(),
        height_cm: request.height_cm,
        weight_kg: request.weight_kg,
        blood_type: request
            .blood_type
            .as_ref()
            .map(|value| value.trim().to_ascii_uppercase()),
        emergency_contact_name: request.emergency_contact_name.clone(),
        emergency_contact_phone: request.emergency_contact_phone.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::insights::BmiCategory;

    fn record(reading_type: &str) -> VitalSignRecord {
        VitalSignRecord {
            id: "r1".to_string(),
            patient_id: "p1".to_string(),
            reading_type: reading_type.to_string(),
            reading_value: "98.6".to_string(),
            reading_unit: None,
            reading_status: Some("elevated".to_string()),
            reading_date: "2024-02-01T10:00:00Z".parse().unwrap(),
            notes: Some("evening".to_string()),
        }
    }

    #[test]
    fn test_convert_to_domain_reading_defaults_unit() {
        let reading = convert_to_domain_reading(record("TEMPERATURE")).unwrap();

        assert_eq!(reading.reading_type, ReadingType::Temperature);
        assert_eq!(reading.reading_unit, "C");
        assert_eq!(reading.reading_status, Some(ReadingStatus::Elevated));
        assert_eq!(reading.notes.as_deref(), Some("evening"));
    }

    #[test]
    fn test_convert_to_domain_reading_keeps_stored_unit() {
        let mut data = record("TEMPERATURE");
        data.reading_unit = Some("F".to_string());
        data.reading_status = Some("CRITICAL".to_string());

        let reading = convert_to_domain_reading(data).unwrap();
        assert_eq!(reading.reading_unit, "F");
        assert_eq!(reading.reading_status, None);
    }

    #[test]
    fn test_unknown_type_is_dropped_from_batch() {
        assert!(convert_to_domain_reading(record("STEP_COUNT")).is_err());

        let readings = convert_to_domain_readings(vec![
            record("STEP_COUNT"),
            record("HEART_RATE"),
        ]);
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].reading_type, ReadingType::HeartRate);
    }

    #[test]
    fn test_convert_to_data_create_request() {
        let request = CreateVitalSignRequest {
            patient_id: "p1".to_string(),
            reading_type: ReadingType::BloodSugar,
            reading_value: " 105 ".to_string(),
            reading_unit: Some("  ".to_string()),
            reading_status: Some(ReadingStatus::Normal),
            reading_date: None,
            notes: None,
        };
        let date: DateTime<Utc> = "2024-02-01T10:00:00Z".parse().unwrap();

        let data = convert_to_data_create_request(&request, date);
        assert_eq!(data.reading_type, "BLOOD_SUGAR");
        assert_eq!(data.reading_value, "105");
        assert_eq!(data.reading_unit, "mg/dL");
        assert_eq!(data.reading_status.as_deref(), Some("NORMAL"));
        assert_eq!(data.reading_date, date);
    }

    #[test]
    fn test_convert_to_domain_profile_derives_bmi() {
        let record = PatientProfileRecord {
            id: "p1".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: None,
            phone: None,
            date_of_birth: None,
            gender: None,
            address: None,
            height_cm: Some(170.0),
            weight_kg: Some(65.0),
            blood_type: Some("O+".to_string()),
            emergency_contact_name: None,
            emergency_contact_phone: None,
        };

        let profile = convert_to_domain_profile(record.clone());
        assert_eq!(profile.bmi, Some(22.5));
        assert_eq!(profile.bmi_category, Some(BmiCategory::Normal));

        let profile = convert_to_domain_profile(PatientProfileRecord { height_cm: None, ..record });
        assert_eq!(profile.bmi, None);
        assert_eq!(profile.bmi_category, None);
    }

    #[test]
    fn test_convert_to_data_profile_update_normalizes_blood_type() {
        let request = UpdateProfileRequest {
            blood_type: Some(" ab+ ".to_string()),
            first_name: Some(" Jane ".to_string()),
            ..Default::default()
        };

        let data = convert_to_data_profile_update(&request);
        assert_eq!(data.blood_type.as_deref(), Some("AB+"));
        assert_eq!(data.first_name.as_deref(), Some("Jane"));
        assert_eq!(data.last_name, None);
    }
}
