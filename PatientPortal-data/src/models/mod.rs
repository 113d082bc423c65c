// Wire models for the portal backend
pub mod envelope;
pub mod profile;
pub mod vital_sign;

pub use envelope::ApiEnvelope;
pub use profile::{PatientProfileRecord, UpdatePatientProfileRecord};
pub use vital_sign::{CreateVitalSignRecord, VitalSignRecord};

use serde::{Deserialize, Deserializer};

/// Accept an identifier or value that the backend may send either as a JSON
/// string or as a JSON number, normalizing it to text.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Integer(number) => number.to_string(),
        Raw::Float(number) => number.to_string(),
    })
}
