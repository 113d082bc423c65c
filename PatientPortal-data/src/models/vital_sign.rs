use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::string_or_number;

/// Wire model for a vital sign reading as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalSignRecord {
    /// Unique identifier for the reading
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    /// Owning patient identifier
    #[serde(deserialize_with = "string_or_number")]
    pub patient_id: String,

    /// Reading type code, e.g. `BLOOD_PRESSURE`
    pub reading_type: String,

    /// Textual value; `"<systolic>/<diastolic>"` for blood pressure
    #[serde(deserialize_with = "string_or_number")]
    pub reading_value: String,

    /// Display unit, if the backend stored one
    #[serde(default)]
    pub reading_unit: Option<String>,

    /// Status code, e.g. `NORMAL`
    #[serde(default)]
    pub reading_status: Option<String>,

    /// When the reading was captured
    pub reading_date: DateTime<Utc>,

    /// Optional free text
    #[serde(default)]
    pub notes: Option<String>,
}

/// Wire payload for submitting a new reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVitalSignRecord {
    pub patient_id: String,
    pub reading_type: String,
    pub reading_value: String,
    pub reading_unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading_status: Option<String>,
    pub reading_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
