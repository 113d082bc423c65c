use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::insights::BloodPressureInsights;

/// Fixed set of vital sign categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReadingType {
    BloodPressure,
    HeartRate,
    Weight,
    Temperature,
    BloodSugar,
    OxygenSaturation,
}

impl ReadingType {
    /// Every reading type, in dashboard display order
    pub const ALL: [ReadingType; 6] = [
        ReadingType::BloodPressure,
        ReadingType::HeartRate,
        ReadingType::Weight,
        ReadingType::Temperature,
        ReadingType::BloodSugar,
        ReadingType::OxygenSaturation,
    ];

    /// Wire code, e.g. `BLOOD_PRESSURE`
    pub fn as_str(self) -> &'static str {
        match self {
            ReadingType::BloodPressure => "BLOOD_PRESSURE",
            ReadingType::HeartRate => "HEART_RATE",
            ReadingType::Weight => "WEIGHT",
            ReadingType::Temperature => "TEMPERATURE",
            ReadingType::BloodSugar => "BLOOD_SUGAR",
            ReadingType::OxygenSaturation => "OXYGEN_SATURATION",
        }
    }

    /// Unit used when a reading does not carry one
    pub fn default_unit(self) -> &'static str {
        match self {
            ReadingType::BloodPressure => "mmHg",
            ReadingType::HeartRate => "bpm",
            ReadingType::Weight => "kg",
            ReadingType::Temperature => "C",
            ReadingType::BloodSugar => "mg/dL",
            ReadingType::OxygenSaturation => "%",
        }
    }

    /// Human label, e.g. `Blood Pressure`
    pub fn label(self) -> String {
        crate::services::resolver::format_reading_type(self.as_str())
    }
}

impl fmt::Display for ReadingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a reading type code is outside the fixed set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown reading type: {0}")]
pub struct UnknownReadingType(pub String);

impl FromStr for ReadingType {
    type Err = UnknownReadingType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        ReadingType::ALL
            .into_iter()
            .find(|reading_type| reading_type.as_str().eq_ignore_ascii_case(code))
            .ok_or_else(|| UnknownReadingType(s.to_string()))
    }
}

/// Coarse classification recorded with a reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReadingStatus {
    Normal,
    Elevated,
    Low,
}

impl ReadingStatus {
    /// Wire code, e.g. `NORMAL`
    pub fn as_str(self) -> &'static str {
        match self {
            ReadingStatus::Normal => "NORMAL",
            ReadingStatus::Elevated => "ELEVATED",
            ReadingStatus::Low => "LOW",
        }
    }
}

impl FromStr for ReadingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NORMAL" => Ok(ReadingStatus::Normal),
            "ELEVATED" => Ok(ReadingStatus::Elevated),
            "LOW" => Ok(ReadingStatus::Low),
            _ => Err(format!("Unknown reading status: {}", s)),
        }
    }
}

/// Display classification of a reading's status; drives styling only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusClass {
    Normal,
    Elevated,
    Low,
    Unknown,
}

impl StatusClass {
    /// Color used by the dashboard badge
    pub fn display_color(self) -> &'static str {
        match self {
            StatusClass::Normal => "#16a34a",
            StatusClass::Elevated => "#dc2626",
            StatusClass::Low => "#d97706",
            StatusClass::Unknown => "#6b7280",
        }
    }
}

impl From<Option<ReadingStatus>> for StatusClass {
    fn from(status: Option<ReadingStatus>) -> Self {
        match status {
            Some(ReadingStatus::Normal) => StatusClass::Normal,
            Some(ReadingStatus::Elevated) => StatusClass::Elevated,
            Some(ReadingStatus::Low) => StatusClass::Low,
            None => StatusClass::Unknown,
        }
    }
}

/// Returned when a blood pressure value is not `<systolic>/<diastolic>`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Blood pressure value '{0}' is not in '<systolic>/<diastolic>' form")]
pub struct MalformedBloodPressure(pub String);

/// Parsed blood pressure value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BloodPressureValue {
    /// Systolic pressure (the higher number)
    pub systolic: u16,
    /// Diastolic pressure (the lower number)
    pub diastolic: u16,
}

impl FromStr for BloodPressureValue {
    type Err = MalformedBloodPressure;

    /// Parse `"120/80"`; whitespace around either number is tolerated
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || MalformedBloodPressure(s.to_string());

        let mut parts = s.split('/');
        let (Some(systolic), Some(diastolic), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(malformed());
        };

        let number = |part: &str| -> Result<u16, MalformedBloodPressure> {
            let part = part.trim();
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed());
            }
            part.parse().map_err(|_| malformed())
        };

        Ok(BloodPressureValue {
            systolic: number(systolic)?,
            diastolic: number(diastolic)?,
        })
    }
}

impl fmt::Display for BloodPressureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.systolic, self.diastolic)
    }
}

/// One captured vital sign measurement; read-only once fetched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct VitalSignReading {
    /// Unique identifier
    pub id: String,

    /// Owning patient
    pub patient_id: String,

    /// Category of the reading
    pub reading_type: ReadingType,

    /// Textual value; `"<systolic>/<diastolic>"` for blood pressure
    pub reading_value: String,

    /// Display unit, defaulted per type when the backend stored none
    pub reading_unit: String,

    /// Recorded status, absent when missing or unrecognized
    pub reading_status: Option<ReadingStatus>,

    /// When the reading was captured
    pub reading_date: DateTime<Utc>,

    /// Optional free text
    pub notes: Option<String>,
}

impl VitalSignReading {
    /// Display classification of the recorded status
    pub fn status_class(&self) -> StatusClass {
        StatusClass::from(self.reading_status)
    }
}

/// Mapping from reading type to the latest reading of that type
pub type LatestReadings = BTreeMap<ReadingType, VitalSignReading>;

/// One point of a time series ready for plotting
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(untagged)]
pub enum ChartPoint {
    /// Blood pressure point with both components
    BloodPressure {
        date: String,
        systolic: u16,
        diastolic: u16,
    },
    /// Single-valued point for every other type
    Value { date: String, value: f64 },
}

impl ChartPoint {
    /// Date label of the point
    pub fn date(&self) -> &str {
        match self {
            ChartPoint::BloodPressure { date, .. } | ChartPoint::Value { date, .. } => date,
        }
    }
}

/// Dashboard card summarizing the latest reading of one type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct VitalSignCard {
    pub reading_type: ReadingType,
    pub label: String,
    pub value: String,
    pub unit: String,
    pub status: StatusClass,
    pub color: String,
    pub reading_date: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Everything the vital signs dashboard renders
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct VitalSignsDashboard {
    pub patient_id: String,
    /// One card per reading type with data, in display order
    pub cards: Vec<VitalSignCard>,
    /// Blood pressure trend over the dashboard window, when there is data
    pub blood_pressure: Option<BloodPressureInsights>,
    pub generated_at: DateTime<Utc>,
}

/// Request payload for recording a new reading
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CreateVitalSignRequest {
    /// Patient the reading belongs to
    #[validate(length(min = 1, message = "Patient id is required"))]
    pub patient_id: String,

    /// Category of the reading
    pub reading_type: ReadingType,

    /// Value as text, e.g. `"120/80"` or `"72"`
    #[validate(length(min = 1, max = 32, message = "Reading value must be between 1 and 32 characters"))]
    pub reading_value: String,

    /// Unit; defaults per reading type
    #[validate(length(max = 16, message = "Reading unit cannot exceed 16 characters"))]
    pub reading_unit: Option<String>,

    /// Optional status assessed at capture time
    pub reading_status: Option<ReadingStatus>,

    /// When the reading was taken. Defaults to current time if not provided.
    pub reading_date: Option<DateTime<Utc>>,

    /// Optional notes about the reading
    #[validate(length(max = 1000, message = "Notes cannot exceed 1000 characters"))]
    pub notes: Option<String>,
}
