// Domain entities and value objects
pub mod conversions;
pub mod insights;
pub mod profile;
pub mod vital_sign;

// Re-export common types for easier imports
pub use insights::{BloodPressureCategory, BloodPressureInsights, BmiCategory};
pub use profile::{PatientProfile, UpdateProfileRequest};
pub use vital_sign::{
    BloodPressureValue, ChartPoint, CreateVitalSignRequest, LatestReadings, ReadingStatus,
    ReadingType, StatusClass, UnknownReadingType, VitalSignCard, VitalSignReading,
    VitalSignsDashboard,
};
