pub mod error;
pub mod health;
pub mod profile;
pub mod vital_signs;

// Tests module
#[cfg(test)]
mod tests;

// Re-export handlers for easier imports
pub use error::ErrorResponse;
pub use health::health_check;
pub use profile::{get_profile, update_profile};
pub use vital_signs::{
    create_vital_sign, get_blood_pressure_insights, get_latest_vital_signs, get_vital_sign,
    get_vital_sign_chart, get_vital_sign_history, get_vital_signs_dashboard,
};
