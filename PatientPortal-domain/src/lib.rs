// PatientPortal Domain
// This crate contains the business logic behind the patient portal screens

// Services that implement business logic
pub mod services;

// Domain entities
pub mod entities;

// Health checks and system status
pub mod health;

// Re-export the gateway module from the data crate for convenience
pub use patient_portal_data::gateway;

// Testing utilities - only available with mock feature
#[cfg(any(test, feature = "mock"))]
pub mod testing;
