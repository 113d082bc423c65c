// Repository module structure
pub mod errors;
mod in_memory;
mod profile;
mod vital_signs;

// Re-export commonly used types
pub use errors::RepositoryError;
pub use in_memory::InMemoryStorage;
pub use profile::{PatientProfileRepository, PatientProfileRepositoryTrait};
pub use vital_signs::{HistoryFilter, VitalSignsRepository, VitalSignsRepositoryTrait};

// Mock repositories for tests and for dependent crates with the mock feature
#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(any(test, feature = "mock"))]
pub use mock::{MockPatientProfileRepository, MockVitalSignsRepository};
