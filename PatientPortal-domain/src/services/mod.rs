pub mod chart;
pub mod errors;
pub mod insights;
pub mod latest;
pub mod profile;
pub mod resolver;
pub mod vital_signs;

// Domain services
// Pure transforms over readings plus the async services built on the
// repository traits.

pub use chart::{build_chart_series, ChartError};
pub use errors::ServiceError;
pub use latest::{aggregate_latest, aggregate_latest_by_date, group_by_type};
pub use profile::{create_profile_service, ProfileService, ProfileServiceTrait};
pub use vital_signs::{
    create_vital_signs_service, HistoryQuery, VitalSignsService, VitalSignsServiceTrait,
};
