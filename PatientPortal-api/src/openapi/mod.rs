use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

/// Registers the bearer token scheme referenced by the protected paths
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // Vital signs endpoints
        crate::api::handlers::vital_signs::get_vital_sign_history,
        crate::api::handlers::vital_signs::get_latest_vital_signs,
        crate::api::handlers::vital_signs::get_vital_signs_dashboard,
        crate::api::handlers::vital_signs::get_vital_sign_chart,
        crate::api::handlers::vital_signs::get_blood_pressure_insights,
        crate::api::handlers::vital_signs::get_vital_sign,
        crate::api::handlers::vital_signs::create_vital_sign,

        // Profile endpoints
        crate::api::handlers::profile::get_profile,
        crate::api::handlers::profile::update_profile
    ),
    components(
        schemas(
            // Domain entities
            patient_portal_domain::entities::VitalSignReading,
            patient_portal_domain::entities::ReadingType,
            patient_portal_domain::entities::ReadingStatus,
            patient_portal_domain::entities::StatusClass,
            patient_portal_domain::entities::ChartPoint,
            patient_portal_domain::entities::VitalSignCard,
            patient_portal_domain::entities::VitalSignsDashboard,
            patient_portal_domain::entities::CreateVitalSignRequest,
            patient_portal_domain::entities::BloodPressureInsights,
            patient_portal_domain::entities::BloodPressureCategory,
            patient_portal_domain::entities::BmiCategory,
            patient_portal_domain::entities::PatientProfile,
            patient_portal_domain::entities::UpdateProfileRequest,

            // Handler types
            crate::api::handlers::error::ErrorResponse,
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentStatus,
            crate::api::handlers::health::ComponentHealthStatus,
            crate::api::handlers::vital_signs::LatestReadingsResponse,
            crate::api::handlers::vital_signs::ChartResponse,
            crate::api::handlers::vital_signs::HistoryQueryParams,
            crate::api::handlers::vital_signs::ChartQueryParams,
            crate::api::handlers::vital_signs::InsightsQueryParams
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "vital_signs", description = "Vital sign readings, dashboard, charts and insights"),
        (name = "profile", description = "Patient profile")
    ),
    info(
        title = "Patient Portal API",
        version = "0.1.0",
        description = "Backend-for-frontend serving the patient portal's vital signs and profile screens",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;
