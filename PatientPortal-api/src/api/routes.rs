use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::{debug, warn};

use crate::api::auth::require_bearer_token;
use crate::api::handlers::{health, profile, vital_signs};
use crate::api::state::AppState;
use crate::openapi::configure_swagger_routes;

/// CORS policy from `CORS_ALLOWED_ORIGINS` (comma separated); any origin when unset
fn cors_layer() -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let origins: Vec<HeaderValue> = std::env::var("CORS_ALLOWED_ORIGINS")
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}

/// Create the application router
pub fn create_app(state: AppState) -> Router {
    debug!("Creating application router");

    // Routes that act on behalf of the caller and forward its token
    let api_routes = Router::new()
        .route(
            "/patients/:patient_id/vital-signs",
            get(vital_signs::get_vital_sign_history),
        )
        .route(
            "/patients/:patient_id/vital-signs/latest",
            get(vital_signs::get_latest_vital_signs),
        )
        .route(
            "/patients/:patient_id/vital-signs/dashboard",
            get(vital_signs::get_vital_signs_dashboard),
        )
        .route(
            "/patients/:patient_id/vital-signs/chart",
            get(vital_signs::get_vital_sign_chart),
        )
        .route(
            "/patients/:patient_id/vital-signs/insights/blood-pressure",
            get(vital_signs::get_blood_pressure_insights),
        )
        .route(
            "/patients/:patient_id/profile",
            get(profile::get_profile).put(profile::update_profile),
        )
        .route("/vital-signs", post(vital_signs::create_vital_sign))
        .route("/vital-signs/:id", get(vital_signs::get_vital_sign))
        .route_layer(middleware::from_fn(require_bearer_token));

    debug!("API routes configured");

    let public_routes = Router::new().route("/health", get(health::health_check));

    let app = Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .with_state(state)
        .merge(configure_swagger_routes())
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http());

    // Initialize health check service startup time
    health::initialize_server_start_time();
    debug!("Application router created");

    app
}
