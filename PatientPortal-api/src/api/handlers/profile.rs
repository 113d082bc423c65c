use axum::{
    extract::{Json, Path, State},
    Extension,
};
use tracing::{info, instrument};

use patient_portal_domain::entities::{PatientProfile, UpdateProfileRequest};

use super::error::ErrorResponse;
use crate::api::auth::AccessToken;
use crate::api::state::AppState;

/// The patient's profile
#[utoipa::path(
    get,
    path = "/api/v1/patients/{patient_id}/profile",
    params(("patient_id" = String, Path, description = "Patient identifier")),
    responses(
        (status = 200, description = "Profile with derived BMI", body = PatientProfile),
        (status = 404, description = "Profile not found", body = ErrorResponse),
        (status = 401, description = "Missing or rejected token", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "profile"
)]
#[instrument(skip(state, token))]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(token): Extension<AccessToken>,
    Path(patient_id): Path<String>,
) -> Result<Json<PatientProfile>, ErrorResponse> {
    let profile = state.services.profile(&token).get_profile(&patient_id).await?;
    Ok(Json(profile))
}

/// Update the patient's profile; absent fields are left unchanged
#[utoipa::path(
    put,
    path = "/api/v1/patients/{patient_id}/profile",
    params(("patient_id" = String, Path, description = "Patient identifier")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = PatientProfile),
        (status = 400, description = "Invalid update", body = ErrorResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse),
        (status = 401, description = "Missing or rejected token", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "profile"
)]
#[instrument(skip(state, token, request))]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(token): Extension<AccessToken>,
    Path(patient_id): Path<String>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<PatientProfile>, ErrorResponse> {
    let profile = state
        .services
        .profile(&token)
        .update_profile(&patient_id, request)
        .await?;

    info!("Profile of patient {} updated", patient_id);
    Ok(Json(profile))
}
