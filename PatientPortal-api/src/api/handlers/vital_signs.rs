use std::collections::BTreeMap;

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    Extension,
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use utoipa::{IntoParams, ToSchema};

use patient_portal_domain::entities::{
    BloodPressureInsights, ChartPoint, CreateVitalSignRequest, ReadingType, VitalSignReading,
    VitalSignsDashboard,
};
use patient_portal_domain::services::HistoryQuery;

use super::error::ErrorResponse;
use crate::api::auth::AccessToken;
use crate::api::state::AppState;

/// Default insights window in days
const DEFAULT_TIMEFRAME_DAYS: u32 = 30;

/// Query parameters for retrieving reading history
#[derive(Debug, Default, Deserialize, Clone, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct HistoryQueryParams {
    /// Reading type code, e.g. HEART_RATE (default: all types)
    #[serde(rename = "type")]
    pub reading_type: Option<String>,

    /// ISO 8601 timestamp or YYYY-MM-DD start date (inclusive)
    pub start_date: Option<String>,

    /// ISO 8601 timestamp or YYYY-MM-DD end date (inclusive)
    pub end_date: Option<String>,
}

/// Query parameters for a chart series
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ChartQueryParams {
    /// Reading type code to plot, e.g. BLOOD_PRESSURE
    #[serde(rename = "type")]
    pub reading_type: Option<String>,
}

/// Query parameters for retrieving blood pressure insights
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct InsightsQueryParams {
    /// Analysis period in days (default: 30, max: 365)
    pub timeframe: Option<u32>,
}

/// Latest reading of each type for a patient
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LatestReadingsResponse {
    pub patient_id: String,
    /// Keyed by reading type code; types without readings are absent
    pub readings: BTreeMap<ReadingType, VitalSignReading>,
}

/// Plot series for one reading type
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChartResponse {
    pub reading_type: ReadingType,
    pub label: String,
    pub unit: String,
    /// Points in ascending date order
    pub points: Vec<ChartPoint>,
}

fn parse_reading_type(raw: &str) -> Result<ReadingType, ErrorResponse> {
    raw.parse::<ReadingType>()
        .map_err(|e| ErrorResponse::bad_request(e.to_string()))
}

/// Accept an RFC 3339 timestamp or a bare calendar date. A bare end date
/// covers the whole day.
fn parse_date_param(name: &str, raw: &str, end_of_day: bool) -> Result<DateTime<Utc>, ErrorResponse> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp.with_timezone(&Utc));
    }

    let invalid = || {
        ErrorResponse::bad_request(format!(
            "Invalid {}: expected an ISO 8601 timestamp or YYYY-MM-DD date",
            name
        ))
    };
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid())?;
    let time = if end_of_day {
        date.and_hms_nano_opt(23, 59, 59, 999_999_999)
    } else {
        date.and_hms_opt(0, 0, 0)
    };
    time.map(|naive| Utc.from_utc_datetime(&naive)).ok_or_else(invalid)
}

impl HistoryQueryParams {
    fn into_query(self) -> Result<HistoryQuery, ErrorResponse> {
        Ok(HistoryQuery {
            reading_type: self.reading_type.as_deref().map(parse_reading_type).transpose()?,
            start_date: self
                .start_date
                .as_deref()
                .map(|raw| parse_date_param("start_date", raw, false))
                .transpose()?,
            end_date: self
                .end_date
                .as_deref()
                .map(|raw| parse_date_param("end_date", raw, true))
                .transpose()?,
        })
    }
}

/// Reading history of a patient
#[utoipa::path(
    get,
    path = "/api/v1/patients/{patient_id}/vital-signs",
    params(
        ("patient_id" = String, Path, description = "Patient identifier"),
        HistoryQueryParams
    ),
    responses(
        (status = 200, description = "Readings in ascending date order", body = [VitalSignReading]),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
        (status = 401, description = "Missing or rejected token", body = ErrorResponse),
        (status = 502, description = "Backend unavailable", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "vital_signs"
)]
#[instrument(skip(state, token))]
pub async fn get_vital_sign_history(
    State(state): State<AppState>,
    Extension(token): Extension<AccessToken>,
    Path(patient_id): Path<String>,
    Query(params): Query<HistoryQueryParams>,
) -> Result<Json<Vec<VitalSignReading>>, ErrorResponse> {
    let query = params.into_query()?;
    let readings = state
        .services
        .vital_signs(&token)
        .get_history(&patient_id, query)
        .await?;

    info!("Returning {} readings for patient {}", readings.len(), patient_id);
    Ok(Json(readings))
}

/// Latest reading of each type for a patient
#[utoipa::path(
    get,
    path = "/api/v1/patients/{patient_id}/vital-signs/latest",
    params(("patient_id" = String, Path, description = "Patient identifier")),
    responses(
        (status = 200, description = "Latest reading per type", body = LatestReadingsResponse),
        (status = 401, description = "Missing or rejected token", body = ErrorResponse),
        (status = 502, description = "Backend unavailable", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "vital_signs"
)]
#[instrument(skip(state, token))]
pub async fn get_latest_vital_signs(
    State(state): State<AppState>,
    Extension(token): Extension<AccessToken>,
    Path(patient_id): Path<String>,
) -> Result<Json<LatestReadingsResponse>, ErrorResponse> {
    let readings = state
        .services
        .vital_signs(&token)
        .get_latest_readings(&patient_id)
        .await?;

    Ok(Json(LatestReadingsResponse { patient_id, readings }))
}

/// Dashboard cards for a patient
#[utoipa::path(
    get,
    path = "/api/v1/patients/{patient_id}/vital-signs/dashboard",
    params(("patient_id" = String, Path, description = "Patient identifier")),
    responses(
        (status = 200, description = "Dashboard cards and blood pressure trend", body = VitalSignsDashboard),
        (status = 401, description = "Missing or rejected token", body = ErrorResponse),
        (status = 502, description = "Backend unavailable", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "vital_signs"
)]
#[instrument(skip(state, token))]
pub async fn get_vital_signs_dashboard(
    State(state): State<AppState>,
    Extension(token): Extension<AccessToken>,
    Path(patient_id): Path<String>,
) -> Result<Json<VitalSignsDashboard>, ErrorResponse> {
    let dashboard = state.services.vital_signs(&token).get_dashboard(&patient_id).await?;
    Ok(Json(dashboard))
}

/// Chart series of one reading type for a patient
#[utoipa::path(
    get,
    path = "/api/v1/patients/{patient_id}/vital-signs/chart",
    params(
        ("patient_id" = String, Path, description = "Patient identifier"),
        ChartQueryParams
    ),
    responses(
        (status = 200, description = "Plot points in ascending date order", body = ChartResponse),
        (status = 400, description = "Missing or unknown type", body = ErrorResponse),
        (status = 422, description = "A stored reading value is malformed", body = ErrorResponse),
        (status = 502, description = "Backend unavailable", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "vital_signs"
)]
#[instrument(skip(state, token))]
pub async fn get_vital_sign_chart(
    State(state): State<AppState>,
    Extension(token): Extension<AccessToken>,
    Path(patient_id): Path<String>,
    Query(params): Query<ChartQueryParams>,
) -> Result<Json<ChartResponse>, ErrorResponse> {
    let raw_type = params
        .reading_type
        .ok_or_else(|| ErrorResponse::bad_request("The type query parameter is required"))?;
    let reading_type = parse_reading_type(&raw_type)?;

    let points = state
        .services
        .vital_signs(&token)
        .get_chart_series(&patient_id, reading_type)
        .await
        .map_err(|e| {
            warn!("Chart for patient {} failed: {}", patient_id, e);
            ErrorResponse::from(e)
        })?;

    Ok(Json(ChartResponse {
        reading_type,
        label: reading_type.label(),
        unit: reading_type.default_unit().to_string(),
        points,
    }))
}

/// Blood pressure insights for a patient
#[utoipa::path(
    get,
    path = "/api/v1/patients/{patient_id}/vital-signs/insights/blood-pressure",
    params(
        ("patient_id" = String, Path, description = "Patient identifier"),
        InsightsQueryParams
    ),
    responses(
        (status = 200, description = "Blood pressure insights", body = BloodPressureInsights),
        (status = 400, description = "Invalid timeframe", body = ErrorResponse),
        (status = 404, description = "No blood pressure readings in the timeframe", body = ErrorResponse),
        (status = 422, description = "A stored reading value is malformed", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "vital_signs"
)]
#[instrument(skip(state, token))]
pub async fn get_blood_pressure_insights(
    State(state): State<AppState>,
    Extension(token): Extension<AccessToken>,
    Path(patient_id): Path<String>,
    Query(params): Query<InsightsQueryParams>,
) -> Result<Json<BloodPressureInsights>, ErrorResponse> {
    let timeframe = params.timeframe.unwrap_or(DEFAULT_TIMEFRAME_DAYS);
    info!("Generating blood pressure insights for {} days", timeframe);

    let insights = state
        .services
        .vital_signs(&token)
        .get_blood_pressure_insights(&patient_id, timeframe)
        .await?;

    Ok(Json(insights))
}

/// A single reading
#[utoipa::path(
    get,
    path = "/api/v1/vital-signs/{id}",
    params(("id" = String, Path, description = "Reading identifier")),
    responses(
        (status = 200, description = "The reading", body = VitalSignReading),
        (status = 404, description = "Reading not found", body = ErrorResponse),
        (status = 401, description = "Missing or rejected token", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "vital_signs"
)]
#[instrument(skip(state, token))]
pub async fn get_vital_sign(
    State(state): State<AppState>,
    Extension(token): Extension<AccessToken>,
    Path(id): Path<String>,
) -> Result<Json<VitalSignReading>, ErrorResponse> {
    let reading = state.services.vital_signs(&token).get_reading_by_id(&id).await?;
    Ok(Json(reading))
}

/// Record a new reading
#[utoipa::path(
    post,
    path = "/api/v1/vital-signs",
    request_body = CreateVitalSignRequest,
    responses(
        (status = 201, description = "Reading recorded", body = VitalSignReading),
        (status = 400, description = "Invalid reading", body = ErrorResponse),
        (status = 401, description = "Missing or rejected token", body = ErrorResponse),
        (status = 502, description = "Backend unavailable", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "vital_signs"
)]
#[instrument(skip(state, token, request))]
pub async fn create_vital_sign(
    State(state): State<AppState>,
    Extension(token): Extension<AccessToken>,
    Json(request): Json<CreateVitalSignRequest>,
) -> Result<(StatusCode, Json<VitalSignReading>), ErrorResponse> {
    let reading = state.services.vital_signs(&token).record_reading(request).await?;

    info!("Recorded {} reading {}", reading.reading_type, reading.id);
    Ok((StatusCode::CREATED, Json(reading)))
}
