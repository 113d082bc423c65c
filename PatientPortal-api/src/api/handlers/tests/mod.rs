// Router-level tests for the handlers, driven through `create_app`
// against in-memory services.

mod health_test;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use patient_portal_data::models::{PatientProfileRecord, VitalSignRecord};
use patient_portal_domain::health::HealthServiceTrait;
use patient_portal_domain::services::{ProfileServiceTrait, VitalSignsServiceTrait};
use patient_portal_domain::testing::{mock_profile_service, mock_vital_signs_service, MockHealthService};

use crate::api::routes::create_app;
use crate::api::state::{AppState, StaticServices};

pub(super) const TEST_TOKEN: &str = "test-token";

/// Router over explicit service instances
pub(super) fn app_with(
    vital_signs: Arc<dyn VitalSignsServiceTrait>,
    profile: Arc<dyn ProfileServiceTrait>,
    health: Arc<dyn HealthServiceTrait>,
) -> Router {
    create_app(AppState {
        services: Arc::new(StaticServices { vital_signs, profile }),
        health,
    })
}

/// Router whose backend holds `records` and, optionally, `profile`
pub(super) fn test_app(records: Vec<VitalSignRecord>, profile: Option<PatientProfileRecord>) -> Router {
    app_with(
        Arc::new(mock_vital_signs_service(records)),
        Arc::new(mock_profile_service(profile)),
        Arc::new(MockHealthService::new()),
    )
}

/// Send a request carrying the test token and decode the JSON body
pub(super) async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", TEST_TOKEN));
    dispatch(app, request, body).await
}

/// Send a request without credentials
pub(super) async fn send_anonymous(app: Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    dispatch(app, request, None).await
}

async fn dispatch(
    app: Router,
    request: axum::http::request::Builder,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = match body {
        Some(json) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}
