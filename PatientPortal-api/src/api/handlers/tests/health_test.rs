use std::sync::Arc;

use axum::http::{Method, StatusCode};

use patient_portal_domain::health::ComponentStatus;
use patient_portal_domain::testing::{mock_profile_service, mock_vital_signs_service, MockHealthService};

use super::{app_with, send_anonymous};

fn health_app(health: MockHealthService) -> axum::Router {
    app_with(
        Arc::new(mock_vital_signs_service(Vec::new())),
        Arc::new(mock_profile_service(None)),
        Arc::new(health),
    )
}

#[tokio::test]
async fn test_health_check_ok_without_token() {
    let (status, body) = send_anonymous(health_app(MockHealthService::new()), Method::GET, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["components"]["backend"]["status"], "ok");
    assert_eq!(body["components"]["api"]["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body.get("uptime").is_some());
    assert!(body["components"].get("additional").is_none());
}

#[tokio::test]
async fn test_health_check_degraded_backend() {
    let health = MockHealthService::new().with_degraded_backend();
    let (status, body) = send_anonymous(health_app(health), Method::GET, "/health").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["components"]["backend"]["status"], "degraded");
    assert_eq!(body["components"]["backend"]["message"], "Backend is responding slowly");
}

#[tokio::test]
async fn test_health_check_unreachable_backend() {
    let health = MockHealthService::new().with_unhealthy_backend();
    let (status, body) = send_anonymous(health_app(health), Method::GET, "/health").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "error");
    assert_eq!(body["components"]["backend"]["status"], "error");
}

#[tokio::test]
async fn test_health_check_reports_additional_components() {
    let health = MockHealthService::new().with_component(
        "identity",
        ComponentStatus::Degraded,
        Some("Token introspection is slow".to_string()),
    );
    let (status, body) = send_anonymous(health_app(health), Method::GET, "/health").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["components"]["backend"]["status"], "ok");
    assert_eq!(body["components"]["additional"]["identity"]["status"], "degraded");
}
