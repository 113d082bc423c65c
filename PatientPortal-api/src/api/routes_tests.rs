#[cfg(test)]
mod api_routes_tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        Router,
    };
    use tower::ServiceExt;

    use patient_portal_domain::testing::{mock_profile_service, mock_vital_signs_service, MockHealthService};

    use crate::api::create_app;
    use crate::api::state::{AppState, StaticServices};

    fn app() -> Router {
        create_app(AppState {
            services: Arc::new(StaticServices {
                vital_signs: Arc::new(mock_vital_signs_service(Vec::new())),
                profile: Arc::new(mock_profile_service(None)),
            }),
            health: Arc::new(MockHealthService::new()),
        })
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).method("GET").body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let response = app().oneshot(get("/api-docs/openapi.json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let document: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(document["info"]["title"], "Patient Portal API");
        assert!(document["paths"]["/api/v1/patients/{patient_id}/vital-signs/dashboard"].is_object());
    }

    #[tokio::test]
    async fn test_responses_are_not_cached() {
        let response = app().oneshot(get("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
    }

    #[tokio::test]
    async fn test_malformed_authorization_is_rejected() {
        let request = Request::builder()
            .uri("/api/v1/patients/p1/vital-signs/latest")
            .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let response = app().oneshot(get("/api/v1/unknown")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
