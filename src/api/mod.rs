// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    error::{ApiError, ErrorBody},
    models::{CheckWalletRequest, CheckWalletResponse, EligibilityData, HealthResponse, StatsResponse},
    state::AppState,
    storage::AllowlistStats,
};

pub mod health;
pub mod stats;
pub mod wallet;

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(state.cors_origin.clone());

    let api_routes = Router::new()
        .route("/health", get(health::health).fallback(get_only))
        .route("/health/ready", get(health::readiness).fallback(get_only))
        .route("/wallet/check", post(wallet::check_wallet).fallback(post_only))
        .route("/stats", get(stats::stats).fallback(get_only))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .fallback(not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Browser access: one configured origin, or any origin when unset.
fn cors_layer(origin: Option<HeaderValue>) -> CorsLayer {
    let allow_origin = match origin {
        Some(origin) => AllowOrigin::exact(origin),
        None => AllowOrigin::any(),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

async fn get_only() -> ApiError {
    ApiError::method_not_allowed("Method not allowed. Use GET.")
}

async fn post_only() -> ApiError {
    ApiError::method_not_allowed("Method not allowed. Use POST.")
}

async fn not_found() -> ApiError {
    ApiError::not_found("Endpoint not found")
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::readiness,
        wallet::check_wallet,
        stats::stats
    ),
    components(
        schemas(
            CheckWalletRequest,
            CheckWalletResponse,
            EligibilityData,
            StatsResponse,
            AllowlistStats,
            HealthResponse,
            health::ReadyResponse,
            health::ReadyChecks,
            ErrorBody
        )
    ),
    tags(
        (name = "Wallet", description = "Allowlist eligibility checks"),
        (name = "Stats", description = "Allowlist statistics"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let app = router(AppState::default());
        // Ensure the router can be converted into a service without panicking.
        let _ = app.into_make_service();
    }

    #[tokio::test]
    async fn unknown_path_is_json_404() {
        let request = Request::builder()
            .uri("/api/nope")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(router(AppState::default()), request).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Endpoint not found");
    }

    #[tokio::test]
    async fn wrong_method_on_check_is_405() {
        let request = Request::builder()
            .method("GET")
            .uri("/api/wallet/check")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(router(AppState::default()), request).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["error"], "Method not allowed. Use POST.");
    }

    #[tokio::test]
    async fn wrong_method_on_health_is_405() {
        let request = Request::builder()
            .method("DELETE")
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(router(AppState::default()), request).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["error"], "Method not allowed. Use GET.");
    }

    #[tokio::test]
    async fn health_route_is_served() {
        let request = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(router(AppState::default()), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["environment"], "development");
    }

    #[tokio::test]
    async fn preflight_allows_configured_origin() {
        let origin = "https://wallet-checker.example";
        let state = AppState::default().with_cors_origin(Some(HeaderValue::from_static(origin)));
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/api/wallet/check")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();

        let response = router(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            origin
        );
    }

    #[test]
    fn openapi_lists_all_paths() {
        let doc = ApiDoc::openapi();
        for path in ["/api/health", "/api/health/ready", "/api/wallet/check", "/api/stats"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
