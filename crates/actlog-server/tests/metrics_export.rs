use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;

mod support;

use actlog_server::config::{MetricsConfig, MetricsProfile};
use actlog_server::infra::metrics;

async fn get(app: &axum::Router, uri: &str) -> axum::response::Response {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request");
    app.clone().oneshot(request).await.expect("response")
}

#[tokio::test]
async fn app_exports_metrics_and_request_ids() {
    let metrics_config = MetricsConfig {
        enabled: true,
        endpoint: "/metrics".to_string(),
        profile: Some(MetricsProfile::Debug),
    };
    metrics::set_profile(metrics_config.effective_profile());
    let store = Arc::new(support::MemoryStore::default());
    store.add_user("u1", false);
    let app = actlog_server::bootstrap::build_app(
        &metrics_config,
        support::test_state(store.clone()),
    );

    let health = get(&app, "/health").await;
    assert_eq!(health.status(), StatusCode::OK);
    assert!(health.headers().contains_key("x-request-id"));

    let token = store.token_for("u1");
    let request = Request::builder()
        .uri("/activity-logs")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request");
    let forbidden = app.clone().oneshot(request).await.expect("response");
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let response = get(&app, "/metrics").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let text = String::from_utf8_lossy(&body);
    assert!(text.contains("actlog_http_requests_total"));
    assert!(text.contains("actlog_forbidden_access_total"));
}
