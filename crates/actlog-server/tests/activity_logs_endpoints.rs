use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use chrono::Duration;
use serde_json::json;
use std::collections::HashSet;

mod support;

use support::TestApp;

fn ids(values: &serde_json::Value) -> HashSet<String> {
    values
        .as_array()
        .expect("array")
        .iter()
        .map(|log| log["id"].as_str().expect("id").to_string())
        .collect()
}

#[tokio::test]
async fn create_for_existing_user_returns_created() {
    let app = TestApp::new();
    app.store.add_user("u1", false);

    let (status, body) = app.create_log("u1", "login").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Activity log created successfully");
    assert_eq!(body["status_code"], 201);
    assert!(body["timestamp"].is_string());

    let id = body["id"].as_str().expect("id");
    let stored = app.store.logs();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, id);
    assert_eq!(stored[0].user_id, "u1");
    assert_eq!(stored[0].action_type, "login");
    assert_eq!(stored[0].description, "login by u1");
}

#[tokio::test]
async fn create_for_unknown_user_is_not_found_and_persists_nothing() {
    let app = TestApp::new();
    app.store.add_user("u1", false);

    let (status, body) = app.create_log("ghost", "login").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
    assert_eq!(body["detail"], "User not found");
    assert!(app.store.logs().is_empty());
}

#[tokio::test]
async fn create_for_user_deleted_after_check_is_not_found() {
    let app = TestApp::new();
    app.store.add_user("u1", false);
    app.store.delete_after_next_check("u1");

    let (status, body) = app.create_log("u1", "login").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "User not found");
    assert!(app.store.logs().is_empty());
}

#[tokio::test]
async fn create_does_not_require_credentials_and_is_not_idempotent() {
    let app = TestApp::new();
    app.store.add_user("u1", false);

    let (first, a) = app.create_log("u1", "login").await;
    let (second, b) = app.create_log("u1", "login").await;
    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CREATED);
    assert_ne!(a["id"], b["id"]);
    assert_eq!(app.store.logs().len(), 2);
}

#[tokio::test]
async fn create_with_missing_field_is_unprocessable() {
    let app = TestApp::new();
    app.store.add_user("u1", false);

    let (status, body) = app
        .post_json(
            "/activity-logs/create",
            &json!({ "user_id": "u1", "action_type": "login" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
    assert!(body["detail"].as_str().expect("detail").contains("description"));
    assert!(app.store.logs().is_empty());
}

#[tokio::test]
async fn create_with_malformed_json_is_bad_request() {
    let app = TestApp::new();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/activity-logs/create")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"user_id\":"))
        .expect("request");

    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn create_without_json_content_type_is_unsupported() {
    let app = TestApp::new();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/activity-logs/create")
        .body(Body::from("user_id=u1"))
        .expect("request");

    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn reads_require_credentials() {
    let app = TestApp::new();
    app.store.add_user("u1", false);

    for uri in ["/activity-logs", "/activity-logs/u1"] {
        let (status, body) = app.get(uri, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body["error"], "unauthorized");

        let (status, _) = app.get(uri, Some("not-a-session")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn non_super_admin_is_forbidden_on_both_reads() {
    let app = TestApp::new();
    app.store.add_user("u1", false);
    let token = app.store.token_for("u1");

    for uri in ["/activity-logs", "/activity-logs/u1"] {
        let (status, body) = app.get(uri, Some(&token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
        assert_eq!(body["error"], "forbidden");
        assert_eq!(
            body["detail"],
            "You do not have permission to access this resource"
        );
    }
}

#[tokio::test]
async fn expired_session_is_rejected() {
    let app = TestApp::new();
    app.store.add_user("admin", true);
    let token = app.store.issue_token("admin", Duration::seconds(-1));

    let (status, body) = app.get("/activity-logs", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Could not validate credentials");
}

#[tokio::test]
async fn inactive_super_admin_is_rejected() {
    let app = TestApp::new();
    app.store.add_user("admin", true);
    let token = app.store.token_for("admin");
    app.store.deactivate("admin");

    let (status, _) = app.get("/activity-logs", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logs_by_user_returns_exactly_that_users_logs() {
    let app = TestApp::new();
    app.store.add_user("admin", true);
    app.store.add_user("u1", false);
    app.store.add_user("u2", false);
    let token = app.store.token_for("admin");

    let mut expected = HashSet::new();
    for action in ["login", "update", "logout"] {
        let (_, body) = app.create_log("u1", action).await;
        expected.insert(body["id"].as_str().expect("id").to_string());
    }
    app.create_log("u2", "login").await;

    let (status, body) = app.get("/activity-logs/u1", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Activity logs retrieved successfully");
    assert_eq!(body["status_code"], 200);
    assert_eq!(ids(&body["data"]), expected);
    for log in body["data"].as_array().expect("data") {
        assert_eq!(log["user_id"], "u1");
    }
}

#[tokio::test]
async fn logs_by_user_for_user_without_logs_is_empty() {
    let app = TestApp::new();
    app.store.add_user("admin", true);
    app.store.add_user("quiet", false);
    let token = app.store.token_for("admin");

    let (status, body) = app.get("/activity-logs/quiet", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn logs_by_unknown_user_is_not_found() {
    let app = TestApp::new();
    app.store.add_user("admin", true);
    let token = app.store.token_for("admin");

    let (status, body) = app.get("/activity-logs/ghost", Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Not Found: User ID does not exist");
}

#[tokio::test]
async fn all_logs_returns_every_log_as_bare_array() {
    let app = TestApp::new();
    app.store.add_user("admin", true);
    app.store.add_user("u1", false);
    app.store.add_user("u2", false);
    let token = app.store.token_for("admin");

    let mut expected = HashSet::new();
    for user in ["u1", "u2", "admin"] {
        let (_, body) = app.create_log(user, "login").await;
        expected.insert(body["id"].as_str().expect("id").to_string());
    }

    let (status, body) = app.get("/activity-logs", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_array());
    assert_eq!(ids(&body), expected);
}

#[tokio::test]
async fn all_logs_is_empty_without_logs() {
    let app = TestApp::new();
    app.store.add_user("admin", true);
    let token = app.store.token_for("admin");

    let (status, body) = app.get("/activity-logs", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn health_reports_store_state() {
    let app = TestApp::new();

    let (status, body) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    app.store.set_unhealthy();
    let (status, body) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "db_error");
}
