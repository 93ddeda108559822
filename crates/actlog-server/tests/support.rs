#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use chrono::{Duration, Utc};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use uuid::Uuid;

use actlog_core::{
    ActivityLog, ActivityLogStore, IdentityStore, ServiceError, ServiceResult, Session, Store,
    User,
};
use actlog_server::app::AppState;
use actlog_server::config::ServerConfig;
use actlog_server::tokens::hash_token;

pub const PEPPER: &str = "test-pepper";

/// In-memory [`Store`] mirroring the Postgres constraints the handlers rely on.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<HashMap<String, User>>,
    sessions: Mutex<HashMap<String, Session>>,
    logs: Mutex<Vec<ActivityLog>>,
    deleted_after_check: Mutex<HashSet<String>>,
    unhealthy: AtomicBool,
}

impl MemoryStore {
    pub fn add_user(&self, id: &str, is_super_admin: bool) -> User {
        let now = Utc::now();
        let user = User {
            id: id.to_string(),
            email: format!("{id}@example.com"),
            first_name: None,
            last_name: None,
            is_active: true,
            is_super_admin,
            created_at: now,
            updated_at: now,
        };
        self.users
            .lock()
            .expect("users lock")
            .insert(id.to_string(), user.clone());
        user
    }

    pub fn deactivate(&self, id: &str) {
        if let Some(user) = self.users.lock().expect("users lock").get_mut(id) {
            user.is_active = false;
        }
    }

    /// Issues a bearer token valid for `ttl` from now; negative ttl yields an expired one.
    pub fn issue_token(&self, user_id: &str, ttl: Duration) -> String {
        let token = format!("tok_{}", Uuid::now_v7().simple());
        let now = Utc::now();
        let session = Session {
            id: Uuid::now_v7().to_string(),
            user_id: user_id.to_string(),
            access_token_hash: hash_token(&token, PEPPER),
            expires_at: now + ttl,
            created_at: now,
        };
        self.sessions
            .lock()
            .expect("sessions lock")
            .insert(session.access_token_hash.clone(), session);
        token
    }

    pub fn token_for(&self, user_id: &str) -> String {
        self.issue_token(user_id, Duration::hours(1))
    }

    /// The next existence check for `id` succeeds, then the user is gone.
    pub fn delete_after_next_check(&self, id: &str) {
        self.deleted_after_check
            .lock()
            .expect("deleted lock")
            .insert(id.to_string());
    }

    pub fn logs(&self) -> Vec<ActivityLog> {
        self.logs.lock().expect("logs lock").clone()
    }

    pub fn set_unhealthy(&self) {
        self.unhealthy.store(true, Ordering::SeqCst);
    }

    fn sorted(mut logs: Vec<ActivityLog>) -> Vec<ActivityLog> {
        logs.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
        logs
    }
}

#[async_trait]
impl ActivityLogStore for MemoryStore {
    async fn user_exists(&self, user_id: &str) -> ServiceResult<bool> {
        let mut users = self.users.lock().expect("users lock");
        let exists = users.contains_key(user_id);
        if self
            .deleted_after_check
            .lock()
            .expect("deleted lock")
            .remove(user_id)
        {
            users.remove(user_id);
        }
        Ok(exists)
    }

    async fn create_activity_log(&self, log: &ActivityLog) -> ServiceResult<()> {
        if !self.users.lock().expect("users lock").contains_key(&log.user_id) {
            return Err(ServiceError::new("not_found", "user does not exist"));
        }
        self.logs.lock().expect("logs lock").push(log.clone());
        Ok(())
    }

    async fn list_activity_logs_by_user(&self, user_id: &str) -> ServiceResult<Vec<ActivityLog>> {
        Ok(Self::sorted(
            self.logs()
                .into_iter()
                .filter(|log| log.user_id == user_id)
                .collect(),
        ))
    }

    async fn list_activity_logs(&self) -> ServiceResult<Vec<ActivityLog>> {
        Ok(Self::sorted(self.logs()))
    }
}

#[async_trait]
impl IdentityStore for MemoryStore {
    async fn get_user(&self, user_id: &str) -> ServiceResult<Option<User>> {
        Ok(self.users.lock().expect("users lock").get(user_id).cloned())
    }

    async fn get_session_by_access_token_hash(
        &self,
        token_hash: &str,
    ) -> ServiceResult<Option<Session>> {
        Ok(self
            .sessions
            .lock()
            .expect("sessions lock")
            .get(token_hash)
            .cloned())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> ServiceResult<()> {
        if self.unhealthy.load(Ordering::SeqCst) {
            return Err(ServiceError::new("db_error", "connection refused"));
        }
        Ok(())
    }
}

pub fn test_state(store: Arc<MemoryStore>) -> AppState {
    AppState::new(store, PEPPER, ServerConfig::default())
}

pub struct TestApp {
    pub app: axum::Router,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::default());
        let app = actlog_server::app::build_router(test_state(store.clone()));
        Self { app, store }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(Method::GET).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::empty()).expect("request")).await
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request");
        self.send(request).await
    }

    pub async fn create_log(&self, user_id: &str, action_type: &str) -> (StatusCode, Value) {
        self.post_json(
            "/activity-logs/create",
            &serde_json::json!({
                "user_id": user_id,
                "action_type": action_type,
                "description": format!("{action_type} by {user_id}"),
            }),
        )
        .await
    }
}
