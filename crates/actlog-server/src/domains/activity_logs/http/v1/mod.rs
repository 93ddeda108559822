use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::app::AppState;
use crate::domains::auth::core::{auth_middleware, require_super_admin};

mod handlers;
pub(crate) mod types;

/// Creation is public; reads need a super-admin session.
pub fn router() -> Router<AppState> {
    let admin = Router::new()
        .route("/activity-logs", get(handlers::list_activity_logs))
        .route(
            "/activity-logs/:user_id",
            get(handlers::list_user_activity_logs),
        )
        .route_layer(middleware::from_fn(require_super_admin))
        .route_layer(middleware::from_fn(auth_middleware));

    Router::new()
        .route(
            "/activity-logs/create",
            post(handlers::create_activity_log),
        )
        .merge(admin)
}
