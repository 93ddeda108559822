use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware, Router};
use opentelemetry::global;
use opentelemetry::propagation::Extractor;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing_opentelemetry::OpenTelemetrySpanExt;

use actlog_db::{connect_postgres_with_max, PgPool, PgStore};

use crate::app::{self, AppState};
use crate::config::{MetricsConfig, MetricsProfile};
use crate::infra::metrics;
use crate::infra::request_context::request_id;
use crate::runtime;
use crate::settings;

const REQUEST_ID_HEADER: &str = "x-request-id";

struct HeaderExtractor<'a>(&'a axum::http::HeaderMap);

impl Extractor for HeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|value| value.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(axum::http::HeaderName::as_str).collect()
    }
}

pub fn init_sentry(settings: &settings::Settings) -> Option<sentry::ClientInitGuard> {
    let sentry = &settings.config.sentry;
    if !sentry.enabled || sentry.dsn.is_empty() {
        return None;
    }
    Some(sentry::init((
        sentry.dsn.as_str(),
        sentry::ClientOptions {
            environment: sentry.environment.clone().map(Into::into),
            release: sentry.release.clone().map(Into::into),
            ..Default::default()
        },
    )))
}

pub fn init_tracing(
    sentry_enabled: bool,
    settings: &settings::Settings,
) -> Option<runtime::OtelGuard> {
    runtime::init_tracing(sentry_enabled, settings)
}

pub fn log_startup(settings: &settings::Settings, metrics_config: &MetricsConfig) {
    let metrics_profile = metrics_config.effective_profile();
    tracing::info!(
        event = "server_startup",
        addr = %settings.addr,
        db_pool_max = settings.db_pool_max,
        max_body_bytes = settings.config.server.max_body_bytes,
        otel_enabled = settings.config.tracing.otel.enabled,
        sentry_enabled = settings.config.sentry.enabled,
        metrics_enabled = metrics_config.enabled,
        metrics_profile = ?metrics_profile,
        server_name = ?settings.config.server.name,
        "Server configuration loaded"
    );
    if metrics_config.enabled && metrics_profile != MetricsProfile::Prod {
        tracing::warn!(
            event = "metrics_profile_non_prod",
            profile = ?metrics_profile,
            "Non-prod metrics profile enabled"
        );
    }
}

pub fn init_metrics_registry(metrics_config: &MetricsConfig) {
    metrics::set_profile(metrics_config.effective_profile());
    if !metrics_config.enabled {
        return;
    }
    #[cfg(target_os = "linux")]
    {
        let process_collector = prometheus::process_collector::ProcessCollector::for_self();
        if prometheus::default_registry()
            .register(Box::new(process_collector))
            .is_err()
        {
            tracing::warn!(event = "process_metrics_register_failed");
        }
    }
}

pub async fn connect_db(settings: &settings::Settings) -> Result<PgPool, sqlx_core::Error> {
    connect_postgres_with_max(&settings.db_url, settings.db_pool_max).await
}

pub fn build_state(settings: &settings::Settings, pool: PgPool) -> AppState {
    if settings.config.metrics.enabled {
        metrics::start_db_pool_metrics(pool.clone(), settings.db_pool_max);
    }
    AppState::new(
        Arc::new(PgStore::new(pool)),
        settings.token_pepper.clone(),
        settings.config.clone(),
    )
}

pub fn build_app(metrics_config: &MetricsConfig, state: AppState) -> Router {
    let request_id_header = axum::http::HeaderName::from_static(REQUEST_ID_HEADER);
    let mut app = app::build_router(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let id = request_id(request.headers()).unwrap_or_else(|| "unknown".to_string());
                let matched = request
                    .extensions()
                    .get::<axum::extract::MatchedPath>()
                    .map_or("unmatched", axum::extract::MatchedPath::as_str);
                let span = tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %matched,
                    request_id = %id,
                    user_id = tracing::field::Empty
                );
                let parent = global::get_text_map_propagator(|prop| {
                    prop.extract(&HeaderExtractor(request.headers()))
                });
                span.set_parent(parent);
                span
            }),
        )
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(CatchPanicLayer::custom(|err| {
            tracing::error!(event = "panic_recovered", error = ?err, "handler panicked");
            axum::response::IntoResponse::into_response(
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            )
        }));
    if metrics_config.enabled {
        let (layer, handle) = axum_prometheus::PrometheusMetricLayer::pair();
        app = app
            .route_layer(middleware::from_fn(metrics::http_metrics))
            .layer(layer)
            .route(
                &metrics_config.endpoint,
                axum::routing::get(move || async move { metrics::render(&handle.render()) }),
            );
    }
    app
}

pub async fn serve(settings: &settings::Settings, app: Router) {
    let addr: SocketAddr = settings.addr;
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(event = "server_bind_failed", addr = %addr, error = %err);
            return;
        }
    };
    tracing::info!(event = "server_listening", addr = %addr, "listening");
    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(runtime::shutdown_signal())
        .await
    {
        tracing::error!(event = "server_failed", error = %err);
    }
}
