use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::{header, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use prometheus::core::Collector;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, IntGaugeVec, Opts,
};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::LazyLock;
use std::time::{Duration, Instant};
use tracing::warn;

use actlog_db::PgPool;

use crate::config::MetricsProfile;

const PROFILE_PROD: u8 = 0;
const PROFILE_STAGING: u8 = 1;
const PROFILE_DEBUG: u8 = 2;

static METRICS_PROFILE: AtomicU8 = AtomicU8::new(PROFILE_PROD);

pub fn set_profile(profile: MetricsProfile) {
    let value = match profile {
        MetricsProfile::Prod => PROFILE_PROD,
        MetricsProfile::Staging => PROFILE_STAGING,
        MetricsProfile::Debug => PROFILE_DEBUG,
    };
    METRICS_PROFILE.store(value, Ordering::Relaxed);
}

fn active_profile() -> MetricsProfile {
    match METRICS_PROFILE.load(Ordering::Relaxed) {
        PROFILE_STAGING => MetricsProfile::Staging,
        PROFILE_DEBUG => MetricsProfile::Debug,
        _ => MetricsProfile::Prod,
    }
}

/// Registers with the default registry. A metric that fails to construct
/// is dropped; one that fails to register still counts, just unexported.
fn register<M>(name: &str, metric: prometheus::Result<M>) -> Option<M>
where
    M: Collector + Clone + 'static,
{
    let metric = match metric {
        Ok(metric) => metric,
        Err(err) => {
            warn!(event = "metrics_init_failed", metric = name, error = %err);
            return None;
        }
    };
    if let Err(err) = prometheus::default_registry().register(Box::new(metric.clone())) {
        warn!(event = "metrics_register_failed", metric = name, error = %err);
    }
    Some(metric)
}

fn counter_vec(name: &str, help: &str, labels: &[&str]) -> Option<IntCounterVec> {
    register(name, IntCounterVec::new(Opts::new(name, help), labels))
}

fn http_buckets() -> Vec<f64> {
    vec![
        0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
    ]
}

static HTTP_IN_FLIGHT: LazyLock<Option<IntGauge>> = LazyLock::new(|| {
    register(
        "actlog_http_in_flight",
        IntGauge::new("actlog_http_in_flight", "HTTP requests in flight"),
    )
});

static HTTP_REQUESTS: LazyLock<Option<IntCounterVec>> = LazyLock::new(|| {
    counter_vec(
        "actlog_http_requests_total",
        "HTTP requests",
        &["method", "route", "status_class"],
    )
});

static HTTP_REQUESTS_BY_STATUS: LazyLock<Option<IntCounterVec>> = LazyLock::new(|| {
    counter_vec(
        "actlog_http_requests_by_status_total",
        "HTTP requests by status",
        &["method", "route", "status"],
    )
});

static HTTP_LATENCY: LazyLock<Option<HistogramVec>> = LazyLock::new(|| {
    let name = "actlog_http_request_duration_seconds";
    register(
        name,
        HistogramVec::new(
            HistogramOpts::new(name, "HTTP request latency").buckets(http_buckets()),
            &["route"],
        ),
    )
});

static FORBIDDEN_ACCESS: LazyLock<Option<IntCounterVec>> = LazyLock::new(|| {
    counter_vec(
        "actlog_forbidden_access_total",
        "Forbidden access attempts",
        &["resource"],
    )
});

static ACTIVITY_LOGS_CREATED: LazyLock<Option<IntCounter>> = LazyLock::new(|| {
    register(
        "actlog_activity_logs_created_total",
        IntCounter::new(
            "actlog_activity_logs_created_total",
            "Activity logs persisted",
        ),
    )
});

static DB_POOL_CONNECTIONS: LazyLock<Option<IntGaugeVec>> = LazyLock::new(|| {
    let name = "actlog_db_pool_connections";
    register(
        name,
        IntGaugeVec::new(Opts::new(name, "Database pool connections"), &["state"]),
    )
});

pub fn forbidden_access(resource: &str) {
    if let Some(metric) = FORBIDDEN_ACCESS.as_ref() {
        metric
            .with_label_values(&[resource_label(&active_profile(), resource)])
            .inc();
    }
}

pub fn activity_log_created() {
    if let Some(metric) = ACTIVITY_LOGS_CREATED.as_ref() {
        metric.inc();
    }
}

fn resource_label<'a>(profile: &MetricsProfile, resource: &'a str) -> &'a str {
    match profile {
        MetricsProfile::Prod => "redacted",
        MetricsProfile::Staging | MetricsProfile::Debug => resource,
    }
}

pub async fn http_metrics(req: Request<Body>, next: Next) -> Response {
    let method = req.method().as_str().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map_or("unmatched", MatchedPath::as_str)
        .to_string();
    if let Some(gauge) = HTTP_IN_FLIGHT.as_ref() {
        gauge.inc();
    }
    let start = Instant::now();
    let response = next.run(req).await;
    let elapsed = start.elapsed().as_secs_f64();
    if let Some(gauge) = HTTP_IN_FLIGHT.as_ref() {
        gauge.dec();
    }
    record_http_request(&method, &route, response.status().as_u16(), elapsed);
    response
}

pub fn record_http_request(method: &str, route: &str, status: u16, duration_seconds: f64) {
    if let Some(metric) = HTTP_REQUESTS.as_ref() {
        metric
            .with_label_values(&[method, route, status_class(status)])
            .inc();
    }
    if let Some(metric) = HTTP_LATENCY.as_ref() {
        metric.with_label_values(&[route]).observe(duration_seconds);
    }
    if active_profile() != MetricsProfile::Prod {
        if let Some(metric) = HTTP_REQUESTS_BY_STATUS.as_ref() {
            metric
                .with_label_values(&[method, route, &status.to_string()])
                .inc();
        }
    }
}

fn status_class(status: u16) -> &'static str {
    match status / 100 {
        1 => "1xx",
        2 => "2xx",
        3 => "3xx",
        4 => "4xx",
        5 => "5xx",
        _ => "unknown",
    }
}

/// Exposition body: the axum-prometheus layer output followed by the
/// default registry.
pub fn render(layer_metrics: &str) -> Response {
    let encoder = prometheus::TextEncoder::new();
    let mut body = layer_metrics.to_string();
    let mut buffer = Vec::new();
    match encoder.encode(&prometheus::gather(), &mut buffer) {
        Ok(()) if !buffer.is_empty() => {
            body.push('\n');
            body.push_str(&String::from_utf8_lossy(&buffer));
        }
        Ok(()) => {}
        Err(err) => warn!(event = "metrics_encode_failed", error = %err),
    }
    (
        [(header::CONTENT_TYPE, encoder.format_type().to_string())],
        body,
    )
        .into_response()
}

pub fn start_db_pool_metrics(pool: PgPool, max_connections: u32) {
    let Some(gauges) = DB_POOL_CONNECTIONS.as_ref() else {
        return;
    };
    let idle_metric = gauges.with_label_values(&["idle"]);
    let active_metric = gauges.with_label_values(&["active"]);
    gauges
        .with_label_values(&["max"])
        .set(i64::from(max_connections));

    tokio::spawn(async move {
        loop {
            let idle = i64::try_from(pool.num_idle()).unwrap_or(i64::MAX);
            let size = i64::from(pool.size());
            idle_metric.set(idle);
            active_metric.set((size - idle).max(0));
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
    });
}
