use opentelemetry::global;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::runtime;
use opentelemetry_sdk::trace::{Sampler, Tracer};
use opentelemetry_sdk::Resource;
use std::fs;
use tracing_subscriber::{prelude::*, EnvFilter};

use crate::config::OtelConfig;
use crate::settings;

const DEFAULT_LOG_FILTER: &str = "actlog_server=info,actlog_db=info,tower_http=info,sqlx=warn";
const SERVICE_NAME: &str = "actlog-server";

/// Keeps the OTLP pipeline alive; dropping it flushes pending spans.
pub struct OtelGuard {
    tracer: Tracer,
}

impl Drop for OtelGuard {
    fn drop(&mut self) {
        global::shutdown_tracer_provider();
    }
}

pub fn init_tracing(
    sentry_enabled: bool,
    settings: &settings::Settings,
) -> Option<OtelGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let json = std::env::var("LOG_FORMAT").is_ok_and(|value| value.eq_ignore_ascii_case("json"));

    let otel_guard = settings
        .config
        .tracing
        .otel
        .enabled
        .then(|| init_otel(&settings.config.tracing.otel))
        .and_then(|result| match result {
            Ok(tracer) => Some(OtelGuard { tracer }),
            Err(err) => {
                // The subscriber is not installed yet, so this goes to stderr.
                eprintln!("otel_init_failed: {err}");
                None
            }
        });

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(sentry_enabled.then(sentry_tracing::layer))
        .with(
            otel_guard
                .as_ref()
                .map(|guard| tracing_opentelemetry::layer().with_tracer(guard.tracer.clone())),
        );
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }

    if !settings.config.sentry.enabled && !settings.config.sentry.dsn.is_empty() {
        tracing::warn!(
            event = "sentry_disabled_with_dsn",
            "sentry dsn configured but sentry.enabled is false"
        );
    }

    otel_guard
}

fn init_otel(config: &OtelConfig) -> Result<Tracer, String> {
    let mut exporter = opentelemetry_otlp::new_exporter().http();
    if let Some(endpoint) = config.endpoint.as_deref() {
        exporter = exporter.with_endpoint(endpoint);
    }
    if let Some(client) = otel_http_client(config)? {
        exporter = exporter.with_http_client(client);
    }

    let service_name = config
        .service_name
        .clone()
        .unwrap_or_else(|| SERVICE_NAME.to_string());
    let trace_config = opentelemetry_sdk::trace::Config::default()
        .with_resource(Resource::new(vec![KeyValue::new(
            "service.name",
            service_name,
        )]))
        .with_sampler(Sampler::TraceIdRatioBased(sampling_ratio(
            config.sampling_ratio,
        )));
    let provider = opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(exporter)
        .with_trace_config(trace_config)
        .install_batch(runtime::Tokio)
        .map_err(|err| format!("otel_install_failed: {err}"))?;

    global::set_text_map_propagator(TraceContextPropagator::new());
    let tracer = provider.tracer(SERVICE_NAME);
    global::set_tracer_provider(provider);
    Ok(tracer)
}

/// Custom client only when TLS settings differ from the defaults.
fn otel_http_client(config: &OtelConfig) -> Result<Option<reqwest::Client>, String> {
    let insecure = config.insecure.unwrap_or(false);
    if insecure && !env_flag("ACTLOG_TRACING_OTEL_ALLOW_INSECURE") {
        return Err("otel_insecure_not_allowed".to_string());
    }
    if !insecure && config.ca_file.is_none() {
        return Ok(None);
    }

    let mut builder = reqwest::Client::builder().danger_accept_invalid_certs(insecure);
    if let Some(path) = config.ca_file.as_deref() {
        let pem = fs::read(path).map_err(|err| format!("otel_ca_read_failed: {err}"))?;
        let cert =
            reqwest::Certificate::from_pem(&pem).map_err(|err| format!("otel_ca_invalid: {err}"))?;
        builder = builder.add_root_certificate(cert);
    }
    builder
        .build()
        .map(Some)
        .map_err(|err| format!("otel_http_client_failed: {err}"))
}

fn sampling_ratio(configured: Option<f64>) -> f64 {
    match configured {
        Some(ratio) if (0.0..=1.0).contains(&ratio) => ratio,
        Some(ratio) => {
            eprintln!("otel_sampling_ratio_invalid: {ratio} is outside 0..=1, sampling everything");
            1.0
        }
        None => 1.0,
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name).is_ok_and(|value| {
        matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(event = "shutdown_signal_failed", signal = "SIGINT", error = %err);
            std::future::pending::<()>().await;
        }
    };
    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!(event = "shutdown_signal_failed", signal = "SIGTERM", error = %err);
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!(event = "shutdown_signal_received", "Shutdown signal received");
}
