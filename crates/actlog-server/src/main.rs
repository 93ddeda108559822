#![allow(clippy::pedantic)]
#![allow(clippy::nursery)]
#![deny(clippy::unwrap_used)]

use actlog_db::migrate;
use actlog_server::{bootstrap, cli, http, settings};

#[tokio::main]
async fn main() {
    let run_mode = cli::parse_args();
    if let cli::RunMode::OpenApi { out } = run_mode.clone() {
        let spec = http::openapi::build_openapi();
        let json = match serde_json::to_string_pretty(&spec) {
            Ok(json) => json,
            Err(err) => {
                eprintln!("failed to serialize openapi spec: {err}");
                std::process::exit(1);
            }
        };
        if let Some(path) = out {
            if let Err(err) = std::fs::write(&path, json) {
                eprintln!("failed to write openapi spec: {err}");
                std::process::exit(1);
            }
        } else {
            println!("{json}");
        }
        return;
    }

    let settings = match run_mode {
        cli::RunMode::Migrate => settings::Settings::from_env_with_options(false),
        _ => settings::Settings::from_env(),
    };
    let sentry_guard = bootstrap::init_sentry(&settings);
    let otel_guard = bootstrap::init_tracing(sentry_guard.is_some(), &settings);
    let metrics_config = settings.config.metrics.clone();
    if matches!(run_mode, cli::RunMode::Server) {
        if let Err(missing) = settings::preflight(&settings) {
            tracing::error!(
                event = "preflight_failed",
                missing = ?missing,
                "Required configuration missing"
            );
            std::process::exit(1);
        }
    }
    bootstrap::log_startup(&settings, &metrics_config);
    bootstrap::init_metrics_registry(&metrics_config);

    let pool = match bootstrap::connect_db(&settings).await {
        Ok(pool) => pool,
        Err(err) => {
            tracing::error!(event = "db_connect_failed", error = %err);
            std::process::exit(1);
        }
    };
    if matches!(run_mode, cli::RunMode::Migrate) {
        if let Err(err) = migrate(&pool).await {
            tracing::error!(event = "migration_failed", error = %err);
            std::process::exit(1);
        }
        tracing::info!(event = "migrations_applied", "migrations applied");
        return;
    }

    let state = bootstrap::build_state(&settings, pool);
    let app = bootstrap::build_app(&metrics_config, state);
    bootstrap::serve(&settings, app).await;

    drop(otel_guard);
    drop(sentry_guard);
}
