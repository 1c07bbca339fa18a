//! Logging Infrastructure
//!
//! Console output plus optional daily rotating files:
//! - `app/` application logs, removed after the retention period
//! - `audit/` payment and admin events (target `"audit"`), kept

use std::fs;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Days application logs are kept by [`cleanup_old_logs`]
pub const APP_LOG_RETENTION_DAYS: i64 = 14;

/// Target that routes events into the permanent audit files
pub const AUDIT_TARGET: &str = "audit";

/// Delete `app-YYYY-MM-DD*` files older than `retention_days`
///
/// Returns how many files were removed.
pub fn cleanup_old_logs(log_dir: &Path, retention_days: i64) -> anyhow::Result<usize> {
    let app_log_dir = log_dir.join("app");
    if !app_log_dir.exists() {
        return Ok(0);
    }

    let cutoff = chrono::Local::now().date_naive() - chrono::Duration::days(retention_days);
    let mut removed = 0;

    for entry in fs::read_dir(app_log_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        // RollingFileAppender names files `app.YYYY-MM-DD`
        let Some(date_part) = name.strip_prefix("app.").or_else(|| name.strip_prefix("app-"))
        else {
            continue;
        };
        let date_part = date_part.get(..10).unwrap_or(date_part);
        if let Ok(date) = chrono::NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            && date < cutoff
        {
            fs::remove_file(&path)?;
            removed += 1;
            tracing::info!(file = %name, "Deleted old log file");
        }
    }

    Ok(removed)
}

/// Initialize the logging system
///
/// # Arguments
/// * `level` - default filter when `RUST_LOG` is unset (e.g. "info")
/// * `json_format` - JSON lines instead of the human format
/// * `log_dir` - also write rotating files under this directory
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&Path>,
) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    let mut layers = vec![console_layer];

    if let Some(log_dir) = log_dir {
        let app_log_dir = log_dir.join("app");
        let audit_log_dir = log_dir.join("audit");
        fs::create_dir_all(&app_log_dir)?;
        fs::create_dir_all(&audit_log_dir)?;

        let app_log = RollingFileAppender::new(Rotation::DAILY, app_log_dir, "app");
        let app_layer = fmt::layer()
            .with_target(true)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(app_log))
            .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
                meta.target() != AUDIT_TARGET
            }))
            .boxed();

        let audit_log = RollingFileAppender::new(Rotation::DAILY, audit_log_dir, "audit");
        let audit_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_writer(std::sync::Mutex::new(audit_log))
            .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
                meta.target() == AUDIT_TARGET
            }))
            .boxed();

        layers.push(app_layer);
        layers.push(audit_layer);

        if let Err(e) = cleanup_old_logs(log_dir, APP_LOG_RETENTION_DAYS) {
            eprintln!("Failed to clean up old logs: {e}");
        }
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {e}"))
}

/// Console-only logging
pub fn init_logger(level: &str, json_format: bool) -> anyhow::Result<()> {
    init_logger_with_file(level, json_format, None)
}
