use env_logger::{Builder, Target};
use log::{Level, LevelFilter};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use std::env;
use std::io::Write;

pub fn parse_level(value: &str) -> LevelFilter {
    match value.to_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Initialize env_logger. Safe to call more than once; later calls are
/// no-ops.
pub fn init_logging() {
    let log_level = parse_level(&env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()));

    let mut builder = Builder::from_default_env();

    builder.format(|buf, record| {
        let timestamp = buf.timestamp();
        let target = record.target();
        match record.level() {
            Level::Info => writeln!(buf, "{} [INFO] [{}]: {}", timestamp, target, record.args()),
            level => writeln!(
                buf,
                "{} [{}] [{}:{}] {}: {}",
                timestamp,
                level,
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                target,
                record.args()
            ),
        }
    });

    // Filter out noisy modules in production
    if env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string()) == "production" {
        builder.filter_module("reqwest", LevelFilter::Warn);
        builder.filter_module("hyper", LevelFilter::Warn);
        builder.filter_module("wgpu_core", LevelFilter::Warn);
        builder.filter_module("iced_wgpu", LevelFilter::Warn);
    }

    let _ = builder.filter_level(log_level).target(Target::Stdout).try_init();
}

/// Diagnostic for a non-success HTTP response.
pub fn log_api_error(status: StatusCode, body: &str, headers: &HeaderMap) {
    log::error!(
        "API Error: status={} data={} headers={:?}",
        status.as_u16(),
        body,
        headers
    );
}

pub fn log_network_error(operation: &str, error: &dyn std::error::Error) {
    log::error!("[Network] {} failed, no response: {}", operation, error);
}

pub fn log_habit_fetch(habit_count: usize, duration_ms: u64) {
    log::info!("[Habits] Fetched {} habits in {}ms", habit_count, duration_ms);
}

pub fn log_auth_event(event: &str) {
    log::info!("[Auth] {}", event);
}
