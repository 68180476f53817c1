//! Structured logging for the distributor.
//!
//! Log targets:
//! - `assignment`: planning, pool warnings, run summaries and request errors
//! - `distributor`: service lifecycle, config loading, calls to the exam backend
//! - `tower_http`: one span per HTTP request (method, path, status, latency)
//!
//! `LOG_LEVEL` takes a full `EnvFilter` directive string and replaces `DEFAULT_DIRECTIVES`.
//! `LOG_FORMAT=json` switches to one JSON object per line for log shippers.

use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str = "info,assignment=debug,distributor=debug,tower_http=info,axum=info";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
    let format = LogFormat::parse(std::env::var("LOG_FORMAT").ok().as_deref());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}
