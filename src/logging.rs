//! Structured logging with tracing.
//!
//! The subscriber honours `RUST_LOG` and falls back to `info`. `LOG_FORMAT=json`
//! switches to one JSON object per line.

use crate::config::LogFormat;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::{Request, Response};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

const DEFAULT_FILTER: &str = "info";

/// Installs the global subscriber. Returns `false` if one was already set,
/// which happens when several tests build the application in one process.
pub fn init(format: LogFormat) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let registry = Registry::default().with(filter);

    let installed = match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(true).with_current_span(false))
            .try_init(),
        LogFormat::Pretty => registry.with(fmt::layer().with_target(true)).try_init(),
    };

    if installed.is_ok() {
        info!(?format, "logging initialized");
    }
    installed.is_ok()
}

/// Emits one event per response: method, path, status.
pub struct RequestLogger;

#[rocket::async_trait]
impl Fairing for RequestLogger {
    fn info(&self) -> Info {
        Info {
            name: "Request Logger",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, request: &'r Request<'_>, response: &mut Response<'r>) {
        info!(
            method = %request.method(),
            path = %request.uri().path(),
            status = response.status().code,
            "request completed"
        );
    }
}
