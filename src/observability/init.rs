//! Tracing initialization and subscriber setup.
//!
//! Wires `tracing` macros through `tracing-opentelemetry` into an OpenTelemetry
//! tracer provider whose exporter appends OTLP JSON lines to a rotating file.

use super::exporter;
use super::file_writer::RotationPolicy;
use crate::infrastructure::{expand_tilde, get_data_dir};
use crate::Config;
use opentelemetry::trace::{TraceResult, TracerProvider as _};
use opentelemetry::KeyValue;
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use std::path::PathBuf;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// File name of the trace output inside the trace directory.
pub const TRACE_FILE_NAME: &str = "catalog-browser-otlp.json";

const SERVICE_NAME: &str = "catalog-browser";

/// Keeps the tracer provider alive. Spans stop being exported once it is shut
/// down.
#[must_use = "dropping the guard without shutdown() may lose buffered spans"]
#[derive(Debug)]
pub struct TracingGuard {
    provider: TracerProvider,
    trace_file: PathBuf,
}

impl TracingGuard {
    /// Where spans are being written.
    #[must_use]
    pub fn trace_file(&self) -> &std::path::Path {
        &self.trace_file
    }

    /// Flushes pending spans and shuts the provider down.
    ///
    /// # Errors
    ///
    /// Returns the first flush failure, or the shutdown failure.
    pub fn shutdown(self) -> TraceResult<()> {
        let flushed = self.provider.force_flush().into_iter().collect::<TraceResult<Vec<()>>>();
        let closed = self.provider.shutdown();
        flushed.and(closed)
    }
}

/// Directory the trace file goes into: `trace_dir` from the config, else the
/// platform data directory.
#[must_use]
pub fn trace_dir(config: &Config) -> PathBuf {
    config
        .trace_dir
        .as_deref()
        .map_or_else(get_data_dir, expand_tilde)
}

/// Filter directives: `RUST_LOG` wins over `trace_level`, which wins over `"info"`.
fn filter_directives(config: &Config, rust_log: Option<String>) -> String {
    rust_log
        .filter(|s| !s.trim().is_empty())
        .or_else(|| config.trace_level.clone())
        .unwrap_or_else(|| "info".to_string())
}

/// Installs the global subscriber with file-based OTLP export.
///
/// Returns `None` when the trace directory cannot be created or a global
/// subscriber is already installed. Observability is optional, so neither
/// case is an error for the caller.
///
/// ```no_run
/// use catalog_browser::observability::init_tracing;
/// use catalog_browser::Config;
///
/// let guard = init_tracing(&Config::default());
/// tracing::info!("browser started");
/// if let Some(guard) = guard {
///     let _ = guard.shutdown();
/// }
/// ```
pub fn init_tracing(config: &Config) -> Option<TracingGuard> {
    let level = filter_directives(config, std::env::var("RUST_LOG").ok());

    let dir = trace_dir(config);
    if std::fs::create_dir_all(&dir).is_err() {
        return None;
    }

    let resource = Resource::new(vec![KeyValue::new("service.name", SERVICE_NAME)]);
    let trace_file = dir.join(TRACE_FILE_NAME);
    let provider = exporter::tracer_provider(trace_file.clone(), resource, RotationPolicy::default());

    let otel_layer = OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME));
    let installed = tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(otel_layer)
        .try_init();

    if installed.is_err() {
        let _ = provider.shutdown();
        return None;
    }
    Some(TracingGuard { provider, trace_file })
}
