//! OpenTelemetry-based observability with file-based trace export.
//!
//! ```text
//! tracing macros → tracing-opentelemetry → TracerProvider → OtlpFileExporter → JSON lines
//! ```
//!
//! Spans land in `<data dir>/catalog-browser-otlp.json` (or `trace_dir` from
//! the config), one OTLP JSON document per exported batch. The file rotates at
//! 10 MB and keeps 3 backups.
//!
//! The level comes from `RUST_LOG`, then the `trace_level` config option, then
//! `"info"`.
//!
//! # Modules
//!
//! - [`init`]: subscriber setup and [`TracingGuard`]
//! - [`exporter`]: the `SpanExporter` and provider construction
//! - `otlp_json`: OTLP JSON encoding of span batches
//! - [`file_writer`]: size-rotated line writer

pub mod exporter;
pub mod file_writer;
pub mod init;
mod otlp_json;

pub use exporter::{tracer_provider, OtlpFileExporter};
pub use file_writer::{RotatingFile, RotationPolicy};
pub use init::{init_tracing, TracingGuard, TRACE_FILE_NAME};
