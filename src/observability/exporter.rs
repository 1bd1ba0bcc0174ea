//! Span exporter writing OTLP JSON lines to a rotating file.

use super::file_writer::{RotatingFile, RotationPolicy};
use super::otlp_json;
use futures_util::future::BoxFuture;
use opentelemetry::trace::TraceError;
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use std::path::PathBuf;

/// Instrumentation scope recorded on every exported batch.
pub const SCOPE_NAME: &str = "catalog-browser";

/// Writes each exported batch as one OTLP JSON document per line.
pub struct OtlpFileExporter {
    writer: RotatingFile,
    resource: Resource,
    is_shutdown: bool,
}

impl OtlpFileExporter {
    #[must_use]
    pub const fn new(writer: RotatingFile, resource: Resource) -> Self {
        Self {
            writer,
            resource,
            is_shutdown: false,
        }
    }

    fn write_batch(&self, batch: &[SpanData]) -> ExportResult {
        if self.is_shutdown {
            return Err(TraceError::from("exporter is shut down"));
        }
        let document = otlp_json::encode_batch(&self.resource, SCOPE_NAME, batch);
        self.writer
            .write_line(&document.to_string())
            .map_err(|e| TraceError::from(e.to_string()))
    }
}

impl SpanExporter for OtlpFileExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        let result = self.write_batch(&batch);
        Box::pin(std::future::ready(result))
    }

    fn shutdown(&mut self) {
        self.is_shutdown = true;
    }

    fn set_resource(&mut self, resource: &Resource) {
        self.resource = resource.clone();
    }
}

impl std::fmt::Debug for OtlpFileExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OtlpFileExporter")
            .field("writer", &self.writer)
            .field("is_shutdown", &self.is_shutdown)
            .finish_non_exhaustive()
    }
}

/// Builds a provider that exports every finished span synchronously to
/// `file_path`.
#[must_use]
pub fn tracer_provider(file_path: PathBuf, resource: Resource, policy: RotationPolicy) -> TracerProvider {
    let exporter = OtlpFileExporter::new(RotatingFile::new(file_path, policy), resource.clone());

    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::FutureExt;
    use opentelemetry::KeyValue;

    fn exporter(dir: &tempfile::TempDir) -> OtlpFileExporter {
        let writer = RotatingFile::new(dir.path().join("otlp.json"), RotationPolicy::default());
        OtlpFileExporter::new(writer, Resource::new(vec![KeyValue::new("service.name", "test")]))
    }

    #[test]
    fn export_writes_one_line_per_batch() {
        let dir = tempfile::tempdir().unwrap();
        let mut exporter = exporter(&dir);

        exporter.export(Vec::new()).now_or_never().unwrap().unwrap();
        exporter.export(Vec::new()).now_or_never().unwrap().unwrap();

        let text = std::fs::read_to_string(dir.path().join("otlp.json")).unwrap();
        assert_eq!(text.lines().count(), 2);
        let doc: serde_json::Value = serde_json::from_str(text.lines().next().unwrap()).unwrap();
        assert_eq!(doc["resourceSpans"][0]["scopeSpans"][0]["scope"]["name"], SCOPE_NAME);
    }

    #[test]
    fn export_fails_after_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let mut exporter = exporter(&dir);

        exporter.shutdown();
        assert!(exporter.export(Vec::new()).now_or_never().unwrap().is_err());
        assert!(!dir.path().join("otlp.json").exists());
    }

    #[test]
    fn set_resource_replaces_attributes() {
        let dir = tempfile::tempdir().unwrap();
        let mut exporter = exporter(&dir);
        exporter.set_resource(&Resource::new(vec![KeyValue::new("service.name", "renamed")]));

        exporter.export(Vec::new()).now_or_never().unwrap().unwrap();
        let text = std::fs::read_to_string(dir.path().join("otlp.json")).unwrap();
        assert!(text.contains("renamed"));
    }
}
