//! Telemetry setup for OpenTelemetry integration
//!
//! # Environment Variables
//!
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP endpoint (e.g., http://localhost:4317)
//! - `OTEL_SERVICE_NAME`: Service name (default: walkin-queue)

use anyhow::Result;
use tracing_subscriber::{Layer, Registry};

pub type OtelLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Build the OpenTelemetry layer when an endpoint is configured
pub fn otel_layer() -> Result<Option<OtelLayer>> {
    if std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").is_err() {
        return Ok(None);
    }

    #[cfg(feature = "telemetry")]
    {
        Ok(Some(otel_layer_impl()?))
    }

    #[cfg(not(feature = "telemetry"))]
    {
        Err(anyhow::anyhow!(
            "OpenTelemetry endpoint set but feature 'telemetry' not enabled (rebuild with --features telemetry)"
        ))
    }
}

#[cfg(feature = "telemetry")]
fn otel_layer_impl() -> Result<OtelLayer> {
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry::KeyValue;
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::{runtime, trace::TracerProvider, Resource};

    let service_name =
        std::env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| "walkin-queue".to_string());
    let endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")?;

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;

    let provider = TracerProvider::builder()
        .with_batch_exporter(exporter, runtime::Tokio)
        .with_resource(Resource::new(vec![KeyValue::new(
            "service.name",
            service_name.clone(),
        )]))
        .build();

    let tracer = provider.tracer(service_name);
    opentelemetry::global::set_tracer_provider(provider);

    Ok(Box::new(tracing_opentelemetry::layer().with_tracer(tracer)))
}
