//! Process-wide tracing setup.
//!
//! Installs a JSON `fmt` layer filtered by `RUST_LOG` and, when enabled, an
//! OpenTelemetry layer exporting spans over OTLP/HTTP. The exporter honours
//! the standard `OTEL_EXPORTER_OTLP_*` environment variables. W3C trace
//! context and baggage propagators are registered globally so the
//! [`Trace`](crate::middleware::Trace) middleware can continue incoming
//! traces.

use opentelemetry::global;
use opentelemetry::propagation::TextMapCompositePropagator;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::SpanExporter;
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::propagation::{BaggagePropagator, TraceContextPropagator};
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing::warn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_FILTER: &str = "info";

/// Options for [`init_telemetry`].
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    service_name: String,
    otlp_enabled: bool,
}

impl TelemetryConfig {
    /// Build a configuration for `service_name`.
    #[must_use]
    pub fn new(service_name: impl Into<String>, otlp_enabled: bool) -> Self {
        Self {
            service_name: service_name.into(),
            otlp_enabled,
        }
    }

    /// Name reported as `service.name` on exported spans.
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Whether spans are exported over OTLP.
    #[must_use]
    pub const fn otlp_enabled(&self) -> bool {
        self.otlp_enabled
    }
}

/// Failures while installing the tracing pipeline.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The OTLP exporter could not be constructed.
    #[error("failed to build OTLP span exporter: {message}")]
    Exporter {
        /// Exporter error description.
        message: String,
    },
    /// A global subscriber was already installed.
    #[error("failed to install tracing subscriber: {message}")]
    Subscriber {
        /// Subscriber error description.
        message: String,
    },
}

/// Keeps the tracer provider alive and flushes it on shutdown.
#[derive(Debug, Default)]
pub struct TelemetryGuard {
    provider: Option<SdkTracerProvider>,
}

impl TelemetryGuard {
    /// Whether spans are being exported.
    #[must_use]
    pub const fn is_exporting(&self) -> bool {
        self.provider.is_some()
    }

    /// Flush pending spans and stop the exporter.
    pub fn shutdown(&mut self) {
        let Some(provider) = self.provider.take() else {
            return;
        };
        if let Err(error) = provider.shutdown() {
            warn!(%error, "tracer provider shutdown failed");
        }
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn build_provider(config: &TelemetryConfig) -> Result<SdkTracerProvider, TelemetryError> {
    let exporter = SpanExporter::builder()
        .with_http()
        .build()
        .map_err(|err| TelemetryError::Exporter {
            message: err.to_string(),
        })?;
    let resource = Resource::builder()
        .with_service_name(config.service_name.clone())
        .build();
    Ok(SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource)
        .build())
}

/// Register the W3C trace context and baggage propagators globally.
pub fn install_propagator() {
    global::set_text_map_propagator(TextMapCompositePropagator::new(vec![
        Box::new(TraceContextPropagator::new()),
        Box::new(BaggagePropagator::new()),
    ]));
}

/// Install the global subscriber and, if enabled, the OTLP pipeline.
///
/// Call this outside any async runtime: the OTLP/HTTP exporter uses a
/// blocking client on the batch processor's own thread.
///
/// # Errors
/// Returns [`TelemetryError`] when the exporter cannot be built or a global
/// subscriber is already set.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    install_propagator();

    let provider = if config.otlp_enabled {
        Some(build_provider(config)?)
    } else {
        None
    };
    let otel_layer = provider.as_ref().map(|provider| {
        let tracer = provider.tracer(config.service_name.clone());
        tracing_opentelemetry::layer().with_tracer(tracer)
    });
    if let Some(provider) = &provider {
        global::set_tracer_provider(provider.clone());
    }

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().json())
        .with(otel_layer)
        .try_init()
        .map_err(|err| TelemetryError::Subscriber {
            message: err.to_string(),
        })?;

    Ok(TelemetryGuard { provider })
}

#[cfg(test)]
mod tests {
    //! Unit tests for telemetry configuration.

    use super::*;
    use rstest::rstest;

    #[rstest]
    fn config_exposes_its_values() {
        let config = TelemetryConfig::new("my-server", false);
        assert_eq!(config.service_name(), "my-server");
        assert!(!config.otlp_enabled());
    }

    #[rstest]
    fn empty_guard_shuts_down_quietly() {
        let mut guard = TelemetryGuard::default();
        assert!(!guard.is_exporting());
        guard.shutdown();
        guard.shutdown();
    }

    #[rstest]
    fn provider_builds_without_a_collector() {
        let provider = build_provider(&TelemetryConfig::new("my-server", true))
            .expect("exporter builds lazily");
        let mut guard = TelemetryGuard {
            provider: Some(provider),
        };
        assert!(guard.is_exporting());
        guard.shutdown();
        assert!(!guard.is_exporting());
    }

    #[rstest]
    fn error_messages_name_the_stage() {
        let err = TelemetryError::Subscriber {
            message: "already set".into(),
        };
        assert_eq!(
            err.to_string(),
            "failed to install tracing subscriber: already set"
        );
    }
}
