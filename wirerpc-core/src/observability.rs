//! Logging and OpenTelemetry setup
//!
//! The library itself only emits `tracing` events (rejected inbound messages
//! at `debug`, codec spans at `trace`) and OpenTelemetry counters (see
//! [`metrics`](crate::metrics)). This module lets an application route them
//! somewhere: a local `fmt` subscriber, optionally bridged to an OTLP
//! collector for traces and metrics.
//!
//! # Usage Pattern
//!
//! ```rust,no_run
//! use wirerpc_core::ObservabilityConfig;
//!
//! fn main() {
//!     let config = ObservabilityConfig::new("billing-gateway")
//!         .with_endpoint("http://localhost:4317")
//!         .with_log_level("debug");
//!
//!     wirerpc_core::init_observability(config).expect("Failed to init observability");
//!
//!     // ... encode and decode messages ...
//!
//!     wirerpc_core::shutdown_observability();
//! }
//! ```
//!
//! # Environment Variables
//!
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: collector endpoint
//! - `RUST_LOG`: log level filter (e.g. "info", "wirerpc_core=debug")

use opentelemetry::{global, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;
use opentelemetry_semantic_conventions::resource::{SERVICE_NAME, SERVICE_VERSION};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const METRIC_EXPORT_INTERVAL: Duration = Duration::from_secs(30);

/// Observability configuration
///
/// # Defaults
///
/// - Service name: "wirerpc"
/// - Service version: the crate version
/// - OTLP endpoint: `$OTEL_EXPORTER_OTLP_ENDPOINT` or "http://localhost:4317"
/// - Traces and metrics export: disabled
/// - Log level: `$RUST_LOG` or "info"
/// - Log format: JSON
///
/// # Examples
///
/// ```rust
/// use wirerpc_core::ObservabilityConfig;
///
/// let config = ObservabilityConfig::new("my-api-server")
///     .with_endpoint("http://collector:4317")
///     .with_traces(true)
///     .with_json(false);
/// assert!(config.enable_traces);
/// ```
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Service name attached to exported traces and metrics
    pub service_name: String,

    /// Service version attached to exported traces and metrics
    pub service_version: String,

    /// OTLP gRPC endpoint of the collector
    pub otlp_endpoint: String,

    /// Export spans over OTLP
    pub enable_traces: bool,

    /// Export metrics over OTLP
    pub enable_metrics: bool,

    /// Log level filter, used when `RUST_LOG` is unset
    pub log_level: String,

    /// Emit logs as JSON lines instead of human-readable text
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: "wirerpc".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            otlp_endpoint: std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:4317".to_string()),
            enable_traces: false,
            enable_metrics: false,
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            json_logs: true,
        }
    }
}

impl ObservabilityConfig {
    /// Create a configuration with a custom service name
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Default::default()
        }
    }

    /// Set the OTLP collector endpoint (e.g. "http://collector:4317")
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.otlp_endpoint = endpoint.into();
        self
    }

    /// Set the log level filter ("error", "warn", "info", "debug", "trace")
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set the service version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.service_version = version.into();
        self
    }

    /// Enable or disable span export
    pub fn with_traces(mut self, enable: bool) -> Self {
        self.enable_traces = enable;
        self
    }

    /// Enable or disable metrics export
    pub fn with_metrics(mut self, enable: bool) -> Self {
        self.enable_metrics = enable;
        self
    }

    /// Choose JSON (true) or human-readable (false) log output
    pub fn with_json(mut self, json: bool) -> Self {
        self.json_logs = json;
        self
    }

    fn resource(&self) -> Resource {
        let attributes = [
            KeyValue::new(SERVICE_NAME, self.service_name.clone()),
            KeyValue::new(SERVICE_VERSION, self.service_version.clone()),
        ];
        Resource::builder_empty().with_attributes(attributes).build()
    }
}

/// Install the global subscriber and, if enabled, the OTLP providers
///
/// Call once at startup, before encoding or decoding messages, so the codec
/// counters bind to the configured meter provider. When traces or metrics
/// export is enabled this must run inside a Tokio runtime.
///
/// The providers only become global once the subscriber is installed. If
/// this call fails, nothing global has changed.
///
/// # Errors
///
/// - the log level is not a valid filter directive
/// - an OTLP exporter cannot be built
/// - a global subscriber is already installed
pub fn init_observability(config: ObservabilityConfig) -> Result<(), BoxError> {
    let providers = ExportProviders::from_config(&config)?;
    let tracer = providers.tracer(&config.service_name);

    init_tracing_subscriber(&config, tracer)?;
    providers.install();

    tracing::info!(
        service_name = %config.service_name,
        otlp_endpoint = %config.otlp_endpoint,
        traces = config.enable_traces,
        metrics = config.enable_metrics,
        "Observability initialized"
    );

    Ok(())
}

/// Flush and stop the OTLP providers installed by [`init_observability`]
///
/// Pending spans and the metrics recorded since the last periodic export are
/// sent before this returns. Export failures are logged, not returned. Later
/// calls, or calls without export enabled, do nothing besides logging.
pub fn shutdown_observability() {
    tracing::info!("Shutting down observability");

    let providers = installed_providers().take();
    if let Some(providers) = providers {
        providers.shutdown();
    }
}

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// OTLP providers owned by this module until shutdown
struct ExportProviders {
    tracer: Option<SdkTracerProvider>,
    meter: Option<SdkMeterProvider>,
}

impl ExportProviders {
    fn from_config(config: &ObservabilityConfig) -> Result<Self, BoxError> {
        let tracer = if config.enable_traces {
            Some(span_pipeline(config)?)
        } else {
            None
        };
        let meter = if config.enable_metrics {
            Some(metric_pipeline(config)?)
        } else {
            None
        };
        Ok(Self { tracer, meter })
    }

    fn tracer(&self, service_name: &str) -> Option<opentelemetry_sdk::trace::Tracer> {
        use opentelemetry::trace::TracerProvider as _;

        self.tracer
            .as_ref()
            .map(|provider| provider.tracer(service_name.to_string()))
    }

    /// Make the providers global and keep handles for shutdown
    fn install(self) {
        if let Some(provider) = &self.tracer {
            global::set_tracer_provider(provider.clone());
        }
        if let Some(provider) = &self.meter {
            global::set_meter_provider(provider.clone());
        }
        if self.tracer.is_some() || self.meter.is_some() {
            *installed_providers() = Some(self);
        }
    }

    fn shutdown(self) {
        if let Some(provider) = self.tracer {
            if let Err(e) = provider.shutdown() {
                tracing::warn!(error = %e, "span provider shutdown failed");
            }
        }
        if let Some(provider) = self.meter {
            if let Err(e) = provider.shutdown() {
                tracing::warn!(error = %e, "meter provider shutdown failed");
            }
        }
    }
}

fn installed_providers() -> MutexGuard<'static, Option<ExportProviders>> {
    static INSTALLED: OnceLock<Mutex<Option<ExportProviders>>> = OnceLock::new();
    INSTALLED
        .get_or_init(Mutex::default)
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

fn span_pipeline(config: &ObservabilityConfig) -> Result<SdkTracerProvider, BoxError> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(config.otlp_endpoint.as_str())
        .build()?;

    Ok(SdkTracerProvider::builder()
        .with_resource(config.resource())
        .with_batch_exporter(exporter)
        .build())
}

fn metric_pipeline(config: &ObservabilityConfig) -> Result<SdkMeterProvider, BoxError> {
    let exporter = opentelemetry_otlp::MetricExporter::builder()
        .with_tonic()
        .with_endpoint(config.otlp_endpoint.as_str())
        .build()?;

    let reader = PeriodicReader::builder(exporter)
        .with_interval(METRIC_EXPORT_INTERVAL)
        .build();

    Ok(SdkMeterProvider::builder()
        .with_resource(config.resource())
        .with_reader(reader)
        .build())
}

fn init_tracing_subscriber(
    config: &ObservabilityConfig,
    tracer: Option<opentelemetry_sdk::trace::Tracer>,
) -> Result<(), BoxError> {
    // RUST_LOG wins over the configured level
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.log_level))?;

    let otel = tracer.map(|tracer| tracing_opentelemetry::layer().with_tracer(tracer));

    // each fmt layer is built separately: they sit at different depths of the stack
    let (json, text) = if config.json_logs {
        let json = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_line_number(true)
            .with_thread_ids(true)
            .json();
        (Some(json), None)
    } else {
        let text = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_line_number(true);
        (None, Some(text))
    };

    tracing_subscriber::registry()
        .with(otel)
        .with(filter)
        .with(json)
        .with(text)
        .try_init()?;

    Ok(())
}
