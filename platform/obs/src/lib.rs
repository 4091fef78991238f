use anyhow::{Result, anyhow};
use once_cell::sync::OnceCell;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, SpanExporter, WithExportConfig};
use opentelemetry_sdk::{self as sdk, Resource};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: OnceCell<()> = OnceCell::new();

const DEFAULT_FILTER: &str = "info,tower_http=warn,sqlx=warn";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

/// Configuration for tracing initialization.
#[derive(Clone, Debug)]
pub struct ObsConfig {
    pub service_name: &'static str,
    pub env_filter: Option<String>,
    pub otlp_endpoint: Option<String>,
    pub format: LogFormat,
}

impl Default for ObsConfig {
    fn default() -> Self {
        Self {
            service_name: "employees-server",
            env_filter: None,
            otlp_endpoint: None,
            format: LogFormat::Text,
        }
    }
}

impl ObsConfig {
    /// Reads `RUST_LOG`, `OTLP_ENDPOINT` and `LOG_FORMAT`.
    pub fn from_env() -> Self {
        Self {
            env_filter: std::env::var("RUST_LOG").ok(),
            otlp_endpoint: std::env::var("OTLP_ENDPOINT").ok(),
            format: std::env::var("LOG_FORMAT")
                .map(|raw| LogFormat::parse(&raw))
                .unwrap_or_default(),
            ..Self::default()
        }
    }

    fn filter(&self) -> &str {
        self.env_filter.as_deref().unwrap_or(DEFAULT_FILTER)
    }
}

/// Install tracing subscribers with an optional OTLP exporter. Safe to call twice.
pub fn init_tracing(config: ObsConfig) -> Result<()> {
    if INIT.get().is_some() {
        return Ok(());
    }

    let env_filter = EnvFilter::try_new(config.filter())?;
    let fmt_layer = match config.format {
        LogFormat::Text => tracing_subscriber::fmt::layer().with_target(false).boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer().json().boxed(),
    };
    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer);

    if let Some(endpoint) = config.otlp_endpoint.clone() {
        let exporter = SpanExporter::builder()
            .with_http()
            .with_protocol(Protocol::HttpBinary)
            .with_endpoint(endpoint)
            .build()?;

        let resource = Resource::builder()
            .with_service_name(config.service_name)
            .build();

        let provider = sdk::trace::SdkTracerProvider::builder()
            .with_resource(resource)
            .with_batch_exporter(exporter)
            .build();
        let tracer = provider.tracer(config.service_name);

        registry
            .with(tracing_opentelemetry::layer().with_tracer(tracer))
            .try_init()?;
    } else {
        registry.try_init()?;
    }

    INIT.set(())
        .map_err(|_| anyhow!("tracing already initialized"))?;
    tracing::debug!(service = config.service_name, "tracing initialized");
    Ok(())
}
