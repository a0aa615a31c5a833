//! Subscriber installation

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::TracerProvider;
use std::sync::OnceLock;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

static TRACER_PROVIDER: OnceLock<TracerProvider> = OnceLock::new();

/// How the process-wide subscriber is assembled
#[derive(Debug, Clone)]
pub struct TelemetryOptions {
    /// Tracer name reported on exported spans
    pub service_name: String,
    /// Emit one JSON object per log line instead of human-readable text
    pub json_logs: bool,
}

impl Default for TelemetryOptions {
    fn default() -> Self {
        Self {
            service_name: crate::attributes::SYSTEM_NAME.to_string(),
            json_logs: false,
        }
    }
}

impl TelemetryOptions {
    pub fn new(service_name: Option<&str>, json_logs: bool) -> Self {
        Self {
            service_name: service_name
                .filter(|name| !name.is_empty())
                .unwrap_or(crate::attributes::SYSTEM_NAME)
                .to_string(),
            json_logs,
        }
    }
}

/// Install the global subscriber: OpenTelemetry layer, fmt layer and an `EnvFilter`
/// read from `RUST_LOG` (default `info`).
///
/// Returns `false` when a subscriber was already installed; the existing one is kept.
pub fn init_telemetry(options: &TelemetryOptions) -> bool {
    let provider = TRACER_PROVIDER.get_or_init(|| TracerProvider::builder().build());
    let tracer = provider.tracer(options.service_name.clone());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = options.json_logs.then(|| fmt::layer().json().with_current_span(true));
    let text = (!options.json_logs).then(|| fmt::layer().with_target(true).with_line_number(true));

    tracing_subscriber::registry()
        .with(tracing_opentelemetry::layer().with_tracer(tracer))
        .with(json)
        .with(text)
        .with(filter)
        .try_init()
        .is_ok()
}

/// The tracer provider created by [`init_telemetry`], if it has run
pub fn tracer_provider() -> Option<&'static TracerProvider> {
    TRACER_PROVIDER.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_fall_back_to_system_name() {
        assert_eq!(TelemetryOptions::new(None, false).service_name, "vgen");
        assert_eq!(TelemetryOptions::new(Some(""), true).service_name, "vgen");

        let options = TelemetryOptions::new(Some("vgen-staging"), true);
        assert_eq!(options.service_name, "vgen-staging");
        assert!(options.json_logs);
    }

    #[test]
    fn test_second_init_keeps_first_subscriber() {
        init_telemetry(&TelemetryOptions::new(Some("vgen-test"), true));
        assert!(tracer_provider().is_some());

        assert!(!init_telemetry(&TelemetryOptions::default()));
    }
}
