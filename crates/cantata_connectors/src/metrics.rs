//! Metrics for connector calls.
//!
//! OpenTelemetry instruments labeled by provider and connector style. With no
//! meter provider installed the global meter is a no-op.

use cantata_interface::ConnectorStyle;
use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram, Meter},
};
use std::sync::OnceLock;

static METRICS: OnceLock<ConnectorMetrics> = OnceLock::new();

/// Instruments shared by every connector adapter.
#[derive(Clone)]
pub struct ConnectorMetrics {
    /// Meter handle kept alive for metric instruments
    _meter: Meter,
    /// Completion requests sent to a backend
    pub requests: Counter<u64>,
    /// Requests the backend refused
    pub errors: Counter<u64>,
    /// Time until the backend handed back a chunk stream, in seconds
    pub duration: Histogram<f64>,
    /// Characters of prompt text sent
    pub prompt_chars: Counter<u64>,
}

impl ConnectorMetrics {
    fn init() -> Self {
        let meter = global::meter("cantata_connectors");

        Self {
            _meter: meter.clone(),
            requests: meter
                .u64_counter("cantata.connector.requests")
                .with_description("Completion requests sent to a backend")
                .build(),
            errors: meter
                .u64_counter("cantata.connector.errors")
                .with_description("Completion requests the backend refused")
                .build(),
            duration: meter
                .f64_histogram("cantata.connector.duration")
                .with_unit("seconds")
                .with_description("Time until the backend started streaming")
                .build(),
            prompt_chars: meter
                .u64_counter("cantata.connector.prompt_chars")
                .with_description("Characters of prompt text sent")
                .build(),
        }
    }

    /// Get the global connector metrics instance.
    pub fn get() -> &'static Self {
        METRICS.get_or_init(Self::init)
    }

    /// Record a request the backend accepted.
    pub fn record_request(
        &self,
        provider: &str,
        style: ConnectorStyle,
        prompt_chars: usize,
        duration_secs: f64,
    ) {
        let labels = &[
            KeyValue::new("provider", provider.to_string()),
            KeyValue::new("style", style.to_string()),
        ];
        self.requests.add(1, labels);
        self.prompt_chars.add(prompt_chars as u64, labels);
        self.duration.record(duration_secs, labels);
    }

    /// Record a request the backend refused.
    pub fn record_error(&self, provider: &str, style: ConnectorStyle, error_type: &str) {
        let labels = &[
            KeyValue::new("provider", provider.to_string()),
            KeyValue::new("style", style.to_string()),
            KeyValue::new("error_type", error_type.to_string()),
        ];
        self.errors.add(1, labels);
    }
}

impl Default for ConnectorMetrics {
    fn default() -> Self {
        Self::get().clone()
    }
}

/// Classify error type for metrics labeling.
///
/// Returns one of: "rate_limit", "auth", "network", "timeout", "invalid_request", "unknown"
pub fn classify_error(error: &dyn std::error::Error) -> &'static str {
    let message = error.to_string().to_lowercase();

    if message.contains("rate limit") || message.contains("429") {
        "rate_limit"
    } else if message.contains("auth") || message.contains("401") || message.contains("403") {
        "auth"
    } else if message.contains("network")
        || message.contains("connection")
        || message.contains("dns")
    {
        "network"
    } else if message.contains("timeout") {
        "timeout"
    } else if message.contains("400") || message.contains("invalid") {
        "invalid_request"
    } else {
        "unknown"
    }
}
