//! Tracing spans around connector operations, plus the Prometheus
//! recorder install.
//!
//! `Telemetry` is an explicit value constructed at startup and stored in
//! app state, not a process-wide singleton. Spans are `tracing` spans; when
//! an OpenTelemetry layer is attached to the subscriber, the `otel.*`
//! fields map onto the exported span name and status.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::fmt::Display;
use std::future::Future;
use tracing::field::Empty;
use tracing::Instrument;

/// Span factory for user-visible connector operations.
#[derive(Debug, Clone, Default)]
pub struct Telemetry;

impl Telemetry {
    pub fn new() -> Self {
        Telemetry
    }

    /// Run `fut` inside a span named after the operation.
    ///
    /// The span carries `internal.visibility = "user"` and ends with
    /// `otel.status_code` OK or ERROR depending on the outcome. Termination
    /// is guaranteed by span drop, so every exit path (including panics
    /// unwinding through the future) closes the span.
    pub async fn with_active_span<F, T, E>(&self, name: &'static str, fut: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        let span = tracing::info_span!(
            "connector.operation",
            otel.name = name,
            internal.visibility = "user",
            otel.status_code = Empty,
            exception.message = Empty,
        );
        let result = fut.instrument(span.clone()).await;
        match &result {
            Ok(_) => {
                span.record("otel.status_code", "OK");
            }
            Err(err) => {
                span.record("otel.status_code", "ERROR");
                span.record("exception.message", tracing::field::display(err));
            }
        }
        result
    }
}

/// Mark the current span failed. Used by the failure boundary for errors
/// that surface outside [`Telemetry::with_active_span`]; recording on a
/// span without these fields is a no-op.
pub fn record_error(err: &dyn Display) {
    let span = tracing::Span::current();
    span.record("otel.status_code", "ERROR");
    span.record("exception.message", tracing::field::display(err));
}

/// Install the process-wide Prometheus recorder behind the `metrics`
/// facade. The returned handle renders the scrape body for `GET /metrics`.
pub fn install_metrics_recorder() -> anyhow::Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics recorder: {}", e))
}
