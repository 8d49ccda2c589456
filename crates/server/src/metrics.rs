//! Prometheus export of pipeline and webhook counters.
//!
//! The recorder is process-global, so it is installed at most once; every
//! later call hands back the same handle.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use qrbot::{DeliveryError, PipelineError, PipelineMetrics, ReplyKind, UrlRejection};

static PROMETHEUS: OnceLock<Option<PrometheusHandle>> = OnceLock::new();

/// Install the Prometheus recorder and route pipeline metrics into it.
///
/// Returns `None` when another recorder already owns the process.
pub fn install() -> Option<PrometheusHandle> {
    PROMETHEUS
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                qrbot::set_pipeline_metrics(Some(Arc::new(PrometheusPipelineMetrics)));
                Some(handle)
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to install prometheus recorder");
                None
            }
        })
        .clone()
}

/// Count one webhook update by how it ended.
pub fn record_update(result: &'static str) {
    counter!("qrbot_updates_total", "result" => result).increment(1);
}

/// Forwards pipeline stage timings to the `metrics` facade.
#[derive(Debug, Default)]
pub struct PrometheusPipelineMetrics;

impl PipelineMetrics for PrometheusPipelineMetrics {
    fn record_normalize(&self, latency: Duration, result: Result<(), &UrlRejection>) {
        let outcome = match result {
            Ok(()) => "accepted",
            Err(UrlRejection::HostEmpty) => "host_empty",
            Err(UrlRejection::SchemeNotAllowed { .. }) => "scheme_not_allowed",
            Err(UrlRejection::Unreachable) => "unreachable",
        };
        counter!("qrbot_normalize_total", "outcome" => outcome).increment(1);
        histogram!("qrbot_normalize_seconds").record(latency.as_secs_f64());
    }

    fn record_render(&self, latency: Duration, result: Result<(), &PipelineError>) {
        let outcome = if result.is_ok() { "ok" } else { "error" };
        counter!("qrbot_render_total", "outcome" => outcome).increment(1);
        histogram!("qrbot_render_seconds").record(latency.as_secs_f64());
    }

    fn record_delivery(
        &self,
        kind: ReplyKind,
        latency: Duration,
        result: Result<(), &DeliveryError>,
    ) {
        let outcome = if result.is_ok() { "ok" } else { "error" };
        counter!("qrbot_delivery_total", "kind" => kind.as_str(), "outcome" => outcome)
            .increment(1);
        histogram!("qrbot_delivery_seconds", "kind" => kind.as_str())
            .record(latency.as_secs_f64());
    }
}
