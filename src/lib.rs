//! Workspace umbrella crate for qrbot.
//!
//! This crate stitches URL normalization, QR rendering and reply delivery
//! together so the HTTP layer can hand over a [`MessageContext`] and get a
//! single [`Outcome`] back.

pub mod commands;
mod pipeline;

pub use commands::{
    COMMAND_PREFIX, HELP_RESPONSE, INVALID_COMMAND_RESPONSE, dispatch_command, is_command,
};
pub use linkcheck::{
    ALLOWED_SCHEMES, AcceptedUrl, HttpProbe, Probe, ProbeConfig, ProbeError, SchemePolicy,
    Url, UrlRejection, extract_url,
};
pub use pipeline::{INVALID_URL_RESPONSE, Outcome, Pipeline};
pub use qrimage::{EcLevel, QrConfig, QrImage, QrImageError, render_to_tempfile};
pub use telegram::{
    BotApi, BotApiConfig, DEFAULT_API_URL, DeliveryError, EnvelopeError, MessageContext,
    ReplySender, Update, decode_update,
};

use std::error::Error;
use std::fmt;
use std::sync::{Arc, OnceLock, RwLock};
use std::time::{Duration, Instant};

/// Errors that stop a message from being answered.
///
/// URL rejections are not errors: they end in a normal text reply and are
/// reported through [`Outcome::Rejected`].
#[derive(Debug)]
pub enum PipelineError {
    QrImage(QrImageError),
    /// The blocking render task panicked or was cancelled.
    RenderTask(String),
    Delivery(DeliveryError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::QrImage(err) => write!(f, "qr image generation failed: {err}"),
            PipelineError::RenderTask(msg) => write!(f, "qr render task failed: {msg}"),
            PipelineError::Delivery(err) => write!(f, "reply delivery failed: {err}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PipelineError::QrImage(err) => Some(err),
            PipelineError::Delivery(err) => Some(err),
            PipelineError::RenderTask(_) => None,
        }
    }
}

impl From<QrImageError> for PipelineError {
    fn from(value: QrImageError) -> Self {
        PipelineError::QrImage(value)
    }
}

impl From<DeliveryError> for PipelineError {
    fn from(value: DeliveryError) -> Self {
        PipelineError::Delivery(value)
    }
}

/// Which Bot API call a delivery metric refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    Text,
    Photo,
}

impl ReplyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ReplyKind::Text => "text",
            ReplyKind::Photo => "photo",
        }
    }
}

/// Metrics observer for pipeline stages.
pub trait PipelineMetrics: Send + Sync {
    fn record_normalize(&self, latency: Duration, result: Result<(), &UrlRejection>);
    fn record_render(&self, latency: Duration, result: Result<(), &PipelineError>);
    fn record_delivery(
        &self,
        kind: ReplyKind,
        latency: Duration,
        result: Result<(), &DeliveryError>,
    );
}

/// Install or clear the global pipeline metrics recorder.
pub fn set_pipeline_metrics(recorder: Option<Arc<dyn PipelineMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn PipelineMetrics>>> {
    static METRICS: OnceLock<RwLock<Option<Arc<dyn PipelineMetrics>>>> = OnceLock::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

fn metrics_recorder() -> Option<Arc<dyn PipelineMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

pub(crate) struct MetricsSpan {
    recorder: Arc<dyn PipelineMetrics>,
    start: Instant,
}

impl MetricsSpan {
    pub(crate) fn start() -> Option<Self> {
        metrics_recorder().map(|recorder| Self {
            recorder,
            start: Instant::now(),
        })
    }

    pub(crate) fn record_normalize(self, result: Result<(), &UrlRejection>) {
        self.recorder.record_normalize(self.start.elapsed(), result);
    }

    pub(crate) fn record_render(self, result: Result<(), &PipelineError>) {
        self.recorder.record_render(self.start.elapsed(), result);
    }

    pub(crate) fn record_delivery(self, kind: ReplyKind, result: Result<(), &DeliveryError>) {
        self.recorder
            .record_delivery(kind, self.start.elapsed(), result);
    }
}
