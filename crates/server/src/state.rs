use crate::config::ServerConfig;
use crate::error::ServerResult;
use metrics_exporter_prometheus::PrometheusHandle;
use qrbot::{BotApi, HttpProbe, Pipeline, Probe, ReplySender};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Message pipeline (shared across requests)
    pub pipeline: Pipeline,

    /// Prometheus handle, present when metrics are enabled
    pub metrics: Option<PrometheusHandle>,
}

impl ServerState {
    /// Create new server state backed by the live Bot API and HTTP probe
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        config.validate()?;

        let probe: Arc<dyn Probe> = Arc::new(HttpProbe::new(&config.probe)?);
        let sender: Arc<dyn ReplySender> = Arc::new(BotApi::new(&config.bot_api_config())?);

        Ok(Self::with_components(config, probe, sender))
    }

    /// Create server state around caller-supplied probe and sender
    pub fn with_components(
        config: ServerConfig,
        probe: Arc<dyn Probe>,
        sender: Arc<dyn ReplySender>,
    ) -> Self {
        let metrics = if config.metrics_enabled {
            crate::metrics::install()
        } else {
            None
        };
        let pipeline = Pipeline::new(probe, sender, config.qr.clone());

        Self {
            config: Arc::new(config),
            pipeline,
            metrics,
        }
    }
}

/// Server metadata for health checks
#[derive(Debug, serde::Serialize)]
pub struct ServerMetadata {
    pub version: String,
    pub uptime_seconds: u64,
}
