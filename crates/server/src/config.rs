use qrbot::{BotApiConfig, ProbeConfig, QrConfig};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use crate::error::{ServerError, ServerResult};

/// Environment variable holding the bot token when `bot_token` is not set
/// through the prefixed configuration.
pub const TOKEN_ENV_VAR: &str = "TOKEN";

/// Server configuration
#[derive(Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path Telegram posts updates to
    #[serde(default = "default_webhook_path")]
    pub webhook_path: String,

    /// Maximum request body size in MB
    #[serde(default = "default_max_body_size_mb")]
    pub max_body_size_mb: usize,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Metrics endpoint enabled
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,

    /// Bot API token
    #[serde(default, skip_serializing)]
    pub bot_token: String,

    /// Bot API base URL
    #[serde(default = "default_telegram_api_url")]
    pub telegram_api_url: String,

    /// Timeout for Bot API calls in seconds
    #[serde(default = "default_telegram_timeout_secs")]
    pub telegram_timeout_secs: u64,

    #[serde(default)]
    pub probe: ProbeConfig,

    #[serde(default)]
    pub qr: QrConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            webhook_path: default_webhook_path(),
            max_body_size_mb: default_max_body_size_mb(),
            log_level: default_log_level(),
            metrics_enabled: default_true(),
            bot_token: String::new(),
            telegram_api_url: default_telegram_api_url(),
            telegram_timeout_secs: default_telegram_timeout_secs(),
            probe: ProbeConfig::default(),
            qr: QrConfig::default(),
        }
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind_addr", &self.bind_addr)
            .field("port", &self.port)
            .field("webhook_path", &self.webhook_path)
            .field("max_body_size_mb", &self.max_body_size_mb)
            .field("log_level", &self.log_level)
            .field("metrics_enabled", &self.metrics_enabled)
            .field("bot_token", &"<redacted>")
            .field("telegram_api_url", &self.telegram_api_url)
            .field("telegram_timeout_secs", &self.telegram_timeout_secs)
            .field("probe", &self.probe)
            .field("qr", &self.qr)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from an optional `qrbot` config file and
    /// `QRBOT__*` environment variables, falling back to `TOKEN` for the
    /// bot token.
    pub fn load() -> anyhow::Result<Self> {
        let builder = config::Config::builder()
            // Load from file if exists
            .add_source(config::File::with_name("qrbot").required(false))
            // Override with environment variables
            .add_source(config::Environment::with_prefix("QRBOT").separator("__"));

        let mut config: ServerConfig = builder.build()?.try_deserialize()?;

        if config.bot_token.is_empty() {
            if let Ok(token) = std::env::var(TOKEN_ENV_VAR) {
                config.bot_token = token;
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ServerResult<()> {
        if self.bot_token.trim().is_empty() {
            return Err(ServerError::Config(format!(
                "bot token missing: set QRBOT__BOT_TOKEN or {TOKEN_ENV_VAR}"
            )));
        }
        if !self.webhook_path.starts_with('/') {
            return Err(ServerError::Config(format!(
                "webhook_path must start with '/': {}",
                self.webhook_path
            )));
        }
        self.probe
            .validate()
            .map_err(|err| ServerError::Config(err.to_string()))?;
        self.qr
            .validate()
            .map_err(|err| ServerError::Config(err.to_string()))?;
        Ok(())
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> ServerResult<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Get max body size in bytes
    pub fn max_body_size(&self) -> usize {
        self.max_body_size_mb * 1024 * 1024
    }

    pub fn bot_api_config(&self) -> BotApiConfig {
        BotApiConfig {
            token: self.bot_token.clone(),
            api_url: self.telegram_api_url.clone(),
            timeout: Duration::from_secs(self.telegram_timeout_secs),
        }
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_webhook_path() -> String {
    "/webhook".to_string()
}

fn default_max_body_size_mb() -> usize {
    1
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_telegram_api_url() -> String {
    qrbot::DEFAULT_API_URL.to_string()
}

fn default_telegram_timeout_secs() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_token() -> ServerConfig {
        ServerConfig {
            bot_token: "123:abc".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_config() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.webhook_path, "/webhook");
        assert_eq!(cfg.max_body_size(), 1024 * 1024);
        assert_eq!(cfg.probe.timeout_ms, 1000);
        assert_eq!(cfg.qr.size_px, 128);
        assert!(cfg.metrics_enabled);
    }

    #[test]
    fn test_socket_addr() {
        let cfg = ServerConfig::default();
        let addr = cfg.socket_addr().unwrap();
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn test_bad_bind_addr() {
        let cfg = ServerConfig {
            bind_addr: "not an address".into(),
            ..Default::default()
        };
        assert!(matches!(cfg.socket_addr(), Err(ServerError::Config(_))));
    }

    #[test]
    fn test_missing_token_is_rejected() {
        let err = ServerConfig::default().validate().unwrap_err();
        assert!(err.to_string().contains("bot token missing"));
        assert!(with_token().validate().is_ok());
    }

    #[test]
    fn test_webhook_path_must_be_absolute() {
        let cfg = ServerConfig {
            webhook_path: "webhook".into(),
            ..with_token()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_nested_configs_are_validated() {
        let mut cfg = with_token();
        cfg.probe.timeout_ms = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = with_token();
        cfg.qr.size_px = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let rendered = format!("{:?}", with_token());
        assert!(!rendered.contains("123:abc"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_bot_api_config() {
        let api = with_token().bot_api_config();
        assert_eq!(api.token, "123:abc");
        assert_eq!(api.api_url, "https://api.telegram.org");
        assert_eq!(api.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg: ServerConfig = serde_json::from_str(
            r#"{"port": 9000, "bot_token": "t", "probe": {"timeout_ms": 500}}"#,
        )
        .unwrap();
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.probe.timeout_ms, 500);
        assert_eq!(cfg.qr.size_px, 128);
        assert_eq!(cfg.webhook_path, "/webhook");
    }
}
