//! Configuration for the reachability probe.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ProbeError;

/// Runtime configuration for [`HttpProbe`](crate::HttpProbe).
///
/// The timeout bounds the worst-case latency of scheme insertion to
/// `schemes × timeout`, so keep it short.
///
/// ```
/// use linkcheck::ProbeConfig;
///
/// let cfg = ProbeConfig::default();
/// assert_eq!(cfg.timeout_ms, 1000);
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Whole-request timeout for a single probe, in milliseconds.
    ///
    /// Default: `1000`
    pub timeout_ms: u64,

    /// `User-Agent` header sent with probe requests.
    ///
    /// Default: `"qrbot/<version>"`
    pub user_agent: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 1000,
            user_agent: concat!("qrbot/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ProbeConfig {
    /// Probe timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Reject configurations that would make every probe fail instantly.
    pub fn validate(&self) -> Result<(), ProbeError> {
        if self.timeout_ms == 0 {
            return Err(ProbeError::InvalidConfig(
                "timeout_ms must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
