use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::{ProbeConfig, ProbeError};

/// Reachability check used to disambiguate scheme-less input.
///
/// Implementations return the HTTP status of a GET against `url`, or an
/// error when no response was obtained. Only the status is consulted.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self, url: &Url) -> Result<u16, ProbeError>;
}

#[async_trait]
impl<P: Probe + ?Sized> Probe for Arc<P> {
    async fn probe(&self, url: &Url) -> Result<u16, ProbeError> {
        (**self).probe(url).await
    }
}

/// Statuses that count as "reachable": success and redirection.
pub fn is_reachable_status(status: u16) -> bool {
    (200..400).contains(&status)
}

/// [`Probe`] backed by a real HTTP client with a fixed timeout.
///
/// Redirects are followed, the response body is dropped unread. Schemes the
/// client cannot speak (e.g. `ftp`) fail as transport errors.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpProbe {
    pub fn new(cfg: &ProbeConfig) -> Result<Self, ProbeError> {
        cfg.validate()?;
        let client = reqwest::Client::builder()
            .timeout(cfg.timeout())
            .user_agent(cfg.user_agent.as_str())
            .build()
            .map_err(ProbeError::Client)?;
        Ok(Self {
            client,
            timeout: cfg.timeout(),
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn probe(&self, url: &Url) -> Result<u16, ProbeError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| ProbeError::from_reqwest(err, self.timeout))?;
        let status = response.status().as_u16();
        debug!(url = %url, status, "probe completed");
        Ok(status)
    }
}
