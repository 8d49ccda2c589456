//! Error types produced by the linkcheck crate.
//!
//! | Error | Meaning |
//! |-------|---------|
//! | [`UrlRejection::HostEmpty`] | Input is an absolute URL without a host |
//! | [`UrlRejection::SchemeNotAllowed`] | Input has a host but its scheme is outside the policy |
//! | [`UrlRejection::Unreachable`] | Bare input, and no allowed scheme produced a reachable URL |
//! | [`ProbeError`] | A single reachability check could not complete |
//!
//! A `ProbeError` never escapes [`extract_url`](crate::extract_url): it only
//! moves scheme insertion on to the next candidate.

use std::time::Duration;
use thiserror::Error;

/// Why a piece of text was not accepted as a URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlRejection {
    /// Parsed as an absolute URL, but there is no host to point at.
    #[error("host is empty")]
    HostEmpty,
    /// Parsed with a host, but the scheme is not in the allowed set.
    #[error("schema not allowed: {scheme}")]
    SchemeNotAllowed { scheme: String },
    /// Scheme insertion exhausted every allowed scheme.
    #[error("URL is invalid")]
    Unreachable,
}

/// Failure of a single probe request.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The request did not finish within the configured timeout.
    #[error("probe timed out after {0:?}")]
    Timeout(Duration),
    /// Connection, DNS, TLS or protocol failure.
    #[error("probe request failed: {0}")]
    Transport(#[source] reqwest::Error),
    /// The HTTP client could not be constructed.
    #[error("failed to build probe client: {0}")]
    Client(#[source] reqwest::Error),
    /// The probe configuration failed validation.
    #[error("invalid probe config: {0}")]
    InvalidConfig(String),
    /// Free-form failure, used by non-HTTP probe implementations.
    #[error("probe failed: {0}")]
    Other(String),
}

impl ProbeError {
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            ProbeError::Timeout(timeout)
        } else {
            ProbeError::Transport(err)
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ProbeError::Timeout(_))
    }
}
