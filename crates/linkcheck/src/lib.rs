//! qrbot link checking
//!
//! Turns whatever a user typed into a chat into an address that is safe to
//! encode as a QR code, or explains why it cannot.
//!
//! ## What we do here
//!
//! - **Parse** the text as an absolute URL. Fully qualified input is accepted
//!   as-is when its host is present and its scheme is allowed.
//! - **Reject** host-less URLs and disallowed schemes immediately. These never
//!   fall back to scheme insertion.
//! - **Insert a scheme** for bare input (`vk.com`, `www.россия.рф`): try each
//!   allowed scheme in order and keep the first one a [`Probe`] confirms as
//!   reachable.
//!
//! ## Main entry point
//!
//! Call [`extract_url`] with the raw text, a [`SchemePolicy`] and any
//! [`Probe`]. Production code uses [`HttpProbe`]; tests plug in a fake.
//!
//! ```no_run
//! use linkcheck::{extract_url, HttpProbe, ProbeConfig, SchemePolicy};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let probe = HttpProbe::new(&ProbeConfig::default())?;
//! let accepted = extract_url("example.com", &SchemePolicy::default(), &probe).await?;
//! println!("{accepted}");
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod normalize;
mod policy;
mod probe;

pub use crate::config::ProbeConfig;
pub use crate::error::{ProbeError, UrlRejection};
pub use crate::normalize::{extract_url, AcceptedUrl};
pub use crate::policy::{SchemePolicy, ALLOWED_SCHEMES};
pub use crate::probe::{is_reachable_status, HttpProbe, Probe};

pub use url::Url;
