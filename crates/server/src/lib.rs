//! qrbot server - Telegram webhook that answers URLs with QR codes
//!
//! Telegram posts each update to the webhook path; the server turns it into
//! a [`qrbot::MessageContext`], runs it through [`qrbot::Pipeline`] and
//! always acknowledges with `200 {"ok":true}`.
//!
//! # Endpoints
//!
//! - `POST /webhook` - Telegram updates (path configurable)
//! - `GET /` - API information
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe
//! - `GET /metrics` - Prometheus metrics
//!
//! # Configuration
//!
//! Read from an optional `qrbot.{toml,yaml,json}` file and `QRBOT__*`
//! environment variables (`QRBOT__PORT`, `QRBOT__PROBE__TIMEOUT_MS`, ...).
//! The bot token may also come from `TOKEN`.

pub mod config;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, init_tracing, start_server};
pub use state::ServerState;
