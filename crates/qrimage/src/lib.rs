//! QR-code rendering for qrbot.
//!
//! [`render_to_tempfile`] encodes a string as a QR code, rasterizes it to a
//! grayscale PNG and writes it into a fresh temporary file. The returned
//! [`QrImage`] owns that file: dropping it (or calling [`QrImage::close`])
//! deletes it, so a request that bails out early never leaves images behind.

mod config;
mod error;
mod render;

pub use crate::config::{EcLevel, QrConfig};
pub use crate::error::QrImageError;
pub use crate::render::{render_png, render_to_tempfile, QrImage};
