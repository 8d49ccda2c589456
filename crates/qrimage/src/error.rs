use std::io;
use thiserror::Error;

/// Errors raised while producing a QR image file.
#[derive(Debug, Error)]
pub enum QrImageError {
    /// The payload does not fit into any QR version at the chosen level.
    #[error("qr encoding failed: {0}")]
    Encode(#[from] qrcode::types::QrError),
    #[error("png encoding failed: {0}")]
    Png(#[from] image::ImageError),
    /// Creating or writing the temp file failed.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid qr config: {0}")]
    InvalidConfig(String),
}
