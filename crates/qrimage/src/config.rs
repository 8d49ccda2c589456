use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::QrImageError;

/// Error-correction level of the generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EcLevel {
    /// ~7% of codewords recoverable.
    Low,
    /// ~15% of codewords recoverable.
    #[default]
    Medium,
    /// ~25% of codewords recoverable.
    Quartile,
    /// ~30% of codewords recoverable.
    High,
}

impl From<EcLevel> for qrcode::EcLevel {
    fn from(level: EcLevel) -> Self {
        match level {
            EcLevel::Low => qrcode::EcLevel::L,
            EcLevel::Medium => qrcode::EcLevel::M,
            EcLevel::Quartile => qrcode::EcLevel::Q,
            EcLevel::High => qrcode::EcLevel::H,
        }
    }
}

/// How QR images are rendered and where their temp files go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QrConfig {
    /// Minimum width and height of the PNG in pixels, quiet zone included.
    ///
    /// Default: `128`
    pub size_px: u32,

    /// Default: [`EcLevel::Medium`]
    pub ec_level: EcLevel,

    /// Directory for temp files. `None` uses the system temp dir.
    pub temp_dir: Option<PathBuf>,

    /// Prefix of temp file names.
    ///
    /// Default: `"qrbot"`
    pub file_prefix: String,
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            size_px: 128,
            ec_level: EcLevel::Medium,
            temp_dir: None,
            file_prefix: "qrbot".to_string(),
        }
    }
}

impl QrConfig {
    pub fn validate(&self) -> Result<(), QrImageError> {
        if self.size_px == 0 {
            return Err(QrImageError::InvalidConfig(
                "size_px must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
