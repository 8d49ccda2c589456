use image::{ImageBuffer, ImageFormat, Luma};
use qrcode::QrCode;
use std::io::{self, Cursor, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::{QrConfig, QrImageError};

/// A rendered QR PNG living in a temporary file.
///
/// The file is deleted when this value is dropped.
#[derive(Debug)]
pub struct QrImage {
    file: NamedTempFile,
}

impl QrImage {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Delete the file now and report whether that worked.
    pub fn close(self) -> io::Result<()> {
        self.file.close()
    }
}

fn rasterize(data: &str, cfg: &QrConfig) -> Result<ImageBuffer<Luma<u8>, Vec<u8>>, QrImageError> {
    cfg.validate()?;
    let code = QrCode::with_error_correction_level(data.as_bytes(), cfg.ec_level.into())?;
    Ok(code
        .render::<Luma<u8>>()
        .min_dimensions(cfg.size_px, cfg.size_px)
        .build())
}

/// Render `data` as an in-memory PNG.
pub fn render_png(data: &str, cfg: &QrConfig) -> Result<Vec<u8>, QrImageError> {
    let image = rasterize(data, cfg)?;
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

/// Render `data` as a PNG into a fresh temp file.
///
/// Encoding happens before the file is created, so payloads that do not fit
/// a QR code never touch the filesystem. A write failure drops the
/// half-written file.
pub fn render_to_tempfile(data: &str, cfg: &QrConfig) -> Result<QrImage, QrImageError> {
    let image = rasterize(data, cfg)?;

    let mut builder = tempfile::Builder::new();
    builder.prefix(&cfg.file_prefix).suffix(".png");
    let mut file = match &cfg.temp_dir {
        Some(dir) => builder.tempfile_in(dir)?,
        None => builder.tempfile()?,
    };

    image.write_to(file.as_file_mut(), ImageFormat::Png)?;
    file.as_file_mut().flush()?;

    debug!(
        path = %file.path().display(),
        width = image.width(),
        height = image.height(),
        "qr image written"
    );
    Ok(QrImage { file })
}
