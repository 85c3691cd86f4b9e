//! Pairing code side channel
//!
//! Each authentication cycle yields a pairing code. It is rendered as a QR
//! code, printed to the log for a terminal scan, and saved as a PNG at a
//! fixed path so an operator can retrieve it from outside the process.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{GrayImage, ImageFormat, Luma};
use qrcode::render::unicode::Dense1x2;
use qrcode::{Color, QrCode};
use tracing::{info, warn};

use crate::utils::errors::{Result, SurveyRelayError};

/// Pixels per QR module in the PNG
const MODULE_PIXELS: u32 = 8;

/// Light border around the code, in modules
const QUIET_ZONE: u32 = 4;

#[derive(Debug, Clone)]
pub struct PairingSink {
    path: PathBuf,
}

impl PairingSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the artifact with the latest code
    pub async fn persist(&self, code: &str) -> Result<()> {
        let png = render_png(&encode(code)?)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, png).await?;
        info!(path = %self.path.display(), "Pairing code saved");
        Ok(())
    }

    /// Log the code and persist it; failures are not fatal
    pub async fn publish(&self, code: &str) {
        match encode(code) {
            Ok(qr) => info!(
                code = code,
                "Pairing code received, scan it with the chat app\n{}",
                render_terminal(&qr)
            ),
            Err(e) => warn!(code = code, error = %e, "Pairing code received but cannot be rendered"),
        }
        if let Err(e) = self.persist(code).await {
            warn!(path = %self.path.display(), error = %e, "Failed to save pairing code");
        }
    }
}

fn encode(code: &str) -> Result<QrCode> {
    QrCode::new(code.as_bytes()).map_err(|e| SurveyRelayError::Pairing(e.to_string()))
}

/// Render the code as a grayscale PNG with a quiet zone
pub(crate) fn render_png(qr: &QrCode) -> Result<Vec<u8>> {
    let width = qr.width() as u32;
    let colors = qr.to_colors();
    let side = (width + 2 * QUIET_ZONE) * MODULE_PIXELS;

    let image = GrayImage::from_fn(side, side, |x, y| {
        let (mx, my) = (x / MODULE_PIXELS, y / MODULE_PIXELS);
        let inside = (QUIET_ZONE..QUIET_ZONE + width).contains(&mx)
            && (QUIET_ZONE..QUIET_ZONE + width).contains(&my);
        let dark = inside
            && colors[((my - QUIET_ZONE) * width + (mx - QUIET_ZONE)) as usize] == Color::Dark;
        if dark { Luma([0u8]) } else { Luma([255u8]) }
    });

    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| SurveyRelayError::Pairing(e.to_string()))?;
    Ok(png)
}

/// Render the code with half-height blocks for a terminal
pub(crate) fn render_terminal(qr: &QrCode) -> String {
    qr.render::<Dense1x2>()
        .dark_color(Dense1x2::Light)
        .light_color(Dense1x2::Dark)
        .build()
}
