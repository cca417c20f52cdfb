use crate::error::AppError;
use base64::{engine::general_purpose, Engine as _};
use image::{GrayImage, ImageFormat, Luma};
use qrcode::{Color, EcLevel, QrCode};
use std::io::Cursor;

/// Target edge length of the rendered code. Actual output is the nearest
/// whole-module multiple at or below this.
pub const QR_WIDTH_PX: u32 = 400;
const QUIET_ZONE_MODULES: u32 = 1;
const DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Renders `payload` as a high-error-correction black-on-white PNG and wraps
/// it in a data URL, the form stored on the ticket row.
pub fn generate_qr_data_url(payload: &str) -> Result<String, AppError> {
    let png = generate_qr_png(payload)?;
    Ok(format!("{}{}", DATA_URL_PREFIX, general_purpose::STANDARD.encode(png)))
}

pub fn generate_qr_png(payload: &str) -> Result<Vec<u8>, AppError> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::H)
        .map_err(|e| AppError::InternalWithMsg(format!("QR encoding failed: {:?}", e)))?;

    let colors = code.to_colors();
    let modules = code.width() as u32;
    let total = modules + 2 * QUIET_ZONE_MODULES;
    let scale = (QR_WIDTH_PX / total).max(1);
    let size = total * scale;

    let mut img = GrayImage::from_pixel(size, size, Luma([255u8]));
    for y in 0..modules {
        for x in 0..modules {
            if colors[(y * modules + x) as usize] == Color::Dark {
                let px0 = (x + QUIET_ZONE_MODULES) * scale;
                let py0 = (y + QUIET_ZONE_MODULES) * scale;
                for py in py0..py0 + scale {
                    for px in px0..px0 + scale {
                        img.put_pixel(px, py, Luma([0u8]));
                    }
                }
            }
        }
    }

    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| AppError::InternalWithMsg(format!("QR raster failed: {}", e)))?;
    Ok(buf)
}

/// Back from the stored data URL to raw PNG bytes (attachments, PDFs).
pub fn data_url_png_bytes(data_url: &str) -> Option<Vec<u8>> {
    let b64 = data_url.strip_prefix(DATA_URL_PREFIX)?;
    general_purpose::STANDARD.decode(b64).ok()
}
