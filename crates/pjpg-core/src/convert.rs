//! End-to-end conversion from a source image to a device payload.
//!
//! Two output formats are supported:
//! - **QOI**: the decoded pixels are encoded directly.
//! - **PJPG**: the pixels are compressed to baseline JPEG, stripped of
//!   metadata, checked for hardware conformance, then framed. An optional
//!   second JPEG carries the alpha channel as grayscale.

use std::path::Path;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::{decode_image, decode_image_no_orientation, DecodeError};
use crate::encode::{compress_jpeg, EncodeError};
use crate::jpeg::{is_baseline_420, is_baseline_gray, strip};
use crate::pixel::PixelBuffer;
use crate::pjpg;
use crate::qoi::{self, Colorspace};

/// Default JPEG quality for PJPG payloads.
pub const DEFAULT_QUALITY: u8 = 85;

/// Errors that can occur during conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// The color JPEG is not baseline 8-bit 4:2:0.
    #[error("Color JPEG is not baseline 4:2:0 (8-bit); the hardware decoder requires it")]
    NotBaseline420,

    /// The alpha JPEG is not baseline 8-bit grayscale.
    #[error("Alpha JPEG is not baseline grayscale (8-bit)")]
    NotBaselineGray,

    /// PJPG stores dimensions as 16-bit values.
    #[error("Dimensions {width}x{height} do not fit the PJPG 16-bit header fields")]
    DimensionsTooLarge { width: u32, height: u32 },
}

/// Output container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Baseline JPEG(s) in a PJPG container, for the hardware decoder.
    #[default]
    Pjpg,
    /// Lossless QOI stream, for software decoding.
    Qoi,
}

impl OutputFormat {
    /// `.qoi` (any case) selects QOI; anything else is PJPG.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("qoi") => OutputFormat::Qoi,
            _ => OutputFormat::Pjpg,
        }
    }
}

/// Conversion settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    pub format: OutputFormat,
    /// JPEG quality (1-100), PJPG only.
    pub quality: u8,
    /// Keep the JFIF APP0 segment when stripping.
    pub keep_app0: bool,
    /// Emit an alpha JPEG when the source has transparency, PJPG only.
    pub include_alpha: bool,
    /// Rotate/flip pixels according to EXIF orientation before encoding.
    pub apply_orientation: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Pjpg,
            quality: DEFAULT_QUALITY,
            keep_app0: true,
            include_alpha: false,
            apply_orientation: true,
        }
    }
}

/// Result of a conversion.
#[derive(Debug, Clone)]
pub struct Converted {
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Decode `bytes` and convert according to `options`.
pub fn convert(bytes: &[u8], options: &ConvertOptions) -> Result<Converted, ConvertError> {
    let buffer = if options.apply_orientation {
        decode_image(bytes)?
    } else {
        decode_image_no_orientation(bytes)?
    };
    info!(
        "Decoded {}x{} image with {} channels",
        buffer.width(),
        buffer.height(),
        buffer.channels().count()
    );

    let data = match options.format {
        OutputFormat::Qoi => convert_to_qoi(&buffer),
        OutputFormat::Pjpg => convert_to_pjpg(&buffer, options)?,
    };

    Ok(Converted {
        format: options.format,
        width: buffer.width(),
        height: buffer.height(),
        data,
    })
}

/// Encode the buffer as QOI with its own channel count and sRGB colorspace.
pub fn convert_to_qoi(buffer: &PixelBuffer) -> Vec<u8> {
    let data = qoi::encode(buffer, Colorspace::Srgb);
    info!("QOI size: {} bytes", data.len());
    data
}

/// Compress, strip, validate and frame the buffer as PJPG.
pub fn convert_to_pjpg(
    buffer: &PixelBuffer,
    options: &ConvertOptions,
) -> Result<Vec<u8>, ConvertError> {
    let (width, height) = (buffer.width(), buffer.height());
    let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height)) else {
        return Err(ConvertError::DimensionsTooLarge { width, height });
    };

    let color = compress_stripped(&buffer.to_rgb(), width, height, options, false)?;
    if !is_baseline_420(&color) {
        warn!("Color JPEG failed the baseline 4:2:0 check");
        return Err(ConvertError::NotBaseline420);
    }
    info!("Color JPEG size: {} bytes", color.len());

    let alpha = if options.include_alpha && buffer.has_transparency() {
        let alpha = compress_stripped(&buffer.alpha_plane(), width, height, options, true)?;
        if !is_baseline_gray(&alpha) {
            warn!("Alpha JPEG failed the baseline grayscale check");
            return Err(ConvertError::NotBaselineGray);
        }
        info!("Alpha JPEG size: {} bytes", alpha.len());
        alpha
    } else {
        Vec::new()
    };

    let container = pjpg::build(&color, w, h, &alpha);
    info!("PJPG size: {} bytes", container.len());
    Ok(container)
}

fn compress_stripped(
    pixels: &[u8],
    width: u32,
    height: u32,
    options: &ConvertOptions,
    grayscale: bool,
) -> Result<Vec<u8>, ConvertError> {
    let jpeg = compress_jpeg(pixels, width, height, options.quality, grayscale)?;
    let stripped = strip(&jpeg, options.keep_app0);
    debug!(
        "Stripped {} bytes of metadata from {} JPEG",
        jpeg.len() - stripped.len(),
        if grayscale { "alpha" } else { "color" }
    );
    Ok(stripped)
}
