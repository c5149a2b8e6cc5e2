//! JPEG compression for the hardware decoder.
//!
//! Output is always baseline (non-progressive). Color images use 4:2:0
//! chroma subsampling; grayscale images are a single component. The
//! `jpeg-encoder` crate is used because it exposes the sampling factor.

use jpeg_encoder::{ColorType, Encoder, SamplingFactor};
use thiserror::Error;

/// Errors that can occur during JPEG encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Width or height does not fit in 16 bits
    #[error("Dimensions {width}x{height} exceed the JPEG limit of 65535")]
    DimensionsTooLarge { width: u32, height: u32 },

    /// JPEG encoding failed
    #[error("JPEG encoding failed: {0}")]
    EncodingFailed(String),
}

/// Compress RGB (3 bytes per pixel) or grayscale (1 byte per pixel) data.
///
/// # Arguments
///
/// * `pixels` - Row-major pixel data
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - JPEG quality, clamped to 1-100
/// * `grayscale` - Treat `pixels` as one byte per pixel
///
/// # Example
///
/// ```ignore
/// use pjpg_core::encode::compress_jpeg;
///
/// let pixels = vec![128u8; 16 * 16 * 3];
/// let jpeg = compress_jpeg(&pixels, 16, 16, 85, false).unwrap();
/// assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
/// ```
pub fn compress_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
    grayscale: bool,
) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }
    let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height)) else {
        return Err(EncodeError::DimensionsTooLarge { width, height });
    };

    let (color_type, bytes_per_pixel) = if grayscale {
        (ColorType::Luma, 1)
    } else {
        (ColorType::Rgb, 3)
    };
    let expected_len = (width as usize) * (height as usize) * bytes_per_pixel;
    if pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: pixels.len(),
        });
    }

    let quality = quality.clamp(1, 100);

    let mut buffer = Vec::new();
    let mut encoder = Encoder::new(&mut buffer, quality);
    encoder.set_progressive(false);
    if !grayscale {
        // The encoder defaults to 4:4:4 at high quality settings
        encoder.set_sampling_factor(SamplingFactor::R_4_2_0);
    }

    encoder
        .encode(pixels, w, h, color_type)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
