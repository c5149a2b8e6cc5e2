//! Raw interleaved pixel data shared by every encoder.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for pixel buffer construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PixelError {
    /// Channel count other than 3 (RGB) or 4 (RGBA).
    #[error("Unsupported channel count: {0} (expected 3 or 4)")]
    UnsupportedChannels(u8),

    /// Byte length doesn't match width * height * channels.
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// width * height * channels does not fit in memory.
    #[error("Dimensions {width}x{height} are too large")]
    DimensionsTooLarge { width: u32, height: u32 },
}

/// Number of interleaved 8-bit channels per pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Channels {
    /// Red, green, blue. Alpha is implicitly 255.
    Rgb = 3,
    /// Red, green, blue, alpha.
    Rgba = 4,
}

impl Channels {
    /// Bytes per pixel.
    #[inline]
    pub fn count(self) -> usize {
        self as usize
    }
}

impl TryFrom<u8> for Channels {
    type Error = PixelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            3 => Ok(Channels::Rgb),
            4 => Ok(Channels::Rgba),
            other => Err(PixelError::UnsupportedChannels(other)),
        }
    }
}

/// A single RGBA pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    /// Opaque pixel.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Slot in the 64-entry index cache: `(r*3 + g*5 + b*7 + a*11) mod 64`.
    #[inline]
    pub fn index_hash(self) -> u8 {
        let sum = u32::from(self.r) * 3
            + u32::from(self.g) * 5
            + u32::from(self.b) * 7
            + u32::from(self.a) * 11;
        (sum % 64) as u8
    }
}

/// Row-major interleaved pixel data with its dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: Channels,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw bytes, checking that `data.len() == width * height * channels`.
    pub fn new(
        width: u32,
        height: u32,
        channels: Channels,
        data: Vec<u8>,
    ) -> Result<Self, PixelError> {
        let expected = expected_len(width, height, channels)
            .ok_or(PixelError::DimensionsTooLarge { width, height })?;
        if data.len() != expected {
            return Err(PixelError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Create a buffer from an `image::RgbImage`.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            channels: Channels::Rgb,
            data: img.into_raw(),
        }
    }

    /// Create a buffer from an `image::RgbaImage`.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            channels: Channels::Rgba,
            data: img.into_raw(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> Channels {
        self.channels
    }

    /// Raw interleaved bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Check if this is an empty image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Iterate pixels in row-major order. RGB sources report alpha 255.
    pub fn pixels(&self) -> impl Iterator<Item = Pixel> + '_ {
        let channels = self.channels;
        self.data
            .chunks_exact(channels.count())
            .map(move |px| match channels {
                Channels::Rgb => Pixel::rgb(px[0], px[1], px[2]),
                Channels::Rgba => Pixel::rgba(px[0], px[1], px[2], px[3]),
            })
    }

    /// True when at least one pixel is not fully opaque.
    pub fn has_transparency(&self) -> bool {
        match self.channels {
            Channels::Rgb => false,
            Channels::Rgba => self.data.chunks_exact(4).any(|px| px[3] != 255),
        }
    }

    /// RGB bytes (3 per pixel), dropping alpha if present.
    pub fn to_rgb(&self) -> Vec<u8> {
        match self.channels {
            Channels::Rgb => self.data.clone(),
            Channels::Rgba => self
                .data
                .chunks_exact(4)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect(),
        }
    }

    /// Alpha values (1 per pixel); all 255 for RGB sources.
    pub fn alpha_plane(&self) -> Vec<u8> {
        match self.channels {
            Channels::Rgb => vec![255; self.pixel_count()],
            Channels::Rgba => self.data.chunks_exact(4).map(|px| px[3]).collect(),
        }
    }
}

/// Byte length of a `width` x `height` image, `None` on overflow.
pub(crate) fn expected_len(width: u32, height: u32, channels: Channels) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(channels.count())
}
