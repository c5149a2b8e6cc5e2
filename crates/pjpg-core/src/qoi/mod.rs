//! Lossless QOI ("Quite OK Image") encoding.
//!
//! Each pixel is coded with the first applicable operation in the fixed
//! order RUN, INDEX, DIFF, LUMA, RGB/RGBA. The choice is canonical: decoders
//! rely on the exact thresholds and on the index hash
//! `(r*3 + g*5 + b*7 + a*11) mod 64`.
//!
//! Only the encode direction is provided. [`QoiHeader::parse`] reads the
//! header of an existing stream for inspection but never touches pixel data.
//!
//! # Examples
//!
//! ```ignore
//! use pjpg_core::qoi;
//!
//! let stream = qoi::encode_raw(&[10, 20, 30], 1, 1, 3, 0).unwrap();
//! assert_eq!(stream.len(), 26);
//! ```

mod encoder;
mod header;
mod op;

use thiserror::Error;

pub use encoder::{encode, encode_raw, QoiEncoder};
pub use header::{Colorspace, QoiHeader, QOI_END_MARKER, QOI_HEADER_LEN, QOI_MAGIC};
pub use op::{select_op, QoiOp, MAX_RUN};

/// Errors that can occur during QOI encoding.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QoiError {
    /// Only RGB (3) and RGBA (4) are representable.
    #[error("QOI supports 3 or 4 channels, got {0}")]
    InvalidChannels(u8),

    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * channels), got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// width * height * channels overflows
    #[error("Dimensions {width}x{height} are too large")]
    DimensionsTooLarge { width: u32, height: u32 },
}
