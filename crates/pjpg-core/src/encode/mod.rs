//! JPEG compression of pixel data for PJPG payloads.
//!
//! # Examples
//!
//! ```ignore
//! use pjpg_core::encode::compress_jpeg;
//!
//! let pixels = vec![128u8; 100 * 100 * 3]; // Gray image
//! let jpeg_bytes = compress_jpeg(&pixels, 100, 100, 85, false).unwrap();
//! println!("Encoded {} bytes", jpeg_bytes.len());
//! ```

mod jpeg;

pub use jpeg::{compress_jpeg, EncodeError};
