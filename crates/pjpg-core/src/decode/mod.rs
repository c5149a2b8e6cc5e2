//! Source image decoding.
//!
//! Turns an arbitrary image file (JPEG or PNG) into a [`PixelBuffer`] with a
//! channel count driven by the presence of transparency.
//!
//! EXIF orientation is baked into the pixels here; stripped JPEG output
//! carries no APP1 segment.
//!
//! [`PixelBuffer`]: crate::pixel::PixelBuffer

mod source;
mod types;

pub use source::{decode_image, decode_image_no_orientation, get_orientation};
pub use types::{DecodeError, Orientation};
