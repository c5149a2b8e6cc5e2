//! PJPG Core - image payloads for embedded displays
//!
//! This crate turns ordinary images into the two formats a small display
//! controller understands: lossless QOI streams, and PJPG containers holding
//! baseline JPEGs its hardware decoder accepts. It also provides the
//! segment-level JPEG tooling (frame header lookup, conformance checks and
//! metadata stripping) the PJPG path relies on.

pub mod convert;
pub mod decode;
pub mod encode;
pub mod inspect;
pub mod jpeg;
pub mod pixel;
pub mod pjpg;
pub mod qoi;

pub use convert::{convert, ConvertError, ConvertOptions, Converted, OutputFormat};
pub use inspect::{inspect, FileInfo};
pub use pixel::{Channels, Pixel, PixelBuffer};
