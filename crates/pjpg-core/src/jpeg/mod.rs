//! Segment-level JPEG analysis and metadata stripping.
//!
//! This module never decodes image data. It provides:
//! - Frame header lookup ([`find_frame_info`], [`get_dimensions`])
//! - Hardware conformance checks (baseline 4:2:0 color, baseline grayscale)
//! - Removal of COM and APPn segments ([`strip`])
//!
//! # Architecture
//!
//! Every marker is first classified ([`MarkerKind`]); the stripper then maps
//! each marker to a [`SegmentAction`] through a pure decision table. Entropy
//! coded scan data is treated as opaque and copied byte for byte.
//!
//! # Examples
//!
//! ```ignore
//! use pjpg_core::jpeg;
//!
//! let stripped = jpeg::strip(&jpeg_bytes, true);
//! if !jpeg::is_baseline_420(&stripped) {
//!     println!("Re-encode required");
//! }
//! ```

pub mod marker;
mod scan;
mod strip;

pub use marker::{classify, segment_action, MarkerKind, SegmentAction};
pub use scan::{
    classify_conformance, find_frame_info, get_dimensions, is_baseline_420, is_baseline_gray,
    ComponentInfo, Conformance, SofInfo,
};
pub use strip::strip;
