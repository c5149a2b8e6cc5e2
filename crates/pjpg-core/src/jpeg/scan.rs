//! Frame header lookup and hardware conformance checks.

use serde::{Deserialize, Serialize};

use super::marker::{self, classify, read_u16, MarkerKind};

/// One component entry of a start-of-frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentInfo {
    pub id: u8,
    /// Horizontal sampling factor (high nibble).
    pub h: u8,
    /// Vertical sampling factor (low nibble).
    pub v: u8,
}

/// Parsed start-of-frame header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SofInfo {
    /// SOF0 (baseline), SOF1 (extended sequential) or SOF2 (progressive).
    pub marker: u8,
    /// Sample precision in bits.
    pub precision: u8,
    pub height: u16,
    pub width: u16,
    pub components: Vec<ComponentInfo>,
}

impl SofInfo {
    pub fn is_baseline(&self) -> bool {
        self.marker == marker::SOF0 && self.precision == 8
    }

    fn sampling(&self) -> Vec<(u8, u8)> {
        self.components.iter().map(|c| (c.h, c.v)).collect()
    }
}

/// Which hardware-decodable profile a JPEG matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Conformance {
    /// Baseline, 8-bit, Y 2x2 + Cb 1x1 + Cr 1x1.
    Baseline420,
    /// Baseline, 8-bit, single component.
    BaselineGray,
    /// Anything else, including streams without a readable frame header.
    NonConforming,
}

/// Walk the marker segments of `data` until `wanted` accepts a
/// length-prefixed marker, returning its code and the offset of its length
/// field.
///
/// Bytes outside a marker (entropy-coded data, stray garbage) are skipped one
/// at a time, so stuffed `0xFF 0x00` pairs and restart markers inside scan
/// data are stepped over. Returns `None` at EOI, at the end of the buffer, or
/// when a declared segment length runs past the end.
fn find_segment(data: &[u8], wanted: impl Fn(u8) -> bool) -> Option<(u8, usize)> {
    let mut pos = 0;
    while pos + 1 < data.len() {
        if data[pos] != 0xFF {
            pos += 1;
            continue;
        }
        let code = data[pos + 1];
        if code == 0xFF {
            // fill byte
            pos += 1;
            continue;
        }
        pos += 2;

        match classify(code) {
            MarkerKind::Stuffing | MarkerKind::Restart | MarkerKind::Standalone => continue,
            MarkerKind::EndOfImage => return None,
            MarkerKind::StartOfScan | MarkerKind::Segment => {}
        }
        if wanted(code) {
            return Some((code, pos));
        }

        let length = read_u16(data, pos)? as usize;
        if length < 2 || pos + length > data.len() {
            return None;
        }
        pos += length;
    }
    None
}

/// Find and parse the first SOF0, SOF1 or SOF2 header.
///
/// Returns `None` if no such header appears, or if any segment on the way
/// (the frame header included) is truncated or malformed.
pub fn find_frame_info(jpeg: &[u8]) -> Option<SofInfo> {
    let (code, pos) = find_segment(jpeg, marker::is_checked_sof)?;

    let length = read_u16(jpeg, pos)? as usize;
    if pos + length > jpeg.len() {
        return None;
    }
    let segment = &jpeg[pos..pos + length];
    // length(2) precision(1) height(2) width(2) count(1)
    if segment.len() < 8 {
        return None;
    }

    let count = segment[7] as usize;
    let entries = segment.get(8..8 + count * 3)?;
    let components = entries
        .chunks_exact(3)
        .map(|c| ComponentInfo {
            id: c[0],
            h: c[1] >> 4,
            v: c[1] & 0x0F,
        })
        .collect();

    Some(SofInfo {
        marker: code,
        precision: segment[2],
        height: u16::from_be_bytes([segment[3], segment[4]]),
        width: u16::from_be_bytes([segment[5], segment[6]]),
        components,
    })
}

/// Baseline 8-bit YCbCr with 4:2:0 subsampling, components in Y, Cb, Cr
/// order.
pub fn is_baseline_420(jpeg: &[u8]) -> bool {
    find_frame_info(jpeg).is_some_and(|info| {
        info.is_baseline() && info.sampling() == [(2, 2), (1, 1), (1, 1)]
    })
}

/// Baseline 8-bit single-component.
pub fn is_baseline_gray(jpeg: &[u8]) -> bool {
    find_frame_info(jpeg).is_some_and(|info| info.is_baseline() && info.components.len() == 1)
}

/// Classify a JPEG against the two hardware profiles.
pub fn classify_conformance(jpeg: &[u8]) -> Conformance {
    match find_frame_info(jpeg) {
        Some(info) if info.is_baseline() && info.components.len() == 1 => {
            Conformance::BaselineGray
        }
        Some(info) if info.is_baseline() && info.sampling() == [(2, 2), (1, 1), (1, 1)] => {
            Conformance::Baseline420
        }
        _ => Conformance::NonConforming,
    }
}

/// Width and height from the first frame header of any SOF type.
///
/// Accepts every start-of-frame code (lossless, hierarchical and arithmetic
/// variants included), unlike [`find_frame_info`]. Only the dimension fields
/// must be present; the rest of the header is not read.
pub fn get_dimensions(jpeg: &[u8]) -> Option<(u16, u16)> {
    let (_, pos) = find_segment(jpeg, marker::is_any_sof)?;
    // length(2) precision(1) height(2) width(2)
    let header = jpeg.get(pos..pos + 7)?;
    let height = u16::from_be_bytes([header[3], header[4]]);
    let width = u16::from_be_bytes([header[5], header[6]]);
    Some((width, height))
}


// ============================================================================
// Property-Based Tests
// ============================================================================
