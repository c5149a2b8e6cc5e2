//! PJPG container framing.
//!
//! Layout (all integers little-endian):
//!
//! | offset | size | field           |
//! |--------|------|-----------------|
//! | 0      | 7    | magic `_PJPG__` |
//! | 7      | 1    | version (0)     |
//! | 8      | 2    | width           |
//! | 10     | 2    | height          |
//! | 12     | 4    | color JPEG size |
//! | 16     | 4    | alpha JPEG size |
//! | 20     | 2    | reserved (0)    |
//!
//! The color JPEG follows the header, then the optional alpha JPEG.

use serde::{Deserialize, Serialize};

pub const PJPG_MAGIC: &[u8; 7] = b"_PJPG__";
pub const PJPG_VERSION: u8 = 0;
pub const PJPG_HEADER_LEN: usize = 22;

/// Header fields of a PJPG container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PjpgHeader {
    pub version: u8,
    pub width: u16,
    pub height: u16,
    pub color_size: u32,
    pub alpha_size: u32,
}

impl PjpgHeader {
    pub fn to_bytes(&self) -> [u8; PJPG_HEADER_LEN] {
        let mut out = [0u8; PJPG_HEADER_LEN];
        out[0..7].copy_from_slice(PJPG_MAGIC);
        out[7] = self.version;
        out[8..10].copy_from_slice(&self.width.to_le_bytes());
        out[10..12].copy_from_slice(&self.height.to_le_bytes());
        out[12..16].copy_from_slice(&self.color_size.to_le_bytes());
        out[16..20].copy_from_slice(&self.alpha_size.to_le_bytes());
        // 20..22 reserved, zero
        out
    }

    /// Read a container header, checking the magic and that both payloads
    /// fit inside `bytes`.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let header = bytes.get(..PJPG_HEADER_LEN)?;
        if &header[0..7] != PJPG_MAGIC {
            return None;
        }
        let parsed = Self {
            version: header[7],
            width: u16::from_le_bytes([header[8], header[9]]),
            height: u16::from_le_bytes([header[10], header[11]]),
            color_size: u32::from_le_bytes([header[12], header[13], header[14], header[15]]),
            alpha_size: u32::from_le_bytes([header[16], header[17], header[18], header[19]]),
        };
        if parsed.total_len() > bytes.len() as u64 {
            return None;
        }
        Some(parsed)
    }

    /// Container length implied by the header.
    pub fn total_len(&self) -> u64 {
        PJPG_HEADER_LEN as u64 + u64::from(self.color_size) + u64::from(self.alpha_size)
    }

    /// Byte range of the color JPEG within the container.
    pub fn color_range(&self) -> std::ops::Range<usize> {
        PJPG_HEADER_LEN..PJPG_HEADER_LEN + self.color_size as usize
    }

    /// Byte range of the alpha JPEG within the container (empty if absent).
    pub fn alpha_range(&self) -> std::ops::Range<usize> {
        let start = self.color_range().end;
        start..start + self.alpha_size as usize
    }
}

/// Frame a color JPEG and an optional alpha JPEG (pass an empty slice when
/// there is none).
///
/// No JPEG validation happens here. Dimensions are already 16-bit; callers
/// holding wider values must reject them before narrowing.
pub fn build(color: &[u8], width: u16, height: u16, alpha: &[u8]) -> Vec<u8> {
    let header = PjpgHeader {
        version: PJPG_VERSION,
        width,
        height,
        color_size: color.len() as u32,
        alpha_size: alpha.len() as u32,
    };

    let mut out = Vec::with_capacity(PJPG_HEADER_LEN + color.len() + alpha.len());
    out.extend_from_slice(&header.to_bytes());
    out.extend_from_slice(color);
    out.extend_from_slice(alpha);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_without_alpha() {
        let out = build(&[0x01, 0x02], 4, 4, &[]);
        assert_eq!(
            out,
            vec![
                0x5F, 0x50, 0x4A, 0x50, 0x47, 0x5F, 0x5F, 0x00, 0x04, 0x00, 0x04, 0x00, 0x02, 0x00,
                0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x02,
            ]
        );
    }

    #[test]
    fn test_build_with_alpha() {
        let out = build(&[0xAA; 3], 0x0201, 0x0403, &[0xBB; 5]);
        assert_eq!(out.len(), PJPG_HEADER_LEN + 3 + 5);
        assert_eq!(&out[8..12], &[0x01, 0x02, 0x03, 0x04]);
        assert_eq!(&out[12..16], &[3, 0, 0, 0]);
        assert_eq!(&out[16..20], &[5, 0, 0, 0]);
        assert_eq!(&out[20..22], &[0, 0]);
        assert_eq!(&out[22..25], &[0xAA; 3]);
        assert_eq!(&out[25..], &[0xBB; 5]);
    }

    #[test]
    fn test_parse_header() {
        let out = build(&[1, 2, 3], 320, 240, &[4, 5]);
        let header = PjpgHeader::parse(&out).unwrap();
        assert_eq!(header.version, 0);
        assert_eq!((header.width, header.height), (320, 240));
        assert_eq!(header.color_size, 3);
        assert_eq!(header.alpha_size, 2);
        assert_eq!(&out[header.color_range()], &[1, 2, 3]);
        assert_eq!(&out[header.alpha_range()], &[4, 5]);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(PjpgHeader::parse(b"_PJPG__").is_none());

        let mut out = build(&[1, 2, 3], 1, 1, &[]);
        out.pop();
        assert!(PjpgHeader::parse(&out).is_none(), "payload shorter than declared");

        let mut out = build(&[1], 1, 1, &[]);
        out[0] = b'X';
        assert!(PjpgHeader::parse(&out).is_none(), "bad magic");
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
