//! The fixed 14-byte QOI header.

use serde::{Deserialize, Serialize};

pub const QOI_MAGIC: &[u8; 4] = b"qoif";
pub const QOI_HEADER_LEN: usize = 14;

/// Seven zero bytes and a single 0x01 close every stream.
pub const QOI_END_MARKER: [u8; 8] = [0, 0, 0, 0, 0, 0, 0, 1];

/// Colorspace byte stored in the header. Informative only; it does not
/// change how pixels are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Colorspace {
    /// sRGB with linear alpha.
    #[default]
    Srgb = 0,
    /// All channels linear.
    Linear = 1,
}

impl From<Colorspace> for u8 {
    fn from(value: Colorspace) -> Self {
        value as u8
    }
}

/// Header fields of a QOI stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QoiHeader {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub colorspace: u8,
}

impl QoiHeader {
    /// Serialize to the on-wire layout (big-endian dimensions).
    pub fn to_bytes(&self) -> [u8; QOI_HEADER_LEN] {
        let mut out = [0u8; QOI_HEADER_LEN];
        out[0..4].copy_from_slice(QOI_MAGIC);
        out[4..8].copy_from_slice(&self.width.to_be_bytes());
        out[8..12].copy_from_slice(&self.height.to_be_bytes());
        out[12] = self.channels;
        out[13] = self.colorspace;
        out
    }

    /// Read the header at the start of `bytes`.
    ///
    /// Only the header is examined; returns `None` for a short buffer, a
    /// wrong magic, or a channel count other than 3 or 4.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let header = bytes.get(..QOI_HEADER_LEN)?;
        if &header[0..4] != QOI_MAGIC {
            return None;
        }
        let channels = header[12];
        if channels != 3 && channels != 4 {
            return None;
        }
        Some(Self {
            width: u32::from_be_bytes([header[4], header[5], header[6], header[7]]),
            height: u32::from_be_bytes([header[8], header[9], header[10], header[11]]),
            channels,
            colorspace: header[13],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let header = QoiHeader {
            width: 0x0102_0304,
            height: 1,
            channels: 4,
            colorspace: Colorspace::Linear.into(),
        };
        assert_eq!(
            header.to_bytes(),
            [b'q', b'o', b'i', b'f', 1, 2, 3, 4, 0, 0, 0, 1, 4, 1]
        );
    }

    #[test]
    fn test_parse_header() {
        let bytes = [b'q', b'o', b'i', b'f', 0, 0, 1, 0, 0, 0, 0, 200, 3, 0, 0xFF];
        let header = QoiHeader::parse(&bytes).unwrap();
        assert_eq!(header.width, 256);
        assert_eq!(header.height, 200);
        assert_eq!(header.channels, 3);
        assert_eq!(header.colorspace, 0);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(QoiHeader::parse(b"qoif").is_none());
        assert!(QoiHeader::parse(b"qoix\0\0\0\x01\0\0\0\x01\x03\0").is_none());
        assert!(QoiHeader::parse(b"qoif\0\0\0\x01\0\0\0\x01\x02\0").is_none());
    }
}
