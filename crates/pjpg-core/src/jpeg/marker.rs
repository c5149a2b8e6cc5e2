//! JPEG marker codes and their classification.

pub const TEM: u8 = 0x01;
pub const SOF0: u8 = 0xC0;
pub const SOF1: u8 = 0xC1;
pub const SOF2: u8 = 0xC2;
pub const RST0: u8 = 0xD0;
pub const RST7: u8 = 0xD7;
pub const SOI: u8 = 0xD8;
pub const EOI: u8 = 0xD9;
pub const SOS: u8 = 0xDA;
pub const APP0: u8 = 0xE0;
pub const APP15: u8 = 0xEF;
pub const COM: u8 = 0xFE;

/// Structural category of the byte that follows an `0xFF`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// `0xFF 0x00` inside entropy-coded data; not a marker at all.
    Stuffing,
    /// RST0-RST7, no length field.
    Restart,
    /// SOI or TEM, no length field.
    Standalone,
    EndOfImage,
    /// SOS: length-prefixed header followed by entropy-coded data.
    StartOfScan,
    /// Any other marker; a big-endian length (including itself) follows.
    Segment,
}

/// Classify a marker code.
pub fn classify(marker: u8) -> MarkerKind {
    match marker {
        0x00 => MarkerKind::Stuffing,
        RST0..=RST7 => MarkerKind::Restart,
        SOI | TEM => MarkerKind::Standalone,
        EOI => MarkerKind::EndOfImage,
        SOS => MarkerKind::StartOfScan,
        _ => MarkerKind::Segment,
    }
}

/// Start-of-frame codes accepted for conformance checks (SOF0-SOF2).
#[inline]
pub fn is_checked_sof(marker: u8) -> bool {
    matches!(marker, SOF0 | SOF1 | SOF2)
}

/// Every start-of-frame code: C0-CF except DHT (C4), JPG (C8) and DAC (CC).
#[inline]
pub fn is_any_sof(marker: u8) -> bool {
    matches!(marker, 0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF)
}

/// What the metadata stripper does with a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentAction {
    /// Emit the two marker bytes and continue.
    CopyMarker,
    /// Emit the two marker bytes and finish.
    CopyAndStop,
    /// Emit the marker and every remaining input byte, then finish.
    CopyRemainder,
    /// Emit the marker with its full length-prefixed payload.
    Keep,
    /// Skip the marker and its payload.
    Drop,
}

/// Decision table for the stripper.
///
/// COM and APP1-APP15 are always dropped. APP0 (JFIF) is kept only when
/// `keep_app0` is set. Everything else passes through untouched.
///
/// A stuffed `FF 00` pair met outside scan data is malformed input; it is
/// copied as a bare two-byte marker and never read as a length-prefixed
/// segment.
pub fn segment_action(marker: u8, keep_app0: bool) -> SegmentAction {
    match classify(marker) {
        MarkerKind::Stuffing | MarkerKind::Restart | MarkerKind::Standalone => {
            SegmentAction::CopyMarker
        }
        MarkerKind::EndOfImage => SegmentAction::CopyAndStop,
        MarkerKind::StartOfScan => SegmentAction::CopyRemainder,
        MarkerKind::Segment => match marker {
            COM => SegmentAction::Drop,
            APP0 if keep_app0 => SegmentAction::Keep,
            APP0..=APP15 => SegmentAction::Drop,
            _ => SegmentAction::Keep,
        },
    }
}

/// Read a big-endian u16 at `pos`, if both bytes are present.
#[inline]
pub(crate) fn read_u16(data: &[u8], pos: usize) -> Option<u16> {
    let bytes = data.get(pos..pos.checked_add(2)?)?;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify(0x00), MarkerKind::Stuffing);
        for rst in RST0..=RST7 {
            assert_eq!(classify(rst), MarkerKind::Restart);
        }
        assert_eq!(classify(SOI), MarkerKind::Standalone);
        assert_eq!(classify(EOI), MarkerKind::EndOfImage);
        assert_eq!(classify(SOS), MarkerKind::StartOfScan);
        assert_eq!(classify(0xDB), MarkerKind::Segment);
        assert_eq!(classify(SOF0), MarkerKind::Segment);
    }

    #[test]
    fn test_sof_ranges() {
        let checked: Vec<u8> = (0..=255).filter(|&m| is_checked_sof(m)).collect();
        assert_eq!(checked, vec![0xC0, 0xC1, 0xC2]);

        let any: Vec<u8> = (0..=255).filter(|&m| is_any_sof(m)).collect();
        assert_eq!(
            any,
            vec![0xC0, 0xC1, 0xC2, 0xC3, 0xC5, 0xC6, 0xC7, 0xC9, 0xCA, 0xCB, 0xCD, 0xCE, 0xCF]
        );
    }

    #[test]
    fn test_segment_action_table() {
        use SegmentAction::*;

        assert_eq!(segment_action(0xD3, true), CopyMarker);
        assert_eq!(segment_action(EOI, false), CopyAndStop);
        assert_eq!(segment_action(SOS, false), CopyRemainder);
        assert_eq!(segment_action(COM, true), Drop);
        assert_eq!(segment_action(APP0, true), Keep);
        assert_eq!(segment_action(APP0, false), Drop);
        assert_eq!(segment_action(0xE1, true), Drop);
        assert_eq!(segment_action(APP15, true), Drop);
        assert_eq!(segment_action(0xDB, false), Keep);
        assert_eq!(segment_action(0xC4, false), Keep);
        assert_eq!(segment_action(SOF0, false), Keep);
    }

    #[test]
    fn test_read_u16() {
        assert_eq!(read_u16(&[0x01, 0x02, 0x03], 1), Some(0x0203));
        assert_eq!(read_u16(&[0x01, 0x02], 1), None);
        assert_eq!(read_u16(&[], usize::MAX), None);
    }
}
