//! Metadata removal for hardware decoders.

use log::{debug, warn};

use super::marker::{read_u16, segment_action, SegmentAction, SOI};

/// Remove COM and APPn segments from a JPEG.
///
/// APP0 (JFIF) survives when `keep_app0` is set. Input that does not start
/// with SOI is returned unchanged. Everything from SOS onwards, the
/// entropy-coded data included, is copied verbatim and never parsed.
///
/// A segment whose declared length runs past the end of the input stops the
/// rewrite; whatever was produced up to that point is returned.
pub fn strip(jpeg: &[u8], keep_app0: bool) -> Vec<u8> {
    if !jpeg.starts_with(&[0xFF, SOI]) {
        return jpeg.to_vec();
    }

    let len = jpeg.len();
    let mut out = Vec::with_capacity(len);
    out.extend_from_slice(&[0xFF, SOI]);

    let mut pos = 2;
    while pos < len {
        if jpeg[pos] != 0xFF {
            out.extend_from_slice(&jpeg[pos..]);
            break;
        }
        while pos < len && jpeg[pos] == 0xFF {
            pos += 1;
        }
        if pos >= len {
            break;
        }
        let marker = jpeg[pos];
        pos += 1;

        match segment_action(marker, keep_app0) {
            SegmentAction::CopyMarker => out.extend_from_slice(&[0xFF, marker]),
            SegmentAction::CopyAndStop => {
                out.extend_from_slice(&[0xFF, marker]);
                break;
            }
            SegmentAction::CopyRemainder => {
                if pos + 1 >= len {
                    warn!("Truncated SOS header at offset {}", pos - 2);
                    break;
                }
                out.extend_from_slice(&[0xFF, marker]);
                out.extend_from_slice(&jpeg[pos..]);
                break;
            }
            action @ (SegmentAction::Keep | SegmentAction::Drop) => {
                let end = match read_u16(jpeg, pos) {
                    Some(length) if length >= 2 => pos + length as usize,
                    _ => {
                        warn!("Malformed segment 0x{:02X} at offset {}", marker, pos - 2);
                        break;
                    }
                };
                if end > len {
                    warn!(
                        "Segment 0x{:02X} at offset {} runs {} bytes past the end",
                        marker,
                        pos - 2,
                        end - len
                    );
                    break;
                }
                if action == SegmentAction::Keep {
                    out.extend_from_slice(&[0xFF, marker]);
                    out.extend_from_slice(&jpeg[pos..end]);
                } else {
                    debug!("Dropped segment 0x{:02X} ({} bytes)", marker, end - pos + 2);
                }
                pos = end;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::super::scan::{find_frame_info, is_baseline_420};
    use super::*;

    fn with_metadata() -> Vec<u8> {
        let mut jpeg = vec![0xFF, 0xD8];
        jpeg.extend(app0());
        jpeg.extend(segment(0xE1, b"Exif\0\0MM\0*"));
        jpeg.extend(segment(0xE2, b"ICC_PROFILE\0"));
        jpeg.extend(segment(0xFE, b"made by a camera"));
        jpeg.extend(dqt());
        jpeg.extend(sof(0xC0, 8, 16, 16, &[(1, 2, 2), (2, 1, 1), (3, 1, 1)]));
        jpeg.extend(dht());
        jpeg.extend(segment(0xDD, &[0x00, 0x04]));
        jpeg.extend(segment(0xED, b"Photoshop 3.0\0"));
        jpeg.extend(sos());
        jpeg.extend_from_slice(SCAN_DATA);
        jpeg.extend([0xFF, 0xD9]);
        jpeg
    }

    fn without_metadata(keep_app0: bool) -> Vec<u8> {
        let mut jpeg = vec![0xFF, 0xD8];
        if keep_app0 {
            jpeg.extend(app0());
        }
        jpeg.extend(dqt());
        jpeg.extend(sof(0xC0, 8, 16, 16, &[(1, 2, 2), (2, 1, 1), (3, 1, 1)]));
        jpeg.extend(dht());
        jpeg.extend(segment(0xDD, &[0x00, 0x04]));
        jpeg.extend(sos());
        jpeg.extend_from_slice(SCAN_DATA);
        jpeg.extend([0xFF, 0xD9]);
        jpeg
    }

    #[test]
    fn test_strip_keeps_app0() {
        assert_eq!(strip(&with_metadata(), true), without_metadata(true));
    }

    #[test]
    fn test_strip_drops_app0() {
        assert_eq!(strip(&with_metadata(), false), without_metadata(false));
    }

    #[test]
    fn test_non_jpeg_returned_unchanged() {
        assert_eq!(strip(b"qoif....", true), b"qoif....".to_vec());
        assert_eq!(strip(&[], true), Vec::<u8>::new());
        assert_eq!(strip(&[0xFF], false), vec![0xFF]);
    }

    #[test]
    fn test_scan_data_is_opaque() {
        // Marker-like bytes after SOS must survive untouched
        let mut jpeg = vec![0xFF, 0xD8];
        jpeg.extend(sos());
        let tail = [0x01, 0xFF, 0xE1, 0x00, 0x04, 0xAA, 0xBB, 0xFF, 0xFE, 0x00, 0xFF, 0xD9];
        jpeg.extend_from_slice(&tail);
        assert_eq!(strip(&jpeg, false), jpeg);
    }

    #[test]
    fn test_restart_markers_pass_through() {
        let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xD0, 0xFF, 0xD7];
        jpeg.extend(segment(0xFE, b"x"));
        jpeg.extend([0xFF, 0xD9]);
        assert_eq!(
            strip(&jpeg, true),
            vec![0xFF, 0xD8, 0xFF, 0xD0, 0xFF, 0xD7, 0xFF, 0xD9]
        );
    }

    #[test]
    fn test_stops_at_eoi() {
        let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xD9];
        jpeg.extend(segment(0xDB, &[0; 4]));
        assert_eq!(strip(&jpeg, true), vec![0xFF, 0xD8, 0xFF, 0xD9]);
    }

    #[test]
    fn test_truncated_segment_returns_prefix() {
        let mut jpeg = vec![0xFF, 0xD8];
        jpeg.extend(dqt());
        // APP1 declares 0x100 bytes, only 3 present
        jpeg.extend([0xFF, 0xE1, 0x01, 0x00, 1, 2, 3]);

        let mut expected = vec![0xFF, 0xD8];
        expected.extend(dqt());
        assert_eq!(strip(&jpeg, true), expected);
    }

    #[test]
    fn test_stray_stuffing_is_bare_marker() {
        // FF 00 before SOS has no length field; the COM after it is still dropped
        let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0x00];
        jpeg.extend(segment(0xFE, b"note"));
        jpeg.extend(dqt());
        jpeg.extend([0xFF, 0xD9]);

        let mut expected = vec![0xFF, 0xD8, 0xFF, 0x00];
        expected.extend(dqt());
        expected.extend([0xFF, 0xD9]);
        assert_eq!(strip(&jpeg, true), expected);
    }

    #[test]
    fn test_fill_bytes_are_collapsed() {
        let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xFF];
        jpeg.extend(dqt());
        jpeg.extend([0xFF, 0xD9]);

        let mut expected = vec![0xFF, 0xD8];
        expected.extend(dqt());
        expected.extend([0xFF, 0xD9]);
        assert_eq!(strip(&jpeg, true), expected);
    }

    #[test]
    fn test_stripped_stream_still_parses() {
        let stripped = strip(&with_metadata(), false);
        let info = find_frame_info(&stripped).unwrap();
        assert_eq!((info.width, info.height), (16, 16));
        assert!(is_baseline_420(&stripped));
    }

    #[test]
    fn test_minimal_jpeg_with_app0_is_unchanged() {
        assert_eq!(strip(MINIMAL_JPEG, true), MINIMAL_JPEG.to_vec());
        // Without APP0 the 18-byte JFIF segment disappears
        assert_eq!(strip(MINIMAL_JPEG, false).len(), MINIMAL_JPEG.len() - 18);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
