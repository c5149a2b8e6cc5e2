//! Streaming QOI encoder state and the whole-image entry points.

use super::header::{Colorspace, QoiHeader, QOI_END_MARKER, QOI_HEADER_LEN};
use super::op::{select_op, QoiOp, MAX_RUN};
use super::QoiError;
use crate::pixel::{expected_len, Channels, Pixel, PixelBuffer};

/// Index cache and run state for a single image.
///
/// A fresh encoder must be used for every image; nothing carries over between
/// calls.
#[derive(Debug, Clone)]
pub struct QoiEncoder {
    index: [Pixel; 64],
    prev: Pixel,
    run: u8,
    processed: usize,
    total: usize,
}

impl QoiEncoder {
    /// Create an encoder for an image of `total` pixels.
    pub fn new(total: usize) -> Self {
        Self {
            index: [Pixel::rgba(0, 0, 0, 0); 64],
            prev: Pixel::rgba(0, 0, 0, 255),
            run: 0,
            processed: 0,
            total,
        }
    }

    /// Feed the next pixel, handing zero, one or two operations to `emit`.
    pub fn push(&mut self, px: Pixel, mut emit: impl FnMut(QoiOp)) {
        self.processed += 1;

        if px == self.prev {
            self.run += 1;
            if self.run == MAX_RUN || self.processed == self.total {
                emit(QoiOp::Run { length: self.run });
                self.run = 0;
            }
            return;
        }

        if self.run > 0 {
            emit(QoiOp::Run { length: self.run });
            self.run = 0;
        }

        let slot = px.index_hash() as usize;
        let op = select_op(self.prev, px, self.index[slot]);
        if !matches!(op, QoiOp::Index { .. }) {
            self.index[slot] = px;
        }
        emit(op);

        self.prev = px;
    }

    /// Flush a pending run. Needed only when fewer than `total` pixels were
    /// pushed; a complete image has already flushed its last run.
    pub fn finish(self, mut emit: impl FnMut(QoiOp)) {
        if self.run > 0 {
            emit(QoiOp::Run { length: self.run });
        }
    }

    /// Number of pixels pushed so far.
    pub fn processed(&self) -> usize {
        self.processed
    }
}

/// Encode a pixel buffer as a complete QOI stream.
pub fn encode(buffer: &PixelBuffer, colorspace: Colorspace) -> Vec<u8> {
    let header = QoiHeader {
        width: buffer.width(),
        height: buffer.height(),
        channels: buffer.channels() as u8,
        colorspace: colorspace.into(),
    };
    encode_pixels(header, buffer.pixel_count(), buffer.pixels())
}

/// Encode raw interleaved bytes.
///
/// # Errors
///
/// Returns `QoiError::InvalidChannels` unless `channels` is 3 or 4, and
/// `QoiError::BufferSizeMismatch` if `data` is not exactly
/// `width * height * channels` bytes.
pub fn encode_raw(
    data: &[u8],
    width: u32,
    height: u32,
    channels: u8,
    colorspace: u8,
) -> Result<Vec<u8>, QoiError> {
    let layout = Channels::try_from(channels).map_err(|_| QoiError::InvalidChannels(channels))?;

    let expected = expected_len(width, height, layout)
        .ok_or(QoiError::DimensionsTooLarge { width, height })?;
    if data.len() != expected {
        return Err(QoiError::BufferSizeMismatch {
            expected,
            actual: data.len(),
        });
    }

    let header = QoiHeader {
        width,
        height,
        channels,
        colorspace,
    };
    let pixels = data.chunks_exact(layout.count()).map(|px| match layout {
        Channels::Rgb => Pixel::rgb(px[0], px[1], px[2]),
        Channels::Rgba => Pixel::rgba(px[0], px[1], px[2], px[3]),
    });
    Ok(encode_pixels(header, expected / layout.count(), pixels))
}

fn encode_pixels(header: QoiHeader, total: usize, pixels: impl Iterator<Item = Pixel>) -> Vec<u8> {
    // Worst case is one RGBA op per pixel
    let mut out = Vec::with_capacity(QOI_HEADER_LEN + total.min(1 << 20) * 5 + QOI_END_MARKER.len());
    out.extend_from_slice(&header.to_bytes());

    let mut encoder = QoiEncoder::new(total);
    for px in pixels {
        encoder.push(px, |op| op.write_to(&mut out));
    }
    debug_assert_eq!(encoder.processed(), total);
    encoder.finish(|op| op.write_to(&mut out));

    out.extend_from_slice(&QOI_END_MARKER);
    out
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for a small image: (width, height, channels, bytes).
    fn image_strategy() -> impl Strategy<Value = (u32, u32, u8, Vec<u8>)> {
        (1u32..=16, 1u32..=16, prop_oneof![Just(3u8), Just(4u8)]).prop_flat_map(
            |(w, h, c)| {
                let size = (w * h * c as u32) as usize;
                (
                    Just(w),
                    Just(h),
                    Just(c),
                    prop::collection::vec(any::<u8>(), size..=size),
                )
            },
        )
    }

    /// Replay the op stream, counting how many pixels it describes.
    fn count_pixels(mut body: &[u8]) -> usize {
        let mut count = 0;
        while let Some(&tag) = body.first() {
            let (len, pixels) = match tag {
                0xFE => (4, 1),
                0xFF => (5, 1),
                t if t & 0xC0 == 0xC0 => (1, (t & 0x3F) as usize + 1),
                t if t & 0xC0 == 0x80 => (2, 1),
                _ => (1, 1),
            };
            count += pixels;
            body = &body[len..];
        }
        count
    }

    proptest! {
        /// Property: output is framed by a matching header and the end marker.
        #[test]
        fn prop_header_and_end_marker((w, h, c, data) in image_strategy()) {
            let out = encode_raw(&data, w, h, c, 0).unwrap();
            let header = QoiHeader::parse(&out).unwrap();
            prop_assert_eq!(header.width, w);
            prop_assert_eq!(header.height, h);
            prop_assert_eq!(header.channels, c);
            prop_assert_eq!(&out[out.len() - 8..], &QOI_END_MARKER);
        }

        /// Property: the op stream describes exactly width * height pixels.
        #[test]
        fn prop_op_stream_covers_every_pixel((w, h, c, data) in image_strategy()) {
            let out = encode_raw(&data, w, h, c, 0).unwrap();
            let body = &out[QOI_HEADER_LEN..out.len() - QOI_END_MARKER.len()];
            prop_assert_eq!(count_pixels(body), (w * h) as usize);
        }

        /// Property: a uniform image is one literal-ish op followed only by runs.
        #[test]
        fn prop_uniform_image_is_runs(
            w in 1u32..=40,
            h in 1u32..=40,
            r in 1u8..=255,
            g in any::<u8>(),
            b in any::<u8>(),
        ) {
            let px = Pixel::rgb(r, g, b);
            let mut encoder = QoiEncoder::new((w * h) as usize);
            let mut ops = Vec::new();
            for _ in 0..w * h {
                encoder.push(px, |op| ops.push(op));
            }

            let literal_first = !matches!(ops[0], QoiOp::Run { .. } | QoiOp::Index { .. });
            prop_assert!(literal_first);
            let mut repeats = 0usize;
            for op in &ops[1..] {
                match *op {
                    QoiOp::Run { length } => {
                        prop_assert!(length <= 62);
                        repeats += length as usize;
                    }
                    other => prop_assert!(false, "unexpected op {:?}", other),
                }
            }
            prop_assert_eq!(repeats, (w * h) as usize - 1);
        }

        /// Property: encoding is deterministic and leaves no state behind.
        #[test]
        fn prop_deterministic((w, h, c, data) in image_strategy()) {
            let first = encode_raw(&data, w, h, c, 0).unwrap();
            let second = encode_raw(&data, w, h, c, 0).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
