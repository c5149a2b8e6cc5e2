//! QOI operations and the per-pixel selection rule.

use crate::pixel::Pixel;

pub const QOI_OP_INDEX: u8 = 0x00;
pub const QOI_OP_DIFF: u8 = 0x40;
pub const QOI_OP_LUMA: u8 = 0x80;
pub const QOI_OP_RUN: u8 = 0xC0;
pub const QOI_OP_RGB: u8 = 0xFE;
pub const QOI_OP_RGBA: u8 = 0xFF;

/// Longest run a single RUN operation can carry.
pub const MAX_RUN: u8 = 62;

/// One encoded QOI chunk, carrying only the fields it writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QoiOp {
    /// Repeat the previous pixel `length` times (1..=62).
    Run { length: u8 },
    /// Reuse the index cache slot `index` (0..64).
    Index { index: u8 },
    /// Small per-channel delta, each in -2..=1.
    Diff { dr: i8, dg: i8, db: i8 },
    /// Green delta in -32..=31, red/blue relative to green in -8..=7.
    Luma { dg: i8, dr_dg: i8, db_dg: i8 },
    /// Literal color, alpha unchanged.
    Rgb { r: u8, g: u8, b: u8 },
    /// Literal color with new alpha.
    Rgba { r: u8, g: u8, b: u8, a: u8 },
}

impl QoiOp {
    /// Number of bytes this operation occupies in the stream.
    pub fn encoded_len(&self) -> usize {
        match self {
            QoiOp::Run { .. } | QoiOp::Index { .. } | QoiOp::Diff { .. } => 1,
            QoiOp::Luma { .. } => 2,
            QoiOp::Rgb { .. } => 4,
            QoiOp::Rgba { .. } => 5,
        }
    }

    /// Append the wire bytes for this operation.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        match *self {
            QoiOp::Run { length } => {
                debug_assert!((1..=MAX_RUN).contains(&length));
                out.push(QOI_OP_RUN | (length - 1));
            }
            QoiOp::Index { index } => out.push(QOI_OP_INDEX | index),
            QoiOp::Diff { dr, dg, db } => {
                let bias = |d: i8| (d + 2) as u8;
                out.push(QOI_OP_DIFF | (bias(dr) << 4) | (bias(dg) << 2) | bias(db));
            }
            QoiOp::Luma { dg, dr_dg, db_dg } => {
                out.push(QOI_OP_LUMA | (dg + 32) as u8);
                out.push((((dr_dg + 8) as u8) << 4) | (db_dg + 8) as u8);
            }
            QoiOp::Rgb { r, g, b } => out.extend_from_slice(&[QOI_OP_RGB, r, g, b]),
            QoiOp::Rgba { r, g, b, a } => out.extend_from_slice(&[QOI_OP_RGBA, r, g, b, a]),
        }
    }
}

/// Choose the operation for a pixel that differs from `prev`.
///
/// `cached` is the current occupant of the index slot `px.index_hash()`. A hit
/// needs exact equality; anything else is a miss and the caller must store
/// `px` into that slot. Runs are handled by the caller before this is reached.
pub fn select_op(prev: Pixel, px: Pixel, cached: Pixel) -> QoiOp {
    if cached == px {
        return QoiOp::Index {
            index: px.index_hash(),
        };
    }

    if px.a != prev.a {
        return QoiOp::Rgba {
            r: px.r,
            g: px.g,
            b: px.b,
            a: px.a,
        };
    }

    let dr = i16::from(px.r) - i16::from(prev.r);
    let dg = i16::from(px.g) - i16::from(prev.g);
    let db = i16::from(px.b) - i16::from(prev.b);

    if in_diff_range(dr) && in_diff_range(dg) && in_diff_range(db) {
        return QoiOp::Diff {
            dr: dr as i8,
            dg: dg as i8,
            db: db as i8,
        };
    }

    let dr_dg = dr - dg;
    let db_dg = db - dg;
    if (-32..=31).contains(&dg) && (-8..=7).contains(&dr_dg) && (-8..=7).contains(&db_dg) {
        return QoiOp::Luma {
            dg: dg as i8,
            dr_dg: dr_dg as i8,
            db_dg: db_dg as i8,
        };
    }

    QoiOp::Rgb {
        r: px.r,
        g: px.g,
        b: px.b,
    }
}

#[inline]
fn in_diff_range(d: i16) -> bool {
    (-2..=1).contains(&d)
}
