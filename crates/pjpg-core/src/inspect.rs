//! Read-only identification of QOI, PJPG and JPEG payloads.

use serde::{Deserialize, Serialize};

use crate::decode::{get_orientation, Orientation};
use crate::jpeg::{classify_conformance, find_frame_info, get_dimensions, Conformance, SofInfo};
use crate::pjpg::{PjpgHeader, PJPG_MAGIC};
use crate::qoi::{QoiHeader, QOI_MAGIC};

/// What [`inspect`] found in a byte stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FileInfo {
    Qoi(QoiHeader),
    Pjpg {
        header: PjpgHeader,
        color: Conformance,
        /// `None` when the container carries no alpha JPEG.
        alpha: Option<Conformance>,
    },
    Jpeg {
        frame: Option<SofInfo>,
        dimensions: Option<(u16, u16)>,
        conformance: Conformance,
        /// EXIF orientation; stripping discards it.
        orientation: Orientation,
    },
    Unknown {
        size: usize,
    },
}

/// Identify `bytes` by magic number and describe its headers.
///
/// A PJPG whose declared sizes run past the end of `bytes` is reported as
/// [`FileInfo::Unknown`].
pub fn inspect(bytes: &[u8]) -> FileInfo {
    if bytes.starts_with(QOI_MAGIC) {
        if let Some(header) = QoiHeader::parse(bytes) {
            return FileInfo::Qoi(header);
        }
    }

    if bytes.starts_with(PJPG_MAGIC) {
        if let Some(header) = PjpgHeader::parse(bytes) {
            let color = classify_conformance(&bytes[header.color_range()]);
            let alpha = (header.alpha_size > 0)
                .then(|| classify_conformance(&bytes[header.alpha_range()]));
            return FileInfo::Pjpg {
                header,
                color,
                alpha,
            };
        }
    }

    if bytes.starts_with(&[0xFF, 0xD8]) {
        return FileInfo::Jpeg {
            frame: find_frame_info(bytes),
            dimensions: get_dimensions(bytes),
            conformance: classify_conformance(bytes),
            orientation: get_orientation(bytes),
        };
    }

    FileInfo::Unknown { size: bytes.len() }
}
