//! JPEG marker walk used to confirm a stream is complete before decoding.
//!
//! The engine pads out missing entropy data instead of failing, so a cut
//! stream would otherwise decode to invented pixels. This walks the segment
//! structure and every scan's entropy-coded data up to EOI without decoding
//! anything.

use crate::error::{EngineError, code};

const SOI: u8 = 0xD8;
const EOI: u8 = 0xD9;
const SOS: u8 = 0xDA;
const TEM: u8 = 0x01;

/// Check that `data` holds at least one scan and ends its last scan with an
/// EOI marker. Bytes after EOI are ignored.
pub(crate) fn check_complete(data: &[u8]) -> Result<(), EngineError> {
    if !data.starts_with(&[0xFF, SOI]) {
        return Err(EngineError::new(
            code::NOT_JPEG,
            "missing start-of-image marker",
        ));
    }
    let truncated = |at: usize| {
        EngineError::new(
            code::TRUNCATED,
            format!("premature end of jpeg data at offset {at}"),
        )
    };

    let mut pos = 2;
    let mut scans = 0usize;
    loop {
        // Stray bytes between segments are skipped, as are 0xFF fill bytes.
        while data.get(pos).is_some_and(|&b| b != 0xFF) {
            pos += 1;
        }
        while data.get(pos) == Some(&0xFF) {
            pos += 1;
        }
        let Some(&marker) = data.get(pos) else {
            return Err(truncated(data.len()));
        };
        pos += 1;

        match marker {
            EOI if scans > 0 => return Ok(()),
            EOI => {
                return Err(EngineError::new(
                    code::TRUNCATED,
                    "end of image before any scan data",
                ));
            }
            TEM | 0xD0..=0xD7 => continue,
            _ => {}
        }

        let len = match data.get(pos..pos + 2) {
            Some(&[hi, lo]) => usize::from(u16::from_be_bytes([hi, lo])),
            _ => return Err(truncated(data.len())),
        };
        if len < 2 {
            return Err(EngineError::new(
                code::MALFORMED,
                format!("segment 0x{marker:02X} at offset {pos} has length {len}"),
            ));
        }
        pos += len;
        if pos > data.len() {
            return Err(truncated(data.len()));
        }

        if marker == SOS {
            scans += 1;
            pos = skip_entropy_data(data, pos).ok_or_else(|| truncated(data.len()))?;
        }
    }
}

/// Offset of the first marker after entropy-coded data starting at `pos`,
/// or `None` if the data runs to the end of the stream.
///
/// Stuffed zeros (`FF 00`) and restart markers (`FF D0`..`FF D7`) belong to
/// the scan.
fn skip_entropy_data(data: &[u8], mut pos: usize) -> Option<usize> {
    while pos + 1 < data.len() {
        if data[pos] != 0xFF {
            pos += 1;
            continue;
        }
        match data[pos + 1] {
            0x00 | 0xD0..=0xD7 => pos += 2,
            0xFF => pos += 1,
            _ => return Some(pos),
        }
    }
    None
}
