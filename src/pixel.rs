//! Pixel layout helpers for the engine's output.

use zune_core::colorspace::ColorSpace;

/// How the engine lays out one decoded pixel, as far as the bridge cares.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EngineLayout {
    /// 3 channels, 8-bit RGB. Written straight into the caller buffer.
    Rgb8,
    /// Single channel, 8-bit grayscale. Expanded to RGB in place.
    Gray8,
}

impl EngineLayout {
    /// Classify the engine's reported output color space.
    pub(crate) fn from_colorspace(cs: ColorSpace) -> Option<Self> {
        match cs {
            ColorSpace::RGB => Some(Self::Rgb8),
            ColorSpace::Luma => Some(Self::Gray8),
            _ => None,
        }
    }

    pub(crate) fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgb8 => 3,
            Self::Gray8 => 1,
        }
    }
}

/// Expand `pixels` gray samples stored at the front of `buf` into packed RGB
/// filling `buf[..pixels * 3]`.
///
/// Walks backwards so no source sample is overwritten before it is read.
pub(crate) fn expand_gray_in_place(buf: &mut [u8], pixels: usize) {
    debug_assert!(buf.len() >= pixels * 3);
    for i in (0..pixels).rev() {
        let v = buf[i];
        let off = i * 3;
        buf[off] = v;
        buf[off + 1] = v;
        buf[off + 2] = v;
    }
}
