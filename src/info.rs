use core::fmt;

/// Bytes per decoded pixel (R, G, B).
pub const RGB_BYTES_PER_PIXEL: usize = 3;

/// Pixel dimensions read from a JPEG header.
///
/// Both values are positive once returned by a successful header read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Row stride of the packed RGB output, in bytes.
    ///
    /// Returns `None` if it does not fit in `usize`.
    pub fn rgb_stride(&self) -> Option<usize> {
        (self.width as usize).checked_mul(RGB_BYTES_PER_PIXEL)
    }

    /// Exact length of the RGB buffer for these dimensions: `3 * width * height`.
    ///
    /// Returns `None` on overflow.
    pub fn rgb_len(&self) -> Option<usize> {
        self.rgb_stride()?.checked_mul(self.height as usize)
    }

    pub(crate) fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

impl fmt::Display for ImageDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Whether `data` starts with a JPEG start-of-image marker followed by
/// another marker (`FF D8 FF`).
pub fn is_jpeg(data: &[u8]) -> bool {
    data.starts_with(&[0xFF, 0xD8, 0xFF])
}
