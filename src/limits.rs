use crate::error::DecodeError;
use crate::info::ImageDimensions;

/// Resource limits applied after a header read and before any pixel memory
/// is written or allocated.
///
/// All fields default to `None` (no limit).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum memory bytes for output buffer allocation.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// Reject limits that no image could ever satisfy.
    pub(crate) fn validate(&self) -> Result<(), DecodeError> {
        let fields = [
            ("max_width", self.max_width),
            ("max_height", self.max_height),
            ("max_pixels", self.max_pixels),
            ("max_memory_bytes", self.max_memory_bytes),
        ];
        for (name, value) in fields {
            if value == Some(0) {
                return Err(DecodeError::Init(format!("{name} must be non-zero")));
            }
        }
        Ok(())
    }

    /// Check dimensions against limits. Returns Ok(()) or LimitExceeded error.
    pub(crate) fn check(&self, dims: ImageDimensions) -> Result<(), DecodeError> {
        let ImageDimensions { width, height } = dims;
        if let Some(max_w) = self.max_width {
            if u64::from(width) > max_w {
                return Err(DecodeError::LimitExceeded(format!(
                    "width {width} exceeds limit {max_w}"
                )));
            }
        }
        if let Some(max_h) = self.max_height {
            if u64::from(height) > max_h {
                return Err(DecodeError::LimitExceeded(format!(
                    "height {height} exceeds limit {max_h}"
                )));
            }
        }
        if let Some(max_px) = self.max_pixels {
            let pixels = dims.pixel_count();
            if pixels > max_px {
                return Err(DecodeError::LimitExceeded(format!(
                    "pixel count {pixels} exceeds limit {max_px}"
                )));
            }
        }
        Ok(())
    }

    /// Check that an allocation size is within memory limits.
    pub(crate) fn check_memory(&self, bytes: usize) -> Result<(), DecodeError> {
        if let Some(max_mem) = self.max_memory_bytes {
            if bytes as u64 > max_mem {
                return Err(DecodeError::LimitExceeded(format!(
                    "allocation {bytes} bytes exceeds memory limit {max_mem}"
                )));
            }
        }
        Ok(())
    }

    /// Check dimensions and the size of the RGB buffer they need.
    pub(crate) fn check_rgb(&self, dims: ImageDimensions) -> Result<(), DecodeError> {
        self.check(dims)?;
        self.check_memory(dims.rgb_len().unwrap_or(usize::MAX))
    }
}
