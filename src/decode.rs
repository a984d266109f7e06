use enough::Stop;

#[cfg(feature = "rgb")]
use rgb::AsPixels as _;

use crate::error::{DecodeError, EngineError, code};
use crate::info::{ImageDimensions, is_jpeg};
use crate::limits::Limits;
use crate::pool::with_thread_decompressor;

/// Decoded RGB image owning its pixel buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeOutput {
    pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl DecodeOutput {
    /// Packed RGB bytes, `3 * width * height` long.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Take the pixel buffer.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    pub fn dimensions(&self) -> ImageDimensions {
        ImageDimensions::new(self.width, self.height)
    }

    /// Row stride in bytes (`3 * width`).
    pub fn stride(&self) -> usize {
        self.width as usize * crate::RGB_BYTES_PER_PIXEL
    }

    /// Reinterpret pixel data as a typed RGB8 slice.
    #[cfg(feature = "rgb")]
    pub fn as_pixels(&self) -> &[rgb::RGB8] {
        self.pixels.as_pixels()
    }

    /// Zero-copy view as an [`imgref::ImgRef`] of RGB8 pixels.
    #[cfg(feature = "imgref")]
    pub fn as_imgref(&self) -> imgref::ImgRef<'_, rgb::RGB8> {
        imgref::ImgRef::new(
            self.as_pixels(),
            self.width as usize,
            self.height as usize,
        )
    }

    /// Convert to an [`imgref::ImgVec`] of RGB8 pixels.
    #[cfg(feature = "imgref")]
    pub fn to_imgvec(&self) -> imgref::ImgVec<rgb::RGB8> {
        imgref::ImgVec::new(
            self.as_pixels().to_vec(),
            self.width as usize,
            self.height as usize,
        )
    }
}

/// One-shot decode of a JPEG into a freshly allocated RGB buffer.
///
/// Runs on this thread's reusable decoder handle. The stop token is checked
/// between engine calls, never inside one.
pub struct DecodeRequest<'a> {
    data: &'a [u8],
    limits: Option<&'a Limits>,
}

impl<'a> DecodeRequest<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, limits: None }
    }

    /// Limits checked after the header read, before the output allocation.
    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Read dimensions only.
    pub fn probe(&self) -> Result<ImageDimensions, DecodeError> {
        self.sniff()?;
        with_thread_decompressor(|d| d.read_dimensions(self.data))
    }

    pub fn decode(self, stop: impl Stop) -> Result<DecodeOutput, DecodeError> {
        self.sniff()?;
        stop.check()?;
        with_thread_decompressor(|d| {
            let dims = d.read_dimensions(self.data)?;
            let len = dims.rgb_len().ok_or_else(|| {
                DecodeError::LimitExceeded(format!("{dims} rgb buffer overflows usize"))
            })?;
            if let Some(limits) = self.limits {
                limits.check_rgb(dims)?;
            }
            stop.check()?;
            let mut pixels = vec![0u8; len];
            d.decompress(self.data, dims.width, dims.height, &mut pixels)?;
            Ok(DecodeOutput {
                pixels,
                width: dims.width,
                height: dims.height,
            })
        })
    }

    fn sniff(&self) -> Result<(), DecodeError> {
        if is_jpeg(self.data) {
            return Ok(());
        }
        let code = if self.data.is_empty() {
            code::EMPTY_INPUT
        } else {
            code::NOT_JPEG
        };
        Err(DecodeError::HeaderParse(EngineError::new(
            code,
            "missing jpeg start-of-image marker",
        )))
    }
}
