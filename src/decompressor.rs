//! The JPEG decoder handle.
//!
//! A [`JpegDecompressor`] owns one engine context: the engine's decode
//! options, the caller's resource limits, and the most recent engine failure.
//! Every operation borrows the handle mutably, so one handle is never driven
//! from two places at once; independent handles share nothing.

use zune_core::colorspace::ColorSpace;
use zune_core::options::DecoderOptions;
use zune_jpeg::JpegDecoder;

use crate::error::{DecodeError, EngineError, code};
use crate::info::{ImageDimensions, RGB_BYTES_PER_PIXEL};
use crate::limits::Limits;
use crate::markers::check_complete;
use crate::pixel::{EngineLayout, expand_gray_in_place};

/// Largest width or height a JPEG frame header can declare.
const JPEG_MAX_DIMENSION: usize = u16::MAX as usize;

/// Configuration for a [`JpegDecompressor`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Limits checked after every header read.
    pub limits: Limits,
    /// Run the engine in strict mode, turning some recoverable stream
    /// defects into errors. Truncated streams are rejected either way.
    pub strict: bool,
}

impl DecoderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// An owned JPEG decoder handle.
///
/// Created by [`JpegDecompressor::new`] (or [`crate::create_decoder`]) and
/// released by [`JpegDecompressor::destroy`] (or simply dropping it). The
/// handle is neither `Clone` nor `Copy`; `destroy` consumes it, so using a
/// handle after destroying it does not compile:
///
/// ```compile_fail
/// let mut d = zenjpeg_bridge::JpegDecompressor::new().unwrap();
/// d.destroy();
/// let _ = d.read_dimensions(&[0xFF, 0xD8, 0xFF]);
/// ```
///
/// ```compile_fail
/// let d = zenjpeg_bridge::JpegDecompressor::new().unwrap();
/// let copy = d.clone();
/// ```
#[derive(Debug)]
pub struct JpegDecompressor {
    options: DecoderOptions,
    limits: Limits,
    last_error: Option<EngineError>,
}

impl JpegDecompressor {
    /// Create a handle with default configuration.
    pub fn new() -> Result<Self, DecodeError> {
        Self::with_config(DecoderConfig::default())
    }

    /// Create a handle with the given configuration.
    ///
    /// Fails with [`DecodeError::Init`] if the configuration cannot be
    /// applied to the engine.
    pub fn with_config(config: DecoderConfig) -> Result<Self, DecodeError> {
        config.limits.validate()?;
        let options = DecoderOptions::default()
            .jpeg_set_out_colorspace(ColorSpace::RGB)
            .set_strict_mode(config.strict)
            .set_max_width(JPEG_MAX_DIMENSION)
            .set_max_height(JPEG_MAX_DIMENSION);
        log::trace!("created jpeg decompressor (strict: {})", config.strict);
        Ok(Self {
            options,
            limits: config.limits,
            last_error: None,
        })
    }

    /// Limits this handle enforces.
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// The engine failure from the most recent operation on this handle.
    ///
    /// Cleared when the next operation starts; `None` after a success.
    pub fn last_error(&self) -> Option<&EngineError> {
        self.last_error.as_ref()
    }

    /// Parse only the header of `data` and return its pixel dimensions.
    ///
    /// No pixel memory is touched. Empty, truncated, or non-JPEG input fails
    /// with [`DecodeError::HeaderParse`] carrying the engine's code and
    /// message; dimensions or an RGB buffer size over the configured limits
    /// fail with [`DecodeError::LimitExceeded`].
    pub fn read_dimensions(&mut self, data: &[u8]) -> Result<ImageDimensions, DecodeError> {
        self.last_error = None;
        let result = self
            .probe(data)
            .map_err(DecodeError::HeaderParse)
            .and_then(|dims| {
                self.limits.check_rgb(dims)?;
                Ok(dims)
            });
        self.track(result)
    }

    /// Decode `data` into `out` as packed RGB, 3 bytes per pixel, row stride
    /// `3 * width`.
    ///
    /// `out.len()` must equal `3 * width * height`; anything else fails with
    /// [`DecodeError::BufferSize`] before the engine runs and `out` is left
    /// untouched. `width` and `height` must match the header of `data`,
    /// otherwise [`DecodeError::DimensionMismatch`]. A stream whose last scan
    /// is not followed by an EOI marker fails with [`DecodeError::Decompress`]
    /// and code [`code::TRUNCATED`] before any pixel is written. Other engine
    /// failures also yield [`DecodeError::Decompress`]; the contents of `out`
    /// are then unspecified.
    pub fn decompress(
        &mut self,
        data: &[u8],
        width: u32,
        height: u32,
        out: &mut [u8],
    ) -> Result<(), DecodeError> {
        self.last_error = None;
        let requested = ImageDimensions::new(width, height);
        let expected = requested.rgb_len().unwrap_or(usize::MAX);
        if out.len() != expected {
            let err = DecodeError::BufferSize {
                expected,
                actual: out.len(),
            };
            return self.track(Err(err));
        }
        let result = self.decode_rgb(data, requested, out);
        self.track(result)
    }

    /// Release the engine context. The handle cannot be used afterwards.
    pub fn destroy(self) {
        drop(self);
    }

    fn probe(&self, data: &[u8]) -> Result<ImageDimensions, EngineError> {
        if data.is_empty() {
            return Err(EngineError::new(code::EMPTY_INPUT, "empty input"));
        }
        let mut engine = JpegDecoder::new_with_options(data, self.options);
        engine.decode_headers()?;
        header_dimensions(engine.dimensions())
    }

    fn decode_rgb(
        &self,
        data: &[u8],
        requested: ImageDimensions,
        out: &mut [u8],
    ) -> Result<(), DecodeError> {
        if data.is_empty() {
            return Err(DecodeError::Decompress(EngineError::new(
                code::EMPTY_INPUT,
                "empty input",
            )));
        }
        let mut engine = JpegDecoder::new_with_options(data, self.options);
        engine
            .decode_headers()
            .map_err(|e| DecodeError::Decompress(e.into()))?;
        let image = header_dimensions(engine.dimensions()).map_err(DecodeError::Decompress)?;
        if image != requested {
            return Err(DecodeError::DimensionMismatch { requested, image });
        }
        self.limits.check_rgb(image)?;
        check_complete(data).map_err(DecodeError::Decompress)?;

        let colorspace = engine.get_output_colorspace();
        let layout = colorspace.and_then(EngineLayout::from_colorspace).ok_or_else(|| {
            DecodeError::Decompress(EngineError::new(
                code::LAYOUT,
                format!("unsupported output color space {colorspace:?}"),
            ))
        })?;

        // out.len() == 3 * pixels was checked by the caller.
        let pixels = out.len() / RGB_BYTES_PER_PIXEL;
        let engine_len = pixels * layout.bytes_per_pixel();
        if engine.output_buffer_size() != Some(engine_len) {
            return Err(DecodeError::Decompress(EngineError::new(
                code::LAYOUT,
                format!(
                    "engine output size {:?} does not match {layout:?} at {image}",
                    engine.output_buffer_size()
                ),
            )));
        }

        engine
            .decode_into(&mut out[..engine_len])
            .map_err(|e| DecodeError::Decompress(e.into()))?;
        if layout == EngineLayout::Gray8 {
            expand_gray_in_place(out, pixels);
        }
        log::trace!("decoded {image} jpeg ({layout:?}) into {} bytes", out.len());
        Ok(())
    }

    /// Record the engine failure (if any) behind `result` as this handle's
    /// last error.
    fn track<T>(&mut self, result: Result<T, DecodeError>) -> Result<T, DecodeError> {
        if let Err(err) = &result {
            log::debug!("jpeg decode boundary: {err}");
            self.last_error = err.engine_error().cloned();
        }
        result
    }
}

impl Drop for JpegDecompressor {
    fn drop(&mut self) {
        log::trace!("destroyed jpeg decompressor");
    }
}

fn header_dimensions(dims: Option<(usize, usize)>) -> Result<ImageDimensions, EngineError> {
    let (width, height) = dims.ok_or_else(|| {
        EngineError::new(code::MALFORMED, "engine reported no frame dimensions")
    })?;
    if width == 0 || height == 0 {
        return Err(EngineError::new(
            code::ZERO_DIMENSION,
            format!("header declares {width}x{height}"),
        ));
    }
    let too_large = || EngineError::new(code::TOO_LARGE, format!("{width}x{height}"));
    Ok(ImageDimensions::new(
        u32::try_from(width).map_err(|_| too_large())?,
        u32::try_from(height).map_err(|_| too_large())?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send<T: Send>() {}

    #[test]
    fn handle_is_send() {
        assert_send::<JpegDecompressor>();
    }

    #[test]
    fn empty_input_is_header_error() {
        let mut d = JpegDecompressor::new().unwrap();
        match d.read_dimensions(&[]) {
            Err(DecodeError::HeaderParse(e)) => assert_eq!(e.code, code::EMPTY_INPUT),
            other => panic!("expected HeaderParse, got {other:?}"),
        }
        assert_eq!(d.last_error().map(|e| e.code), Some(code::EMPTY_INPUT));
    }

    #[test]
    fn buffer_checked_before_engine() {
        let mut d = JpegDecompressor::new().unwrap();
        let mut out = [0xAAu8; 10];
        match d.decompress(b"not a jpeg", 2, 2, &mut out) {
            Err(DecodeError::BufferSize { expected, actual }) => {
                assert_eq!(expected, 12);
                assert_eq!(actual, 10);
            }
            other => panic!("expected BufferSize, got {other:?}"),
        }
        assert_eq!(out, [0xAA; 10]);
        assert!(d.last_error().is_none());
    }

    #[test]
    fn overflowing_dimensions_are_buffer_errors() {
        let mut d = JpegDecompressor::new().unwrap();
        let mut out = [0u8; 3];
        assert!(matches!(
            d.decompress(&[0xFF, 0xD8, 0xFF], u32::MAX, u32::MAX, &mut out),
            Err(DecodeError::BufferSize { .. })
        ));
    }

    #[test]
    fn zero_limit_fails_init() {
        let config = DecoderConfig::new().with_limits(Limits {
            max_width: Some(0),
            ..Default::default()
        });
        assert!(matches!(
            JpegDecompressor::with_config(config),
            Err(DecodeError::Init(_))
        ));
    }

    #[test]
    fn header_dimensions_rejects_zero_and_missing() {
        assert_eq!(
            header_dimensions(Some((0, 5))).unwrap_err().code,
            code::ZERO_DIMENSION
        );
        assert_eq!(header_dimensions(None).unwrap_err().code, code::MALFORMED);
        assert_eq!(
            header_dimensions(Some((3, 4))).unwrap(),
            ImageDimensions::new(3, 4)
        );
    }
}
