//! # zenjpeg-bridge
//!
//! A safe decode boundary for JPEG images: read the pixel dimensions from a
//! header without decoding, then decompress into a caller-owned RGB buffer.
//!
//! ## Contract
//!
//! - Output is packed RGB: 3 bytes per pixel, row-major, row stride
//!   `3 * width`, total length exactly `3 * width * height`.
//! - The output length is validated before the engine runs. A buffer of any
//!   other length is a [`DecodeError::BufferSize`], never a truncated or
//!   overrunning write.
//! - Engine failures surface as values carrying a numeric code and the
//!   engine's own message ([`EngineError`]).
//! - [`JpegDecompressor`] is an owned handle: not `Clone`, consumed by
//!   [`destroy_decoder`], so use after destroy is a compile error.
//!
//! The codec engine is [zune-jpeg](https://github.com/etemesi254/zune-image).
//! All calls are synchronous and run to completion; run them on a blocking
//! thread pool when calling from async code.
//!
//! ## Non-Goals
//!
//! - Implementing JPEG decoding itself
//! - Output formats other than RGB8
//! - Cancelling a decode that has already started
//!
//! ## Usage
//!
//! ```no_run
//! use zenjpeg_bridge::{create_decoder, decompress, destroy_decoder, read_dimensions};
//!
//! let jpeg: &[u8] = &[]; // your JPEG bytes
//!
//! let mut decoder = create_decoder()?;
//! let dims = read_dimensions(&mut decoder, jpeg)?;
//! let mut rgb = vec![0u8; dims.rgb_len().unwrap()];
//! decompress(&mut decoder, jpeg, dims.width, dims.height, &mut rgb)?;
//! destroy_decoder(decoder);
//!
//! // Or, allocating for you:
//! let decoded = zenjpeg_bridge::decode(jpeg, enough::Unstoppable)?;
//! println!("{}x{}", decoded.width, decoded.height);
//! # Ok::<(), zenjpeg_bridge::DecodeError>(())
//! ```

#![forbid(unsafe_code)]

mod decode;
mod decompressor;
mod error;
mod info;
mod limits;
mod markers;
mod pixel;
mod pool;

// Re-exports
pub use decode::{DecodeOutput, DecodeRequest};
pub use decompressor::{DecoderConfig, JpegDecompressor};
pub use enough::{Stop, Unstoppable};
pub use error::{DecodeError, EngineError, code};
pub use info::{ImageDimensions, RGB_BYTES_PER_PIXEL, is_jpeg};
pub use limits::Limits;
pub use pool::with_thread_decompressor;

/// Create a decoder handle with the default configuration.
pub fn create_decoder() -> Result<JpegDecompressor, DecodeError> {
    JpegDecompressor::new()
}

/// Read the dimensions of `image` from its header.
pub fn read_dimensions(
    handle: &mut JpegDecompressor,
    image: &[u8],
) -> Result<ImageDimensions, DecodeError> {
    handle.read_dimensions(image)
}

/// Decode `image` into `out` as packed RGB. See [`JpegDecompressor::decompress`].
pub fn decompress(
    handle: &mut JpegDecompressor,
    image: &[u8],
    width: u32,
    height: u32,
    out: &mut [u8],
) -> Result<(), DecodeError> {
    handle.decompress(image, width, height, out)
}

/// Release a decoder handle.
///
/// ```compile_fail
/// let d = zenjpeg_bridge::create_decoder().unwrap();
/// zenjpeg_bridge::destroy_decoder(d);
/// zenjpeg_bridge::destroy_decoder(d);
/// ```
pub fn destroy_decoder(handle: JpegDecompressor) {
    handle.destroy();
}

/// Decode a JPEG to an owned RGB buffer on this thread's decoder.
pub fn decode(data: &[u8], stop: impl Stop) -> Result<DecodeOutput, DecodeError> {
    DecodeRequest::new(data).decode(stop)
}
