use enough::StopReason;
use zune_jpeg::errors::DecodeErrors;

use crate::info::ImageDimensions;

/// Stable numeric codes carried by [`EngineError`].
///
/// The engine reports failures as typed values; each failure class maps to
/// one code here so callers can branch on an integer without matching engine
/// internals.
pub mod code {
    /// Input was empty.
    pub const EMPTY_INPUT: i32 = 1;
    /// Input does not start with a JPEG start-of-image marker.
    pub const NOT_JPEG: i32 = 2;
    /// A marker segment (SOF, SOS, DQT, DHT, ...) is malformed.
    pub const MALFORMED: i32 = 3;
    /// Huffman-coded entropy data could not be decoded.
    pub const HUFFMAN: i32 = 4;
    /// An MCU could not be reconstructed.
    pub const MCU: i32 = 5;
    /// The stream ended before the engine had what it needed.
    pub const TRUNCATED: i32 = 6;
    /// The stream uses a coding scheme the engine does not support.
    pub const UNSUPPORTED: i32 = 7;
    /// The header declares dimensions the engine refuses to handle.
    pub const TOO_LARGE: i32 = 8;
    /// The engine rejected the output slice it was handed.
    pub const OUTPUT: i32 = 9;
    /// The header declares a zero width or height.
    pub const ZERO_DIMENSION: i32 = 10;
    /// The engine produced a pixel layout that cannot be expressed as RGB.
    pub const LAYOUT: i32 = 11;
    /// Any engine failure without a more specific class.
    pub const OTHER: i32 = 99;
}

/// A failure reported by the codec engine: numeric code plus the engine's
/// own message, verbatim.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("engine error {code}: {message}")]
pub struct EngineError {
    pub code: i32,
    pub message: String,
}

impl EngineError {
    pub(crate) fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<DecodeErrors> for EngineError {
    fn from(err: DecodeErrors) -> Self {
        let code = match &err {
            DecodeErrors::IllegalMagicBytes(_) => code::NOT_JPEG,
            DecodeErrors::Format(msg) if is_end_of_data(msg) => code::TRUNCATED,
            DecodeErrors::FormatStatic(msg) if is_end_of_data(msg) => code::TRUNCATED,
            DecodeErrors::Format(_)
            | DecodeErrors::FormatStatic(_)
            | DecodeErrors::DqtError(_)
            | DecodeErrors::SofError(_)
            | DecodeErrors::SosError(_)
            | DecodeErrors::ZeroError => code::MALFORMED,
            DecodeErrors::HuffmanDecode(_) => code::HUFFMAN,
            DecodeErrors::MCUError(_) => code::MCU,
            DecodeErrors::ExhaustedData => code::TRUNCATED,
            DecodeErrors::Unsupported(_) => code::UNSUPPORTED,
            DecodeErrors::LargeDimensions(_) => code::TOO_LARGE,
            DecodeErrors::TooSmallOutput(..) => code::OUTPUT,
            #[allow(unreachable_patterns)]
            _ => code::OTHER,
        };
        Self::new(code, format!("{err:?}"))
    }
}

/// The engine reports running out of input as a format error; tell those
/// apart by their text.
fn is_end_of_data(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    ["no more bytes", "premature end", "exhausted"]
        .iter()
        .any(|needle| message.contains(needle))
}

/// Errors from the JPEG decode boundary.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DecodeError {
    #[error("decoder initialization failed: {0}")]
    Init(String),

    #[error("invalid jpeg header: {0}")]
    HeaderParse(EngineError),

    #[error("output buffer size mismatch: need {expected} bytes, got {actual}")]
    BufferSize { expected: usize, actual: usize },

    #[error("jpeg decompression failed: {0}")]
    Decompress(EngineError),

    #[error("dimension mismatch: image is {image}, caller passed {requested}")]
    DimensionMismatch {
        requested: ImageDimensions,
        image: ImageDimensions,
    },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl DecodeError {
    /// The engine failure behind this error, if it came from the engine.
    pub fn engine_error(&self) -> Option<&EngineError> {
        match self {
            Self::HeaderParse(e) | Self::Decompress(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StopReason> for DecodeError {
    fn from(r: StopReason) -> Self {
        DecodeError::Cancelled(r)
    }
}
