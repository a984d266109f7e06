#![no_main]
use libfuzzer_sys::fuzz_target;
use zenjpeg_bridge::{DecodeError, JpegDecompressor};

fuzz_target!(|input: (u16, u16, &[u8])| {
    let (width, height, data) = input;
    let Ok(mut d) = JpegDecompressor::new() else {
        return;
    };

    // Caller-chosen dimensions and a buffer sized from them: the handle must
    // either decode or report an error, never write out of bounds or panic.
    let len = 3 * usize::from(width) * usize::from(height);
    if len > 1 << 24 {
        return;
    }
    let mut out = vec![0u8; len];
    let _ = d.decompress(data, u32::from(width), u32::from(height), &mut out);

    // A buffer one byte short is always a size error.
    if len > 0 {
        let mut short = vec![0u8; len - 1];
        let result = d.decompress(data, u32::from(width), u32::from(height), &mut short);
        assert!(matches!(result, Err(DecodeError::BufferSize { .. })));
    }

    if let Ok(dims) = d.read_dimensions(data) {
        assert!(dims.width > 0 && dims.height > 0);
    }
    d.destroy();
});
