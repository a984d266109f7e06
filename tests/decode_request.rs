//! Allocating decode path and agreement with a reference decoder.

use enough::Unstoppable;
use image::ExtendedColorType;
use image::codecs::jpeg::JpegEncoder;
use zenjpeg_bridge::*;

fn checkerboard(w: u32, h: u32) -> Vec<u8> {
    let mut pixels = vec![0u8; (w * h * 3) as usize];
    for y in 0..h {
        for x in 0..w {
            let off = ((y * w + x) * 3) as usize;
            if (x / 4 + y / 4) % 2 == 0 {
                pixels[off..off + 3].copy_from_slice(&[230, 40, 20]);
            } else {
                pixels[off..off + 3].copy_from_slice(&[20, 60, 210]);
            }
        }
    }
    pixels
}

fn gradient(w: u32, h: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((w * h * 3) as usize);
    for y in 0..h {
        for x in 0..w {
            pixels.push((x * 255 / w) as u8);
            pixels.push((y * 255 / h) as u8);
            pixels.push(128);
        }
    }
    pixels
}

fn encode_jpeg(pixels: &[u8], w: u32, h: u32) -> Vec<u8> {
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, 90)
        .encode(pixels, w, h, ExtendedColorType::Rgb8)
        .unwrap();
    out
}

#[test]
fn decode_allocates_exact_rgb_buffer() {
    let jpeg = encode_jpeg(&checkerboard(16, 8), 16, 8);
    let decoded = decode(&jpeg, Unstoppable).unwrap();
    assert_eq!((decoded.width, decoded.height), (16, 8));
    assert_eq!(decoded.stride(), 48);
    assert_eq!(decoded.pixels().len(), 16 * 8 * 3);
}

#[test]
fn matches_reference_decoder() {
    let jpeg = encode_jpeg(&gradient(24, 20), 24, 20);
    let ours = decode(&jpeg, Unstoppable).unwrap();
    let reference = image::load_from_memory(&jpeg).unwrap().to_rgb8();

    assert_eq!(ours.width, reference.width());
    assert_eq!(ours.height, reference.height());
    assert_eq!(ours.pixels().len(), reference.as_raw().len());
    let total: u64 = ours
        .pixels()
        .iter()
        .zip(reference.as_raw())
        .map(|(a, b)| u64::from(a.abs_diff(*b)))
        .sum();
    let mean = total as f64 / ours.pixels().len() as f64;
    assert!(mean <= 2.0, "mean channel difference {mean}");
}

#[test]
fn request_matches_handle_path() {
    let jpeg = encode_jpeg(&checkerboard(9, 9), 9, 9);
    let via_request = DecodeRequest::new(&jpeg).decode(Unstoppable).unwrap();

    let mut d = create_decoder().unwrap();
    let dims = read_dimensions(&mut d, &jpeg).unwrap();
    let mut out = vec![0u8; dims.rgb_len().unwrap()];
    decompress(&mut d, &jpeg, dims.width, dims.height, &mut out).unwrap();
    destroy_decoder(d);

    assert_eq!(via_request.pixels(), &out[..]);
    assert_eq!(via_request.into_pixels(), out);
}

#[test]
fn probe_reports_dimensions() {
    let jpeg = encode_jpeg(&checkerboard(5, 11), 5, 11);
    let dims = DecodeRequest::new(&jpeg).probe().unwrap();
    assert_eq!(dims, ImageDimensions::new(5, 11));
}

#[test]
fn memory_limit_stops_allocation() {
    let jpeg = encode_jpeg(&checkerboard(8, 8), 8, 8);
    let limits = Limits {
        max_memory_bytes: Some(8 * 8 * 3 - 1),
        ..Default::default()
    };
    match DecodeRequest::new(&jpeg).with_limits(&limits).decode(Unstoppable) {
        Err(DecodeError::LimitExceeded(msg)) => assert!(msg.contains("memory")),
        other => panic!("expected LimitExceeded, got {other:?}"),
    }
}

#[test]
fn dimension_limit() {
    let jpeg = encode_jpeg(&checkerboard(8, 8), 8, 8);
    let limits = Limits {
        max_height: Some(7),
        ..Default::default()
    };
    assert!(matches!(
        DecodeRequest::new(&jpeg).with_limits(&limits).decode(Unstoppable),
        Err(DecodeError::LimitExceeded(_))
    ));
}

#[test]
fn non_jpeg_inputs_fail_cleanly() {
    for input in [&b""[..], &b"\xff\xd8"[..], &b"BM\x00\x00"[..], &b"P6\n1 1\n255\n"[..]] {
        match decode(input, Unstoppable) {
            Err(DecodeError::HeaderParse(e)) => assert!(!e.message.is_empty()),
            other => panic!("expected HeaderParse for {input:?}, got {other:?}"),
        }
    }
}

#[test]
fn thread_handle_is_reused() {
    let jpeg = encode_jpeg(&checkerboard(4, 4), 4, 4);
    let first = decode(&jpeg, Unstoppable).unwrap();
    let dims = with_thread_decompressor(|d| d.read_dimensions(&jpeg)).unwrap();
    let second = decode(&jpeg, Unstoppable).unwrap();
    assert_eq!(dims, first.dimensions());
    assert_eq!(first, second);
}

#[cfg(feature = "rgb")]
#[test]
fn typed_rgb_view() {
    let jpeg = encode_jpeg(&checkerboard(8, 8), 8, 8);
    let decoded = decode(&jpeg, Unstoppable).unwrap();
    let px = decoded.as_pixels();
    assert_eq!(px.len(), 64);
    assert!(px[0].r > 150 && px[0].b < 100, "got {:?}", px[0]);
}

#[cfg(feature = "imgref")]
#[test]
fn imgref_view() {
    let jpeg = encode_jpeg(&checkerboard(8, 4), 8, 4);
    let decoded = decode(&jpeg, Unstoppable).unwrap();
    let img = decoded.as_imgref();
    assert_eq!((img.width(), img.height()), (8, 4));
    let owned = decoded.to_imgvec();
    assert_eq!(owned.buf().len(), 32);
}
