#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_decode";
    fs::create_dir_all(dir).unwrap();

    // SOI + JFIF APP0, no frame
    let mut jfif = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
    jfif.extend_from_slice(b"JFIF\0");
    jfif.extend_from_slice(&[0x01, 0x01, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00]);
    fs::write(format!("{dir}/jfif_no_frame.jpg"), &jfif).unwrap();

    // SOI + baseline SOF0 declaring 2x2, 3 components, then EOI
    let mut sof = vec![0xFF, 0xD8, 0xFF, 0xC0, 0x00, 0x11, 0x08];
    sof.extend_from_slice(&2u16.to_be_bytes()); // height
    sof.extend_from_slice(&2u16.to_be_bytes()); // width
    sof.extend_from_slice(&[0x03, 0x01, 0x22, 0x00, 0x02, 0x11, 0x01, 0x03, 0x11, 0x01]);
    sof.extend_from_slice(&[0xFF, 0xD9]);
    fs::write(format!("{dir}/sof0_2x2_no_scan.jpg"), &sof).unwrap();

    // SOF0 declaring a zero width
    let mut zero = sof.clone();
    zero[9] = 0;
    zero[10] = 0;
    fs::write(format!("{dir}/sof0_zero_width.jpg"), &zero).unwrap();

    // Truncated/malformed seeds for edge coverage
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();
    fs::write(format!("{dir}/just_soi.bin"), [0xFF, 0xD8]).unwrap();
    fs::write(format!("{dir}/soi_ff.bin"), [0xFF, 0xD8, 0xFF]).unwrap();
    fs::write(format!("{dir}/png_magic.bin"), b"\x89PNG\r\n\x1a\n").unwrap();

    println!("Generated seed corpus in {dir}/");
}
