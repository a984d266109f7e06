#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Allocating path on the thread's handle — must never panic
    let _ = zenjpeg_bridge::decode(data, enough::Unstoppable);
    let _ = zenjpeg_bridge::DecodeRequest::new(data).probe();
});
