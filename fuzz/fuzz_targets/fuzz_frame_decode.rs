//! Fuzz target: thermocouple frame decode.
//!
//! Feeds arbitrary 32-bit frames through both junction decoders and
//! the full compensation path for every alloy, asserting the decoded
//! fields stay inside their representable ranges and the temperature
//! path never panics or overflows to infinity (NaN is legal outside
//! the alloy tables' domains).
//!
//! cargo fuzz run fuzz_frame_decode

#![no_main]

use libfuzzer_sys::fuzz_target;
use thermomux::ProbeType;
use thermomux::max31855::{
    decode_cold_junction, decode_hot_junction, millivolts_to_temperature,
    temperature_to_millivolts,
};

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    let raw = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);

    // 14-bit signed field at 0.25 °C per unit
    let hot = decode_hot_junction(raw);
    assert!((-2048.0..=2047.75).contains(&hot), "hot = {hot}");

    // 12-bit signed field at 0.0625 °C per unit
    let cold = decode_cold_junction(raw);
    assert!((-128.0..=127.9375).contains(&cold), "cold = {cold}");

    for probe in [ProbeType::TcJ, ProbeType::TcK, ProbeType::TcT] {
        let mv = (hot - cold) * 0.041276 + temperature_to_millivolts(probe, cold);
        let t = millivolts_to_temperature(probe, mv);
        assert!(!t.is_infinite(), "{probe:?}: t = {t}");
    }
});
