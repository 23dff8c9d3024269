//! Fuzz target: alloy curves and Callendar-Van Dusen math.
//!
//! Drives arbitrary floats through the forward/inverse alloy tables
//! and arbitrary codes through the RTD conversion chain, asserting
//! nothing panics and nothing overflows to infinity. NaN is legal only
//! off the tables' domains.
//!
//! cargo fuzz run fuzz_curve_eval

#![no_main]

use libfuzzer_sys::fuzz_target;
use thermomux::ProbeType;
use thermomux::max31855::{millivolts_to_temperature, temperature_to_millivolts};
use thermomux::max31865::{raw_to_resistance, resistance_to_temperature};

fuzz_target!(|data: &[u8]| {
    if data.len() < 13 {
        return;
    }

    let probe = match data[0] % 3 {
        0 => ProbeType::TcJ,
        1 => ProbeType::TcK,
        _ => ProbeType::TcT,
    };
    let value = f64::from_le_bytes([
        data[1], data[2], data[3], data[4], data[5], data[6], data[7], data[8],
    ]);

    let mv = temperature_to_millivolts(probe, value);
    assert!(!mv.is_infinite(), "{probe:?}: mv = {mv}");

    let t = millivolts_to_temperature(probe, value);
    assert!(!t.is_infinite(), "{probe:?}: t = {t}");
    // every alloy's inverse table covers this stretch of millivolts
    if value.is_finite() && (0.0..20.0).contains(&value) {
        assert!(t.is_finite(), "{probe:?}: in-domain {value} decoded to {t}");
    }

    let code = u16::from_le_bytes([data[9], data[10]]) & 0x7FFF;
    let reference = f32::from(u16::from_le_bytes([data[11], data[12]])) / 16.0 + 1.0;
    let resistance = raw_to_resistance(code, reference);
    assert!(resistance.is_finite());

    let t = resistance_to_temperature(resistance, 100.0);
    assert!(!t.is_infinite(), "resistance = {resistance}, t = {t}");
});
