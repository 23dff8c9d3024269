//! MAX31865 register map and bit assignments.
//!
//! Addresses are the read addresses (top bit low); the bus layer sets the
//! write flag. Layout is fixed by the chip datasheet.

/// Configuration register.
pub const CONFIG: u8 = 0x00;
/// RTD ratio, high byte. Low byte follows at [`RTD_LSB`].
pub const RTD_MSB: u8 = 0x01;
/// RTD ratio, low byte; bit 0 is the fault flag.
pub const RTD_LSB: u8 = 0x02;
/// High fault threshold, high byte.
pub const HIGH_FAULT_MSB: u8 = 0x03;
/// High fault threshold, low byte.
pub const HIGH_FAULT_LSB: u8 = 0x04;
/// Low fault threshold, high byte.
pub const LOW_FAULT_MSB: u8 = 0x05;
/// Low fault threshold, low byte.
pub const LOW_FAULT_LSB: u8 = 0x06;
/// Fault status register.
pub const FAULT_STATUS: u8 = 0x07;

// ───────────────────────────────────────────────────────────────
// CONFIG register bits
// ───────────────────────────────────────────────────────────────

/// Bias voltage enable.
pub const CFG_BIAS: u8 = 0x80;
/// Continuous (automatic) conversion mode.
pub const CFG_AUTO_CONVERT: u8 = 0x40;
/// One-shot conversion trigger (self-clearing).
pub const CFG_ONE_SHOT: u8 = 0x20;
/// 3-wire RTD sensing (clear = 2-wire/4-wire).
pub const CFG_THREE_WIRE: u8 = 0x10;
/// Fault-detection cycle control bits.
pub const CFG_FAULT_CYCLE_MASK: u8 = 0x0C;
/// Fault status clear strobe.
pub const CFG_FAULT_CLEAR: u8 = 0x02;
/// 50 Hz mains filter (clear = 60 Hz).
pub const CFG_FILTER_50HZ: u8 = 0x01;

/// Bits that survive fault clearing and fault-detection cycles: wiring and
/// filter selection.
pub const CFG_PERSISTENT_MASK: u8 = CFG_THREE_WIRE | CFG_FILTER_50HZ;

// ───────────────────────────────────────────────────────────────
// Fault-detection cycle trigger values (bias forced on)
// ───────────────────────────────────────────────────────────────

/// Automatic fault-detection cycle with the chip's internal timing.
pub const FAULT_CYCLE_AUTO: u8 = 0b1000_0100;
/// First half of the caller-timed manual fault-detection cycle.
pub const FAULT_CYCLE_MANUAL_RUN: u8 = 0b1000_1000;
/// Second half of the caller-timed manual fault-detection cycle.
pub const FAULT_CYCLE_MANUAL_FINISH: u8 = 0b1000_1100;

// ───────────────────────────────────────────────────────────────
// FAULT_STATUS register bits
// ───────────────────────────────────────────────────────────────

/// RTD reading above the high fault threshold.
pub const FAULT_HIGH_THRESHOLD: u8 = 0x80;
/// RTD reading below the low fault threshold.
pub const FAULT_LOW_THRESHOLD: u8 = 0x40;
/// REFIN- above 0.85 × bias.
pub const FAULT_REFIN_HIGH: u8 = 0x20;
/// REFIN- below 0.85 × bias (FORCE- open).
pub const FAULT_REFIN_LOW: u8 = 0x10;
/// RTDIN- below 0.85 × bias (FORCE- open).
pub const FAULT_RTDIN_LOW: u8 = 0x08;
/// Over- or under-voltage on a protected input.
pub const FAULT_OVER_UNDER_VOLTAGE: u8 = 0x04;
