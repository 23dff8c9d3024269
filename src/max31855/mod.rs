//! Thermocouple converter driver (MAX31855 family).
//!
//! The chip is read-only: every exchange clocks out one 32-bit frame
//! holding both junction codes and the fault flags.
//!
//! ## Frame layout
//!
//! ```text
//! bit 31                                                    bit 0
//! ┌──────────────┬───┬──────────────┬───┬───────────────────┐
//! │ hot junction │ R │ cold junction│ R │ fault flags (low) │
//! │ 14 bits s14  │   │ 12 bits s12  │   │ OC / SCG / SCV    │
//! └──────────────┴───┴──────────────┴───┴───────────────────┘
//!      31..18      17     15..4       3        2..0
//! ```
//!
//! Both junction fields are two's-complement. The hot field steps in
//! 0.25 °C, the cold field in 0.0625 °C.
//!
//! ## Compensation
//!
//! The chip computes its hot-junction reading under a fixed linear
//! K-type approximation (41.276 µV/°C). [`read_temperature`] undoes
//! that: it reconstructs the measured thermoelectric voltage from the
//! junction difference, adds the NIST forward voltage of the cold
//! junction, and runs the sum through the alloy's inverse table. Types
//! J, K and T are supported; K gets the ITS-90 exponential correction
//! above 0 °C.
//!
//! Faults are latched rather than returned: a read taken while a
//! masked fault flag is set answers NaN, and [`take_last_fault`]
//! surfaces the flags once.
//!
//! [`read_temperature`]: Max31855::read_temperature
//! [`take_last_fault`]: Max31855::take_last_fault

pub mod nist;

use embedded_hal::spi::SpiDevice;
use libm::exp;

use crate::bus;
use crate::error::Error;
use crate::probe::ProbeType;

/// Open thermocouple (broken wire or no probe).
pub const FAULT_OPEN_CIRCUIT: u8 = 0x01;
/// Probe shorted to ground.
pub const FAULT_SHORT_GND: u8 = 0x02;
/// Probe shorted to the supply rail.
pub const FAULT_SHORT_VCC: u8 = 0x04;
/// All three fault flags.
pub const FAULT_ALL: u8 = FAULT_OPEN_CIRCUIT | FAULT_SHORT_GND | FAULT_SHORT_VCC;

/// Frame returned when no converter answers on the bus.
const ABSENT_SENTINEL: u32 = 0x00FF_FFFF;

/// Slope of the chip's internal linear approximation, mV per °C.
const LINEAR_MV_PER_DEGREE: f64 = 0.041276;

/// Cold-junction offset applied by the stock carrier board, °C.
pub const DEFAULT_COLD_OFFSET: f64 = 2.10;

// ───────────────────────────────────────────────────────────────
// Pure frame decode
// ───────────────────────────────────────────────────────────────

/// Hot-junction temperature in °C from a raw frame.
///
/// Top 14 bits, two's-complement, 0.25 °C per step.
pub fn decode_hot_junction(raw: u32) -> f64 {
    f64::from((raw as i32) >> 18) * 0.25
}

/// Cold-junction temperature in °C from a raw frame, before any
/// board offset is applied.
///
/// Bits 15..4, two's-complement, 0.0625 °C per step.
pub fn decode_cold_junction(raw: u32) -> f64 {
    let field = ((raw >> 4) & 0x0FFF) as u16;
    let signed = ((field << 4) as i16) >> 4;
    f64::from(signed) * 0.0625
}

// ───────────────────────────────────────────────────────────────
// Alloy curve conversions
// ───────────────────────────────────────────────────────────────

/// Map a junction temperature to its thermoelectric voltage in mV via
/// the alloy's NIST forward table.
///
/// Type K carries the ITS-90 magnetic-ordering correction for positive
/// temperatures. Non-thermocouple probe types answer NaN.
pub fn temperature_to_millivolts(probe: ProbeType, temperature: f64) -> f64 {
    let table = match probe {
        ProbeType::TcJ => nist::FORWARD_J,
        ProbeType::TcK => nist::FORWARD_K,
        ProbeType::TcT => nist::FORWARD_T,
        _ => return f64::NAN,
    };
    let mut millivolts = nist::evaluate(table, temperature);
    if probe == ProbeType::TcK && temperature > 0.0 {
        let centred = temperature - nist::K_CORRECTION_A2;
        millivolts += nist::K_CORRECTION_A0 * exp(nist::K_CORRECTION_A1 * centred * centred);
    }
    millivolts
}

/// Map a thermoelectric voltage in mV back to °C via the alloy's NIST
/// inverse table. Non-thermocouple probe types answer NaN.
pub fn millivolts_to_temperature(probe: ProbeType, millivolts: f64) -> f64 {
    let table = match probe {
        ProbeType::TcJ => nist::INVERSE_J,
        ProbeType::TcK => nist::INVERSE_K,
        ProbeType::TcT => nist::INVERSE_T,
        _ => return f64::NAN,
    };
    nist::evaluate(table, millivolts)
}

// ───────────────────────────────────────────────────────────────
// Driver
// ───────────────────────────────────────────────────────────────

/// MAX31855-style thermocouple converter behind an owned SPI device.
///
/// The `SpiDevice` carries the chip-select bracket and the 4 MHz
/// mode-0 clock settings for this chip.
pub struct Max31855<SPI> {
    spi: SPI,
    probe: ProbeType,
    begun: bool,
    cold_offset: f64,
    fault_mask: u8,
    last_fault: u8,
}

impl<SPI: SpiDevice> Max31855<SPI> {
    pub fn new(spi: SPI) -> Self {
        Self {
            spi,
            probe: ProbeType::NotConnected,
            begun: false,
            cold_offset: DEFAULT_COLD_OFFSET,
            fault_mask: FAULT_ALL,
            last_fault: 0,
        }
    }

    /// Probe for the converter. Reads one frame; an all-ones frame
    /// means nothing is driving the bus and the driver stays inert.
    pub fn begin(&mut self) -> Result<(), Error<SPI::Error>> {
        if self.begun {
            return Ok(());
        }
        let raw = bus::read_frame(&mut self.spi)?;
        if raw == ABSENT_SENTINEL {
            return Err(Error::NotDetected);
        }
        self.last_fault = 0;
        self.begun = true;
        Ok(())
    }

    pub fn end(&mut self) {
        self.last_fault = 0;
        self.begun = false;
    }

    /// Alloy used for the forward/inverse curve lookups.
    pub fn set_probe_type(&mut self, probe: ProbeType) {
        self.probe = probe;
    }

    pub fn probe_type(&self) -> ProbeType {
        self.probe
    }

    /// Cold-junction offset in °C, subtracted from the decoded
    /// cold-junction field to cancel carrier-board self-heating.
    pub fn set_cold_offset(&mut self, offset: f64) {
        self.cold_offset = offset;
    }

    pub fn cold_offset(&self) -> f64 {
        self.cold_offset
    }

    /// Select which fault flags are honoured. Cleared bits are ignored
    /// both for latching and for the NaN short-circuit on reads.
    pub fn set_fault_mask(&mut self, mask: u8) {
        self.fault_mask = mask & FAULT_ALL;
    }

    pub fn fault_mask(&self) -> u8 {
        self.fault_mask
    }

    /// Last masked fault flags observed by any read, cleared on return.
    pub fn take_last_fault(&mut self) -> u8 {
        let fault = self.last_fault;
        self.last_fault = 0;
        fault
    }

    /// One raw 32-bit frame, undecoded.
    pub fn read_raw(&mut self) -> Result<u32, Error<SPI::Error>> {
        Ok(bus::read_frame(&mut self.spi)?)
    }

    /// Hot-junction temperature in °C, NaN while a masked fault is set.
    pub fn read_hot_junction(&mut self) -> Result<f64, Error<SPI::Error>> {
        let raw = bus::read_frame(&mut self.spi)?;
        if self.latch_fault(raw) != 0 {
            return Ok(f64::NAN);
        }
        Ok(decode_hot_junction(raw))
    }

    /// Offset-corrected cold-junction temperature in °C, NaN while a
    /// masked fault is set.
    pub fn read_cold_junction(&mut self) -> Result<f64, Error<SPI::Error>> {
        let raw = bus::read_frame(&mut self.spi)?;
        if self.latch_fault(raw) != 0 {
            return Ok(f64::NAN);
        }
        Ok(self.decode_cold(raw))
    }

    /// Cold-junction-compensated thermoelectric voltage in mV.
    ///
    /// The chip's hot-junction value assumes a linear K-type alloy, so
    /// the junction difference is mapped back to a voltage with the
    /// same slope and the cold junction's NIST forward voltage is
    /// added on top. NaN while a masked fault is set.
    pub fn read_voltage(&mut self) -> Result<f64, Error<SPI::Error>> {
        let raw = bus::read_frame(&mut self.spi)?;
        if self.latch_fault(raw) != 0 {
            return Ok(f64::NAN);
        }
        Ok(self.compensated_millivolts(raw))
    }

    /// Linearised hot-junction temperature in °C for the configured
    /// alloy, NaN while a masked fault is set or outside the alloy's
    /// table domain.
    pub fn read_temperature(&mut self) -> Result<f64, Error<SPI::Error>> {
        let raw = bus::read_frame(&mut self.spi)?;
        if self.latch_fault(raw) != 0 {
            return Ok(f64::NAN);
        }
        let millivolts = self.compensated_millivolts(raw);
        Ok(millivolts_to_temperature(self.probe, millivolts))
    }

    fn decode_cold(&self, raw: u32) -> f64 {
        decode_cold_junction(raw) - self.cold_offset
    }

    fn compensated_millivolts(&self, raw: u32) -> f64 {
        let hot = decode_hot_junction(raw);
        let cold = self.decode_cold(raw);
        (hot - (cold + self.cold_offset)) * LINEAR_MV_PER_DEGREE
            + temperature_to_millivolts(self.probe, cold)
    }

    /// Mask the frame's fault flags and latch any that survive.
    fn latch_fault(&mut self, raw: u32) -> u8 {
        let fault = (raw & 0x0F) as u8 & self.fault_mask;
        if fault != 0 {
            self.last_fault = fault;
        }
        fault
    }
}
