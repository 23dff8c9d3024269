//! MAX31865 RTD decode engine.
//!
//! Owns the RTD converter behind its [`SpiDevice`] (integrator contract:
//! 1 MHz, SPI mode 1) and layers three things on the register map in
//! [`regs`]:
//!
//! - **Configuration**: wiring (2/3-wire), mains filter, bias, continuous
//!   mode, fault thresholds. The chip's config register is the source of
//!   truth; setters read-modify-write it and latch the flags the timing
//!   logic needs.
//! - **Conversion protocol**, in both a blocking and a polled form:
//!
//!   ```text
//!   Idle ──clear fault, bias on──▶ Settling ──10 ms──▶ one-shot trigger
//!        ◀──────deliver raw◀──65/75 ms── Converting ◀─┘
//!   ```
//!
//!   The blocking path walks the same sequence with `DelayNs` waits. In
//!   continuous mode both paths skip straight to reading the result
//!   register.
//! - **Math**: ratiometric code → ohms, then Callendar-Van Dusen above
//!   freezing with a 5th-order polynomial fallback below.
//!
//! Raw samples keep the fault flag in bit 0 on the wire; everything here
//! returns the 15-bit magnitude with that bit shifted away.

pub mod regs;

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiDevice;
use libm::sqrtf;

use crate::bus;
use crate::error::Error;
use crate::probe::ProbeType;
use crate::settle::SettleTimer;

/// Callendar-Van Dusen coefficient A for platinum RTDs.
const RTD_A: f32 = 3.9083e-3;
/// Callendar-Van Dusen coefficient B for platinum RTDs.
const RTD_B: f32 = -5.775e-7;

/// Bias settle before a one-shot conversion may start.
const BIAS_SETTLE_MS: u32 = 10;
/// One conversion with the 60 Hz filter.
const CONVERSION_60HZ_MS: u32 = 65;
/// One conversion with the 50 Hz filter.
const CONVERSION_50HZ_MS: u32 = 75;
/// First conversion after entering continuous mode, 60 Hz filter.
const FIRST_CONVERSION_60HZ_MS: u32 = 60;
/// First conversion after entering continuous mode, 50 Hz filter.
const FIRST_CONVERSION_50HZ_MS: u32 = 70;
/// Chip-timed automatic fault-detection cycle.
const FAULT_CYCLE_AUTO_MS: u32 = 1;

/// Fault-detection cycle selector for [`Max31865::read_fault`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultCycle {
    /// No cycle; just read the latched status register.
    None,
    /// Chip-timed cycle: trigger, wait 1 ms, read status.
    Auto,
    /// Caller-timed cycle, first half. Returns 0 immediately.
    ManualRun,
    /// Caller-timed cycle, second half. Returns 0 immediately.
    ManualFinish,
}

/// Polled conversion phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConvPhase {
    Idle,
    Settling(SettleTimer),
    Converting(SettleTimer),
}

/// RTD decode engine.
pub struct Max31865<SPI> {
    spi: SPI,
    probe: ProbeType,
    begun: bool,
    bias: bool,
    continuous: bool,
    filter_50hz: bool,
    phase: ConvPhase,
}

impl<SPI: SpiDevice> Max31865<SPI> {
    pub fn new(spi: SPI) -> Self {
        Self {
            spi,
            probe: ProbeType::NotConnected,
            begun: false,
            bias: false,
            continuous: false,
            filter_50hz: false,
            phase: ConvPhase::Idle,
        }
    }

    /// Bring the converter to known-safe defaults: bias off, one-shot mode,
    /// thresholds wide open, faults cleared, poll machine at Idle.
    /// Idempotent; repeat calls are no-ops.
    pub fn begin(&mut self) -> Result<(), Error<SPI::Error>> {
        if self.begun {
            return Ok(());
        }
        self.set_bias(false)?;
        // Leaving continuous mode takes effect immediately (the
        // first-conversion settle only applies when entering it).
        self.modify_config(regs::CFG_AUTO_CONVERT, 0)?;
        self.continuous = false;
        self.set_thresholds(0x0000, 0xFFFF)?;
        self.clear_fault()?;
        self.phase = ConvPhase::Idle;
        self.begun = true;
        Ok(())
    }

    /// Deactivate the engine. Chip-select release belongs to the
    /// `SpiDevice`; locally this resets the poll machine and the begun
    /// latch so a later [`begin`](Self::begin) reprograms the chip.
    pub fn end(&mut self) {
        self.phase = ConvPhase::Idle;
        self.begun = false;
    }

    /// Record the probe wiring and program the 3-wire sense bit to match.
    pub fn set_rtd_type(&mut self, probe: ProbeType) -> Result<(), Error<SPI::Error>> {
        if probe == ProbeType::Rtd3Wire {
            self.modify_config(0, regs::CFG_THREE_WIRE)?;
        } else {
            self.modify_config(regs::CFG_THREE_WIRE, 0)?;
        }
        self.probe = probe;
        Ok(())
    }

    /// Probe wiring last programmed.
    pub fn rtd_type(&self) -> ProbeType {
        self.probe
    }

    /// Program both fault thresholds as full 16-bit register values (fault
    /// flag bit included). Written low pair first, LSB before MSB.
    pub fn set_thresholds(&mut self, lower: u16, upper: u16) -> Result<(), Error<SPI::Error>> {
        bus::write_byte(&mut self.spi, regs::LOW_FAULT_LSB, (lower & 0xFF) as u8)?;
        bus::write_byte(&mut self.spi, regs::LOW_FAULT_MSB, (lower >> 8) as u8)?;
        bus::write_byte(&mut self.spi, regs::HIGH_FAULT_LSB, (upper & 0xFF) as u8)?;
        bus::write_byte(&mut self.spi, regs::HIGH_FAULT_MSB, (upper >> 8) as u8)?;
        Ok(())
    }

    /// Low fault threshold currently programmed.
    pub fn lower_threshold(&mut self) -> Result<u16, Error<SPI::Error>> {
        Ok(bus::read_word(&mut self.spi, regs::LOW_FAULT_MSB)?)
    }

    /// High fault threshold currently programmed.
    pub fn upper_threshold(&mut self) -> Result<u16, Error<SPI::Error>> {
        Ok(bus::read_word(&mut self.spi, regs::HIGH_FAULT_MSB)?)
    }

    /// Switch between continuous conversion and triggered one-shots.
    /// Entering continuous mode blocks for one full conversion cycle
    /// before data is valid; leaving it returns immediately.
    pub fn set_auto_convert(
        &mut self,
        enabled: bool,
        delay: &mut impl DelayNs,
    ) -> Result<(), Error<SPI::Error>> {
        if enabled {
            self.modify_config(0, regs::CFG_AUTO_CONVERT)?;
            if !self.continuous {
                delay.delay_ms(self.first_conversion_ms());
            }
        } else {
            self.modify_config(regs::CFG_AUTO_CONVERT, 0)?;
        }
        self.continuous = enabled;
        Ok(())
    }

    /// Select mains rejection: true = 50 Hz, false = 60 Hz. Latched locally
    /// so the conversion waits use the matching duration.
    pub fn set_filter_50hz(&mut self, enabled: bool) -> Result<(), Error<SPI::Error>> {
        if enabled {
            self.modify_config(0, regs::CFG_FILTER_50HZ)?;
        } else {
            self.modify_config(regs::CFG_FILTER_50HZ, 0)?;
        }
        self.filter_50hz = enabled;
        Ok(())
    }

    /// Mains rejection currently latched.
    pub fn filter_50hz(&self) -> bool {
        self.filter_50hz
    }

    /// Drive the bias voltage directly. Latched locally so conversions know
    /// whether to power it down again afterwards.
    pub fn set_bias(&mut self, enabled: bool) -> Result<(), Error<SPI::Error>> {
        if enabled {
            self.modify_config(0, regs::CFG_BIAS)?;
        } else {
            self.modify_config(regs::CFG_BIAS, 0)?;
        }
        self.bias = enabled;
        Ok(())
    }

    /// Run a fault-detection cycle (or none) and report the fault status
    /// byte. The manual variants trigger their half of the cycle and return
    /// 0 without reading status: the caller sequences run → datasheet
    /// delay → finish, and this driver does not enforce the gap.
    pub fn read_fault(
        &mut self,
        cycle: FaultCycle,
        delay: &mut impl DelayNs,
    ) -> Result<u8, Error<SPI::Error>> {
        match cycle {
            FaultCycle::None => {}
            FaultCycle::Auto => {
                let kept = self.persistent_config_bits()?;
                bus::write_byte(&mut self.spi, regs::CONFIG, kept | regs::FAULT_CYCLE_AUTO)?;
                delay.delay_ms(FAULT_CYCLE_AUTO_MS);
            }
            FaultCycle::ManualRun => {
                let kept = self.persistent_config_bits()?;
                bus::write_byte(&mut self.spi, regs::CONFIG, kept | regs::FAULT_CYCLE_MANUAL_RUN)?;
                return Ok(0);
            }
            FaultCycle::ManualFinish => {
                let kept = self.persistent_config_bits()?;
                bus::write_byte(
                    &mut self.spi,
                    regs::CONFIG,
                    kept | regs::FAULT_CYCLE_MANUAL_FINISH,
                )?;
                return Ok(0);
            }
        }
        Ok(bus::read_byte(&mut self.spi, regs::FAULT_STATUS)?)
    }

    /// Clear latched faults. Wiring, filter, bias, and mode bits are
    /// preserved; the one-shot and fault-cycle bits are dropped and the
    /// clear strobe is set.
    pub fn clear_fault(&mut self) -> Result<(), Error<SPI::Error>> {
        self.modify_config(
            regs::CFG_ONE_SHOT | regs::CFG_FAULT_CYCLE_MASK,
            regs::CFG_FAULT_CLEAR,
        )
    }

    /// Blocking conversion to the 15-bit raw magnitude.
    ///
    /// In one-shot mode: clear faults, power the bias if it is not latched
    /// on and let it settle 10 ms, trigger the conversion, wait it out
    /// (65 ms, or 75 ms with the 50 Hz filter), then power the bias back
    /// down. Continuous mode reads the most recent result directly.
    pub fn read_raw(&mut self, delay: &mut impl DelayNs) -> Result<u16, Error<SPI::Error>> {
        self.clear_fault()?;
        if !self.continuous {
            if !self.bias {
                self.modify_config(0, regs::CFG_BIAS)?;
                delay.delay_ms(BIAS_SETTLE_MS);
            }
            self.modify_config(0, regs::CFG_ONE_SHOT)?;
            delay.delay_ms(self.conversion_ms());
        }
        let raw = bus::read_word(&mut self.spi, regs::RTD_MSB)?;
        if !self.bias {
            self.modify_config(regs::CFG_BIAS, 0)?;
        }
        Ok(raw >> 1)
    }

    /// Polled conversion. Call every control tick with the current
    /// monotonic milliseconds; delivers `Some(raw)` exactly once per cycle
    /// and re-arms from Idle on the next call.
    ///
    /// Bias stays powered between poll cycles. A caller that abandons a
    /// cycle mid-flight leaves it powered until the next blocking read or
    /// an explicit [`set_bias`](Self::set_bias)`(false)`.
    pub fn poll_raw(&mut self, now_ms: u32) -> Result<Option<u16>, Error<SPI::Error>> {
        match self.phase {
            ConvPhase::Idle => {
                self.clear_fault()?;
                if !self.bias {
                    self.modify_config(0, regs::CFG_BIAS)?;
                }
                self.phase = ConvPhase::Settling(SettleTimer::start(now_ms, BIAS_SETTLE_MS));
                Ok(None)
            }
            ConvPhase::Settling(timer) => {
                if timer.elapsed(now_ms) {
                    self.modify_config(0, regs::CFG_ONE_SHOT)?;
                    self.phase =
                        ConvPhase::Converting(SettleTimer::start(now_ms, self.conversion_ms()));
                }
                Ok(None)
            }
            ConvPhase::Converting(timer) => {
                if timer.elapsed(now_ms) {
                    let raw = bus::read_word(&mut self.spi, regs::RTD_MSB)?;
                    self.phase = ConvPhase::Idle;
                    return Ok(Some(raw >> 1));
                }
                Ok(None)
            }
        }
    }

    /// Blocking conversion straight to ohms.
    pub fn read_resistance(
        &mut self,
        delay: &mut impl DelayNs,
        reference: f32,
    ) -> Result<f32, Error<SPI::Error>> {
        let raw = self.read_raw(delay)?;
        Ok(raw_to_resistance(raw, reference))
    }

    /// Blocking conversion straight to °C.
    pub fn read_temperature(
        &mut self,
        delay: &mut impl DelayNs,
        nominal: f32,
        reference: f32,
    ) -> Result<f32, Error<SPI::Error>> {
        let raw = self.read_raw(delay)?;
        Ok(raw_to_temperature(raw, nominal, reference))
    }

    fn conversion_ms(&self) -> u32 {
        if self.filter_50hz {
            CONVERSION_50HZ_MS
        } else {
            CONVERSION_60HZ_MS
        }
    }

    fn first_conversion_ms(&self) -> u32 {
        if self.filter_50hz {
            FIRST_CONVERSION_50HZ_MS
        } else {
            FIRST_CONVERSION_60HZ_MS
        }
    }

    /// Config register reduced to the bits that survive fault cycles.
    fn persistent_config_bits(&mut self) -> Result<u8, Error<SPI::Error>> {
        Ok(bus::read_byte(&mut self.spi, regs::CONFIG)? & regs::CFG_PERSISTENT_MASK)
    }

    /// Read-modify-write the config register: drop `clear` bits, then set
    /// `set` bits.
    fn modify_config(&mut self, clear: u8, set: u8) -> Result<(), Error<SPI::Error>> {
        let cfg = bus::read_byte(&mut self.spi, regs::CONFIG)?;
        bus::write_byte(&mut self.spi, regs::CONFIG, (cfg & !clear) | set)?;
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Pure conversion math
// ───────────────────────────────────────────────────────────────

/// Ratiometric code → ohms against the reference resistor.
pub fn raw_to_resistance(raw: u16, reference: f32) -> f32 {
    (f32::from(raw) / 32768.0) * reference
}

/// Ohms → °C for a platinum RTD with the given 0 °C nominal resistance.
///
/// The Callendar-Van Dusen quadratic is solved for its upper root; that
/// form only holds above freezing, so a negative result is recomputed with
/// the standard sub-zero 5th-order polynomial in the resistance ratio
/// (normalized to a 100 Ω nominal).
pub fn resistance_to_temperature(resistance: f32, nominal: f32) -> f32 {
    let z2 = RTD_A * RTD_A - 4.0 * RTD_B;
    let z3 = (4.0 * RTD_B) / nominal;
    let temp = (sqrtf(z2 + z3 * resistance) - RTD_A) / (2.0 * RTD_B);
    if temp >= 0.0 {
        return temp;
    }

    let ratio = resistance / nominal * 100.0;
    let mut power = ratio;
    let mut temp = -242.02;
    temp += 2.2228 * power;
    power *= ratio;
    temp += 2.5859e-3 * power;
    power *= ratio;
    temp -= 4.8260e-6 * power;
    power *= ratio;
    temp -= 2.8183e-8 * power;
    power *= ratio;
    temp += 1.5243e-10 * power;
    temp
}

/// Ratiometric code straight to °C.
pub fn raw_to_temperature(raw: u16, nominal: f32, reference: f32) -> f32 {
    resistance_to_temperature(raw_to_resistance(raw, reference), nominal)
}
